use std::time::Duration;

use anyhow::Result;
use duration_str::deserialize_duration;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// 日志等级
    pub log_level: String,
    pub telegram: Telegram,
    pub client: Client,
    pub cache: Cache,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Telegram {
    /// bot token
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Client {
    /// my.telegram.org 上申请的 API ID
    pub api_id: i32,
    /// my.telegram.org 上申请的 API hash
    pub api_hash: String,
    /// session 文件位置
    pub session_file: String,
    /// 遍历成员的超时时间
    #[serde(deserialize_with = "deserialize_duration")]
    pub iter_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cache {
    /// 统计缓存的有效期
    #[serde(deserialize_with = "deserialize_duration")]
    pub ttl: Duration,
    /// 最多缓存多少个群组的统计
    pub capacity: usize,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&s)?)
    }
}
