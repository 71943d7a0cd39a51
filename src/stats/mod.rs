mod aggregate;
mod cache;
mod error;
mod types;

use std::time::Duration;

pub use aggregate::{aggregate, MAX_DELETED_NAMES};
pub use cache::StatsCache;
pub use error::{Result, StatsError};
use tracing::info;
pub use types::{MemberRecord, StatsSummary};

use crate::client::StatsClient;

/// 成员统计服务：用用户账号遍历群组成员，结果按 TTL 缓存
#[derive(Clone)]
pub struct StatsService {
    client: StatsClient,
    cache: StatsCache,
    iter_timeout: Duration,
}

impl StatsService {
    pub fn new(client: StatsClient, cache: StatsCache, iter_timeout: Duration) -> Self {
        Self { client, cache, iter_timeout }
    }

    /// 获取群组统计，优先走缓存
    pub async fn group_summary(&self, chat_id: i64) -> Result<StatsSummary> {
        self.cache.get_or_update(chat_id, || self.collect(chat_id)).await
    }

    /// 丢弃缓存并重新统计
    pub async fn refresh(&self, chat_id: i64) -> Result<StatsSummary> {
        self.cache.invalidate(chat_id);
        self.group_summary(chat_id).await
    }

    async fn collect(&self, chat_id: i64) -> Result<StatsSummary> {
        let chat = self.client.resolve_chat(chat_id).await?;
        let members = self.client.member_stream(&chat);
        let summary = tokio::time::timeout(self.iter_timeout, aggregate(members))
            .await
            .map_err(|_| StatsError::Timeout(self.iter_timeout))??;
        info!("collected stats for {}: {} members", chat_id, summary.total);
        Ok(summary)
    }
}
