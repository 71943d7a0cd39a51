use chrono::{DateTime, Utc};

/// 遍历群组成员时得到的单个成员记录
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub id: i64,
    pub username: Option<String>,
    pub full_name: String,
    pub is_deleted: bool,
    pub is_bot: bool,
    pub is_premium: bool,
}

impl MemberRecord {
    /// 用于展示的名称，优先用户名
    pub fn display(&self) -> String {
        match &self.username {
            Some(username) => format!("@{}", username),
            None if !self.full_name.is_empty() => self.full_name.clone(),
            None => format!("Deleted Account ({})", self.id),
        }
    }
}

/// 一次完整遍历得到的群组成员统计
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total: u32,
    pub deleted: u32,
    pub bots: u32,
    /// 未注销且不是 bot 的 premium 用户
    pub premium: u32,
    /// total - deleted - bots
    pub active: u32,
    /// 已注销账号的展示名，最多 10 个
    pub deleted_names: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
