use teloxide::prelude::*;
use teloxide::types::{ChatMember, ChatMemberKind};
use teloxide::utils::html::escape;

use crate::bot::Bot;
use crate::stats::{Result, StatsError, StatsSummary};

/// 群组命令的前置检查：必须在群组内使用，且 bot 必须是管理员
pub async fn ensure_group_admin(bot: &Bot, msg: &Message) -> Result<()> {
    if !(msg.chat.is_group() || msg.chat.is_supergroup()) {
        return Err(StatsError::NotAGroup);
    }
    let me = bot.get_me().await?;
    let member = bot.get_chat_member(msg.chat.id, me.id).await?;
    admin_gate(&member.kind)
}

/// bot 自身必须是群主或管理员
pub fn admin_gate(kind: &ChatMemberKind) -> Result<()> {
    match kind {
        ChatMemberKind::Administrator(_) | ChatMemberKind::Owner(_) => Ok(()),
        _ => Err(StatsError::PermissionDenied),
    }
}

/// 完整统计消息，Bot API 的人数和遍历得到的人数独立展示，两者可能不一致
pub fn stats_text(summary: &StatsSummary, api_count: u32, refreshed: bool) -> String {
    let mut text = format!(
        "📊 <b>Group Member Statistics</b> 📊\n\
         Members (Bot API): {}\n\
         Members (counted): {}\n\
         Active: {}\n\
         Deleted: {}\n\
         Bots: {}\n\
         Premium: {}",
        api_count, summary.total, summary.active, summary.deleted, summary.bots, summary.premium,
    );
    if !summary.deleted_names.is_empty() {
        let names: Vec<_> = summary.deleted_names.iter().map(|n| escape(n)).collect();
        text.push_str(&format!("\nDeleted accounts: {}", names.join(", ")));
    }
    text.push_str(&format!(
        "\nUpdated: {}",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if refreshed {
        text.push_str("\nStats refreshed!");
    }
    text
}

/// 用户会话不可用时的降级消息，只有 Bot API 的人数
pub fn basic_stats_text(api_count: u32) -> String {
    format!(
        "📊 <b>Group Member Statistics</b> 📊\n\
         Total Members: {}\n\
         Note: Detailed stats (deleted/premium members) are currently unavailable.",
        api_count
    )
}

/// 聚合结果到回复文本的唯一出口：成功时给完整统计，
/// 用户会话侧失败时降级为基础统计并附上原因
pub fn render_stats(summary: &Result<StatsSummary>, api_count: u32, refreshed: bool) -> String {
    match summary {
        Ok(summary) => stats_text(summary, api_count, refreshed),
        Err(
            err @ (StatsError::Client(_) | StatsError::Timeout(_) | StatsError::ChatNotFound(_)),
        ) => format!("{}\n{}", basic_stats_text(api_count), error_text(err)),
        Err(err) => error_text(err),
    }
}

pub fn details_text(admins: &[ChatMember]) -> String {
    let admin_names: Vec<_> = admins
        .iter()
        .map(|admin| {
            let user = &admin.user;
            let name = match &user.username {
                Some(username) => format!("@{}", username),
                None => user.full_name(),
            };
            let status = if user.is_premium { "Premium" } else { "Normal" };
            format!("{} ({})", escape(&name), status)
        })
        .collect();
    format!(
        "📋 <b>Detailed Group Stats</b> 📋\n\
         Admins: {}",
        if admin_names.is_empty() { "None".to_string() } else { admin_names.join(", ") }
    )
}

/// 把错误翻译成发给用户的文本，所有错误都在这一层收口
pub fn error_text(err: &StatsError) -> String {
    match err {
        StatsError::NotAGroup => {
            "This command can only be used in a group or supergroup.".to_string()
        }
        StatsError::PermissionDenied => {
            "I need to be an admin to fetch member details!".to_string()
        }
        StatsError::ChatNotFound(_) => {
            "My user session is not a member of this group, so I can't count members here."
                .to_string()
        }
        StatsError::Timeout(_) => {
            "Counting members took too long, please try again later.".to_string()
        }
        StatsError::Telegram(_) | StatsError::Client(_) => {
            "An error occurred. Please try again later.".to_string()
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use teloxide::types::Owner;

    use super::*;

    fn summary() -> StatsSummary {
        StatsSummary {
            total: 100,
            deleted: 3,
            bots: 2,
            premium: 10,
            active: 95,
            deleted_names: vec!["@ghost".to_string()],
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn stats_text_reports_both_counts() {
        let text = stats_text(&summary(), 101, false);
        assert!(text.contains("Members (Bot API): 101"));
        assert!(text.contains("Members (counted): 100"));
        assert!(text.contains("Deleted accounts: @ghost"));
        assert!(!text.contains("Stats refreshed!"));
    }

    #[test]
    fn refreshed_note_appended() {
        let text = stats_text(&summary(), 101, true);
        assert!(text.ends_with("Stats refreshed!"));
    }

    #[test]
    fn error_text_is_user_facing() {
        assert!(error_text(&StatsError::NotAGroup).contains("group or supergroup"));
        assert!(error_text(&StatsError::PermissionDenied).contains("admin"));
    }

    #[test]
    fn admin_gate_requires_admin_or_owner() {
        let owner = ChatMemberKind::Owner(Owner { custom_title: None, is_anonymous: false });
        assert!(admin_gate(&owner).is_ok());
        assert!(matches!(admin_gate(&ChatMemberKind::Member), Err(StatsError::PermissionDenied)));
        assert!(matches!(admin_gate(&ChatMemberKind::Left), Err(StatsError::PermissionDenied)));
    }

    #[test]
    fn client_failure_falls_back_to_basic_stats() {
        let text = render_stats(&Err(StatsError::ChatNotFound(1)), 42, false);
        assert!(text.contains("Total Members: 42"));
        assert!(text.contains("not a member of this group"));
    }

    #[test]
    fn gate_errors_render_directly() {
        let text = render_stats(&Err(StatsError::PermissionDenied), 42, false);
        assert_eq!(text, error_text(&StatsError::PermissionDenied));
        assert!(!text.contains("42"));
    }

    #[test]
    fn success_renders_full_stats() {
        let text = render_stats(&Ok(summary()), 101, false);
        assert!(text.contains("Members (counted): 100"));
    }
}
