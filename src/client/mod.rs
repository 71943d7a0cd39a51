use futures::{stream, Stream};
use grammers_client::types::{Chat, Participant};
use grammers_client::{Client, Config as ClientConfig, InitParams};
use grammers_session::Session;
use tracing::debug;

use crate::config;
use crate::stats::{MemberRecord, Result, StatsError};

/// 基于用户账号 session 的 MTProto 客户端，用于获取 Bot API 拿不到的成员属性
#[derive(Clone)]
pub struct StatsClient {
    client: Client,
}

impl StatsClient {
    /// 连接 Telegram，session 文件需要先用 groupstat-login 生成
    pub async fn connect(config: &config::Client) -> anyhow::Result<Self> {
        let client = Client::connect(ClientConfig {
            session: Session::load_file_or_create(&config.session_file)?,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            params: InitParams::default(),
        })
        .await?;
        if !client.is_authorized().await? {
            anyhow::bail!("session is not authorized, run groupstat-login first");
        }
        Ok(Self { client })
    }

    /// 根据 Bot API 形式的 chat id 在会话的对话列表中找到对应的群组
    pub async fn resolve_chat(&self, chat_id: i64) -> Result<Chat> {
        let bare_id = bare_chat_id(chat_id);
        let mut dialogs = self.client.iter_dialogs();
        while let Some(dialog) = dialogs.next().await? {
            if dialog.chat().id() == bare_id {
                debug!("resolved chat {} -> {}", chat_id, dialog.chat().name());
                return Ok(dialog.chat().clone());
            }
        }
        Err(StatsError::ChatNotFound(chat_id))
    }

    /// 惰性遍历群组成员，遍历途中可能因为网络或限流失败
    pub fn member_stream(&self, chat: &Chat) -> impl Stream<Item = Result<MemberRecord>> {
        let iter = self.client.iter_participants(chat);
        stream::try_unfold(iter, |mut iter| async move {
            let participant = iter.next().await.map_err(StatsError::from)?;
            Ok(participant.map(|p| (member_record(p), iter)))
        })
    }
}

fn member_record(participant: Participant) -> MemberRecord {
    let user = participant.user;
    MemberRecord {
        id: user.id(),
        username: user.username().map(str::to_owned),
        full_name: user.full_name(),
        is_deleted: user.raw.deleted,
        is_bot: user.raw.bot,
        is_premium: user.raw.premium,
    }
}

/// Bot API 的群组 id 带 -100 前缀，MTProto 侧用的是裸 id
pub fn bare_chat_id(chat_id: i64) -> i64 {
    match chat_id {
        id if id <= -1_000_000_000_000 => -id - 1_000_000_000_000,
        id if id < 0 => -id,
        id => id,
    }
}

#[cfg(test)]
mod test {
    use super::bare_chat_id;

    #[test]
    fn supergroup_id() {
        assert_eq!(bare_chat_id(-1001234567890), 1234567890);
    }

    #[test]
    fn basic_group_id() {
        assert_eq!(bare_chat_id(-987654), 987654);
    }

    #[test]
    fn user_id_unchanged() {
        assert_eq!(bare_chat_id(123456), 123456);
    }
}
