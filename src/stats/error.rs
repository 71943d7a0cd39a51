use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("telegram api error: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("client api error: {0}")]
    Client(#[from] grammers_client::InvocationError),
    #[error("bot is not an admin of this chat")]
    PermissionDenied,
    #[error("not a group or supergroup")]
    NotAGroup,
    #[error("chat {0} not found in session dialogs")]
    ChatNotFound(i64),
    #[error("member iteration timed out after {0:?}")]
    Timeout(Duration),
}
