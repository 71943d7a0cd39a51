use chrono::Utc;
use futures::{pin_mut, Stream, TryStreamExt};

use super::error::Result;
use super::types::{MemberRecord, StatsSummary};

/// 最多收集多少个已注销账号的名称
pub const MAX_DELETED_NAMES: usize = 10;

/// 对成员序列做一次单向遍历，产出统计结果。
///
/// 分类优先级为 deleted > bot > premium > active，每个成员只计入一类。
/// 遍历途中出错则整体失败，不返回部分结果。
pub async fn aggregate<S>(members: S) -> Result<StatsSummary>
where
    S: Stream<Item = Result<MemberRecord>>,
{
    pin_mut!(members);

    let mut total = 0u32;
    let mut deleted = 0u32;
    let mut bots = 0u32;
    let mut premium = 0u32;
    let mut deleted_names = Vec::new();

    while let Some(member) = members.try_next().await? {
        total += 1;
        if member.is_deleted {
            deleted += 1;
            if deleted_names.len() < MAX_DELETED_NAMES {
                deleted_names.push(member.display());
            }
        } else if member.is_bot {
            bots += 1;
        } else if member.is_premium {
            premium += 1;
        }
    }

    Ok(StatsSummary {
        total,
        deleted,
        bots,
        premium,
        active: total - deleted - bots,
        deleted_names,
        generated_at: Utc::now(),
    })
}
