use anyhow::Result;
use teloxide::dispatching::DpHandlerDescription;
use teloxide::dptree::case;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use crate::bot::command::PublicCommand;
use crate::bot::handlers::utils::{details_text, ensure_group_admin, error_text, render_stats};
use crate::bot::Bot;
use crate::reply_to;
use crate::stats::{StatsError, StatsService};

pub fn public_command_handler() -> Handler<'static, DependencyMap, Result<()>, DpHandlerDescription>
{
    teloxide::filter_command::<PublicCommand, _>()
        .branch(case![PublicCommand::Start].endpoint(cmd_start))
        .branch(case![PublicCommand::Help].endpoint(cmd_help))
        .branch(case![PublicCommand::Stats].endpoint(cmd_stats))
        .branch(case![PublicCommand::Details].endpoint(cmd_details))
        .branch(case![PublicCommand::Refresh].endpoint(cmd_refresh))
        .branch(case![PublicCommand::Ping].endpoint(cmd_ping))
}

async fn cmd_start(bot: Bot, msg: Message) -> Result<()> {
    info!("{}: /start", msg.chat.id);
    reply_to!(
        bot,
        msg,
        "Hello! I'm a group stats bot. Use /stats in a group to get member statistics. \
         Make sure I'm an admin!"
    )
    .await?;
    Ok(())
}

async fn cmd_help(bot: Bot, msg: Message) -> Result<()> {
    info!("{}: /help", msg.chat.id);
    reply_to!(bot, msg, PublicCommand::descriptions().to_string()).await?;
    Ok(())
}

async fn cmd_stats(bot: Bot, msg: Message, stats: StatsService) -> Result<()> {
    info!("{}: /stats", msg.chat.id);
    send_stats(&bot, &msg, &stats, false).await
}

async fn cmd_refresh(bot: Bot, msg: Message, stats: StatsService) -> Result<()> {
    info!("{}: /refresh", msg.chat.id);
    send_stats(&bot, &msg, &stats, true).await
}

/// /stats 和 /refresh 共用的逻辑，refresh 会先丢弃缓存。
/// 过了权限检查之后的一切失败也都要翻译成回复，不能让错误漏回 dispatcher。
async fn send_stats(bot: &Bot, msg: &Message, stats: &StatsService, refresh: bool) -> Result<()> {
    if let Err(err) = ensure_group_admin(bot, msg).await {
        reply_to!(bot, msg, error_text(&err)).await?;
        return Ok(());
    }

    let api_count = match bot.get_chat_member_count(msg.chat.id).await {
        Ok(count) => count,
        Err(err) => {
            warn!("member count for {} failed: {}", msg.chat.id, err);
            reply_to!(bot, msg, error_text(&StatsError::Telegram(err))).await?;
            return Ok(());
        }
    };
    let summary = if refresh {
        stats.refresh(msg.chat.id.0).await
    } else {
        stats.group_summary(msg.chat.id.0).await
    };
    if let Err(err) = &summary {
        warn!("stats for {} failed: {}", msg.chat.id, err);
    }
    reply_to!(bot, msg, render_stats(&summary, api_count, refresh)).await?;
    Ok(())
}

async fn cmd_details(bot: Bot, msg: Message) -> Result<()> {
    info!("{}: /details", msg.chat.id);
    if let Err(err) = ensure_group_admin(&bot, &msg).await {
        reply_to!(bot, msg, error_text(&err)).await?;
        return Ok(());
    }
    let admins = match bot.get_chat_administrators(msg.chat.id).await {
        Ok(admins) => admins,
        Err(err) => {
            warn!("admin list for {} failed: {}", msg.chat.id, err);
            reply_to!(bot, msg, error_text(&StatsError::Telegram(err))).await?;
            return Ok(());
        }
    };
    reply_to!(bot, msg, details_text(&admins)).await?;
    Ok(())
}

async fn cmd_ping(bot: Bot, msg: Message) -> Result<()> {
    info!("{}: /ping", msg.chat.id);
    reply_to!(bot, msg, "pong~").await?;
    Ok(())
}
