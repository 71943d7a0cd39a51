use teloxide::prelude::*;

use super::handlers::*;
use super::Bot;
use crate::stats::StatsService;

pub async fn start_dispatcher(stats: StatsService, bot: Bot) {
    let handler = dptree::entry().branch(Update::filter_message().branch(public_command_handler()));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![stats])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
