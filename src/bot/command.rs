use teloxide::utils::command::BotCommands;

// NOTE: 此处必须实现 Clone，否则不满足 dptree 的 Injectable 约束
#[derive(BotCommands, Clone, PartialEq, Debug)]
#[command(rename_rule = "lowercase")]
pub enum PublicCommand {
    #[command(description = "Welcome message")]
    Start,
    #[command(description = "Show this help message")]
    Help,
    #[command(description = "Get group member statistics")]
    Stats,
    #[command(description = "Get detailed group stats (admin list)")]
    Details,
    #[command(description = "Refresh group stats")]
    Refresh,
    #[command(description = "pong~")]
    Ping,
}
