use anyhow::Result;
use groupstat::bot::start_dispatcher;
use groupstat::client::StatsClient;
use groupstat::config::Config;
use groupstat::stats::{StatsCache, StatsService};
use teloxide::adaptors::throttle::Limits;
use teloxide::requests::RequesterExt;
use teloxide::types::ParseMode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new("./config.toml").unwrap();

    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .try_init()
        .unwrap();

    let client = StatsClient::connect(&config.client).await?;
    let bot = teloxide::Bot::new(&config.telegram.token)
        .parse_mode(ParseMode::Html)
        .cache_me()
        .throttle(Limits::default());

    let cache = StatsCache::new(config.cache.ttl, config.cache.capacity);
    let stats = StatsService::new(client, cache, config.client.iter_timeout);

    start_dispatcher(stats, bot).await;

    Ok(())
}
