use color_eyre::eyre::Result;
use dotenv::dotenv;
use medley_api::config::ApiConfig;
use medley_discord_bot::config::BotConfig;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Webhook events waiting to be posted before the web server applies backpressure.
const WEBHOOK_BUFFER: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Initialize logging; RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())))?;
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Medley");

    // Load configuration
    let api_config = ApiConfig::from_env()?;
    let bot_config = BotConfig::from_env()?;

    let (webhook_tx, webhook_rx) = mpsc::channel(WEBHOOK_BUFFER);

    // The web server keeps the process reachable for uptime checks
    let server = tokio::spawn(async move {
        if let Err(e) = medley_api::start_server(api_config, webhook_tx).await {
            error!("Web server error: {:?}", e);
        }
    });

    match medley_discord_bot::start_bot(bot_config, Some(webhook_rx)).await {
        Ok(_) => info!("Discord bot shut down gracefully"),
        Err(e) => error!("Discord bot error: {:?}", e),
    }

    server.abort();
    Ok(())
}
