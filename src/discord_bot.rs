use color_eyre::eyre::Result;
use dotenv::dotenv;
use medley_discord_bot::config::BotConfig;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())))?;
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Medley Discord bot");

    // Load configuration
    let config = BotConfig::from_env()?;

    // Start the Discord bot without the web server
    match medley_discord_bot::start_bot(config, None).await {
        Ok(_) => info!("Discord bot shut down gracefully"),
        Err(e) => error!("Discord bot error: {:?}", e),
    }

    Ok(())
}
