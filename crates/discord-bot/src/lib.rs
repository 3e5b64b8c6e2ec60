use eyre::Result;
use medley_core::models::webhook::WebhookEvent;
use medley_store::Store;
use serenity::{Client, prelude::GatewayIntents};
use songbird::SerenityInit;
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::info;

pub mod commands;
pub mod config;
pub mod handlers;
pub mod player;
pub mod relay;
pub mod scheduler;
pub mod services;
pub mod trivia;

/// Start the Discord bot with the provided configuration.
///
/// Besides the gateway connection this spawns the periodic sale check and,
/// when `webhook_events` is given, the task posting events received by the
/// web server. Runs until the bot disconnects or an error occurs.
///
/// # Arguments
///
/// * `config` - The bot configuration containing token, integrations, etc.
/// * `webhook_events` - Receiving end of the web server's webhook channel
///
/// # Returns
///
/// * `Ok(())` if the bot shut down gracefully
/// * `Err` if an error occurred during initialization or operation
pub async fn start_bot(
    config: config::BotConfig,
    webhook_events: Option<mpsc::Receiver<WebhookEvent>>,
) -> Result<()> {
    info!("Starting Discord bot");

    let services = Arc::new(services::Services::from_config(&config)?);
    let store = medley_store::create_store();

    let handler = handlers::Handler::new(config.clone(), services.clone(), store.clone());

    // Message content is needed for prefix commands, voice states for /play
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES;

    let mut builder = Client::builder(&config.token, intents)
        .event_handler(handler)
        .register_songbird();
    if let Some(application_id) = config.application_id {
        builder = builder.application_id(application_id);
    }
    let mut client = builder.await?;

    let http = client.cache_and_http.http.clone();
    spawn_background_tasks(&config, &store, services, http, webhook_events);

    info!("Connecting to Discord...");
    client.start().await?;

    Ok(())
}

fn spawn_background_tasks(
    config: &config::BotConfig,
    store: &Store,
    services: Arc<services::Services>,
    http: Arc<serenity::http::Http>,
    webhook_events: Option<mpsc::Receiver<WebhookEvent>>,
) {
    scheduler::SaleScheduler::new(
        http.clone(),
        store.sales.clone(),
        services.steam.clone(),
        Duration::from_secs(config.sale_check_interval_hours * 60 * 60),
    )
    .start();

    if let Some(events) = webhook_events {
        relay::spawn_relay(http, events);
    }
}
