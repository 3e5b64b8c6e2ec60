//! Posts events received by the web server's webhook endpoint.

use std::sync::Arc;

use eyre::Result;
use medley_core::models::webhook::WebhookEvent;
use serenity::{http::Http, model::id::ChannelId, utils::Color};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{error, info};

pub fn spawn_relay(http: Arc<Http>, events: mpsc::Receiver<WebhookEvent>) -> JoinHandle<()> {
    tokio::spawn(relay_webhooks(http, events))
}

/// Drain `events` until every sender is dropped.
pub async fn relay_webhooks(http: Arc<Http>, mut events: mpsc::Receiver<WebhookEvent>) {
    while let Some(event) = events.recv().await {
        if let Err(e) = post_event(&http, &event).await {
            error!(channel_id = event.channel_id, "Failed to relay webhook event: {:?}", e);
        }
    }
    info!("Webhook relay stopped");
}

async fn post_event(http: &Http, event: &WebhookEvent) -> Result<()> {
    let channel = ChannelId(event.channel_id);
    match &event.title {
        Some(title) => {
            channel
                .send_message(http, |m| {
                    m.embed(|e| e.title(title).description(&event.content).color(Color::BLURPLE))
                })
                .await?;
        }
        None => {
            channel.say(http, &event.content).await?;
        }
    }
    Ok(())
}
