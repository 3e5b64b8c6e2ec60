//! # Medley API
//!
//! The API crate provides the small web server that runs next to the Discord
//! bot. It answers health checks from the hosting platform, shows the landing
//! page for the playlist service's OAuth callback, and accepts signed webhooks
//! that are handed to the bot over a channel.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Error mapping and webhook signature verification
//! - **Config**: Environment based server configuration

/// Configuration module for server settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping and signature verification
pub mod middleware;
/// Route definitions
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{BoxError, Router, error_handling::HandleErrorLayer, http::StatusCode};
use eyre::Result;
use medley_core::models::webhook::WebhookEvent;
use tokio::{net::TcpListener, sync::mpsc};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Destination for verified webhook payloads.
pub struct WebhookSink {
    /// Shared secret used to verify the `X-Signature-256` header
    pub secret: String,
    /// Channel drained by the bot's webhook relay
    pub sender: mpsc::Sender<WebhookEvent>,
}

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(ApiState { webhook: None });
/// let app = build_router(state, Duration::from_secs(30));
/// ```
pub struct ApiState {
    /// Present only when a webhook secret is configured
    pub webhook: Option<WebhookSink>,
}

/// Builds the application router with every route and middleware attached.
///
/// The webhook route is only mounted when `state.webhook` is set, so an
/// unconfigured deployment answers 404 instead of accepting unsigned posts.
pub fn build_router(state: Arc<ApiState>, request_timeout: Duration) -> Router {
    let mut app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Playlist OAuth landing page
        .merge(routes::spotify::routes());

    if state.webhook.is_some() {
        app = app.merge(routes::webhook::routes());
    }

    app.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(handle_timeout))
            .timeout(request_timeout),
    )
}

async fn handle_timeout(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", err),
        )
    }
}

/// Starts the web server with the provided configuration
///
/// # Arguments
///
/// * `config` - Server configuration including host, port and webhook secret
/// * `webhook_tx` - Sender half of the channel the bot relays webhooks from
///
/// # Returns
///
/// * `Result<()>` - Returns when the listener fails or the server stops
pub async fn start_server(
    config: config::ApiConfig,
    webhook_tx: mpsc::Sender<WebhookEvent>,
) -> Result<()> {
    let webhook = config.webhook_secret.clone().map(|secret| WebhookSink {
        secret,
        sender: webhook_tx,
    });
    if webhook.is_none() {
        info!("WEBHOOK_SECRET not set, webhook endpoint disabled");
    }

    let state = Arc::new(ApiState { webhook });
    let app = build_router(state, Duration::from_secs(config.request_timeout));

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
