use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use medley_core::{
    errors::MedleyError,
    models::webhook::{WebhookAccepted, WebhookEvent},
};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::info;

use crate::{
    ApiState,
    middleware::{error_handling::AppError, signature},
};

/// Accepts a signed webhook and forwards it to the bot.
///
/// The body is verified before it is parsed, so unsigned payloads are never
/// deserialized.
#[axum::debug_handler]
pub async fn receive_webhook(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookAccepted>), AppError> {
    let sink = state
        .webhook
        .as_ref()
        .ok_or_else(|| MedleyError::NotFound("Webhooks are not enabled".to_string()))?;

    let header = headers
        .get(signature::SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| MedleyError::Authentication("Missing signature header".to_string()))?;

    signature::verify_signature(&sink.secret, header, &body)?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| MedleyError::Validation(format!("Invalid webhook payload: {}", e)))?;

    if event.content.trim().is_empty() {
        return Err(AppError(MedleyError::Validation(
            "Webhook content must not be empty".to_string(),
        )));
    }

    let limit = event.content_limit();
    if event.content.chars().count() > limit {
        return Err(AppError(MedleyError::Validation(format!(
            "Webhook content must be at most {} characters",
            limit
        ))));
    }

    let channel_id = event.channel_id;
    sink.sender.try_send(event).map_err(|e| match e {
        TrySendError::Full(_) => MedleyError::Unavailable("Webhook queue is full, try again later".to_string()),
        TrySendError::Closed(_) => MedleyError::Unavailable("Bot is not receiving webhooks".to_string()),
    })?;

    info!(channel_id, "Webhook accepted");

    Ok((
        StatusCode::ACCEPTED,
        Json(WebhookAccepted {
            status: "accepted".to_string(),
        }),
    ))
}
