mod test_utils;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use medley_api::middleware::signature::{SIGNATURE_HEADER, sign};
use medley_core::{
    models::webhook::WebhookEvent,
    text::{DISCORD_MESSAGE_LIMIT, EMBED_DESCRIPTION_LIMIT},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::{TEST_SECRET, TestContext};

fn signature_header(value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(SIGNATURE_HEADER),
        HeaderValue::from_str(value).unwrap(),
    )
}

#[tokio::test]
async fn test_signed_webhook_is_forwarded() {
    let mut ctx = TestContext::new();
    let body = json!({ "channel_id": 1234, "content": "Build passed", "title": "CI" }).to_string();
    let (name, value) = signature_header(&sign(TEST_SECRET, body.as_bytes()).unwrap());

    let response = ctx.server.post("/webhook").add_header(name, value).text(body).await;

    response.assert_status(StatusCode::ACCEPTED);
    let ack: Value = response.json();
    assert_eq!(ack["status"], "accepted");

    let event = ctx.events.try_recv().expect("event should be forwarded");
    assert_eq!(
        event,
        WebhookEvent {
            channel_id: 1234,
            content: "Build passed".to_string(),
            title: Some("CI".to_string()),
        }
    );
}

#[tokio::test]
async fn test_missing_signature_is_rejected() {
    let mut ctx = TestContext::new();

    let response = ctx
        .server
        .post("/webhook")
        .text(json!({ "channel_id": 1, "content": "hi" }).to_string())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(ctx.events.try_recv().is_err());
}

#[tokio::test]
async fn test_signature_for_other_body_is_rejected() {
    let mut ctx = TestContext::new();
    let signed = sign(TEST_SECRET, b"{\"channel_id\": 1, \"content\": \"hi\"}").unwrap();
    let (name, value) = signature_header(&signed);

    let response = ctx
        .server
        .post("/webhook")
        .add_header(name, value)
        .text(json!({ "channel_id": 1, "content": "tampered" }).to_string())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(ctx.events.try_recv().is_err());
}

#[tokio::test]
async fn test_signature_with_wrong_secret_is_rejected() {
    let ctx = TestContext::new();
    let body = json!({ "channel_id": 1, "content": "hi" }).to_string();
    let (name, value) = signature_header(&sign("other-secret", body.as_bytes()).unwrap());

    let response = ctx.server.post("/webhook").add_header(name, value).text(body).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let ctx = TestContext::new();
    let body = "not json".to_string();
    let (name, value) = signature_header(&sign(TEST_SECRET, body.as_bytes()).unwrap());

    let response = ctx.server.post("/webhook").add_header(name, value).text(body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_content_is_bad_request() {
    let ctx = TestContext::new();
    let body = json!({ "channel_id": 1, "content": "   " }).to_string();
    let (name, value) = signature_header(&sign(TEST_SECRET, body.as_bytes()).unwrap());

    let response = ctx.server.post("/webhook").add_header(name, value).text(body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_closed_relay_is_service_unavailable() {
    let TestContext { server, events } = TestContext::new();
    drop(events);
    let body = json!({ "channel_id": 1, "content": "hi" }).to_string();
    let (name, value) = signature_header(&sign(TEST_SECRET, body.as_bytes()).unwrap());

    let response = server.post("/webhook").add_header(name, value).text(body).await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_full_relay_queue_is_service_unavailable() {
    let mut ctx = TestContext::with_capacity(1);
    let body = json!({ "channel_id": 1, "content": "hi" }).to_string();

    let (name, value) = signature_header(&sign(TEST_SECRET, body.as_bytes()).unwrap());
    let first = ctx.server.post("/webhook").add_header(name, value).text(body.clone()).await;
    first.assert_status(StatusCode::ACCEPTED);

    // Nothing drained the queue, so the next event is refused without waiting
    let (name, value) = signature_header(&sign(TEST_SECRET, body.as_bytes()).unwrap());
    let second = ctx.server.post("/webhook").add_header(name, value).text(body).await;
    second.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    assert!(ctx.events.try_recv().is_ok());
    assert!(ctx.events.try_recv().is_err());
}

#[tokio::test]
async fn test_content_over_message_limit_is_bad_request() {
    let mut ctx = TestContext::new();
    let body = json!({ "channel_id": 1, "content": "a".repeat(DISCORD_MESSAGE_LIMIT + 1) }).to_string();
    let (name, value) = signature_header(&sign(TEST_SECRET, body.as_bytes()).unwrap());

    let response = ctx.server.post("/webhook").add_header(name, value).text(body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.events.try_recv().is_err());
}

#[tokio::test]
async fn test_titled_content_may_use_embed_limit() {
    let mut ctx = TestContext::new();
    let content = "a".repeat(DISCORD_MESSAGE_LIMIT + 1);
    let body = json!({ "channel_id": 1, "content": content, "title": "Digest" }).to_string();
    let (name, value) = signature_header(&sign(TEST_SECRET, body.as_bytes()).unwrap());
    let response = ctx.server.post("/webhook").add_header(name, value).text(body).await;
    response.assert_status(StatusCode::ACCEPTED);
    assert!(ctx.events.try_recv().is_ok());

    let body = json!({
        "channel_id": 1,
        "content": "a".repeat(EMBED_DESCRIPTION_LIMIT + 1),
        "title": "Digest"
    })
    .to_string();
    let (name, value) = signature_header(&sign(TEST_SECRET, body.as_bytes()).unwrap());
    let response = ctx.server.post("/webhook").add_header(name, value).text(body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
