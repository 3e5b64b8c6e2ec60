mod test_utils;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::server_without_webhook;

#[tokio::test]
async fn test_root_reports_running() {
    let server = server_without_webhook();

    let response = server.get("/").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "Discord Bot is Running!");
}

#[tokio::test]
async fn test_health_check() {
    let server = server_without_webhook();

    let body: Value = server.get("/health").await.json();

    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_version_matches_crate() {
    let server = server_without_webhook();

    let body: Value = server.get("/version").await.json();

    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_callback_reports_success() {
    let server = server_without_webhook();

    let response = server.get("/callback").add_query_param("code", "abc").await;

    response.assert_status_ok();
    assert_eq!(
        response.text(),
        "Spotify authentication successful. You can close this page."
    );
}

#[tokio::test]
async fn test_callback_reports_error() {
    let server = server_without_webhook();

    let response = server
        .get("/callback")
        .add_query_param("error", "access_denied")
        .await;

    assert_eq!(
        response.text(),
        "Error during Spotify authentication: access_denied"
    );
}

#[tokio::test]
async fn test_webhook_route_absent_without_secret() {
    let server = server_without_webhook();

    let response = server.post("/webhook").text("{}").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
