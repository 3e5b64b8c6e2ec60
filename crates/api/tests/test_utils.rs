use std::{sync::Arc, time::Duration};

use axum_test::TestServer;
use medley_api::{ApiState, WebhookSink, build_router};
use medley_core::models::webhook::WebhookEvent;
use tokio::sync::mpsc;

pub const TEST_SECRET: &str = "test-webhook-secret";

pub struct TestContext {
    pub server: TestServer,
    pub events: mpsc::Receiver<WebhookEvent>,
}

impl TestContext {
    /// Server with the webhook endpoint enabled.
    pub fn new() -> Self {
        Self::with_capacity(8)
    }

    /// Like [`TestContext::new`] with a relay queue of `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, events) = mpsc::channel(capacity);
        let state = Arc::new(ApiState {
            webhook: Some(WebhookSink {
                secret: TEST_SECRET.to_string(),
                sender,
            }),
        });

        Self {
            server: build_server(state),
            events,
        }
    }
}

/// Server started without a webhook secret.
pub fn server_without_webhook() -> TestServer {
    build_server(Arc::new(ApiState { webhook: None }))
}

fn build_server(state: Arc<ApiState>) -> TestServer {
    let app = build_router(state, Duration::from_secs(5));
    TestServer::new(app).expect("Failed to start test server")
}
