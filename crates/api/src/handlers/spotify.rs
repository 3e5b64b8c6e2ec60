use axum::extract::Query;
use serde::Deserialize;
use tracing::{info, warn};

/// Query parameters the playlist service appends to the redirect URI.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Landing page for the OAuth redirect.
///
/// The bot authenticates with a long-lived refresh token, so the code is not
/// exchanged here; the page only tells the operator whether consent worked.
pub async fn spotify_callback(Query(params): Query<CallbackParams>) -> String {
    if let Some(error) = params.error {
        warn!("Spotify authorization failed: {}", error);
        return format!("Error during Spotify authentication: {}", error);
    }

    if params.code.is_some() {
        info!("Spotify authorization code received");
    }
    "Spotify authentication successful. You can close this page.".to_string()
}
