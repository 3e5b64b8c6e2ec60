//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! endpoint fails the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medley_core::errors::MedleyError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use medley_api::middleware::error_handling::AppError;
/// use medley_core::errors::MedleyError;
///
/// async fn handler(secret: Option<String>) -> Result<Json<String>, AppError> {
///     let secret = secret.ok_or_else(|| MedleyError::NotFound("No secret".to_string()))?;
///     Ok(Json(secret))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub MedleyError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MedleyError::NotFound(_) => StatusCode::NOT_FOUND,
            MedleyError::Validation(_) => StatusCode::BAD_REQUEST,
            MedleyError::Authentication(_) => StatusCode::UNAUTHORIZED,
            MedleyError::Authorization(_) => StatusCode::FORBIDDEN,
            MedleyError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            MedleyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            MedleyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `MedleyResult` inside handlers returning `Result<T, AppError>`.
impl From<MedleyError> for AppError {
    fn from(err: MedleyError) -> Self {
        AppError(err)
    }
}

/// Wraps `eyre` failures as upstream errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(MedleyError::Upstream(err))
    }
}

/// Maps a MedleyError to an HTTP response
pub fn map_error(err: MedleyError) -> Response {
    AppError(err).into_response()
}
