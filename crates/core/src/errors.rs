use thiserror::Error;

#[derive(Error, Debug)]
pub enum MedleyError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Upstream service error: {0}")]
    Upstream(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl MedleyError {
    /// Text shown to a chat user when a command fails with this error.
    ///
    /// Caller-facing variants keep their message; anything that went wrong
    /// behind the scenes collapses to a generic apology.
    pub fn apology(&self) -> String {
        match self {
            MedleyError::NotFound(message) | MedleyError::Validation(message) => message.clone(),
            MedleyError::Authentication(_) | MedleyError::Authorization(_) => {
                "You don't have permission to do that.".to_string()
            }
            MedleyError::Unavailable(_) | MedleyError::Upstream(_) | MedleyError::Internal(_) => {
                "Sorry, couldn't process that request.".to_string()
            }
        }
    }
}

pub type MedleyResult<T> = Result<T, MedleyError>;
