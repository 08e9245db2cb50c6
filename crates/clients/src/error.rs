//! Client error types.

use thiserror::Error;

/// Errors from the upstream collaborator services.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("invalid base URL: {0}")]
    Url(String),
}

impl ClientError {
    /// Whether the remote positively reported the subject as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(ClientError::NotFound("x".to_string()).is_not_found());
        assert!(
            !ClientError::Status {
                status: 500,
                body: "boom".to_string()
            }
            .is_not_found()
        );
    }
}
