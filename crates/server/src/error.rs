//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reaper_deleter::DeleteError;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Delete(#[from] DeleteError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Delete(DeleteError::ItemNotFound(_)) => "not_found",
            // Everything the deletion engine fails on surfaces as an
            // internal classification with the cause text embedded.
            Self::Delete(_) => "internal",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Delete(DeleteError::ItemNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Delete(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reaper_core::ItemIdentity;

    #[test]
    fn item_not_found_maps_to_404() {
        let err = ApiError::Delete(DeleteError::ItemNotFound(ItemIdentity::new("art", "x")));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn upstream_maps_to_internal() {
        let err = ApiError::Delete(DeleteError::Upstream {
            context: "cannot get cache art/x/thumb/w=1".to_string(),
            source: reaper_clients::ClientError::Status {
                status: 503,
                body: "overloaded".to_string(),
            },
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "internal");
        // The cause text is embedded in the message.
        assert!(err.to_string().contains("overloaded"));
    }
}
