/// Error types for Blog Service
///
/// Store-level failures are kept apart from request-level failures so the
/// coordinator can tell "document missing" from "store call failed".
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;
use uuid::Uuid;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for raw store calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure of the underlying document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Target document does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Underlying store call failed
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),

    /// Comment was inserted but linking it to its post failed
    #[error("comment {comment_id} created but not linked to its post: {source}")]
    OrphanedComment {
        comment_id: Uuid,
        #[source]
        source: StoreError,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn post_not_found() -> Self {
        AppError::NotFound("Post".to_string())
    }

    /// Message exposed to API clients. Store details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(_) | AppError::Validation(_) | AppError::Unauthorized(_) => {
                self.to_string()
            }
            AppError::StoreFailure(_)
            | AppError::OrphanedComment { .. }
            | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::StoreFailure(_)
            | AppError::OrphanedComment { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "message": self.public_message(),
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StoreFailure(StoreError::Database(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_message() {
        let err = AppError::post_not_found();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Post not found");
    }

    #[test]
    fn store_details_are_not_exposed() {
        let err = AppError::OrphanedComment {
            comment_id: Uuid::new_v4(),
            source: StoreError::InvalidQuery("offset must not be negative".into()),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }
}
