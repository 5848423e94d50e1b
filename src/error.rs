//! Unified error type for noctura-store
//!
//! Every operation boundary returns `AppError`; the `IntoResponse` impl maps
//! it to a JSON body `{"error": "..."}` with the matching HTTP status.
//! Storage detail is logged for operators and never exposed to the caller.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input; the operation was not attempted.
    #[error("{0}")]
    Validation(String),

    /// No resolved caller identity.
    #[error("Unauthorized")]
    Unauthorized,

    /// Missing resource, or a resource the caller does not own. The two are
    /// deliberately indistinguishable.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Requested quantity exceeds the product's current stock.
    #[error("Only {available} of this item available")]
    OutOfStock { available: i32 },

    /// Storage or other unexpected failure. Reported generically; the
    /// underlying detail is only logged.
    #[error("Internal server error")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::OutOfStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Database(e) = &self {
            tracing::error!(error = %e, "database error");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

/// Convenience alias for handler and service results.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("Item").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::OutOfStock { available: 2 }.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn not_found_never_says_forbidden() {
        let msg = AppError::NotFound("Cart item").to_string();
        assert_eq!(msg, "Cart item not found");
    }

    #[test]
    fn database_detail_is_not_leaked() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
