use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the inventory store. Every variant is raised before the
/// enclosing transaction commits, so none of them leaves partial state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error("insufficient quantity for product {product_id}: requested {requested}, available {available}")]
    InsufficientQuantity {
        product_id: i64,
        requested: i64,
        available: i64,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("invalid path: {0}")]
    Path(#[from] PathRejection),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Store(StoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            ApiError::Body(rejection) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                rejection.body_text(),
            ),
            ApiError::Path(rejection) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                rejection.body_text(),
            ),
            ApiError::Store(err @ StoreError::ProductNotFound(_)) => {
                (StatusCode::NOT_FOUND, "product_not_found", err.to_string())
            }
            ApiError::Store(err @ StoreError::InsufficientQuantity { .. }) => (
                StatusCode::BAD_REQUEST,
                "insufficient_quantity",
                err.to_string(),
            ),
            ApiError::Store(StoreError::Database(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(StoreError::Database(e)) = &self {
            tracing::error!(error = %e, "database failure while handling request");
        }

        let (status, code, message) = self.parts();
        (
            status,
            Json(json!({
                "error": code,
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_store_errors_to_status_codes() {
        let cases = [
            (StoreError::Validation("name must not be empty".into()), StatusCode::BAD_REQUEST),
            (StoreError::ProductNotFound(9), StatusCode::NOT_FOUND),
            (
                StoreError::InsufficientQuantity {
                    product_id: 1,
                    requested: 5,
                    available: 2,
                },
                StatusCode::BAD_REQUEST,
            ),
            (StoreError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn database_details_are_not_exposed() {
        let (_, code, message) = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut)).parts();
        assert_eq!(code, "internal_error");
        assert_eq!(message, "internal server error");
    }
}
