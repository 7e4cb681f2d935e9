//! API error types with HTTP response mapping.
//!
//! Every failure converts to a JSON envelope at this boundary; nothing
//! propagates to a process-level crash and nothing is retried.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use order_store::StoreError;

/// API-level error type that maps to HTTP responses.
///
/// Invalid input and persistence failure are distinct variants even though
/// both render as a 500: the wire contract collapses them, the internal
/// taxonomy does not.
#[derive(Debug)]
pub enum ApiError {
    /// Listing when no orders exist. The contract treats this as an error
    /// condition rather than an empty success.
    NoOrders,
    /// Requested order does not exist.
    OrderNotFound,
    /// PATCH target does not exist; the response echoes the requested id.
    UpdateTargetMissing(i64),
    /// Creation payload failed validation before the store was touched.
    InvalidCreatePayload(String),
    /// The store rejected the creation transaction.
    CreateFailed(StoreError),
    /// The store rejected the status update.
    UpdateFailed(StoreError),
    /// Unclassified server failure on a read path.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NoOrders => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "message": "There are no orders." }),
            ),
            ApiError::OrderNotFound => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "message": "Order not found." }),
            ),
            ApiError::UpdateTargetMissing(order_id) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({
                    "data": { "order_id": order_id },
                    "message": "Order not found.",
                }),
            ),
            ApiError::InvalidCreatePayload(detail) => {
                tracing::warn!(error = %detail, "rejected order creation payload");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    creation_failure_body(&detail),
                )
            }
            ApiError::CreateFailed(err) => {
                tracing::error!(error = %err, "order creation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    creation_failure_body(&err.to_string()),
                )
            }
            ApiError::UpdateFailed(err) => {
                tracing::error!(error = %err, "order update failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "message": "An error occurred updating the order.",
                        "error": err.to_string(),
                    }),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "message": "An unexpected error occurred.",
                        "error": msg,
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn creation_failure_body(detail: &str) -> serde_json::Value {
    serde_json::json!({
        "message": "An error occurred creating the order.",
        "error": detail,
    })
}
