use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::CounterError;

/// Transport-level rendering of store outcomes. Conflict and not-found
/// responses echo the counter name (and the current value for conflicts), so
/// clients can react without a follow-up read.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Conflict { name: String, value: i64 },
    NotFound { name: String },
    Internal(String),
}

impl From<CounterError> for ApiError {
    fn from(e: CounterError) -> Self {
        match e {
            CounterError::AlreadyExists { name, value } => Self::Conflict { name, value },
            CounterError::NotFound { name } => Self::NotFound { name },
            CounterError::Db(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": msg})),
            )
                .into_response(),
            Self::Conflict { name, value } => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({
                    "error": "Counter already exists",
                    "name": name,
                    "value": value,
                })),
            )
                .into_response(),
            Self::NotFound { name } => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": "Counter not found",
                    "name": name,
                })),
            )
                .into_response(),
            Self::Internal(msg) => {
                error!(error = %msg, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": msg})),
                )
                    .into_response()
            }
        }
    }
}
