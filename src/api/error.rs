//! Error-to-response mapping.

use crate::error::ErrorKind;
use crate::task::services::TaskLifecycleError;
use crate::user::services::UserDirectoryError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failure returned by a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed resource does not exist. Holds the resource name.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The request was malformed or not permitted.
    #[error("{0}")]
    BadRequest(String),
    /// An unexpected failure in the store or a dependency.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::Validation | ErrorKind::InvalidOperation => Self::BadRequest(message),
            ErrorKind::Infrastructure => Self::Internal(message),
        }
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

impl From<UserDirectoryError> for ApiError {
    fn from(err: UserDirectoryError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{resource} not found") })),
            )
                .into_response(),
            Self::BadRequest(message) => {
                tracing::debug!(error = %message, "rejected request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Self::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error", "message": message })),
                )
                    .into_response()
            }
        }
    }
}
