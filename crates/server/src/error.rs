use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use device_client::{AttemptFailure, DeviceClientError};
use phonebot::TaskError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error(transparent)]
    DeviceUnreachable(#[from] DeviceClientError),
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Unauthorized => ApiError::Unauthorized,
            other @ (TaskError::EmptyText | TaskError::MissingAction) => {
                ApiError::BadRequest(other.to_string())
            }
            TaskError::Device(e) => ApiError::DeviceUnreachable(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    ok: bool,
    error: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attempts: Vec<AttemptFailure>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::DeviceUnreachable(_) => (StatusCode::BAD_GATEWAY, "DeviceUnreachable"),
        };

        let (detail, attempts) = match self {
            ApiError::BadRequest(msg) => (msg, Vec::new()),
            // never hint at which identities would have been accepted
            ApiError::Unauthorized => ("Unauthorized".to_string(), Vec::new()),
            ApiError::DeviceUnreachable(e) => {
                tracing::error!("{}", e);
                (e.to_string(), e.attempts().to_vec())
            }
        };

        let body = ErrorBody {
            ok: false,
            error: error_type,
            detail,
            attempts,
        };
        (status_code, Json(body)).into_response()
    }
}
