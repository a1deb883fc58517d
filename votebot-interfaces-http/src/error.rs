use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use votebot_application::{AppError, CycleError};

#[derive(Debug)]
pub enum HttpError {
    Unauthorized,
    BadRequest(String),
    BadGateway(String),
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Unauthorized => HttpError::Unauthorized,
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::Internal(err) => match err.downcast::<CycleError>() {
                Ok(cycle) => HttpError::from(cycle),
                Err(err) => HttpError::Internal(err.to_string()),
            },
        }
    }
}

/// Upstream failures (ranking site, Discord) are a gateway problem, not ours.
impl From<CycleError> for HttpError {
    fn from(value: CycleError) -> Self {
        match value {
            CycleError::Persistence(_) => HttpError::Internal(value.to_string()),
            _ => HttpError::BadGateway(value.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("bad request: {}", msg)),
            HttpError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
