//! API error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;
use crate::NotesmithError;

/// An error turned into a JSON `{"error": ...}` body with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn no_file() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "No file provided")
    }

    pub fn unsupported_format() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Unsupported file format")
    }

    pub fn validation(error: NotesmithError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error.to_string())
    }

    pub fn timeout(seconds: u64) -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            format!("Extraction did not finish within {} seconds", seconds),
        )
    }

    pub fn notes_failed(error: NotesmithError) -> Self {
        let cause = match &error {
            NotesmithError::Service { message, source } => match source {
                Some(source) => format!("{}: {}", message, source),
                None => message.clone(),
            },
            other => other.to_string(),
        };
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error generating study notes: {}", cause),
        )
    }

    pub fn internal(error: NotesmithError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
    }
}

impl From<NotesmithError> for ApiError {
    fn from(error: NotesmithError) -> Self {
        match error {
            NotesmithError::UnsupportedFormat(_) => Self::unsupported_format(),
            NotesmithError::Validation { .. } => Self::validation(error),
            NotesmithError::Service { .. } => Self::notes_failed(error),
            other => Self::internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.message);
        } else {
            tracing::warn!("{}", self.message);
        }
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}
