// HTTP error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

/// Application error with HTTP status code
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

/// Error response JSON structure
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
    status: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = Json(ErrorResponse {
            error: self.message,
            status: status.as_u16(),
        });

        (status, body).into_response()
    }
}

/// Convert pulselink_core errors to HTTP errors
impl From<pulselink_core::Error> for AppError {
    fn from(err: pulselink_core::Error) -> Self {
        use pulselink_core::Error;

        match err {
            Error::NotFound(msg) => Self::not_found(msg),
            // Duplicate room codes are a client mistake, reported as 400
            Error::AlreadyExists(msg) | Error::InvalidInput(msg) => Self::bad_request(msg),
            Error::Authorization(msg) => Self::forbidden(msg),
            Error::Database(e) => {
                tracing::error!("Database error: {}", e);
                Self::internal_server_error("Internal server error")
            }
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: AppError = pulselink_core::Error::NotFound("Room code not found".into()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: AppError =
            pulselink_core::Error::AlreadyExists("Room code already exists".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: AppError = pulselink_core::Error::InvalidInput("Field empty".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: AppError =
            pulselink_core::Error::Authorization("Name does not match".into()).into();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
