//! Error handling module for the classroom services.
//!
//! Every failure is rendered as `{ "error": "<message>" }` with a matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::StoreError;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Missing or invalid required field
    BadRequest(String),
    /// Unknown key
    NotFound(String),
    /// Collection file could not be read, parsed or written.
    /// `message` is what the caller sees; `source` is only logged.
    Storage { message: String, source: StoreError },
    /// Downstream service unreachable or answered with something other than JSON
    BadGateway {
        message: String,
        body: Option<String>,
    },
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Wrap a storage failure with the message shown to the caller.
    pub fn storage(message: impl Into<String>) -> impl FnOnce(StoreError) -> AppError {
        let message = message.into();
        move |source| AppError::Storage { message, source }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::Storage { message, .. } => message,
            AppError::BadGateway { message, .. } => message,
            AppError::Internal(msg) => msg,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Storage { message, source } => write!(f, "{}: {}", message, source),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(source: StoreError) -> Self {
        AppError::Storage {
            message: "Storage error".to_string(),
            source,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Raw downstream body, only for bad gateway responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            body: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let AppError::Storage { message, source } = &self {
            tracing::error!("{}: {}", message, source);
        }

        let body = match self {
            AppError::BadGateway { message, body } => ErrorResponse {
                error: message,
                body,
            },
            other => ErrorResponse::new(other.message()),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("login required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadGateway {
                message: "Could not reach student-service".into(),
                body: None
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_storage_error_hides_cause_from_message() {
        let source = StoreError::Write {
            path: PathBuf::from("/srv/data/students.json"),
            message: "disk full".into(),
        };
        let err = AppError::storage("Could not add badge")(source);

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Could not add badge");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_error_body_shape() {
        let plain = serde_json::to_value(ErrorResponse::new("not found")).unwrap();
        assert_eq!(plain, serde_json::json!({ "error": "not found" }));

        let gateway = serde_json::to_value(ErrorResponse {
            error: "Bad response from badges-service".into(),
            body: Some("<html>".into()),
        })
        .unwrap();
        assert_eq!(gateway["body"], "<html>");
    }
}
