//! REST API module.
//!
//! Handlers for all four services. Success bodies are the bare JSON resource; failures
//! are `{ "error": "<message>" }` via [`AppError`].

mod badges;
mod proxy;
mod students;
mod tasks;
mod teachers;

pub use badges::*;
pub use proxy::*;
pub use students::*;
pub use tasks::*;
pub use teachers::*;

use std::any::Any;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AppError, ErrorResponse};

/// Response type for local handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// GET /health - Liveness check.
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    tracing::debug!("No route for {}", uri);
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("not found")))
}

/// Last-resort response when a handler panics.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Unhandled error: {}", detail);

    AppError::Internal("internal_server_error".to_string()).into_response()
}

/// JSON request body extractor.
///
/// Unlike [`Json`], it does not insist on a `Content-Type` header. An empty body, or
/// valid JSON that is not an object, reads as `{}` so that missing fields are reported
/// by the handler's own validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let invalid = |e: serde_json::Error| {
            tracing::debug!("Rejected request body: {}", e);
            AppError::BadRequest("invalid JSON body".to_string())
        };

        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            match serde_json::from_slice::<Value>(&bytes).map_err(invalid)? {
                Value::Object(fields) => Value::Object(fields),
                other => {
                    tracing::debug!("Request body is not an object: {}", other);
                    Value::Object(Map::new())
                }
            }
        };

        serde_json::from_value(value).map(JsonBody).map_err(invalid)
    }
}
