//! Forwarding to downstream services.
//!
//! The teacher service exposes part of the student and badges APIs on its own
//! address. Calls are relayed as-is: the downstream status and JSON body come back
//! unchanged, and anything that is not JSON becomes a `502 Bad Gateway`.

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;

/// A downstream response that parsed as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Relayed {
    pub status: StatusCode,
    pub body: Value,
}

/// One downstream service reached over HTTP.
#[derive(Debug, Clone)]
pub struct Upstream {
    http: reqwest::Client,
    base_url: String,
    name: &'static str,
}

impl Upstream {
    /// Create a client for the service at `base_url`.
    ///
    /// `name` appears in error messages returned to callers.
    pub fn new(
        name: &'static str,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            name,
        })
    }

    /// Build the downstream URL from raw path segments, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            tracing::error!("Invalid base URL for {}: {}", self.name, e);
            self.unreachable()
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                tracing::error!("Base URL for {} cannot carry a path", self.name);
                self.unreachable()
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// `GET` the given path and relay the result.
    pub async fn get(&self, segments: &[&str]) -> Result<Relayed, AppError> {
        self.send::<()>(Method::GET, segments, None).await
    }

    /// `POST` a JSON body to the given path and relay the result.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Relayed, AppError> {
        self.send(Method::POST, segments, Some(body)).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Relayed, AppError> {
        let url = self.url(segments)?;

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Error calling {} {} {}: {}", self.name, method, url, e);
            self.unreachable()
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!("Error reading response from {} {}: {}", self.name, url, e);
            self.unreachable()
        })?;

        relay(self.name, status.as_u16(), text)
    }

    fn unreachable(&self) -> AppError {
        AppError::BadGateway {
            message: format!("Could not reach {}", self.name),
            body: None,
        }
    }
}

/// Turn a downstream status and raw body into a relayed response.
///
/// Bodies that are not JSON are reported as a bad gateway carrying the raw text.
pub fn relay(name: &str, status: u16, text: String) -> Result<Relayed, AppError> {
    let body = match serde_json::from_str(&text) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Non-JSON response from {} (status {}): {}", name, status, e);
            return Err(AppError::BadGateway {
                message: format!("Bad response from {}", name),
                body: Some(text),
            });
        }
    };

    let status = StatusCode::from_u16(status).map_err(|_| AppError::BadGateway {
        message: format!("Bad response from {}", name),
        body: Some(text),
    })?;

    Ok(Relayed { status, body })
}
