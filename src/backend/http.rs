//! HTTP backend implementation
//!
//! Posts JSON bodies to the backend API with reqwest and maps transport
//! failures onto [`RequestError`] so the session can pick the right
//! user-facing message.

use crate::backend::{Backend, BackendRequest, RequestError};
use crate::config::BackendConfig;
use crate::error::{Result, StudioError};
use crate::normalizer::is_truthy;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Backend reached over HTTP
///
/// # Examples
///
/// ```no_run
/// use studiochat::backend::{Backend, BackendRequest, HttpBackend, TaskKind};
/// use studiochat::config::BackendConfig;
///
/// # async fn example() -> studiochat::error::Result<()> {
/// let backend = HttpBackend::new(&BackendConfig::default())?;
/// let request = BackendRequest::new(TaskKind::Planning, "A roguelike deckbuilder", "qwen");
/// let body = backend.send(&request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a new HTTP backend
    ///
    /// No request timeout is set unless `timeout_seconds` is configured;
    /// the transport default applies otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use studiochat::backend::HttpBackend;
    /// use studiochat::config::BackendConfig;
    ///
    /// let backend = HttpBackend::new(&BackendConfig::default()).unwrap();
    /// assert_eq!(backend.base_url(), "http://localhost:5000/api");
    /// ```
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(StudioError::Http)?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!("Initialized HTTP backend: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &BackendRequest) -> String {
        format!("{}{}", self.base_url, request.task.endpoint())
    }
}

/// Classify a reqwest send failure
fn classify_send_error(err: &reqwest::Error) -> RequestError {
    if err.is_timeout() {
        RequestError::Other(format!("Request timed out: {}", err))
    } else if err.is_connect() || err.is_request() {
        RequestError::Network(err.to_string())
    } else {
        RequestError::Other(err.to_string())
    }
}

/// Build the error for a non-2xx response from its status and body
///
/// A missing or falsy `error` field (`null`, `false`, `0`, `""`) counts as
/// absent.
fn error_from_response(status: u16, body: &str) -> RequestError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").cloned())
        .filter(is_truthy)
        .and_then(|e| match e {
            Value::String(s) => Some(s),
            Value::Object(ref map) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .or_else(|| Some(e.to_string())),
            other => Some(other.to_string()),
        });

    match message {
        Some(message) => RequestError::Api { status, message },
        None => RequestError::Status { status },
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send(&self, request: &BackendRequest) -> std::result::Result<Value, RequestError> {
        let url = self.url_for(request);
        let body = request.body();
        tracing::debug!(url = %url, body = %body, "Sending backend request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Backend request to {} failed: {}", url, e);
                classify_send_error(&e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!("Failed to read backend response body: {}", e);
            RequestError::Other(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            tracing::error!("Backend returned error {}: {}", status, text);
            return Err(error_from_response(status.as_u16(), &text));
        }

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to parse backend response: {}", e);
            RequestError::InvalidResponse(e.to_string())
        })?;

        tracing::debug!(response = %value, "Received backend response");
        Ok(value)
    }

    fn name(&self) -> String {
        self.base_url.clone()
    }
}
