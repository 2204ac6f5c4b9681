//! Backend trait and common request/response types
//!
//! The backend API is an external collaborator. This module defines the
//! request contract (one endpoint per task module, a task-specific primary
//! field plus `selectedModel`), the transport error type, and the
//! [`Backend`] trait every transport implements.

use crate::error::StudioError;
use crate::models::ModelContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Session error shown for a 500 response without an `error` field
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error, please try again later";

/// Session error shown when the backend cannot be reached
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network connection error, please check your network connection";

/// Session error shown when nothing more specific is known
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred while processing the request";

/// Task module a session talks to
///
/// Each module maps to a backend endpoint, the name of the primary request
/// field, the name of the task-specific response field, and a model
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Game planning and general chat
    Planning,
    /// Image/asset generation
    Assets,
    /// Code scaffold generation
    Development,
}

impl TaskKind {
    /// All task modules, in display order
    pub const ALL: [TaskKind; 3] = [TaskKind::Planning, TaskKind::Assets, TaskKind::Development];

    /// Endpoint path relative to the backend base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Planning => "/planning",
            Self::Assets => "/assets",
            Self::Development => "/development",
        }
    }

    /// Name of the primary request field carrying the user's text
    pub fn request_field(&self) -> &'static str {
        match self {
            Self::Planning => "taskDescription",
            Self::Assets => "modelData",
            Self::Development => "taskData",
        }
    }

    /// Name of the task-specific nested response field
    pub fn response_field(&self) -> &'static str {
        match self {
            Self::Planning => "plan",
            Self::Assets => "assets",
            Self::Development => "development",
        }
    }

    /// Model context the module selects from
    pub fn model_context(&self) -> ModelContext {
        match self {
            Self::Assets => ModelContext::Assets,
            Self::Planning | Self::Development => ModelContext::General,
        }
    }

    /// Preset prompts offered to the user for this module
    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            Self::Planning => &[
                "Give me an innovative game idea",
                "Recommend an interesting game mechanic",
                "How can I optimize game performance?",
            ],
            Self::Assets => &[
                "Design a game character, NPC or monster",
                "Design a game scene, map or sketch",
                "Design game UI: interface, icons and buttons",
            ],
            Self::Development => &[
                "Design a game manager with a main loop and state management",
                "Design a data system for game data storage",
                "Design an event system for game events and messaging",
            ],
        }
    }

    /// Short description shown in banners and listings
    pub fn description(&self) -> &'static str {
        match self {
            Self::Planning => "Game planning assistant",
            Self::Assets => "Asset generation",
            Self::Development => "Program development scaffolding",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planning => write!(f, "planning"),
            Self::Assets => write!(f, "assets"),
            Self::Development => write!(f, "development"),
        }
    }
}

impl FromStr for TaskKind {
    type Err = StudioError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planning" | "plan" => Ok(Self::Planning),
            "assets" | "asset" => Ok(Self::Assets),
            "development" | "dev" => Ok(Self::Development),
            other => Err(StudioError::UnknownModule(other.to_string())),
        }
    }
}

/// One outbound request to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRequest {
    /// Module the request is addressed to
    pub task: TaskKind,
    /// Submitted text
    pub input: String,
    /// Identifier sent as `selectedModel`
    pub selected_model: String,
}

impl BackendRequest {
    /// Creates a new request
    pub fn new(task: TaskKind, input: impl Into<String>, selected_model: impl Into<String>) -> Self {
        Self {
            task,
            input: input.into(),
            selected_model: selected_model.into(),
        }
    }

    /// JSON body for the request
    ///
    /// # Examples
    ///
    /// ```
    /// use studiochat::backend::{BackendRequest, TaskKind};
    /// use serde_json::json;
    ///
    /// let request = BackendRequest::new(TaskKind::Assets, "a red dragon", "gemini");
    /// assert_eq!(
    ///     request.body(),
    ///     json!({"modelData": "a red dragon", "selectedModel": "gemini"})
    /// );
    /// ```
    pub fn body(&self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(
            self.task.request_field().to_string(),
            Value::String(self.input.clone()),
        );
        body.insert(
            "selectedModel".to_string(),
            Value::String(self.selected_model.clone()),
        );
        Value::Object(body)
    }
}

/// Failure of a backend request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Non-2xx response whose body carried an `error` field
    #[error("Backend returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// The body's `error` message
        message: String,
    },

    /// Non-2xx response without an `error` field
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body could not be read as JSON
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// Any other failure
    #[error("{0}")]
    Other(String),
}

impl RequestError {
    /// Message exposed as the session error datum
    ///
    /// Precedence: the backend's own `error` message, then the fixed
    /// internal-server-error message for a bare 500, then the fixed network
    /// message for connectivity failures, then the raw message (or a fixed
    /// fallback when that is empty).
    ///
    /// # Examples
    ///
    /// ```
    /// use studiochat::backend::{RequestError, INTERNAL_SERVER_ERROR_MESSAGE};
    ///
    /// let err = RequestError::Status { status: 500 };
    /// assert_eq!(err.session_message(), INTERNAL_SERVER_ERROR_MESSAGE);
    ///
    /// let err = RequestError::Api { status: 400, message: "bad prompt".into() };
    /// assert_eq!(err.session_message(), "bad prompt");
    /// ```
    pub fn session_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Api { status, .. } | Self::Status { status } if *status == 500 => {
                INTERNAL_SERVER_ERROR_MESSAGE.to_string()
            }
            Self::Api { status, .. } | Self::Status { status } => {
                format!("Request failed with status code {}", status)
            }
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::InvalidResponse(message) | Self::Other(message) if message.is_empty() => {
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            Self::InvalidResponse(_) => self.to_string(),
            Self::Other(message) => message.clone(),
        }
    }
}

/// Transport to the backend API
///
/// Implementations send one request and return the raw JSON body. They do
/// not interpret the body; that is the normalizer's job.
///
/// # Examples
///
/// ```no_run
/// use studiochat::backend::{Backend, BackendRequest, RequestError};
/// use async_trait::async_trait;
/// use serde_json::{json, Value};
///
/// struct EchoBackend;
///
/// #[async_trait]
/// impl Backend for EchoBackend {
///     async fn send(&self, request: &BackendRequest) -> Result<Value, RequestError> {
///         Ok(json!({ "text": request.input.clone() }))
///     }
/// }
/// ```
#[async_trait]
pub trait Backend: Send + Sync {
    /// Sends `request` and returns the decoded response body
    ///
    /// # Errors
    ///
    /// Returns a `RequestError` for connectivity failures, non-2xx
    /// responses and unreadable bodies.
    async fn send(&self, request: &BackendRequest) -> std::result::Result<Value, RequestError>;

    /// Human-readable name used in logs and status output
    fn name(&self) -> String {
        "backend".to_string()
    }
}
