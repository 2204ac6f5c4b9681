//! Error types for studiochat
//!
//! This module defines the crate-wide error type, using `thiserror` for
//! ergonomic error handling. Backend transport failures have their own
//! type, [`crate::backend::RequestError`], which converts into
//! [`StudioError::Request`].

use crate::backend::RequestError;
use crate::models::ModelContext;
use thiserror::Error;

/// Main error type for studiochat operations
///
/// Covers configuration loading, model selection, attachment validation,
/// backend requests and the I/O done by the terminal front end.
#[derive(Error, Debug)]
pub enum StudioError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A model identifier outside the context's allowed set was selected
    #[error("Invalid model '{model}' for {context} context")]
    InvalidModel {
        /// The context the selection was attempted in
        context: ModelContext,
        /// The rejected identifier
        model: String,
    },

    /// Attachment validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend request failures
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// File loading errors for attachments picked from disk
    #[error("File load error: {0}")]
    FileLoad(String),

    /// Unknown task module name
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for studiochat operations
///
/// Uses `anyhow::Error` so callers get rich context; typed errors are
/// recovered with `downcast_ref::<StudioError>()`.
pub type Result<T> = anyhow::Result<T>;
