//! Configuration management for studiochat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::attachments::AcceptPredicate;
use crate::backend::TaskKind;
use crate::error::{Result, StudioError};
use crate::models::{self, ModelContext};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for studiochat
///
/// Holds the backend endpoint settings, session defaults and attachment
/// limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Session defaults
    #[serde(default)]
    pub session: SessionConfig,
    /// Attachment staging limits
    #[serde(default)]
    pub attachments: AttachmentConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the task endpoints are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional request timeout
    ///
    /// Unset by default, in which case the HTTP client's own default
    /// applies.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_user_agent() -> String {
    format!("studiochat/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Module a chat starts in (planning, assets, development)
    #[serde(default = "default_module")]
    pub default_module: String,

    /// Model selected in every context when a session starts
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Optional greeting seeded as the first assistant message
    #[serde(default)]
    pub welcome_message: Option<String>,
}

fn default_module() -> String {
    "planning".to_string()
}

fn default_model() -> String {
    models::DEFAULT_MODEL.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_module: default_module(),
            default_model: default_model(),
            welcome_message: None,
        }
    }
}

impl SessionConfig {
    /// Parsed default module
    ///
    /// # Errors
    ///
    /// Returns `StudioError::UnknownModule` if the name is not recognized
    pub fn module(&self) -> Result<TaskKind> {
        Ok(self.default_module.parse::<TaskKind>()?)
    }
}

/// Attachment staging limits
///
/// Accepted types use HTML `accept` syntax: exact MIME types, `type/*`
/// wildcards or `.ext` extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentConfig {
    /// Maximum size of a single attachment in bytes
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,

    /// Accepted types for the image channel
    #[serde(default = "default_image_types")]
    pub image_types: Vec<String>,

    /// Accepted types for the document channel
    #[serde(default = "default_document_types")]
    pub document_types: Vec<String>,
}

fn default_max_size_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_image_types() -> Vec<String> {
    vec!["image/*".to_string()]
}

fn default_document_types() -> Vec<String> {
    [
        ".pdf",
        ".doc",
        ".docx",
        ".txt",
        ".rtf",
        ".odt",
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "text/plain",
        "application/rtf",
        "application/vnd.oasis.opendocument.text",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size_bytes(),
            image_types: default_image_types(),
            document_types: default_document_types(),
        }
    }
}

impl AttachmentConfig {
    /// Predicate for the image channel
    pub fn image_predicate(&self) -> AcceptPredicate {
        AcceptPredicate::new(self.image_types.iter())
    }

    /// Predicate for the document channel
    pub fn document_predicate(&self) -> AcceptPredicate {
        AcceptPredicate::new(self.document_types.iter())
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(StudioError::Io)?;
        let config = serde_yaml::from_str(&contents).map_err(StudioError::Yaml)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("STUDIOCHAT_BACKEND_URL") {
            self.backend.base_url = url;
        }

        if let Ok(timeout) = std::env::var("STUDIOCHAT_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.backend.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid STUDIOCHAT_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(model) = std::env::var("STUDIOCHAT_DEFAULT_MODEL") {
            self.session.default_model = model;
        }

        if let Ok(module) = std::env::var("STUDIOCHAT_DEFAULT_MODULE") {
            self.session.default_module = module;
        }

        if let Ok(max) = std::env::var("STUDIOCHAT_MAX_ATTACHMENT_BYTES") {
            if let Ok(value) = max.parse() {
                self.attachments.max_size_bytes = value;
            } else {
                tracing::warn!("Invalid STUDIOCHAT_MAX_ATTACHMENT_BYTES: {}", max);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(url) = &cli.backend_url {
            tracing::debug!("Backend URL overridden from command line: {}", url);
            self.backend.base_url = url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.backend.base_url).map_err(|e| {
            StudioError::Config(format!(
                "Invalid backend.base_url '{}': {}",
                self.backend.base_url, e
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StudioError::Config(format!(
                "backend.base_url must use http or https, got '{}'",
                parsed.scheme()
            ))
            .into());
        }

        if self.backend.timeout_seconds == Some(0) {
            return Err(StudioError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        self.session.module()?;

        for context in ModelContext::ALL {
            if !models::is_available(context, &self.session.default_model) {
                return Err(StudioError::InvalidModel {
                    context,
                    model: self.session.default_model.clone(),
                }
                .into());
            }
        }

        if self.attachments.max_size_bytes == 0 {
            return Err(StudioError::Config(
                "attachments.max_size_bytes must be greater than 0".to_string(),
            )
            .into());
        }

        if self.attachments.image_types.is_empty() || self.attachments.document_types.is_empty()
        {
            return Err(StudioError::Config(
                "attachments.image_types and attachments.document_types cannot be empty"
                    .to_string(),
            )
            .into());
        }

        Ok(())
    }
}
