//! studiochat - game studio assistant chat library
//!
//! This library provides the conversation orchestration core behind the
//! studiochat CLI: staging attachments, selecting backend models, sending
//! submissions, normalizing backend replies and keeping the history.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Conversation store and the session orchestrator
//! - `attachments`: Attachment validation, staging and previews
//! - `models`: Per-context model lists and selection
//! - `normalizer`: Mapping of raw backend replies to one payload shape
//! - `backend`: Backend abstraction and its HTTP implementation
//! - `files`: Loading local files as attachment descriptors
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use studiochat::backend::{create_backend, TaskKind};
//! use studiochat::session::SessionOrchestrator;
//! use studiochat::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let backend = create_backend(&config.backend)?;
//!     let mut session = SessionOrchestrator::from_config(TaskKind::Planning, &config)?;
//!     session.set_draft("Give me an innovative game idea");
//!     session.submit(backend.as_ref()).await;
//!
//!     for message in session.history() {
//!         println!("{:?}: {}", message.author, message.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod attachments;
pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod files;
pub mod models;
pub mod normalizer;
pub mod session;

// Re-export commonly used types
pub use attachments::{AttachmentKind, AttachmentManager, FileDescriptor};
pub use backend::{Backend, HttpBackend, RequestError, TaskKind};
pub use config::Config;
pub use error::{Result, StudioError};
pub use models::{ModelContext, ModelRegistry};
pub use normalizer::{normalize, NormalizedPayload};
pub use session::{ConversationStore, Message, SessionOrchestrator};

#[cfg(test)]
pub mod test_utils;
