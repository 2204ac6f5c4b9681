//! Backend module for studiochat
//!
//! This module contains the backend abstraction (the seam to the external
//! API) and its HTTP implementation.

pub mod base;
pub mod http;

pub use base::{
    Backend, BackendRequest, RequestError, TaskKind, INTERNAL_SERVER_ERROR_MESSAGE,
    NETWORK_ERROR_MESSAGE, UNKNOWN_ERROR_MESSAGE,
};
pub use http::HttpBackend;

use crate::config::BackendConfig;
use crate::error::Result;

/// Create the backend described by `config`
///
/// # Errors
///
/// Returns error if the HTTP client cannot be built
pub fn create_backend(config: &BackendConfig) -> Result<Box<dyn Backend>> {
    Ok(Box::new(HttpBackend::new(config)?))
}
