//! Test utilities for studiochat
//!
//! Temporary file helpers and assertion helpers shared by unit tests.

use crate::config::Config;
use crate::error::StudioError;
use std::path::PathBuf;
use tempfile::TempDir;

/// Minimal valid PNG header, enough for type detection
pub const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration pointing at `base_url`
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.backend.base_url = base_url.to_string();
    config
}

/// Downcast an error to `StudioError`
pub fn studio_error(err: &anyhow::Error) -> Option<&StudioError> {
    err.downcast_ref::<StudioError>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::describe_path;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", b"content");
        assert_eq!(std::fs::read(&path).unwrap(), b"content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: crate::error::Result<()> =
            Err(StudioError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_test_config_is_valid() {
        let config = test_config("http://127.0.0.1:8080/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_studio_error_downcast() {
        let err: anyhow::Error = StudioError::UnknownModule("music".to_string()).into();
        assert!(matches!(studio_error(&err), Some(StudioError::UnknownModule(_))));
    }

    #[tokio::test]
    async fn test_png_header_is_detected() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "tiny.png", PNG_HEADER);
        let descriptor = describe_path(&path, 1024).await.unwrap();
        assert_eq!(descriptor.mime_type, "image/png");
    }
}
