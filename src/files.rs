//! Local file loading for attachments
//!
//! Turns a path on disk into a [`FileDescriptor`]: name, size, detected
//! MIME type and, when small enough, the bytes themselves.

use crate::attachments::FileDescriptor;
use crate::error::{Result, StudioError};
use bytes::Bytes;
use std::path::Path;

/// MIME type used when nothing more specific is known
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// WebP image
    Webp,
    /// GIF image
    Gif,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Returns the MIME type for this image format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }
}

/// Detects an image format from magic bytes
///
/// # Examples
///
/// ```
/// use studiochat::files::{detect_image_format, ImageFormat};
///
/// assert_eq!(detect_image_format(b"\x89PNG\r\n\x1a\n"), Some(ImageFormat::Png));
/// assert_eq!(detect_image_format(b"%PDF-1.7"), None);
/// ```
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(b"\x89PNG") {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(b"\xff\xd8\xff") {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"RIFF") && bytes.len() >= 12 && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::Webp)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.starts_with(b"BM") {
        Some(ImageFormat::Bmp)
    } else {
        None
    }
}

/// MIME type implied by a file extension, for the types the app knows
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "rtf" => "application/rtf",
        "odt" => "application/vnd.oasis.opendocument.text",
        _ => return None,
    };
    Some(mime)
}

/// Detects the MIME type of a file from its contents, then its extension
pub fn detect_mime_type(path: &Path, content: Option<&[u8]>) -> String {
    content
        .and_then(detect_image_format)
        .map(|format| format.mime_type())
        .or_else(|| mime_from_extension(path))
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

/// Describes the file at `path`
///
/// Content is read only when the file is no larger than
/// `max_content_bytes`; a larger file is described by metadata alone and
/// will be rejected as oversize when staged.
///
/// # Errors
///
/// Returns `StudioError::FileLoad` if the path is missing, is not a regular
/// file, or cannot be read.
pub async fn describe_path(path: &Path, max_content_bytes: u64) -> Result<FileDescriptor> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        StudioError::FileLoad(format!("Cannot read {}: {}", path.display(), e))
    })?;

    if !metadata.is_file() {
        return Err(StudioError::FileLoad(format!("{} is not a file", path.display())).into());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let size_bytes = metadata.len();

    let content = if size_bytes <= max_content_bytes {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            StudioError::FileLoad(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Some(Bytes::from(bytes))
    } else {
        tracing::debug!(path = %path.display(), size_bytes, "Skipping content of large file");
        None
    };

    let mime_type = detect_mime_type(path, content.as_deref());
    tracing::debug!(%name, size_bytes, %mime_type, "Described local file");

    Ok(FileDescriptor {
        name,
        size_bytes,
        mime_type,
        content,
    })
}

/// Formats a byte count the way attachment lists show it (`12.3 KB`)
///
/// # Examples
///
/// ```
/// use studiochat::files::format_size;
///
/// assert_eq!(format_size(2048), "2.0 KB");
/// assert_eq!(format_size(100), "0.1 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}
