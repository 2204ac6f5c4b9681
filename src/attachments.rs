//! Attachment staging
//!
//! Files the user picks are validated against a size limit and the
//! accepted-type predicate of their upload channel, then held in a pending
//! set until the next submission. Image attachments get a preview held in a
//! [`PreviewStore`]; the preview handle is move-only and released exactly
//! once, when the attachment leaves the pending set.

use crate::config::AttachmentConfig;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upload channel an attachment was staged through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// Image channel
    Image,
    /// Document channel
    Document,
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// A file offered for staging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// File name as shown to the user
    pub name: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Detected or declared MIME type
    pub mime_type: String,
    /// File contents, when loaded
    pub content: Option<Bytes>,
}

impl FileDescriptor {
    /// Creates a descriptor without content
    pub fn new(name: impl Into<String>, size_bytes: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            content: None,
        }
    }

    /// Attaches content to the descriptor
    pub fn with_content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Identifier of a staged attachment, unique within a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(u64);

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AttachmentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// Handle to a preview held in a [`PreviewStore`]
///
/// Not `Clone`: there is exactly one handle per preview, and revoking it
/// consumes the handle.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewRef(u64);

/// Holder of attachment previews
#[derive(Debug, Default)]
pub struct PreviewStore {
    entries: HashMap<u64, Bytes>,
    next: u64,
}

impl PreviewStore {
    /// Stores `content` and returns the only handle to it
    pub fn insert(&mut self, content: Bytes) -> PreviewRef {
        self.next += 1;
        self.entries.insert(self.next, content);
        PreviewRef(self.next)
    }

    /// Reads the preview behind `preview`
    pub fn get(&self, preview: &PreviewRef) -> Option<&Bytes> {
        self.entries.get(&preview.0)
    }

    /// Releases the preview behind `preview`
    pub fn revoke(&mut self, preview: PreviewRef) {
        if self.entries.remove(&preview.0).is_none() {
            tracing::warn!(preview = preview.0, "Preview was already released");
        }
    }

    /// Number of previews currently held
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}

/// One entry of an accepted-type predicate
#[derive(Debug, Clone, PartialEq, Eq)]
enum AcceptEntry {
    Exact(String),
    Wildcard(String),
    Extension(String),
    Any,
}

/// Accepted-type predicate in HTML `accept` attribute syntax
///
/// # Examples
///
/// ```
/// use studiochat::attachments::AcceptPredicate;
///
/// let predicate = AcceptPredicate::new(["image/*", ".pdf"]);
/// assert!(predicate.accepts("cat.png", "image/png"));
/// assert!(predicate.accepts("brief.PDF", "application/octet-stream"));
/// assert!(!predicate.accepts("notes.txt", "text/plain"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptPredicate {
    entries: Vec<AcceptEntry>,
}

impl AcceptPredicate {
    /// Builds a predicate from `accept` entries; blank entries are ignored
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref().trim().to_lowercase();
                if entry.is_empty() {
                    None
                } else if entry == "*" || entry == "*/*" {
                    Some(AcceptEntry::Any)
                } else if entry.starts_with('.') {
                    Some(AcceptEntry::Extension(entry))
                } else if let Some(major) = entry.strip_suffix("/*") {
                    Some(AcceptEntry::Wildcard(format!("{}/", major)))
                } else {
                    Some(AcceptEntry::Exact(entry))
                }
            })
            .collect();
        Self { entries }
    }

    /// Returns true if a file with this name and MIME type is accepted
    ///
    /// MIME parameters (`; charset=...`) are ignored; comparisons are
    /// case-insensitive.
    pub fn accepts(&self, name: &str, mime_type: &str) -> bool {
        let mime = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let name = name.to_lowercase();

        self.entries.iter().any(|entry| match entry {
            AcceptEntry::Any => true,
            AcceptEntry::Exact(exact) => mime == *exact,
            AcceptEntry::Wildcard(prefix) => mime.starts_with(prefix.as_str()),
            AcceptEntry::Extension(ext) => name.ends_with(ext.as_str()),
        })
    }
}

impl fmt::Display for AcceptPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|entry| match entry {
                AcceptEntry::Any => "*/*".to_string(),
                AcceptEntry::Exact(s) | AcceptEntry::Extension(s) => s.clone(),
                AcceptEntry::Wildcard(prefix) => format!("{}*", prefix),
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Constraint a rejected file violated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Larger than the configured limit
    #[error("file is {size_bytes} bytes, the limit is {max_bytes} bytes")]
    Oversize {
        /// Size of the file
        size_bytes: u64,
        /// Configured limit
        max_bytes: u64,
    },

    /// Not accepted by the channel's predicate
    #[error("type '{mime_type}' is not accepted for {kind} uploads")]
    UnsupportedType {
        /// Type of the file
        mime_type: String,
        /// Channel it was offered to
        kind: AttachmentKind,
    },
}

/// A file that could not be staged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRejection {
    /// Name of the rejected file
    pub name: String,
    /// Violated constraint
    pub reason: RejectionReason,
}

impl fmt::Display for AttachmentRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Outcome of one [`AttachmentManager::stage`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Ids of the staged attachments, in input order
    pub staged: Vec<AttachmentId>,
    /// One entry per rejected file, in input order
    pub rejected: Vec<AttachmentRejection>,
}

impl StageReport {
    /// True if every offered file was staged
    pub fn all_staged(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Display metadata of an attachment, carried by messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSummary {
    /// Attachment id
    pub id: AttachmentId,
    /// File name
    pub name: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// MIME type
    pub mime_type: String,
    /// Upload channel
    pub kind: AttachmentKind,
}

/// A staged attachment
#[derive(Debug)]
pub struct Attachment {
    id: AttachmentId,
    name: String,
    size_bytes: u64,
    mime_type: String,
    kind: AttachmentKind,
    preview: Option<PreviewRef>,
}

impl Attachment {
    /// Attachment id
    pub fn id(&self) -> AttachmentId {
        self.id
    }

    /// File name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// MIME type
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Upload channel
    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    /// True if a preview is held for this attachment
    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }

    /// Display metadata
    pub fn summary(&self) -> AttachmentSummary {
        AttachmentSummary {
            id: self.id,
            name: self.name.clone(),
            size_bytes: self.size_bytes,
            mime_type: self.mime_type.clone(),
            kind: self.kind,
        }
    }
}

/// Pending set of staged attachments
///
/// Dropping the manager releases every preview it still holds.
///
/// # Examples
///
/// ```
/// use studiochat::attachments::{AttachmentKind, AttachmentManager, FileDescriptor};
///
/// let mut manager = AttachmentManager::default();
/// let report = manager.stage(
///     vec![
///         FileDescriptor::new("sprite.png", 2048, "image/png").with_content(vec![0u8; 4]),
///         FileDescriptor::new("huge.png", 50 * 1024 * 1024, "image/png"),
///     ],
///     AttachmentKind::Image,
/// );
/// assert_eq!(report.staged.len(), 1);
/// assert_eq!(report.rejected.len(), 1);
/// assert_eq!(manager.pending().len(), 1);
/// ```
#[derive(Debug)]
pub struct AttachmentManager {
    max_size_bytes: u64,
    image_accept: AcceptPredicate,
    document_accept: AcceptPredicate,
    pending: Vec<Attachment>,
    previews: PreviewStore,
    next_id: u64,
}

impl Default for AttachmentManager {
    fn default() -> Self {
        Self::new(&AttachmentConfig::default())
    }
}

impl AttachmentManager {
    /// Creates an empty manager with the configured limits
    pub fn new(config: &AttachmentConfig) -> Self {
        Self {
            max_size_bytes: config.max_size_bytes,
            image_accept: config.image_predicate(),
            document_accept: config.document_predicate(),
            pending: Vec::new(),
            previews: PreviewStore::default(),
            next_id: 0,
        }
    }

    /// Maximum accepted size in bytes
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Predicate used for `kind`
    pub fn predicate(&self, kind: AttachmentKind) -> &AcceptPredicate {
        match kind {
            AttachmentKind::Image => &self.image_accept,
            AttachmentKind::Document => &self.document_accept,
        }
    }

    fn check(&self, descriptor: &FileDescriptor, kind: AttachmentKind) -> Option<RejectionReason> {
        if descriptor.size_bytes > self.max_size_bytes {
            return Some(RejectionReason::Oversize {
                size_bytes: descriptor.size_bytes,
                max_bytes: self.max_size_bytes,
            });
        }

        if !self
            .predicate(kind)
            .accepts(&descriptor.name, &descriptor.mime_type)
        {
            return Some(RejectionReason::UnsupportedType {
                mime_type: descriptor.mime_type.clone(),
                kind,
            });
        }

        None
    }

    /// Validates and stages `descriptors` through the `kind` channel
    ///
    /// Each file is checked on its own, size first, then type. Passing
    /// files are appended to the pending set; failing files are reported
    /// and never enter it.
    pub fn stage<I>(&mut self, descriptors: I, kind: AttachmentKind) -> StageReport
    where
        I: IntoIterator<Item = FileDescriptor>,
    {
        let mut report = StageReport::default();

        for descriptor in descriptors {
            if let Some(reason) = self.check(&descriptor, kind) {
                tracing::warn!(name = %descriptor.name, %reason, "Attachment rejected");
                report.rejected.push(AttachmentRejection {
                    name: descriptor.name,
                    reason,
                });
                continue;
            }

            self.next_id += 1;
            let id = AttachmentId(self.next_id);
            let preview = match (kind, descriptor.content) {
                (AttachmentKind::Image, Some(content)) => Some(self.previews.insert(content)),
                _ => None,
            };

            tracing::debug!(%id, name = %descriptor.name, %kind, "Attachment staged");
            self.pending.push(Attachment {
                id,
                name: descriptor.name,
                size_bytes: descriptor.size_bytes,
                mime_type: descriptor.mime_type,
                kind,
                preview,
            });
            report.staged.push(id);
        }

        report
    }

    /// Removes `id` from the pending set and releases its preview
    ///
    /// Returns false, without side effects, for unknown ids.
    pub fn release(&mut self, id: AttachmentId) -> bool {
        let Some(index) = self.pending.iter().position(|a| a.id == id) else {
            tracing::debug!(%id, "Release of unknown attachment ignored");
            return false;
        };

        let attachment = self.pending.remove(index);
        if let Some(preview) = attachment.preview {
            self.previews.revoke(preview);
        }
        true
    }

    /// Releases every preview and empties the pending set
    pub fn clear_all(&mut self) {
        for attachment in self.pending.drain(..) {
            if let Some(preview) = attachment.preview {
                self.previews.revoke(preview);
            }
        }
    }

    /// Pending attachments in staging order
    pub fn pending(&self) -> &[Attachment] {
        &self.pending
    }

    /// Display metadata of the pending set, in staging order
    pub fn summaries(&self) -> Vec<AttachmentSummary> {
        self.pending.iter().map(Attachment::summary).collect()
    }

    /// True if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of staged attachments
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Preview content of a pending attachment
    pub fn preview(&self, id: AttachmentId) -> Option<&Bytes> {
        self.pending
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| a.preview.as_ref())
            .and_then(|p| self.previews.get(p))
    }

    /// Number of previews currently held
    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }
}

impl Drop for AttachmentManager {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(count = self.pending.len(), "Releasing pending attachments");
        }
        self.clear_all();
    }
}
