//! Conversation history for one session
//!
//! An append-only, ordered list of messages. The only in-place mutation is
//! the single transition of an outstanding assistant message from pending
//! to delivered or failed.

use crate::attachments::AttachmentSummary;
use crate::normalizer::{Media, NormalizedPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::{Generator, Ulid};

/// Content shown in an assistant message whose request failed
pub const APOLOGY_MESSAGE: &str = "Sorry, something went wrong. Please try again later.";

/// Unique message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Ulid);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    /// The person at the keyboard
    User,
    /// The backend
    Assistant,
}

/// Delivery state of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Waiting for the backend
    Pending,
    /// Recorded or received
    Delivered,
    /// The request behind it failed
    Failed,
}

impl DeliveryState {
    /// True for delivered and failed
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique id
    pub id: MessageId,
    /// Author
    pub author: Author,
    /// Text body, possibly empty
    pub content: String,
    /// Attachments sent with the message, in staging order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentSummary>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Delivery state
    pub delivery_state: DeliveryState,
    /// Generated media, assistant messages only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

/// Ordered message history
///
/// # Examples
///
/// ```
/// use studiochat::session::{Author, ConversationStore, DeliveryState};
///
/// let mut store = ConversationStore::new();
/// let id = store.push_user("hello", Vec::new());
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.get(id).unwrap().delivery_state, DeliveryState::Delivered);
/// assert_eq!(store.snapshot()[0].author, Author::User);
/// ```
pub struct ConversationStore {
    messages: Vec<Message>,
    ids: Generator,
}

impl fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationStore")
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            ids: Generator::new(),
        }
    }

    /// Creates a store seeded with one delivered assistant greeting
    pub fn with_welcome(text: impl Into<String>) -> Self {
        let mut store = Self::new();
        let message = Message {
            id: store.next_id(),
            author: Author::Assistant,
            content: text.into(),
            attachments: Vec::new(),
            created_at: Utc::now(),
            delivery_state: DeliveryState::Delivered,
            media: None,
        };
        store.append(message);
        store
    }

    /// Produces a fresh id, ordered after every id produced before it
    pub fn next_id(&mut self) -> MessageId {
        // The monotonic generator only fails when the random part overflows
        // within one millisecond.
        MessageId(self.ids.generate().unwrap_or_else(|_| Ulid::new()))
    }

    /// Appends `message` and returns the new length
    ///
    /// A timestamp earlier than the last message's is raised to it, so
    /// creation times never go backwards.
    pub fn append(&mut self, mut message: Message) -> usize {
        if let Some(last) = self.messages.last() {
            if message.created_at < last.created_at {
                message.created_at = last.created_at;
            }
        }
        tracing::debug!(id = %message.id, author = ?message.author, "Message appended");
        self.messages.push(message);
        self.messages.len()
    }

    /// Appends a delivered user message and returns its id
    pub fn push_user(
        &mut self,
        content: impl Into<String>,
        attachments: Vec<AttachmentSummary>,
    ) -> MessageId {
        let id = self.next_id();
        self.append(Message {
            id,
            author: Author::User,
            content: content.into(),
            attachments,
            created_at: Utc::now(),
            delivery_state: DeliveryState::Delivered,
            media: None,
        });
        id
    }

    /// Appends an empty pending assistant message and returns its id
    pub fn push_pending_assistant(&mut self) -> MessageId {
        let id = self.next_id();
        self.append(Message {
            id,
            author: Author::Assistant,
            content: String::new(),
            attachments: Vec::new(),
            created_at: Utc::now(),
            delivery_state: DeliveryState::Pending,
            media: None,
        });
        id
    }

    fn pending_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        let Some(message) = self.messages.iter_mut().rev().find(|m| m.id == id) else {
            tracing::warn!(%id, "No message with this id");
            return None;
        };
        if message.delivery_state.is_terminal() {
            tracing::warn!(%id, state = ?message.delivery_state, "Message already settled");
            return None;
        }
        Some(message)
    }

    /// Settles a pending message with the normalized payload
    ///
    /// Returns false, changing nothing, if `id` is absent or not pending.
    pub fn mark_delivered(&mut self, id: MessageId, payload: NormalizedPayload) -> bool {
        let Some(message) = self.pending_mut(id) else {
            return false;
        };
        message.content = payload.text;
        message.media = payload.media;
        message.delivery_state = DeliveryState::Delivered;
        true
    }

    /// Settles a pending message as failed, replacing its content with
    /// [`APOLOGY_MESSAGE`]
    ///
    /// Returns false, changing nothing, if `id` is absent or not pending.
    pub fn mark_failed(&mut self, id: MessageId) -> bool {
        let Some(message) = self.pending_mut(id) else {
            return false;
        };
        message.content = APOLOGY_MESSAGE.to_string();
        message.delivery_state = DeliveryState::Failed;
        true
    }

    /// All messages in append order
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Looks up a message by id
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if there are no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages still waiting for the backend
    pub fn pending_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.delivery_state == DeliveryState::Pending)
            .count()
    }
}
