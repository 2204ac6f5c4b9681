//! Chat sessions
//!
//! A session pairs a [`ConversationStore`] with the composing state around
//! it and drives submissions through the backend.

pub mod conversation;
pub mod orchestrator;

pub use conversation::{
    Author, ConversationStore, DeliveryState, Message, MessageId, APOLOGY_MESSAGE,
};
pub use orchestrator::{
    CompletedRequest, PendingSubmission, SessionOrchestrator, SubmissionState, SubmitOutcome,
};
