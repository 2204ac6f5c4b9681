//! Session orchestration
//!
//! [`SessionOrchestrator`] owns everything one chat session needs: the
//! conversation, the draft, the staged attachments and the model
//! selection. A submission moves through
//! `Composing -> Submitting -> AwaitingResponse -> Completed | Failed`.
//!
//! The network call is split off into a [`PendingSubmission`] ticket so the
//! session is not borrowed while the request is outstanding:
//!
//! ```no_run
//! # use studiochat::backend::Backend;
//! # use studiochat::session::SessionOrchestrator;
//! # async fn example(session: &mut SessionOrchestrator, backend: &dyn Backend) {
//! if let Some(ticket) = session.begin_submission() {
//!     // The session can be rendered here; the pending message is visible.
//!     let done = ticket.dispatch(backend).await;
//!     session.complete(done);
//! }
//! # }
//! ```

use crate::attachments::{
    AttachmentId, AttachmentKind, AttachmentManager, FileDescriptor, StageReport,
};
use crate::backend::{Backend, BackendRequest, RequestError, TaskKind};
use crate::config::Config;
use crate::error::Result;
use crate::models::{ModelEntry, ModelRegistry};
use crate::normalizer::normalize;
use crate::session::conversation::{ConversationStore, Message, MessageId};
use serde_json::Value;
use std::fmt;

/// Where the session is in the submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Editing text and attachments; no request outstanding
    Composing,
    /// A submission is being recorded
    Submitting,
    /// A request is outstanding
    AwaitingResponse,
    /// The last request succeeded
    Completed,
    /// The last request failed
    Failed,
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Composing => "composing",
            Self::Submitting => "submitting",
            Self::AwaitingResponse => "awaiting response",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// An outstanding submission
///
/// Produced by [`SessionOrchestrator::begin_submission`]; turned into a
/// [`CompletedRequest`] by [`PendingSubmission::dispatch`]. The session
/// stays busy until the result is passed to
/// [`SessionOrchestrator::complete`] or the ticket is handed back through
/// [`SessionOrchestrator::abandon`].
#[derive(Debug)]
#[must_use = "the session stays busy until the ticket is completed or abandoned"]
pub struct PendingSubmission {
    ticket: u64,
    message_id: MessageId,
    request: BackendRequest,
}

impl PendingSubmission {
    /// The request that will be sent
    pub fn request(&self) -> &BackendRequest {
        &self.request
    }

    /// The pending assistant message this submission will settle
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Sends the request and captures its result
    pub async fn dispatch(self, backend: &dyn Backend) -> CompletedRequest {
        tracing::info!(
            task = %self.request.task,
            model = %self.request.selected_model,
            backend = %backend.name(),
            "Dispatching submission"
        );
        let result = backend.send(&self.request).await;
        CompletedRequest {
            ticket: self.ticket,
            message_id: self.message_id,
            task: self.request.task,
            result,
        }
    }
}

/// Result of a dispatched submission, ready to be merged into the session
#[derive(Debug)]
pub struct CompletedRequest {
    ticket: u64,
    message_id: MessageId,
    task: TaskKind,
    result: std::result::Result<Value, RequestError>,
}

impl CompletedRequest {
    /// The pending assistant message this result settles
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }
}

/// What happened to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty draft and no attachments; nothing was recorded or sent
    NothingToSend,
    /// Another submission is outstanding; nothing was recorded or sent
    Busy,
    /// The assistant message was delivered
    Delivered(MessageId),
    /// The request failed and the assistant message shows the apology
    Failed {
        /// The failed assistant message
        message_id: MessageId,
        /// Session error message
        error: String,
    },
    /// The result belonged to a submission this session is not waiting on
    Stale,
}

/// Ticket number and pending message of the outstanding submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outstanding {
    ticket: u64,
    message_id: MessageId,
}

/// One chat session against one task module
///
/// # Examples
///
/// ```
/// use studiochat::backend::TaskKind;
/// use studiochat::session::SessionOrchestrator;
///
/// let mut session = SessionOrchestrator::new(TaskKind::Planning);
/// assert!(session.begin_submission().is_none());
///
/// session.set_draft("  hello  ");
/// let ticket = session.begin_submission().unwrap();
/// assert_eq!(ticket.request().input, "hello");
/// assert_eq!(session.history().len(), 2);
/// assert!(session.is_busy());
/// ```
#[derive(Debug)]
pub struct SessionOrchestrator {
    task: TaskKind,
    models: ModelRegistry,
    conversation: ConversationStore,
    attachments: AttachmentManager,
    draft: String,
    state: SubmissionState,
    outstanding: Option<Outstanding>,
    next_ticket: u64,
    last_error: Option<String>,
}

impl SessionOrchestrator {
    /// Creates a session with default limits and selections
    pub fn new(task: TaskKind) -> Self {
        Self::with_parts(
            task,
            ModelRegistry::default(),
            AttachmentManager::default(),
            ConversationStore::new(),
        )
    }

    /// Creates a session from its parts
    pub fn with_parts(
        task: TaskKind,
        models: ModelRegistry,
        attachments: AttachmentManager,
        conversation: ConversationStore,
    ) -> Self {
        tracing::info!(%task, "Session started");
        Self {
            task,
            models,
            conversation,
            attachments,
            draft: String::new(),
            state: SubmissionState::Composing,
            outstanding: None,
            next_ticket: 0,
            last_error: None,
        }
    }

    /// Creates a session for `task` from configuration
    ///
    /// # Errors
    ///
    /// Returns `StudioError::InvalidModel` if the configured default model
    /// is not valid in every context.
    pub fn from_config(task: TaskKind, config: &Config) -> Result<Self> {
        let models = ModelRegistry::with_default(&config.session.default_model)?;
        let attachments = AttachmentManager::new(&config.attachments);
        let conversation = match &config.session.welcome_message {
            Some(text) if !text.trim().is_empty() => ConversationStore::with_welcome(text.clone()),
            _ => ConversationStore::new(),
        };
        Ok(Self::with_parts(task, models, attachments, conversation))
    }

    /// Task module this session talks to
    pub fn task(&self) -> TaskKind {
        self.task
    }

    /// Current lifecycle state
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// True while a submission is outstanding; sending is disabled
    pub fn is_busy(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Error message of the last failed request, cleared on the next send
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Messages in order
    pub fn history(&self) -> &[Message] {
        self.conversation.snapshot()
    }

    /// The conversation store
    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    fn touch(&mut self) {
        if !self.is_busy() {
            self.state = SubmissionState::Composing;
        }
    }

    /// Current draft text
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replaces the draft text
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.touch();
    }

    /// Preset prompts for this module
    pub fn suggestions(&self) -> &'static [&'static str] {
        self.task.suggestions()
    }

    /// Copies the suggestion at `index` into the draft
    ///
    /// Returns the suggestion, or `None` if the index is out of range.
    pub fn apply_suggestion(&mut self, index: usize) -> Option<&'static str> {
        let suggestion = *self.task.suggestions().get(index)?;
        self.set_draft(suggestion);
        Some(suggestion)
    }

    /// Stages files through the `kind` channel
    pub fn stage_files<I>(&mut self, descriptors: I, kind: AttachmentKind) -> StageReport
    where
        I: IntoIterator<Item = FileDescriptor>,
    {
        self.touch();
        self.attachments.stage(descriptors, kind)
    }

    /// Removes a staged attachment; false for unknown ids
    pub fn remove_attachment(&mut self, id: AttachmentId) -> bool {
        self.touch();
        self.attachments.release(id)
    }

    /// Staged attachments
    pub fn attachments(&self) -> &AttachmentManager {
        &self.attachments
    }

    /// Models selectable for this module
    pub fn available_models(&self) -> &'static [ModelEntry] {
        self.models.available_models(self.task.model_context())
    }

    /// Selects the model used for the next submission
    ///
    /// # Errors
    ///
    /// Returns `StudioError::InvalidModel` if `id` is not valid for this
    /// module's context; the selection is unchanged.
    pub fn select_model(&mut self, id: &str) -> Result<&'static str> {
        self.touch();
        self.models.select(self.task.model_context(), id)
    }

    /// Model used for the next submission
    pub fn selected_model(&self) -> ModelEntry {
        self.models.selected_entry(self.task.model_context())
    }

    /// Records a submission and returns the ticket for its request
    ///
    /// Returns `None`, changing nothing, if another submission is
    /// outstanding or if the trimmed draft is empty and nothing is staged.
    /// Otherwise the session error is cleared, the user message and a
    /// pending assistant message are appended, and the draft and the staged
    /// attachments are cleared.
    pub fn begin_submission(&mut self) -> Option<PendingSubmission> {
        if self.is_busy() {
            tracing::warn!("Submission rejected: a request is already outstanding");
            return None;
        }

        let text = self.draft.trim().to_string();
        if text.is_empty() && self.attachments.is_empty() {
            tracing::debug!("Nothing to send");
            return None;
        }

        self.state = SubmissionState::Submitting;
        self.last_error = None;

        let attachments = self.attachments.summaries();
        let user_id = self.conversation.push_user(text.clone(), attachments);
        self.draft.clear();
        self.attachments.clear_all();

        let message_id = self.conversation.push_pending_assistant();
        let request = BackendRequest::new(self.task, text, self.selected_model().id);

        self.next_ticket += 1;
        self.outstanding = Some(Outstanding {
            ticket: self.next_ticket,
            message_id,
        });
        self.state = SubmissionState::AwaitingResponse;

        tracing::info!(user_message = %user_id, assistant_message = %message_id, "Submission recorded");
        Some(PendingSubmission {
            ticket: self.next_ticket,
            message_id,
            request,
        })
    }

    fn is_outstanding(&self, ticket: u64, message_id: MessageId) -> bool {
        self.outstanding == Some(Outstanding { ticket, message_id })
    }

    /// Merges a dispatched submission's result into the conversation
    ///
    /// A result is accepted only if both its ticket and its pending message
    /// belong to the outstanding submission of this session; anything else
    /// is ignored and leaves the session untouched.
    pub fn complete(&mut self, done: CompletedRequest) -> SubmitOutcome {
        if !self.is_outstanding(done.ticket, done.message_id) {
            tracing::warn!(message = %done.message_id, "Ignoring result of a stale submission");
            return SubmitOutcome::Stale;
        }

        match done.result {
            Ok(raw) => {
                let payload = normalize(done.task, &raw);
                if !self.conversation.mark_delivered(done.message_id, payload) {
                    return SubmitOutcome::Stale;
                }
                self.outstanding = None;
                self.state = SubmissionState::Completed;
                tracing::info!(message = %done.message_id, "Assistant reply delivered");
                SubmitOutcome::Delivered(done.message_id)
            }
            Err(err) => {
                if !self.conversation.mark_failed(done.message_id) {
                    return SubmitOutcome::Stale;
                }
                let error = err.session_message();
                tracing::error!(message = %done.message_id, "Request failed: {}", err);
                self.outstanding = None;
                self.last_error = Some(error.clone());
                self.state = SubmissionState::Failed;
                SubmitOutcome::Failed {
                    message_id: done.message_id,
                    error,
                }
            }
        }
    }

    /// Gives up on an outstanding submission without sending it
    ///
    /// The pending assistant message is marked failed and the session can
    /// submit again. Returns false, changing nothing, for a ticket this
    /// session is not waiting on.
    pub fn abandon(&mut self, ticket: PendingSubmission) -> bool {
        if !self.is_outstanding(ticket.ticket, ticket.message_id) {
            tracing::debug!(message = %ticket.message_id, "Abandon of a foreign ticket ignored");
            return false;
        }
        self.conversation.mark_failed(ticket.message_id);
        self.outstanding = None;
        self.state = SubmissionState::Composing;
        tracing::info!(message = %ticket.message_id, "Submission abandoned");
        true
    }

    /// Records, sends and settles one submission
    pub async fn submit(&mut self, backend: &dyn Backend) -> SubmitOutcome {
        if self.is_busy() {
            return SubmitOutcome::Busy;
        }
        let Some(ticket) = self.begin_submission() else {
            return SubmitOutcome::NothingToSend;
        };
        let done = ticket.dispatch(backend).await;
        self.complete(done)
    }

    /// Releases every staged attachment; also done when the session drops
    pub fn teardown(&mut self) {
        tracing::info!(task = %self.task, messages = self.conversation.len(), "Session ended");
        self.attachments.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::NETWORK_ERROR_MESSAGE;
    use crate::session::conversation::{Author, DeliveryState, APOLOGY_MESSAGE};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct MockBackend {
        response: std::result::Result<Value, RequestError>,
        requests: Arc<Mutex<Vec<BackendRequest>>>,
    }

    impl MockBackend {
        fn replying(value: Value) -> Self {
            Self {
                response: Ok(value),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing(err: RequestError) -> Self {
            Self {
                response: Err(err),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn requests(&self) -> Vec<BackendRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Backend for MockBackend {
        async fn send(
            &self,
            request: &BackendRequest,
        ) -> std::result::Result<Value, RequestError> {
            self.requests.lock().unwrap().push(request.clone());
            self.response.clone()
        }
    }

    fn png(name: &str) -> FileDescriptor {
        FileDescriptor::new(name, 64, "image/png").with_content(vec![0x89, b'P', b'N', b'G'])
    }

    #[tokio::test]
    async fn test_hello_scenario_delivers_reply() {
        let backend = MockBackend::replying(json!({"text": "hi there"}));
        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        assert_eq!(session.selected_model().id, "qwen");

        session.set_draft("hello");
        let ticket = session.begin_submission().unwrap();

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].author, Author::User);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[0].delivery_state, DeliveryState::Delivered);
        assert_eq!(history[1].author, Author::Assistant);
        assert_eq!(history[1].delivery_state, DeliveryState::Pending);

        let done = ticket.dispatch(&backend).await;
        let outcome = session.complete(done);

        let reply = &session.history()[1];
        assert_eq!(outcome, SubmitOutcome::Delivered(reply.id));
        assert_eq!(reply.content, "hi there");
        assert_eq!(reply.delivery_state, DeliveryState::Delivered);
        assert_eq!(session.state(), SubmissionState::Completed);

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].body(),
            json!({"taskDescription": "hello", "selectedModel": "qwen"})
        );
    }

    #[tokio::test]
    async fn test_network_failure_scenario() {
        let backend = MockBackend::failing(RequestError::Network("connection refused".into()));
        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        session.set_draft("hello");

        let outcome = session.submit(&backend).await;

        let reply = &session.history()[1];
        assert_eq!(reply.content, APOLOGY_MESSAGE);
        assert_eq!(reply.delivery_state, DeliveryState::Failed);
        assert_eq!(session.last_error(), Some(NETWORK_ERROR_MESSAGE));
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message_id: reply.id,
                error: NETWORK_ERROR_MESSAGE.to_string()
            }
        );
        assert_eq!(session.state(), SubmissionState::Failed);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_empty_send_is_noop() {
        let backend = MockBackend::replying(json!({"text": "unused"}));
        let mut session = SessionOrchestrator::new(TaskKind::Development);
        session.set_draft("   \n\t ");

        assert_eq!(session.submit(&backend).await, SubmitOutcome::NothingToSend);
        assert!(session.history().is_empty());
        assert!(backend.requests().is_empty());
        assert_eq!(session.state(), SubmissionState::Composing);
    }

    #[tokio::test]
    async fn test_attachments_alone_can_be_sent() {
        let backend = MockBackend::replying(json!({"assets": {"imageUrl": "http://cdn/x.png"}}));
        let mut session = SessionOrchestrator::new(TaskKind::Assets);
        let report = session.stage_files(vec![png("ref.png")], AttachmentKind::Image);
        assert!(report.all_staged());
        assert_eq!(session.attachments().live_previews(), 1);

        session.submit(&backend).await;

        let user = &session.history()[0];
        assert_eq!(user.content, "");
        assert_eq!(user.attachments.len(), 1);
        assert_eq!(user.attachments[0].name, "ref.png");
        assert!(session.attachments().is_empty());
        assert_eq!(session.attachments().live_previews(), 0);

        let reply = &session.history()[1];
        assert_eq!(reply.content, "");
        assert_eq!(reply.media.as_ref().unwrap().url, "http://cdn/x.png");
        assert_eq!(backend.requests()[0].body()["modelData"], "");
    }

    #[test]
    fn test_second_submission_rejected_while_outstanding() {
        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        session.set_draft("first");
        let _ticket = session.begin_submission().unwrap();

        session.set_draft("second");
        assert!(session.begin_submission().is_none());
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.draft(), "second");
        assert_eq!(session.conversation().pending_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_while_busy_reports_busy() {
        let backend = MockBackend::replying(json!({"text": "ok"}));
        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        session.set_draft("first");
        let ticket = session.begin_submission().unwrap();

        session.set_draft("second");
        assert_eq!(session.submit(&backend).await, SubmitOutcome::Busy);

        let done = ticket.dispatch(&backend).await;
        assert!(matches!(session.complete(done), SubmitOutcome::Delivered(_)));
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_completion_is_ignored() {
        let backend = MockBackend::replying(json!({"text": "late"}));
        let mut other = SessionOrchestrator::new(TaskKind::Planning);
        other.set_draft("elsewhere");
        let foreign = other.begin_submission().unwrap().dispatch(&backend).await;

        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        assert_eq!(session.complete(foreign), SubmitOutcome::Stale);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_result_with_same_ticket_number_is_stale() {
        let backend = MockBackend::replying(json!({"text": "from the other session"}));
        let mut first = SessionOrchestrator::new(TaskKind::Planning);
        let mut second = SessionOrchestrator::new(TaskKind::Planning);

        first.set_draft("one");
        let first_ticket = first.begin_submission().unwrap();
        second.set_draft("two");
        let second_ticket = second.begin_submission().unwrap();

        let foreign = first_ticket.dispatch(&backend).await;
        assert_eq!(second.complete(foreign), SubmitOutcome::Stale);
        assert!(second.is_busy());
        assert_eq!(second.history()[1].delivery_state, DeliveryState::Pending);
        assert_eq!(second.conversation().pending_count(), 1);

        let own = second_ticket.dispatch(&backend).await;
        assert!(matches!(second.complete(own), SubmitOutcome::Delivered(_)));
        assert!(!second.is_busy());
        assert_eq!(second.conversation().pending_count(), 0);
    }

    #[tokio::test]
    async fn test_result_completed_twice_is_stale() {
        let backend = MockBackend::replying(json!({"text": "once"}));
        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        session.set_draft("hello");
        let ticket = session.begin_submission().unwrap();
        let message_id = ticket.message_id();

        let done = ticket.dispatch(&backend).await;
        let replay = CompletedRequest {
            ticket: done.ticket,
            message_id: done.message_id,
            task: done.task,
            result: Ok(json!({"text": "twice"})),
        };
        assert_eq!(session.complete(done), SubmitOutcome::Delivered(message_id));
        assert_eq!(session.complete(replay), SubmitOutcome::Stale);
        assert_eq!(session.history()[1].content, "once");
    }

    #[test]
    fn test_abandon_frees_the_session() {
        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        session.set_draft("never sent");
        let ticket = session.begin_submission().unwrap();
        assert!(session.is_busy());

        assert!(session.abandon(ticket));
        assert!(!session.is_busy());
        assert_eq!(session.state(), SubmissionState::Composing);
        assert_eq!(session.history()[1].delivery_state, DeliveryState::Failed);
        assert_eq!(session.history()[1].content, APOLOGY_MESSAGE);
        assert_eq!(session.conversation().pending_count(), 0);

        session.set_draft("retry");
        assert!(session.begin_submission().is_some());
    }

    #[test]
    fn test_abandon_foreign_ticket_is_ignored() {
        let mut other = SessionOrchestrator::new(TaskKind::Planning);
        other.set_draft("elsewhere");
        let foreign = other.begin_submission().unwrap();

        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        session.set_draft("mine");
        let _ticket = session.begin_submission().unwrap();

        assert!(!session.abandon(foreign));
        assert!(session.is_busy());
        assert_eq!(session.conversation().pending_count(), 1);
    }

    #[tokio::test]
    async fn test_error_cleared_on_next_submission() {
        let failing = MockBackend::failing(RequestError::Status { status: 500 });
        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        session.set_draft("one");
        session.submit(&failing).await;
        assert!(session.last_error().is_some());

        session.set_draft("two");
        let _ticket = session.begin_submission().unwrap();
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_selected_model_is_sent() {
        let backend = MockBackend::replying(json!({"development": {"text": "fn main() {}"}}));
        let mut session = SessionOrchestrator::new(TaskKind::Development);
        session.select_model("deepseek").unwrap();
        session.set_draft("scaffold");

        session.submit(&backend).await;

        assert_eq!(backend.requests()[0].selected_model, "deepseek");
        assert_eq!(session.history()[1].content, "fn main() {}");
    }

    #[test]
    fn test_select_model_checks_module_context() {
        let mut session = SessionOrchestrator::new(TaskKind::Assets);
        assert!(session.select_model("deepseek").is_err());
        assert_eq!(session.selected_model().id, "qwen");
        assert_eq!(session.select_model("gemini").unwrap(), "gemini");
    }

    #[test]
    fn test_apply_suggestion_fills_draft_without_sending() {
        let mut session = SessionOrchestrator::new(TaskKind::Planning);
        let suggestion = session.apply_suggestion(0).unwrap();
        assert_eq!(session.draft(), suggestion);
        assert!(session.history().is_empty());
        assert!(session.apply_suggestion(99).is_none());
    }

    #[test]
    fn test_remove_attachment_releases_preview() {
        let mut session = SessionOrchestrator::new(TaskKind::Assets);
        let report = session.stage_files(vec![png("a.png"), png("b.png")], AttachmentKind::Image);
        assert!(session.remove_attachment(report.staged[0]));
        assert_eq!(session.attachments().len(), 1);
        assert_eq!(session.attachments().live_previews(), 1);

        session.teardown();
        assert_eq!(session.attachments().live_previews(), 0);
    }

    #[test]
    fn test_from_config_seeds_welcome() {
        let mut config = Config::default();
        config.session.welcome_message = Some("Hi! What are we building today?".to_string());
        let session = SessionOrchestrator::from_config(TaskKind::Planning, &config).unwrap();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].author, Author::Assistant);
    }

    #[test]
    fn test_from_config_rejects_bad_default_model() {
        let mut config = Config::default();
        config.session.default_model = "gemini".to_string();
        assert!(SessionOrchestrator::from_config(TaskKind::Assets, &config).is_err());
    }
}
