use serde_json::json;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use studiochat::attachments::{AttachmentKind, FileDescriptor};
use studiochat::backend::{create_backend, TaskKind, NETWORK_ERROR_MESSAGE};
use studiochat::normalizer::FALLBACK_TEXT;
use studiochat::session::{
    Author, DeliveryState, SessionOrchestrator, SubmissionState, SubmitOutcome, APOLOGY_MESSAGE,
};

#[tokio::test]
async fn test_planning_round_trip_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/planning"))
        .and(body_json(json!({"taskDescription": "hello", "selectedModel": "qwen"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"plan": {"text": "hi there"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = common::config_for(&format!("{}/api", server.uri()));
    let backend = create_backend(&config.backend).unwrap();
    let mut session = SessionOrchestrator::from_config(TaskKind::Planning, &config).unwrap();

    session.set_draft("hello");
    let outcome = session.submit(backend.as_ref()).await;
    assert!(matches!(outcome, SubmitOutcome::Delivered(_)));

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].author, Author::User);
    assert_eq!(history[0].content, "hello");
    assert_eq!(history[1].author, Author::Assistant);
    assert_eq!(history[1].content, "hi there");
    assert_eq!(history[1].delivery_state, DeliveryState::Delivered);
    assert_eq!(session.state(), SubmissionState::Completed);
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn test_asset_reply_with_image_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/assets"))
        .and(body_json(json!({"modelData": "a red dragon", "selectedModel": "gemini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "assets": {"imageUrl": "http://cdn.test/dragon.png", "hasImage": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::config_for(&format!("{}/api", server.uri()));
    let backend = create_backend(&config.backend).unwrap();
    let mut session = SessionOrchestrator::from_config(TaskKind::Assets, &config).unwrap();
    session.select_model("gemini").unwrap();

    session.set_draft("a red dragon");
    session.submit(backend.as_ref()).await;

    let reply = &session.history()[1];
    assert_eq!(reply.content, "");
    let media = reply.media.as_ref().expect("media on asset reply");
    assert_eq!(media.url, "http://cdn.test/dragon.png");
    assert!(media.present);
}

#[tokio::test]
async fn test_unrecognized_reply_uses_fallback_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/development"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let config = common::config_for(&format!("{}/api", server.uri()));
    let backend = create_backend(&config.backend).unwrap();
    let mut session = SessionOrchestrator::from_config(TaskKind::Development, &config).unwrap();

    session.set_draft("scaffold a platformer");
    session.submit(backend.as_ref()).await;

    assert_eq!(session.history()[1].content, FALLBACK_TEXT);
    assert_eq!(
        session.history()[1].delivery_state,
        DeliveryState::Delivered
    );
}

#[tokio::test]
async fn test_server_error_marks_reply_failed_then_recovers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/planning"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "model offline"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/planning"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "back online"})))
        .mount(&server)
        .await;

    let config = common::config_for(&format!("{}/api", server.uri()));
    let backend = create_backend(&config.backend).unwrap();
    let mut session = SessionOrchestrator::from_config(TaskKind::Planning, &config).unwrap();

    session.set_draft("first");
    let outcome = session.submit(backend.as_ref()).await;
    match outcome {
        SubmitOutcome::Failed { error, .. } => assert_eq!(error, "model offline"),
        other => panic!("Expected failure, got {:?}", other),
    }
    assert_eq!(session.history()[1].content, APOLOGY_MESSAGE);
    assert_eq!(session.history()[1].delivery_state, DeliveryState::Failed);
    assert_eq!(session.last_error(), Some("model offline"));

    session.set_draft("second");
    let outcome = session.submit(backend.as_ref()).await;
    assert!(matches!(outcome, SubmitOutcome::Delivered(_)));
    assert!(session.last_error().is_none());
    assert_eq!(session.history().len(), 4);
    assert_eq!(session.history()[3].content, "back online");
}

#[tokio::test]
async fn test_unreachable_backend_sets_network_message() {
    let config = common::config_for(&common::unreachable_url());
    let backend = create_backend(&config.backend).unwrap();
    let mut session = SessionOrchestrator::from_config(TaskKind::Planning, &config).unwrap();

    session.set_draft("anyone there?");
    session.submit(backend.as_ref()).await;

    assert_eq!(session.last_error(), Some(NETWORK_ERROR_MESSAGE));
    assert_eq!(session.state(), SubmissionState::Failed);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_attachments_travel_with_user_message_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/assets"))
        .and(body_json(json!({"modelData": "", "selectedModel": "qwen"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "nice sketch"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::config_for(&format!("{}/api", server.uri()));
    let backend = create_backend(&config.backend).unwrap();
    let mut session = SessionOrchestrator::from_config(TaskKind::Assets, &config).unwrap();

    let report = session.stage_files(
        vec![FileDescriptor::new("sketch.png", 2048, "image/png").with_content(vec![0u8; 16])],
        AttachmentKind::Image,
    );
    assert!(report.all_staged());
    assert_eq!(session.attachments().live_previews(), 1);

    let outcome = session.submit(backend.as_ref()).await;
    assert!(matches!(outcome, SubmitOutcome::Delivered(_)));

    let user = &session.history()[0];
    assert_eq!(user.content, "");
    assert_eq!(user.attachments.len(), 1);
    assert_eq!(user.attachments[0].name, "sketch.png");
    assert!(session.attachments().is_empty());
    assert_eq!(session.attachments().live_previews(), 0);
}

#[tokio::test]
async fn test_second_submission_rejected_while_outstanding() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/planning"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "ok"})))
        .mount(&server)
        .await;

    let config = common::config_for(&format!("{}/api", server.uri()));
    let backend = create_backend(&config.backend).unwrap();
    let mut session = SessionOrchestrator::from_config(TaskKind::Planning, &config).unwrap();

    session.set_draft("one");
    let ticket = session.begin_submission().unwrap();

    session.set_draft("two");
    assert!(session.begin_submission().is_none());
    assert_eq!(session.draft(), "two");
    assert_eq!(session.history().len(), 2);

    let done = ticket.dispatch(backend.as_ref()).await;
    assert!(matches!(session.complete(done), SubmitOutcome::Delivered(_)));
    assert_eq!(session.conversation().pending_count(), 0);
}
