//! End-to-end tests of the inquiry page against a mocked EmailJS endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_fs::prelude::*;
use predicates::prelude::*;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ctrlcraft_inquiry::config::Config;
use ctrlcraft_inquiry::error::InquiryError;
use ctrlcraft_inquiry::model::draft::InquiryDraft;
use ctrlcraft_inquiry::notice::{NoticeBoard, NoticeKind};
use ctrlcraft_inquiry::page::{InquiryPage, Navigator, SelectionState};
use ctrlcraft_inquiry::relay::EmailJsRelay;

const SEND_PATH: &str = "/api/v1.0/email/send";

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<(String, Duration)>>,
}

impl Navigator for RecordingNavigator {
    fn navigate_after(&self, location: &str, delay: Duration) {
        self.visits
            .lock()
            .unwrap()
            .push((location.to_string(), delay));
    }
}

struct Harness {
    page: InquiryPage,
    board: Arc<NoticeBoard>,
    navigator: Arc<RecordingNavigator>,
    images: assert_fs::TempDir,
}

fn config(endpoint: &str) -> Config {
    let mut config = Config::default();
    config.relay.endpoint = endpoint.to_string();
    config.relay.public_key = "pk_test".into();
    config.relay.service_id = "service_test".into();
    config.relay.template_id = "template_test".into();
    config.relay.recipient = "workshop@example.com".into();
    config
}

fn harness(server: &MockServer, init_relay: bool) -> Harness {
    let config = config(&server.uri());
    let relay = EmailJsRelay::new(&config.relay).unwrap();
    if init_relay {
        relay.init().unwrap();
    }
    let board = Arc::new(NoticeBoard::new(Duration::from_secs(60)));
    let navigator = Arc::new(RecordingNavigator::default());
    let page = InquiryPage::new(&config, Arc::new(relay), board.clone(), navigator.clone());
    Harness {
        page,
        board,
        navigator,
        images: assert_fs::TempDir::new().unwrap(),
    }
}

fn complete_draft() -> InquiryDraft {
    InquiryDraft::from_pairs([
        ("first_name", "Ada"),
        ("last_name", "Lovelace"),
        ("email", "ada@example.com"),
        ("controller_type", "ps5"),
        ("design_description", "Purple shell with back paddles"),
        ("shipping_confirm", "on"),
    ])
}

impl Harness {
    fn write_images(&self, count: usize) -> Vec<std::path::PathBuf> {
        (0..count)
            .map(|i| {
                let child = self.images.child(format!("ref{i:02}.png"));
                child.write_binary(&vec![i as u8; 64 + i]).unwrap();
                child.path().to_path_buf()
            })
            .collect()
    }

    fn errors(&self) -> Vec<String> {
        self.board
            .messages()
            .into_iter()
            .filter(|(k, _)| *k == NoticeKind::Error)
            .map(|(_, m)| m)
            .collect()
    }
}

#[tokio::test]
async fn test_successful_submission_resets_everything() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(body_partial_json(serde_json::json!({
            "service_id": "service_test",
            "template_id": "template_test",
            "user_id": "pk_test",
            "template_params": { "image_count": "2", "service_type": "custom-build" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.page.fill(complete_draft());
    h.page.select_service("custom-build");
    let files = h.write_images(2);
    let report = h.page.select_files(&files).await.unwrap();
    assert_eq!(report.added, 2);

    let response = h.page.submit().await.unwrap();
    assert_eq!(response.status, Some(200));

    assert_eq!(h.page.form(), &InquiryDraft::default());
    assert!(h.page.intake().is_empty());
    assert!(h.page.intake().preview().is_empty());
    assert_eq!(h.page.selection(), &SelectionState::default());
    assert!(h.page.submit_control().is_enabled());
    assert_eq!(
        h.navigator.visits.lock().unwrap().as_slice(),
        &[("index.html".to_string(), Duration::from_secs(3))]
    );
    assert!(h.board.messages().contains(&(
        NoticeKind::Success,
        "Inquiry sent successfully! I'll contact you soon.".to_string()
    )));
}

#[tokio::test]
async fn test_relay_refusal_keeps_state_for_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("The public key is invalid"))
        .expect(1)
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.page.fill(complete_draft());
    h.page.select_service("repair");
    let files = h.write_images(2);
    h.page.select_files(&files).await.unwrap();

    let err = h.page.submit().await.unwrap_err();
    assert!(matches!(err, InquiryError::Transport(_)));

    assert_eq!(h.page.form().first_name.as_deref(), Some("Ada"));
    assert_eq!(h.page.intake().len(), 2);
    assert_eq!(h.page.selection().service.as_deref(), Some("repair"));
    assert!(h.page.submit_control().is_enabled());
    assert!(h.navigator.visits.lock().unwrap().is_empty());

    let errors = h.errors();
    assert_eq!(errors.len(), 1);
    assert!(predicate::str::contains("Failed to send email: The public key is invalid").eval(&errors[0]));
}

#[tokio::test]
async fn test_uninitialized_relay_is_not_called() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = harness(&server, false);
    h.page.fill(complete_draft());
    h.page.select_service("custom-build");

    let err = h.page.submit().await.unwrap_err();
    assert!(matches!(err, InquiryError::ServiceNotReady));
    assert!(h.errors()[0].starts_with("Email service is not ready"));
    assert!(h.page.submit_control().is_enabled());
}

#[tokio::test]
async fn test_missing_fields_are_all_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    let mut draft = complete_draft();
    draft.email = None;
    draft.design_description = None;
    h.page.fill(draft);
    h.page.select_service("custom-build");

    let err = h.page.submit().await.unwrap_err();
    let message = err.to_string();
    let names_both = predicate::str::contains("Email").and(predicate::str::contains("Design description"));
    assert!(names_both.eval(&message), "{message}");
    assert_eq!(h.page.form().first_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_seven_images_cap_inline_at_five() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let mut h = harness(&server, true);
    h.page.fill(complete_draft());
    h.page.select_service("custom-build");
    h.write_images(7);
    let report = h.page.drop_files(h.images.path()).await.unwrap();
    assert_eq!(report.added, 7);

    h.page.submit().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let params = &body["template_params"];
    assert_eq!(params["image_count"], "7");

    let html = params["image_html"].as_str().unwrap();
    assert_eq!(html.matches("<img ").count(), 5);
    assert!(html.contains("+2 additional images"));
    assert!(html.contains("ref04.png"));
    assert!(!html.contains("ref05.png"));
    assert!(params["image_text"]
        .as_str()
        .unwrap()
        .contains("+2 additional images"));
}

#[tokio::test]
async fn test_batch_over_limit_leaves_collection_unchanged() {
    let server = MockServer::start().await;
    let h = harness(&server, true);
    let first = h.write_images(8);
    h.page.select_files(&first).await.unwrap();

    let extra: Vec<_> = (0..3)
        .map(|i| {
            let child = h.images.child(format!("extra{i}.jpg"));
            child.write_binary(&[0xFF, 0xD8, i]).unwrap();
            child.path().to_path_buf()
        })
        .collect();
    let err = h.page.select_files(&extra).await.unwrap_err();
    assert!(matches!(
        err,
        InquiryError::TooManyAttachments {
            remaining: 2,
            attempted: 3
        }
    ));
    assert_eq!(h.page.intake().len(), 8);
    assert_eq!(h.page.intake().preview().len(), 8);
}
