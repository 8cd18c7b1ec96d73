use super::*;
use crate::icon::IconSink;
use mailquill_settings::MemoryStore;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

struct RecordingSink {
    seen: std::sync::Mutex<Vec<IconState>>,
}

#[async_trait]
impl IconSink for RecordingSink {
    async fn apply(&self, state: IconState) {
        self.seen.lock().unwrap().push(state);
    }
}

struct RecordingPage {
    delivered: std::sync::Mutex<Vec<BridgeRequest>>,
}

#[async_trait]
impl PageSink for RecordingPage {
    async fn deliver(&self, request: BridgeRequest) {
        self.delivered.lock().unwrap().push(request);
    }
}

fn configured_store() -> Arc<MemoryStore> {
    let mut settings = Settings::default();
    settings.api_key = "sk-test".to_string();
    Arc::new(MemoryStore::new(settings))
}

fn service(store: Arc<MemoryStore>, api_url: &str) -> (BackgroundService, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink {
        seen: std::sync::Mutex::new(Vec::new()),
    });
    let icon = IconController::new(sink.clone());
    let service = BackgroundService::new(store, icon).with_api_url(api_url);
    (service, sink)
}

fn completion_body(text: &str) -> String {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": text } }]
    })
    .to_string()
}

#[tokio::test]
async fn get_settings_returns_the_record() {
    let (service, _) = service(configured_store(), "http://unused.invalid");
    let response = service.send(BridgeRequest::GetSettings).await;
    assert!(response.success);
    assert_eq!(response.settings.unwrap().api_key, "sk-test");
}

#[tokio::test]
async fn generate_without_credential_fails_before_any_network_call() {
    // No mock server at all: a network attempt would error differently.
    let (service, sink) = service(Arc::new(MemoryStore::default()), "http://unused.invalid");
    let response = service
        .send(BridgeRequest::Generate {
            talking_points: "points".to_string(),
            thread_context: None,
        })
        .await;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("API key"));
    // Config errors never touch the icon.
    assert!(sink.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn generate_with_blank_template_names_the_setting() {
    let mut settings = Settings::default();
    settings.api_key = "sk-test".to_string();
    settings.compose_prompt = "  ".to_string();
    let (service, _) = service(Arc::new(MemoryStore::new(settings)), "http://unused.invalid");

    let response = service
        .send(BridgeRequest::Generate {
            talking_points: "points".to_string(),
            thread_context: None,
        })
        .await;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("compose_prompt"));
}

#[tokio::test]
async fn generate_success_returns_draft_and_tracks_icon() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::body_partial_json(
            serde_json::json!({"model": Settings::default().compose_model}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(completion_body("Thanks!")))
        .expect(1)
        .mount(&server)
        .await;

    let (service, sink) = service(configured_store(), &server.uri());
    let response = service
        .send(BridgeRequest::Generate {
            talking_points: "thank them".to_string(),
            thread_context: Some("Hello".to_string()),
        })
        .await;
    assert!(response.success);
    assert_eq!(response.draft.as_deref(), Some("Thanks!"));
    assert_eq!(
        *sink.seen.lock().unwrap(),
        vec![IconState::Loading, IconState::Idle]
    );
}

#[tokio::test]
async fn improve_general_uses_general_model() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::body_partial_json(
            serde_json::json!({"model": Settings::default().general_improve_model}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(completion_body("Better.")))
        .expect(1)
        .mount(&server)
        .await;

    let (service, _) = service(configured_store(), &server.uri());
    let response = service
        .send(BridgeRequest::ImproveText {
            text: "worse".to_string(),
            thread_context: None,
            source: SourceTag::General,
        })
        .await;
    assert!(response.success);
    assert_eq!(response.text.as_deref(), Some("Better."));
}

#[tokio::test]
async fn improve_mail_uses_mail_model_and_context() {
    let mut settings = Settings::default();
    settings.api_key = "sk-test".to_string();
    settings.mail_improve_model = "gpt-5".to_string();
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::body_partial_json(serde_json::json!({"model": "gpt-5"})))
        .respond_with(ResponseTemplate::new(200).set_body_string(completion_body("Polished.")))
        .expect(1)
        .mount(&server)
        .await;

    let (service, _) = service(Arc::new(MemoryStore::new(settings)), &server.uri());
    let response = service
        .send(BridgeRequest::ImproveText {
            text: "rough".to_string(),
            thread_context: Some("the thread".to_string()),
            source: SourceTag::Mail,
        })
        .await;
    assert!(response.success);
}

#[tokio::test]
async fn remote_failure_surfaces_with_status_and_sets_icon_error() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .expect(1)
        .mount(&server)
        .await;

    let (service, sink) = service(configured_store(), &server.uri());
    let response = service
        .send(BridgeRequest::ImproveText {
            text: "text".to_string(),
            thread_context: None,
            source: SourceTag::General,
        })
        .await;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("429"));
    assert_eq!(
        *sink.seen.lock().unwrap(),
        vec![IconState::Loading, IconState::Error]
    );
}

#[tokio::test]
async fn set_icon_state_applies_directly() {
    let (service, sink) = service(configured_store(), "http://unused.invalid");
    let response = service
        .send(BridgeRequest::SetIconState {
            state: IconState::Error,
        })
        .await;
    assert!(response.success);
    assert_eq!(*sink.seen.lock().unwrap(), vec![IconState::Error]);
}

#[tokio::test(start_paused = true)]
async fn set_icon_inactive_flashes_and_reverts() {
    let (service, sink) = service(configured_store(), "http://unused.invalid");
    service
        .send(BridgeRequest::SetIconState {
            state: IconState::Inactive,
        })
        .await;
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    let seen = sink.seen.lock().unwrap().clone();
    assert_eq!(seen, vec![IconState::Inactive, IconState::Idle]);
}

#[tokio::test]
async fn triggers_are_relayed_to_the_page() {
    let page = Arc::new(RecordingPage {
        delivered: std::sync::Mutex::new(Vec::new()),
    });
    let sink = Arc::new(RecordingSink {
        seen: std::sync::Mutex::new(Vec::new()),
    });
    let service = BackgroundService::new(configured_store(), IconController::new(sink))
        .with_page(page.clone());

    let response = service.send(BridgeRequest::TriggerImprove).await;
    assert!(response.success);
    assert_eq!(
        *page.delivered.lock().unwrap(),
        vec![BridgeRequest::TriggerImprove]
    );
}
