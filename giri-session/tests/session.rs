use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use giri_common::{GiriError, Result};
use giri_listings::{ListingService, ListingSettings, ListingSource};
use giri_llm::config::{LlmConfig, ProviderKind};
use giri_llm::connector::{Connector, ProviderConnector};
use giri_llm::traits::{LlmClient, LlmResponse};
use giri_session::{ChatMessage, ChatOutcome, RelayState, Session};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Page(&'static str);

#[async_trait]
impl ListingSource for Page {
    async fn fetch_page(&self) -> Result<String> {
        Ok(self.0.to_string())
    }

    fn page_url(&self) -> &str {
        "https://listing.test/store/udemy/"
    }
}

struct Refused;

#[async_trait]
impl ListingSource for Refused {
    async fn fetch_page(&self) -> Result<String> {
        Err(GiriError::Network("connection refused".into()))
    }

    fn page_url(&self) -> &str {
        "https://listing.test/store/udemy/"
    }
}

struct Echo {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl LlmClient for Echo {
    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        _max_tokens: Option<u32>,
        _temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LlmResponse::text(if prompt == "hello" { "hi" } else { "?" }))
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

struct EchoConnector {
    calls: Arc<AtomicUsize>,
}

impl Connector for EchoConnector {
    fn connect(&self, _api_key: &str) -> Result<Arc<dyn LlmClient>> {
        Ok(Arc::new(Echo {
            calls: self.calls.clone(),
        }))
    }
}

const PAGE: &str = r#"
<div class="col-xl-4 col-md-6"><h3>Intro to Python</h3><a href="/a">x</a></div>
<div class="col-xl-4 col-md-6"><h3>Data Science</h3><a href="/b">x</a></div>
<div class="col-xl-4 col-md-6"><h3>Python Advanced</h3><a href="/c">x</a></div>
"#;

fn session(source: Arc<dyn ListingSource>) -> (Session, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let listings = ListingService::with_source(source, &ListingSettings::default()).unwrap();
    let connector = Arc::new(EchoConnector {
        calls: calls.clone(),
    });
    (
        Session::start(listings, Duration::from_secs(3600), connector),
        calls,
    )
}

#[tokio::test]
async fn filtered_listing_from_session() {
    let (mut s, _) = session(Arc::new(Page(PAGE)));
    let out = s.load_listings("python", false).await;
    let titles: Vec<&str> = out.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Intro to Python", "Python Advanced"]);
    assert_eq!(out.records[1].link, "https://listing.test/c");

    let cached = s.cached_listings("data").unwrap();
    assert_eq!(cached.records.len(), 1);
    s.invalidate_listings();
    assert!(s.cached_listings("").is_none());
}

#[tokio::test]
async fn fetch_failure_is_empty_not_fatal() {
    let (mut s, _) = session(Arc::new(Refused));
    let out = s.load_listings("", false).await;
    assert!(out.records.is_empty());
    assert!(out.error.is_some());
}

#[tokio::test]
async fn chat_with_and_without_key() {
    let (mut s, calls) = session(Arc::new(Page(PAGE)));

    assert_eq!(s.submit_chat("hello").await, ChatOutcome::NoCredential);
    assert!(s.transcript().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(s.preload_key("AIza-config").unwrap(), "API key loaded");
    assert_eq!(s.relay().state(), RelayState::Ready);
    assert_eq!(s.submit_chat("hello").await, ChatOutcome::Replied("hi".into()));
    assert_eq!(
        s.transcript().messages(),
        [ChatMessage::user("hello"), ChatMessage::assistant("hi")]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn end_clears_everything() {
    let (mut s, _) = session(Arc::new(Page(PAGE)));
    s.enter_key("AIza-typed").unwrap();
    s.submit_chat("hello").await;
    s.load_listings("", false).await;

    s.end();
    assert!(s.is_ended());
    assert!(s.transcript().is_empty());
    assert!(s.cached_listings("").is_none());
    assert_eq!(s.relay().state(), RelayState::AwaitingKey);
}

#[tokio::test]
async fn gemini_rejection_surfaces_inline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listings =
        ListingService::with_source(Arc::new(Page(PAGE)), &ListingSettings::default()).unwrap();
    let connector = ProviderConnector::new(LlmConfig::new(ProviderKind::Gemini).with_endpoint(server.uri()));
    let mut s = Session::start(listings, Duration::from_secs(60), Arc::new(connector));
    s.enter_key("AIza-wrong").unwrap();

    let out = s.submit_chat("hello").await;
    assert!(matches!(out, ChatOutcome::Failed(GiriError::ProviderAuth(_))));
    assert_eq!(s.transcript().messages(), [ChatMessage::user("hello")]);
    assert_eq!(s.relay().state(), RelayState::Ready);
    assert!(out.message().unwrap().starts_with("An error occurred"));
}
