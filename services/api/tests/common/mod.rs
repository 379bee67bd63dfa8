//! Shared fixtures for the service integration tests.
#![allow(dead_code)]

use api_lib::{
    adapters::{DbAdapter, PngChartRenderer},
    config::Config,
    web::{state::SessionStore, AppState},
};
use async_trait::async_trait;
use mindmate_core::{
    domain::ConversationTurn,
    ports::{GenerativeTextService, PortError, PortResult},
    reply::ReplyStrategy,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub struct TestApp {
    pub state: Arc<AppState>,
    pub db: Arc<DbAdapter>,
    /// Keeps the chart directory alive for the test's duration.
    pub static_dir: TempDir,
}

pub async fn test_app(replies: ReplyStrategy) -> TestApp {
    test_app_with(replies, |_| {}).await
}

/// Like `test_app`, with a chance to adjust the default configuration.
pub async fn test_app_with(replies: ReplyStrategy, adjust: impl FnOnce(&mut Config)) -> TestApp {
    let static_dir = tempfile::tempdir().unwrap();

    let mut config = Config::from_lookup(|_| None).unwrap();
    config.static_dir = static_dir.path().to_path_buf();
    adjust(&mut config);

    let db = Arc::new(DbAdapter::connect("sqlite::memory:").await.unwrap());
    db.run_migrations().await.unwrap();

    let sessions = Arc::new(SessionStore::new(config.session_idle));
    let state = Arc::new(AppState {
        db: db.clone(),
        config: Arc::new(config),
        replies,
        charts: Arc::new(PngChartRenderer::new(static_dir.path(), "static")),
        sessions,
    });

    TestApp { state, db, static_dir }
}

/// Replies with a fixed text and remembers every prompt it was sent.
#[derive(Default)]
pub struct RecordingService {
    pub reply: String,
    pub prompts: Mutex<Vec<Vec<ConversationTurn>>>,
}

impl RecordingService {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GenerativeTextService for RecordingService {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, messages: &[ConversationTurn]) -> PortResult<String> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

pub struct FailingService;

#[async_trait]
impl GenerativeTextService for FailingService {
    fn provider_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _messages: &[ConversationTurn]) -> PortResult<String> {
        Err(PortError::Unexpected("connection refused".to_string()))
    }
}

pub fn remote(service: Arc<dyn GenerativeTextService>) -> ReplyStrategy {
    ReplyStrategy::remote(service, Duration::from_secs(5))
}
