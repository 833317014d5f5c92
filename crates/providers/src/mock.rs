use crate::controller::{ChatController, ChatStream};
use crate::types::*;
use ollaix_core::{Error, Model, Provider, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Model listed when the mock file declares none
pub const MOCK_MODEL_ID: &str = "mock-model";

/// Mock response types for deterministic testing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MockResponse {
    Text {
        content: String,
        #[serde(default)]
        thinking: Option<String>,
    },
    Error {
        message: String,
    },
    Sequence {
        events: Vec<MockEvent>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum MockEvent {
    Content { text: String },
    Thinking { text: String },
    Error { message: String },
    Delay { ms: u64 },
    Done,
}

/// Mock configuration from TOML file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MockConfig {
    #[serde(default)]
    models: Vec<Model>,
    responses: Vec<MockResponse>,
}

/// Scripted controller for tests and offline demos
///
/// Replies are handed out in order; once exhausted, every further send
/// reports an error.
pub struct MockController {
    models: Vec<Model>,
    responses: Vec<MockResponse>,
    current: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockController {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            models: vec![Model::new(MOCK_MODEL_ID, "Mock Model", Provider::Ollama)],
            responses,
            current: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_models(mut self, models: Vec<Model>) -> Self {
        self.models = models;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MockConfig =
            toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse mock responses: {}", e)))?;

        let controller = Self::new(config.responses);
        Ok(if config.models.is_empty() { controller } else { controller.with_models(config.models) })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read mock responses {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn next_response(&self) -> MockResponse {
        let index = self.current.fetch_add(1, Ordering::SeqCst);
        self.responses.get(index).cloned().unwrap_or_else(|| MockResponse::Error {
            message: format!(
                "No more mock responses configured (requested: {}, available: {})",
                index + 1,
                self.responses.len()
            ),
        })
    }

    fn script(response: MockResponse) -> Vec<MockEvent> {
        match response {
            MockResponse::Text { content, thinking } => {
                let mut events = Vec::new();
                if let Some(text) = thinking {
                    events.push(MockEvent::Thinking { text });
                }
                events.push(MockEvent::Content { text: content });
                events.push(MockEvent::Done);
                events
            }
            MockResponse::Error { message } => vec![MockEvent::Error { message }],
            MockResponse::Sequence { events } => events,
        }
    }
}

#[async_trait::async_trait]
impl ChatController for MockController {
    async fn list_models(&self) -> Result<Vec<Model>> {
        Ok(self.models.clone())
    }

    async fn send_message<'a>(&'a self, request: ChatRequest, cancel: CancelToken) -> Result<ChatStream<'a>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let events = Self::script(self.next_response());

        let stream = async_stream::stream! {
            for event in events {
                if cancel.is_cancelled() {
                    return;
                }
                match event {
                    MockEvent::Content { text } => {
                        yield StreamEvent::Content(text);
                    }
                    MockEvent::Thinking { text } => {
                        yield StreamEvent::Thinking(text);
                    }
                    MockEvent::Delay { ms } => {
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                    }
                    MockEvent::Error { message } => {
                        yield StreamEvent::Error(message);
                        return;
                    }
                    MockEvent::Done => {
                        yield StreamEvent::Done;
                        return;
                    }
                }
            }
            yield StreamEvent::Done;
        };

        Ok(Box::pin(stream))
    }
}
