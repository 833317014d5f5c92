use ollaix_core::transcript::Delta;
use ollaix_core::{Role, Turn};
use serde::{Deserialize, Serialize};

/// One message in the history sent to a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self { role: turn.role, content: turn.content.clone() }
    }
}

/// A user turn plus the transcript that precedes it
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub turn: Turn,
    pub prior: Vec<Turn>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, turn: Turn, prior: Vec<Turn>) -> Self {
        Self { model: model.into(), turn, prior }
    }

    /// Full message history, ending with the new turn
    ///
    /// Errored and still-streaming turns are left out.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.prior
            .iter()
            .filter(|t| !t.is_error && !t.is_streaming_placeholder())
            .chain(std::iter::once(&self.turn))
            .map(ChatMessage::from)
            .collect()
    }
}

/// Events yielded by a chat stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A fragment of the visible answer
    Content(String),
    /// A fragment of the reasoning side channel
    Thinking(String),
    /// Transport or model failure; terminal
    Error(String),
    /// End of stream
    Done,
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Error(_) | StreamEvent::Done)
    }

    /// The transcript delta carried by this event, if any
    pub fn as_delta(&self) -> Option<Delta> {
        match self {
            StreamEvent::Content(text) => Some(Delta::content(text.clone())),
            StreamEvent::Thinking(text) => Some(Delta::thinking(text.clone())),
            StreamEvent::Error(_) | StreamEvent::Done => None,
        }
    }
}

/// Token for cancelling streaming operations
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self { cancelled: std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false)) }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(std::sync::atomic::Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, std::sync::atomic::Ordering::SeqCst);
    }
}
