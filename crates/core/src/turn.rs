use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a turn, unique within a transcript
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(String);

impl TurnId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TurnId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TurnId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Render-level lifecycle of an assistant turn
///
/// `Pending -> Streaming -> Done`, with `Errored` reachable from either
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Pending,
    Streaming,
    Done,
    Errored,
}

impl TurnPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::Done | TurnPhase::Errored)
    }
}

/// Per-turn actions that the UI may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnActions {
    pub copy: bool,
    pub edit: bool,
    pub feedback: bool,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub id: TurnId,
    pub role: Role,
    /// Possibly empty while the assistant is streaming
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_content: Option<String>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub loaded: bool,
    #[serde(default)]
    pub is_thinking_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Turn {
    /// Create a user turn with a fresh id
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_id(TurnId::new(), Role::User, content)
    }

    /// Create an empty assistant turn awaiting its first delta
    pub fn pending_assistant(model: Option<String>) -> Self {
        let mut turn = Self::with_id(TurnId::new(), Role::Assistant, "");
        turn.model = model;
        turn
    }

    /// Create a turn with an explicit id
    pub fn with_id(id: impl Into<TurnId>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            thinking_content: None,
            is_error: false,
            // user turns are final as soon as they are sent
            loaded: role == Role::User,
            is_thinking_loading: false,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Derive the render-level phase of this turn
    pub fn phase(&self) -> TurnPhase {
        if self.is_error {
            TurnPhase::Errored
        } else if self.loaded || self.is_user() {
            TurnPhase::Done
        } else if self.content.is_empty() {
            TurnPhase::Pending
        } else {
            TurnPhase::Streaming
        }
    }

    /// Assistant turn with nothing to show yet: rendered as a loading skeleton
    ///
    /// A turn that is still thinking shows its reasoning panel instead.
    pub fn is_streaming_placeholder(&self) -> bool {
        self.is_assistant() && self.content.is_empty() && !self.is_error && !self.is_thinking_loading
    }

    /// Actions available for this turn in its current phase
    pub fn actions(&self) -> TurnActions {
        match self.role {
            Role::User => TurnActions { copy: true, edit: true, feedback: false },
            Role::Assistant if self.loaded => TurnActions { copy: true, edit: false, feedback: true },
            Role::Assistant => TurnActions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_id_unique() {
        let a = TurnId::new();
        let b = TurnId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_turn_is_done() {
        let turn = Turn::user("Hello");
        assert!(turn.is_user());
        assert!(turn.loaded);
        assert_eq!(turn.phase(), TurnPhase::Done);
    }

    #[test]
    fn test_assistant_phases() {
        let mut turn = Turn::pending_assistant(Some("llama3".to_string()));
        assert_eq!(turn.phase(), TurnPhase::Pending);
        assert!(turn.is_streaming_placeholder());

        turn.content.push_str("Hi");
        assert_eq!(turn.phase(), TurnPhase::Streaming);
        assert!(!turn.is_streaming_placeholder());

        turn.loaded = true;
        assert_eq!(turn.phase(), TurnPhase::Done);
        assert!(turn.phase().is_terminal());
    }

    #[test]
    fn test_errored_phase_wins() {
        let mut turn = Turn::pending_assistant(None);
        turn.is_error = true;
        assert_eq!(turn.phase(), TurnPhase::Errored);
        assert!(!turn.is_streaming_placeholder());
    }

    #[test]
    fn test_thinking_turn_is_not_placeholder() {
        let mut turn = Turn::pending_assistant(None);
        turn.is_thinking_loading = true;
        turn.thinking_content = Some("hmm".to_string());
        assert!(!turn.is_streaming_placeholder());
        assert_eq!(turn.phase(), TurnPhase::Pending);
    }

    #[test]
    fn test_actions_gated_on_loaded() {
        let mut turn = Turn::pending_assistant(None);
        turn.content = "partial".to_string();
        assert_eq!(turn.actions(), TurnActions::default());

        turn.loaded = true;
        let actions = turn.actions();
        assert!(actions.copy);
        assert!(actions.feedback);
        assert!(!actions.edit);

        let user = Turn::user("question");
        let actions = user.actions();
        assert!(actions.copy);
        assert!(actions.edit);
        assert!(!actions.feedback);
    }

    #[test]
    fn test_turn_serialization_camel_case() {
        let mut turn = Turn::with_id("a0", Role::Assistant, "Hi");
        turn.thinking_content = Some("reasoning".to_string());
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"thinkingContent\":\"reasoning\""));
        assert!(json.contains("\"role\":\"assistant\""));
        assert!(json.contains("\"isError\":false"));

        let parsed: Turn = serde_json::from_str(r#"{"id":"u0","role":"user","content":"Q"}"#).unwrap();
        assert_eq!(parsed.id, TurnId::from("u0"));
        assert!(!parsed.loaded);
    }
}
