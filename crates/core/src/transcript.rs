//! Ordered conversation transcript with streaming updates.
//!
//! The transcript is append-only except for two mutations: streaming deltas
//! into the trailing assistant turn, and truncation when a user turn is edited
//! and resent. Ordering in the sequence is the only chronology signal.
//!
//! Consumers observe changes through [`Transcript::subscribe`]; the owner of
//! `&mut Transcript` is the single writer.

use crate::error::TranscriptError;
use crate::turn::{Role, Turn, TurnId};

use std::collections::HashSet;
use tokio::sync::broadcast;

/// Capacity of the change-event channel; slow readers observe `Lagged`
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Change notification published by the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// A turn was appended at the end
    Appended(TurnId),
    /// The trailing assistant turn received a delta
    Updated(TurnId),
    /// The trailing assistant turn reached DONE or ERRORED
    Finalized(TurnId),
    /// Turns were discarded; `len` is the new length
    Truncated { len: usize },
    /// The transcript was reset for a new conversation
    Cleared,
}

/// Incremental fragment of assistant output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    pub content: Option<String>,
    pub thinking: Option<String>,
}

impl Delta {
    pub fn content(text: impl Into<String>) -> Self {
        Self { content: Some(text.into()), thinking: None }
    }

    pub fn thinking(text: impl Into<String>) -> Self {
        Self { content: None, thinking: Some(text.into()) }
    }

    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty) && self.thinking.as_deref().is_none_or(str::is_empty)
    }
}

/// Request handed to the send handler when a user turn is edited
///
/// The transcript itself is untouched; the controller applies the truncation
/// once it accepts the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendRequest {
    /// Replacement turn carrying the original id and the new content
    pub turn: Turn,
    /// All turns strictly before the edited one
    pub prefix: Vec<Turn>,
}

/// Ordered list of conversation turns
///
/// Cloning copies the turns into an independent transcript with its own
/// change channel; subscribers of the original never see the clone's edits.
#[derive(Debug)]
pub struct Transcript {
    turns: Vec<Turn>,
    events: broadcast::Sender<TranscriptEvent>,
}

impl Transcript {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { turns: Vec::new(), events }
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: TranscriptEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Append a turn at the end
    ///
    /// Rejects a turn whose id is already present, and thinking content on
    /// user turns. The transcript is unchanged on error.
    pub fn append(&mut self, turn: Turn) -> Result<(), TranscriptError> {
        if self.contains(&turn.id) {
            tracing::warn!(turn_id = %turn.id, "rejected turn with duplicate id");
            return Err(TranscriptError::DuplicateId(turn.id));
        }
        if turn.role == Role::User && turn.thinking_content.is_some() {
            return Err(TranscriptError::ThinkingOnUserTurn(turn.id));
        }

        let id = turn.id.clone();
        self.turns.push(turn);
        self.publish(TranscriptEvent::Appended(id));
        Ok(())
    }

    fn trailing_assistant_mut(&mut self) -> Result<&mut Turn, TranscriptError> {
        match self.turns.last_mut() {
            Some(turn) if turn.is_assistant() => {
                if turn.phase().is_terminal() {
                    Err(TranscriptError::TurnFinalized(turn.id.clone()))
                } else {
                    Ok(turn)
                }
            }
            _ => Err(TranscriptError::NoTrailingAssistant),
        }
    }

    /// Append a streaming delta to the trailing assistant turn
    ///
    /// The last turn must be a non-final assistant turn; a delta arriving
    /// after a user turn is rejected rather than creating a new turn.
    pub fn update_trailing_assistant(&mut self, delta: &Delta) -> Result<(), TranscriptError> {
        let turn = self.trailing_assistant_mut()?;
        if delta.is_empty() {
            return Ok(());
        }

        if let Some(thinking) = delta.thinking.as_deref().filter(|t| !t.is_empty()) {
            turn.thinking_content.get_or_insert_with(String::new).push_str(thinking);
            turn.is_thinking_loading = true;
        }

        if let Some(content) = delta.content.as_deref().filter(|c| !c.is_empty()) {
            turn.content.push_str(content);
            turn.is_thinking_loading = false;
        }

        let id = turn.id.clone();
        self.publish(TranscriptEvent::Updated(id));
        Ok(())
    }

    /// Mark the trailing assistant turn as DONE
    pub fn complete_trailing_assistant(&mut self) -> Result<(), TranscriptError> {
        let turn = self.trailing_assistant_mut()?;
        turn.loaded = true;
        turn.is_thinking_loading = false;

        let id = turn.id.clone();
        self.publish(TranscriptEvent::Finalized(id));
        Ok(())
    }

    /// Mark the trailing assistant turn as ERRORED, keeping any partial output
    pub fn fail_trailing_assistant(&mut self, message: impl Into<String>) -> Result<(), TranscriptError> {
        let message = message.into();
        let turn = self.trailing_assistant_mut()?;
        if turn.content.is_empty() {
            turn.content = message;
        } else if !message.is_empty() {
            turn.content.push_str("\n\n");
            turn.content.push_str(&message);
        }
        turn.is_error = true;
        turn.is_thinking_loading = false;

        let id = turn.id.clone();
        self.publish(TranscriptEvent::Finalized(id));
        Ok(())
    }

    /// Build the request for editing a turn and resending it
    ///
    /// Returns `None` when the id is unknown or the new content is empty.
    pub fn edit_and_resend(&self, turn_id: &TurnId, new_content: &str) -> Option<ResendRequest> {
        if new_content.is_empty() {
            return None;
        }
        let index = self.position(turn_id)?;
        let mut turn = self.turns[index].clone();
        turn.content = new_content.to_string();

        Some(ResendRequest { turn, prefix: self.turns[..index].to_vec() })
    }

    /// Discard the given turn and everything after it
    ///
    /// Returns the number of turns removed.
    pub fn truncate_before(&mut self, turn_id: &TurnId) -> Result<usize, TranscriptError> {
        let index = self.position(turn_id).ok_or_else(|| TranscriptError::NotFound(turn_id.clone()))?;
        let removed = self.turns.len() - index;
        self.turns.truncate(index);
        self.publish(TranscriptEvent::Truncated { len: index });
        Ok(removed)
    }

    /// Replace the whole sequence, e.g. with a resend prefix
    pub fn replace_with(&mut self, turns: Vec<Turn>) -> Result<(), TranscriptError> {
        let mut seen = HashSet::with_capacity(turns.len());
        for turn in &turns {
            if !seen.insert(&turn.id) {
                return Err(TranscriptError::DuplicateId(turn.id.clone()));
            }
        }
        self.turns = turns;
        self.publish(TranscriptEvent::Truncated { len: self.turns.len() });
        Ok(())
    }

    /// Reset for a new conversation
    pub fn clear(&mut self) {
        self.turns.clear();
        self.publish(TranscriptEvent::Cleared);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn get(&self, turn_id: &TurnId) -> Option<&Turn> {
        self.turns.iter().find(|t| &t.id == turn_id)
    }

    pub fn position(&self, turn_id: &TurnId) -> Option<usize> {
        self.turns.iter().position(|t| &t.id == turn_id)
    }

    pub fn contains(&self, turn_id: &TurnId) -> bool {
        self.position(turn_id).is_some()
    }

    /// Turns strictly before the given turn
    pub fn slice_before(&self, turn_id: &TurnId) -> Option<&[Turn]> {
        self.position(turn_id).map(|index| &self.turns[..index])
    }

    /// Whether the trailing turn is an assistant turn still receiving output
    pub fn is_streaming(&self) -> bool {
        self.turns.last().is_some_and(|t| t.is_assistant() && !t.phase().is_terminal())
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Transcript {
    fn clone(&self) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { turns: self.turns.clone(), events }
    }
}
