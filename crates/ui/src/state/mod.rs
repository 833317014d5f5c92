mod feedback;
mod viewport;

pub use feedback::Feedback;
pub use viewport::Viewport;

use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use ollaix_core::{ComposerState, Config, InputBuffer, Transcript, Turn, TurnId, UpdatePrompt};

use crate::strings::UiStrings;

/// A user turn being rewritten before it is resent
#[derive(Debug, Clone)]
pub struct EditState {
    pub turn_id: TurnId,
    pub input: InputBuffer,
}

/// Everything the TUI renders, owned by the event loop
///
/// The event loop is the only writer; components borrow it immutably.
pub struct AppState {
    pub config: Config,
    pub strings: UiStrings,
    pub transcript: Transcript,
    pub composer: ComposerState,
    pub viewport: Viewport,
    pub update_prompt: UpdatePrompt,
    /// Turn selected for copy/edit/feedback; `None` means the newest one
    pub focused: Option<TurnId>,
    pub edit: Option<EditState>,
    /// Transient notice shown in the header, cleared on the next key
    pub status: Option<String>,
    /// Error shown in place of the transcript while it is empty
    pub error: Option<String>,
    pub models_loaded: bool,
    feedback: HashMap<TurnId, Feedback>,
    expanded_thinking: HashSet<TurnId>,
    year: i32,
}

impl AppState {
    pub fn new(config: Config, strings: UiStrings) -> Self {
        let viewport = Viewport::new(config.scroll.threshold);
        Self {
            config,
            strings,
            transcript: Transcript::new(),
            composer: ComposerState::new(),
            viewport,
            update_prompt: UpdatePrompt::new(),
            focused: None,
            edit: None,
            status: None,
            error: None,
            models_loaded: false,
            feedback: HashMap::new(),
            expanded_thinking: HashSet::new(),
            year: chrono::Local::now().year(),
        }
    }

    /// Pin the footer year, for deterministic rendering
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn is_generating(&self) -> bool {
        self.composer.is_loading()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Initial message is shown for an empty, idle, error-free conversation
    pub fn shows_initial_message(&self) -> bool {
        self.transcript.is_empty() && !self.is_generating() && self.error.is_none()
    }

    pub fn focused_turn(&self) -> Option<&Turn> {
        self.focused.as_ref().and_then(|id| self.transcript.get(id))
    }

    /// Turn that copy/like/dislike act on: the focused one, else the newest
    pub fn target_turn(&self) -> Option<&Turn> {
        self.focused_turn().or_else(|| self.transcript.last())
    }

    /// Move focus to an older turn
    pub fn focus_prev(&mut self) {
        let turns = self.transcript.turns();
        let index = match self.focused.as_ref().and_then(|id| self.transcript.position(id)) {
            Some(0) => 0,
            Some(i) => i - 1,
            None => match turns.len() {
                0 => return,
                len => len - 1,
            },
        };
        self.focused = Some(turns[index].id.clone());
    }

    /// Move focus to a newer turn; past the newest, focus is released
    pub fn focus_next(&mut self) {
        let Some(index) = self.focused.as_ref().and_then(|id| self.transcript.position(id)) else {
            self.focused = None;
            return;
        };
        self.focused = self.transcript.turns().get(index + 1).map(|t| t.id.clone());
    }

    pub fn feedback(&self, turn_id: &TurnId) -> Feedback {
        self.feedback.get(turn_id).copied().unwrap_or_default()
    }

    /// Toggle like on the target turn if it accepts feedback
    pub fn toggle_like(&mut self) -> Option<Feedback> {
        self.update_feedback(Feedback::toggle_like)
    }

    /// Toggle dislike on the target turn if it accepts feedback
    pub fn toggle_dislike(&mut self) -> Option<Feedback> {
        self.update_feedback(Feedback::toggle_dislike)
    }

    fn update_feedback(&mut self, toggle: fn(Feedback) -> Feedback) -> Option<Feedback> {
        let turn = self.target_turn()?;
        if !turn.actions().feedback {
            return None;
        }
        let id = turn.id.clone();
        let next = toggle(self.feedback(&id));
        self.feedback.insert(id.clone(), next);
        tracing::info!(turn_id = %id, feedback = next.as_str(), "feedback recorded");
        Some(next)
    }

    pub fn is_thinking_expanded(&self, turn_id: &TurnId) -> bool {
        self.expanded_thinking.contains(turn_id)
    }

    /// Show or hide the reasoning of the focused (or newest) assistant turn
    pub fn toggle_thinking(&mut self) -> bool {
        let target = self
            .focused_turn()
            .filter(|t| t.is_assistant())
            .or_else(|| self.transcript.turns().iter().rev().find(|t| t.is_assistant()))
            .filter(|t| t.thinking_content.is_some())
            .map(|t| t.id.clone());

        let Some(id) = target else {
            return false;
        };
        if !self.expanded_thinking.remove(&id) {
            self.expanded_thinking.insert(id);
        }
        true
    }

    /// Open the editor on the focused user turn
    pub fn begin_edit(&mut self) -> bool {
        if self.is_generating() {
            return false;
        }
        let Some((turn_id, content)) =
            self.target_turn().filter(|t| t.actions().edit).map(|t| (t.id.clone(), t.content.clone()))
        else {
            return false;
        };
        let mut input = InputBuffer::new();
        input.set(content);
        self.edit = Some(EditState { turn_id, input });
        true
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Turn id and new content when the edit is ready to send
    ///
    /// A blank edit is not sendable and leaves the editor open.
    pub fn edit_submission(&self) -> Option<(TurnId, String)> {
        let edit = self.edit.as_ref()?;
        if edit.input.is_blank() {
            return None;
        }
        Some((edit.turn_id.clone(), edit.input.as_str().to_string()))
    }

    /// Drop per-turn UI state for turns no longer in the transcript
    pub fn prune(&mut self) {
        let transcript = &self.transcript;
        self.feedback.retain(|id, _| transcript.contains(id));
        self.expanded_thinking.retain(|id| transcript.contains(id));
        if self.focused.as_ref().is_some_and(|id| !transcript.contains(id)) {
            self.focused = None;
        }
        if self.edit.as_ref().is_some_and(|e| !transcript.contains(&e.turn_id)) {
            self.edit = None;
        }
    }

    /// Reset to an empty conversation
    pub fn new_conversation(&mut self) {
        self.transcript.clear();
        self.error = None;
        self.prune();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ollaix_core::{I18n, Locale, Role};

    fn state() -> AppState {
        let strings = UiStrings::resolve(&I18n::new(Locale::En).unwrap()).unwrap();
        AppState::new(Config::default(), strings).with_year(2025)
    }

    fn done_assistant(id: &str, content: &str) -> Turn {
        let mut turn = Turn::with_id(id, Role::Assistant, content);
        turn.loaded = true;
        turn
    }

    fn conversation() -> AppState {
        let mut state = state();
        state.transcript.append(Turn::with_id("u0", Role::User, "hello")).unwrap();
        state.transcript.append(done_assistant("a0", "hi")).unwrap();
        state.transcript.append(Turn::with_id("u1", Role::User, "again")).unwrap();
        state.transcript.append(done_assistant("a1", "sure")).unwrap();
        state
    }

    #[test]
    fn test_initial_message_visibility() {
        let mut state = state();
        assert!(state.shows_initial_message());

        state.error = Some("no models".into());
        assert!(!state.shows_initial_message());

        state.error = None;
        state.composer.set_loading(true);
        assert!(!state.shows_initial_message());
    }

    #[test]
    fn test_scroll_threshold_from_config() {
        let mut config = Config::default();
        config.scroll.threshold = 9;
        let strings = UiStrings::resolve(&I18n::new(Locale::En).unwrap()).unwrap();
        let state = AppState::new(config, strings);
        assert_eq!(state.viewport.auto_scroll.threshold(), 9);
    }

    #[test]
    fn test_focus_navigation() {
        let mut state = conversation();
        assert!(state.focused.is_none());

        state.focus_prev();
        assert_eq!(state.focused, Some(TurnId::from("a1")));
        state.focus_prev();
        state.focus_prev();
        state.focus_prev();
        assert_eq!(state.focused, Some(TurnId::from("u0")));
        state.focus_prev();
        assert_eq!(state.focused, Some(TurnId::from("u0")));

        state.focus_next();
        assert_eq!(state.focused, Some(TurnId::from("a0")));
        state.focused = Some(TurnId::from("a1"));
        state.focus_next();
        assert!(state.focused.is_none());
    }

    #[test]
    fn test_focus_prev_on_empty_transcript() {
        let mut state = state();
        state.focus_prev();
        assert!(state.focused.is_none());
    }

    #[test]
    fn test_feedback_targets_newest_assistant() {
        let mut state = conversation();
        assert_eq!(state.toggle_like(), Some(Feedback::Liked));
        assert_eq!(state.feedback(&TurnId::from("a1")), Feedback::Liked);

        assert_eq!(state.toggle_dislike(), Some(Feedback::Liked));
        assert_eq!(state.toggle_like(), Some(Feedback::None));
        assert_eq!(state.toggle_dislike(), Some(Feedback::Disliked));
    }

    #[test]
    fn test_feedback_rejected_on_user_and_streaming_turns() {
        let mut state = conversation();
        state.focused = Some(TurnId::from("u1"));
        assert_eq!(state.toggle_like(), None);

        state.focused = None;
        state.transcript.append(Turn::with_id("u2", Role::User, "more")).unwrap();
        state.transcript.append(Turn::with_id("a2", Role::Assistant, "")).unwrap();
        assert_eq!(state.toggle_like(), None);
    }

    #[test]
    fn test_begin_edit_only_on_user_turns() {
        let mut state = conversation();
        assert!(!state.begin_edit());

        state.focused = Some(TurnId::from("u1"));
        assert!(state.begin_edit());
        let edit = state.edit.as_ref().unwrap();
        assert_eq!(edit.turn_id, TurnId::from("u1"));
        assert_eq!(edit.input.as_str(), "again");
    }

    #[test]
    fn test_begin_edit_blocked_while_generating() {
        let mut state = conversation();
        state.focused = Some(TurnId::from("u1"));
        state.composer.set_loading(true);
        assert!(!state.begin_edit());
    }

    #[test]
    fn test_blank_edit_is_not_sendable() {
        let mut state = conversation();
        state.focused = Some(TurnId::from("u0"));
        state.begin_edit();
        assert_eq!(state.edit_submission(), Some((TurnId::from("u0"), "hello".to_string())));

        if let Some(edit) = state.edit.as_mut() {
            edit.input.set("   ");
        }
        assert_eq!(state.edit_submission(), None);
        assert!(state.is_editing());
    }

    #[test]
    fn test_toggle_thinking() {
        let mut state = state();
        let mut turn = done_assistant("a0", "answer");
        turn.thinking_content = Some("because".into());
        state.transcript.append(Turn::with_id("u0", Role::User, "q")).unwrap();
        state.transcript.append(turn).unwrap();

        assert!(state.toggle_thinking());
        assert!(state.is_thinking_expanded(&TurnId::from("a0")));
        assert!(state.toggle_thinking());
        assert!(!state.is_thinking_expanded(&TurnId::from("a0")));
    }

    #[test]
    fn test_toggle_thinking_without_reasoning() {
        let mut state = conversation();
        assert!(!state.toggle_thinking());
    }

    #[test]
    fn test_new_conversation_resets_turn_state() {
        let mut state = conversation();
        state.toggle_like();
        state.focused = Some(TurnId::from("u1"));
        state.error = Some("boom".into());

        state.new_conversation();
        assert!(state.transcript.is_empty());
        assert!(state.focused.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.feedback(&TurnId::from("a1")), Feedback::None);
        assert!(state.shows_initial_message());
    }
}
