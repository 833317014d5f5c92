//! Message composer: input buffer, model selection and submit gating.

use crate::model::{Model, resolve_default_model};

/// Editable multi-line input with a cursor and sent-message history
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    buffer: String,
    cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    draft: Option<String>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// Replace the content and move the cursor to the end
    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.reset_history_navigation();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.buffer.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    /// Move to the start of the current line
    pub fn move_home(&mut self) {
        self.cursor = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
    }

    /// Move to the end of the current line
    pub fn move_end(&mut self) {
        self.cursor = self.buffer[self.cursor..].find('\n').map_or(self.buffer.len(), |i| self.cursor + i);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..].chars().next().map(|c| self.cursor + c.len_utf8())
    }

    /// Remember a sent message for history navigation
    pub fn add_to_history(&mut self, message: String) {
        if self.history.last() != Some(&message) {
            self.history.push(message);
        }
        self.reset_history_navigation();
    }

    /// Recall the previous (older) sent message
    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        if self.history_index.is_none() && !self.buffer.is_empty() {
            self.draft = Some(self.buffer.clone());
        }
        let index = match self.history_index {
            None => self.history.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.buffer = self.history[index].clone();
        self.cursor = self.buffer.len();
        self.history_index = Some(index);
    }

    /// Recall the next (newer) sent message, restoring the draft past the end
    pub fn history_down(&mut self) {
        let Some(index) = self.history_index else {
            return;
        };
        if index + 1 >= self.history.len() {
            self.buffer = self.draft.take().unwrap_or_default();
            self.history_index = None;
        } else {
            self.buffer = self.history[index + 1].clone();
            self.history_index = Some(index + 1);
        }
        self.cursor = self.buffer.len();
    }

    pub fn is_navigating_history(&self) -> bool {
        self.history_index.is_some()
    }

    fn reset_history_navigation(&mut self) {
        self.history_index = None;
        self.draft = None;
    }
}

/// Editing keys understood by the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerKey {
    Char(char),
    /// `Enter` submits; `Shift+Enter` inserts a newline
    Enter { shift: bool },
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    HistoryUp,
    HistoryDown,
}

/// What the primary composer button does right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Send { enabled: bool },
    Stop,
}

/// A message accepted for sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub content: String,
    pub model_id: String,
}

/// Composer state: input, model selection and in-flight flag
#[derive(Debug, Clone, Default)]
pub struct ComposerState {
    pub input: InputBuffer,
    models: Vec<Model>,
    selected: Option<String>,
    is_loading: bool,
}

impl ComposerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the model list and resolve the selection against the configured default
    pub fn set_models(&mut self, models: Vec<Model>, configured_default: Option<&str>) {
        self.selected = resolve_default_model(&models, configured_default).map(|m| m.id.clone());
        self.models = models;
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn selected_model(&self) -> Option<&Model> {
        let id = self.selected.as_deref()?;
        self.models.iter().find(|m| m.id == id)
    }

    /// Select a model by id; unknown ids and in-flight sends leave the selection alone
    pub fn select_model(&mut self, id: &str) -> bool {
        if self.is_loading || !self.models.iter().any(|m| m.id == id) {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    /// Move the selection forward or backward through the model list
    pub fn cycle_model(&mut self, step: isize) {
        if self.is_loading || self.models.is_empty() {
            return;
        }
        let len = self.models.len() as isize;
        let current = self
            .selected
            .as_deref()
            .and_then(|id| self.models.iter().position(|m| m.id == id))
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        self.selected = Some(self.models[next].id.clone());
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    /// Input accepts edits only when idle and a model is available
    pub fn is_input_enabled(&self) -> bool {
        !self.is_loading && self.selected_model().is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading && self.selected_model().is_some() && !self.input.is_blank()
    }

    pub fn primary_action(&self) -> PrimaryAction {
        if self.is_loading { PrimaryAction::Stop } else { PrimaryAction::Send { enabled: !self.input.is_blank() } }
    }

    /// The submission the input would produce, leaving the buffer untouched
    pub fn pending_submission(&self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        let model_id = self.selected_model()?.id.clone();
        Some(Submission { content: self.input.as_str().to_string(), model_id })
    }

    /// Clear the input once a submission has been accepted
    pub fn commit_submission(&mut self, submission: &Submission) {
        if self.input.as_str() == submission.content {
            self.input.clear();
        }
        self.input.add_to_history(submission.content.clone());
    }

    /// Take the input as a submission if sending is allowed
    pub fn submit(&mut self) -> Option<Submission> {
        let submission = self.pending_submission()?;
        self.commit_submission(&submission);
        Some(submission)
    }

    /// Request cancellation of the in-flight send; only meaningful while loading
    pub fn stop(&self) -> bool {
        self.is_loading
    }

    /// Apply an editing key; returns a submission when `Enter` sends
    ///
    /// The input is kept until the caller accepts the submission with
    /// [`ComposerState::commit_submission`].
    pub fn handle_key(&mut self, key: ComposerKey) -> Option<Submission> {
        if let ComposerKey::Enter { shift: false } = key {
            return self.pending_submission();
        }
        if !self.is_input_enabled() {
            return None;
        }
        match key {
            ComposerKey::Char(c) => self.input.insert_char(c),
            ComposerKey::Enter { .. } => self.input.insert_newline(),
            ComposerKey::Backspace => self.input.backspace(),
            ComposerKey::Delete => self.input.delete(),
            ComposerKey::Left => self.input.move_left(),
            ComposerKey::Right => self.input.move_right(),
            ComposerKey::Home => self.input.move_home(),
            ComposerKey::End => self.input.move_end(),
            ComposerKey::HistoryUp => self.input.history_up(),
            ComposerKey::HistoryDown => self.input.history_down(),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provider;

    fn models() -> Vec<Model> {
        vec![Model::new("a", "Model A", Provider::Ollama), Model::new("b", "Model B", Provider::Google)]
    }

    fn ready_composer() -> ComposerState {
        let mut composer = ComposerState::new();
        composer.set_models(models(), None);
        composer
    }

    #[test]
    fn test_input_buffer_editing() {
        let mut input = InputBuffer::new();
        input.insert_char('H');
        input.insert_char('i');
        assert_eq!(input.as_str(), "Hi");
        assert_eq!(input.cursor(), 2);

        input.backspace();
        assert_eq!(input.as_str(), "H");

        input.move_home();
        input.insert_char('O');
        assert_eq!(input.as_str(), "OH");

        input.delete();
        assert_eq!(input.as_str(), "O");
        input.clear();
        assert!(input.is_blank());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_input_buffer_multibyte() {
        let mut input = InputBuffer::new();
        for c in "héé".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.cursor(), "héé".len());

        input.move_left();
        input.backspace();
        assert_eq!(input.as_str(), "hé");

        input.move_right();
        input.backspace();
        assert_eq!(input.as_str(), "h");
    }

    #[test]
    fn test_input_buffer_home_end_per_line() {
        let mut input = InputBuffer::new();
        input.set("first\nsecond");
        input.move_home();
        assert_eq!(input.cursor(), 6);
        input.move_left();
        input.move_home();
        assert_eq!(input.cursor(), 0);
        input.move_end();
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_input_buffer_history() {
        let mut input = InputBuffer::new();
        input.add_to_history("one".to_string());
        input.add_to_history("two".to_string());
        input.add_to_history("two".to_string());
        input.set("draft");

        input.history_up();
        assert_eq!(input.as_str(), "two");
        input.history_up();
        assert_eq!(input.as_str(), "one");
        input.history_up();
        assert_eq!(input.as_str(), "one");

        input.history_down();
        assert_eq!(input.as_str(), "two");
        input.history_down();
        assert_eq!(input.as_str(), "draft");
        assert!(!input.is_navigating_history());
    }

    #[test]
    fn test_submit_blocked_on_empty_and_whitespace() {
        let mut composer = ready_composer();
        assert!(!composer.can_submit());

        composer.input.set("   ");
        assert!(!composer.can_submit());
        assert!(composer.submit().is_none());

        composer.input.set(" \n\t ");
        assert!(!composer.can_submit());
    }

    #[test]
    fn test_submit_blocked_while_loading() {
        let mut composer = ready_composer();
        composer.input.set("hello");
        composer.set_loading(true);
        assert!(!composer.can_submit());
        assert_eq!(composer.primary_action(), PrimaryAction::Stop);
        assert!(composer.stop());
    }

    #[test]
    fn test_submit_blocked_without_model() {
        let mut composer = ComposerState::new();
        composer.input.set("hello");
        assert!(!composer.can_submit());
        assert!(!composer.is_input_enabled());
    }

    #[test]
    fn test_submit_enabled() {
        let mut composer = ready_composer();
        composer.input.set("hello");
        assert!(composer.can_submit());
        assert_eq!(composer.primary_action(), PrimaryAction::Send { enabled: true });
        assert!(!composer.stop());

        let submission = composer.submit().unwrap();
        assert_eq!(submission.content, "hello");
        assert_eq!(submission.model_id, "a");
        assert!(composer.input.as_str().is_empty());
    }

    #[test]
    fn test_default_model_resolution() {
        let mut composer = ComposerState::new();
        composer.set_models(models(), Some("b"));
        assert_eq!(composer.selected_model().unwrap().id, "b");

        composer.set_models(models(), Some("z"));
        assert_eq!(composer.selected_model().unwrap().id, "a");

        composer.set_models(vec![], Some("b"));
        assert!(composer.selected_model().is_none());
    }

    #[test]
    fn test_select_and_cycle_model() {
        let mut composer = ready_composer();
        assert!(composer.select_model("b"));
        assert!(!composer.select_model("missing"));
        assert_eq!(composer.selected_model().unwrap().id, "b");

        composer.cycle_model(1);
        assert_eq!(composer.selected_model().unwrap().id, "a");
        composer.cycle_model(-1);
        assert_eq!(composer.selected_model().unwrap().id, "b");

        composer.set_loading(true);
        assert!(!composer.select_model("a"));
        composer.cycle_model(1);
        assert_eq!(composer.selected_model().unwrap().id, "b");
    }

    #[test]
    fn test_enter_submits_shift_enter_newline() {
        let mut composer = ready_composer();
        composer.handle_key(ComposerKey::Char('h'));
        composer.handle_key(ComposerKey::Char('i'));
        assert!(composer.handle_key(ComposerKey::Enter { shift: true }).is_none());
        composer.handle_key(ComposerKey::Char('!'));
        assert_eq!(composer.input.as_str(), "hi\n!");

        let submission = composer.handle_key(ComposerKey::Enter { shift: false }).unwrap();
        assert_eq!(submission.content, "hi\n!");
        assert_eq!(composer.input.as_str(), "hi\n!");
    }

    #[test]
    fn test_enter_keeps_input_until_committed() {
        let mut composer = ready_composer();
        composer.input.set("keep me");

        let submission = composer.handle_key(ComposerKey::Enter { shift: false }).unwrap();
        assert_eq!(composer.input.as_str(), "keep me");

        composer.commit_submission(&submission);
        assert!(composer.input.is_blank());
        composer.input.history_up();
        assert_eq!(composer.input.as_str(), "keep me");
    }

    #[test]
    fn test_enter_on_blank_does_nothing() {
        let mut composer = ready_composer();
        composer.handle_key(ComposerKey::Char(' '));
        assert!(composer.handle_key(ComposerKey::Enter { shift: false }).is_none());
        assert_eq!(composer.input.as_str(), " ");
    }

    #[test]
    fn test_edits_ignored_while_loading() {
        let mut composer = ready_composer();
        composer.set_loading(true);
        composer.handle_key(ComposerKey::Char('x'));
        assert!(composer.input.as_str().is_empty());
    }
}
