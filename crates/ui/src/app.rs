mod event_loop;
mod rendering;

pub use event_loop::{LoopEvent, TerminalModes};
pub use rendering::render_frame;

use std::sync::Arc;

use ollaix_core::{Submission, Turn, TurnId};
use ollaix_providers::{ChatController, ChatRequest, StreamEvent, UpdateEvent};
use tokio::sync::mpsc;

use crate::clipboard::{Clipboard, Osc52Clipboard};
use crate::event_handler::KeyAction;
use crate::session::{ChatSession, SessionEvent};
use crate::state::AppState;
use crate::syntax::SyntaxHighlighter;

/// Why the event loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppExit {
    Quit,
    /// An update was accepted; the caller should restart the process
    Reload,
}

/// Main TUI application
///
/// Owns the state and the chat session. All mutation happens on the event
/// loop task; controller output arrives as [`SessionEvent`]s.
pub struct App {
    state: AppState,
    session: ChatSession,
    session_rx: mpsc::UnboundedReceiver<SessionEvent>,
    update_rx: Option<mpsc::Receiver<UpdateEvent>>,
    clipboard: Box<dyn Clipboard>,
    highlighter: SyntaxHighlighter,
    exit: Option<AppExit>,
}

impl App {
    pub fn new(state: AppState, controller: Arc<dyn ChatController>) -> Self {
        let (session, session_rx) = ChatSession::new(controller);
        Self {
            state,
            session,
            session_rx,
            update_rx: None,
            clipboard: Box::new(Osc52Clipboard::stdout()),
            highlighter: SyntaxHighlighter::new(),
            exit: None,
        }
    }

    /// Listen for "update available" notices
    pub fn with_update_events(mut self, rx: mpsc::Receiver<UpdateEvent>) -> Self {
        self.update_rx = Some(rx);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Kick off background work that the first frame depends on
    pub fn start(&self) {
        self.session.load_models();
    }

    /// Get a reference to the application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a mutable reference to the application state
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn exit(&self) -> Option<AppExit> {
        self.exit
    }

    /// Wait for the next message from a controller task
    pub async fn next_session_event(&mut self) -> Option<SessionEvent> {
        self.session_rx.recv().await
    }

    pub fn handle_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Send(submission) => self.submit(submission),
            KeyAction::SubmitEdit { turn_id, content } => self.resend(&turn_id, &content),
            KeyAction::CancelEdit => self.state.cancel_edit(),
            KeyAction::Stop => self.stop(),
            KeyAction::Quit => {
                self.stop();
                self.exit = Some(AppExit::Quit);
            }
            KeyAction::ScrollUp => self.state.viewport.scroll_by(-1),
            KeyAction::ScrollDown => self.state.viewport.scroll_by(1),
            KeyAction::PageUp => self.state.viewport.page_up(),
            KeyAction::PageDown => self.state.viewport.page_down(),
            KeyAction::ScrollToBottom => self.state.viewport.scroll_to_bottom(),
            KeyAction::FocusPrev => {
                self.state.focus_prev();
                self.reveal_focused();
            }
            KeyAction::FocusNext => {
                self.state.focus_next();
                self.reveal_focused();
            }
            KeyAction::Copy => self.copy_target(),
            KeyAction::Edit => {
                self.state.begin_edit();
            }
            KeyAction::Like => {
                self.state.toggle_like();
            }
            KeyAction::Dislike => {
                self.state.toggle_dislike();
            }
            KeyAction::ToggleThinking => {
                self.state.toggle_thinking();
            }
            KeyAction::NewConversation => {
                self.stop();
                self.state.new_conversation();
                self.state.viewport.scroll_to_bottom();
            }
            KeyAction::Reload => {
                if self.state.update_prompt.reload().is_some() {
                    tracing::info!("reload requested");
                    self.stop();
                    self.exit = Some(AppExit::Reload);
                }
            }
            KeyAction::DismissUpdate => self.state.update_prompt.dismiss(),
        }
    }

    /// Append the user turn plus an assistant placeholder and start streaming
    ///
    /// The composer keeps its text until the user turn is in the transcript.
    fn submit(&mut self, submission: Submission) {
        if self.state.is_generating() {
            tracing::warn!("send ignored while a reply is streaming");
            return;
        }
        let prior = self.state.transcript.turns().to_vec();
        let turn = Turn::user(submission.content.clone()).with_model(submission.model_id.clone());

        if let Err(e) = self.state.transcript.append(turn.clone()) {
            tracing::warn!(error = %e, "could not append user turn");
            return;
        }
        self.state.composer.commit_submission(&submission);
        self.start_reply(ChatRequest::new(submission.model_id, turn, prior));
    }

    /// Replace a user turn and everything after it, then ask again
    fn resend(&mut self, turn_id: &TurnId, content: &str) {
        let Some(model_id) = self.state.composer.selected_model().map(|m| m.id.clone()) else {
            return;
        };
        let Some(request) = self.state.transcript.edit_and_resend(turn_id, content) else {
            return;
        };

        self.stop();
        if let Err(e) = self.state.transcript.truncate_before(turn_id) {
            tracing::warn!(error = %e, "resend target vanished");
            return;
        }
        self.state.edit = None;
        self.state.prune();

        let turn = request.turn.with_model(model_id.clone());
        if let Err(e) = self.state.transcript.append(turn.clone()) {
            tracing::warn!(error = %e, "could not append edited turn");
            return;
        }
        self.start_reply(ChatRequest::new(model_id, turn, request.prefix));
    }

    fn start_reply(&mut self, request: ChatRequest) {
        let placeholder = Turn::pending_assistant(Some(request.model.clone()));
        if let Err(e) = self.state.transcript.append(placeholder) {
            tracing::warn!(error = %e, "could not append assistant placeholder");
            return;
        }

        self.state.composer.set_loading(true);
        self.state.error = None;
        self.state.focused = None;
        self.state.viewport.scroll_to_bottom();
        self.session.send(request);
    }

    /// Cancel the in-flight reply, keeping whatever already arrived
    fn stop(&mut self) {
        if self.session.cancel() {
            let message = self.state.strings.cancelled.clone();
            self.settle_trailing(&message);
        }
    }

    /// Finalize a reply that ended without a terminal event
    ///
    /// Partial content is kept as a finished turn; an empty turn becomes an
    /// error carrying `message`.
    fn settle_trailing(&mut self, message: &str) {
        self.state.composer.set_loading(false);

        let has_content = match self.state.transcript.last() {
            Some(turn) if turn.is_assistant() && !turn.phase().is_terminal() => !turn.content.is_empty(),
            _ => return,
        };
        let result = if has_content {
            self.state.transcript.complete_trailing_assistant()
        } else {
            self.state.transcript.fail_trailing_assistant(message)
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "could not settle trailing turn");
        }
    }

    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Models(Ok(models)) => {
                tracing::info!(count = models.len(), "models loaded");
                let default = self.state.config.default_model_id().map(str::to_string);
                self.state.composer.set_models(models, default.as_deref());
                self.state.models_loaded = true;
            }
            SessionEvent::Models(Err(message)) => {
                self.state.models_loaded = true;
                self.state.error = Some(message);
            }
            SessionEvent::Stream { generation, event } => {
                if !self.session.is_current(generation) {
                    tracing::trace!(generation, "dropped stale stream event");
                    return;
                }
                self.apply_stream_event(event);
            }
            SessionEvent::Finished { generation } => {
                if !self.session.is_current(generation) {
                    return;
                }
                self.session.finish(generation);
                let message = self.state.strings.error.clone();
                self.settle_trailing(&message);
            }
        }
    }

    fn apply_stream_event(&mut self, event: StreamEvent) {
        let result = match &event {
            StreamEvent::Content(_) | StreamEvent::Thinking(_) => match event.as_delta() {
                Some(delta) => self.state.transcript.update_trailing_assistant(&delta),
                None => Ok(()),
            },
            StreamEvent::Done => {
                self.state.composer.set_loading(false);
                self.state.transcript.complete_trailing_assistant()
            }
            StreamEvent::Error(message) => {
                tracing::warn!(error = %message, "reply failed");
                self.state.composer.set_loading(false);
                self.state.transcript.fail_trailing_assistant(message.clone())
            }
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "stream event rejected");
        }
    }

    pub fn handle_update_event(&mut self, event: UpdateEvent) {
        match event {
            UpdateEvent::NeedRefresh => self.state.update_prompt.set_need_refresh(true),
        }
    }

    fn copy_target(&mut self) {
        let Some(content) = self.state.target_turn().filter(|t| t.actions().copy).map(|t| t.content.clone()) else {
            return;
        };
        match self.clipboard.copy(&content) {
            Ok(()) => {
                let copied = self.state.strings.copied.clone();
                self.state.set_status(copied);
            }
            Err(e) => tracing::warn!(error = %e, "clipboard copy failed"),
        }
    }

    fn reveal_focused(&mut self) {
        match self.state.focused.clone() {
            Some(id) => self.state.viewport.reveal(&id),
            None => self.state.viewport.scroll_to_bottom(),
        }
    }
}
