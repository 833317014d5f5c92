mod edit_mode;
mod key_action;
mod normal_mode;

pub use key_action::KeyAction;

use crate::state::AppState;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;

use self::{edit_mode::handle_edit_key, normal_mode::handle_normal_key};

/// Event handler for the TUI application
pub struct EventHandler;

impl EventHandler {
    /// Forward terminal events to a channel from a background task
    ///
    /// The reader owns the crossterm event stream, so input keeps flowing
    /// while the event loop is busy with controller output. The task ends
    /// when the receiver is dropped or the terminal stream fails.
    pub fn spawn_reader() -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            while let Some(result) = reader.next().await {
                match result {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "terminal read failed");
                        break;
                    }
                }
            }
            tracing::debug!("terminal reader stopped");
        });
        rx
    }

    /// Handle a keyboard event and return the action it triggers
    pub fn handle_key_event(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        state.status = None;

        if state.is_editing() { handle_edit_key(event, state) } else { handle_normal_key(event, state) }
    }

    /// Handle any terminal event
    pub fn handle_event(event: &Event, state: &mut AppState) -> Option<KeyAction> {
        match event {
            Event::Key(key_event) => Self::handle_key_event(*key_event, state),
            Event::Paste(text) => {
                Self::handle_paste(text, state);
                None
            }
            _ => None,
        }
    }

    /// Insert pasted text into whichever input has focus
    fn handle_paste(text: &str, state: &mut AppState) {
        let input = match state.edit.as_mut() {
            Some(edit) => &mut edit.input,
            None if state.composer.is_input_enabled() => &mut state.composer.input,
            None => return,
        };
        for c in text.replace("\r\n", "\n").chars() {
            match c {
                '\n' | '\r' => input.insert_newline(),
                c => input.insert_char(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::UiStrings;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ollaix_core::{Config, I18n, Locale, Model, Provider, Role, Submission, Turn};

    fn create_test_state() -> AppState {
        let strings = UiStrings::resolve(&I18n::new(Locale::En).unwrap()).unwrap();
        let mut state = AppState::new(Config::default(), strings);
        state.composer.set_models(
            vec![Model::new("a", "Model A", Provider::Ollama), Model::new("b", "Model B", Provider::Google)],
            None,
        );
        state.models_loaded = true;
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            EventHandler::handle_key_event(key(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn test_typing_and_enter_sends() {
        let mut state = create_test_state();
        type_text(&mut state, "hi");
        assert_eq!(state.composer.input.as_str(), "hi");

        let action = EventHandler::handle_key_event(key(KeyCode::Enter), &mut state);
        assert_eq!(action, Some(KeyAction::Send(Submission { content: "hi".into(), model_id: "a".into() })));
        assert_eq!(state.composer.input.as_str(), "hi");
    }

    #[test]
    fn test_enter_on_blank_input_does_nothing() {
        let mut state = create_test_state();
        type_text(&mut state, "   ");
        assert_eq!(EventHandler::handle_key_event(key(KeyCode::Enter), &mut state), None);
        assert_eq!(state.composer.input.as_str(), "   ");
    }

    #[test]
    fn test_newline_keys() {
        let mut state = create_test_state();
        type_text(&mut state, "a");
        EventHandler::handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT), &mut state);
        EventHandler::handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT), &mut state);
        EventHandler::handle_key_event(ctrl('j'), &mut state);
        assert_eq!(state.composer.input.as_str(), "a\n\n\n");
    }

    #[test]
    fn test_release_events_ignored() {
        let mut state = create_test_state();
        let event = KeyEvent::new_with_kind(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(EventHandler::handle_key_event(event, &mut state), None);
        assert!(state.composer.input.is_blank());
    }

    #[test]
    fn test_ctrl_c_stops_or_quits() {
        let mut state = create_test_state();
        assert_eq!(EventHandler::handle_key_event(ctrl('c'), &mut state), Some(KeyAction::Quit));

        state.composer.set_loading(true);
        assert_eq!(EventHandler::handle_key_event(ctrl('c'), &mut state), Some(KeyAction::Stop));
    }

    #[test]
    fn test_typing_ignored_while_loading() {
        let mut state = create_test_state();
        state.composer.set_loading(true);
        type_text(&mut state, "x");
        assert!(state.composer.input.is_blank());
    }

    #[test]
    fn test_tab_cycles_model() {
        let mut state = create_test_state();
        EventHandler::handle_key_event(key(KeyCode::Tab), &mut state);
        assert_eq!(state.composer.selected_model().unwrap().id, "b");
        EventHandler::handle_key_event(key(KeyCode::BackTab), &mut state);
        assert_eq!(state.composer.selected_model().unwrap().id, "a");
    }

    #[test]
    fn test_escape_order() {
        let mut state = create_test_state();
        state.transcript.append(Turn::with_id("u0", Role::User, "q")).unwrap();
        state.update_prompt.set_need_refresh(true);
        state.focused = Some("u0".into());

        assert_eq!(EventHandler::handle_key_event(key(KeyCode::Esc), &mut state), Some(KeyAction::DismissUpdate));

        state.update_prompt.dismiss();
        assert_eq!(EventHandler::handle_key_event(key(KeyCode::Esc), &mut state), None);
        assert!(state.focused.is_none());

        assert_eq!(EventHandler::handle_key_event(key(KeyCode::Esc), &mut state), Some(KeyAction::Quit));
    }

    #[test]
    fn test_reload_requires_pending_update() {
        let mut state = create_test_state();
        assert_eq!(EventHandler::handle_key_event(ctrl('r'), &mut state), None);

        state.update_prompt.set_need_refresh(true);
        assert_eq!(EventHandler::handle_key_event(ctrl('r'), &mut state), Some(KeyAction::Reload));
    }

    #[test]
    fn test_navigation_keys() {
        let mut state = create_test_state();
        let cases = [
            (KeyEvent::new(KeyCode::Up, KeyModifiers::ALT), KeyAction::FocusPrev),
            (KeyEvent::new(KeyCode::Down, KeyModifiers::ALT), KeyAction::FocusNext),
            (KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT), KeyAction::ScrollUp),
            (KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT), KeyAction::ScrollDown),
            (key(KeyCode::PageUp), KeyAction::PageUp),
            (key(KeyCode::PageDown), KeyAction::PageDown),
            (ctrl('g'), KeyAction::ScrollToBottom),
            (ctrl('t'), KeyAction::ToggleThinking),
            (ctrl('y'), KeyAction::Copy),
            (ctrl('e'), KeyAction::Edit),
            (ctrl('n'), KeyAction::NewConversation),
            (KeyEvent::new(KeyCode::Char('l'), KeyModifiers::ALT), KeyAction::Like),
            (KeyEvent::new(KeyCode::Char('d'), KeyModifiers::ALT), KeyAction::Dislike),
        ];
        for (event, expected) in cases {
            assert_eq!(EventHandler::handle_key_event(event, &mut state), Some(expected));
        }
    }

    #[test]
    fn test_edit_mode_keys() {
        let mut state = create_test_state();
        state.transcript.append(Turn::with_id("u0", Role::User, "old")).unwrap();
        assert!(state.begin_edit());

        EventHandler::handle_key_event(key(KeyCode::Backspace), &mut state);
        type_text(&mut state, "ne");
        assert!(state.composer.input.is_blank());

        let action = EventHandler::handle_key_event(key(KeyCode::Enter), &mut state);
        assert_eq!(action, Some(KeyAction::SubmitEdit { turn_id: "u0".into(), content: "olne".into() }));

        assert_eq!(EventHandler::handle_key_event(key(KeyCode::Esc), &mut state), Some(KeyAction::CancelEdit));
    }

    #[test]
    fn test_edit_mode_blank_not_sendable() {
        let mut state = create_test_state();
        state.transcript.append(Turn::with_id("u0", Role::User, "x")).unwrap();
        assert!(state.begin_edit());

        EventHandler::handle_key_event(key(KeyCode::Backspace), &mut state);
        assert_eq!(EventHandler::handle_key_event(key(KeyCode::Enter), &mut state), None);
        assert!(state.is_editing());
    }

    #[test]
    fn test_paste_goes_to_focused_input() {
        let mut state = create_test_state();
        EventHandler::handle_event(&Event::Paste("one\r\ntwo".into()), &mut state);
        assert_eq!(state.composer.input.as_str(), "one\ntwo");

        state.transcript.append(Turn::with_id("u0", Role::User, "q")).unwrap();
        assert!(state.begin_edit());
        EventHandler::handle_event(&Event::Paste("!".into()), &mut state);
        assert_eq!(state.edit.as_ref().unwrap().input.as_str(), "q!");
        assert_eq!(state.composer.input.as_str(), "one\ntwo");
    }

    #[test]
    fn test_key_clears_status() {
        let mut state = create_test_state();
        state.set_status("Copied");
        EventHandler::handle_key_event(key(KeyCode::Left), &mut state);
        assert!(state.status.is_none());
    }
}
