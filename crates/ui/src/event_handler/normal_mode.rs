use crate::state::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ollaix_core::ComposerKey;

use super::KeyAction;

/// Handle keys while the composer has focus
pub fn handle_normal_key(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl {
        return match event.code {
            KeyCode::Char('c') if state.is_generating() => Some(KeyAction::Stop),
            KeyCode::Char('c') => Some(KeyAction::Quit),
            KeyCode::Char('n') => Some(KeyAction::NewConversation),
            KeyCode::Char('y') => Some(KeyAction::Copy),
            KeyCode::Char('e') => Some(KeyAction::Edit),
            KeyCode::Char('r') if state.update_prompt.need_refresh() => Some(KeyAction::Reload),
            KeyCode::Char('t') => Some(KeyAction::ToggleThinking),
            KeyCode::Char('g') | KeyCode::End => Some(KeyAction::ScrollToBottom),
            KeyCode::Char('j') => {
                state.composer.handle_key(ComposerKey::Enter { shift: true });
                None
            }
            _ => None,
        };
    }

    if alt {
        return match event.code {
            KeyCode::Char('l') => Some(KeyAction::Like),
            KeyCode::Char('d') => Some(KeyAction::Dislike),
            KeyCode::Up => Some(KeyAction::FocusPrev),
            KeyCode::Down => Some(KeyAction::FocusNext),
            KeyCode::Enter => {
                state.composer.handle_key(ComposerKey::Enter { shift: true });
                None
            }
            _ => None,
        };
    }

    let key = match event.code {
        KeyCode::Up if shift => return Some(KeyAction::ScrollUp),
        KeyCode::Down if shift => return Some(KeyAction::ScrollDown),
        KeyCode::PageUp => return Some(KeyAction::PageUp),
        KeyCode::PageDown => return Some(KeyAction::PageDown),
        KeyCode::Tab => {
            state.composer.cycle_model(1);
            return None;
        }
        KeyCode::BackTab => {
            state.composer.cycle_model(-1);
            return None;
        }
        KeyCode::Esc => return handle_escape(state),
        KeyCode::Enter => ComposerKey::Enter { shift },
        KeyCode::Char(c) => ComposerKey::Char(c),
        KeyCode::Backspace => ComposerKey::Backspace,
        KeyCode::Delete => ComposerKey::Delete,
        KeyCode::Left => ComposerKey::Left,
        KeyCode::Right => ComposerKey::Right,
        KeyCode::Home => ComposerKey::Home,
        KeyCode::End => ComposerKey::End,
        KeyCode::Up => ComposerKey::HistoryUp,
        KeyCode::Down => ComposerKey::HistoryDown,
        _ => return None,
    };

    state.composer.handle_key(key).map(KeyAction::Send)
}

/// Esc closes the innermost thing that is open, then quits
fn handle_escape(state: &mut AppState) -> Option<KeyAction> {
    if state.update_prompt.need_refresh() {
        return Some(KeyAction::DismissUpdate);
    }
    if state.focused.take().is_some() {
        return None;
    }
    Some(KeyAction::Quit)
}
