use crate::state::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::KeyAction;

/// Handle keys while the edit dialog is open
pub fn handle_edit_key(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);

    match event.code {
        KeyCode::Esc => return Some(KeyAction::CancelEdit),
        KeyCode::Char('c') if ctrl => return Some(KeyAction::CancelEdit),
        KeyCode::Enter if !shift && !alt => {
            return state
                .edit_submission()
                .map(|(turn_id, content)| KeyAction::SubmitEdit { turn_id, content });
        }
        _ => {}
    }

    let edit = state.edit.as_mut()?;
    match event.code {
        KeyCode::Enter => edit.input.insert_newline(),
        KeyCode::Char('j') if ctrl => edit.input.insert_newline(),
        KeyCode::Char(c) if !ctrl && !alt => edit.input.insert_char(c),
        KeyCode::Backspace => edit.input.backspace(),
        KeyCode::Delete => edit.input.delete(),
        KeyCode::Left => edit.input.move_left(),
        KeyCode::Right => edit.input.move_right(),
        KeyCode::Home => edit.input.move_home(),
        KeyCode::End => edit.input.move_end(),
        _ => {}
    }
    None
}
