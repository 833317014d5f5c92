use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::input::InputLines;
use crate::{layout::TuiLayout, state::AppState, theme::Theme};

const DIALOG_WIDTH: u16 = 80;
const MAX_EDIT_ROWS: usize = 10;

/// Modal editor for rewriting a sent user message
///
/// Sending discards the edited turn and everything after it, then asks
/// the model again.
pub struct EditDialog<'a> {
    state: &'a AppState,
}

impl<'a> EditDialog<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(edit) = &self.state.edit else {
            return;
        };
        let strings = &self.state.strings;

        let width = DIALOG_WIDTH.min(area.width.saturating_sub(4)).max(10);
        let inner_width = usize::from(width.saturating_sub(4)).max(1);
        let mut lines = InputLines::build(&edit.input, "", inner_width, true, Theme::base()).window(MAX_EDIT_ROWS);

        let sendable = !edit.input.is_blank();
        let send_color = if sendable { Theme::PURPLE } else { Theme::MUTED };
        lines.push(Line::default());
        lines.push(
            Line::from(vec![
                Theme::key_span("Esc"),
                Theme::hint_span(&strings.edit_cancel),
                Span::styled("[Enter]", Style::default().fg(send_color)),
                Span::styled(format!(" {}", strings.edit_send), Style::default().fg(send_color)),
            ])
            .alignment(Alignment::Right),
        );

        let height = lines.len() as u16 + 2;
        let target = TuiLayout::centered(area, width, height);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Theme::PURPLE))
            .title(Span::styled(
                format!(" {} ", strings.edit_title),
                Style::default().fg(Theme::PURPLE).add_modifier(Modifier::BOLD),
            ))
            .style(Theme::base());

        frame.render_widget(Clear, target);
        frame.render_widget(Paragraph::new(lines).block(block), target);
    }
}
