use crate::{state::AppState, theme::Theme};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

/// Footer row: navigation hints on the left, credit on the right
pub struct Footer<'a> {
    state: &'a AppState,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// "Created by Maoulid94 ~ Ollaix © {year}"
    pub fn credit(&self) -> String {
        let strings = &self.state.strings;
        format!("{} Maoulid94 ~ {} © {}", strings.created_by, strings.title, self.state.year())
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let strings = &self.state.strings;
        let credit = self.credit();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(credit.width() as u16 + 1)])
            .split(area);

        let hints = vec![
            Span::raw(" "),
            Theme::key_span("PgUp/PgDn"),
            Theme::hint_span(&strings.hint_scroll),
            Theme::key_span("Ctrl+G"),
            Theme::hint_span(&strings.hint_bottom),
            Theme::key_span("Alt+↑↓"),
            Theme::hint_span(&strings.hint_select),
            Theme::key_span("Ctrl+N"),
            Theme::hint_span(&strings.hint_new),
            Theme::key_span("Esc"),
            Theme::hint_span(&strings.hint_quit),
        ];
        frame.render_widget(Paragraph::new(Line::from(hints)).style(Theme::base()), chunks[0]);
        frame.render_widget(
            Paragraph::new(Span::styled(credit, Theme::muted())).alignment(Alignment::Right),
            chunks[1],
        );
    }
}
