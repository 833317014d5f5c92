use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{layout::TuiLayout, strings::UiStrings, theme::Theme};

const BANNER_WIDTH: u16 = 48;

/// "Update available" notice pinned to the top-right corner
pub struct UpdateBanner<'a> {
    strings: &'a UiStrings,
}

impl<'a> UpdateBanner<'a> {
    pub fn new(strings: &'a UiStrings) -> Self {
        Self { strings }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let width = BANNER_WIDTH.min(area.width);
        let inner_width = usize::from(width.saturating_sub(4)).max(1);

        let mut lines: Vec<Line<'static>> = textwrap::wrap(&self.strings.update_message, inner_width)
            .into_iter()
            .map(|row| Line::from(Span::styled(row.into_owned(), Theme::base())))
            .collect();
        lines.push(Line::default());
        lines.push(
            Line::from(vec![
                Theme::key_span("Ctrl+R"),
                Span::styled(format!(" {}  ", self.strings.update_reload), Theme::warning()),
                Theme::key_span("Esc"),
                Span::styled(format!(" {}", self.strings.close), Theme::muted()),
            ])
            .alignment(Alignment::Right),
        );

        let height = lines.len() as u16 + 2;
        let target = TuiLayout::top_right(area, width, height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Theme::YELLOW))
            .title(Span::styled(
                format!(" {} ", self.strings.update_title),
                Style::default().fg(Theme::YELLOW).add_modifier(Modifier::BOLD),
            ))
            .style(Theme::base());

        frame.render_widget(Clear, target);
        frame.render_widget(Paragraph::new(lines).block(block), target);
    }
}
