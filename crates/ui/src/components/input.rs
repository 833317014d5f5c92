use ollaix_core::InputBuffer;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use crate::theme::Theme;

/// Rows of an input box, hard-wrapped, with the cursor drawn as a block
pub struct InputLines {
    pub lines: Vec<Line<'static>>,
    pub cursor_row: usize,
}

impl InputLines {
    pub fn build(input: &InputBuffer, placeholder: &str, width: usize, show_cursor: bool, style: Style) -> Self {
        let width = width.max(1);
        let cursor_style = Style::default().fg(Theme::PANEL_BG).bg(Theme::FG);
        let mut builder = RowBuilder::new(width);

        if input.as_str().is_empty() {
            if show_cursor {
                builder.push(' ', cursor_style);
            }
            for c in placeholder.chars() {
                builder.push(c, Style::default().fg(Theme::MUTED));
            }
            return builder.finish(0);
        }

        let (before, after) = input.as_str().split_at(input.cursor());
        for c in before.chars() {
            builder.push(c, style);
        }
        let cursor_row = builder.rows.len();

        let mut rest = after.chars().peekable();
        if show_cursor {
            match rest.peek().copied() {
                Some(c) if c != '\n' => {
                    builder.push(c, cursor_style);
                    rest.next();
                }
                _ => builder.push(' ', cursor_style),
            }
        }
        for c in rest {
            builder.push(c, style);
        }
        builder.finish(cursor_row)
    }

    /// At most `max` rows, scrolled so the cursor stays visible
    pub fn window(self, max: usize) -> Vec<Line<'static>> {
        let total = self.lines.len();
        if total <= max {
            return self.lines;
        }
        let start = (self.cursor_row + 1).saturating_sub(max).min(total - max);
        self.lines.into_iter().skip(start).take(max).collect()
    }
}

struct RowBuilder {
    width: usize,
    rows: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    current_width: usize,
}

impl RowBuilder {
    fn new(width: usize) -> Self {
        Self { width, rows: Vec::new(), current: Vec::new(), current_width: 0 }
    }

    fn break_row(&mut self) {
        self.rows.push(Line::from(std::mem::take(&mut self.current)));
        self.current_width = 0;
    }

    fn push(&mut self, c: char, style: Style) {
        if c == '\n' {
            self.break_row();
            return;
        }
        let char_width = c.width().unwrap_or(0);
        if self.current_width + char_width > self.width {
            self.break_row();
        }
        match self.current.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push(c),
            _ => self.current.push(Span::styled(c.to_string(), style)),
        }
        self.current_width += char_width;
    }

    fn finish(mut self, cursor_row: usize) -> InputLines {
        self.rows.push(Line::from(self.current));
        InputLines { lines: self.rows, cursor_row }
    }
}
