use ollaix_core::PrimaryAction;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::input::InputLines;
use crate::{state::AppState, theme::Theme};

/// Most input rows shown before the box scrolls
pub const MAX_INPUT_ROWS: usize = 6;

const ACCENT_WIDTH: u16 = 2;

/// Composer component: input card, model selector and send/stop control
///
/// - Row 1: separator
/// - Input card with blue accent bar (2 chars), padded by one row
/// - Last row: model selector and primary action
pub struct Composer<'a> {
    state: &'a AppState,
}

impl<'a> Composer<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Rows needed at the given total width
    pub fn height(&self, width: u16) -> u16 {
        let rows = self.input_lines(Self::input_width(width)).len();
        rows as u16 + 4
    }

    fn input_width(width: u16) -> u16 {
        width.saturating_sub(ACCENT_WIDTH + 2)
    }

    fn input_lines(&self, width: u16) -> Vec<Line<'static>> {
        let composer = &self.state.composer;
        let enabled = composer.is_input_enabled() && !self.state.is_editing();
        let style = if enabled { Theme::panel() } else { Style::default().fg(Theme::MUTED).bg(Theme::PANEL_BG) };

        InputLines::build(&composer.input, &self.state.strings.placeholder, usize::from(width), enabled, style)
            .window(MAX_INPUT_ROWS)
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.height < 4 || area.width < 10 {
            return;
        }

        let separator = Rect { height: 1, ..area };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("─".repeat(usize::from(area.width)), Theme::muted()))),
            separator,
        );

        let card = Rect { y: area.y + 1, height: area.height - 2, ..area };
        self.render_input_card(frame, card);

        let selector = Rect { y: area.y + area.height - 1, height: 1, ..area };
        self.render_selector(frame, selector);
    }

    fn render_input_card(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Block::default().style(Style::default().bg(Theme::PANEL_BG)), area);

        let accent = if self.state.is_generating() { Theme::MUTED } else { Theme::BLUE };
        let accent_area = Rect { width: ACCENT_WIDTH, ..area };
        frame.render_widget(Block::default().style(Style::default().bg(accent)), accent_area);

        let input_area = Rect {
            x: area.x + ACCENT_WIDTH + 1,
            y: area.y + 1,
            width: Self::input_width(area.width),
            height: area.height.saturating_sub(2),
        };
        let lines = self.input_lines(input_area.width);
        frame.render_widget(Paragraph::new(lines).style(Theme::panel()), input_area);
    }

    fn render_selector(&self, frame: &mut Frame<'_>, area: Rect) {
        let strings = &self.state.strings;
        let composer = &self.state.composer;

        let mut left = vec![Theme::key_span("Tab"), Span::styled(format!(" {}: ", strings.model), Theme::muted())];
        if !self.state.models_loaded {
            left.push(Span::styled(strings.models_loading.clone(), Theme::muted()));
        } else if let Some(model) = composer.selected_model() {
            let style = Style::default().fg(Theme::CYAN).add_modifier(Modifier::BOLD);
            if composer.models().len() > 1 {
                left.push(Span::styled(format!("◂ {} ▸", model.name), style));
            } else {
                left.push(Span::styled(model.name.clone(), style));
            }
        } else {
            left.push(Span::styled("-", Theme::muted()));
        }
        frame.render_widget(Paragraph::new(Line::from(left)), area);

        let right = match composer.primary_action() {
            PrimaryAction::Stop => vec![
                Span::styled("[Ctrl+C]", Style::default().fg(Theme::RED)),
                Span::styled(format!(" {} ", strings.stop), Style::default().fg(Theme::RED)),
            ],
            PrimaryAction::Send { enabled } => {
                let key_color = if enabled && composer.can_submit() { Theme::BLUE } else { Theme::MUTED };
                vec![
                    Theme::key_span("Alt+Enter"),
                    Theme::hint_span(&strings.newline),
                    Span::styled("[Enter]", Style::default().fg(key_color)),
                    Span::styled(format!(" {} ", strings.send), Theme::muted()),
                ]
            }
        };
        frame.render_widget(Paragraph::new(Line::from(right)).alignment(Alignment::Right), area);
    }
}
