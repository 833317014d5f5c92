use crate::{state::AppState, theme::Theme};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Header row: application title and the model replies will come from
///
/// The right side carries transient status such as copy confirmations.
pub struct Header<'a> {
    state: &'a AppState,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let strings = &self.state.strings;
        let mut spans = vec![
            Span::styled(" ", Theme::base()),
            Span::styled(strings.title.clone(), Style::default().fg(Theme::BLUE).add_modifier(Modifier::BOLD)),
            Span::styled(" · ", Theme::muted()),
        ];

        if !self.state.models_loaded {
            spans.push(Span::styled(strings.models_loading.clone(), Theme::muted()));
        } else if let Some(model) = self.state.composer.selected_model() {
            spans.push(Span::styled(model.name.clone(), Style::default().fg(Theme::CYAN)));
            spans.push(Span::styled(format!(" ({})", model.provider.as_str()), Theme::muted()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::base()), area);

        let status = match (&self.state.status, self.state.is_generating()) {
            (Some(status), _) => Some(Span::styled(format!("{} ", status), Theme::success())),
            (None, true) => Some(Span::styled(format!("{}… ", strings.loading), Theme::muted())),
            (None, false) => None,
        };
        if let Some(status) = status {
            frame.render_widget(Paragraph::new(Line::from(status)).alignment(Alignment::Right), area);
        }
    }
}
