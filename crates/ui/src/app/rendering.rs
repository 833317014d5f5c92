use super::App;
use crate::components::{Composer, EditDialog, Footer, Header, TranscriptView, UpdateBanner};
use crate::layout::TuiLayout;
use crate::state::AppState;
use crate::syntax::SyntaxHighlighter;
use crate::theme::Theme;
use ratatui::{Frame, Terminal, backend::CrosstermBackend, widgets::Block};
use std::io::Result;

/// Lay out and draw one frame
///
/// The transcript is measured first so the viewport can apply auto-scroll
/// before anything is drawn.
pub fn render_frame(frame: &mut Frame<'_>, state: &mut AppState, highlighter: &SyntaxHighlighter) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::base()), area);

    let column_width = TuiLayout::content_column(area).width;
    let composer_height = Composer::new(state).height(column_width);
    let layout = TuiLayout::calculate(area, composer_height);

    let transcript_column = TuiLayout::content_column(layout.transcript);
    let rendered = TranscriptView::new(state, highlighter).build(transcript_column.width);
    let transcript_len = state.transcript.len();
    state.viewport.sync(
        rendered.height(),
        u32::from(transcript_column.height),
        transcript_len,
        rendered.offsets.clone(),
    );

    Header::new(state).render(frame, layout.header);
    TranscriptView::new(state, highlighter).render(frame, layout.transcript, rendered);
    Composer::new(state).render(frame, TuiLayout::content_column(layout.composer));
    Footer::new(state).render(frame, layout.footer);

    if state.is_editing() {
        EditDialog::new(state).render(frame, area);
    }
    if state.update_prompt.need_refresh() {
        UpdateBanner::new(&state.strings).render(frame, layout.transcript);
    }
}

impl App {
    /// Draw the UI
    pub fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        let Self { state, highlighter, .. } = self;
        terminal.draw(|frame| render_frame(frame, state, highlighter))?;
        Ok(())
    }
}
