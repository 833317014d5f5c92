use ollaix_core::{Turn, TurnId, TurnPhase};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::layout::TuiLayout;
use crate::markdown::MarkdownRenderer;
use crate::state::{AppState, Feedback};
use crate::strings::UiStrings;
use crate::syntax::SyntaxHighlighter;
use crate::theme::Theme;

/// Widest loading skeleton, in cells
const SKELETON_WIDTH: usize = 60;

/// Transcript lines with the first row of every turn
pub struct RenderedTranscript {
    pub lines: Vec<Line<'static>>,
    pub offsets: Vec<(TurnId, u32)>,
}

impl RenderedTranscript {
    pub fn height(&self) -> u32 {
        self.lines.len() as u32
    }
}

/// Scrollable conversation view
///
/// Layout is two-phase: [`TranscriptView::build`] wraps everything at the
/// column width so the viewport can be measured, then
/// [`TranscriptView::render`] draws the visible slice.
pub struct TranscriptView<'a> {
    state: &'a AppState,
    highlighter: &'a SyntaxHighlighter,
}

impl<'a> TranscriptView<'a> {
    pub fn new(state: &'a AppState, highlighter: &'a SyntaxHighlighter) -> Self {
        Self { state, highlighter }
    }

    pub fn build(&self, width: u16) -> RenderedTranscript {
        let width = usize::from(width).max(4);
        let target = self.state.target_turn().map(|t| t.id.clone());
        let mut lines = Vec::new();
        let mut offsets = Vec::with_capacity(self.state.transcript.len());

        for turn in self.state.transcript.turns() {
            offsets.push((turn.id.clone(), lines.len() as u32));
            let is_target = target.as_ref() == Some(&turn.id);
            self.turn_lines(turn, width, is_target, &mut lines);
            lines.push(Line::default());
        }
        if lines.last().is_some_and(|l| l.spans.is_empty()) {
            lines.pop();
        }

        RenderedTranscript { lines, offsets }
    }

    fn turn_lines(&self, turn: &Turn, width: usize, is_target: bool, lines: &mut Vec<Line<'static>>) {
        lines.push(self.header_line(turn, is_target));

        if turn.is_user() {
            let bar = Span::styled("┃ ", Style::default().fg(Theme::role_color(turn.role)));
            for row in textwrap::wrap(&turn.content, width.saturating_sub(2).max(1)) {
                lines.push(Line::from(vec![bar.clone(), Span::styled(row.into_owned(), Theme::base())]));
            }
        } else {
            self.assistant_body(turn, width, lines);
        }

        if is_target && let Some(actions) = self.action_line(turn) {
            lines.push(actions);
        }
    }

    fn header_line(&self, turn: &Turn, is_target: bool) -> Line<'static> {
        let strings = &self.state.strings;
        let color = Theme::role_color(turn.role);
        let (icon, name) =
            if turn.is_user() { ("● ", &strings.role_user) } else { ("◆ ", &strings.role_assistant) };

        let mut spans =
            vec![Span::styled(format!("{}{}", icon, name), Style::default().fg(color).add_modifier(Modifier::BOLD))];

        if turn.is_assistant()
            && let Some(model) = &turn.model
        {
            spans.push(Span::styled(format!(" · {}", model), Theme::muted()));
        }
        if matches!(turn.phase(), TurnPhase::Pending | TurnPhase::Streaming) && turn.is_assistant() {
            spans.push(Span::styled(format!(" · {}…", strings.loading), Theme::muted()));
        }
        if !is_target {
            match self.state.feedback(&turn.id) {
                Feedback::Liked => spans.push(Span::styled(" ▲", Style::default().fg(Theme::GREEN))),
                Feedback::Disliked => spans.push(Span::styled(" ▼", Style::default().fg(Theme::RED))),
                Feedback::None => {}
            }
        }

        let focused = self.state.focused.as_ref() == Some(&turn.id);
        if focused {
            spans = spans.into_iter().map(|s| s.patch_style(Style::default().bg(Theme::ACTIVE))).collect();
            spans.insert(0, Span::styled("▸ ", Style::default().fg(color).bg(Theme::ACTIVE)));
        }
        Line::from(spans)
    }

    fn assistant_body(&self, turn: &Turn, width: usize, lines: &mut Vec<Line<'static>>) {
        if let Some(thinking) = &turn.thinking_content {
            self.thinking_panel(turn, thinking, width, lines);
        }

        if turn.is_streaming_placeholder() {
            lines.extend(skeleton_lines(width));
            return;
        }
        if turn.content.is_empty() {
            return;
        }

        let start = lines.len();
        if turn.is_error {
            let renderer =
                MarkdownRenderer::new(self.highlighter, width.saturating_sub(2)).with_base_style(Theme::error());
            lines.extend(renderer.render(&turn.content));
            if let Some(first) = lines.get_mut(start) {
                first.spans.insert(0, Span::styled("✗ ", Theme::error().add_modifier(Modifier::BOLD)));
            }
            return;
        }

        lines.extend(MarkdownRenderer::new(self.highlighter, width).render(&turn.content));
        if turn.phase() == TurnPhase::Streaming
            && let Some(last) = lines.last_mut()
        {
            last.spans.push(Span::styled("▍", Style::default().fg(Theme::CYAN)));
        }
    }

    fn thinking_panel(&self, turn: &Turn, thinking: &str, width: usize, lines: &mut Vec<Line<'static>>) {
        let strings = &self.state.strings;
        let expanded = self.state.is_thinking_expanded(&turn.id);
        let title_style = Style::default().fg(Theme::PURPLE);

        let title = if turn.is_thinking_loading {
            let style = title_style.add_modifier(Modifier::ITALIC);
            Line::from(Span::styled(format!("◌ {}", strings.thinking_loading), style))
        } else {
            let arrow = if expanded { "▾" } else { "▸" };
            Line::from(vec![
                Span::styled(format!("{} {}", arrow, strings.thinking_title), title_style),
                Span::styled(" (Ctrl+T)", Theme::muted()),
            ])
        };
        lines.push(title);

        if turn.is_thinking_loading || expanded {
            let bar = Span::styled("│ ", title_style);
            for row in textwrap::wrap(thinking.trim_end(), width.saturating_sub(2).max(1)) {
                lines.push(Line::from(vec![bar.clone(), Span::styled(row.into_owned(), Theme::thinking())]));
            }
        }
    }

    /// Key hints for the actions this turn currently allows
    fn action_line(&self, turn: &Turn) -> Option<Line<'static>> {
        let strings = &self.state.strings;
        let actions = turn.actions();
        let mut spans = Vec::new();

        if actions.copy {
            spans.push(Theme::key_span("Ctrl+Y"));
            spans.push(Theme::hint_span(&strings.copy));
        }
        if actions.edit && !self.state.is_generating() {
            spans.push(Theme::key_span("Ctrl+E"));
            spans.push(Theme::hint_span(&strings.edit));
        }
        if actions.feedback {
            let feedback = self.state.feedback(&turn.id);
            if feedback.like_visible() {
                push_toggle(&mut spans, "Alt+L", &strings.like, feedback == Feedback::Liked, Theme::GREEN);
            }
            if feedback.dislike_visible() {
                push_toggle(&mut spans, "Alt+D", &strings.dislike, feedback == Feedback::Disliked, Theme::RED);
            }
        }

        if spans.is_empty() { None } else { Some(Line::from(spans)) }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, rendered: RenderedTranscript) {
        frame.render_widget(Block::default().style(Theme::base()), area);
        let column = TuiLayout::content_column(area);

        if self.state.transcript.is_empty() {
            let lines = match &self.state.error {
                Some(error) => error_lines(&self.state.strings, error, column.width),
                None if self.state.shows_initial_message() => initial_message_lines(&self.state.strings),
                None => return,
            };
            let height = lines.len() as u16;
            let target = TuiLayout::centered(column, column.width, height);
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
            return;
        }

        let scroll_top = self.state.viewport.scroll_top;
        let content_height = rendered.height();
        let visible = visible_lines(rendered.lines, scroll_top, column.height);
        frame.render_widget(Paragraph::new(visible).style(Theme::base()), column);

        if content_height > u32::from(area.height) {
            let max_scroll = content_height.saturating_sub(u32::from(area.height)) as usize;
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll_top as usize);
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .thumb_style(Style::default().fg(Theme::BORDER));
            frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
        }
    }
}

/// Rows of the viewport starting at `scroll_top`
fn visible_lines(lines: Vec<Line<'static>>, scroll_top: u32, rows: u16) -> Vec<Line<'static>> {
    let skip = usize::try_from(scroll_top).unwrap_or(usize::MAX);
    lines.into_iter().skip(skip).take(usize::from(rows)).collect()
}

fn push_toggle(spans: &mut Vec<Span<'static>>, key: &str, label: &str, active: bool, color: ratatui::style::Color) {
    spans.push(Theme::key_span(key));
    if active {
        spans.push(Span::styled(format!(" {} ✓  ", label), Style::default().fg(color)));
    } else {
        spans.push(Theme::hint_span(label));
    }
}

/// Greeting shown before the first message
pub fn initial_message_lines(strings: &UiStrings) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            strings.initial_title.clone(),
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(strings.initial_subtitle.clone(), Theme::muted())),
    ]
}

fn error_lines(strings: &UiStrings, error: &str, width: u16) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(strings.error.clone(), Theme::error().add_modifier(Modifier::BOLD))),
        Line::default(),
    ];
    for row in textwrap::wrap(error, usize::from(width).max(1)) {
        lines.push(Line::from(Span::styled(row.into_owned(), Theme::error())));
    }
    lines
}

/// Placeholder bars for a reply that has not produced output yet
fn skeleton_lines(width: usize) -> Vec<Line<'static>> {
    let width = width.min(SKELETON_WIDTH);
    let style = Style::default().fg(Theme::ACTIVE);
    let rows: [&[usize]; 4] = [&[100], &[50, 50], &[35, 30, 35], &[50]];

    rows.iter()
        .map(|row| {
            let gaps = row.len().saturating_sub(1);
            let usable = width.saturating_sub(gaps);
            let spans: Vec<Span<'static>> = row
                .iter()
                .enumerate()
                .flat_map(|(i, percent)| {
                    let bar = Span::styled("░".repeat(usable * percent / 100), style);
                    if i == 0 { vec![bar] } else { vec![Span::raw(" "), bar] }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ollaix_core::{Config, I18n, Locale, Role};

    fn state() -> AppState {
        let strings = UiStrings::resolve(&I18n::new(Locale::En).unwrap()).unwrap();
        AppState::new(Config::default(), strings)
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect()).collect()
    }

    #[test]
    fn test_user_turn_has_accent_bar() {
        let mut state = state();
        state.transcript.append(Turn::with_id("u0", Role::User, "hello there")).unwrap();
        let highlighter = SyntaxHighlighter::new();

        let rendered = TranscriptView::new(&state, &highlighter).build(40);
        let text = plain(&rendered.lines);
        assert_eq!(text[0], "● You");
        assert_eq!(text[1], "┃ hello there");
        assert_eq!(rendered.offsets, vec![(TurnId::from("u0"), 0)]);
    }

    #[test]
    fn test_placeholder_renders_skeleton() {
        let mut state = state();
        state.transcript.append(Turn::with_id("u0", Role::User, "q")).unwrap();
        state.transcript.append(Turn::with_id("a0", Role::Assistant, "")).unwrap();
        let highlighter = SyntaxHighlighter::new();

        let rendered = TranscriptView::new(&state, &highlighter).build(40);
        let text = plain(&rendered.lines);
        assert_eq!(rendered.offsets[1], (TurnId::from("a0"), 3));
        assert_eq!(text[3], "◆ Assistant · Generating…");
        assert_eq!(text[4], "░".repeat(40));
        assert_eq!(text.len(), 8);
    }

    #[test]
    fn test_thinking_collapsed_after_reply() {
        let mut state = state();
        let mut turn = Turn::with_id("a0", Role::Assistant, "Answer");
        turn.thinking_content = Some("secret reasoning".into());
        turn.loaded = true;
        state.transcript.append(Turn::with_id("u0", Role::User, "q")).unwrap();
        state.transcript.append(turn).unwrap();
        let highlighter = SyntaxHighlighter::new();

        let text = plain(&TranscriptView::new(&state, &highlighter).build(60).lines);
        assert!(text.iter().any(|l| l == "▸ Show reasoning (Ctrl+T)"));
        assert!(!text.iter().any(|l| l.contains("secret reasoning")));
        assert!(text.iter().any(|l| l == "Answer"));

        state.toggle_thinking();
        let text = plain(&TranscriptView::new(&state, &highlighter).build(60).lines);
        assert!(text.iter().any(|l| l == "│ secret reasoning"));
    }

    #[test]
    fn test_thinking_visible_while_loading() {
        let mut state = state();
        let mut turn = Turn::with_id("a0", Role::Assistant, "");
        turn.thinking_content = Some("working".into());
        turn.is_thinking_loading = true;
        state.transcript.append(Turn::with_id("u0", Role::User, "q")).unwrap();
        state.transcript.append(turn).unwrap();
        let highlighter = SyntaxHighlighter::new();

        let text = plain(&TranscriptView::new(&state, &highlighter).build(60).lines);
        assert!(text.iter().any(|l| l == "◌ Thinking..."));
        assert!(text.iter().any(|l| l == "│ working"));
        assert!(!text.iter().any(|l| l.contains('░')));
    }

    #[test]
    fn test_error_turn_is_marked() {
        let mut state = state();
        let mut turn = Turn::with_id("a0", Role::Assistant, "model unavailable");
        turn.is_error = true;
        state.transcript.append(Turn::with_id("u0", Role::User, "q")).unwrap();
        state.transcript.append(turn).unwrap();
        let highlighter = SyntaxHighlighter::new();

        let rendered = TranscriptView::new(&state, &highlighter).build(60);
        let text = plain(&rendered.lines);
        assert_eq!(text.last().map(String::as_str), Some("✗ model unavailable"));
        assert_eq!(rendered.lines.last().unwrap().spans[1].style.fg, Some(Theme::RED));
    }

    #[test]
    fn test_actions_follow_turn_phase() {
        let mut state = state();
        let mut turn = Turn::with_id("a0", Role::Assistant, "done");
        turn.loaded = true;
        state.transcript.append(Turn::with_id("u0", Role::User, "q")).unwrap();
        state.transcript.append(turn).unwrap();
        let highlighter = SyntaxHighlighter::new();

        let text = plain(&TranscriptView::new(&state, &highlighter).build(80).lines);
        assert_eq!(text.last().map(String::as_str), Some("[Ctrl+Y] copy  [Alt+L] like  [Alt+D] dislike  "));

        state.toggle_like();
        let text = plain(&TranscriptView::new(&state, &highlighter).build(80).lines);
        assert_eq!(text.last().map(String::as_str), Some("[Ctrl+Y] copy  [Alt+L] like ✓  "));

        state.focused = Some(TurnId::from("u0"));
        let text = plain(&TranscriptView::new(&state, &highlighter).build(80).lines);
        assert_eq!(text[0], "▸ ● You");
        assert_eq!(text[2], "[Ctrl+Y] copy  [Ctrl+E] edit  ");
        assert!(text.iter().any(|l| l == "◆ Assistant ▲"));
    }

    #[test]
    fn test_visible_lines_past_u16_offsets() {
        let lines: Vec<Line<'static>> = (0..70_000).map(|i| Line::from(i.to_string())).collect();

        let visible = visible_lines(lines, 69_990, 20);
        assert_eq!(visible.len(), 10);
        assert_eq!(visible[0].to_string(), "69990");
        assert_eq!(visible[9].to_string(), "69999");
    }

    #[test]
    fn test_skeleton_rows() {
        let rows = skeleton_lines(21);
        let widths: Vec<usize> = plain(&rows).iter().map(|r| r.chars().count()).collect();
        assert_eq!(widths, vec![21, 21, 19, 10]);
    }
}
