//! Markdown to styled terminal lines.
//!
//! Assistant replies arrive as markdown, often incomplete while streaming.
//! Rendering is stateless: each frame re-parses the accumulated content, so
//! an unterminated code fence simply renders as an open block.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::syntax::SyntaxHighlighter;
use crate::theme::Theme;

/// Renders markdown into lines no wider than `width`
pub struct MarkdownRenderer<'a> {
    highlighter: &'a SyntaxHighlighter,
    width: usize,
    base: Style,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(highlighter: &'a SyntaxHighlighter, width: usize) -> Self {
        Self { highlighter, width: width.max(1), base: Style::default().fg(Theme::FG) }
    }

    /// Style applied to plain text
    pub fn with_base_style(mut self, style: Style) -> Self {
        self.base = style;
        self
    }

    pub fn render(&self, source: &str) -> Vec<Line<'static>> {
        let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
        let mut writer = Writer::new(self);

        for event in Parser::new_ext(source, options) {
            writer.event(event);
        }
        writer.finish()
    }
}

struct CodeBlock {
    lang: String,
    text: String,
}

#[derive(Default)]
struct Table {
    rows: Vec<(bool, Vec<String>)>,
    cells: Vec<String>,
    in_head: bool,
}

struct Writer<'r, 'a> {
    renderer: &'r MarkdownRenderer<'a>,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    lists: Vec<Option<u64>>,
    marker: Option<String>,
    quote_depth: usize,
    code: Option<CodeBlock>,
    table: Option<Table>,
}

impl<'r, 'a> Writer<'r, 'a> {
    fn new(renderer: &'r MarkdownRenderer<'a>) -> Self {
        Self {
            renderer,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![renderer.base],
            lists: Vec::new(),
            marker: None,
            quote_depth: 0,
            code: None,
            table: None,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.renderer.base)
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let next = f(self.style());
        self.styles.push(next);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.text.push_str(&text);
                } else if let Some(table) = self.table.as_mut() {
                    if let Some(cell) = table.cells.last_mut() {
                        cell.push_str(&text);
                    }
                } else {
                    self.spans.push(Span::styled(text.into_string(), self.style()));
                }
            }
            Event::Code(text) => {
                if let Some(cell) = self.table.as_mut().and_then(|t| t.cells.last_mut()) {
                    cell.push_str(&text);
                } else {
                    self.spans.push(Span::styled(text.into_string(), Theme::inline_code()));
                }
            }
            Event::SoftBreak => self.spans.push(Span::styled(" ", self.style())),
            Event::HardBreak => self.spans.push(Span::styled("\n", self.style())),
            Event::Rule => {
                self.flush();
                let width = self.renderer.width.saturating_sub(self.prefix_width());
                let rule = Span::styled("─".repeat(width), Theme::muted());
                let mut spans = self.quote_prefix();
                spans.push(rule);
                self.lines.push(Line::from(spans));
                self.blank();
            }
            Event::TaskListMarker(checked) => {
                let mark = if checked { "[x] " } else { "[ ] " };
                self.spans.push(Span::styled(mark, Style::default().fg(Theme::PURPLE)));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.spans.push(Span::styled(html.trim_end().to_string(), Theme::muted()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.styles.push(Theme::heading(heading_level(level)));
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                self.push_style(|s| s.add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or_default().to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeBlock { lang, text: String::new() });
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let bullet = format!("{}. ", n);
                        *n += 1;
                        bullet
                    }
                    _ => "• ".to_string(),
                };
                self.marker = Some(format!("{}{}", "  ".repeat(depth), bullet));
            }
            Tag::Emphasis => self.push_style(|s| s.add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(|s| s.add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self.push_style(|s| s.add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { .. } => self.push_style(|s| s.fg(Theme::BLUE).add_modifier(Modifier::UNDERLINED)),
            Tag::Table(_) => {
                self.flush();
                self.table = Some(Table::default());
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cells.push(String::new());
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.pop_style();
                self.blank();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.pop_style();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    self.blank();
                }
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    self.code_block(&code);
                }
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => self.pop_style(),
            TagEnd::TableHead | TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let cells = std::mem::take(&mut table.cells);
                    table.rows.push((table.in_head, cells));
                    table.in_head = false;
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.table_block(table);
                }
                self.blank();
            }
            _ => {}
        }
    }

    fn quote_prefix(&self) -> Vec<Span<'static>> {
        (0..self.quote_depth).map(|_| Span::styled("│ ", Style::default().fg(Theme::PURPLE))).collect()
    }

    fn prefix_width(&self) -> usize {
        self.quote_depth * 2
    }

    /// Wrap pending inline spans into lines
    fn flush(&mut self) {
        if self.spans.is_empty() {
            if let Some(marker) = self.marker.take() {
                let mut spans = self.quote_prefix();
                spans.push(Span::styled(marker, Style::default().fg(Theme::PURPLE)));
                self.lines.push(Line::from(spans));
            }
            return;
        }

        let spans = std::mem::take(&mut self.spans);
        let marker = self.marker.take();
        let indent = match (&marker, self.lists.len()) {
            (Some(marker), _) => marker.width(),
            (None, 0) => 0,
            (None, depth) => depth * 2,
        };
        let available = self.renderer.width.saturating_sub(self.prefix_width() + indent).max(1);

        for (i, wrapped) in wrap_spans(&spans, available).into_iter().enumerate() {
            let mut line = self.quote_prefix();
            match (&marker, i) {
                (Some(marker), 0) => line.push(Span::styled(marker.clone(), Style::default().fg(Theme::PURPLE))),
                _ if indent > 0 => line.push(Span::raw(" ".repeat(indent))),
                _ => {}
            }
            line.extend(wrapped);
            self.lines.push(Line::from(line));
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn code_block(&mut self, code: &CodeBlock) {
        if !code.lang.is_empty() {
            let mut label = self.quote_prefix();
            label.push(Span::styled(format!("  {}", code.lang), Theme::muted()));
            self.lines.push(Line::from(label));
        }
        let panel = Style::default().bg(Theme::PANEL_BG);
        let available = self.renderer.width.saturating_sub(self.prefix_width() + 2).max(1);
        for highlighted in self.renderer.highlighter.highlight_lines(&code.text, &code.lang) {
            let spans: Vec<Span<'static>> = highlighted.spans.into_iter().map(|s| s.patch_style(panel)).collect();
            for row in split_spans(&spans, available) {
                let mut line = self.quote_prefix();
                line.push(Span::styled("  ", panel));
                line.extend(row);
                self.lines.push(Line::from(line));
            }
        }
    }

    fn table_block(&mut self, table: Table) {
        let columns = table.rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for (_, cells) in &table.rows {
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.trim().width());
            }
        }

        for (is_head, cells) in &table.rows {
            let style = if *is_head { self.renderer.base.add_modifier(Modifier::BOLD) } else { self.renderer.base };
            let mut line = self.quote_prefix();
            for (i, width) in widths.iter().enumerate() {
                if i > 0 {
                    line.push(Span::styled(" │ ", Theme::border()));
                }
                let cell = cells.get(i).map(|c| c.trim()).unwrap_or_default();
                let pad = width.saturating_sub(cell.width());
                line.push(Span::styled(format!("{}{}", cell, " ".repeat(pad)), style));
            }
            self.lines.push(Line::from(line));

            if *is_head {
                let total = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3;
                let mut rule = self.quote_prefix();
                rule.push(Span::styled("─".repeat(total), Theme::border()));
                self.lines.push(Line::from(rule));
            }
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if let Some(code) = self.code.take() {
            self.code_block(&code);
        }
        self.flush();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

fn heading_level(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Split text into words, whitespace runs and explicit line breaks
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let end = if first == '\n' {
            1
        } else {
            let space = first.is_whitespace();
            rest.char_indices()
                .find(|&(_, c)| c == '\n' || c.is_whitespace() != space)
                .map_or(rest.len(), |(i, _)| i)
        };
        let (token, tail) = rest.split_at(end);
        rest = tail;
        Some(token)
    })
}

fn push_piece(line: &mut Vec<Span<'static>>, piece: &str, style: Style) {
    match line.last_mut() {
        Some(last) if last.style == style => last.content.to_mut().push_str(piece),
        _ => line.push(Span::styled(piece.to_string(), style)),
    }
}

/// Hard wrap at exactly `width` cells, keeping whitespace
///
/// Used for code, where indentation matters and words may be cut.
pub fn split_spans(spans: &[Span<'static>], width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut line: Vec<Span<'static>> = Vec::new();
    let mut line_width = 0;

    for span in spans {
        for c in span.content.chars() {
            let char_width = c.width().unwrap_or(0);
            if line_width + char_width > width && line_width > 0 {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            let mut buf = [0u8; 4];
            push_piece(&mut line, c.encode_utf8(&mut buf), span.style);
            line_width += char_width;
        }
    }

    if !line.is_empty() || out.is_empty() {
        out.push(line);
    }
    out
}

/// Greedy word wrap over styled spans
///
/// Whitespace at a break is dropped; words wider than `width` are split
/// by character.
pub fn wrap_spans(spans: &[Span<'static>], width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut line: Vec<Span<'static>> = Vec::new();
    let mut line_width = 0;

    for span in spans {
        for token in tokens(&span.content) {
            if token == "\n" {
                out.push(std::mem::take(&mut line));
                line_width = 0;
                continue;
            }

            let token_width = token.width();
            let is_space = token.chars().all(char::is_whitespace);

            if is_space {
                if line_width > 0 && line_width + token_width <= width {
                    push_piece(&mut line, token, span.style);
                    line_width += token_width;
                }
                continue;
            }

            if line_width + token_width > width && line_width > 0 {
                trim_trailing_space(&mut line);
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if token_width <= width {
                push_piece(&mut line, token, span.style);
                line_width += token_width;
                continue;
            }

            for c in token.chars() {
                let char_width = c.width().unwrap_or(0);
                if line_width + char_width > width && line_width > 0 {
                    out.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                let mut buf = [0u8; 4];
                push_piece(&mut line, c.encode_utf8(&mut buf), span.style);
                line_width += char_width;
            }
        }
    }

    trim_trailing_space(&mut line);
    if !line.is_empty() || out.is_empty() {
        out.push(line);
    }
    out
}

fn trim_trailing_space(line: &mut Vec<Span<'static>>) {
    while let Some(last) = line.last_mut() {
        let trimmed = last.content.trim_end().len();
        if trimmed == 0 {
            line.pop();
        } else {
            last.content.to_mut().truncate(trimmed);
            break;
        }
    }
}
