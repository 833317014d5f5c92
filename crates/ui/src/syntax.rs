use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Syntax highlighter for fenced code blocks in replies
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl SyntaxHighlighter {
    /// Load the bundled syntaxes and the `base16-ocean.dark` theme
    pub fn new() -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set.themes.remove("base16-ocean.dark").unwrap_or_default();
        Self { syntax_set: SyntaxSet::load_defaults_newlines(), theme }
    }

    /// Highlight a code block, one styled line per source line
    ///
    /// Unknown languages fall back to plain text in the theme foreground.
    pub fn highlight_lines(&self, code: &str, lang: &str) -> Vec<Line<'static>> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_name(lang))
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let fallback = Style::default().fg(self.fallback_color());

        LinesWithEndings::from(code)
            .map(|line| {
                let spans: Vec<Span<'static>> = match highlighter.highlight_line(line, &self.syntax_set) {
                    Ok(ranges) => ranges
                        .into_iter()
                        .map(|(style, text)| {
                            let text = text.trim_end_matches(['\n', '\r']).to_string();
                            Span::styled(text, Style::default().fg(Self::to_ratatui_color(&style.foreground)))
                        })
                        .filter(|span| !span.content.is_empty())
                        .collect(),
                    Err(e) => {
                        tracing::trace!(error = %e, "highlighting failed, using plain text");
                        vec![Span::styled(line.trim_end_matches(['\n', '\r']).to_string(), fallback)]
                    }
                };
                Line::from(spans)
            })
            .collect()
    }

    fn to_ratatui_color(color: &syntect::highlighting::Color) -> Color {
        Color::Rgb(color.r, color.g, color.b)
    }

    /// Default text color of the theme
    pub fn fallback_color(&self) -> Color {
        let text_color =
            self.theme.settings.foreground.unwrap_or(syntect::highlighting::Color { r: 198, g: 200, b: 209, a: 255 });
        Self::to_ratatui_color(&text_color)
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
