use ollaix_core::Role;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Iceberg color theme for the Ollaix TUI
///
/// Based on iceberg.vim color scheme (https://github.com/cocopon/iceberg.vim)
/// Bluish dark theme designed for long reading sessions with eye-friendly colors.
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    /// Primary background: deep blue-black (fills terminal)
    pub const BG: Color = Color::Rgb(22, 24, 33);

    /// Foreground: light blue-gray (primary text)
    pub const FG: Color = Color::Rgb(198, 200, 209);

    /// Secondary background: lighter blue-black (panels, cards, input)
    pub const PANEL_BG: Color = Color::Rgb(30, 33, 50);

    /// Hover/active states: visual selection
    pub const ACTIVE: Color = Color::Rgb(39, 44, 66);

    /// Primary accent: blue
    pub const BLUE: Color = Color::Rgb(132, 160, 198);

    /// Secondary accent: cyan
    pub const CYAN: Color = Color::Rgb(137, 184, 194);

    /// Tertiary accent: purple (reasoning, edit mode)
    pub const PURPLE: Color = Color::Rgb(160, 147, 199);

    /// Positive feedback, confirmations
    pub const GREEN: Color = Color::Rgb(180, 190, 130);

    /// Inline code, update banner
    pub const YELLOW: Color = Color::Rgb(226, 164, 120);

    /// Errors: failed replies, stop control
    pub const RED: Color = Color::Rgb(226, 120, 120);

    /// Muted text: dimmed foreground
    pub const MUTED: Color = Color::Rgb(107, 112, 137);

    /// Border color
    pub const BORDER: Color = Color::Rgb(60, 65, 90);

    /// Base style for all text
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    /// Primary accent style
    pub fn primary() -> Style {
        Style::default().fg(Self::BLUE).bg(Self::BG)
    }

    /// Success style
    pub fn success() -> Style {
        Style::default().fg(Self::GREEN).bg(Self::BG)
    }

    /// Warning style
    pub fn warning() -> Style {
        Style::default().fg(Self::YELLOW).bg(Self::BG)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default().fg(Self::RED).bg(Self::BG)
    }

    /// Muted style (for secondary text)
    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED).bg(Self::BG)
    }

    /// Panel style
    pub fn panel() -> Style {
        Style::default().fg(Self::FG).bg(Self::PANEL_BG)
    }

    /// Border style
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Active (selected) style
    pub fn active() -> Style {
        Style::default().fg(Self::FG).bg(Self::ACTIVE)
    }

    /// Accent color for a turn author
    pub fn role_color(role: Role) -> Color {
        match role {
            Role::User => Self::BLUE,
            Role::Assistant => Self::CYAN,
        }
    }

    /// Heading style by level (1 is the largest)
    pub fn heading(level: usize) -> Style {
        let color = if level <= 2 { Self::BLUE } else { Self::CYAN };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn inline_code() -> Style {
        Style::default().fg(Self::YELLOW).bg(Self::PANEL_BG)
    }

    pub fn thinking() -> Style {
        Style::default().fg(Self::MUTED).add_modifier(Modifier::ITALIC)
    }

    /// `[key]` span used in hint rows
    pub fn key_span(key: &str) -> Span<'static> {
        Span::styled(format!("[{}]", key), Style::default().fg(Self::BLUE))
    }

    /// Label following a key span
    pub fn hint_span(label: &str) -> Span<'static> {
        Span::styled(format!(" {}  ", label), Style::default().fg(Self::MUTED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_values() {
        assert!(matches!(Theme::BG, Color::Rgb(_, _, _)));
        assert!(matches!(Theme::FG, Color::Rgb(_, _, _)));
        assert!(matches!(Theme::PANEL_BG, Color::Rgb(_, _, _)));
    }

    #[test]
    fn test_role_colors() {
        assert_eq!(Theme::role_color(Role::User), Theme::BLUE);
        assert_eq!(Theme::role_color(Role::Assistant), Theme::CYAN);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(Theme::heading(1).fg, Some(Theme::BLUE));
        assert_eq!(Theme::heading(3).fg, Some(Theme::CYAN));
        assert!(Theme::heading(4).add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_hint_spans() {
        assert_eq!(Theme::key_span("Enter").content, "[Enter]");
        assert_eq!(Theme::hint_span("send").content, " send  ");
    }

    #[test]
    fn test_styles() {
        let base = Theme::base();
        assert_eq!(base.fg, Some(Theme::FG));
        assert_eq!(base.bg, Some(Theme::BG));

        let panel = Theme::panel();
        assert_eq!(panel.fg, Some(Theme::FG));
        assert_eq!(panel.bg, Some(Theme::PANEL_BG));
    }
}
