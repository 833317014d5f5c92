use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Widest column used for transcript text, in cells
pub const MAX_CONTENT_WIDTH: u16 = 100;

/// Calculated layout for the TUI
///
/// - Row 1: header
/// - Middle: transcript
/// - Composer card (height depends on the input)
/// - Last row: hints and credit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuiLayout {
    pub header: Rect,
    pub transcript: Rect,
    pub composer: Rect,
    pub footer: Rect,
}

impl TuiLayout {
    pub fn calculate(area: Rect, composer_height: u16) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(composer_height),
                Constraint::Length(1),
            ])
            .split(area);

        Self { header: chunks[0], transcript: chunks[1], composer: chunks[2], footer: chunks[3] }
    }

    /// Centered column no wider than [`MAX_CONTENT_WIDTH`], with a one-cell margin
    pub fn content_column(area: Rect) -> Rect {
        let available = area.width.saturating_sub(2);
        let width = available.min(MAX_CONTENT_WIDTH);
        let x = area.x + 1 + (available - width) / 2;
        Rect { x, y: area.y, width, height: area.height }
    }

    /// Rectangle of the given size centered in `area`, clamped to it
    pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    /// Top-right corner box for notifications
    pub fn top_right(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect { x: area.x + area.width - width, y: area.y, width, height }
    }
}
