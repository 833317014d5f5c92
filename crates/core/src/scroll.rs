//! Auto-scroll policy for the transcript viewport.
//!
//! Auto-scroll follows new content until the user scrolls away from the
//! bottom by at least the threshold. It resumes on an explicit "scroll to
//! bottom" request or when the transcript is reset to empty.

/// Default distance from the bottom under which the viewport counts as "at the bottom"
pub const DEFAULT_NEAR_BOTTOM_THRESHOLD: u32 = 80;

/// Geometry of a scrollable viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    /// Total height of the content
    pub scroll_height: u32,
    /// Offset of the top of the viewport from the top of the content
    pub scroll_top: u32,
    /// Visible height of the viewport
    pub client_height: u32,
}

impl ScrollState {
    pub fn new(scroll_height: u32, scroll_top: u32, client_height: u32) -> Self {
        Self { scroll_height, scroll_top, client_height }
    }

    /// Distance between the bottom of the viewport and the end of the content
    pub fn distance_from_bottom(&self) -> i64 {
        i64::from(self.scroll_height) - i64::from(self.scroll_top) - i64::from(self.client_height)
    }

    /// Largest valid `scroll_top`
    pub fn max_scroll_top(&self) -> u32 {
        self.scroll_height.saturating_sub(self.client_height)
    }
}

/// Whether the viewport is close enough to the bottom to keep following new content
///
/// True iff `scroll_height - scroll_top - client_height < threshold`.
pub fn is_near_bottom(state: ScrollState, threshold: u32) -> bool {
    state.distance_from_bottom() < i64::from(threshold)
}

/// Tracks whether the viewport should keep following new content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoScroll {
    should_auto_scroll: bool,
    threshold: u32,
    last_len: usize,
}

impl AutoScroll {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_NEAR_BOTTOM_THRESHOLD)
    }

    pub fn with_threshold(threshold: u32) -> Self {
        Self { should_auto_scroll: true, threshold, last_len: 0 }
    }

    pub fn should_auto_scroll(&self) -> bool {
        self.should_auto_scroll
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Re-evaluate after the user moved the viewport
    pub fn on_user_scroll(&mut self, state: ScrollState) {
        self.should_auto_scroll = is_near_bottom(state, self.threshold);
    }

    /// Resume following and return the bottom offset to jump to
    pub fn force_scroll_to_bottom(&mut self, state: ScrollState) -> u32 {
        self.should_auto_scroll = true;
        state.max_scroll_top()
    }

    /// Observe the transcript length; a reset to empty resumes following
    pub fn on_transcript_len(&mut self, len: usize) {
        if len == 0 && self.last_len != 0 {
            self.should_auto_scroll = true;
        }
        self.last_len = len;
    }

    /// Offset the viewport should use after content changed
    ///
    /// Follows the bottom while auto-scroll is on, otherwise keeps the
    /// current position clamped to the content.
    pub fn target_scroll_top(&self, state: ScrollState) -> u32 {
        if self.should_auto_scroll { state.max_scroll_top() } else { state.scroll_top.min(state.max_scroll_top()) }
    }
}

impl Default for AutoScroll {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_near_bottom_boundary() {
        // distance 79 -> near
        assert!(is_near_bottom(ScrollState::new(1000, 421, 500), 80));
        // distance exactly 80 -> not near
        assert!(!is_near_bottom(ScrollState::new(1000, 420, 500), 80));
        // distance 81 -> not near
        assert!(!is_near_bottom(ScrollState::new(1000, 419, 500), 80));
    }

    #[test]
    fn test_is_near_bottom_at_bottom_and_short_content() {
        assert!(is_near_bottom(ScrollState::new(1000, 500, 500), 80));
        // content shorter than the viewport
        assert!(is_near_bottom(ScrollState::new(100, 0, 500), 80));
    }

    #[test]
    fn test_user_scroll_away_stops_following() {
        let mut auto = AutoScroll::new();
        assert!(auto.should_auto_scroll());

        auto.on_user_scroll(ScrollState::new(2000, 100, 500));
        assert!(!auto.should_auto_scroll());

        auto.on_user_scroll(ScrollState::new(2000, 1450, 500));
        assert!(auto.should_auto_scroll());
    }

    #[test]
    fn test_force_scroll_to_bottom() {
        let mut auto = AutoScroll::new();
        auto.on_user_scroll(ScrollState::new(2000, 0, 500));
        assert!(!auto.should_auto_scroll());

        let top = auto.force_scroll_to_bottom(ScrollState::new(2000, 0, 500));
        assert_eq!(top, 1500);
        assert!(auto.should_auto_scroll());
    }

    #[test]
    fn test_reset_to_empty_resumes() {
        let mut auto = AutoScroll::new();
        auto.on_transcript_len(4);
        auto.on_user_scroll(ScrollState::new(2000, 0, 500));
        assert!(!auto.should_auto_scroll());

        auto.on_transcript_len(6);
        assert!(!auto.should_auto_scroll());

        auto.on_transcript_len(0);
        assert!(auto.should_auto_scroll());
    }

    #[test]
    fn test_target_scroll_top() {
        let mut auto = AutoScroll::with_threshold(3);
        let state = ScrollState::new(40, 10, 20);
        assert_eq!(auto.target_scroll_top(state), 20);

        auto.on_user_scroll(state);
        assert!(!auto.should_auto_scroll());
        assert_eq!(auto.target_scroll_top(state), 10);
        assert_eq!(auto.target_scroll_top(ScrollState::new(15, 10, 20)), 0);
    }
}
