use ollaix_core::{AutoScroll, ScrollState, TurnId};

/// Transcript viewport measured in terminal rows
///
/// Heights are refreshed on every draw; between draws, scroll actions work
/// against the last measured geometry.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub scroll_top: u32,
    pub content_height: u32,
    pub client_height: u32,
    pub auto_scroll: AutoScroll,
    offsets: Vec<(TurnId, u32)>,
}

impl Viewport {
    pub fn new(threshold: u32) -> Self {
        Self {
            scroll_top: 0,
            content_height: 0,
            client_height: 0,
            auto_scroll: AutoScroll::with_threshold(threshold),
            offsets: Vec::new(),
        }
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState::new(self.content_height, self.scroll_top, self.client_height)
    }

    /// Move by `delta` rows; negative scrolls up
    pub fn scroll_by(&mut self, delta: i64) {
        let max = i64::from(self.scroll_state().max_scroll_top());
        self.scroll_top = (i64::from(self.scroll_top) + delta).clamp(0, max) as u32;
        self.auto_scroll.on_user_scroll(self.scroll_state());
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-i64::from(self.page()));
    }

    pub fn page_down(&mut self) {
        self.scroll_by(i64::from(self.page()));
    }

    fn page(&self) -> u32 {
        self.client_height.saturating_sub(1).max(1)
    }

    /// Jump to the bottom and resume following new content
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.auto_scroll.force_scroll_to_bottom(self.scroll_state());
    }

    /// Bring the first row of a turn into view
    pub fn reveal(&mut self, turn_id: &TurnId) {
        let Some(offset) = self.offset_of(turn_id) else {
            return;
        };
        let bottom = self.scroll_top + self.client_height;
        if offset < self.scroll_top || offset >= bottom {
            self.scroll_top = offset.min(self.scroll_state().max_scroll_top());
            self.auto_scroll.on_user_scroll(self.scroll_state());
        }
    }

    pub fn offset_of(&self, turn_id: &TurnId) -> Option<u32> {
        self.offsets.iter().find(|(id, _)| id == turn_id).map(|(_, offset)| *offset)
    }

    /// Record the measured geometry and apply the auto-scroll policy
    pub fn sync(
        &mut self, content_height: u32, client_height: u32, transcript_len: usize, offsets: Vec<(TurnId, u32)>,
    ) {
        self.content_height = content_height;
        self.client_height = client_height;
        self.offsets = offsets;
        self.auto_scroll.on_transcript_len(transcript_len);
        self.scroll_top = self.auto_scroll.target_scroll_top(self.scroll_state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(content: u32, client: u32) -> Viewport {
        let mut viewport = Viewport::new(4);
        viewport.sync(content, client, 1, vec![]);
        viewport
    }

    #[test]
    fn test_follows_bottom_by_default() {
        let viewport = viewport(100, 20);
        assert_eq!(viewport.scroll_top, 80);
        assert!(viewport.auto_scroll.should_auto_scroll());
    }

    #[test]
    fn test_scrolling_away_stops_following() {
        let mut viewport = viewport(100, 20);
        viewport.scroll_by(-10);
        assert_eq!(viewport.scroll_top, 70);
        assert!(!viewport.auto_scroll.should_auto_scroll());

        viewport.sync(120, 20, 1, vec![]);
        assert_eq!(viewport.scroll_top, 70);
    }

    #[test]
    fn test_small_scroll_keeps_following() {
        let mut viewport = viewport(100, 20);
        viewport.scroll_by(-3);
        assert!(viewport.auto_scroll.should_auto_scroll());

        viewport.sync(110, 20, 1, vec![]);
        assert_eq!(viewport.scroll_top, 90);
    }

    #[test]
    fn test_scroll_to_bottom_resumes() {
        let mut viewport = viewport(100, 20);
        viewport.page_up();
        assert!(!viewport.auto_scroll.should_auto_scroll());

        viewport.scroll_to_bottom();
        assert_eq!(viewport.scroll_top, 80);
        assert!(viewport.auto_scroll.should_auto_scroll());
    }

    #[test]
    fn test_reset_to_empty_resumes() {
        let mut viewport = viewport(100, 20);
        viewport.scroll_by(-50);
        viewport.sync(0, 20, 0, vec![]);
        assert!(viewport.auto_scroll.should_auto_scroll());
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut viewport = viewport(100, 20);
        viewport.scroll_by(-1000);
        assert_eq!(viewport.scroll_top, 0);
        viewport.scroll_by(1000);
        assert_eq!(viewport.scroll_top, 80);
    }

    #[test]
    fn test_reveal_turn() {
        let first = TurnId::from("a");
        let second = TurnId::from("b");
        let mut viewport = Viewport::new(4);
        viewport.sync(100, 20, 2, vec![(first.clone(), 0), (second.clone(), 50)]);

        viewport.reveal(&first);
        assert_eq!(viewport.scroll_top, 0);
        assert!(!viewport.auto_scroll.should_auto_scroll());

        viewport.reveal(&second);
        assert_eq!(viewport.scroll_top, 50);
    }
}
