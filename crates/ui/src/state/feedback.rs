/// Like/dislike state of one assistant turn
///
/// Each button toggles its own state. While one is active the other is
/// hidden, so a liked turn has to be un-liked before it can be disliked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Liked,
    Disliked,
}

impl Feedback {
    pub fn toggle_like(self) -> Self {
        match self {
            Feedback::None => Feedback::Liked,
            Feedback::Liked => Feedback::None,
            Feedback::Disliked => Feedback::Disliked,
        }
    }

    pub fn toggle_dislike(self) -> Self {
        match self {
            Feedback::None => Feedback::Disliked,
            Feedback::Disliked => Feedback::None,
            Feedback::Liked => Feedback::Liked,
        }
    }

    pub fn like_visible(self) -> bool {
        self != Feedback::Disliked
    }

    pub fn dislike_visible(self) -> bool {
        self != Feedback::Liked
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Feedback::None => "none",
            Feedback::Liked => "liked",
            Feedback::Disliked => "disliked",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_toggles() {
        let liked = Feedback::None.toggle_like();
        assert_eq!(liked, Feedback::Liked);
        assert_eq!(liked.toggle_like(), Feedback::None);
    }

    #[test]
    fn test_other_button_is_inert_while_active() {
        assert_eq!(Feedback::Liked.toggle_dislike(), Feedback::Liked);
        assert_eq!(Feedback::Disliked.toggle_like(), Feedback::Disliked);
    }

    #[test]
    fn test_visibility() {
        assert!(Feedback::None.like_visible() && Feedback::None.dislike_visible());
        assert!(Feedback::Liked.like_visible() && !Feedback::Liked.dislike_visible());
        assert!(!Feedback::Disliked.like_visible() && Feedback::Disliked.dislike_visible());
    }
}
