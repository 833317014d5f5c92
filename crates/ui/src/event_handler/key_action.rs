use ollaix_core::{Submission, TurnId};

/// Actions that can be triggered by key events
///
/// Pure editing keys are applied to state directly and produce no action.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// Send a new message with the selected model
    Send(Submission),
    /// Replace a user turn and ask again
    SubmitEdit { turn_id: TurnId, content: String },
    /// Close the edit dialog without sending
    CancelEdit,
    /// Cancel the in-flight reply
    Stop,
    /// Leave the application
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    /// Jump to the newest line and resume auto-scroll
    ScrollToBottom,
    /// Focus the previous turn
    FocusPrev,
    /// Focus the next turn
    FocusNext,
    /// Copy the target turn to the clipboard
    Copy,
    /// Open the editor on the target user turn
    Edit,
    Like,
    Dislike,
    /// Show or hide the reasoning panel
    ToggleThinking,
    /// Clear the transcript
    NewConversation,
    /// Apply the pending update by restarting
    Reload,
    /// Hide the update banner for this session
    DismissUpdate,
}
