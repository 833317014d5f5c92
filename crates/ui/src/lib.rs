pub mod app;
pub mod clipboard;
pub mod components;
pub mod event_handler;
pub mod layout;
pub mod markdown;
pub mod session;
pub mod state;
pub mod strings;
pub mod syntax;
pub mod theme;

pub use app::{App, AppExit, LoopEvent, render_frame};
pub use clipboard::{Clipboard, MemoryClipboard, Osc52Clipboard};
pub use event_handler::{EventHandler, KeyAction};
pub use session::{ChatSession, SessionEvent};
pub use state::AppState;
pub use strings::UiStrings;
pub use syntax::SyntaxHighlighter;
pub use theme::Theme;
