pub mod composer;
pub mod edit_dialog;
pub mod footer;
pub mod header;
pub mod input;
pub mod transcript;
pub mod update_banner;

pub use composer::Composer;
pub use edit_dialog::EditDialog;
pub use footer::Footer;
pub use header::Header;
pub use transcript::{RenderedTranscript, TranscriptView, initial_message_lines};
pub use update_banner::UpdateBanner;
