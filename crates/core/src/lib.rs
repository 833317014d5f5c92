pub mod composer;
pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod scroll;
pub mod transcript;
pub mod turn;
pub mod update;

pub use composer::{ComposerKey, ComposerState, InputBuffer, PrimaryAction, Submission};
pub use config::{Config, ConfigError, LoggingConfig, ScrollConfig, UpdateConfig};
pub use error::{Error, LocaleError, Result, TranscriptError};
pub use i18n::{I18n, Locale, LocaleTable};
pub use model::{Model, Provider, resolve_default_model};
pub use scroll::{AutoScroll, ScrollState, is_near_bottom};
pub use transcript::{Delta, ResendRequest, Transcript, TranscriptEvent};
pub use turn::{Role, Turn, TurnActions, TurnId, TurnPhase};
pub use update::{ReloadRequest, UpdatePrompt, WorkerState, should_schedule_checks};
