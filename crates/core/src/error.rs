use crate::turn::TurnId;

use thiserror::Error;

/// Result type alias for ollaix-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the Ollaix chat client
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Locale resource table errors
    #[error("locale error: {0}")]
    Locale(#[from] LocaleError),

    /// Transcript contract violations
    #[error("transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Errors reported by the external chat controller
    #[error("controller error: {0}")]
    Controller(String),

    /// Update probe errors (never surfaced to the user)
    #[error("update probe error: {0}")]
    Probe(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Transcript store errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// A turn with the same id is already present
    #[error("turn id already present in transcript: {0}")]
    DuplicateId(TurnId),

    /// A delta arrived while the last turn is not an assistant turn
    #[error("no trailing assistant turn to update")]
    NoTrailingAssistant,

    /// A delta arrived after the trailing assistant turn reached DONE or ERRORED
    #[error("trailing assistant turn {0} is already finalized")]
    TurnFinalized(TurnId),

    /// Thinking content was supplied for a user turn
    #[error("thinking content is only valid on assistant turns: {0}")]
    ThinkingOnUserTurn(TurnId),

    /// The referenced turn does not exist
    #[error("turn not found: {0}")]
    NotFound(TurnId),
}

/// Locale resource table errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// Locale tag is not one of the supported locales
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// A key is missing from the table for the given locale
    #[error("missing translation key '{key}' for locale '{locale}'")]
    MissingKey { locale: String, key: String },
}

impl LocaleError {
    pub fn missing_key(locale: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingKey { locale: locale.into(), key: key.into() }
    }
}
