//! Error types for configuration and bank data.
//!
//! Configuration and data errors are fatal to starting a session and are
//! surfaced to the caller. Out-of-order engine calls are not errors at all;
//! see [`crate::engine::ProtocolViolation`].

use thiserror::Error;

/// Errors raised at the configurator boundary before a session can start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The requested question limit is not a positive count.
    #[error("question limit must be at least 1, got {0}")]
    InvalidLimit(usize),

    /// The selected bank contains no playable questions.
    #[error("question store is empty")]
    EmptyStore,

    /// Settings cannot change while a session is being played.
    #[error("cannot change settings while a session is in progress")]
    SessionActive,
}

/// Errors in question bank contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A question record was built with blank text.
    #[error("question text is empty")]
    EmptyQuestionText,

    /// The answer column matches neither an option letter nor an option text.
    #[error("line {line}: answer '{value}' does not name an option")]
    UnresolvedAnswer { line: u64, value: String },

    /// A required column is missing from the header row.
    #[error("missing column: {0}")]
    MissingColumn(String),
}
