//! Error types for podforge core processing.

use thiserror::Error;

/// Result type alias for core processing operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by the core processing layer.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An SRT timecode line did not match `HH:MM:SS,mmm`. Surfaced to the
    /// caller rather than swallowed: a bad timestamp corrupts interval grouping.
    #[error("Malformed SRT timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Chat API error: {0}")]
    Chat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
