//! Error types for the monitor pipeline.

use thiserror::Error;

/// Result type alias for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors raised while watching, transcribing, and renaming episodes.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Recording never reached a stable size within the readiness timeout.
    /// Recoverable: the runner un-marks the file so a later event can retry.
    #[error("File never stabilized: {0}")]
    Unstable(String),

    /// Audio could not be compressed under the upload ceiling at any tried
    /// bitrate. Fatal for this file; no partial transcript is produced.
    #[error("Audio compression failed: {0}")]
    Compression(String),

    /// Transcription API or upload failure. Treated as transient: the runner
    /// un-marks the file so a later event can retry.
    #[error("Transcription error: {0}")]
    Transcribe(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] podforge_core::CoreError),
}

impl From<notify::Error> for MonitorError {
    fn from(err: notify::Error) -> Self {
        MonitorError::Watch(err.to_string())
    }
}
