//! # Podforge Monitor — episode watcher and rename pipeline
//!
//! Long-lived watcher over a recordings folder: waits for finished audio
//! files, transcribes them, derives episode metadata through templated chat
//! calls, writes the sidecar and show notes, and renames the episode folder.
//! A single episode's failure never brings the watcher down.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod readiness;
pub mod rename;
pub mod transcribe;
pub mod watcher;

pub use config::MonitorConfig;
pub use error::{MonitorError, MonitorResult};
pub use pipeline::{
    EpisodePipeline, PipelineConfig, PipelineEvent, PipelineRunner, SHOW_NOTES_FILE,
    TRANSCRIPTION_FILE,
};
pub use readiness::{wait_for_stable, FsProbe, ReadinessConfig, SizeProbe, StabilityTracker};
pub use rename::{FolderRenamer, RenameOutcome, SkipReason};
pub use transcribe::{
    compress_audio, PlaceholderTranscriber, TranscribeBackend, WhisperApiTranscriber,
    MAX_UPLOAD_BYTES,
};
pub use watcher::{RecordingEvent, RecordingWatcher, WatcherConfig, AUDIO_EXTENSION};
