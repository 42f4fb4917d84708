//! # Podforge Core — episode processing building blocks
//!
//! Deterministic transcript processing (chunking, SRT parsing, interval
//! grouping), episode identity reconciliation, sidecar/show-notes rendering,
//! prompt templates, and the chat-completion bridge. No filesystem watching
//! and no renames here; that lives in `podforge-monitor`.

pub mod chunk;
pub mod error;
pub mod identity;
pub mod interval;
pub mod llm;
pub mod prompts;
pub mod shownotes;
pub mod sidecar;
pub mod srt;

pub use chunk::{split_into_chunks, ParagraphChunks, DEFAULT_CHUNK_SIZE};
pub use error::{CoreError, CoreResult};
pub use identity::{
    is_valid_guest, is_valid_topic, reconcile, EpisodeIdentity, DEFAULT_TOPIC, UNKNOWN_SPEAKER,
};
pub use interval::{group_by_interval, IntervalSegment, DEFAULT_WINDOW_MINUTES};
pub use llm::ChatBridge;
pub use shownotes::{
    clean_transcript_intro, format_timeline, render_show_notes, TimestampEntry, NO_TIMESTAMPS,
};
pub use sidecar::{parse_episode_info, EpisodeInfoDoc, EPISODE_INFO_FILE};
pub use srt::{parse_srt, parse_timestamp, SrtEntry};
