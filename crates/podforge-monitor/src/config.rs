//! Runtime configuration, loaded from environment variables.

use std::path::PathBuf;
use tracing::warn;

/// Monitor settings. Every field has a sensible default so the binary runs
/// with no environment at all (chat features then stay disabled).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Folder watched for new recordings.
    pub watch_path: PathBuf,
    /// Seconds between size polls while waiting for a file to finish.
    pub ready_poll_secs: u64,
    /// Seconds before giving up on a file that never stabilizes.
    pub ready_timeout_secs: u64,
    /// Seconds between filesystem watch polls.
    pub watch_poll_secs: u64,
    /// Timeline window width in minutes.
    pub window_minutes: u64,
    /// Target transcript chunk size in characters.
    pub chunk_size: usize,
    /// Scratch directory for compressed audio copies.
    pub temp_dir: PathBuf,
    /// Chat model override; None uses the bridge default.
    pub chat_model: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            watch_path: PathBuf::from("./recordings"),
            ready_poll_secs: 5,
            ready_timeout_secs: 3600,
            watch_poll_secs: 2,
            window_minutes: podforge_core::DEFAULT_WINDOW_MINUTES,
            chunk_size: podforge_core::DEFAULT_CHUNK_SIZE,
            temp_dir: PathBuf::from("./temp"),
            chat_model: None,
        }
    }
}

impl MonitorConfig {
    /// Load from `PODFORGE_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            watch_path: env_path("PODFORGE_WATCH_PATH", defaults.watch_path),
            ready_poll_secs: env_u64("PODFORGE_READY_POLL_SECS", defaults.ready_poll_secs),
            ready_timeout_secs: env_u64("PODFORGE_READY_TIMEOUT_SECS", defaults.ready_timeout_secs),
            watch_poll_secs: env_u64("PODFORGE_WATCH_POLL_SECS", defaults.watch_poll_secs),
            window_minutes: env_u64("PODFORGE_WINDOW_MINUTES", defaults.window_minutes),
            chunk_size: env_u64("PODFORGE_CHUNK_SIZE", defaults.chunk_size as u64) as usize,
            temp_dir: env_path("PODFORGE_TEMP_DIR", defaults.temp_dir),
            chat_model: std::env::var("PODFORGE_CHAT_MODEL").ok(),
        }
    }
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring non-numeric {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
