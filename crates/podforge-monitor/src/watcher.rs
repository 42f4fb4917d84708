//! Recordings folder watcher.
//!
//! Polls the watch path for new `.m4a` files and emits a [`RecordingEvent`]
//! per candidate. Polling (rather than inotify) keeps behavior consistent on
//! network mounts and synced folders. Paths under folders the renamer
//! already produced are ignored so our own renames never loop back in.

use crate::rename::FolderRenamer;
use notify::event::{ModifyKind, RenameMode};
use notify::{
    Config, Event, EventKind, PollWatcher, RecursiveMode, Result as NotifyResult, Watcher,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info};

/// Audio extension this watcher reacts to.
pub const AUDIO_EXTENSION: &str = "m4a";

/// Path fragment used by recorders for in-progress scratch files.
const IN_PROGRESS_MARKER: &str = "Audio Record";

/// A finished-looking recording spotted in the watch path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingEvent {
    pub audio_path: PathBuf,
}

/// Watcher settings.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub watch_path: PathBuf,
    pub poll_interval: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            watch_path: PathBuf::from("./recordings"),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Polling watcher over the recordings folder.
pub struct RecordingWatcher {
    config: WatcherConfig,
    renamer: Arc<Mutex<FolderRenamer>>,
}

impl RecordingWatcher {
    pub fn new(config: WatcherConfig, renamer: Arc<Mutex<FolderRenamer>>) -> Self {
        Self { config, renamer }
    }

    /// Extension and scratch-file filter, before any rename bookkeeping.
    fn is_candidate(path: &Path) -> bool {
        let is_audio = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(AUDIO_EXTENSION))
            .unwrap_or(false);
        is_audio && !path.to_string_lossy().contains(IN_PROGRESS_MARKER)
    }

    /// Map a raw filesystem event to at most one recording event.
    fn process_event(&self, event: Event) -> Option<RecordingEvent> {
        let path = match event.kind {
            EventKind::Create(_) => event.paths.into_iter().next()?,
            // A move into the watch path surfaces as a rename-to; for
            // Both the destination is the last path.
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                event.paths.into_iter().next()?
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                event.paths.into_iter().last()?
            }
            _ => {
                debug!("Ignoring event: {:?}", event.kind);
                return None;
            }
        };

        if !Self::is_candidate(&path) {
            return None;
        }
        if self
            .renamer
            .lock()
            .map(|r| r.covers_event_path(&path.to_string_lossy()))
            .unwrap_or(false)
        {
            debug!("Skipping event inside a renamed folder: {:?}", path);
            return None;
        }

        info!("New recording spotted: {:?}", path);
        Some(RecordingEvent { audio_path: path })
    }

    /// Watch the configured path and forward recording events (blocking).
    pub fn watch_blocking(&self, tx: Sender<RecordingEvent>) -> NotifyResult<()> {
        let (event_tx, event_rx) = channel();

        let mut watcher = PollWatcher::new(
            move |res: NotifyResult<Event>| {
                if let Ok(event) = res {
                    let _ = event_tx.send(event);
                }
            },
            Config::default().with_poll_interval(self.config.poll_interval),
        )?;
        watcher.watch(&self.config.watch_path, RecursiveMode::Recursive)?;

        info!("Watching {:?} for new recordings", self.config.watch_path);

        loop {
            match event_rx.recv() {
                Ok(event) => {
                    if let Some(recording) = self.process_event(event) {
                        if let Err(e) = tx.send(recording) {
                            error!("Recording channel closed: {}", e);
                            break;
                        }
                    }
                }
                Err(e) => {
                    error!("Watch channel error: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::CreateKind;

    fn watcher() -> RecordingWatcher {
        RecordingWatcher::new(
            WatcherConfig::default(),
            Arc::new(Mutex::new(FolderRenamer::new())),
        )
    }

    fn create_event(path: &str) -> Event {
        Event::new(EventKind::Create(CreateKind::File)).add_path(PathBuf::from(path))
    }

    #[test]
    fn candidate_filter_checks_extension_case_insensitively() {
        assert!(RecordingWatcher::is_candidate(Path::new("/rec/ep/a.m4a")));
        assert!(RecordingWatcher::is_candidate(Path::new("/rec/ep/a.M4A")));
        assert!(!RecordingWatcher::is_candidate(Path::new("/rec/ep/a.mp3")));
        assert!(!RecordingWatcher::is_candidate(Path::new("/rec/ep/noext")));
    }

    #[test]
    fn candidate_filter_skips_in_progress_scratch_files() {
        assert!(!RecordingWatcher::is_candidate(Path::new(
            "/rec/Audio Record/take.m4a"
        )));
    }

    #[test]
    fn create_event_for_audio_is_forwarded() {
        let w = watcher();
        let got = w.process_event(create_event("/rec/ep 2024-06-15/audio.m4a"));
        assert_eq!(
            got,
            Some(RecordingEvent {
                audio_path: PathBuf::from("/rec/ep 2024-06-15/audio.m4a")
            })
        );
    }

    #[test]
    fn non_audio_and_irrelevant_kinds_are_dropped() {
        let w = watcher();
        assert_eq!(w.process_event(create_event("/rec/ep/notes.txt")), None);
        let remove = Event::new(EventKind::Remove(notify::event::RemoveKind::File))
            .add_path(PathBuf::from("/rec/ep/audio.m4a"));
        assert_eq!(w.process_event(remove), None);
    }

    #[test]
    fn recording_event_round_trips_through_json() {
        let event = RecordingEvent {
            audio_path: PathBuf::from("/rec/ep/audio.m4a"),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: RecordingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn rename_to_uses_destination_path() {
        let w = watcher();
        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(PathBuf::from("/rec/old.tmp"))
            .add_path(PathBuf::from("/rec/ep/audio.m4a"));
        assert_eq!(
            w.process_event(event),
            Some(RecordingEvent {
                audio_path: PathBuf::from("/rec/ep/audio.m4a")
            })
        );
    }
}
