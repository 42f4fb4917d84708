//! Episode processing pipeline.
//!
//! One recording in, three artifacts out: `transcription.md`, the
//! `episode_info.md` sidecar, and `show_notes.md`, followed by a folder
//! rename. Chat calls are best-effort; any failed call degrades its own
//! artifact (sentinel identity, skipped timeline window, plain-joined
//! summary) and the pipeline keeps going. Only an unstable file or a failed
//! transcription aborts the episode.

use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::readiness::{wait_for_stable, FsProbe, ReadinessConfig};
use crate::rename::{FolderRenamer, RenameOutcome};
use crate::transcribe::TranscribeBackend;
use crate::watcher::RecordingEvent;
use podforge_core::prompts::{
    chunk_summary_user_prompt, guest_user_prompt, intro_user_prompt, interval_summary_user_prompt,
    keywords_user_prompt, merge_summaries_user_prompt, titles_user_prompt, topic_user_prompt,
    CHUNK_SUMMARY_SYSTEM, GUEST_SYSTEM, INTERVAL_SUMMARY_SYSTEM, INTRO_SYSTEM, KEYWORDS_SYSTEM,
    MERGE_SUMMARIES_SYSTEM, TITLES_SYSTEM, TOPIC_SYSTEM,
};
use podforge_core::{
    clean_transcript_intro, format_timeline, group_by_interval, parse_srt, reconcile,
    render_show_notes, split_into_chunks, ChatBridge, EpisodeIdentity, EpisodeInfoDoc,
    TimestampEntry, EPISODE_INFO_FILE,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn};

/// Transcript file written next to the audio.
pub const TRANSCRIPTION_FILE: &str = "transcription.md";

/// Show-notes file written next to the audio.
pub const SHOW_NOTES_FILE: &str = "show_notes.md";

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Target chunk size for episode-summary chunking.
    pub chunk_size: usize,
    /// Timeline window width in minutes.
    pub window_minutes: u64,
    /// Transcript excerpt budget for guest extraction.
    pub guest_excerpt_chars: usize,
    /// Transcript excerpt budget for topic and keyword extraction.
    pub topic_excerpt_chars: usize,
    /// Readiness polling parameters.
    pub readiness: ReadinessConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: podforge_core::DEFAULT_CHUNK_SIZE,
            window_minutes: podforge_core::DEFAULT_WINDOW_MINUTES,
            guest_excerpt_chars: 2000,
            topic_excerpt_chars: 3000,
            readiness: ReadinessConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_monitor_config(config: &MonitorConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            window_minutes: config.window_minutes,
            readiness: ReadinessConfig {
                poll_interval: Duration::from_secs(config.ready_poll_secs),
                timeout: Duration::from_secs(config.ready_timeout_secs),
            },
            ..Default::default()
        }
    }
}

/// Progress notifications for observers (UI, tests). Best-effort delivery.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    TranscriptSaved(PathBuf),
    InfoSaved(PathBuf),
    ShowNotesSaved(PathBuf),
    FolderRenamed(PathBuf),
    Failed(PathBuf, String),
}

/// Per-episode pipeline over a pluggable transcription backend.
pub struct EpisodePipeline<T: TranscribeBackend> {
    transcriber: T,
    chat: Option<ChatBridge>,
    config: PipelineConfig,
    renamer: Arc<Mutex<FolderRenamer>>,
    event_tx: Option<UnboundedSender<PipelineEvent>>,
}

impl<T: TranscribeBackend> EpisodePipeline<T> {
    pub fn new(
        transcriber: T,
        chat: Option<ChatBridge>,
        config: PipelineConfig,
        renamer: Arc<Mutex<FolderRenamer>>,
    ) -> Self {
        Self {
            transcriber,
            chat,
            config,
            renamer,
            event_tx: None,
        }
    }

    /// Attach a progress-event channel.
    pub fn with_events(mut self, tx: UnboundedSender<PipelineEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// One best-effort chat call. Returns `None` when no bridge is
    /// configured, the call fails, or the reply is blank.
    fn chat_call(&self, system: &str, user: &str) -> Option<String> {
        let bridge = self.chat.as_ref()?;
        match bridge.complete(system, user) {
            Ok(reply) if !reply.trim().is_empty() => Some(reply),
            Ok(_) => None,
            Err(e) => {
                warn!("Chat call failed: {}", e);
                None
            }
        }
    }

    /// Process one finished recording end to end.
    pub fn process_recording(&self, audio_path: &Path) -> MonitorResult<()> {
        let folder = audio_path.parent().ok_or_else(|| {
            MonitorError::Watch(format!("{} has no parent folder", audio_path.display()))
        })?;

        if !wait_for_stable(audio_path, &self.config.readiness, &mut FsProbe) {
            return Err(MonitorError::Unstable(
                audio_path.display().to_string(),
            ));
        }

        info!("Transcribing {}", audio_path.display());
        let srt = self.transcriber.transcribe_file(audio_path)?;

        let transcript_path = folder.join(TRANSCRIPTION_FILE);
        fs::write(
            &transcript_path,
            format!("# Transcription with Timestamps\n\n{}", srt),
        )?;
        self.emit(PipelineEvent::TranscriptSaved(transcript_path));

        let entries = match parse_srt(&srt) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Transcript is not valid SRT, timeline disabled: {}", e);
                Vec::new()
            }
        };

        let identity = self.extract_identity(&srt);
        info!(
            "Episode identity: guest={:?} topic={:?}",
            identity.guest, identity.topic
        );

        let timeline_md = self.build_timeline(&entries);
        let summary = self.summarize_episode(&entries, &srt);
        let excerpt = clean_transcript_intro(&srt, self.config.topic_excerpt_chars);
        let keywords = self.chat_call(
            KEYWORDS_SYSTEM,
            &keywords_user_prompt(&identity.guest, &identity.topic, &excerpt),
        );
        let titles = self.chat_call(
            TITLES_SYSTEM,
            &titles_user_prompt(
                &identity.guest,
                &identity.topic,
                keywords.as_deref().unwrap_or(&identity.topic),
            ),
        );
        let intro = self.chat_call(
            INTRO_SYSTEM,
            &intro_user_prompt(
                &identity.guest,
                summary.as_deref().unwrap_or(&identity.topic),
            ),
        );

        let info_doc = EpisodeInfoDoc {
            guest: identity.guest.clone(),
            topic: identity.topic.clone(),
            intro: intro.clone(),
            keywords: keywords.clone(),
            titles: titles.clone(),
        };
        let info_path = folder.join(EPISODE_INFO_FILE);
        fs::write(&info_path, info_doc.render())?;
        self.emit(PipelineEvent::InfoSaved(info_path));

        let notes = render_show_notes(
            intro.as_deref(),
            summary.as_deref(),
            &timeline_md,
            keywords.as_deref(),
            titles.as_deref(),
        );
        let notes_path = folder.join(SHOW_NOTES_FILE);
        fs::write(&notes_path, notes)?;
        self.emit(PipelineEvent::ShowNotesSaved(notes_path));

        self.rename_folder(folder);
        Ok(())
    }

    /// Guest and topic extraction, reconciled to a nameable identity.
    /// With no chat bridge both extractions are empty and reconciliation
    /// yields the sentinel defaults.
    fn extract_identity(&self, srt: &str) -> EpisodeIdentity {
        let guest_excerpt = clean_transcript_intro(srt, self.config.guest_excerpt_chars);
        let topic_excerpt = clean_transcript_intro(srt, self.config.topic_excerpt_chars);

        let raw_guest = self
            .chat_call(GUEST_SYSTEM, &guest_user_prompt(&guest_excerpt))
            .unwrap_or_default();
        let raw_topic = self
            .chat_call(TOPIC_SYSTEM, &topic_user_prompt(&topic_excerpt))
            .unwrap_or_default();

        reconcile(&raw_guest, &raw_topic)
    }

    /// Timeline markdown: one summarized line per non-empty window. A failed
    /// window summary drops that window only.
    fn build_timeline(&self, entries: &[podforge_core::SrtEntry]) -> String {
        let segments = group_by_interval(entries, self.config.window_minutes);
        let mut lines = Vec::with_capacity(segments.len());
        for segment in &segments {
            match self.chat_call(
                INTERVAL_SUMMARY_SYSTEM,
                &interval_summary_user_prompt(&segment.text),
            ) {
                Some(summary) => lines.push(TimestampEntry {
                    time: segment.label.clone(),
                    summary,
                }),
                None => warn!("No summary for window {}, dropping it", segment.label),
            }
        }
        format_timeline(&lines)
    }

    /// Chunked episode summary: summarize each chunk in order, then merge.
    /// A failed merge falls back to joining the chunk summaries as-is.
    fn summarize_episode(
        &self,
        entries: &[podforge_core::SrtEntry],
        raw_srt: &str,
    ) -> Option<String> {
        // Prefer the parsed cue text; chunking raw SRT would count indices
        // and timecodes against the budget.
        let plain = if entries.is_empty() {
            raw_srt.to_string()
        } else {
            entries
                .iter()
                .map(|e| e.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        let chunks: Vec<String> = split_into_chunks(&plain, self.config.chunk_size).collect();
        let total = chunks.len();
        let mut summaries = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            match self.chat_call(
                CHUNK_SUMMARY_SYSTEM,
                &chunk_summary_user_prompt(chunk, index, total),
            ) {
                Some(summary) => summaries.push(summary),
                None => warn!("No summary for chunk {} of {}", index + 1, total),
            }
        }

        match summaries.len() {
            0 => None,
            1 => summaries.into_iter().next(),
            _ => self
                .chat_call(
                    MERGE_SUMMARIES_SYSTEM,
                    &merge_summaries_user_prompt(&summaries),
                )
                .or_else(|| Some(summaries.join("\n\n"))),
        }
    }

    /// Folder rename is best-effort: a skip or collision is logged, never an
    /// episode failure.
    fn rename_folder(&self, folder: &Path) {
        let outcome = match self.renamer.lock() {
            Ok(mut renamer) => renamer.rename(folder),
            Err(_) => {
                error!("Renamer lock poisoned, leaving folder as-is");
                return;
            }
        };
        match outcome {
            Ok(RenameOutcome::Renamed(dest)) => {
                self.emit(PipelineEvent::FolderRenamed(dest));
            }
            Ok(RenameOutcome::Skipped(reason)) => {
                info!("Rename skipped for {}: {:?}", folder.display(), reason);
            }
            Ok(RenameOutcome::Collision(dest)) => {
                warn!("Rename collision, {} already exists", dest.display());
            }
            Err(e) => warn!("Rename failed for {}: {}", folder.display(), e),
        }
    }
}

/// Sequential event loop over incoming recordings. Keeps a handled set so
/// duplicate watch events for one file are processed once; a file that never
/// stabilized or failed transcription transiently is un-marked so a later
/// event can retry it. Compression failures stay marked: the file cannot fit
/// under the upload ceiling and retrying cannot change that.
pub struct PipelineRunner<T: TranscribeBackend> {
    pipeline: EpisodePipeline<T>,
    handled: HashSet<PathBuf>,
}

impl<T: TranscribeBackend> PipelineRunner<T> {
    pub fn new(pipeline: EpisodePipeline<T>) -> Self {
        Self {
            pipeline,
            handled: HashSet::new(),
        }
    }

    /// Process one watch event; duplicates are no-ops.
    pub fn handle(&mut self, event: RecordingEvent) {
        if !self.handled.insert(event.audio_path.clone()) {
            return;
        }
        match self.pipeline.process_recording(&event.audio_path) {
            Ok(()) => info!("Finished episode {}", event.audio_path.display()),
            Err(e) => {
                error!("Episode {} failed: {}", event.audio_path.display(), e);
                if matches!(
                    e,
                    MonitorError::Unstable(_) | MonitorError::Transcribe(_)
                ) {
                    self.handled.remove(&event.audio_path);
                }
                self.pipeline
                    .emit(PipelineEvent::Failed(event.audio_path, e.to_string()));
            }
        }
    }

    /// Drain events until the sending side hangs up.
    pub fn run(&mut self, rx: Receiver<RecordingEvent>) {
        while let Ok(event) = rx.recv() {
            self.handle(event);
        }
        info!("Recording channel closed, runner stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcribe::PlaceholderTranscriber;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    const SAMPLE_SRT: &str = "1\n00:00:01,000 --> 00:00:04,000\nWelcome to the show.\n\n\
2\n00:05:10,000 --> 00:05:14,000\nSecond window here.\n";

    fn fast_pipeline() -> EpisodePipeline<PlaceholderTranscriber> {
        EpisodePipeline::new(
            PlaceholderTranscriber::with_response(SAMPLE_SRT.to_string()),
            None,
            PipelineConfig {
                readiness: ReadinessConfig {
                    poll_interval: Duration::from_millis(1),
                    timeout: Duration::from_secs(5),
                },
                ..Default::default()
            },
            Arc::new(Mutex::new(FolderRenamer::new())),
        )
    }

    fn episode_folder(root: &Path, name: &str) -> PathBuf {
        let folder = root.join(name);
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("audio.m4a"), b"fake audio bytes").unwrap();
        folder
    }

    #[test]
    fn degraded_run_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let folder = episode_folder(dir.path(), "ep 2024-03-01");
        let pipeline = fast_pipeline();

        pipeline.process_recording(&folder.join("audio.m4a")).unwrap();

        // Folder was renamed from the sentinel identity.
        let renamed = dir.path().join("General Discussion - 2024-03-01");
        assert!(renamed.is_dir());
        let transcript = fs::read_to_string(renamed.join(TRANSCRIPTION_FILE)).unwrap();
        assert!(transcript.starts_with("# Transcription with Timestamps\n\n"));
        let info = fs::read_to_string(renamed.join(EPISODE_INFO_FILE)).unwrap();
        assert!(info.contains("Guest: Unknown Speaker"));
        assert!(info.contains("Topic: General Discussion"));
        // No chat bridge means no window summaries: placeholder timeline.
        let notes = fs::read_to_string(renamed.join(SHOW_NOTES_FILE)).unwrap();
        assert!(notes.contains(podforge_core::NO_TIMESTAMPS));
    }

    #[test]
    fn unreadable_audio_fails_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("ep 2024-03-01");
        fs::create_dir(&folder).unwrap();
        let missing = folder.join("audio.m4a");

        let pipeline = EpisodePipeline::new(
            PlaceholderTranscriber::new(),
            None,
            PipelineConfig {
                readiness: ReadinessConfig {
                    poll_interval: Duration::from_millis(1),
                    timeout: Duration::from_millis(5),
                },
                ..Default::default()
            },
            Arc::new(Mutex::new(FolderRenamer::new())),
        );

        let err = pipeline.process_recording(&missing).unwrap_err();
        assert!(matches!(err, MonitorError::Unstable(_)));
        assert!(!folder.join(TRANSCRIPTION_FILE).exists());
    }

    #[test]
    fn runner_processes_each_path_once() {
        let dir = tempfile::tempdir().unwrap();
        let folder = episode_folder(dir.path(), "ep 2024-03-01");
        let audio = folder.join("audio.m4a");
        let mut runner = PipelineRunner::new(fast_pipeline());

        runner.handle(RecordingEvent {
            audio_path: audio.clone(),
        });
        assert!(dir.path().join("General Discussion - 2024-03-01").is_dir());

        // Replay of the same event is a no-op even though the file moved.
        runner.handle(RecordingEvent { audio_path: audio });
    }

    /// Fails the first call with a transcription error, succeeds after.
    struct FlakyTranscriber {
        failed_once: AtomicBool,
        srt: String,
    }

    impl TranscribeBackend for FlakyTranscriber {
        fn transcribe_file(&self, _audio_path: &Path) -> MonitorResult<String> {
            if !self.failed_once.swap(true, Ordering::SeqCst) {
                return Err(MonitorError::Transcribe("connection reset".to_string()));
            }
            Ok(self.srt.clone())
        }
    }

    /// Always reports the file as uncompressible.
    struct OversizedTranscriber;

    impl TranscribeBackend for OversizedTranscriber {
        fn transcribe_file(&self, audio_path: &Path) -> MonitorResult<String> {
            Err(MonitorError::Compression(format!(
                "{} does not fit at any bitrate",
                audio_path.display()
            )))
        }
    }

    #[test]
    fn transient_transcription_failure_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let folder = episode_folder(dir.path(), "ep 2024-03-01");
        let audio = folder.join("audio.m4a");

        let pipeline = EpisodePipeline::new(
            FlakyTranscriber {
                failed_once: AtomicBool::new(false),
                srt: SAMPLE_SRT.to_string(),
            },
            None,
            PipelineConfig {
                readiness: ReadinessConfig {
                    poll_interval: Duration::from_millis(1),
                    timeout: Duration::from_secs(5),
                },
                ..Default::default()
            },
            Arc::new(Mutex::new(FolderRenamer::new())),
        );
        let mut runner = PipelineRunner::new(pipeline);

        // First event hits the transient failure; the path is un-marked and
        // no transcript exists yet.
        runner.handle(RecordingEvent {
            audio_path: audio.clone(),
        });
        assert!(!runner.handled.contains(&audio));
        assert!(!folder.join(TRANSCRIPTION_FILE).exists());

        // A replayed watch event retries and the episode completes.
        runner.handle(RecordingEvent { audio_path: audio });
        assert!(dir.path().join("General Discussion - 2024-03-01").is_dir());
    }

    #[test]
    fn compression_failure_is_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let folder = episode_folder(dir.path(), "ep 2024-03-01");
        let audio = folder.join("audio.m4a");

        let pipeline = EpisodePipeline::new(
            OversizedTranscriber,
            None,
            PipelineConfig {
                readiness: ReadinessConfig {
                    poll_interval: Duration::from_millis(1),
                    timeout: Duration::from_secs(5),
                },
                ..Default::default()
            },
            Arc::new(Mutex::new(FolderRenamer::new())),
        );
        let mut runner = PipelineRunner::new(pipeline);

        runner.handle(RecordingEvent {
            audio_path: audio.clone(),
        });
        // Fatal for this file: it stays marked and a replay is a no-op.
        assert!(runner.handled.contains(&audio));
        runner.handle(RecordingEvent { audio_path: audio });
        assert!(!folder.join(TRANSCRIPTION_FILE).exists());
    }

    #[test]
    fn unstable_path_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("ep 2024-03-01");
        fs::create_dir(&folder).unwrap();
        let audio = folder.join("audio.m4a");

        let pipeline = EpisodePipeline::new(
            PlaceholderTranscriber::with_response(SAMPLE_SRT.to_string()),
            None,
            PipelineConfig {
                readiness: ReadinessConfig {
                    poll_interval: Duration::from_millis(1),
                    timeout: Duration::from_millis(250),
                },
                ..Default::default()
            },
            Arc::new(Mutex::new(FolderRenamer::new())),
        );
        let mut runner = PipelineRunner::new(pipeline);

        // File absent: readiness times out and the path is un-marked.
        runner.handle(RecordingEvent {
            audio_path: audio.clone(),
        });
        assert!(!runner.handled.contains(&audio));

        // File arrives; the retry succeeds.
        fs::write(&audio, b"fake audio bytes").unwrap();
        runner.handle(RecordingEvent { audio_path: audio });
        assert!(dir.path().join("General Discussion - 2024-03-01").is_dir());
    }
}
