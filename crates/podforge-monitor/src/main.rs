//! Podforge monitor CLI: watch a recordings folder and process new episodes.
//!
//! Usage:
//!   cargo run -p podforge-monitor -- --watch [--path ./recordings]
//!   cargo run -p podforge-monitor -- --once path/to/audio.m4a
//!
//! `--watch` runs the long-lived folder monitor; `--once` processes a single
//! recording and exits. Requires OPENAI_API_KEY for real transcription and
//! chat extraction (else a placeholder transcript and sentinel metadata).

use podforge_monitor::{
    EpisodePipeline, FolderRenamer, MonitorConfig, PipelineConfig, PipelineRunner,
    PlaceholderTranscriber, RecordingEvent, RecordingWatcher, TranscribeBackend,
    WatcherConfig, WhisperApiTranscriber,
};
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let mut watch = false;
    let mut once: Option<PathBuf> = None;
    let mut path_override: Option<PathBuf> = None;

    while let Some(a) = args.next() {
        match a.as_str() {
            "--watch" => watch = true,
            "--once" => once = args.next().map(PathBuf::from),
            "--path" => path_override = args.next().map(PathBuf::from),
            _ => {}
        }
    }

    if !watch && once.is_none() {
        eprintln!("Podforge — podcast recording monitor");
        eprintln!("  --watch            Watch the recordings folder (PODFORGE_WATCH_PATH)");
        eprintln!("  --path DIR          Override the watched folder");
        eprintln!("  --once FILE         Process a single recording and exit");
        eprintln!();
        eprintln!("Requires OPENAI_API_KEY for transcription and metadata extraction");
        eprintln!("(else placeholder transcript and sentinel episode identity).");
        return Ok(());
    }

    let mut config = MonitorConfig::from_env();
    if let Some(path) = path_override {
        config.watch_path = path;
    }

    let transcriber: Box<dyn TranscribeBackend> =
        match WhisperApiTranscriber::from_env(config.temp_dir.clone()) {
            Ok(backend) => Box::new(backend),
            Err(e) => {
                warn!("Falling back to placeholder transcription: {}", e);
                Box::new(PlaceholderTranscriber::new())
            }
        };

    let chat = podforge_core::ChatBridge::from_env().map(|bridge| match &config.chat_model {
        Some(model) => bridge.with_model(model),
        None => bridge,
    });
    match &chat {
        Some(bridge) => info!("Chat extraction enabled (model {})", bridge.model()),
        None => warn!("No OPENAI_API_KEY; episode metadata will use defaults"),
    }

    let renamer = Arc::new(Mutex::new(FolderRenamer::new()));
    let pipeline = EpisodePipeline::new(
        transcriber,
        chat,
        PipelineConfig::from_monitor_config(&config),
        Arc::clone(&renamer),
    );
    let mut runner = PipelineRunner::new(pipeline);

    if let Some(audio_path) = once {
        runner.handle(RecordingEvent { audio_path });
        return Ok(());
    }

    std::fs::create_dir_all(&config.watch_path)?;
    info!("Monitoring {} for new recordings", config.watch_path.display());

    let watcher = RecordingWatcher::new(
        WatcherConfig {
            watch_path: config.watch_path.clone(),
            poll_interval: Duration::from_secs(config.watch_poll_secs),
        },
        renamer,
    );

    let (tx, rx) = channel();
    let watcher_handle = thread::spawn(move || {
        if let Err(e) = watcher.watch_blocking(tx) {
            error!("Watcher stopped: {}", e);
        }
    });

    runner.run(rx);
    let _ = watcher_handle.join();
    Ok(())
}
