//! File readiness detection.
//!
//! Recording and export tools write audio files incrementally; a consumer
//! must never read a partially written file. A file counts as stable only
//! after two consecutive equal, positive size readings — a missing file or a
//! zero-byte placeholder never stabilizes. The poll source is injectable so
//! the state machine is tested with scripted size sequences, no real sleeps.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Source of file-size observations.
pub trait SizeProbe {
    /// Current size in bytes, or `None` when the path does not exist yet.
    fn size(&mut self, path: &Path) -> Option<u64>;
}

/// Probe backed by real filesystem metadata.
#[derive(Debug, Default)]
pub struct FsProbe;

impl SizeProbe for FsProbe {
    fn size(&mut self, path: &Path) -> Option<u64> {
        fs::metadata(path).ok().map(|m| m.len())
    }
}

/// Polling parameters for the readiness wait.
#[derive(Debug, Clone)]
pub struct ReadinessConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Two-reading stability state machine.
#[derive(Debug, Default)]
pub struct StabilityTracker {
    previous: Option<u64>,
}

impl StabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one size observation. Returns true exactly when the reading
    /// equals the previous one and both are positive.
    pub fn observe(&mut self, size: Option<u64>) -> bool {
        match (self.previous, size) {
            (Some(prev), Some(current)) if current == prev && prev > 0 => true,
            (_, Some(current)) => {
                self.previous = Some(current);
                false
            }
            (_, None) => false,
        }
    }
}

/// Block until `path` reaches a stable size or the timeout elapses.
/// Returns false on timeout — a reported condition, not a failure; the
/// caller decides whether to retry or abandon.
pub fn wait_for_stable<P: SizeProbe>(
    path: &Path,
    config: &ReadinessConfig,
    probe: &mut P,
) -> bool {
    let start = Instant::now();
    let mut tracker = StabilityTracker::new();

    loop {
        let size = probe.size(path);
        if tracker.observe(size) {
            debug!("Readiness: {} stable at {:?} bytes", path.display(), size);
            return true;
        }
        if start.elapsed() >= config.timeout {
            return false;
        }
        std::thread::sleep(config.poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::PathBuf;

    struct ScriptedProbe {
        readings: VecDeque<Option<u64>>,
    }

    impl ScriptedProbe {
        fn new(readings: &[Option<u64>]) -> Self {
            Self {
                readings: readings.iter().copied().collect(),
            }
        }
    }

    impl SizeProbe for ScriptedProbe {
        fn size(&mut self, _path: &Path) -> Option<u64> {
            self.readings.pop_front().flatten()
        }
    }

    #[test]
    fn stabilizes_exactly_on_second_equal_positive_reading() {
        let mut tracker = StabilityTracker::new();
        assert!(!tracker.observe(Some(0)));
        assert!(!tracker.observe(Some(100)));
        assert!(!tracker.observe(Some(250)));
        assert!(tracker.observe(Some(250)));
    }

    #[test]
    fn zero_size_never_stabilizes() {
        let mut tracker = StabilityTracker::new();
        assert!(!tracker.observe(Some(0)));
        assert!(!tracker.observe(Some(0)));
        assert!(!tracker.observe(Some(0)));
    }

    #[test]
    fn missing_file_does_not_reset_or_stabilize() {
        let mut tracker = StabilityTracker::new();
        assert!(!tracker.observe(None));
        assert!(!tracker.observe(Some(42)));
        assert!(!tracker.observe(None));
        assert!(tracker.observe(Some(42)));
    }

    #[test]
    fn wait_returns_true_once_stable() {
        let config = ReadinessConfig {
            poll_interval: Duration::ZERO,
            timeout: Duration::from_secs(30),
        };
        let mut probe = ScriptedProbe::new(&[Some(0), Some(100), Some(250), Some(250)]);
        assert!(wait_for_stable(
            &PathBuf::from("episode.m4a"),
            &config,
            &mut probe
        ));
    }

    #[test]
    fn wait_times_out_without_stability() {
        let config = ReadinessConfig {
            poll_interval: Duration::ZERO,
            timeout: Duration::ZERO,
        };
        let mut probe = ScriptedProbe::new(&[Some(10)]);
        assert!(!wait_for_stable(
            &PathBuf::from("episode.m4a"),
            &config,
            &mut probe
        ));
    }

    #[test]
    fn fs_probe_reads_real_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.m4a");
        let mut probe = FsProbe;
        assert_eq!(probe.size(&path), None);
        std::fs::write(&path, b"12345").unwrap();
        assert_eq!(probe.size(&path), Some(5));
    }
}
