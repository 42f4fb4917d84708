//! Fixed-width time-window grouping of transcript entries.
//!
//! Buckets SRT entries into contiguous windows (default 5 minutes) so each
//! window can be summarized into one timeline line. Windows with no entries
//! are never emitted.

use crate::srt::SrtEntry;

/// Default grouping window in minutes.
pub const DEFAULT_WINDOW_MINUTES: u64 = 5;

/// One non-empty time window: a `MM:00` label and the space-joined text of
/// every entry whose start time falls inside the window.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSegment {
    pub label: String,
    pub text: String,
}

/// Label for a window: the window's start offset in minutes, `MM:00`.
pub fn interval_label(window_index: u64, window_minutes: u64) -> String {
    format!("{:02}:00", window_index * window_minutes)
}

/// Group entries into fixed-width windows by start time.
///
/// Entries are visited in order; the grouping is deterministic and cannot
/// fail (timestamp errors surface upstream in the SRT parser).
pub fn group_by_interval(entries: &[SrtEntry], window_minutes: u64) -> Vec<IntervalSegment> {
    let window_secs = window_minutes * 60;
    let mut segments = Vec::new();
    let mut current_window = 0u64;
    let mut buffer: Vec<&str> = Vec::new();

    for entry in entries {
        let window = entry.start.as_secs() / window_secs;
        if window > current_window {
            if !buffer.is_empty() {
                segments.push(IntervalSegment {
                    label: interval_label(current_window, window_minutes),
                    text: buffer.join(" "),
                });
                buffer.clear();
            }
            current_window = window;
        }
        buffer.push(&entry.text);
    }

    if !buffer.is_empty() {
        segments.push(IntervalSegment {
            label: interval_label(current_window, window_minutes),
            text: buffer.join(" "),
        });
    }

    segments
}
