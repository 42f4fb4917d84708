//! SRT subtitle transcript parser.
//!
//! Whisper-style transcripts arrive as SRT blocks: an integer index line, a
//! `HH:MM:SS,mmm --> HH:MM:SS,mmm` timecode line, then one or more text
//! lines. Stray non-index lines are tolerated and skipped; a malformed
//! timecode is an error because downstream interval grouping depends on it.

use crate::error::{CoreError, CoreResult};
use std::time::Duration;

/// One timed subtitle entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SrtEntry {
    pub index: u32,
    /// Offset from the start of the recording.
    pub start: Duration,
    pub end: Duration,
    /// Text lines of the block, joined with a single space.
    pub text: String,
}

fn parse_field(s: &str, digits: usize) -> Option<u64> {
    if s.len() != digits || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse an SRT timecode (`HH:MM:SS,mmm`) into a duration since start.
pub fn parse_timestamp(raw: &str) -> CoreResult<Duration> {
    let malformed = || CoreError::MalformedTimestamp(raw.to_string());

    let (hms, millis) = raw.trim().split_once(',').ok_or_else(malformed)?;
    let mut parts = hms.split(':');
    let hours = parts
        .next()
        .and_then(|p| parse_field(p, 2))
        .ok_or_else(malformed)?;
    let minutes = parts
        .next()
        .and_then(|p| parse_field(p, 2))
        .ok_or_else(malformed)?;
    let seconds = parts
        .next()
        .and_then(|p| parse_field(p, 2))
        .ok_or_else(malformed)?;
    if parts.next().is_some() {
        return Err(malformed());
    }
    let millis = parse_field(millis, 3).ok_or_else(malformed)?;

    Ok(Duration::from_millis(
        ((hours * 60 + minutes) * 60 + seconds) * 1000 + millis,
    ))
}

/// Parse an SRT transcript into ordered entries.
///
/// Lines that fail to parse as an index where an index is expected are
/// skipped (formatting noise is recoverable). A blank line terminates the
/// current entry; entries without text are dropped.
pub fn parse_srt(transcript: &str) -> CoreResult<Vec<SrtEntry>> {
    struct Partial {
        index: u32,
        start: Option<Duration>,
        end: Option<Duration>,
        text: String,
    }

    let mut entries = Vec::new();
    let mut current: Option<Partial> = None;

    let mut flush = |cur: &mut Option<Partial>, entries: &mut Vec<SrtEntry>| {
        if let Some(p) = cur.take() {
            if !p.text.is_empty() {
                entries.push(SrtEntry {
                    index: p.index,
                    start: p.start.unwrap_or(Duration::ZERO),
                    end: p.end.unwrap_or(Duration::ZERO),
                    text: p.text,
                });
            }
        }
    };

    for line in transcript.lines() {
        let line = line.trim();
        if line.is_empty() {
            flush(&mut current, &mut entries);
            continue;
        }

        match current.as_mut() {
            None => {
                // Expect an index line; skip anything else.
                if let Ok(index) = line.parse::<u32>() {
                    current = Some(Partial {
                        index,
                        start: None,
                        end: None,
                        text: String::new(),
                    });
                }
            }
            Some(p) if line.contains("-->") => {
                let (start, end) = line
                    .split_once("-->")
                    .ok_or_else(|| CoreError::MalformedTimestamp(line.to_string()))?;
                p.start = Some(parse_timestamp(start)?);
                p.end = Some(parse_timestamp(end)?);
            }
            Some(p) => {
                if !p.text.is_empty() {
                    p.text.push(' ');
                }
                p.text.push_str(line);
            }
        }
    }
    flush(&mut current, &mut entries);

    Ok(entries)
}
