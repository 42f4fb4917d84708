//! Episode identity reconciliation.
//!
//! Model-extracted guest names and topics are unreliable: the model may
//! apologize, refuse, or ramble. This module validates both fields against
//! fixed rules and reconciles them into one consistent identity so a folder
//! name always exists — the pipeline never blocks on missing metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel guest value when no valid name could be extracted.
pub const UNKNOWN_SPEAKER: &str = "Unknown Speaker";

/// Fallback topic when extraction produced nothing usable.
pub const DEFAULT_TOPIC: &str = "General Discussion";

/// Maximum plausible guest-name length in characters.
pub const MAX_GUEST_CHARS: usize = 50;

/// Uncertainty/refusal phrases that invalidate a guest extraction.
/// Configuration data, not logic: matched case-insensitively as substrings,
/// only here — replace with a structured-output contract without touching
/// call sites.
pub const UNCERTAINTY_PHRASES: &[&str] = &[
    "sorry",
    "i apologize",
    "could not",
    "cannot",
    "don't see",
    "do not see",
    "does not mention",
    "no guest",
    "cannot find",
    "could not find",
];

/// Reconciled identity of one episode. Derived once from raw extraction
/// output; the date is filled in later by the folder renamer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeIdentity {
    pub guest: String,
    pub topic: String,
    pub date: Option<NaiveDate>,
}

impl EpisodeIdentity {
    /// Label the episode folder is named after: the topic when the guest is
    /// unknown, otherwise the guest.
    pub fn primary_label(&self) -> &str {
        if self.guest == UNKNOWN_SPEAKER {
            &self.topic
        } else {
            &self.guest
        }
    }
}

/// A guest extraction is valid when non-empty, at most 50 characters, and
/// free of uncertainty phrasing.
pub fn is_valid_guest(raw: &str) -> bool {
    let guest = raw.trim();
    if guest.is_empty() || guest.chars().count() > MAX_GUEST_CHARS {
        return false;
    }
    let lower = guest.to_lowercase();
    !UNCERTAINTY_PHRASES.iter().any(|p| lower.contains(p))
}

/// A topic extraction is valid when it has 2–5 whitespace-delimited words.
pub fn is_valid_topic(raw: &str) -> bool {
    let words = raw.split_whitespace().count();
    (2..=5).contains(&words)
}

/// Reconcile raw guest/topic extraction text into one identity.
///
/// Each field falls back independently: an invalid guest becomes
/// [`UNKNOWN_SPEAKER`], an invalid topic becomes [`DEFAULT_TOPIC`]. Together
/// this yields the three-tier policy — valid/valid passes through, an
/// unknown guest promotes the topic to primary label, and a double failure
/// still produces a nameable identity.
pub fn reconcile(raw_guest: &str, raw_topic: &str) -> EpisodeIdentity {
    let guest = if is_valid_guest(raw_guest) {
        raw_guest.trim().to_string()
    } else {
        UNKNOWN_SPEAKER.to_string()
    };
    let topic = if is_valid_topic(raw_topic) {
        raw_topic.trim().to_string()
    } else {
        DEFAULT_TOPIC.to_string()
    };
    EpisodeIdentity {
        guest,
        topic,
        date: None,
    }
}
