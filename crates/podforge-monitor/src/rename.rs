//! Episode folder renaming.
//!
//! Once a sidecar file exists, the episode folder is renamed to
//! `"{label} - {date}"` where the label is the guest name (or the topic when
//! the guest is unknown) and the date is scanned from the original folder
//! name. Every decision path short-circuits to a [`RenameOutcome`]; nothing
//! here panics on missing files.

use crate::error::MonitorResult;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use podforge_core::{parse_episode_info, EPISODE_INFO_FILE, UNKNOWN_SPEAKER};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

static DATE_IN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid date regex"));

/// What the renamer decided for one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Folder moved to the new path.
    Renamed(PathBuf),
    /// Nothing to do; see the reason.
    Skipped(SkipReason),
    /// Destination already exists; folder left untouched.
    Collision(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Folder (or its renamed form) was handled earlier in this session.
    AlreadyProcessed,
    /// No readable sidecar, or the sidecar lacks guest/topic lines.
    MissingInfo,
    /// Folder name carries no YYYY-MM-DD date.
    MissingDate,
}

/// Session-scoped renamer. Tracks processed paths so repeated watch events
/// for the same folder are idempotent.
#[derive(Debug, Default)]
pub struct FolderRenamer {
    processed: HashSet<String>,
}

impl FolderRenamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `path` is, or lies under, a folder this renamer produced.
    /// Used by the watcher to ignore events caused by our own renames.
    pub fn covers_event_path(&self, path: &str) -> bool {
        self.processed.iter().any(|done| path.contains(done.as_str()))
    }

    /// Rename `folder` from its sidecar metadata.
    pub fn rename(&mut self, folder: &Path) -> MonitorResult<RenameOutcome> {
        let folder_str = folder.to_string_lossy().into_owned();
        if self.processed.contains(&folder_str) {
            return Ok(RenameOutcome::Skipped(SkipReason::AlreadyProcessed));
        }

        let info_path = folder.join(EPISODE_INFO_FILE);
        let raw = match fs::read_to_string(&info_path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("No sidecar at {}: {}", info_path.display(), e);
                return Ok(RenameOutcome::Skipped(SkipReason::MissingInfo));
            }
        };
        let (guest, topic) = match parse_episode_info(&raw) {
            Some(fields) => fields,
            None => {
                warn!("Sidecar at {} lacks guest/topic lines", info_path.display());
                return Ok(RenameOutcome::Skipped(SkipReason::MissingInfo));
            }
        };

        let folder_name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let date = match extract_date(&folder_name) {
            Some(date) => date,
            None => {
                warn!("No YYYY-MM-DD date in folder name {:?}", folder_name);
                return Ok(RenameOutcome::Skipped(SkipReason::MissingDate));
            }
        };

        let label = sanitize_label(rename_label(&guest, &topic));
        let new_name = format!("{} - {}", label, date.format("%Y-%m-%d"));
        let dest = folder.with_file_name(&new_name);

        if dest.exists() {
            warn!("Rename target {} already exists", dest.display());
            return Ok(RenameOutcome::Collision(dest));
        }

        fs::rename(folder, &dest)?;
        info!("Renamed {:?} -> {:?}", folder_name, new_name);
        self.processed.insert(dest.to_string_lossy().into_owned());
        Ok(RenameOutcome::Renamed(dest))
    }
}

/// Guest name, unless no guest was identified; then the topic.
fn rename_label<'a>(guest: &'a str, topic: &'a str) -> &'a str {
    if guest == UNKNOWN_SPEAKER {
        topic
    } else {
        guest
    }
}

/// Strip characters that are unsafe in folder names and collapse runs of
/// whitespace to single spaces.
pub fn sanitize_label(label: &str) -> String {
    let stripped: String = label
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First YYYY-MM-DD substring that parses as a real calendar date.
pub fn extract_date(name: &str) -> Option<NaiveDate> {
    DATE_IN_NAME
        .captures_iter(name)
        .filter_map(|cap| NaiveDate::parse_from_str(&cap[1], "%Y-%m-%d").ok())
        .next()
}
