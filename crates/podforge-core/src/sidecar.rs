//! Episode info sidecar: the `episode_info.md` record written next to the
//! transcript and read back by the folder renamer.
//!
//! Format: optional intro prose, then labeled `Guest:` / `Topic:` lines,
//! then optional `## Keywords` and `## Title Suggestions` sections.

use crate::identity::EpisodeIdentity;

/// File name of the sidecar inside an episode folder.
pub const EPISODE_INFO_FILE: &str = "episode_info.md";

/// Renderable episode info document.
#[derive(Debug, Clone, Default)]
pub struct EpisodeInfoDoc {
    pub guest: String,
    pub topic: String,
    /// Intro paragraph preceding the labeled lines.
    pub intro: Option<String>,
    /// Comma-separated keyword list.
    pub keywords: Option<String>,
    /// Numbered title suggestions.
    pub titles: Option<String>,
}

impl EpisodeInfoDoc {
    pub fn from_identity(identity: &EpisodeIdentity) -> Self {
        Self {
            guest: identity.guest.clone(),
            topic: identity.topic.clone(),
            ..Default::default()
        }
    }

    /// Render the sidecar markdown.
    pub fn render(&self) -> String {
        let mut out = String::from("# Episode Information\n\n");
        if let Some(intro) = &self.intro {
            out.push_str(intro.trim());
            out.push_str("\n\n");
        }
        out.push_str(&format!("Guest: {}\n", self.guest));
        out.push_str(&format!("Topic: {}\n", self.topic));
        if let Some(keywords) = &self.keywords {
            out.push_str(&format!("\n## Keywords\n\n{}\n", keywords.trim()));
        }
        if let Some(titles) = &self.titles {
            out.push_str(&format!("\n## Title Suggestions\n\n{}\n", titles.trim()));
        }
        out
    }
}

/// Extract the `Guest:` and `Topic:` fields by labeled-line matching.
/// Returns `None` when either label is missing (the renamer skips then).
pub fn parse_episode_info(content: &str) -> Option<(String, String)> {
    let mut guest = None;
    let mut topic = None;
    for line in content.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Guest:") {
            guest.get_or_insert_with(|| rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Topic:") {
            topic.get_or_insert_with(|| rest.trim().to_string());
        }
    }
    match (guest, topic) {
        (Some(g), Some(t)) => Some((g, t)),
        _ => None,
    }
}
