//! Show-notes markdown building blocks: the episode timeline section and the
//! cleaned transcript intro excerpt fed to the extraction prompts.

/// Placeholder when no timeline window could be computed.
pub const NO_TIMESTAMPS: &str = "No timestamps available";

/// One timeline line: a `MM:00` offset and its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampEntry {
    pub time: String,
    pub summary: String,
}

/// Format timeline entries under an `## Episode Timeline` heading as
/// `**MM:00** - <summary>` lines. No entries yields the literal placeholder.
pub fn format_timeline(entries: &[TimestampEntry]) -> String {
    if entries.is_empty() {
        return NO_TIMESTAMPS.to_string();
    }
    let mut out = String::from("## Episode Timeline\n\n");
    for entry in entries {
        out.push_str(&format!("**{}** - {}\n\n", entry.time, entry.summary));
    }
    out
}

/// First `max_chars` characters of the transcript with SRT noise removed:
/// timecode lines (`-->`) and bare index-number lines are dropped, the rest
/// is space-joined. The host introduces the guest early, so this excerpt is
/// what the extraction prompts see.
pub fn clean_transcript_intro(transcript: &str, max_chars: usize) -> String {
    let intro: String = transcript.chars().take(max_chars).collect();
    intro
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.contains("-->")
                && !line.bytes().all(|b| b.is_ascii_digit())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Assemble `show_notes.md` from the generated pieces. Absent sections are
/// simply omitted; the timeline is always present (placeholder included).
pub fn render_show_notes(
    intro: Option<&str>,
    summary: Option<&str>,
    timeline_md: &str,
    keywords: Option<&str>,
    titles: Option<&str>,
) -> String {
    let mut out = String::from("# Show Notes\n\n");
    if let Some(intro) = intro {
        out.push_str(intro.trim());
        out.push_str("\n\n");
    }
    if let Some(summary) = summary {
        out.push_str("## Episode Summary\n\n");
        out.push_str(summary.trim());
        out.push_str("\n\n");
    }
    out.push_str(timeline_md.trim_end());
    out.push('\n');
    if let Some(keywords) = keywords {
        out.push_str(&format!("\n## Keywords\n\n{}\n", keywords.trim()));
    }
    if let Some(titles) = titles {
        out.push_str(&format!("\n## Title Suggestions\n\n{}\n", titles.trim()));
    }
    out
}
