//! Show-notes generation prompts: chunk summaries and their merge, interval
//! summaries for the timeline, keywords, title suggestions, and the intro
//! paragraph.

/// System instruction for summarizing one transcript chunk.
pub const CHUNK_SUMMARY_SYSTEM: &str = "You are an expert podcast editor. You summarize transcript segments into \
concise, information-dense notes that can later be merged into one coherent summary.";

/// User prompt template for one chunk. Placeholders: `{current_chunk}`,
/// `{total_chunks}`, `{chunk_text}`.
pub const CHUNK_SUMMARY_USER_TEMPLATE: &str = "Summarize the main points of this podcast transcript segment. \
This is chunk {current_chunk} of {total_chunks}.\n\nTranscript segment:\n{chunk_text}\n\n\
Return 3-5 bullet points covering the key ideas, in the order they appear.";

/// Build the chunk-summary user prompt. `index` is zero-based.
pub fn chunk_summary_user_prompt(chunk_text: &str, index: usize, total: usize) -> String {
    CHUNK_SUMMARY_USER_TEMPLATE
        .replace("{current_chunk}", &(index + 1).to_string())
        .replace("{total_chunks}", &total.to_string())
        .replace("{chunk_text}", chunk_text)
}

/// System instruction for merging per-chunk summaries.
pub const MERGE_SUMMARIES_SYSTEM: &str = "You merge per-segment podcast summaries into one coherent episode summary. \
Preserve the original order, remove redundancy, and keep the result concise.";

/// User prompt template for the merge call. Placeholder: `{segments}`.
pub const MERGE_SUMMARIES_USER_TEMPLATE: &str = "Combine these segment summaries into a single coherent episode summary. \
Topics must flow naturally and duplicate entries must be removed.\n\nSegment summaries, in order:\n{segments}";

/// Build the merge user prompt from ordered chunk summaries.
pub fn merge_summaries_user_prompt(summaries: &[String]) -> String {
    MERGE_SUMMARIES_USER_TEMPLATE.replace("{segments}", &summaries.join("\n\n"))
}

/// System instruction for summarizing one 5-minute window.
pub const INTERVAL_SUMMARY_SYSTEM: &str = "You are an expert at creating podcast timestamps. For a given transcript \
segment you provide a concise one-to-two sentence summary of the main topics discussed.";

/// User prompt template for one window. Placeholder: `{segment_text}`.
pub const INTERVAL_SUMMARY_USER_TEMPLATE: &str =
    "Summarize the main topics discussed in this segment:\n{segment_text}";

/// Build the interval-summary user prompt.
pub fn interval_summary_user_prompt(segment_text: &str) -> String {
    INTERVAL_SUMMARY_USER_TEMPLATE.replace("{segment_text}", segment_text)
}

/// System instruction for keyword extraction.
pub const KEYWORDS_SYSTEM: &str = "Extract key technical terms, concepts, or themes central to a podcast \
conversation: specific technologies, core theoretical concepts, novel frameworks, and notable trends.";

/// User prompt template. Placeholders: `{guest}`, `{topic}`, `{excerpt}`.
pub const KEYWORDS_USER_TEMPLATE: &str = "Extract the most important terms and concepts from this conversation.\n\n\
Guest: {guest}\nMain Topic: {topic}\nTranscript excerpt: {excerpt}\n\n\
Return only a comma-separated list of 20 key terms.";

/// Build the keyword-extraction user prompt.
pub fn keywords_user_prompt(guest: &str, topic: &str, excerpt: &str) -> String {
    KEYWORDS_USER_TEMPLATE
        .replace("{guest}", guest)
        .replace("{topic}", topic)
        .replace("{excerpt}", excerpt)
}

/// System instruction for title suggestions.
pub const TITLES_SYSTEM: &str = "You generate podcast episode titles. Titles often use a colon to separate ideas, \
combine two or three key concepts, and balance technical depth with accessibility. \
Return exactly 10 options as a numbered list.";

/// User prompt template. Placeholders: `{guest}`, `{topic}`, `{keywords}`.
pub const TITLES_USER_TEMPLATE: &str = "Generate 10 title options for a podcast episode.\n\n\
Guest: {guest}\nMain Topic: {topic}\nKey Concepts: {keywords}\n\nReturn only the numbered list.";

/// Build the title-suggestions user prompt.
pub fn titles_user_prompt(guest: &str, topic: &str, keywords: &str) -> String {
    TITLES_USER_TEMPLATE
        .replace("{guest}", guest)
        .replace("{topic}", topic)
        .replace("{keywords}", keywords)
}

/// System instruction for the intro paragraph.
pub const INTRO_SYSTEM: &str = "You write natural, flowing introduction paragraphs for podcast episodes in the \
host's first-person voice. Connect topics smoothly and keep the main content to two or three sentences.";

/// User prompt template. Placeholders: `{guest}`, `{topics}`.
pub const INTRO_USER_TEMPLATE: &str = "Write an introduction paragraph for this podcast episode.\n\n\
Guest Name: {guest}\nTopics From Transcript: {topics}\n\n\
Mention the guest's role or expertise if it appears in the topics, and flow naturally through the main themes.";

/// Build the intro-paragraph user prompt.
pub fn intro_user_prompt(guest: &str, topics: &str) -> String {
    INTRO_USER_TEMPLATE
        .replace("{guest}", guest)
        .replace("{topics}", topics)
}
