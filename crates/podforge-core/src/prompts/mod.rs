//! Prompt templates for episode extraction and show-notes generation.

pub mod extraction;
pub mod show_notes;

pub use extraction::{
    guest_user_prompt, topic_user_prompt, GUEST_SYSTEM, GUEST_USER_TEMPLATE, TOPIC_SYSTEM,
    TOPIC_USER_TEMPLATE,
};
pub use show_notes::{
    chunk_summary_user_prompt, interval_summary_user_prompt, intro_user_prompt,
    keywords_user_prompt, merge_summaries_user_prompt, titles_user_prompt, CHUNK_SUMMARY_SYSTEM,
    INTERVAL_SUMMARY_SYSTEM, INTRO_SYSTEM, KEYWORDS_SYSTEM, MERGE_SUMMARIES_SYSTEM, TITLES_SYSTEM,
};
