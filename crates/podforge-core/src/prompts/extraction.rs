//! Guest-name and topic extraction prompts.
//!
//! Both run over the cleaned transcript intro: hosts introduce their guest
//! and frame the conversation in the first few minutes.

/// System instruction for guest-name extraction.
pub const GUEST_SYSTEM: &str = "You are an assistant that extracts podcast guest names from transcripts. \
The guest name is usually mentioned in the first few lines when the host introduces them.";

/// User prompt template: placeholder is replaced with the intro excerpt.
pub const GUEST_USER_TEMPLATE: &str = "Extract the guest name from this podcast transcript excerpt. \
Return only the guest's full name:\n\n{intro}";

/// Build the guest-extraction user prompt.
pub fn guest_user_prompt(intro: &str) -> String {
    GUEST_USER_TEMPLATE.replace("{intro}", intro)
}

/// System instruction for topic extraction.
pub const TOPIC_SYSTEM: &str = "You are an assistant that extracts the main topic from podcast transcripts. \
Identify the single most central theme of the conversation.";

/// User prompt template: placeholder is replaced with the intro excerpt.
pub const TOPIC_USER_TEMPLATE: &str = "Extract the main topic of this podcast transcript excerpt. \
Return only the topic as a short phrase of 2 to 5 words:\n\n{intro}";

/// Build the topic-extraction user prompt.
pub fn topic_user_prompt(intro: &str) -> String {
    TOPIC_USER_TEMPLATE.replace("{intro}", intro)
}
