//! Chat-completion bridge: templated prompt in, free text out.
//!
//! OpenAI-compatible `chat/completions` endpoint, treated as a potentially
//! slow, potentially failing collaborator. The client carries a hard 60s
//! timeout so a hung call can never block a pipeline indefinitely; call
//! sites catch [`CoreError::Chat`] and substitute their defined fallback.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// Blocking chat bridge for the extraction and summarization prompts.
pub struct ChatBridge {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ChatBridge {
    /// Build from environment: `OPENAI_API_KEY` required, `CHAT_API_URL` and
    /// `PODFORGE_CHAT_MODEL` optional. Returns `None` when no key is set —
    /// the pipeline then runs fully degraded (sentinel identity, no notes).
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("OPENAI_API_KEY").ok()?.trim().to_string();
        if key.is_empty() {
            return None;
        }
        let mut bridge = match Self::new(key) {
            Ok(bridge) => bridge,
            Err(e) => {
                debug!("Chat bridge unavailable: {}", e);
                return None;
            }
        };
        if let Ok(url) = std::env::var("CHAT_API_URL") {
            bridge.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("PODFORGE_CHAT_MODEL") {
            if !model.trim().is_empty() {
                bridge.model = model.trim().to_string();
            }
        }
        Some(bridge)
    }

    /// Create a bridge with an explicit API key. Errors when the HTTP client
    /// cannot be built; the timeout guard is never silently dropped.
    pub fn new(api_key: String) -> CoreResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| CoreError::Chat(format!("client build failed: {}", e)))?;
        Ok(Self {
            api_key: api_key.trim().to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            base_url: OPENAI_API_BASE.to_string(),
            client,
        })
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a system instruction and user content, return the trimmed reply.
    pub fn complete(&self, system: &str, user: &str) -> CoreResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Chat call to {} ({} user chars)", self.model, user.len());
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(DEFAULT_TEMPERATURE),
        };

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| CoreError::Chat(format!("request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            return Err(CoreError::Chat(format!("API error {}: {}", status, body)));
        }

        let parsed: ChatResponse = res
            .json()
            .map_err(|e| CoreError::Chat(format!("response parse failed: {}", e)))?;

        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "sys".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "usr".to_string(),
                },
            ],
            temperature: Some(0.7),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn response_parsing() {
        let raw = r#"{"choices":[{"message":{"content":"  Jane Doe \n"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.trim(), "Jane Doe");
    }

    #[test]
    fn new_builds_with_defaults_and_model_override() {
        let bridge = ChatBridge::new("key".to_string()).unwrap();
        assert_eq!(bridge.model(), DEFAULT_CHAT_MODEL);
        let bridge = bridge.with_model("gpt-4.1");
        assert_eq!(bridge.model(), "gpt-4.1");
    }

    #[test]
    fn from_env_requires_key() {
        // Only assert the no-key path; never hit the network in tests.
        std::env::remove_var("OPENAI_API_KEY");
        assert!(ChatBridge::from_env().is_none());
    }
}
