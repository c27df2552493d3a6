// src/modules/chat/service.rs
//! Task Master chat backed by a hosted model, degrading to the scripted
//! responder on any failure. Never touches quest or wallet state.

use color_eyre::eyre::{eyre, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::Duration;

use crate::config::ChatConfig;
use crate::{log_debug, log_warn};
use super::{offline_reply, ChatMessage, QuestContext, Sender};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub context: QuestContext,
    /// Full conversation so far, ending with the user's new line.
    pub history: Vec<ChatMessage>,
    pub text: String,
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    /// True when this reply came from the scripted responder.
    pub offline: bool,
}

#[derive(Clone)]
pub struct ChatService {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ChatService {
    pub fn new(config: &ChatConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                log_warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn offline_only() -> Self {
        Self::new(&ChatConfig::default())
    }

    pub fn is_remote_available(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn reply(&self, request: ChatRequest) -> ChatReply {
        let Some(api_key) = self.api_key.as_deref().filter(|_| !request.offline) else {
            return Self::scripted(&request);
        };

        match self.query_remote(api_key, &request).await {
            Ok(text) => ChatReply { text, offline: false },
            Err(e) => {
                log_warn!("Chat service failed, switching to offline mode: {}", e);
                Self::scripted(&request)
            }
        }
    }

    fn scripted(request: &ChatRequest) -> ChatReply {
        ChatReply {
            text: offline_reply(&request.text, &request.context),
            offline: true,
        }
    }

    async fn query_remote(&self, api_key: &str, request: &ChatRequest) -> Result<String> {
        let payload = build_payload(request);
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        log_debug!("Chat request to {} with {} turns", url, request.history.len() + 1);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        extract_text(body)
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("remote", &self.api_key.is_some())
            .finish()
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// The persona prompt goes first as a user turn, then the conversation.
fn build_payload(request: &ChatRequest) -> Value {
    let mut contents = vec![json!({
        "role": "user",
        "parts": [{ "text": request.context.system_prompt() }]
    })];

    contents.extend(request.history.iter().map(|m| {
        let role = match m.sender {
            Sender::User => "user",
            Sender::Taskmaster => "model",
        };
        json!({ "role": role, "parts": [{ "text": m.text }] })
    }));

    json!({ "contents": contents })
}

fn extract_text(body: GenerateResponse) -> Result<String> {
    let text: String = body
        .candidates
        .into_iter()
        .next()
        .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(eyre!("empty response from chat model"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::tests::context;
    use crate::modules::chat::ChatSession;
    use chrono::Utc;

    fn request(text: &str, offline: bool) -> ChatRequest {
        let mut chat = ChatSession::open(context(), !offline, Utc::now());
        chat.submit(text, Utc::now()).unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let payload = build_payload(&request("on my way", false));
        let contents = payload["contents"].as_array().unwrap();

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert!(contents[0]["parts"][0]["text"].as_str().unwrap().contains("4821"));
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "on my way");
    }

    #[test]
    fn test_extract_text() {
        let body: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": " Almost there? " }] } }]
        }))
        .unwrap();
        assert_eq!(extract_text(body).unwrap(), "Almost there?");

        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(extract_text(empty).is_err());
    }

    #[tokio::test]
    async fn test_no_key_goes_offline() {
        let service = ChatService::offline_only();
        assert!(!service.is_remote_available());

        let reply = service.reply(request("all done", false)).await;
        assert!(reply.offline);
        assert_eq!(reply.text, "Great job! verify it using this OTP: 4821");
    }

    #[tokio::test]
    async fn test_unreachable_service_downgrades() {
        let service = ChatService::new(&ChatConfig {
            endpoint: "http://127.0.0.1:9".into(),
            api_key: Some("test-key".into()),
            timeout_secs: 2,
            ..ChatConfig::default()
        });
        assert!(service.is_remote_available());

        let reply = service.reply(request("where are you", false)).await;
        assert!(reply.offline);
        assert!(reply.text.starts_with("I'm at Library."));
    }
}
