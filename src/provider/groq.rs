use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::errors::ForgeError;
use crate::wire::{CompletionRequest, Role};

use super::Provider;

/// Groq serves an OpenAI-shaped chat completions API; one blocking call
/// returns the whole message.
pub struct Groq {
    api_key: String,
    api_base: String,
    client: Client,
    timeout: Duration,
}

impl Groq {
    pub fn new(api_key: String, api_base: String, timeout: Duration) -> Self {
        Self { api_key, api_base, client: Client::new(), timeout }
    }
}

pub(super) fn chat_body(req: &CompletionRequest, model: &str) -> serde_json::Value {
    let mut messages = vec![json!({ "role": "system", "content": req.system })];
    for m in &req.messages {
        let role = match m.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        messages.push(json!({ "role": role, "content": m.content }));
    }
    json!({
        "model": model,
        "messages": messages,
        "temperature": req.temperature,
        "max_tokens": req.max_tokens,
    })
}

#[derive(Deserialize)]
pub(super) struct ChatMessageOut {
    pub content: String,
}

#[derive(Deserialize)]
pub(super) struct Choice {
    pub message: ChatMessageOut,
}

#[derive(Deserialize)]
pub(super) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[async_trait]
impl Provider for Groq {
    fn resolve_model(&self, alias: &str) -> &'static str {
        match alias {
            "llama3.3" => "llama-3.3-70b-versatile",
            _ => "llama-3.1-8b-instant",
        }
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, ForgeError> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let body = chat_body(req, &req.model);

        log::debug!("groq: POST {url} model={}", req.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::upstream(format!("Groq API error: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ForgeError::upstream(format!("Groq API error: {e}")))?;

        if !status.is_success() {
            return Err(ForgeError::upstream(format!("Groq API error ({status}): {text}")));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ForgeError::upstream(format!("Groq API error: bad response: {e}")))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default())
    }
}
