use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::ForgeError;
use crate::wire::CompletionRequest;

use super::groq::{chat_body, ChatResponse};
use super::Provider;

/// OpenRouter speaks the same OpenAI chat shape as Groq, plus attribution
/// headers it uses for app ranking.
pub struct OpenRouter {
    api_key: String,
    api_base: String,
    client: Client,
    timeout: Duration,
}

const REFERER: &str = "https://ai-mern-generator.vercel.app";
const APP_TITLE: &str = "AI MERN Stack Generator";

impl OpenRouter {
    pub fn new(api_key: String, api_base: String, timeout: Duration) -> Self {
        Self { api_key, api_base, client: Client::new(), timeout }
    }
}

#[async_trait]
impl Provider for OpenRouter {
    fn resolve_model(&self, alias: &str) -> &'static str {
        match alias {
            "claude-3.5-sonnet" => "anthropic/claude-3.5-sonnet",
            "gpt-4-turbo" => "openai/gpt-4-turbo",
            "llama-3.3-70b" => "meta-llama/llama-3.3-70b-instruct",
            _ => "google/gemini-pro-1.5",
        }
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, ForgeError> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let body = chat_body(req, &req.model);

        log::debug!("openrouter: POST {url} model={}", req.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::upstream(format!("OpenRouter API error: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ForgeError::upstream(format!("OpenRouter API error: {e}")))?;

        if !status.is_success() {
            return Err(ForgeError::upstream(format!(
                "OpenRouter API error ({status}): {text}"
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            ForgeError::upstream(format!("OpenRouter API error: bad response: {e}"))
        })?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_table_covers_known_models_and_falls_back() {
        let or = OpenRouter::new("k".into(), "http://x".into(), Duration::from_secs(1));
        assert_eq!(or.resolve_model("claude-3.5-sonnet"), "anthropic/claude-3.5-sonnet");
        assert_eq!(or.resolve_model("gpt-4-turbo"), "openai/gpt-4-turbo");
        assert_eq!(or.resolve_model("llama-3.3-70b"), "meta-llama/llama-3.3-70b-instruct");
        assert_eq!(or.resolve_model("gpt-4"), "google/gemini-pro-1.5");
    }
}
