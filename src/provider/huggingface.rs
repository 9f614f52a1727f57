use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::Value;

use crate::errors::ForgeError;
use crate::wire::CompletionRequest;

use super::groq::chat_body;
use super::Provider;

/// Hugging Face's inference router streams tokens over SSE; the client
/// concatenates the deltas into one string so callers see the same blocking
/// `complete` as the other transports.
pub struct HuggingFace {
    api_key: String,
    api_base: String,
    client: Client,
    timeout: Duration,
}

impl HuggingFace {
    pub fn new(api_key: String, api_base: String, timeout: Duration) -> Self {
        Self { api_key, api_base, client: Client::new(), timeout }
    }
}

/// Pulls the delta content out of one SSE `data:` payload, if any.
pub(super) fn delta_content(payload: &str) -> Option<String> {
    let value: Value = serde_json::from_str(payload).ok()?;
    value["choices"][0]["delta"]["content"]
        .as_str()
        .map(|s| s.to_string())
}

#[async_trait]
impl Provider for HuggingFace {
    fn resolve_model(&self, alias: &str) -> &'static str {
        match alias {
            "llama3.3" => "meta-llama/Llama-3.3-70B-Instruct",
            "llama3.1" => "meta-llama/Llama-3.1-8B-Instruct",
            _ => "meta-llama/Llama-3.2-3B-Instruct",
        }
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<String, ForgeError> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let mut body = chat_body(req, &req.model);
        body["stream"] = Value::Bool(true);

        log::debug!("huggingface: POST {url} model={} (stream)", req.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::upstream(format!("Hugging Face API error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ForgeError::upstream(format!(
                "Hugging Face API error ({status}): {text}"
            )));
        }

        let mut stream = resp.bytes_stream();
        let mut full_content = String::new();
        let mut buffer = String::new();

        'outer: while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| ForgeError::upstream(format!("Hugging Face stream error: {e}")))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // Drain complete SSE lines; a partial line stays buffered for the
            // next chunk.
            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim().to_string();
                buffer.drain(..=line_end);

                if line.is_empty() {
                    continue;
                }
                if line == "data: [DONE]" {
                    break 'outer;
                }
                if let Some(payload) = line.strip_prefix("data: ") {
                    if let Some(content) = delta_content(payload) {
                        full_content.push_str(&content);
                    }
                }
            }
        }

        Ok(full_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_content_reads_streaming_chunk() {
        let payload = r#"{"choices":[{"delta":{"content":"hel"}}]}"#;
        assert_eq!(delta_content(payload).as_deref(), Some("hel"));
    }

    #[test]
    fn delta_content_ignores_non_content_chunks() {
        assert_eq!(delta_content(r#"{"choices":[{"delta":{}}]}"#), None);
        assert_eq!(delta_content("not json"), None);
    }

    #[tokio::test]
    async fn stream_is_concatenated_in_order() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"FILE: /a.js\\n\"}}]}\n\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\"const x\"}}]}\n\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\" = 1;\"}}]}\n\n\
                   data: [DONE]\n\n";

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(sse)
                    .insert_header("content-type", "text/event-stream"),
            )
            .mount(&server)
            .await;

        let hf = HuggingFace::new("k".into(), server.uri(), Duration::from_secs(5));
        let req = CompletionRequest {
            system: "sys".into(),
            messages: vec![crate::wire::ChatMessage::user("hi")],
            model: "meta-llama/Llama-3.3-70B-Instruct".into(),
            max_tokens: 4000,
            temperature: 0.7,
        };
        let text = hf.complete(&req).await.unwrap();
        assert_eq!(text, "FILE: /a.js\nconst x = 1;");
    }
}
