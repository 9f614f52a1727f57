use serde::{Deserialize, Serialize};

/// ========================================
/// Generation endpoint wire protocol
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Groq,
    Huggingface,
    Openrouter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackKind {
    Html,
    Mern,
}

/// One previously generated file, replayed verbatim by the caller on every
/// continuation turn. The server keeps no session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorFile {
    pub file_path: String,
    pub code: String,
}

fn default_model() -> String {
    "gpt-4".into()
}

fn default_provider() -> ProviderKind {
    ProviderKind::Groq
}

fn default_stack() -> StackKind {
    StackKind::Mern
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    /// Short model alias; each provider maps unknown aliases to its default.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,
    #[serde(default)]
    pub context: Vec<PriorFile>,
    #[serde(default = "default_stack")]
    pub stack: StackKind,
}

/// `analysis` and `enhanced_prompt` are empty on continuation turns (the
/// analyze/enhance stages only run when `context` is empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    pub code: String,
    pub file_path: String,
    pub enhanced_prompt: String,
    pub analysis: String,
}

/// ========================================
/// Provider-facing completion protocol
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// One completion call as seen by every provider transport. The system
/// instruction is carried separately; transports that have no dedicated
/// system slot prepend it as the first message.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_defaults_apply_when_fields_absent() {
        let req: GenerateRequest = serde_json::from_str(r#"{"prompt":"a shop"}"#).unwrap();
        assert_eq!(req.model, "gpt-4");
        assert_eq!(req.provider, ProviderKind::Groq);
        assert_eq!(req.stack, StackKind::Mern);
        assert!(req.context.is_empty());
    }

    #[test]
    fn absent_prompt_deserializes_to_empty() {
        let req: GenerateRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(req.prompt, "");
    }

    #[test]
    fn prior_file_uses_camel_case_keys() {
        let f: PriorFile =
            serde_json::from_str(r#"{"filePath":"/server.js","code":"x"}"#).unwrap();
        assert_eq!(f.file_path, "/server.js");
        let back = serde_json::to_value(&f).unwrap();
        assert_eq!(back["filePath"], "/server.js");
    }

    #[test]
    fn result_serializes_camel_case() {
        let r = GenerateResult {
            code: "c".into(),
            file_path: "index.html".into(),
            enhanced_prompt: "e".into(),
            analysis: "a".into(),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["filePath"], "index.html");
        assert_eq!(v["enhancedPrompt"], "e");
    }
}
