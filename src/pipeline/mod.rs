use crate::errors::ForgeError;
use crate::parse;
use crate::prompt;
use crate::provider::Provider;
use crate::wire::{ChatMessage, CompletionRequest, GenerateRequest, GenerateResult};

const ANALYSIS_MAX_TOKENS: u32 = 400;
const ENHANCEMENT_MAX_TOKENS: u32 = 800;
const GENERATION_MAX_TOKENS: u32 = 4000;

const ANALYSIS_TEMPERATURE: f32 = 0.7;
const ENHANCEMENT_TEMPERATURE: f32 = 0.8;
const GENERATION_TEMPERATURE: f32 = 0.7;

/// Outcome of a best-effort stage. A failed stage never aborts the request;
/// it degrades to a fallback value and the reason stays observable.
#[derive(Debug, Clone)]
pub enum StageOutcome {
    Full(String),
    Degraded { fallback: String, reason: String },
}

impl StageOutcome {
    pub fn into_text(self) -> String {
        match self {
            StageOutcome::Full(text) => text,
            StageOutcome::Degraded { fallback, .. } => fallback,
        }
    }
}

/// Rejects an absent or whitespace-only prompt. Runs before any provider is
/// constructed so a bad request never touches the network.
pub fn validate(req: &GenerateRequest) -> Result<(), ForgeError> {
    if req.prompt.trim().is_empty() {
        return Err(ForgeError::validation("Prompt is required"));
    }
    Ok(())
}

/// Reconstructs the full multi-turn transcript for one generation call:
/// the (enhanced or original) brief first, then each prior file as an
/// assistant turn followed by a synthetic continuation request. No state is
/// retained between calls, so the whole history rides on every request.
pub fn assemble_messages(user_prompt: &str, context: &[crate::wire::PriorFile]) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::user(user_prompt)];
    for prior in context {
        messages.push(ChatMessage::assistant(prior.code.clone()));
        messages.push(ChatMessage::user(prompt::NEXT_FILE_INSTRUCTION));
    }
    messages
}

/// End-to-end owner of one generation request: analyze -> enhance ->
/// generate -> parse, strictly sequential. The provider is injected so tests
/// can substitute a scripted fake.
pub struct Pipeline<'a> {
    provider: &'a dyn Provider,
}

impl<'a> Pipeline<'a> {
    pub fn new(provider: &'a dyn Provider) -> Self {
        Self { provider }
    }

    pub async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResult, ForgeError> {
        validate(req)?;

        let system = prompt::system_for(req.stack);
        let model = self.provider.resolve_model(&req.model);

        // Analyze and enhance only on the first turn of a session; once the
        // caller replays context, the brief is already settled.
        let (analysis, enhanced_prompt) = if req.context.is_empty() {
            let analysis = match self.analyze(model, &req.prompt).await {
                StageOutcome::Full(text) => text,
                StageOutcome::Degraded { fallback, reason } => {
                    log::warn!("prompt analysis degraded: {reason}");
                    fallback
                }
            };
            let enhanced = match self.enhance(model, &req.prompt, &analysis).await {
                StageOutcome::Full(text) => text,
                StageOutcome::Degraded { fallback, reason } => {
                    log::warn!("prompt enhancement degraded: {reason}");
                    fallback
                }
            };
            (analysis, enhanced)
        } else {
            (String::new(), String::new())
        };

        let user_prompt = if enhanced_prompt.is_empty() { &req.prompt } else { &enhanced_prompt };

        let completion = CompletionRequest {
            system: system.to_string(),
            messages: assemble_messages(user_prompt, &req.context),
            model: model.to_string(),
            max_tokens: GENERATION_MAX_TOKENS,
            temperature: GENERATION_TEMPERATURE,
        };
        let raw = self.provider.complete(&completion).await?;

        let parsed = parse::split_output(&raw, req.stack, req.context.len());
        Ok(GenerateResult {
            code: parsed.code,
            file_path: parsed.file_path,
            enhanced_prompt,
            analysis,
        })
    }

    /// Best-effort critique of the brief; an empty critique means none was
    /// available.
    async fn analyze(&self, model: &str, user_prompt: &str) -> StageOutcome {
        let completion = CompletionRequest {
            system: prompt::analysis_system().to_string(),
            messages: vec![ChatMessage::user(user_prompt)],
            model: model.to_string(),
            max_tokens: ANALYSIS_MAX_TOKENS,
            temperature: ANALYSIS_TEMPERATURE,
        };
        match self.provider.complete(&completion).await {
            Ok(text) => StageOutcome::Full(text),
            Err(e) => StageOutcome::Degraded { fallback: String::new(), reason: e.to_string() },
        }
    }

    /// Best-effort enrichment of the brief; falls back to the original prompt
    /// verbatim.
    async fn enhance(&self, model: &str, user_prompt: &str, analysis: &str) -> StageOutcome {
        let completion = CompletionRequest {
            system: prompt::enhancement_system().to_string(),
            messages: vec![ChatMessage::user(prompt::enhancement_input(user_prompt, analysis))],
            model: model.to_string(),
            max_tokens: ENHANCEMENT_MAX_TOKENS,
            temperature: ENHANCEMENT_TEMPERATURE,
        };
        match self.provider.complete(&completion).await {
            Ok(text) if !text.is_empty() => StageOutcome::Full(text),
            Ok(_) => StageOutcome::Degraded {
                fallback: user_prompt.to_string(),
                reason: "empty enhancement".into(),
            },
            Err(e) => StageOutcome::Degraded {
                fallback: user_prompt.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{PriorFile, Role};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_context_yields_single_user_turn() {
        let messages = assemble_messages("build a shop", &[]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "build a shop");
    }

    #[test]
    fn context_replays_as_assistant_and_continuation_pairs() {
        let context = vec![
            PriorFile { file_path: "/server/models/User.js".into(), code: "model code".into() },
            PriorFile { file_path: "/server/routes/api.js".into(), code: "route code".into() },
        ];
        let messages = assemble_messages("build a shop", &context);
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "model code");
        assert_eq!(messages[2].role, Role::User);
        assert_eq!(messages[2].content, prompt::NEXT_FILE_INSTRUCTION);
        assert_eq!(messages[3].content, "route code");
        assert_eq!(messages[4].content, prompt::NEXT_FILE_INSTRUCTION);
    }

    #[test]
    fn whitespace_prompt_fails_validation() {
        let req = GenerateRequest {
            prompt: "   \n".into(),
            model: "gpt-4".into(),
            provider: crate::wire::ProviderKind::Groq,
            context: vec![],
            stack: crate::wire::StackKind::Mern,
        };
        assert!(matches!(validate(&req), Err(ForgeError::Validation(_))));
    }
}
