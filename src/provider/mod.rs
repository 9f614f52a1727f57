use async_trait::async_trait;

use crate::config::Config;
use crate::errors::ForgeError;
use crate::wire::{CompletionRequest, ProviderKind};

pub mod groq;
pub mod huggingface;
pub mod openrouter;

/// Uniform text-completion contract over the three inference providers.
/// Whether a transport blocks for one message or concatenates a token stream
/// is invisible to callers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Maps a short model alias to this provider's canonical identifier.
    /// Unknown aliases resolve to the provider's default model.
    fn resolve_model(&self, alias: &str) -> &'static str;

    async fn complete(&self, req: &CompletionRequest) -> Result<String, ForgeError>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

/// Builds the client for the requested provider. Fails fast with a
/// configuration error, before any network call, when the credential is
/// absent.
pub fn make_provider(kind: ProviderKind, cfg: &Config) -> Result<DynProvider, ForgeError> {
    let timeout = std::time::Duration::from_secs(cfg.provider_timeout_secs);
    match kind {
        ProviderKind::Groq => {
            let key = cfg.groq_api_key.clone().ok_or_else(|| {
                ForgeError::configuration(
                    "Groq API key not configured. Get free key at https://console.groq.com",
                )
            })?;
            Ok(Box::new(groq::Groq::new(key, cfg.groq_api_base.clone(), timeout)))
        }
        ProviderKind::Huggingface => {
            let key = cfg.huggingface_api_key.clone().ok_or_else(|| {
                ForgeError::configuration(
                    "Hugging Face API key not configured. Get free key at https://huggingface.co/settings/tokens",
                )
            })?;
            Ok(Box::new(huggingface::HuggingFace::new(
                key,
                cfg.huggingface_api_base.clone(),
                timeout,
            )))
        }
        ProviderKind::Openrouter => {
            let key = cfg.openrouter_api_key.clone().ok_or_else(|| {
                ForgeError::configuration(
                    "OpenRouter API key not configured. Get key at https://openrouter.ai/keys",
                )
            })?;
            Ok(Box::new(openrouter::OpenRouter::new(
                key,
                cfg.openrouter_api_base.clone(),
                timeout,
            )))
        }
    }
}
