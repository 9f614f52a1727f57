use crate::cli::Args;

/// Process-wide configuration, built once at startup and passed by reference
/// into the handlers. Credentials live here rather than being read from the
/// environment at call sites, so tests can substitute values freely.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub provider_timeout_secs: u64,
    pub deploy_timeout_secs: u64,

    pub groq_api_key: Option<String>,
    pub huggingface_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,

    // Fallback tokens for the deploy proxies; a token supplied in the
    // request body always wins and is never persisted.
    pub github_token: Option<String>,
    pub netlify_token: Option<String>,
    pub vercel_token: Option<String>,

    // API bases are overridable so transport tests can point at a local mock.
    pub groq_api_base: String,
    pub huggingface_api_base: String,
    pub openrouter_api_base: String,
    pub github_api_base: String,
    pub netlify_api_base: String,
    pub vercel_api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            provider_timeout_secs: 180,
            deploy_timeout_secs: 60,
            groq_api_key: None,
            huggingface_api_key: None,
            openrouter_api_key: None,
            github_token: None,
            netlify_token: None,
            vercel_token: None,
            groq_api_base: "https://api.groq.com/openai".into(),
            huggingface_api_base: "https://router.huggingface.co".into(),
            openrouter_api_base: "https://openrouter.ai/api".into(),
            github_api_base: "https://api.github.com".into(),
            netlify_api_base: "https://api.netlify.com".into(),
            vercel_api_base: "https://api.vercel.com".into(),
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            provider_timeout_secs: args.provider_timeout_secs,
            deploy_timeout_secs: args.deploy_timeout_secs,
            groq_api_key: env_opt("GROQ_API_KEY"),
            huggingface_api_key: env_opt("HUGGINGFACE_API_KEY"),
            openrouter_api_key: env_opt("OPENROUTER_API_KEY"),
            github_token: env_opt("GITHUB_PERSONAL_ACCESS_TOKEN"),
            netlify_token: env_opt("NETLIFY_ACCESS_TOKEN"),
            vercel_token: env_opt("VERCEL_ACCESS_TOKEN"),
            ..Self::default()
        }
    }
}
