use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "siteforge", version, about = "LLM website generator service")]
pub struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Per-call timeout for outbound provider requests
    #[arg(long, default_value_t = 180)]
    pub provider_timeout_secs: u64,

    /// Per-call timeout for deploy-target requests
    #[arg(long, default_value_t = 60)]
    pub deploy_timeout_secs: u64,
}
