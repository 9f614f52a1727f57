use clap::Parser;

use siteforge::{cli, config, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let cfg = config::Config::from_env(&args);

    if cfg.groq_api_key.is_none()
        && cfg.huggingface_api_key.is_none()
        && cfg.openrouter_api_key.is_none()
    {
        log::warn!("no provider API key configured; /generate will fail until one is set");
    }

    server::serve(cfg).await
}
