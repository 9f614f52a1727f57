use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::deploy::{DeployRequest, Deployer};
use crate::errors::ForgeError;
use crate::pipeline::{self, Pipeline};
use crate::provider;
use crate::wire::GenerateRequest;

pub struct AppState {
    pub config: Config,
}

impl IntoResponse for ForgeError {
    fn into_response(self) -> Response {
        let status = match &self {
            ForgeError::Validation(_) => StatusCode::BAD_REQUEST,
            ForgeError::Configuration(_) | ForgeError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/generate", post(generate_handler))
        .route("/deploy/github", post(deploy_github_handler))
        .route("/deploy/netlify", post(deploy_netlify_handler))
        .route("/deploy/vercel", post(deploy_vercel_handler))
        .route("/diagnostics", get(diagnostics_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState { config });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("siteforge listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ForgeError> {
    // Reject bad input before constructing a provider so a missing prompt
    // reports 400 even when the credential is also missing.
    pipeline::validate(&req)?;

    let provider = provider::make_provider(req.provider, &state.config)?;
    let result = Pipeline::new(provider.as_ref()).generate(&req).await?;
    Ok(Json(result))
}

async fn deploy_github_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeployRequest>,
) -> Result<impl IntoResponse, ForgeError> {
    let out = Deployer::new(&state.config).github(&req).await?;
    Ok(Json(out))
}

async fn deploy_netlify_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeployRequest>,
) -> Result<impl IntoResponse, ForgeError> {
    let out = Deployer::new(&state.config).netlify(&req).await?;
    Ok(Json(out))
}

async fn deploy_vercel_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeployRequest>,
) -> Result<impl IntoResponse, ForgeError> {
    let out = Deployer::new(&state.config).vercel(&req).await?;
    Ok(Json(out))
}

/// Presence booleans only; no secret material leaves the process.
async fn diagnostics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cfg = &state.config;
    Json(json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "checks": {
            "aiProviders": {
                "groq": cfg.groq_api_key.is_some(),
                "huggingface": cfg.huggingface_api_key.is_some(),
                "openrouter": cfg.openrouter_api_key.is_some(),
            },
            "deployTokens": {
                "github": cfg.github_token.is_some(),
                "netlify": cfg.netlify_token.is_some(),
                "vercel": cfg.vercel_token.is_some(),
            },
        },
    }))
}
