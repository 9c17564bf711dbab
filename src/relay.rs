//! HTTP relay forwarding prompts to a hosted inference API.
//!
//! The relay accepts `{prompt, style, aspect_ratio}`, applies the style's
//! prompt phrasing, calls the inference endpoint, and answers with the image
//! base64-encoded as a data URL. Browsers talk to it directly, so CORS is
//! wide open.

use crate::image::StylePreset;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

const DEFAULT_PORT: u16 = 8787;
const DEFAULT_MODEL: &str = "black-forest-labs/FLUX.1-schnell";
const DEFAULT_UPSTREAM: &str = "https://api-inference.huggingface.co/models";

/// Relay settings, resolved from the environment.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Port to listen on.
    pub port: u16,
    /// Bearer token for the inference API.
    pub token: String,
    /// Model identifier forwarded to the inference API.
    pub model: String,
    /// Base URL of the inference API.
    pub upstream: String,
}

impl RelayConfig {
    /// Reads `PORT`, `HUGGING_FACE_ACCESS_TOKEN`, and optional
    /// `RELAY_MODEL` / `RELAY_UPSTREAM` overrides.
    pub fn from_env() -> crate::error::Result<Self> {
        let token = std::env::var("HUGGING_FACE_ACCESS_TOKEN").map_err(|_| {
            crate::error::ForgeError::Validation("HUGGING_FACE_ACCESS_TOKEN not set".into())
        })?;
        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            token,
            model: std::env::var("RELAY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            upstream: std::env::var("RELAY_UPSTREAM").unwrap_or_else(|_| DEFAULT_UPSTREAM.into()),
        })
    }
}

#[derive(Clone)]
struct AppState {
    client: reqwest::Client,
    config: Arc<RelayConfig>,
}

/// Builds the relay router over the given config.
pub fn router(config: RelayConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/generate", post(generate_handler))
        .layer(cors)
        .with_state(AppState {
            client: reqwest::Client::new(),
            config: Arc::new(config),
        })
}

/// Binds and serves until interrupted.
pub async fn serve(config: RelayConfig) -> crate::error::Result<()> {
    let address = format!("0.0.0.0:{}", config.port);
    let app = router(config);

    let listener = TcpListener::bind(&address).await?;
    info!("relay listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("relay shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[derive(Debug, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    style: Option<String>,
    /// Accepted for contract compatibility; the inference API sizes output
    /// by model default.
    #[serde(default)]
    #[allow(dead_code)]
    aspect_ratio: Option<String>,
}

enum RelayError {
    MissingPrompt,
    Upstream { details: String },
    Network(reqwest::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingPrompt => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Prompt is required" })),
            )
                .into_response(),
            Self::Upstream { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate image", "details": details })),
            )
                .into_response(),
            Self::Network(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate image", "details": err.to_string() })),
            )
                .into_response(),
        }
    }
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<impl IntoResponse, RelayError> {
    let prompt = body
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(RelayError::MissingPrompt)?;

    let enhanced = enhance(body.style.as_deref(), prompt);
    info!(prompt = %enhanced, "forwarding generation request");

    let url = format!("{}/{}", state.config.upstream, state.config.model);
    let response = state
        .client
        .post(&url)
        .header("Authorization", format!("Bearer {}", state.config.token))
        .json(&json!({ "inputs": enhanced }))
        .send()
        .await
        .map_err(RelayError::Network)?;

    let status = response.status();
    if !status.is_success() {
        let details = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), details = %details, "inference call failed");
        return Err(RelayError::Upstream { details });
    }

    let bytes = response.bytes().await.map_err(RelayError::Network)?;
    Ok(Json(json!({
        "image": to_data_url(&bytes),
        "prompt": enhanced,
    })))
}

/// Applies the style preset's phrasing when the tag is recognized; unknown
/// tags leave the prompt untouched.
fn enhance(style: Option<&str>, prompt: &str) -> String {
    match style.and_then(|s| s.parse::<StylePreset>().ok()) {
        Some(preset) => preset.apply(prompt),
        None => prompt.to_string(),
    }
}

fn to_data_url(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
