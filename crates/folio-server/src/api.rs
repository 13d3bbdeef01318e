//! HTTP routes: the chat proxy endpoint and a health probe.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use folio_core::{
    ChatReply, ChatRequest, ErrorBody, build_prompt, extract_text, is_greeting, sanitize,
};
use folio_upstream::{
    Generate, GenerateContentRequest, GenerationConfig, UpstreamClient, UpstreamError,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::config::Config;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared per-process state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// `None` until an API key is configured.
    upstream: Option<Arc<dyn Generate>>,
    generation_config: Option<GenerationConfig>,
    greeting_reply: Arc<str>,
}

impl AppState {
    pub fn new(
        upstream: Option<Arc<dyn Generate>>,
        generation_config: Option<GenerationConfig>,
        greeting_reply: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            upstream,
            generation_config,
            greeting_reply: greeting_reply.into(),
        }
    }

    /// Build state from configuration, creating the upstream client if a key is set.
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let upstream: Option<Arc<dyn Generate>> = match config.api_key() {
            Some(key) => {
                let client = UpstreamClient::new(
                    config.api_url.clone(),
                    key.to_string(),
                    config.key_placement(),
                    config.timeout(),
                )?;
                Some(Arc::new(client) as Arc<dyn Generate>)
            }
            None => {
                warn!("GEMINI_API_KEY not set; chat requests will fail until it is configured");
                None
            }
        };

        Ok(Self::new(
            upstream,
            config.generation_config(),
            config.greeting_reply.as_str(),
        ))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Server not configured with GEMINI_API_KEY")]
    NotConfigured,

    #[error("invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Upstream failures reach the client verbatim.
            Self::Upstream(UpstreamError::Server { status, body }) => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, body).into_response()
            }
            Self::InvalidBody(rejection) => {
                warn!(error = %rejection.body_text(), "rejected chat request body");
                let body = ErrorBody {
                    error: rejection.body_text(),
                };
                (rejection.status(), Json(body)).into_response()
            }
            other => {
                error!(error = %other, "chat request failed");
                let body = ErrorBody {
                    error: other.to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
    upstream_configured: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/gemini", post(chat))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        upstream_configured: state.upstream.is_some(),
    })
}

/// `POST /api/gemini`: answer a portfolio question.
///
/// Bare greetings are answered locally; everything else goes upstream once,
/// and the reply is extracted and sanitised before it is returned. Bodies
/// that fail to decode are answered with `{ "error": ... }` and the
/// rejection's status.
async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(req) = payload?;

    let Some(upstream) = state.upstream.as_deref() else {
        return Err(ApiError::NotConfigured);
    };

    if is_greeting(&req.prompt) {
        debug!("greeting short-circuit");
        return Ok(Json(ChatReply::new(state.greeting_reply.as_ref())));
    }

    let body = GenerateContentRequest::from_prompt(build_prompt(&req), state.generation_config);
    let data = upstream.generate(&body).await?;

    let raw = extract_text(&data);
    let reply = sanitize(&raw);
    debug!(raw_chars = raw.len(), reply_chars = reply.len(), "reply ready");
    Ok(Json(ChatReply::new(reply)))
}
