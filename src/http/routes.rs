use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::analysis::DetectionResponse;
use crate::config::AppConfig;
use crate::error::{DetectionError, ErrorCode};
use crate::service::ClassificationService;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    service: Arc<ClassificationService>,
    languages: Arc<Vec<String>>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl HttpState {
    /// # Arguments
    /// * `service` - Shared classification pipeline
    /// * `languages` - Accepted `language` values
    /// * `max_jobs` - Classifications allowed to run at once
    /// * `timeout` - Upper bound per request, queueing included
    pub fn new(
        service: Arc<ClassificationService>,
        languages: Vec<String>,
        max_jobs: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            languages: Arc::new(languages),
            permits: Arc::new(Semaphore::new(max_jobs.max(1))),
            timeout,
        }
    }

    pub fn from_config(service: Arc<ClassificationService>, config: &AppConfig) -> Self {
        Self::new(
            service,
            config.server.supported_languages.clone(),
            config.server.worker_limit(),
            Duration::from_secs(config.server.request_timeout_secs),
        )
    }
}

/// Body of `POST /detect-voice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectRequest {
    pub audio_base64: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: &'static str,
}

/// HTTP error variants mapped to `{"detail": ...}` responses.
#[derive(Debug)]
pub enum HttpError {
    /// Malformed JSON envelope
    InvalidRequest(String),
    UnsupportedLanguage(String),
    InvalidBase64,
    /// Audio rejected by the engine (decode, duration, silence, voicing)
    Detection(DetectionError),
    Timeout,
    Internal(String),
}

impl From<DetectionError> for HttpError {
    fn from(err: DetectionError) -> Self {
        HttpError::Detection(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::InvalidRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::UnsupportedLanguage(lang) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unsupported language: {}", lang),
            ),
            Self::InvalidBase64 => (
                StatusCode::BAD_REQUEST,
                "Invalid base64 string".to_string(),
            ),
            Self::Detection(err) => (StatusCode::BAD_REQUEST, err.message()),
            Self::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Classification timed out".to_string(),
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

/// Build the Axum router with all handlers.
pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/detect-voice", post(detect_voice))
        .with_state(state)
}

/// Run the HTTP server loop until Ctrl-C.
pub async fn run_http_server(
    addr: SocketAddr,
    service: Arc<ClassificationService>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding HTTP listener on {}", addr))?;
    let state = HttpState::from_config(service, config);
    info!(
        "[HTTP] Listening on {} (workers={}, timeout={}s)",
        addr,
        config.server.worker_limit(),
        config.server.request_timeout_secs
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP router")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("[HTTP] Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
    info!("[HTTP] Shutdown requested");
}

pub async fn root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "Voice Classification API is running",
    })
}

pub async fn detect_voice(
    State(state): State<HttpState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<DetectionResponse>, HttpError> {
    let Json(request) =
        payload.map_err(|rejection| HttpError::InvalidRequest(rejection.body_text()))?;

    if let Some(language) = &request.language {
        if !state.languages.iter().any(|l| l == language) {
            return Err(HttpError::UnsupportedLanguage(language.clone()));
        }
    }

    let audio = STANDARD
        .decode(request.audio_base64.trim())
        .map_err(|_| HttpError::InvalidBase64)?;

    let service = Arc::clone(&state.service);
    let permits = Arc::clone(&state.permits);
    let job = async move {
        let permit = permits
            .acquire_owned()
            .await
            .map_err(|err| HttpError::Internal(err.to_string()))?;
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            service.evaluate(&audio)
        })
        .await
        .map_err(|err| {
            error!("[HTTP] Classification worker failed: {}", err);
            HttpError::Internal("Classification worker failed".to_string())
        })
    };

    let result = tokio::time::timeout(state.timeout, job)
        .await
        .map_err(|_| {
            warn!("[HTTP] Classification exceeded {:?}", state.timeout);
            HttpError::Timeout
        })???;

    Ok(Json(result.to_response()))
}
