use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use futures_util::TryStreamExt;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::corpus::CorpusStore;
use crate::ollama::{interpretation_request, OllamaClient, OllamaError, INTERPRETER_PROMPT};
use crate::parse::{lookup, FortuneRecord};
use crate::stream::NdjsonText;
use crate::system::FortuneSystem;

#[derive(Clone)]
pub struct AppState {
    pub corpora: Arc<CorpusStore>,
    pub ollama: Arc<OllamaClient>,
}

#[derive(Deserialize)]
pub struct StickQuery {
    pub system: String,
    pub number: u32,
}

#[derive(Deserialize)]
pub struct InterpretRequest {
    pub system: String,
    pub number: u32,
    pub question: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/systems", get(systems))
        .route("/v1/sticks", get(stick))
        .route("/v1/interpret", post(interpret))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn systems() -> impl IntoResponse {
    Json(FortuneSystem::descriptors())
}

async fn stick(
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<StickQuery>,
) -> Result<Json<FortuneRecord>, ApiError> {
    let record = resolve(&state, &params.system, params.number)?;
    Ok(Json(record))
}

async fn interpret(
    State(state): State<AppState>,
    Json(request): Json<InterpretRequest>,
) -> Result<Response, ApiError> {
    if request.question.trim().is_empty() {
        return Err(ApiError::bad_request("question is required"));
    }

    let record = resolve(&state, &request.system, request.number)?;
    let user_message =
        interpretation_request(record.system.info().name, &record, request.question.trim());

    let upstream = state
        .ollama
        .chat_stream(INTERPRETER_PROMPT, &user_message)
        .await?;

    let text = NdjsonText::new(Box::pin(upstream)).map_ok(Bytes::from);
    let response = Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(text))
        .map_err(|_| ApiError::Internal)?;
    Ok(response)
}

/// Shared validation and lookup for both record endpoints: resolve the
/// system id, range-check the number against the system's count, then parse
/// the record out of the loaded corpus.
fn resolve(state: &AppState, system_id: &str, number: u32) -> Result<FortuneRecord, ApiError> {
    let system = FortuneSystem::from_id(system_id)
        .ok_or_else(|| ApiError::bad_request(format!("unknown system: {system_id}")))?;

    let count = system.info().count;
    if number < 1 || number > count {
        return Err(ApiError::bad_request(format!(
            "number must be between 1 and {count}"
        )));
    }

    let corpus = state.corpora.text(system).ok_or(ApiError::Internal)?;
    lookup(system, corpus, number).ok_or_else(|| {
        ApiError::NotFound(format!("no entry for stick {number} in {system_id}"))
    })
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("upstream generation failed: {0}")]
    Upstream(#[from] OllamaError),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::Upstream(err) => {
                warn!("interpretation backend error: {err}");
                (StatusCode::BAD_GATEWAY, "generation backend unavailable").into_response()
            }
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
