use super::AppState;
use crate::chat::{DEFAULT_SESSION, template};
use crate::core::error::RelayError;
use crate::providers::Message;
use crate::providers::catalog::{ModelCatalog, catalog};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Header naming the conversation a request belongs to.
pub const SESSION_HEADER: &str = "x-session-id";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/models", get(models))
        .route("/chat", post(chat))
        .route("/compare", post(compare))
        .route("/export", get(export))
        .route("/clear", post(clear))
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub system_prompt: String,
    #[serde(default)]
    pub variables: HashMap<String, String>,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub message: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default)]
    pub variables: HashMap<String, String>,
    pub providers: Vec<String>,
    pub models: Vec<String>,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub results: Vec<String>,
}

fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}

fn render_prompt(prompt: &str, variables: &HashMap<String, String>) -> String {
    let rendered = template::render(prompt, variables);
    let unresolved = template::unresolved(&rendered);
    if !unresolved.is_empty() {
        tracing::debug!(?unresolved, "System prompt has unresolved placeholders");
    }
    rendered
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "chatrelay"
    }))
}

async fn models() -> Json<ModelCatalog> {
    Json(catalog())
}

/// One exchange: the user turn is recorded before the provider call and
/// stays recorded when that call fails.
async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    let Json(request) = payload.map_err(|e| RelayError::BadRequest(e.body_text()))?;
    let session = session_id(&headers);
    let prompt = render_prompt(&request.system_prompt, &request.variables);

    let shared = state.sessions.get_or_create(&session).await;
    let mut history = shared.lock().await;
    history.append(Message::user(request.message));

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(prompt));
    messages.extend(history.snapshot());

    match state
        .gateway
        .generate(&request.provider, &request.model, &messages)
        .await
    {
        Ok(reply) => {
            history.append(Message::assistant(reply.clone()));
            let sessions = state.sessions.len().await;
            tracing::debug!(
                session = %session,
                provider = %request.provider,
                model = %request.model,
                turns = history.len(),
                sessions = sessions,
                "Chat exchange complete"
            );
            Ok(Json(ChatResponse { message: reply }))
        }
        Err(e) => {
            tracing::error!(
                session = %session,
                provider = %request.provider,
                model = %request.model,
                "Error calling AI API: {}",
                e
            );
            Err(e.into())
        }
    }
}

/// Fan one message out to several models without touching any history.
async fn compare(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>, RelayError> {
    let Json(request) = payload.map_err(|e| RelayError::BadRequest(e.body_text()))?;
    if request.providers.len() != request.models.len() {
        return Err(RelayError::BadRequest(format!(
            "Got {} providers but {} models",
            request.providers.len(),
            request.models.len()
        )));
    }

    let messages = vec![
        Message::system(render_prompt(&request.system_prompt, &request.variables)),
        Message::user(request.message),
    ];
    let targets: Vec<(String, String)> = request
        .providers
        .into_iter()
        .zip(request.models)
        .collect();

    let results = state
        .gateway
        .compare(&targets, &messages)
        .await
        .inspect_err(|e| tracing::error!(?targets, "Error calling AI API: {}", e))?;

    Ok(Json(CompareResponse { results }))
}

async fn export(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, RelayError> {
    let session = session_id(&headers);
    let turns = match state.sessions.get(&session).await {
        Some(shared) => {
            let history = shared.lock().await;
            history.snapshot()
        }
        None => Vec::new(),
    };

    let body = serde_json::to_string_pretty(&turns)?;
    let timestamp = Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=chat_log_{}.json", timestamp),
            ),
        ],
        body,
    ))
}

async fn clear(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let session = session_id(&headers);
    // A request still holding the history must not carry old turns forward.
    if let Some(history) = state.sessions.remove(&session).await {
        history.lock().await.clear();
    }
    tracing::info!(session = %session, "Chat history cleared");

    Json(json!({ "message": "Chat history cleared successfully" }))
}
