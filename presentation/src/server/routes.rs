//! Route handlers

use super::error::ApiError;
use super::state::{AppState, DEFAULT_SESSION};
use andy_application::{WorkflowReply, WorkflowStatus};
use andy_domain::ConversationState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct SessionRequest {
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    #[serde(default)]
    message: String,
    session_id: Option<String>,
}

#[derive(Serialize)]
struct ReplyBody {
    session_id: String,
    #[serde(flatten)]
    reply: WorkflowReply,
}

#[derive(Serialize)]
struct StatusBody {
    session_id: String,
    #[serde(flatten)]
    status: WorkflowStatus,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/start", post(start))
        .route("/api/message", post(message))
        .route("/api/status", get(status))
        .route("/api/reset", post(reset))
        .route("/api/tools", get(tools))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn session_id(id: Option<String>) -> String {
    id.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION.to_string())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn start(
    State(state): State<AppState>,
    body: Option<Json<SessionRequest>>,
) -> Json<ReplyBody> {
    let session_id = session_id(body.and_then(|Json(b)| b.session_id));
    let session = state.session(&session_id);
    let mut conversation = session.lock().await;
    let reply = state.orchestrator().start(&mut conversation);
    Json(ReplyBody { session_id, reply })
}

async fn message(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<ReplyBody>, ApiError> {
    let Json(request) = payload?;
    let text = request.message.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let session_id = session_id(request.session_id);
    debug!(session = %session_id, "Message received");
    let session = state.session(&session_id);
    let mut conversation = session.lock().await;
    let reply = state
        .orchestrator()
        .process_message(&mut conversation, text)
        .await;
    Ok(Json(ReplyBody { session_id, reply }))
}

async fn status(
    State(state): State<AppState>,
    Query(query): Query<SessionRequest>,
) -> Json<StatusBody> {
    let session_id = session_id(query.session_id);
    let status = match state.existing_session(&session_id) {
        Some(session) => {
            let conversation = session.lock().await;
            state.orchestrator().status(&conversation)
        }
        None => state.orchestrator().status(&ConversationState::new()),
    };
    Json(StatusBody { session_id, status })
}

async fn reset(
    State(state): State<AppState>,
    body: Option<Json<SessionRequest>>,
) -> Json<ReplyBody> {
    let session_id = session_id(body.and_then(|Json(b)| b.session_id));
    let reply = match state.remove_session(&session_id) {
        Some(session) => {
            let mut conversation = session.lock().await;
            state.orchestrator().reset(&mut conversation)
        }
        None => state.orchestrator().reset(&mut ConversationState::new()),
    };
    Json(ReplyBody { session_id, reply })
}

async fn tools(State(state): State<AppState>) -> Json<Value> {
    let executor = state.orchestrator().tools();
    let tools: Vec<Value> = executor
        .availability()
        .into_iter()
        .map(|entry| {
            let schema = executor
                .get_tool(entry.tool.as_str())
                .map(|definition| state.schema().tool_to_schema(definition));
            json!({
                "name": entry.tool.as_str(),
                "available": entry.available,
                "reason": entry.reason,
                "schema": schema,
            })
        })
        .collect();
    Json(json!({ "tools": tools }))
}
