//! Agent lifecycle API endpoints.
//!
//! - `POST   /api/v1/agent/start`                — create a bot and register a session
//! - `POST   /api/v1/agent/goal-completed`       — the agent page signals its goal is done
//! - `GET    /api/v1/agent/status/:session_id`   — full session view
//! - `GET    /api/v1/agent/sessions`             — list all sessions
//! - `DELETE /api/v1/agent/sessions/:session_id` — drop a session from the registry
//! - `GET    /api/v1/agent/signed-url`           — voice-provider websocket auth

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use hd_sessions::Session;

use crate::api::{api_error, error_response};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/v1/agent/start
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct StartAgentBody {
    /// Meeting URL for the agent to join.
    pub meeting_url: String,
}

pub async fn start_agent(
    State(state): State<AppState>,
    Json(body): Json<StartAgentBody>,
) -> impl IntoResponse {
    match state.agent.start(&body.meeting_url).await {
        Ok(started) => Json(json!({
            "session_id": started.session_id,
            "status": started.status,
            "bot_id": started.bot_id,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to start agent");
            error_response(e)
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/v1/agent/goal-completed
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct GoalCompletedBody {
    pub session_id: String,
    /// e.g. "resolved", "escalated", "failed".
    pub outcome: String,
    pub summary: String,
}

pub async fn goal_completed(
    State(state): State<AppState>,
    Json(body): Json<GoalCompletedBody>,
) -> impl IntoResponse {
    match state
        .agent
        .complete_goal(&body.session_id, &body.outcome, &body.summary)
        .await
    {
        Ok(()) => Json(json!({ "acknowledged": true })).into_response(),
        Err(e) => error_response(e),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/v1/agent/status/:session_id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn session_view(state: &AppState, session: &Session) -> serde_json::Value {
    json!({
        "session_id": session.session_id,
        "status": session.status,
        "duration_seconds": state.sessions.duration_seconds(session),
        "bot_id": session.bot_id,
        "meeting_url": session.meeting_url,
        "created_at": session.created_at.to_rfc3339(),
        "updated_at": session.updated_at.to_rfc3339(),
        "outcome": session.outcome,
        "summary": session.summary,
    })
}

pub async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.sessions.get_or_fail(&session_id) {
        Ok(session) => Json(session_view(&state, &session)).into_response(),
        Err(e) => error_response(e),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/v1/agent/sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.sessions.list();
    let views: Vec<_> = sessions.iter().map(|s| session_view(&state, s)).collect();

    Json(json!({
        "total": views.len(),
        "sessions": views,
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DELETE /api/v1/agent/sessions/:session_id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    if state.sessions.delete(&session_id) {
        Json(json!({ "deleted": true })).into_response()
    } else {
        api_error(
            StatusCode::NOT_FOUND,
            format!("session not found: {session_id}"),
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/v1/agent/signed-url
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The agent webpage fetches this to authenticate its websocket to the
/// voice provider (websocket mode works in the bot's headless browser,
/// WebRTC does not).
pub async fn signed_url(State(state): State<AppState>) -> impl IntoResponse {
    match state.voice.signed_url(&state.config.voice.agent_id).await {
        Ok(url) => Json(json!({ "signed_url": url })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to get signed URL");
            error_response(e)
        }
    }
}
