//! Webhook ingestion + SSE streaming endpoints.
//!
//! - `POST /api/v1/webhook/ingest` — accept an automation payload
//! - `POST /api/v1/webhook/verify` — setup-time verification ping
//! - `GET  /api/v1/webhook/status` — endpoint readiness descriptor
//! - `GET  /api/v1/webhook/stream` — SSE stream of all bus events

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json};
use futures_util::stream::Stream;
use serde_json::{json, Value};

use crate::runtime::webhook;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/v1/webhook/ingest
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn ingest(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    tracing::info!("received webhook payload");

    let processed = webhook::process(&state.intel, &state.events, payload);

    Json(json!({
        "status": "success",
        "message": "Webhook received successfully",
        "received_data": processed,
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/v1/webhook/verify
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Some automation platforms send a verification request when a webhook
/// destination is configured.
pub async fn verify() -> impl IntoResponse {
    Json(json!({
        "status": "verified",
        "message": "Webhook endpoint is active and ready to receive data",
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/v1/webhook/status
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn status() -> impl IntoResponse {
    Json(json!({
        "status": "active",
        "endpoint": "/api/v1/webhook/ingest",
        "methods": ["POST"],
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/v1/webhook/stream (SSE)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Stream every bus event to the client as `data: <json>`.
///
/// A `: keep-alive` comment is emitted after 30 idle seconds so proxies do
/// not drop the connection. When the client disconnects the stream is
/// dropped, which drops the receiver and unsubscribes it.
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.events.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Ok(json) = serde_json::to_string(&event) {
                        yield Ok(Event::default().data(json));
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE subscriber lagged, oldest events dropped");
                    continue;
                }
                Err(_) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    )
}
