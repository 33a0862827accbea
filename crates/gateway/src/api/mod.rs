//! API router and shared handler helpers.

pub mod agent;
pub mod companies;
pub mod health;
pub mod outreach;
pub mod webhook;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use axum::Router;

use hd_domain::error::Error;

use crate::state::AppState;

/// Build the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // ── Agent lifecycle ──────────────────────────────────────────
        .route("/api/v1/agent/start", post(agent::start_agent))
        .route("/api/v1/agent/goal-completed", post(agent::goal_completed))
        .route("/api/v1/agent/status/:session_id", get(agent::session_status))
        .route("/api/v1/agent/sessions", get(agent::list_sessions))
        .route(
            "/api/v1/agent/sessions/:session_id",
            delete(agent::delete_session),
        )
        .route("/api/v1/agent/signed-url", get(agent::signed_url))
        // ── Webhook ingestion & streaming ────────────────────────────
        .route("/api/v1/webhook/ingest", post(webhook::ingest))
        .route("/api/v1/webhook/verify", post(webhook::verify))
        .route("/api/v1/webhook/status", get(webhook::status))
        .route("/api/v1/webhook/stream", get(webhook::stream))
        // ── Outreach dispatch ────────────────────────────────────────
        .route("/api/v1/outreach/select", post(outreach::select))
        .route("/api/v1/outreach/company", post(outreach::dispatch_company))
        .route("/api/v1/outreach/contact", post(outreach::dispatch_contact))
        .route("/api/v1/outreach/config", get(outreach::config))
        // ── Company intel ────────────────────────────────────────────
        .route("/api/v1/companies", get(companies::list_companies))
        .route("/api/v1/companies/search", get(companies::search_companies))
        .route("/api/v1/companies/:name", get(companies::get_company))
        .route("/api/v1/companies/:name", delete(companies::delete_company))
        .with_state(state)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Map a domain error to the client-visible response.
pub(crate) fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::SessionNotFound(_) | Error::RecordNotFound(_) => StatusCode::NOT_FOUND,
        Error::SessionExists(_) => StatusCode::CONFLICT,
        Error::NoContacts(_) => StatusCode::BAD_REQUEST,
        Error::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        Error::UpstreamUnavailable { .. }
        | Error::UpstreamRejected { .. }
        | Error::BotCreation(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let cases = [
            (Error::SessionNotFound("s".into()), StatusCode::NOT_FOUND),
            (Error::RecordNotFound("Acme".into()), StatusCode::NOT_FOUND),
            (Error::SessionExists("s".into()), StatusCode::CONFLICT),
            (Error::NoContacts("Acme".into()), StatusCode::BAD_REQUEST),
            (
                Error::UpstreamTimeout { service: "recall" },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                Error::UpstreamRejected {
                    service: "recall",
                    status: 403,
                    body: String::new(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(error_response(err).status(), expected);
        }
    }
}
