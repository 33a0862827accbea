//! Outreach API endpoints.
//!
//! - `POST /api/v1/outreach/select`  — forward a company selection
//! - `POST /api/v1/outreach/company` — dispatch outreach to every stored contact
//! - `POST /api/v1/outreach/contact` — dispatch outreach to one named contact
//! - `GET  /api/v1/outreach/config`  — webhook configuration status

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::api::error_response;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/v1/outreach/select
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct SelectBody {
    pub company_name: String,
}

pub async fn select(
    State(state): State<AppState>,
    Json(body): Json<SelectBody>,
) -> impl IntoResponse {
    match state.outreach.select_company(&body.company_name).await {
        Ok(()) => Json(json!({
            "success": true,
            "message": format!("company '{}' forwarded for outreach", body.company_name),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "company selection forward failed");
            error_response(e)
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/v1/outreach/company
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct DispatchBody {
    pub company_name: String,
}

pub async fn dispatch_company(
    State(state): State<AppState>,
    Json(body): Json<DispatchBody>,
) -> impl IntoResponse {
    match state.outreach.dispatch_company(&body.company_name).await {
        Ok(report) => Json(json!({
            "status": "completed",
            "company_name": report.company_name,
            "total_contacts": report.total_contacts,
            "delivered": report.delivered,
            "failed": report.failed,
            "execution_time": report.execution_time,
            "details": report.details,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/v1/outreach/contact
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct ContactBody {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

pub async fn dispatch_contact(
    State(state): State<AppState>,
    Json(body): Json<ContactBody>,
) -> impl IntoResponse {
    let result = state
        .outreach
        .dispatch_contact(
            &body.name,
            &body.role,
            body.email.as_deref(),
            body.phone.as_deref(),
        )
        .await;

    match result {
        Ok((delivered, message)) => Json(json!({
            "status": if delivered { "success" } else { "failed" },
            "target_name": body.name,
            "webhook_sent": delivered,
            "message": message,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/v1/outreach/config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn config(State(state): State<AppState>) -> impl IntoResponse {
    let (select_configured, dispatch_configured) = state.outreach.is_configured();
    Json(json!({
        "select_status": if select_configured { "configured" } else { "not_configured" },
        "dispatch_status": if dispatch_configured { "configured" } else { "not_configured" },
    }))
}
