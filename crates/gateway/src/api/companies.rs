//! Company intel API endpoints.
//!
//! - `GET    /api/v1/companies`         — list stored records (metadata only)
//! - `GET    /api/v1/companies/search`  — proxy to the lookup provider
//! - `GET    /api/v1/companies/:name`   — fuzzy-matched record
//! - `DELETE /api/v1/companies/:name`   — exact-key delete

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use hd_domain::error::Error;

use crate::api::error_response;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/v1/companies
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn list_companies(State(state): State<AppState>) -> impl IntoResponse {
    let companies = state.intel.list();
    Json(json!({
        "status": "success",
        "total_companies": companies.len(),
        "companies": companies,
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/v1/companies/search?query=…
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

pub async fn search_companies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    match state.lookup.search(&params.query).await {
        Ok(candidates) => Json(json!({
            "status": "success",
            "query": params.query,
            "results": candidates,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "company search failed");
            error_response(e)
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/v1/companies/:name
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_company(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.intel.get(&name) {
        Some((matched, record)) => {
            if matched != name {
                tracing::info!(query = %name, matched = %matched, "fuzzy company match");
            }
            Json(json!({
                "status": "success",
                "company_name": matched,
                "data": record,
            }))
            .into_response()
        }
        None => error_response(Error::RecordNotFound(name)),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DELETE /api/v1/companies/:name
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Exact-key delete only — a fuzzy query must never remove a record it
/// merely resembles.
pub async fn delete_company(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    if state.intel.delete_exact(&name) {
        Json(json!({
            "status": "success",
            "message": format!("company record '{name}' has been deleted"),
        }))
        .into_response()
    } else {
        error_response(Error::RecordNotFound(name))
    }
}
