//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Context strategy resolved at startup: `retrieval` or `truncation`.
    pub retrieval: &'static str,
    pub cloud_vault: bool,
    pub reminders: bool,
}

/// `GET /api/health`
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        retrieval: ctx.core.orchestrator().retrieval_strategy(),
        cloud_vault: ctx.core.vault().has_cloud(),
        reminders: ctx.core.reminders().is_some(),
    })
}
