//! Login stub: a single shared password, no sessions.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub redirect: &'static str,
}

/// `POST /api/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;

    if request.password != ctx.core.config.admin_password {
        tracing::warn!("Rejected login attempt");
        return Err(ApiError::Unauthorized("Invalid Credentials".into()));
    }

    Ok(Json(LoginResponse {
        status: "success",
        redirect: "/",
    }))
}
