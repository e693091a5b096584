//! Legal pipeline endpoints.
//!
//! `POST /api/fee_finder`    JSON `{prompt}`
//! `POST /api/case_simulate` multipart `case_description` + optional `files`
//! `POST /api/law_advice`    JSON `{query}`
//! `POST /api/pdf_summary`   multipart `pdf`
//!
//! Model failures never surface as HTTP errors: the body carries the
//! degraded answer with status 200. Only missing input is rejected.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::{CaseAnalysis, FeeEstimate, LawAdvice, PdfSummary};

use super::upload::UploadForm;

#[derive(Deserialize)]
pub struct FeeRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct LawAdviceRequest {
    #[serde(default)]
    pub query: String,
}

fn require_text(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(message.to_string()));
    }
    Ok(())
}

/// `POST /api/fee_finder`
pub async fn fee_finder(
    State(ctx): State<ApiContext>,
    payload: Result<Json<FeeRequest>, JsonRejection>,
) -> Result<Json<FeeEstimate>, ApiError> {
    let Json(request) = payload?;
    require_text(&request.prompt, "No prompt")?;

    let core = ctx.core.clone();
    let result =
        tokio::task::spawn_blocking(move || core.orchestrator().fee_estimate(&request.prompt))
            .await?;
    Ok(Json(result))
}

/// `POST /api/law_advice`
pub async fn law_advice(
    State(ctx): State<ApiContext>,
    payload: Result<Json<LawAdviceRequest>, JsonRejection>,
) -> Result<Json<LawAdvice>, ApiError> {
    let Json(request) = payload?;
    require_text(&request.query, "No query")?;

    let core = ctx.core.clone();
    let result =
        tokio::task::spawn_blocking(move || core.orchestrator().law_advice(&request.query))
            .await?;
    Ok(Json(result))
}

/// `POST /api/case_simulate`. Both parts are optional; an absent file
/// means no extracted text.
pub async fn case_simulate(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<CaseAnalysis>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let description = form.text("case_description").unwrap_or("").to_string();
    let file = form.take_file("files");

    let core = ctx.core.clone();
    let result = tokio::task::spawn_blocking(move || {
        core.orchestrator()
            .analyze_case(&description, file.as_ref().map(|f| f.bytes.as_slice()))
    })
    .await?;
    Ok(Json(result))
}

/// `POST /api/pdf_summary`
pub async fn pdf_summary(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<PdfSummary>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form
        .take_file("pdf")
        .ok_or_else(|| ApiError::BadRequest("No file".into()))?;

    let core = ctx.core.clone();
    let result =
        tokio::task::spawn_blocking(move || core.orchestrator().summarize_pdf(&file.bytes))
            .await?;
    Ok(Json(result))
}
