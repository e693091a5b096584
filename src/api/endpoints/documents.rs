//! Document locker endpoints.
//!
//! `POST /api/pdf_lock`   multipart `pdf`, stored cloud-first
//! `GET  /api/documents`  cloud listing merged with local PDFs

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::vault::{StoredDocument, VaultReceipt};

use super::upload::UploadForm;

/// `POST /api/pdf_lock`
pub async fn pdf_lock(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<VaultReceipt>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form
        .take_file("pdf")
        .ok_or_else(|| ApiError::BadRequest("No file".into()))?;

    let core = ctx.core.clone();
    let receipt =
        tokio::task::spawn_blocking(move || core.vault().store(&file.filename, &file.bytes))
            .await??;
    Ok(Json(receipt))
}

/// `GET /api/documents`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<StoredDocument>>, ApiError> {
    let core = ctx.core.clone();
    let documents = tokio::task::spawn_blocking(move || core.vault().list()).await??;
    Ok(Json(documents))
}
