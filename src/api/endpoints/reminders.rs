//! `POST /reminders/save-case-local`: persist a case deadline reminder.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::reminders::NewCaseReminder;

#[derive(Serialize)]
pub struct SavedResponse {
    pub message: &'static str,
}

pub async fn save_case(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewCaseReminder>, JsonRejection>,
) -> Result<Json<SavedResponse>, ApiError> {
    let Json(reminder) = payload?;

    if ctx.core.reminders().is_none() {
        return Err(ApiError::Unavailable("Reminder store not connected".into()));
    }

    let core = ctx.core.clone();
    tokio::task::spawn_blocking(move || match core.reminders() {
        Some(store) => store.save(&reminder).map_err(ApiError::from),
        None => Err(ApiError::Unavailable("Reminder store not connected".into())),
    })
    .await??;

    Ok(Json(SavedResponse { message: "Saved" }))
}
