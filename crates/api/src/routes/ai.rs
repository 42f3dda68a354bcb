//! The task endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use stylist_core::AiRequest;
use tracing::debug;

use crate::error::Result;
use crate::state::AppState;

/// Run one AI task.
///
/// Returns the model's JSON, or the `{error, raw}` sentinel with 200 when the
/// model replied with something that is not JSON.
pub async fn run_task(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(request) = payload?;
    debug!(task = ?request.task, "Received AI task");

    let value = state.stylist.handle(request).await?;
    Ok(Json(value))
}
