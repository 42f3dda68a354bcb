//! Model listing endpoint.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use stylist_core::ModelInfo;

use crate::error::Result;
use crate::state::AppState;

/// Header that overrides the server credential for this call.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Serialize)]
pub struct ModelList {
    pub models: Vec<ModelInfo>,
}

/// List the upstream models visible to the resolved credential.
pub async fn list_models(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<ModelList>> {
    let override_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let models = state.stylist.list_models(override_key).await?;
    Ok(Json(ModelList { models }))
}
