//! Build metadata endpoint.

use axum::extract::State;
use axum::Json;

use crate::state::{AppState, VersionInfo};

pub async fn version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(state.version)
}
