//! Health check endpoint.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    pub ok: bool,
    pub time: String,
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health {
        ok: true,
        time: Utc::now().to_rfc3339(),
    })
}
