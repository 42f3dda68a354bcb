//! Wardrobe AI proxy server.

use std::sync::Arc;

use api::{router, AppState, Config};
use gemini_brain::{GeminiBrain, GeminiConfig};
use stylist_core::Stylist;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let gemini = GeminiConfig::from_env()?;

    let default_key = gemini.api_key.clone();
    if default_key.is_none() {
        warn!("GEMINI_API_KEY not set; requests must carry their own apiKey");
    }

    let backend = GeminiBrain::new(gemini)?;
    let stylist = Stylist::new(Arc::new(backend), default_key);
    let state = AppState::new(stylist, config.version.clone());

    let app = router(state);

    info!(addr = %config.addr, environment = %config.version.environment, "Wardrobe API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
