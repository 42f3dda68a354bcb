//! Gemini-backed generative backend.
//!
//! This crate implements [`GenerativeBackend`] over the Gemini REST API:
//!
//! - Model listing (`GET /v1beta/models`) for discovery
//! - Content generation (`POST /v1beta/models/{id}:generateContent`) with an
//!   optional inline image
//! - Configurable via environment variables
//!
//! The API key is supplied per call, so one backend serves both the server's
//! default credential and per-request overrides.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gemini_brain::{GeminiBrain, GeminiConfig};
//! use stylist_core::Stylist;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeminiConfig::from_env()?;
//!     let default_key = config.api_key.clone();
//!     let stylist = Stylist::new(Arc::new(GeminiBrain::new(config)?), default_key);
//!     // Serve requests with the stylist...
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::GeminiBrain;
pub use config::{GeminiConfig, GeminiConfigBuilder};

// Re-export stylist-core types for convenience
pub use stylist_core::{async_trait, GenerativeBackend, InlineImage, ModelInfo, StylistError};
