//! Request routing for the wardrobe AI proxy.
//!
//! This crate holds everything between an incoming task request and the
//! upstream generative-AI service:
//!
//! - [`AiRequest`] / [`AiTask`] - The request body and its validated form
//! - [`build_prompt`] - Per-task instructions demanding strict JSON
//! - [`select_model`] - Model discovery from the live listing
//! - [`parse_model_json`] - Two-stage normalization with a sentinel on failure
//! - [`GenerativeBackend`] - The trait upstream clients implement
//! - [`Stylist`] - Ties the above together
//!
//! # Example
//!
//! ```rust
//! use stylist_core::{async_trait, GenerativeBackend, InlineImage, ModelInfo, StylistError};
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl GenerativeBackend for Canned {
//!     async fn list_models(&self, _api_key: &str) -> Result<Vec<ModelInfo>, StylistError> {
//!         Ok(vec![ModelInfo {
//!             name: "models/tiny-flash".to_string(),
//!             display_name: "Tiny Flash".to_string(),
//!             supported_generation_methods: vec!["generateContent".to_string()],
//!         }])
//!     }
//!
//!     async fn generate(
//!         &self,
//!         _api_key: &str,
//!         _model: &str,
//!         _prompt: &str,
//!         _image: Option<&InlineImage>,
//!     ) -> Result<String, StylistError> {
//!         Ok(r#"{"tags": [], "do": [], "dont": []}"#.to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Canned"
//!     }
//! }
//! ```

mod backend;
mod data_url;
mod discovery;
mod error;
mod normalize;
mod prompt;
mod stylist;
mod task;

pub use backend::{GenerativeBackend, ModelInfo, GENERATE_METHOD};
pub use data_url::{parse_data_url, InlineImage, DEFAULT_MIME_TYPE};
pub use discovery::{is_fast_tier, select_model, FAST_TIER_MARKER};
pub use error::StylistError;
pub use normalize::{is_parse_failure, parse_model_json, PARSE_FAILURE};
pub use prompt::{build_prompt, hash_prompt};
pub use stylist::Stylist;
pub use task::{AiRequest, AiTask, ClosetEntry, SelectedItem, TaskKind};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
