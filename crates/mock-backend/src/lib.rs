//! Mock generative backends for the wardrobe AI proxy.
//!
//! [`ScriptedBackend`] returns a fixed model listing and reply, or a scripted
//! failure, and records every call it receives.
//!
//! For the real upstream, use the `gemini-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_backend::{GenerativeBackend, ScriptedBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_backend::StylistError> {
//!     let backend = ScriptedBackend::new().with_reply(r#"{"ok": true}"#);
//!
//!     let models = backend.list_models("test-key").await?;
//!     let reply = backend.generate("test-key", models[0].id(), "prompt", None).await?;
//!     println!("Reply: {}", reply);
//!     Ok(())
//! }
//! ```

mod scripted;

// Re-export stylist-core types for convenience
pub use stylist_core::{async_trait, GenerativeBackend, InlineImage, ModelInfo, StylistError};

pub use scripted::{Call, ScriptedBackend};
