//! HTTP surface of the wardrobe AI proxy.
//!
//! One task endpoint plus health, model listing and version. The router is
//! built from an [`AppState`] so tests can swap in a scripted backend.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, VersionInfo};
