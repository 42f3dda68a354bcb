//! Application state shared across handlers.

use serde::Serialize;
use stylist_core::Stylist;

/// Build metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub commit: String,
    pub build_id: String,
    pub environment: String,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            name: "wardrobe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: "unknown".to_string(),
            build_id: "local".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// AI task dispatcher.
    pub stylist: Stylist,
    /// Reported by `/api/version`.
    pub version: VersionInfo,
}

impl AppState {
    /// Create new application state.
    pub fn new(stylist: Stylist, version: VersionInfo) -> Self {
        Self { stylist, version }
    }
}
