//! Picking an upstream model from the live listing.

use crate::backend::ModelInfo;

/// Substring that marks a lightweight, low-latency model.
pub const FAST_TIER_MARKER: &str = "flash";

/// Whether the model's id matches the fast-tier naming convention.
pub fn is_fast_tier(model: &ModelInfo) -> bool {
    model.id().to_ascii_lowercase().contains(FAST_TIER_MARKER)
}

/// Prefer the first fast-tier model that can generate content, otherwise the
/// first model that can generate content at all.
pub fn select_model(models: &[ModelInfo]) -> Option<&ModelInfo> {
    models
        .iter()
        .find(|model| model.supports_generation() && is_fast_tier(model))
        .or_else(|| models.iter().find(|model| model.supports_generation()))
}
