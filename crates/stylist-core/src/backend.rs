//! The seam between the proxy and an upstream generative-AI service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data_url::InlineImage;
use crate::error::StylistError;

/// Method a model must support to be used for tasks.
pub const GENERATE_METHOD: &str = "generateContent";

/// A model advertised by the upstream listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Full resource name, e.g. `models/gemini-2.0-flash`.
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Model id without the `models/` prefix.
    pub fn id(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }

    /// Whether the model can serve content generation.
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|method| method == GENERATE_METHOD)
    }
}

/// Upstream operations the proxy needs.
///
/// Implementations report a failed listing as
/// [`StylistError::Authentication`] and a failed generation as
/// [`StylistError::Upstream`].
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// List the models visible to `api_key`.
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, StylistError>;

    /// Generate content and return the first text part of the reply, or an
    /// empty string if the reply has none.
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, StylistError>;

    /// Name of the backend, for logging.
    fn name(&self) -> &str;
}
