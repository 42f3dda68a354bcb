//! The AI proxy: credential resolution, model discovery, and task dispatch.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::{GenerativeBackend, ModelInfo};
use crate::discovery::select_model;
use crate::error::StylistError;
use crate::normalize::{is_parse_failure, parse_model_json};
use crate::prompt::{build_prompt, hash_prompt};
use crate::task::{AiRequest, AiTask};

/// Routes validated tasks to a [`GenerativeBackend`].
///
/// Stateless between requests: the model is discovered on every call.
#[derive(Clone)]
pub struct Stylist {
    backend: Arc<dyn GenerativeBackend>,
    default_api_key: Option<String>,
}

impl Stylist {
    /// Create a stylist. `default_api_key` is used when a request does not
    /// carry its own.
    pub fn new(backend: Arc<dyn GenerativeBackend>, default_api_key: Option<String>) -> Self {
        let default_api_key = default_api_key.filter(|key| !key.trim().is_empty());
        Self {
            backend,
            default_api_key,
        }
    }

    /// Whether a server-side credential is configured.
    pub fn has_default_key(&self) -> bool {
        self.default_api_key.is_some()
    }

    /// Pick the request's credential, falling back to the server's.
    pub fn resolve_key(&self, override_key: Option<&str>) -> Result<String, StylistError> {
        override_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_api_key.clone())
            .ok_or(StylistError::MissingCredential)
    }

    /// List the models visible to the resolved credential.
    pub async fn list_models(&self, override_key: Option<&str>) -> Result<Vec<ModelInfo>, StylistError> {
        let key = self.resolve_key(override_key)?;
        self.backend.list_models(&key).await
    }

    /// Discover the model to use for `api_key`.
    pub async fn discover_model(&self, api_key: &str) -> Result<String, StylistError> {
        let models = self.backend.list_models(api_key).await?;
        let model = select_model(&models).ok_or(StylistError::NoUsableModel)?;
        debug!(model = %model.id(), available = models.len(), "Selected model");
        Ok(model.id().to_string())
    }

    /// Serve one proxy request end to end.
    ///
    /// The credential is checked first, then the task's fields. Both happen
    /// before any upstream call.
    pub async fn handle(&self, request: AiRequest) -> Result<Value, StylistError> {
        let key = self.resolve_key(request.api_key.as_deref())?;
        let task = request.validate()?;
        self.run(&key, &task).await
    }

    /// Run an already validated task with the given credential.
    pub async fn run(&self, api_key: &str, task: &AiTask) -> Result<Value, StylistError> {
        let model = self.discover_model(api_key).await?;
        let prompt = build_prompt(task);

        debug!(
            task = task.kind().as_str(),
            prompt_hash = %hash_prompt(&prompt),
            has_image = task.image().is_some(),
            "Built prompt"
        );

        let text = self
            .backend
            .generate(api_key, &model, &prompt, task.image())
            .await?;

        let value = parse_model_json(&text);
        if is_parse_failure(&value) {
            warn!(
                task = task.kind().as_str(),
                model = %model,
                chars = text.len(),
                "Model output was not JSON"
            );
        } else {
            info!(
                task = task.kind().as_str(),
                model = %model,
                backend = self.backend.name(),
                "Task completed"
            );
        }

        Ok(value)
    }
}

impl std::fmt::Debug for Stylist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stylist")
            .field("backend", &self.backend.name())
            .field("default_api_key", &self.default_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
