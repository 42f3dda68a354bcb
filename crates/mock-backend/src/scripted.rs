//! Scripted backend - canned model listing and reply.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use stylist_core::{async_trait, GenerativeBackend, InlineImage, ModelInfo, StylistError, GENERATE_METHOD};

/// A generation call as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub api_key: String,
    pub model: String,
    pub prompt: String,
    pub image: Option<InlineImage>,
}

/// A backend that returns whatever it was configured with.
///
/// Counts every call so tests can assert that validation failures never
/// reach the upstream.
#[derive(Debug)]
pub struct ScriptedBackend {
    models: Vec<ModelInfo>,
    reply: String,
    list_error: Option<String>,
    generate_error: Option<String>,
    list_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    last_call: Mutex<Option<Call>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            models: vec![Self::model("models/gemini-2.0-flash", &[GENERATE_METHOD])],
            reply: "{}".to_string(),
            list_error: None,
            generate_error: None,
            list_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }
}

impl ScriptedBackend {
    /// Create a backend listing a single fast-tier model that replies `{}`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model entry.
    pub fn model(name: &str, methods: &[&str]) -> ModelInfo {
        ModelInfo {
            name: name.to_string(),
            display_name: name.trim_start_matches("models/").to_string(),
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Replace the model listing.
    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    /// Set the text returned by every generation.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = reply.into();
        self
    }

    /// Make model listing fail as if the key were rejected.
    pub fn rejecting_keys(mut self, message: impl Into<String>) -> Self {
        self.list_error = Some(message.into());
        self
    }

    /// Make generation fail.
    pub fn failing_generation(mut self, message: impl Into<String>) -> Self {
        self.generate_error = Some(message.into());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// Total upstream calls of either kind.
    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.generate_calls()
    }

    /// The most recent generation call.
    pub fn last_call(&self) -> Option<Call> {
        self.last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn list_models(&self, _api_key: &str) -> Result<Vec<ModelInfo>, StylistError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.list_error {
            Some(message) => Err(StylistError::Authentication(message.clone())),
            None => Ok(self.models.clone()),
        }
    }

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, StylistError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Call {
            api_key: api_key.to_string(),
            model: model.to_string(),
            prompt: prompt.to_string(),
            image: image.cloned(),
        });

        match &self.generate_error {
            Some(message) => Err(StylistError::Upstream(message.clone())),
            None => Ok(self.reply.clone()),
        }
    }

    fn name(&self) -> &str {
        "ScriptedBackend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults() {
        let backend = ScriptedBackend::new();

        let models = backend.list_models("key").await.unwrap();
        assert_eq!(models.len(), 1);
        assert!(models[0].supports_generation());

        let reply = backend.generate("key", "gemini-2.0-flash", "hi", None).await.unwrap();
        assert_eq!(reply, "{}");
        assert_eq!(backend.total_calls(), 2);
    }

    #[tokio::test]
    async fn test_records_last_call() {
        let backend = ScriptedBackend::new();
        let image = InlineImage {
            mime_type: "image/png".to_string(),
            data: "AA==".to_string(),
        };

        backend.generate("k1", "m1", "p1", Some(&image)).await.unwrap();

        let call = backend.last_call().unwrap();
        assert_eq!(call.api_key, "k1");
        assert_eq!(call.model, "m1");
        assert_eq!(call.image, Some(image));
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let backend = ScriptedBackend::new()
            .rejecting_keys("API key not valid")
            .failing_generation("quota exceeded");

        let err = backend.list_models("bad").await.unwrap_err();
        assert!(matches!(err, StylistError::Authentication(msg) if msg.contains("not valid")));

        let err = backend.generate("bad", "m", "p", None).await.unwrap_err();
        assert!(matches!(err, StylistError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_backend_name() {
        assert_eq!(ScriptedBackend::new().name(), "ScriptedBackend");
    }
}
