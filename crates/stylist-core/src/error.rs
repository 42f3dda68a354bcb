//! Error types for AI proxy requests.

use thiserror::Error;

/// Errors that can occur while serving an AI task.
///
/// Unparsable model output is not an error; see
/// [`crate::parse_model_json`].
#[derive(Debug, Error)]
pub enum StylistError {
    /// No credential from the request or the server.
    #[error("no API key configured: set GEMINI_API_KEY on the server or send apiKey with the request")]
    MissingCredential,

    /// A required per-task field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The upstream rejected the credential while listing models.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The model listing contained nothing that can generate content.
    #[error("no usable model available for this API key")]
    NoUsableModel,

    /// The upstream failed while generating content.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The backend could not be set up.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl StylistError {
    /// Whether the error was detected before any upstream call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            StylistError::MissingCredential
                | StylistError::MissingField(_)
                | StylistError::Configuration(_)
        )
    }
}
