//! GeminiBrain implementation using the Gemini REST API.

use reqwest::{Client, Response};
use stylist_core::{async_trait, GenerativeBackend, InlineImage, ModelInfo, StylistError};
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ListModelsResponse,
};
use crate::config::GeminiConfig;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Models requested per listing page.
const PAGE_SIZE: u32 = 1000;

/// Upper bound on listing pages followed.
const MAX_PAGES: usize = 10;

/// A backend that talks to Google's Gemini API.
///
/// Holds no credential state; the key is passed on every call.
pub struct GeminiBrain {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBrain {
    /// Create a new GeminiBrain with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, StylistError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StylistError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            api_url = %config.api_url,
            temperature = config.temperature,
            max_output_tokens = config.max_output_tokens,
            has_default_key = config.api_key.is_some(),
            "GeminiBrain initialized"
        );

        Ok(Self { client, config })
    }

    /// Create a GeminiBrain from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, StylistError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.config.api_url)
    }

    fn generate_url(&self, model: &str) -> String {
        let id = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{}:generateContent", self.config.api_url, id)
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
            response_mime_type: "application/json".to_string(),
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBrain {
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>, StylistError> {
        let url = self.models_url();
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut request = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, api_key)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StylistError::Upstream(format!("Failed to list models: {}", e)))?;

            if !response.status().is_success() {
                let message = error_message(response).await;
                warn!(error = %message, "Model listing rejected");
                return Err(StylistError::Authentication(message));
            }

            let page: ListModelsResponse = response
                .json()
                .await
                .map_err(|e| StylistError::Upstream(format!("Failed to parse model list: {}", e)))?;

            models.extend(page.models);
            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = models.len(), "Listed models");
        Ok(models)
    }

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, StylistError> {
        let url = self.generate_url(model);
        let request = GenerateContentRequest::user(prompt, image, self.generation_config());

        debug!(model, has_image = image.is_some(), "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| StylistError::Upstream(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            warn!(model, error = %message, "Generation failed");
            return Err(StylistError::Upstream(message));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| StylistError::Upstream(format!("Failed to parse response: {}", e)))?;

        if let Some(ref usage) = reply.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                reply_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Token usage"
            );
        }

        match reply.first_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                let reason = reply
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
                    .unwrap_or("none");
                warn!(model, finish_reason = reason, "No text in response");
                Ok(String::new())
            }
        }
    }

    fn name(&self) -> &str {
        "GeminiBrain"
    }
}

/// Pull a readable message out of a failed response.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    describe_error(status.as_u16(), &body)
}

fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => format!("API error ({}): {}", status, api_error.error.message),
        Err(_) if body.trim().is_empty() => format!("API error ({})", status),
        Err(_) => format!("API error ({}): {}", status, body.trim()),
    }
}
