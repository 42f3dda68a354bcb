//! Configuration for GeminiBrain.

use std::env;
use std::time::Duration;

use stylist_core::StylistError;

/// Default Gemini API URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for GeminiBrain.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Gemini API URL, without a trailing slash.
    pub api_url: String,

    /// Server-side default API key. Requests may supply their own.
    pub api_key: Option<String>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: f32,

    /// Maximum tokens in a reply.
    pub max_output_tokens: u32,

    /// Optional HTTP timeout. None waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            temperature: 0.4,
            max_output_tokens: 1024,
            timeout: None,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_KEY` - Default API key (requests may supply their own)
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_TEMPERATURE` - Temperature (default: 0.4)
    /// - `GEMINI_MAX_OUTPUT_TOKENS` - Max reply tokens (default: 1024)
    /// - `GEMINI_TIMEOUT_SECS` - HTTP timeout in seconds (default: none)
    ///
    /// Unparsable numbers fall back to their defaults. A temperature outside
    /// 0.0 - 2.0 is a configuration error.
    pub fn from_env() -> Result<Self, StylistError> {
        let defaults = Self::default();

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let api_url = env::var("GEMINI_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let temperature = env::var("GEMINI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(defaults.temperature);

        if !(0.0..=2.0).contains(&temperature) {
            return Err(StylistError::Configuration(format!(
                "GEMINI_TEMPERATURE must be between 0 and 2, got {}",
                temperature
            )));
        }

        let max_output_tokens = env::var("GEMINI_MAX_OUTPUT_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_output_tokens);

        let timeout = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs);

        Ok(Self {
            api_url,
            api_key,
            temperature,
            max_output_tokens,
            timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }
}

/// Builder for GeminiConfig.
#[derive(Debug, Default)]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
    /// Set the default API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = temp;
        self
    }

    /// Set the max output tokens.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = tokens;
        self
    }

    /// Set the HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiConfig {
        self.config
    }
}
