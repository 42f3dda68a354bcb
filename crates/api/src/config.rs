//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use crate::state::VersionInfo;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// Build metadata reported by `/api/version`.
    pub version: VersionInfo,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `APP_COMMIT` | Source commit | `unknown` |
    /// | `APP_BUILD_ID` | Build identifier | `local` |
    /// | `APP_ENV` | Deployment environment | `development` |
    ///
    /// Upstream settings are read separately by `GeminiConfig::from_env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_addr = env::var("API_ADDR").unwrap_or_else(|_| "127.0.0.1:8787".to_string());
        let addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw_addr.clone()))?;

        let defaults = VersionInfo::default();
        let version = VersionInfo {
            commit: non_empty_var("APP_COMMIT").unwrap_or(defaults.commit),
            build_id: non_empty_var("APP_BUILD_ID").unwrap_or(defaults.build_id),
            environment: non_empty_var("APP_ENV").unwrap_or(defaults.environment),
            ..defaults
        };

        Ok(Self { addr, version })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR: {0}")]
    InvalidAddr(String),
}
