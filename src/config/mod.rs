use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, ScoutError};

/// Default Play Store region when the caller supplies none.
pub const DEFAULT_REGION: &str = "US";

/// Main configuration struct for the service
///
/// Holds the server bind address, the catalog and model-provider endpoints,
/// per-call network timeouts and the static asset directory. Base URLs are
/// overridable so tests can point the clients at a local mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host the HTTP server binds to
    pub host: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// Base URL of the Play Store web frontend
    pub play_base_url: String,
    /// Base URL of the generative model provider API
    pub llm_base_url: String,
    /// Timeout for a single catalog probe or search request
    pub catalog_timeout: Duration,
    /// Timeout for a single model generation request
    pub llm_timeout: Duration,
    /// Directory served under /static
    pub static_dir: PathBuf,
}

impl Config {
    /// Creates a configuration with defaults, honoring environment overrides
    ///
    /// `PLAY_BASE_URL` and `LLM_BASE_URL` redirect the external endpoints;
    /// `PORT` overrides the listen port.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PLAY_BASE_URL") {
            config.play_base_url = url;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm_base_url = url;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ScoutError::Config(format!("invalid PORT value: {}", port)))?;
        }

        Ok(config)
    }

    /// Validates that the configured endpoints are well-formed URLs
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.play_base_url)?;
        url::Url::parse(&self.llm_base_url)?;
        if self.host.trim().is_empty() {
            return Err(ScoutError::Config("bind host is empty".into()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            play_base_url: "https://play.google.com".to_string(),
            llm_base_url: "https://generativelanguage.googleapis.com".to_string(),
            catalog_timeout: Duration::from_secs(10),
            llm_timeout: Duration::from_secs(90),
            static_dir: PathBuf::from("static"),
        }
    }
}
