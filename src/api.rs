//! Request and response types for the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::ResolvedApp;

/// Request payload for a topic search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Topic to research, e.g. "fitness tracking"
    pub topic: String,
    /// Free-form region: country name or 2-letter code
    pub region: String,
    /// Whether to fall back to an AI lookup when the store search fails
    #[serde(default)]
    pub resolve_pkg_with_ai: bool,
    /// Optional category used to qualify store search queries
    #[serde(default)]
    pub category: String,
    /// Provider API key, supplied per request
    pub api_key: String,
    /// Model id to use for generation
    pub model_name: String,
}

/// Response for a topic search
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Verified candidate list, one entry per researcher proposal
    pub data: Vec<ResolvedApp>,
    /// The normalized region the search ran against
    pub region: String,
}

/// Query parameters for a direct package verification
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    /// Package id to probe
    pub package_name: String,
    /// App name used for the search URL when the package is missing
    #[serde(default)]
    pub app_name: String,
}

/// Response for a direct package verification
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// "Verified" or "Not Found"
    pub status: String,
    /// Detail URL when verified, search URL otherwise
    pub play_store_url: String,
}

/// Query parameters for a name-to-package lookup
#[derive(Debug, Deserialize)]
pub struct FindPackageParams {
    /// App name to search the store for
    pub app_name: String,
}

/// Response for a name-to-package lookup
#[derive(Debug, Serialize, Deserialize)]
pub struct FindPackageResponse {
    /// First matching package id, if any
    pub package_id: Option<String>,
}

/// Query parameters for listing provider models
#[derive(Debug, Deserialize)]
pub struct ModelsParams {
    /// Provider API key
    pub api_key: String,
}

/// Response listing the provider's model ids
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Available model ids
    pub models: Vec<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current status
    pub status: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Builds the canonical healthy response
    pub fn ok() -> Self {
        Self {
            service: "playscout".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "ok".to_string(),
            timestamp: Utc::now(),
        }
    }
}
