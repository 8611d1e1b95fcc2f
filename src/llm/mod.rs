//! Generative model client for market research and package resolution.
//!
//! Talks to the Gemini `generateContent` REST API with the Google-Search tool
//! enabled so the model works from live Play Store pages instead of stale
//! training data. Replies are constrained to JSON but arrive with optional
//! markdown fences that have to be stripped before parsing.

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::{Result, ScoutError};
use crate::pipeline::{AppCandidate, PackageResolver};

/// Client for one model provider account, built per request from the
/// caller-supplied API key and model name
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Options for a single generation call
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Sampling temperature; 0.0 for deterministic intent
    pub temperature: f32,
    /// Whether to enable the provider's web-search tool
    pub search_enabled: bool,
}

impl GeminiClient {
    /// Creates a client for `model` authenticated with `api_key`
    pub fn new(config: &Config, api_key: &str, model: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ScoutError::Validation("API key is empty".into()));
        }
        if model.trim().is_empty() {
            return Err(ScoutError::Validation("model name is empty".into()));
        }

        Ok(Self {
            client: Client::builder()
                .timeout(config.llm_timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Issues one `generateContent` call and returns the reply text
    pub async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let mut payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "temperature": options.temperature
            }
        });
        if options.search_enabled {
            payload["tools"] = json!([{"google_search": {}}]);
        }

        let response = self.client.post(&url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(ScoutError::Llm(format!(
                "generation request failed: HTTP {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let text = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| ScoutError::Llm("reply has no candidate text".into()))?;

        Ok(text.to_string())
    }

    /// Asks the model for the top apps for a topic in a region.
    ///
    /// Best effort: any transport or parse failure is logged and yields an
    /// empty list. Nothing returned here is verified against the store.
    pub async fn market_research(&self, topic: &str, region: &str) -> Vec<AppCandidate> {
        let prompt = format!(
            r#"Act as a Senior Mobile Market Researcher.

Goal: Identify the top downloaded and most relevant Android applications used '{topic}' in '{region}'.

Filtering Criteria:
- Include: Apps specifically designed for {topic} (User Intent).
- Exclude: Generic super-apps, web browsers, or apps that do not primarily serve this function.
- Source: Focus on current Google Play Store rankings and popularity in {region}.
- When resolving the app name, look for the latest name in the Google Play Store, since sometimes it is being changed by the developers.
- Do not guess the package name, use the app name to search the exact package name on the Google Play Store web site.
- Give priority for apps that are popular in {region}.

Output Requirements:
1. Return ONLY a JSON array. Do not write sentences.
2. Do not use markdown formatting.
3. For every single app found, the 'weight' field MUST be set to exactly 1.0. Do not calculate this value; hardcode it.

Required JSON Structure:
[
  {{
    "package": "Exact package name as found on Google Play Store",
    "name": "Exact App Name",
    "weight": 1.0
  }}
]"#
        );

        let text = match self
            .generate(
                &prompt,
                GenerateOptions {
                    temperature: 0.0,
                    search_enabled: true,
                },
            )
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!("Market research generation failed: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(strip_code_fences(&text)) {
            Ok(apps) => apps,
            Err(e) => {
                error!("Could not parse market research reply: {}", e);
                debug!("Offending reply: {}", text);
                Vec::new()
            }
        }
    }

    /// Lists the provider's available model ids
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/v1beta/models?key={}", self.base_url, self.api_key);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ScoutError::Llm(format!(
                "model listing failed: HTTP {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let models = body
            .get("models")
            .and_then(|m| m.as_array())
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m.get("name").and_then(|n| n.as_str()))
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        info!("Provider reports {} models", models.len());
        Ok(models)
    }
}

#[async_trait]
impl PackageResolver for GeminiClient {
    /// Resolves a single app name to a package id via a web-search-augmented
    /// lookup.
    ///
    /// The model is asked for a one-key JSON object; a mapping reply yields
    /// its first value, an unparseable reply falls back to the raw trimmed
    /// text, and any transport failure yields `None`.
    async fn resolve_package_id(&self, app_name: &str) -> Option<String> {
        info!("Asking model to find ID for: {}", app_name);

        let prompt = format!(
            r#"Find the exact Google Play Store Package ID for the Android app "{app_name}".
1. Use Google Search to find the official Play Store URL.
2. Extract the text after 'id='.
3. Return ONLY the package ID string (e.g., com.example.app). Do not write sentences.

Required JSON Structure: {{"{app_name}" : "com.example.app"}}"#
        );

        let text = match self
            .generate(
                &prompt,
                GenerateOptions {
                    temperature: 0.0,
                    search_enabled: true,
                },
            )
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!("Package resolution failed for {:?}: {}", app_name, e);
                return None;
            }
        };

        let cleaned = strip_code_fences(&text).trim().to_string();
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(Value::Object(map)) => map
                .values()
                .next()
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            Ok(_) | Err(_) => Some(cleaned),
        }
    }
}

/// Strips an optional markdown code fence (```json ... ``` or ``` ... ```)
/// from a model reply, returning the inner payload trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let fenced = if let Some(rest) = text.split("```json").nth(1) {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some(rest) = text.split("```").nth(1) {
        rest
    } else {
        text
    };
    fenced.trim()
}
