#![warn(missing_docs)]
#![warn(clippy::all)]

//! PlayScout - LLM-assisted Google Play market research
//!
//! This library asks a generative model to brainstorm the top Android apps
//! for a topic and region, then verifies every proposed package identifier
//! against the real Play Store, recovering wrong guesses through store
//! search and an optional AI lookup. A separate exporter serializes JSON
//! configuration into compressed, base64-encoded binary artifacts.
//!
//! ## Usage
//! ```rust,ignore
//! use playscout::{Config, GeminiClient, PlayStoreClient, pipeline};
//!
//! async fn example() -> playscout::Result<()> {
//!     let config = Config::default();
//!     let play = PlayStoreClient::new(&config);
//!     let llm = GeminiClient::new(&config, "api-key", "gemini-2.0-flash")?;
//!
//!     let candidates = llm.market_research("fitness tracking", "DE").await;
//!     let results =
//!         pipeline::process_candidates(&play, &llm, candidates, "DE", false, "").await;
//!     println!("{} apps resolved", results.len());
//!     Ok(())
//! }
//! ```

/// HTTP request/response types
pub mod api;
/// Configuration for the service and its external endpoints
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Configuration-to-binary export
pub mod export;
/// Generative model client (research, package resolution, model listing)
pub mod llm;
/// Core package resolution pipeline
pub mod pipeline;
/// Play Store catalog client
pub mod play;
/// Region name normalization
pub mod regions;

// Re-export common types
pub use config::Config;
pub use error::{Result, ScoutError};
pub use llm::GeminiClient;
pub use pipeline::{AppCandidate, CatalogLookup, PackageResolver, ResolvedApp, VerifyStatus};
pub use play::PlayStoreClient;
pub use regions::normalize_region;
