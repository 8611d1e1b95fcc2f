//! Multi-stage package resolution.
//!
//! The researcher's (name, package) guesses are unreliable: packages get
//! renamed, unlisted per region, or hallucinated outright. Each candidate is
//! run through an ordered sequence of recovery strategies — direct existence
//! check, store name search, AI lookup — until one verifies or all are
//! exhausted. The first successful source wins; no candidate is ever dropped
//! from the output.

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// One app proposal from the market researcher, before verification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppCandidate {
    /// Package identifier guessed by the model
    pub package: String,
    /// Display name of the app
    pub name: String,
    /// Relevance score, hardcoded to 1.0 by the researcher prompt
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Final verdict for a candidate after the pipeline ran
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VerifyStatus {
    /// The package was confirmed to resolve on the store
    Verified,
    /// No strategy produced a package that resolves
    #[serde(rename = "Not Found")]
    NotFound,
}

/// A fully resolved candidate: exactly one output per input, in input order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedApp {
    /// Package identifier; may differ from the original guess if a recovery
    /// strategy replaced it
    pub package: String,
    /// Display name, unchanged from the candidate
    pub name: String,
    /// Relevance score, passed through
    pub weight: f64,
    /// Verification outcome
    pub status: VerifyStatus,
    /// Region the package was confirmed in, or the requested region when the
    /// candidate was not found anywhere
    pub region: String,
    /// Detail-page URL when verified, store search URL otherwise
    pub play_store_url: String,
}

/// Catalog operations the pipeline drives: existence probes, name search and
/// the URL forms derived from their results
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Returns the first region in which `package_name` resolves, or `None`
    async fn verify_package_exists(
        &self,
        package_name: &str,
        region: &str,
        use_fallbacks: bool,
    ) -> Option<String>;

    /// Returns package ids for a free-text query, deduplicated in order
    async fn search_packages(&self, query: &str, region: &str) -> Vec<String>;

    /// Detail-page URL for a verified package
    fn detail_url(&self, package_name: &str, region: &str) -> String;

    /// Search URL for a query that could not be verified
    fn search_url(&self, query: &str, region: &str) -> String;
}

/// Last-resort package lookup through the generative model
#[async_trait]
pub trait PackageResolver: Send + Sync {
    /// Resolves an app name to a package id, or `None` on any failure
    async fn resolve_package_id(&self, app_name: &str) -> Option<String>;
}

/// Per-candidate resolution state
///
/// Transition order is fixed: the initial guess beats a search hit beats an
/// AI lookup. The search branch is terminal whether or not its hit verifies;
/// AI retry only runs when the search produced nothing at all.
#[derive(Debug)]
enum ResolutionStep {
    InitialCheck,
    NameSearchRetry,
    AiRetry,
    Resolved {
        status: VerifyStatus,
        working_region: Option<String>,
    },
}

/// Builds the store search query, qualified by category when one is given
fn search_query(name: &str, category: &str) -> String {
    if category.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, category)
    }
}

/// Verifies every candidate against the store, recovering wrong packages
/// through name search and, when enabled, an AI lookup.
///
/// Candidates are processed sequentially in input order and each one appears
/// exactly once in the output. Stage failures never abort the run; a
/// candidate that fails every stage comes back as `NotFound` with a
/// best-effort search URL at the requested region.
pub async fn process_candidates<C, R>(
    catalog: &C,
    resolver: &R,
    raw_apps: Vec<AppCandidate>,
    region: &str,
    resolve_with_ai: bool,
    category: &str,
) -> Vec<ResolvedApp>
where
    C: CatalogLookup,
    R: PackageResolver,
{
    let mut processed = Vec::with_capacity(raw_apps.len());

    for app in raw_apps {
        let mut package = app.package.clone();
        let mut step = ResolutionStep::InitialCheck;

        let (status, working_region) = loop {
            step = match step {
                ResolutionStep::InitialCheck => {
                    info!("Checking: {} - {}", app.name, package);
                    match catalog.verify_package_exists(&package, region, false).await {
                        Some(r) => ResolutionStep::Resolved {
                            status: VerifyStatus::Verified,
                            working_region: Some(r),
                        },
                        None => {
                            debug!("Initial package {} failed, searching", package);
                            ResolutionStep::NameSearchRetry
                        }
                    }
                }
                ResolutionStep::NameSearchRetry => {
                    let query = search_query(&app.name, category);
                    let hits = catalog.search_packages(&query, region).await;
                    if let Some(first) = hits.into_iter().next() {
                        info!("Found via store search: {}", first);
                        package = first;
                        // Terminal either way: a search hit that fails
                        // re-verification does not fall through to AI.
                        match catalog.verify_package_exists(&package, region, false).await {
                            Some(r) => ResolutionStep::Resolved {
                                status: VerifyStatus::Verified,
                                working_region: Some(r),
                            },
                            None => ResolutionStep::Resolved {
                                status: VerifyStatus::NotFound,
                                working_region: None,
                            },
                        }
                    } else if resolve_with_ai {
                        ResolutionStep::AiRetry
                    } else {
                        ResolutionStep::Resolved {
                            status: VerifyStatus::NotFound,
                            working_region: None,
                        }
                    }
                }
                ResolutionStep::AiRetry => match resolver.resolve_package_id(&app.name).await {
                    Some(ai_pkg) => {
                        match catalog.verify_package_exists(&ai_pkg, region, false).await {
                            Some(r) => {
                                info!("Found via AI: {}", ai_pkg);
                                package = ai_pkg;
                                ResolutionStep::Resolved {
                                    status: VerifyStatus::Verified,
                                    working_region: Some(r),
                                }
                            }
                            None => {
                                debug!("Not found via AI: {}", app.name);
                                ResolutionStep::Resolved {
                                    status: VerifyStatus::NotFound,
                                    working_region: None,
                                }
                            }
                        }
                    }
                    None => ResolutionStep::Resolved {
                        status: VerifyStatus::NotFound,
                        working_region: None,
                    },
                },
                ResolutionStep::Resolved {
                    status,
                    working_region,
                } => break (status, working_region),
            };
        };

        let effective_region = working_region.unwrap_or_else(|| region.to_string());
        let play_store_url = match status {
            VerifyStatus::Verified => catalog.detail_url(&package, &effective_region),
            VerifyStatus::NotFound => {
                catalog.search_url(&search_query(&app.name, category), region)
            }
        };

        processed.push(ResolvedApp {
            package,
            name: app.name,
            weight: app.weight,
            status,
            region: effective_region,
            play_store_url,
        });
    }

    processed
}
