//! Play Store catalog client: existence probes and search-page scraping.

use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use url::Url;

use crate::config::Config;
use crate::pipeline::CatalogLookup;

/// Fallback regions probed (in order) when a package is missing from the
/// requested region and the caller opted into the global sweep. Major
/// markets across continents.
pub const FALLBACK_REGIONS: [&str; 7] = ["US", "IN", "CN", "BR", "AR", "DE", "ZA"];

/// The store rejects requests without a browser user agent as bot traffic.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

lazy_static! {
    /// Matches detail-page links in search result markup, both the relative
    /// and the absolute form, capturing the package id.
    static ref PACKAGE_LINK_RE: Regex = Regex::new(
        r"(?:/store/apps/details\?id=|https://play\.google\.com/store/apps/details\?id=)([a-zA-Z0-9._]+)"
    )
    .expect("package link regex is valid");
}

/// HTTP client for the Play Store web frontend
///
/// Performs detail-page existence probes and free-text searches. Every call
/// degrades to a negative result on transport errors; nothing here raises for
/// ordinary non-existence.
#[derive(Clone)]
pub struct PlayStoreClient {
    client: Client,
    base_url: String,
}

impl PlayStoreClient {
    /// Creates a client against the catalog endpoint configured in `config`
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.catalog_timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.play_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Probes the detail page for `package_name` and returns the first region
    /// in which it resolves.
    ///
    /// The probe order is the requested region followed, when `use_fallbacks`
    /// is set, by [`FALLBACK_REGIONS`] with duplicates removed. A 404 or any
    /// transport error only rules out the current region; remaining regions
    /// are still tried. `None` means the package resolved nowhere.
    pub async fn verify_package_exists(
        &self,
        package_name: &str,
        region: &str,
        use_fallbacks: bool,
    ) -> Option<String> {
        let mut regions_to_try: Vec<&str> = vec![region];
        if use_fallbacks {
            for fallback in FALLBACK_REGIONS {
                if !regions_to_try.contains(&fallback) {
                    regions_to_try.push(fallback);
                }
            }
        }

        for r in regions_to_try {
            let url = format!(
                "{}/store/apps/details?id={}&gl={}",
                self.base_url, package_name, r
            );
            debug!("Checking {} (region: {})", package_name, r);

            let response = match self
                .client
                .get(&url)
                .header(USER_AGENT, BROWSER_USER_AGENT)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("Probe failed for {} in {}: {}", package_name, r, e);
                    continue;
                }
            };

            match response.status() {
                StatusCode::OK => {
                    info!("{} exists in region {}", package_name, r);
                    return Some(r.to_string());
                }
                StatusCode::NOT_FOUND => {
                    debug!("{} not found in region {}", package_name, r);
                }
                status => {
                    warn!(
                        "Unexpected status {} for {} in region {}",
                        status, package_name, r
                    );
                }
            }
        }

        None
    }

    /// Searches the store for `query` and returns the package ids embedded in
    /// the result page, deduplicated in order of first appearance.
    ///
    /// Transport errors yield an empty list.
    pub async fn search_packages(&self, query: &str, region: &str) -> Vec<String> {
        let url = match Url::parse_with_params(
            &format!("{}/store/search", self.base_url),
            &[("q", query), ("c", "apps"), ("gl", region)],
        ) {
            Ok(url) => url,
            Err(e) => {
                warn!("Could not build search URL for {:?}: {}", query, e);
                return Vec::new();
            }
        };

        let body = match self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
        {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Error reading search results for {:?}: {}", query, e);
                    return Vec::new();
                }
            },
            Err(e) => {
                warn!("Error searching for {:?}: {}", query, e);
                return Vec::new();
            }
        };

        extract_package_ids(&body)
    }

    /// Canonical detail-page URL for a verified package
    pub fn detail_url(&self, package_name: &str, region: &str) -> String {
        format!(
            "{}/store/apps/details?id={}&gl={}",
            self.base_url, package_name, region
        )
    }

    /// Store search URL for a query, used when no package could be verified
    pub fn search_url(&self, query: &str, region: &str) -> String {
        Url::parse_with_params(
            &format!("{}/store/search", self.base_url),
            &[("q", query), ("c", "apps"), ("gl", region)],
        )
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}/store/search?q={}&c=apps&gl={}", self.base_url, query, region))
    }
}

#[async_trait::async_trait]
impl CatalogLookup for PlayStoreClient {
    async fn verify_package_exists(
        &self,
        package_name: &str,
        region: &str,
        use_fallbacks: bool,
    ) -> Option<String> {
        PlayStoreClient::verify_package_exists(self, package_name, region, use_fallbacks).await
    }

    async fn search_packages(&self, query: &str, region: &str) -> Vec<String> {
        PlayStoreClient::search_packages(self, query, region).await
    }

    fn detail_url(&self, package_name: &str, region: &str) -> String {
        PlayStoreClient::detail_url(self, package_name, region)
    }

    fn search_url(&self, query: &str, region: &str) -> String {
        PlayStoreClient::search_url(self, query, region)
    }
}

/// Extracts package ids from detail-page links in an HTML body, preserving
/// first-seen order without duplicates.
pub fn extract_package_ids(body: &str) -> Vec<String> {
    let mut package_names = Vec::new();
    let mut seen = HashSet::new();
    for caps in PACKAGE_LINK_RE.captures_iter(body) {
        let pkg = &caps[1];
        if seen.insert(pkg.to_string()) {
            debug!("Found package name: {}", pkg);
            package_names.push(pkg.to_string());
        }
    }
    package_names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_package_ids_relative_and_absolute() {
        let body = r#"
            <a href="/store/apps/details?id=com.fit.app">FitApp</a>
            <a href="https://play.google.com/store/apps/details?id=com.other.tracker">Other</a>
        "#;
        assert_eq!(
            extract_package_ids(body),
            vec!["com.fit.app".to_string(), "com.other.tracker".to_string()]
        );
    }

    #[test]
    fn test_extract_package_ids_dedup_preserves_order() {
        let body = "/store/apps/details?id=com.b.app \
                    /store/apps/details?id=com.a.app \
                    /store/apps/details?id=com.b.app";
        assert_eq!(
            extract_package_ids(body),
            vec!["com.b.app".to_string(), "com.a.app".to_string()]
        );
    }

    #[test]
    fn test_extract_package_ids_empty_body() {
        assert!(extract_package_ids("<html><body>no apps here</body></html>").is_empty());
    }

    #[test]
    fn test_url_builders() {
        let config = Config::default();
        let client = PlayStoreClient::new(&config);
        assert_eq!(
            client.detail_url("com.fit.app", "DE"),
            "https://play.google.com/store/apps/details?id=com.fit.app&gl=DE"
        );
        let search = client.search_url("FitApp (fitness)", "DE");
        assert!(search.starts_with("https://play.google.com/store/search?"));
        assert!(search.contains("c=apps"));
        assert!(search.contains("gl=DE"));
    }

    #[test]
    fn test_fallback_regions_are_unique() {
        let mut seen = HashSet::new();
        for r in FALLBACK_REGIONS {
            assert!(seen.insert(r), "duplicate fallback region {}", r);
            assert_eq!(r.len(), 2);
        }
    }
}
