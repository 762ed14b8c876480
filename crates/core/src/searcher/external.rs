//! Generic JSON search endpoint, reachable directly or through a forwarding proxy.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::ExternalSearchConfig;
use crate::metrics;

use super::hash::extract_hash;
use super::types::body_preview;
use super::url_builder::ProxyAwareUrlBuilder;
use super::{ResultRecord, SearchError, SearchProvider};

const PROVIDER: &str = "external_search";
const MOVIE_PATH: &str = "api/torrents/movie";
const TV_PATH: &str = "api/torrents/tv";
const PREVIEW_CHARS: usize = 500;

/// Client for a search service answering `{ "results": [...] }`.
pub struct ExternalSearchClient {
    client: Client,
    config: ExternalSearchConfig,
    urls: ProxyAwareUrlBuilder,
}

impl ExternalSearchClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ExternalSearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;
        let urls = ProxyAwareUrlBuilder::new(config.base_url.as_str(), config.proxy_mode);

        Ok(Self {
            client,
            config,
            urls,
        })
    }

    /// Search `path` on the configured endpoint with the given parameters.
    ///
    /// Returns an empty vector without any network call when no base URL is
    /// configured, and on any transport or decoding failure.
    pub async fn search(&self, path: &str, params: &[(&str, String)]) -> Vec<ResultRecord> {
        self.run("search", path, params).await
    }

    async fn run(
        &self,
        operation: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Vec<ResultRecord> {
        if !self.is_configured() {
            return Vec::new();
        }

        let start = Instant::now();
        match self.fetch(path, params).await {
            Ok(records) => {
                debug!(
                    provider = PROVIDER,
                    path = path,
                    results = records.len(),
                    "External search complete"
                );
                metrics::record_success(PROVIDER, operation, start.elapsed(), records.len());
                records
            }
            Err(e) => {
                warn!(provider = PROVIDER, path = path, error = %e, "External search failed");
                metrics::record_failure(PROVIDER, operation, start.elapsed(), e.kind());
                Vec::new()
            }
        }
    }

    async fn fetch(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<ResultRecord>, SearchError> {
        let url = self.urls.build(path, params);
        debug!(provider = PROVIDER, url = %url, "Requesting external search");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: body_preview(&body, 200),
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            SearchError::ParseError(format!(
                "{} (body: {})",
                e,
                body_preview(&body, PREVIEW_CHARS)
            ))
        })?;

        Ok(parse_results(&value))
    }
}

/// Extract normalized records from a decoded `{ "results": [...] }` body.
///
/// A body of any other shape yields no records and a warning. Entries that
/// do not decode or carry no hash are skipped one by one; hashes are
/// lowercased.
pub fn parse_results(body: &Value) -> Vec<ResultRecord> {
    let entries = match body.get("results").and_then(Value::as_array) {
        Some(entries) => entries,
        None => {
            warn!(
                provider = PROVIDER,
                preview = %body_preview(&body.to_string(), PREVIEW_CHARS),
                "Response has no 'results' array"
            );
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<ResultRecord>(entry.clone()) {
            Ok(mut record) => {
                let hash = extract_hash(None, Some(&record.hash))?;
                record.hash = hash;
                Some(record)
            }
            Err(e) => {
                debug!(provider = PROVIDER, error = %e, "Skipping undecodable result entry");
                None
            }
        })
        .collect()
}

#[async_trait]
impl SearchProvider for ExternalSearchClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        !self.config.base_url.trim().is_empty()
    }

    async fn search_movie(&self, imdb_id: &str) -> Vec<ResultRecord> {
        self.run("movie", MOVIE_PATH, &[("imdbId", imdb_id.to_string())])
            .await
    }

    /// The endpoint answers per season; episode filtering happens downstream.
    async fn search_tv(
        &self,
        imdb_id: &str,
        season: u32,
        _episode: Option<u32>,
    ) -> Vec<ResultRecord> {
        self.run(
            "tv",
            TV_PATH,
            &[
                ("imdbId", imdb_id.to_string()),
                ("seasonNum", season.to_string()),
            ],
        )
        .await
    }
}
