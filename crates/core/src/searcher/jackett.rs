//! Jackett (Torznab) search backend.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::JackettConfig;
use crate::metrics;

use super::torznab::parse_torznab;
use super::types::body_preview;
use super::{ResultRecord, SearchError, SearchProvider};

const PROVIDER: &str = "jackett";

/// Aggregate Torznab endpoint covering every indexer configured in Jackett.
const TORZNAB_PATH: &str = "api/v2.0/indexers/all/results/torznab/api";

/// Torznab movie categories (Movies and its sub-categories).
const MOVIE_CATEGORIES: &str = "2000,2010,2020,2030,2040,2045,2050,2060";

/// Torznab TV categories (TV and its sub-categories).
const TV_CATEGORIES: &str = "5000,5010,5020,5030,5040,5045,5050,5060,5070,5080";

/// Jackett search backend implementation.
pub struct JackettClient {
    client: Client,
    config: JackettConfig,
}

impl JackettClient {
    /// Create a new JackettClient with the given configuration.
    pub fn new(config: JackettConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }

    /// Free-text search across all indexers, without a category filter.
    pub async fn search_keyword(&self, query: &str) -> Vec<ResultRecord> {
        if !self.is_configured() {
            return Vec::new();
        }
        self.run("keyword", self.keyword_params(query)).await
    }

    /// Build the Torznab endpoint URL.
    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.url.trim().trim_end_matches('/'),
            TORZNAB_PATH
        )
    }

    fn movie_params(&self, imdb_id: &str) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", self.config.api_key.clone()),
            ("t", "movie".to_string()),
            ("imdbid", bare_imdb_id(imdb_id).to_string()),
            ("cat", MOVIE_CATEGORIES.to_string()),
        ]
    }

    fn tv_params(
        &self,
        imdb_id: &str,
        season: u32,
        episode: Option<u32>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apikey", self.config.api_key.clone()),
            ("t", "tvsearch".to_string()),
            ("imdbid", bare_imdb_id(imdb_id).to_string()),
            ("season", season.to_string()),
            ("cat", TV_CATEGORIES.to_string()),
        ];
        // Episode 0 means "whole season"
        if let Some(ep) = episode.filter(|ep| *ep > 0) {
            params.push(("ep", ep.to_string()));
        }
        params
    }

    fn keyword_params(&self, query: &str) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", self.config.api_key.clone()),
            ("t", "search".to_string()),
            ("q", query.to_string()),
        ]
    }

    async fn run(&self, operation: &str, params: Vec<(&'static str, String)>) -> Vec<ResultRecord> {
        let start = Instant::now();
        match self.fetch(&params).await {
            Ok(xml) => {
                let records = parse_torznab(&xml);
                debug!(
                    provider = PROVIDER,
                    operation = operation,
                    results = records.len(),
                    "Jackett search complete"
                );
                metrics::record_success(PROVIDER, operation, start.elapsed(), records.len());
                records
            }
            Err(e) => {
                warn!(
                    provider = PROVIDER,
                    operation = operation,
                    error = %e,
                    "Jackett search failed"
                );
                metrics::record_failure(PROVIDER, operation, start.elapsed(), e.kind());
                Vec::new()
            }
        }
    }

    async fn fetch(&self, params: &[(&'static str, String)]) -> Result<String, SearchError> {
        debug!(provider = PROVIDER, "Searching Jackett");

        let response = self
            .client
            .get(self.endpoint())
            .query(params)
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

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SearchProvider for JackettClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        !self.config.url.trim().is_empty() && !self.config.api_key.trim().is_empty()
    }

    async fn search_movie(&self, imdb_id: &str) -> Vec<ResultRecord> {
        if !self.is_configured() {
            return Vec::new();
        }
        self.run("movie", self.movie_params(imdb_id)).await
    }

    async fn search_tv(
        &self,
        imdb_id: &str,
        season: u32,
        episode: Option<u32>,
    ) -> Vec<ResultRecord> {
        if !self.is_configured() {
            return Vec::new();
        }
        self.run("tv", self.tv_params(imdb_id, season, episode))
            .await
    }
}

/// Strip the conventional `tt` prefix: Torznab expects a bare integer id.
fn bare_imdb_id(imdb_id: &str) -> &str {
    let trimmed = imdb_id.trim();
    trimmed
        .strip_prefix("tt")
        .or_else(|| trimmed.strip_prefix("TT"))
        .unwrap_or(trimmed)
}
