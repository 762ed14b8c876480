//! Fan-out of one logical query to every configured provider.

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::{ResultRecord, SearchProvider};

/// Queries every configured provider concurrently and concatenates results.
///
/// Results keep provider registration order, then each provider's own order.
/// No deduplication or ranking happens here.
#[derive(Clone, Default)]
pub struct SearchAggregator {
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl SearchAggregator {
    /// Create an aggregator over the given providers.
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        Self { providers }
    }

    /// All registered providers, configured or not.
    pub fn providers(&self) -> &[Arc<dyn SearchProvider>] {
        &self.providers
    }

    fn configured(&self) -> Vec<&Arc<dyn SearchProvider>> {
        self.providers.iter().filter(|p| p.is_configured()).collect()
    }

    /// Search movies on every configured provider.
    pub async fn search_movie(&self, imdb_id: &str) -> Vec<ResultRecord> {
        let start = Instant::now();
        let futures = self
            .configured()
            .into_iter()
            .map(|provider| provider.search_movie(imdb_id));
        let results = futures::future::join_all(futures).await;

        let records: Vec<_> = results.into_iter().flatten().collect();
        debug!(
            imdb_id = imdb_id,
            results = records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Aggregated movie search complete"
        );
        records
    }

    /// Search a TV season (or episode) on every configured provider.
    pub async fn search_tv(
        &self,
        imdb_id: &str,
        season: u32,
        episode: Option<u32>,
    ) -> Vec<ResultRecord> {
        let start = Instant::now();
        let futures = self
            .configured()
            .into_iter()
            .map(|provider| provider.search_tv(imdb_id, season, episode));
        let results = futures::future::join_all(futures).await;

        let records: Vec<_> = results.into_iter().flatten().collect();
        debug!(
            imdb_id = imdb_id,
            season = season,
            episode = ?episode,
            results = records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Aggregated TV search complete"
        );
        records
    }
}
