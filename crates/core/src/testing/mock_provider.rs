//! Mock search provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::searcher::{ResultRecord, SearchProvider};

/// A recorded provider call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Movie { imdb_id: String },
    Tv {
        imdb_id: String,
        season: u32,
        episode: Option<u32>,
    },
}

/// Mock implementation of the `SearchProvider` trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable results
/// - Report itself as configured or not
/// - Track calls for assertions
/// - Simulate slow providers
#[derive(Debug, Clone)]
pub struct MockProvider {
    name: String,
    configured: bool,
    results: Arc<RwLock<Vec<ResultRecord>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    delay: Duration,
}

impl MockProvider {
    /// Create a configured mock provider with no results.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            configured: true,
            results: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// Create a mock that reports itself as unconfigured.
    pub fn unconfigured(name: &str) -> Self {
        Self {
            configured: false,
            ..Self::new(name)
        }
    }

    /// Set the results returned by every search.
    pub fn with_results(self, results: Vec<ResultRecord>) -> Self {
        Self {
            results: Arc::new(RwLock::new(results)),
            ..self
        }
    }

    /// Delay every search by the given duration.
    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    /// Replace the configured results.
    pub async fn set_results(&self, results: Vec<ResultRecord>) {
        *self.results.write().await = results;
    }

    /// Get all calls made so far.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    async fn respond(&self, call: RecordedCall) -> Vec<ResultRecord> {
        if !self.configured {
            return Vec::new();
        }
        self.calls.write().await.push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.results.read().await.clone()
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn search_movie(&self, imdb_id: &str) -> Vec<ResultRecord> {
        self.respond(RecordedCall::Movie {
            imdb_id: imdb_id.to_string(),
        })
        .await
    }

    async fn search_tv(
        &self,
        imdb_id: &str,
        season: u32,
        episode: Option<u32>,
    ) -> Vec<ResultRecord> {
        self.respond(RecordedCall::Tv {
            imdb_id: imdb_id.to_string(),
            season,
            episode,
        })
        .await
    }
}
