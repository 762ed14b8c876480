use std::sync::Arc;
use mediasearch_core::{Config, MdbListClient, SanitizedConfig, SearchAggregator};

/// Shared application state
pub struct AppState {
    config: Config,
    aggregator: SearchAggregator,
    mdblist: Arc<MdbListClient>,
}

impl AppState {
    pub fn new(config: Config, aggregator: SearchAggregator, mdblist: Arc<MdbListClient>) -> Self {
        Self {
            config,
            aggregator,
            mdblist,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn aggregator(&self) -> &SearchAggregator {
        &self.aggregator
    }

    pub fn mdblist(&self) -> &MdbListClient {
        self.mdblist.as_ref()
    }
}
