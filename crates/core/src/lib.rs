pub mod config;
pub mod external_catalog;
pub mod metrics;
pub mod searcher;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, ExternalSearchConfig, JackettConfig, MdbListConfig, ProxyMode, SanitizedConfig,
    ServerConfig,
};
pub use external_catalog::{ListProviderError, MdbListClient};
pub use searcher::{
    extract_hash, parse_torznab, ExternalSearchClient, JackettClient, ProxyAwareUrlBuilder,
    ResultRecord, SearchAggregator, SearchError, SearchProvider,
};
