//! Normalized torrent search.
//!
//! This module provides the `SearchProvider` trait, the two provider clients
//! (a proxy-aware JSON search endpoint and Jackett/Torznab), the parsing
//! and hash-extraction layer they share, and an aggregator that fans a
//! query out across providers.

mod aggregate;
mod external;
mod hash;
mod jackett;
mod torznab;
mod types;
mod url_builder;

pub use aggregate::SearchAggregator;
pub use external::{parse_results, ExternalSearchClient};
pub use hash::extract_hash;
pub use jackett::JackettClient;
pub use torznab::parse_torznab;
pub use types::*;
pub use url_builder::{encode_query, ProxyAwareUrlBuilder};
