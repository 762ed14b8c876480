//! Testing utilities and mock implementations.
//!
//! This module provides a mock `SearchProvider` and fixture builders so that
//! aggregation and API code can be exercised without real indexers.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediasearch_core::testing::{fixtures, MockProvider};
//!
//! let provider = MockProvider::new("jackett")
//!     .with_results(vec![fixtures::record("Some.Movie.2020.1080p", "abc123")]);
//!
//! let results = provider.search_movie("tt0111161").await;
//! assert_eq!(results.len(), 1);
//! assert_eq!(provider.recorded_calls().await.len(), 1);
//! ```

mod mock_provider;
#[cfg(test)]
pub(crate) mod stub_server;

pub use mock_provider::{MockProvider, RecordedCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::searcher::ResultRecord;

    /// Create a single-file record with a 1 GB size.
    pub fn record(title: &str, hash: &str) -> ResultRecord {
        ResultRecord::single_file(title, hash, 1024 * 1024 * 1024)
    }

    /// Render one Torznab `<item>` carrying an explicit infohash attribute.
    pub fn torznab_item(title: &str, hash: &str, size: u64) -> String {
        format!(
            r#"<item>
  <title>{title}</title>
  <guid>http://jackett/dl/{hash}</guid>
  <link>http://jackett/dl/{hash}.torrent</link>
  <size>{size}</size>
  <torznab:attr name="seeders" value="10" />
  <torznab:attr name="peers" value="15" />
  <torznab:attr name="infohash" value="{hash}" />
</item>"#
        )
    }

    /// Render one Torznab `<item>` whose hash lives only in a magnet attribute.
    pub fn torznab_magnet_item(title: &str, hash: &str, size: u64) -> String {
        format!(
            r#"<item>
  <title>{title}</title>
  <size>{size}</size>
  <torznab:attr name="magneturl" value="magnet:?xt=urn:btih:{hash}&amp;dn={title}" />
</item>"#
        )
    }

    /// Wrap items into a Torznab RSS document.
    pub fn torznab_feed(items: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:torznab="http://torznab.com/schemas/2015/feed">
<channel>
<title>AggregateSearch</title>
<description>Jackett aggregate indexer</description>
{}
</channel>
</rss>"#,
            items.join("\n")
        )
    }
}
