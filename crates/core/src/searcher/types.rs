//! Types for the normalized search layer.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Title used when a provider reports none.
pub(crate) const UNKNOWN_TITLE: &str = "Unknown";

/// One normalized search hit.
///
/// Every record produced by an adapter carries a non-empty lowercase `hash`;
/// items without one are dropped during parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawRecord")]
pub struct ResultRecord {
    /// Display name as reported by the provider.
    pub title: String,
    /// Total size in bytes, 0 if unknown.
    pub file_size: u64,
    /// Info hash (lowercase hex or provider-native encoding).
    pub hash: String,
    pub rd_available: bool,
    pub ad_available: bool,
    pub tb_available: bool,
    /// File manifest, empty when the provider gives none.
    pub files: Vec<FileEntry>,
    pub no_videos: bool,
    pub median_file_size: u64,
    pub biggest_file_size: u64,
    pub video_count: u32,
    /// The queried IMDb id when the provider echoes it, else empty.
    pub imdb_id: String,
}

impl ResultRecord {
    /// Build a record for a provider that exposes no file manifest.
    ///
    /// Assumes a single video file: median and biggest sizes equal the total,
    /// and all availability flags start out false.
    pub fn single_file(title: impl Into<String>, hash: impl Into<String>, size: u64) -> Self {
        Self {
            title: title.into(),
            file_size: size,
            hash: hash.into(),
            rd_available: false,
            ad_available: false,
            tb_available: false,
            files: Vec::new(),
            no_videos: false,
            median_file_size: size,
            biggest_file_size: size,
            video_count: 1,
            imdb_id: String::new(),
        }
    }
}

/// Wire shape of a record as sent by JSON providers.
///
/// Only `hash` is required. Every other field may be missing or `null`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_size")]
    file_size: Option<u64>,
    hash: String,
    #[serde(default)]
    rd_available: Option<bool>,
    #[serde(default)]
    ad_available: Option<bool>,
    #[serde(default)]
    tb_available: Option<bool>,
    #[serde(default)]
    files: Option<Vec<FileEntry>>,
    #[serde(default)]
    no_videos: Option<bool>,
    #[serde(default, deserialize_with = "lenient_opt_size")]
    median_file_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_opt_size")]
    biggest_file_size: Option<u64>,
    #[serde(default)]
    video_count: Option<u32>,
    #[serde(default)]
    imdb_id: Option<String>,
}

impl From<RawRecord> for ResultRecord {
    fn from(raw: RawRecord) -> Self {
        let file_size = raw.file_size.unwrap_or(0);
        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        Self {
            title,
            file_size,
            hash: raw.hash,
            rd_available: raw.rd_available.unwrap_or(false),
            ad_available: raw.ad_available.unwrap_or(false),
            tb_available: raw.tb_available.unwrap_or(false),
            files: raw.files.unwrap_or_default(),
            no_videos: raw.no_videos.unwrap_or(false),
            // Without per-file data the whole payload counts as one file
            median_file_size: raw.median_file_size.unwrap_or(file_size),
            biggest_file_size: raw.biggest_file_size.unwrap_or(file_size),
            video_count: raw.video_count.unwrap_or(1),
            imdb_id: raw.imdb_id.unwrap_or_default(),
        }
    }
}

/// A file within a torrent, as reported by providers with a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "lenient_size")]
    pub filesize: u64,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept sizes encoded as integers, floats or numeric strings.
///
/// Anything negative or unparseable becomes 0.
fn lenient_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(size_from_value(&value))
}

/// Like `lenient_size`, but keeps `null` distinguishable from 0.
fn lenient_opt_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        other => Some(size_from_value(&other)),
    })
}

fn size_from_value(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Truncate a response body for log messages.
pub(crate) fn body_preview(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}

/// Errors that can occur while talking to a search provider.
///
/// These never cross the public `search_*` boundary: providers log them and
/// return an empty result set instead.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Provider API error: HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse provider response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else if e.is_connect() {
            SearchError::ConnectionFailed(e.to_string())
        } else if e.is_decode() || e.is_body() {
            SearchError::ParseError(e.to_string())
        } else {
            SearchError::Internal(e.to_string())
        }
    }
}

impl SearchError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::NotConfigured(_) => "not_configured",
            SearchError::ConnectionFailed(_) => "connection_failed",
            SearchError::ApiError { .. } => "api_error",
            SearchError::ParseError(_) => "parse_error",
            SearchError::Timeout => "timeout",
            SearchError::Internal(_) => "internal",
        }
    }
}

/// A search provider that produces normalized records.
///
/// Implementations never fail: an unconfigured provider, a transport error
/// or an unusable body all yield an empty vector.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Whether every required endpoint/credential field is set.
    fn is_configured(&self) -> bool;

    /// Search movies by IMDb id (with or without the `tt` prefix).
    async fn search_movie(&self, imdb_id: &str) -> Vec<ResultRecord>;

    /// Search a TV season, optionally narrowed to one episode.
    async fn search_tv(&self, imdb_id: &str, season: u32, episode: Option<u32>)
        -> Vec<ResultRecord>;
}
