//! MDBList API client.
//!
//! Every call authenticates with an `apikey` query parameter. Without a key
//! the client answers locally with `{}` for lookups and `[]` for list calls.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::ListProviderError;
use crate::config::MdbListConfig;

/// MDBList API client.
pub struct MdbListClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MdbListClient {
    /// Create a new MDBList client.
    pub fn new(config: MdbListConfig) -> Result<Self, ListProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
        })
    }

    /// Whether an API key is set.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Search movies and shows by keyword.
    pub async fn search(
        &self,
        keyword: &str,
        year: Option<u32>,
        media_type: Option<&str>,
    ) -> Result<Value, ListProviderError> {
        if !self.is_configured() {
            return Ok(json!({}));
        }

        let mut params = vec![("s", keyword.to_string())];
        if let Some(y) = year {
            params.push(("y", y.to_string()));
        }
        if let Some(m) = media_type.filter(|m| !m.is_empty()) {
            params.push(("m", m.to_string()));
        }

        self.get("", &params).await
    }

    /// Get info for a movie or show by IMDb id.
    pub async fn get_info_by_imdb_id(&self, imdb_id: &str) -> Result<Value, ListProviderError> {
        if !self.is_configured() {
            return Ok(json!({}));
        }
        self.get("", &[("i", imdb_id.to_string())]).await
    }

    /// Get info for a movie or show by TMDB id.
    pub async fn get_info_by_tmdb_id(&self, tmdb_id: &str) -> Result<Value, ListProviderError> {
        if !self.is_configured() {
            return Ok(json!({}));
        }
        self.get("", &[("tm", tmdb_id.to_string())]).await
    }

    /// Search user lists by term.
    pub async fn search_lists(&self, term: &str) -> Result<Value, ListProviderError> {
        if !self.is_configured() {
            return Ok(json!([]));
        }
        self.get("/lists/search", &[("s", term.to_string())]).await
    }

    /// Get the items of one list.
    pub async fn get_list_items(&self, list_id: &str) -> Result<Value, ListProviderError> {
        if !self.is_configured() {
            return Ok(json!([]));
        }
        let path = format!("/lists/{}/items", urlencoding::encode(list_id));
        self.get(&path, &[]).await
    }

    /// Get the most popular lists.
    pub async fn get_top_lists(&self) -> Result<Value, ListProviderError> {
        if !self.is_configured() {
            return Ok(json!([]));
        }
        self.get("/lists/top", &[]).await
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ListProviderError> {
        let url = format!("{}{}", self.base_url, path);

        debug!("MDBList request: path='{}'", path);

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ListProviderError::ParseError(format!("Invalid MDBList response: {}", e)))
    }
}
