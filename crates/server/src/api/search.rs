//! Search API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use mediasearch_core::ResultRecord;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MovieSearchParams {
    pub imdb_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TvSearchParams {
    pub imdb_id: String,
    pub season: u32,
    #[serde(default)]
    pub episode: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub imdb_id: String,
    pub results: Vec<ResultRecord>,
    pub count: usize,
    pub duration_ms: u64,
}

impl SearchResponse {
    fn new(imdb_id: String, results: Vec<ResultRecord>, start: Instant) -> Self {
        Self {
            imdb_id,
            count: results.len(),
            results,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderStatus>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn require_imdb_id(imdb_id: &str) -> Result<String, ApiError> {
    let trimmed = imdb_id.trim();
    if trimmed.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "imdb_id must not be empty".to_string(),
            }),
        ));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/providers
///
/// List registered search providers and whether each is configured.
pub async fn list_providers(State(state): State<Arc<AppState>>) -> Json<ProvidersResponse> {
    let providers = state
        .aggregator()
        .providers()
        .iter()
        .map(|p| ProviderStatus {
            name: p.name().to_string(),
            configured: p.is_configured(),
        })
        .collect();

    Json(ProvidersResponse { providers })
}

/// GET /api/v1/search/movie?imdb_id=
///
/// Aggregated movie search. Provider failures surface as fewer results,
/// never as an error status.
pub async fn search_movie(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MovieSearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let imdb_id = require_imdb_id(&params.imdb_id)?;
    let start = Instant::now();

    let results = state.aggregator().search_movie(&imdb_id).await;
    tracing::info!(imdb_id = %imdb_id, results = results.len(), "Movie search served");

    Ok(Json(SearchResponse::new(imdb_id, results, start)))
}

/// GET /api/v1/search/tv?imdb_id=&season=&episode=
pub async fn search_tv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TvSearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let imdb_id = require_imdb_id(&params.imdb_id)?;
    let start = Instant::now();

    let results = state
        .aggregator()
        .search_tv(&imdb_id, params.season, params.episode)
        .await;
    tracing::info!(
        imdb_id = %imdb_id,
        season = params.season,
        episode = ?params.episode,
        results = results.len(),
        "TV search served"
    );

    Ok(Json(SearchResponse::new(imdb_id, results, start)))
}
