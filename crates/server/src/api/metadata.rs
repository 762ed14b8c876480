//! List/metadata provider pass-through.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::warn;

use super::search::ErrorResponse;
use crate::state::AppState;

/// GET /api/v1/metadata/imdb/{id}
///
/// Returns the provider's JSON as-is, or `{}` when no API key is configured.
pub async fn get_by_imdb_id(
    State(state): State<Arc<AppState>>,
    Path(imdb_id): Path<String>,
) -> Result<Json<Value>, impl IntoResponse> {
    match state.mdblist().get_info_by_imdb_id(&imdb_id).await {
        Ok(info) => Ok(Json(info)),
        Err(e) => {
            warn!(imdb_id = %imdb_id, error = %e, "Metadata lookup failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
