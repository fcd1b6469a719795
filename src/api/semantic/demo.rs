//! Caching and similarity demo endpoints

use axum::extract::State;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json};
use crate::infrastructure::services::{CachingDemoReport, SimilarityDemoReport};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CachingDemoRequest {
    /// Falls back to the configured demo query when absent or blank
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimilarityDemoRequest {
    #[serde(default)]
    pub queries: Option<Vec<String>>,
}

/// POST /api/demo/caching
pub async fn caching_demo(
    State(state): State<AppState>,
    Json(request): Json<CachingDemoRequest>,
) -> Result<ApiResponse<CachingDemoReport>, ApiError> {
    let query = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let report = state.demo.caching_demo(query).await?;

    Ok(ApiResponse::success(report))
}

/// POST /api/demo/similarity
pub async fn similarity_demo(
    State(state): State<AppState>,
    Json(request): Json<SimilarityDemoRequest>,
) -> Result<ApiResponse<SimilarityDemoReport>, ApiError> {
    let report = state
        .demo
        .similarity_demo(request.queries.as_deref())
        .await?;

    Ok(ApiResponse::success(report))
}
