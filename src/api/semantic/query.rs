//! Single query endpoint

use axum::extract::State;
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json};
use crate::domain::history::QueryRecord;
use crate::domain::llm::prompt_preview;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

/// POST /api/query
pub async fn run_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<ApiResponse<QueryRecord>, ApiError> {
    let query = request.query.trim();

    if query.is_empty() {
        return Err(ApiError::bad_request("Query cannot be empty"));
    }

    debug!("Resolving query: {}", prompt_preview(query));

    let record = state.demo.run_query(query, None).await?;

    Ok(ApiResponse::success(record))
}
