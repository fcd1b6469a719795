//! Query history endpoints

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse};
use crate::domain::history::QueryRecord;

/// GET /api/history
pub async fn list_history(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<QueryRecord>>, ApiError> {
    let records = state.history.all()?;

    Ok(ApiResponse::success(records))
}

/// POST /api/history/clear
pub async fn clear_history(State(state): State<AppState>) -> Result<ApiResponse<()>, ApiError> {
    state.history.clear()?;

    info!("Query history cleared");

    Ok(ApiResponse::message("History cleared"))
}
