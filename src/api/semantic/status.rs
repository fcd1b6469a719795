//! Backend status endpoint

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::Json;
use crate::domain::llm::StatusReport;

/// GET /api/status
///
/// Returns the report itself rather than an envelope; its own `status`
/// field carries the classification.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusReport> {
    let report = state.cache_service.status().await;

    debug!(status = report.status.as_str(), "Status check completed");

    Json(report)
}
