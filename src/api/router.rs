use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::health;
use super::semantic;
use super::state::AppState;
use crate::infrastructure::observability::{PrometheusMetrics, create_metrics_router};

/// Create the full router with application state
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let mut router = Router::new()
        // Probes
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Query, demo and history API
        .nest("/api", semantic::create_semantic_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Metrics endpoint stays outside the trace layer
    if let Some(metrics) = metrics {
        router = router.merge(create_metrics_router(metrics));
    }

    router
}
