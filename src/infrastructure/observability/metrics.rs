//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("semantic_llm_cache_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path().to_string();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record the outcome of a cache check: `hit`, `miss` or `error`
pub fn record_cache_lookup(backend: &'static str, outcome: &'static str) {
    counter!(
        "semantic_cache_lookups_total",
        "backend" => backend,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a store that was rejected or failed
pub fn record_cache_store_failure(backend: &'static str, reason: &'static str) {
    counter!(
        "semantic_cache_store_failures_total",
        "backend" => backend,
        "reason" => reason
    )
    .increment(1);
}

/// Record one call to the generation backend; `outcome` is `success` or an error kind
pub fn record_generation_attempt(outcome: &'static str) {
    counter!("generation_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_generation_retry(delay: Duration) {
    counter!("generation_retries_total").increment(1);
    histogram!("generation_backoff_seconds").record(delay.as_secs_f64());
}

/// Record a completed resolve
pub fn record_resolve(duration: Duration, cache_hit: bool, degraded: bool) {
    let source = match (cache_hit, degraded) {
        (true, _) => "cache",
        (false, false) => "generated",
        (false, true) => "placeholder",
    };

    counter!("resolve_requests_total", "source" => source).increment(1);
    histogram!("resolve_duration_seconds", "source" => source).record(duration.as_secs_f64());
}
