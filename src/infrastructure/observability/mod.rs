//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    PrometheusMetrics, create_metrics_router, init_metrics, record_cache_lookup,
    record_cache_store_failure, record_generation_attempt, record_generation_retry,
    record_resolve,
};
