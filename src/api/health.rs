//! Health, readiness and liveness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::api::types::Json;
use serde::Serialize;

use super::state::AppState;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
/// Used for basic liveness probes
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check reporting cache and embedder configuration
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let mut checks = Vec::new();
    let mut overall_status = HealthStatus::Healthy;

    let cache_check = check_semantic_cache(&state).await;

    if cache_check.status != HealthStatus::Healthy {
        overall_status = HealthStatus::Degraded;
    }
    checks.push(cache_check);

    checks.push(HealthCheck {
        name: "embedder".to_string(),
        status: HealthStatus::Healthy,
        message: Some(state.cache_service.embedder_model().to_string()),
        latency_ms: None,
    });

    let history_check = check_history(&state);

    if history_check.status != HealthStatus::Healthy {
        overall_status = HealthStatus::Unhealthy;
    }
    checks.push(history_check);

    let latency = start.elapsed().as_millis() as u64;
    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(latency),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        // A missing cache only costs latency
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
/// Used for Kubernetes liveness probes to detect crashes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_semantic_cache(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let name = "semantic_cache".to_string();

    match state.cache_service.cache_stats().await {
        Ok(Some(stats)) => HealthCheck {
            name,
            status: HealthStatus::Healthy,
            message: Some(format!(
                "{} backend, {} entries",
                state.cache_service.cache_backend().unwrap_or("unknown"),
                stats.total_entries
            )),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
        Ok(None) => HealthCheck {
            name,
            status: HealthStatus::Degraded,
            message: Some("Caching disabled".to_string()),
            latency_ms: None,
        },
        Err(e) => HealthCheck {
            name,
            status: HealthStatus::Degraded,
            message: Some(e.to_string()),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
    }
}

fn check_history(state: &AppState) -> HealthCheck {
    match state.history.len() {
        Ok(len) => HealthCheck {
            name: "history".to_string(),
            status: HealthStatus::Healthy,
            message: Some(format!("{} of {} records", len, state.history.max_records())),
            latency_ms: None,
        },
        Err(e) => HealthCheck {
            name: "history".to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
            latency_ms: None,
        },
    }
}
