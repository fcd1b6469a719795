//! Caching and similarity demonstrations
//!
//! Runs prompts through [`SemanticLlmCacheService`], timing each one and
//! appending the outcome to the shared [`QueryHistory`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::semantic_llm_cache_service::SemanticLlmCacheService;
use crate::domain::history::{QueryHistory, QueryOutcome, QueryRecord};
use crate::domain::DomainError;

/// A speedup above this factor counts as significant
const SIGNIFICANT_SPEEDUP: f64 = 2.0;

/// Demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Query used by the caching demo when none is given
    #[serde(default = "default_caching_query")]
    pub caching_query: String,

    /// Pause between the two caching demo runs, in milliseconds
    #[serde(default = "default_caching_pause_ms")]
    pub caching_pause_ms: u64,

    /// Queries used by the similarity demo when none are given
    #[serde(default = "default_similarity_queries")]
    pub similarity_queries: Vec<String>,

    /// Pause between similarity demo queries, in milliseconds
    #[serde(default = "default_similarity_pause_ms")]
    pub similarity_pause_ms: u64,
}

fn default_caching_query() -> String {
    "What is semantic caching in Redis Cloud?".to_string()
}

fn default_caching_pause_ms() -> u64 {
    1000
}

fn default_similarity_queries() -> Vec<String> {
    vec![
        "How does Redis semantic cache work?".to_string(),
        "What is the mechanism behind Redis semantic caching?".to_string(),
        "Explain Redis semantic caching functionality".to_string(),
    ]
}

fn default_similarity_pause_ms() -> u64 {
    500
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            caching_query: default_caching_query(),
            caching_pause_ms: default_caching_pause_ms(),
            similarity_queries: default_similarity_queries(),
            similarity_pause_ms: default_similarity_pause_ms(),
        }
    }
}

/// Timing comparison of the two caching demo runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub first_time: f64,
    pub second_time: f64,
    pub speedup: f64,
    pub time_saved: f64,
    pub significant_speedup: bool,
}

impl PerformanceSummary {
    pub fn compare(first_time: f64, second_time: f64) -> Self {
        let speedup = if second_time > 0.0 {
            first_time / second_time
        } else {
            0.0
        };

        Self {
            first_time,
            second_time,
            speedup,
            time_saved: first_time - second_time,
            significant_speedup: speedup > SIGNIFICANT_SPEEDUP,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CachingDemoReport {
    pub results: Vec<QueryRecord>,
    pub performance: PerformanceSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityDemoReport {
    pub results: Vec<QueryRecord>,
    pub total_queries: usize,
}

/// Runs queries against the cache service and records them in the history
#[derive(Debug)]
pub struct DemoRunner {
    service: Arc<SemanticLlmCacheService>,
    history: Arc<QueryHistory>,
    config: DemoConfig,
}

impl DemoRunner {
    pub fn new(
        service: Arc<SemanticLlmCacheService>,
        history: Arc<QueryHistory>,
        config: DemoConfig,
    ) -> Self {
        Self {
            service,
            history,
            config,
        }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Resolve one query, time it and log it
    pub async fn run_query(
        &self,
        query: &str,
        query_number: Option<usize>,
    ) -> Result<QueryRecord, DomainError> {
        let started = Instant::now();
        let resolution = self.service.resolve(query).await?;
        let elapsed = started.elapsed();

        let mut outcome =
            QueryOutcome::new(query, resolution.response, elapsed, resolution.cache_hit);
        if let Some(number) = query_number {
            outcome = outcome.with_query_number(number);
        }

        self.history.record(outcome)
    }

    /// Run the same query twice and compare timings
    pub async fn caching_demo(
        &self,
        query: Option<&str>,
    ) -> Result<CachingDemoReport, DomainError> {
        let query = query.unwrap_or(&self.config.caching_query);

        info!("Running caching demo for: {}", query);

        let first = self.run_query(query, Some(1)).await?;
        tokio::time::sleep(Duration::from_millis(self.config.caching_pause_ms)).await;
        let second = self.run_query(query, Some(2)).await?;

        let performance = PerformanceSummary::compare(first.time, second.time);

        info!(
            first_time = first.time,
            second_time = second.time,
            speedup = performance.speedup,
            "Caching demo finished"
        );

        Ok(CachingDemoReport {
            results: vec![first, second],
            performance,
        })
    }

    /// Run a list of related queries in order
    pub async fn similarity_demo(
        &self,
        queries: Option<&[String]>,
    ) -> Result<SimilarityDemoReport, DomainError> {
        let queries = queries.unwrap_or(&self.config.similarity_queries);

        if queries.is_empty() {
            return Err(DomainError::validation("Queries must be a non-empty list"));
        }

        info!(total = queries.len(), "Running similarity demo");

        let mut results = Vec::with_capacity(queries.len());

        for (i, query) in queries.iter().enumerate() {
            results.push(self.run_query(query, Some(i + 1)).await?);

            if i + 1 < queries.len() {
                tokio::time::sleep(Duration::from_millis(self.config.similarity_pause_ms)).await;
            }
        }

        Ok(SimilarityDemoReport {
            total_queries: results.len(),
            results,
        })
    }
}
