use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single resolved query, before it is logged
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub query: String,
    pub result: String,
    pub elapsed: Duration,
    pub is_cache_hit: bool,
    /// Position within a demo run
    pub query_number: Option<usize>,
}

impl QueryOutcome {
    pub fn new(
        query: impl Into<String>,
        result: impl Into<String>,
        elapsed: Duration,
        is_cache_hit: bool,
    ) -> Self {
        Self {
            query: query.into(),
            result: result.into(),
            elapsed,
            is_cache_hit,
            query_number: None,
        }
    }

    pub fn with_query_number(mut self, number: usize) -> Self {
        self.query_number = Some(number);
        self
    }
}

/// A logged query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub id: u64,
    pub query: String,
    pub result: String,
    /// Wall-clock seconds spent resolving the query
    pub time: f64,
    pub is_cache_hit: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_number: Option<usize>,
}

impl QueryRecord {
    pub fn from_outcome(id: u64, outcome: QueryOutcome) -> Self {
        Self {
            id,
            query: outcome.query,
            result: outcome.result,
            time: outcome.elapsed.as_secs_f64(),
            is_cache_hit: outcome.is_cache_hit,
            timestamp: Utc::now(),
            query_number: outcome.query_number,
        }
    }
}
