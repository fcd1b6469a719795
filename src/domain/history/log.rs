//! Bounded in-memory query log

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{QueryOutcome, QueryRecord};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Inner {
    records: VecDeque<QueryRecord>,
    next_id: u64,
}

/// Ordered log of resolved queries, shared by request handlers
///
/// Holds at most `max_records`; the oldest record is dropped when full.
/// Ids restart at 1 after [`clear`](QueryHistory::clear).
#[derive(Debug)]
pub struct QueryHistory {
    inner: Mutex<Inner>,
    max_records: usize,
}

impl QueryHistory {
    pub fn new(max_records: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: VecDeque::new(),
                next_id: 1,
            }),
            max_records: max_records.max(1),
        }
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// Append an outcome and return the stored record
    pub fn record(&self, outcome: QueryOutcome) -> Result<QueryRecord, DomainError> {
        let mut inner = self.lock()?;

        let record = QueryRecord::from_outcome(inner.next_id, outcome);
        inner.next_id += 1;

        if inner.records.len() >= self.max_records {
            inner.records.pop_front();
        }
        inner.records.push_back(record.clone());

        Ok(record)
    }

    /// All records in insertion order
    pub fn all(&self) -> Result<Vec<QueryRecord>, DomainError> {
        let inner = self.lock()?;
        Ok(inner.records.iter().cloned().collect())
    }

    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.records.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        inner.records.clear();
        inner.next_id = 1;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, DomainError> {
        self.inner
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to acquire history lock: {}", e)))
    }
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(1000)
    }
}
