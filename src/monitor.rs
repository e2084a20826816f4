//! Operation Monitor
//!
//! Records hit/miss counts and a rolling average response time per named
//! operation, independent of which cache served the request.
//!
//! What counts as a "hit" is up to the caller: [`OperationMonitor::with_timing`]
//! reports a successful call as a hit and a failed one as a miss.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::trace;

use crate::cache::hit_rate;

static GLOBAL_MONITOR: Lazy<OperationMonitor> = Lazy::new(OperationMonitor::new);

// == Operation Metric ==
/// Running counters for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationMetric {
    pub hits: u64,
    pub misses: u64,
    /// Mean response time in milliseconds over all observations
    pub avg_response_time: f64,
    pub last_used: DateTime<Utc>,
}

impl OperationMetric {
    fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            avg_response_time: 0.0,
            last_used: Utc::now(),
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Folds one observation into the counters and the running mean.
    fn observe(&mut self, hit: bool, response_time_ms: f64) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        let n = self.total_requests() as f64;
        self.avg_response_time = (self.avg_response_time * (n - 1.0) + response_time_ms) / n;
        self.last_used = Utc::now();
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            hit_rate: hit_rate(self.hits, self.misses),
            total_requests: self.total_requests(),
            avg_response_time: self.avg_response_time,
            last_used: self.last_used,
        }
    }
}

// == Metric Snapshot ==
/// Read-only view of one operation's metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub hit_rate: f64,
    pub total_requests: u64,
    /// Milliseconds
    pub avg_response_time: f64,
    pub last_used: DateTime<Utc>,
}

// == Operation Monitor ==
/// Per-operation metrics table.
///
/// Construct one per component or test with [`OperationMonitor::new`], or use
/// the process-wide instance from [`OperationMonitor::global`].
#[derive(Debug, Default)]
pub struct OperationMonitor {
    metrics: Mutex<HashMap<String, OperationMetric>>,
}

impl OperationMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lazily created process-wide monitor.
    pub fn global() -> &'static OperationMonitor {
        &GLOBAL_MONITOR
    }

    // == Record ==
    /// Records one observation of `operation`.
    pub fn record(&self, operation: &str, hit: bool, response_time_ms: f64) {
        let mut metrics = self.metrics.lock();
        metrics
            .entry(operation.to_string())
            .or_insert_with(OperationMetric::new)
            .observe(hit, response_time_ms);
        trace!(operation, hit, response_time_ms, "Recorded operation");
    }

    // == Get Metrics ==
    /// Snapshot of every recorded operation, computed now.
    pub fn get_metrics(&self) -> HashMap<String, MetricSnapshot> {
        self.metrics
            .lock()
            .iter()
            .map(|(name, metric)| (name.clone(), metric.snapshot()))
            .collect()
    }

    /// Snapshot of a single operation, if it was ever recorded.
    pub fn metric(&self, operation: &str) -> Option<MetricSnapshot> {
        self.metrics.lock().get(operation).map(OperationMetric::snapshot)
    }

    // == Reset ==
    /// Forgets every recorded operation.
    pub fn reset(&self) {
        self.metrics.lock().clear();
    }

    // == With Timing ==
    /// Runs `f`, recording its duration as a hit on `Ok` and a miss on `Err`.
    ///
    /// The result is returned unchanged. A panic in `f` is recorded as a miss
    /// and then resumed.
    pub fn with_timing<T, E, F>(&self, operation: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(f));
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(result) => {
                self.record(operation, result.is_ok(), elapsed_ms);
                result
            }
            Err(payload) => {
                self.record(operation, false, elapsed_ms);
                panic::resume_unwind(payload)
            }
        }
    }
}
