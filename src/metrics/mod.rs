//! Metrics collection module
//!
//! Tracks answered questions, planned queries, retrieved sources and run
//! times for the hosting surface.

use crate::pipeline::PipelineState;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Run times kept for the rolling average
const RUN_TIME_WINDOW: usize = 100;

/// Process-wide pipeline counters
pub struct Metrics {
    /// Total questions answered
    pub total_questions: AtomicU64,
    planned_queries: AtomicU64,
    sources: AtomicU64,
    skipped_queries: AtomicU64,
    timeouts: AtomicU64,
    /// Last run times in ms
    run_times: Mutex<VecDeque<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            total_questions: AtomicU64::new(0),
            planned_queries: AtomicU64::new(0),
            sources: AtomicU64::new(0),
            skipped_queries: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            run_times: Mutex::new(VecDeque::with_capacity(RUN_TIME_WINDOW)),
        }
    }

    /// Record a completed run
    pub fn record_run(&self, state: &PipelineState, elapsed: Duration) {
        self.total_questions.fetch_add(1, Ordering::Relaxed);
        self.planned_queries
            .fetch_add(state.queries.len() as u64, Ordering::Relaxed);
        self.sources
            .fetch_add(state.queries_results.len() as u64, Ordering::Relaxed);
        self.skipped_queries
            .fetch_add(state.skipped() as u64, Ordering::Relaxed);
        self.record_run_time(elapsed.as_millis() as u64);
    }

    /// Record a run abandoned after the configured timeout
    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    fn record_run_time(&self, time_ms: u64) {
        let mut times = self.run_times.lock().unwrap_or_else(PoisonError::into_inner);
        if times.len() >= RUN_TIME_WINDOW {
            times.pop_front();
        }
        times.push_back(time_ms);
    }

    pub fn get_total_questions(&self) -> u64 {
        self.total_questions.load(Ordering::Relaxed)
    }

    /// Average of the recent run times
    pub fn get_avg_run_time(&self) -> Option<u64> {
        let times = self.run_times.lock().unwrap_or_else(PoisonError::into_inner);
        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            questions: self.get_total_questions(),
            planned_queries: self.planned_queries.load(Ordering::Relaxed),
            sources: self.sources.load(Ordering::Relaxed),
            skipped_queries: self.skipped_queries.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            avg_run_time_ms: self.get_avg_run_time(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view served by `/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub questions: u64,
    pub planned_queries: u64,
    pub sources: u64,
    pub skipped_queries: u64,
    pub timeouts: u64,
    pub avg_run_time_ms: Option<u64>,
}
