//! Circuit breaker for failure-rate monitoring across a dispatch run.
//!
//! # States
//! - Closed: normal operation, outcomes keep being recorded
//! - Open: failure rate exceeded the threshold, run should stop
//!
//! # State Transitions
//! ```text
//! Closed → Open: total >= min_sample_size AND failure_rate > threshold
//! ```
//! The transition is one-way: once open, the breaker stays open until
//! `reset()` starts a fresh run. Trip side effects (diagnostic event,
//! cleanup hook) fire exactly once.

use std::sync::Arc;

use crate::dispatch::outcome::RunResult;

/// Cleanup collaborator invoked once when the breaker opens. Returns the
/// number of records it discarded. Errors are swallowed and logged, never
/// propagated into the run.
pub type TripHook =
    Arc<dyn Fn() -> Result<usize, Box<dyn std::error::Error + Send + Sync>> + Send + Sync>;

/// One-way failure-rate latch over recorded request outcomes.
pub struct CircuitBreaker {
    failure_threshold: f64,
    min_sample_size: usize,
    successful_requests: usize,
    failed_requests: usize,
    is_open: bool,
    trip_hook: Option<TripHook>,
}

impl CircuitBreaker {
    /// Create a closed breaker. `failure_threshold` is a fraction in
    /// [0, 1]; the breaker never evaluates before `min_sample_size`
    /// outcomes have been recorded.
    pub fn new(failure_threshold: f64, min_sample_size: usize) -> Self {
        Self {
            failure_threshold,
            min_sample_size,
            successful_requests: 0,
            failed_requests: 0,
            is_open: false,
            trip_hook: None,
        }
    }

    /// Attach the cleanup collaborator called once on trip.
    pub fn with_trip_hook(mut self, hook: TripHook) -> Self {
        self.trip_hook = Some(hook);
        self
    }

    /// Record a successful request.
    pub fn record_success(&mut self) {
        self.successful_requests += 1;
    }

    /// Record a failed request. `detail` is advisory, used only for
    /// diagnostics.
    pub fn record_failure(&mut self, detail: Option<&str>) {
        self.failed_requests += 1;
        if let Some(detail) = detail {
            tracing::warn!(detail, "Request failed");
        }
    }

    /// Evaluate the trip rule and return whether the breaker is open.
    ///
    /// Idempotent after the first trip: the diagnostic event and the
    /// cleanup hook run only on the closed→open transition.
    pub fn should_trip(&mut self) -> bool {
        let total = self.total_requests();

        if total < self.min_sample_size {
            return false;
        }

        let failure_rate = self.failure_rate();
        let should_open = failure_rate > self.failure_threshold;

        if should_open && !self.is_open {
            self.is_open = true;
            tracing::error!(
                failure_rate = format!("{:.2}%", failure_rate * 100.0),
                threshold = format!("{:.2}%", self.failure_threshold * 100.0),
                "Circuit breaker triggered"
            );
            crate::observability::metrics::record_breaker_trip();
            self.run_trip_hook();
        }

        should_open
    }

    fn run_trip_hook(&self) {
        let Some(hook) = &self.trip_hook else {
            return;
        };

        match hook() {
            Ok(cleared) => {
                tracing::info!(cleared, "Cleared test bookkeeping after breaker trip");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clear test bookkeeping");
            }
        }
    }

    /// Total number of outcomes recorded so far.
    pub fn total_requests(&self) -> usize {
        self.successful_requests + self.failed_requests
    }

    /// Fraction of recorded outcomes that failed; 0.0 before any outcome.
    pub fn failure_rate(&self) -> f64 {
        let total = self.total_requests();
        if total > 0 {
            self.failed_requests as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Fraction of recorded outcomes that succeeded; 0.0 before any outcome.
    pub fn completion_rate(&self) -> f64 {
        let total = self.total_requests();
        if total > 0 {
            self.successful_requests as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Build the terminal report for a run.
    pub fn snapshot(
        &self,
        total_requested: usize,
        total_cancelled: usize,
        tokens: &[String; 3],
    ) -> RunResult {
        RunResult {
            run_id: uuid::Uuid::new_v4(),
            successful_requests: self.successful_requests,
            failed_requests: self.failed_requests,
            total_completed: self.total_requests(),
            total_cancelled,
            completion_rate: self.completion_rate(),
            failure_rate: self.failure_rate(),
            circuit_breaker_triggered: self.is_open,
            message: self.generate_message(total_requested),
            random_strings_used: tokens.to_vec(),
        }
    }

    fn generate_message(&self, total_requested: usize) -> String {
        if self.is_open {
            format!(
                "Dispatched {} of {} requested synthetic requests (stopped by circuit breaker)",
                self.total_requests(),
                total_requested
            )
        } else {
            format!("Dispatched {} synthetic requests", total_requested)
        }
    }

    /// Zero the counters and close the breaker. Only for starting a fresh
    /// run, never mid-run.
    pub fn reset(&mut self) {
        self.successful_requests = 0;
        self.failed_requests = 0;
        self.is_open = false;
    }
}
