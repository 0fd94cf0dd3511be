//! Outcome and result types for a dispatch run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal classification of one logical request, after retries.
///
/// The batch executor records these without ever inspecting error types;
/// classification happens once, inside the request client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// 2xx/3xx response on some attempt.
    Success,

    /// 4xx response; client errors are not transient and get one attempt.
    PermanentFailure { status: u16 },

    /// Every attempt hit a retryable condition (5xx, connection error,
    /// timeout). Carries the detail of the last attempt.
    TransientFailureExhausted { detail: String },

    /// The task was cancelled before producing an outcome.
    Cancelled,
}

impl RequestOutcome {
    /// Stable label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            RequestOutcome::Success => "success",
            RequestOutcome::PermanentFailure { .. } => "permanent_failure",
            RequestOutcome::TransientFailureExhausted { .. } => "transient_exhausted",
            RequestOutcome::Cancelled => "cancelled",
        }
    }
}

/// Terminal snapshot of a dispatch run, built once from the breaker state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub total_completed: usize,
    pub total_cancelled: usize,
    pub completion_rate: f64,
    pub failure_rate: f64,
    pub circuit_breaker_triggered: bool,
    pub message: String,
    pub random_strings_used: Vec<String>,
}
