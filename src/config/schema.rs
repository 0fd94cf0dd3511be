//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! harness. All types derive Serde traits for deserialization from config
//! files, and every field has a default so a minimal config is valid.

use serde::{Deserialize, Serialize};

/// Upper bound on any single backoff wait between retry attempts.
pub const BACKOFF_CAP_MS: u64 = 8_000;

/// Root configuration for the load harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Listener configuration for the counter API.
    pub listener: ListenerConfig,

    /// Synthetic dispatch settings.
    pub dispatch: DispatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Server-side request timeout in seconds. Generous because a
    /// `/test/{n}/` run can legitimately take a while under backoff.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Settings for one synthetic load run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Target base address requests are fired at.
    pub base_url: String,

    /// Maximum simultaneously in-flight requests.
    pub max_concurrent_requests: usize,

    /// Failure-rate fraction in [0, 1] above which the breaker opens.
    pub failure_threshold: f64,

    /// Minimum recorded outcomes before the breaker may trip. Batches are
    /// sized to this value on purpose: every breaker evaluation then sees
    /// a full statistical window.
    pub min_sample_size: usize,

    /// Total attempts per request, counting the first try.
    pub max_retry_attempts: u32,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Base delay for exponential retry backoff in milliseconds.
    pub backoff_base_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            max_concurrent_requests: 50,
            failure_threshold: 0.20,
            min_sample_size: 20,
            max_retry_attempts: 3,
            request_timeout_secs: 10,
            backoff_base_ms: 1_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
