//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound synthetic request:
//!     → retries.rs (classify each attempt, retry with backoff)
//!     → backoff.rs (capped exponential wait between attempts)
//!
//! Recorded outcomes:
//!     → circuit_breaker.rs (track failure rate, open once threshold exceeded)
//! ```
//!
//! # Design Decisions
//! - Every request attempt has a deadline; timeouts classify as transient
//! - Client errors (4xx) are terminal and never retried
//! - The breaker is a one-way latch for the run; trip side effects fire once

pub mod backoff;
pub mod circuit_breaker;
pub mod retries;

pub use circuit_breaker::CircuitBreaker;
pub use retries::{Classification, RetrySchedule};
