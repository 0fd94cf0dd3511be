//! Retry combinator with classification-driven attempts.
//!
//! # Responsibilities
//! - Execute an operation up to a bounded number of attempts
//! - Let a classifier decide, per attempt, whether the result is terminal
//!   or worth retrying
//! - Wait between attempts with capped exponential backoff
//!
//! # Design Decisions
//! - The classifier owns the retry decision; the combinator never inspects
//!   error types itself
//! - Client errors classify as terminal, so they are charged exactly one
//!   attempt
//! - Exhaustion surfaces the detail of the last transient condition

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::resilience::backoff::calculate_backoff;

/// Attempt budget and backoff timing for a retried operation.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    /// Total attempts, counting the first try.
    pub max_attempts: u32,

    /// Base delay for exponential backoff.
    pub base_delay: Duration,

    /// Hard cap on any single backoff wait.
    pub max_delay: Duration,
}

impl RetrySchedule {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }
}

/// Classification of a single attempt's raw result.
#[derive(Debug)]
pub enum Classification<T> {
    /// Terminal result; return it without further attempts.
    Done(T),

    /// Transient condition; retry after backoff. Carries a diagnostic
    /// detail surfaced if the budget runs out.
    Retry(String),
}

/// Run `op` under `schedule`, mapping each raw result through `classify`.
///
/// Returns `Ok` with the first terminal result, or `Err` with the last
/// transient detail once all attempts are spent.
pub async fn retry_with_backoff<R, T, Op, Fut, C>(
    schedule: &RetrySchedule,
    mut op: Op,
    classify: C,
) -> Result<T, String>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = R>,
    C: Fn(R) -> Classification<T>,
{
    let mut last_detail = String::new();

    for attempt in 1..=schedule.max_attempts.max(1) {
        match classify(op().await) {
            Classification::Done(value) => return Ok(value),
            Classification::Retry(detail) => {
                tracing::debug!(
                    attempt,
                    max_attempts = schedule.max_attempts,
                    detail = %detail,
                    "Transient failure"
                );
                last_detail = detail;

                if attempt < schedule.max_attempts {
                    let delay = calculate_backoff(
                        attempt,
                        schedule.base_delay.as_millis() as u64,
                        schedule.max_delay.as_millis() as u64,
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    Err(last_detail)
}
