//! Run-global concurrency limiting.
//!
//! # Responsibilities
//! - Cap the number of simultaneously in-flight requests for a whole run
//! - Restore capacity on every exit path, including task abort
//! - Expose in-flight/peak gauges for observability and tests
//!
//! # Design Decisions
//! - One limiter per run, shared by every batch; batch boundaries do not
//!   reset capacity
//! - Permits release on Drop, so a cancelled task can never leak a slot

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting permit pool bounding concurrent request execution.
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ConcurrencyLimiter {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            capacity: max_concurrent,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Wait for a free slot. The returned permit restores the slot when
    /// dropped, on success, failure or cancellation alike.
    pub async fn acquire(self: &Arc<Self>) -> Permit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("limiter semaphore never closed");

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        Permit {
            limiter: Arc::clone(self),
            _permit: permit,
        }
    }

    /// Permits configured at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Requests currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// High-water mark of concurrently held permits.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// Guard for one execution slot.
pub struct Permit {
    limiter: Arc<ConcurrencyLimiter>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.limiter.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
