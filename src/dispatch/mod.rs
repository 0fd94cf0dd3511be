//! Synthetic load dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! run trigger (HTTP /test/{n}/ or library call)
//!     → paths.rs (token pool + per-task request paths)
//!     → runner.rs (spawn tasks, batch, record, trip handling)
//!         → limiter.rs (run-global concurrency cap)
//!         → client.rs (GET + retry classification)
//!     → outcome.rs (RequestOutcome per task, RunResult at run end)
//! ```
//!
//! # Design Decisions
//! - All tasks are created upfront and gate on the limiter, so the
//!   concurrency cap holds within and across batches
//! - Batches are processed strictly in creation order; requests within a
//!   batch race freely
//! - Cancellation is cooperative and the reported cancelled count is
//!   best-effort (`requested - completed`)

pub mod client;
pub mod limiter;
pub mod outcome;
pub mod paths;
pub mod runner;

pub use limiter::ConcurrencyLimiter;
pub use outcome::{RequestOutcome, RunResult};
pub use runner::{run_synthetic_load, DispatchError, Dispatcher};
