//! Synthetic HTTP load harness.
//!
//! Fires many concurrent requests at a target endpoint, classifies each
//! outcome, retries transient failures with capped exponential backoff,
//! and halts a run early through a circuit breaker once the failure rate
//! crosses a threshold. Ships with a small counter API that doubles as a
//! builtin target: real and harness-generated traffic are accounted in
//! separate namespaces.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod store;

pub use config::HarnessConfig;
pub use dispatch::{run_synthetic_load, DispatchError, Dispatcher, RequestOutcome, RunResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::CounterStore;
