//! Counter storage subsystem.
//!
//! In-memory, namespaced URL hit counters. Real traffic and synthetic
//! test traffic are accounted separately; the dispatcher's circuit breaker
//! clears the test namespace when it trips.

pub mod counters;

pub use counters::{CounterStore, UrlCount, NAMESPACE_REAL, NAMESPACE_TEST};
