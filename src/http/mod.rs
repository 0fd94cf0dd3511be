//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/{*path}
//!     → validation.rs (reject traversal, bad charset, oversize)
//!     → store (increment, namespace picked from X-Request-Source)
//!
//! POST /test/{n}/
//!     → dispatch::run_synthetic_load (fires n requests back at base_url)
//!     → RunResult as JSON
//!
//! GET /stats/, GET /health
//!     → store snapshots / liveness
//! ```

pub mod handlers;
pub mod server;
pub mod validation;

pub use server::HttpServer;
