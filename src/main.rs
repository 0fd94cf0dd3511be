//! Synthetic HTTP load harness server.
//!
//! # Architecture Overview
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!                  │                 LOAD HARNESS                  │
//!                  │                                               │
//!   Client / CLI   │  ┌────────┐     ┌───────────┐                │
//!   ───────────────┼─▶│  http  │────▶│   store   │ (namespaced    │
//!                  │  │ server │     │ counters  │  URL counts)   │
//!                  │  └───┬────┘     └───────────┘                │
//!                  │      │ POST /test/{n}/                       │
//!                  │      ▼                                       │
//!                  │  ┌──────────┐   ┌────────────┐               │
//!                  │  │ dispatch │──▶│ resilience │ retry/backoff │
//!                  │  │  runner  │   │  breaker   │ circuit trip  │
//!                  │  └────┬─────┘   └────────────┘               │
//!                  │       │ synthetic GETs (X-Request-Source)    │
//!                  │       ▼                                       │
//!                  │   target base_url (the harness itself by     │
//!                  │   default, or any external endpoint)         │
//!                  └──────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use load_harness::config::{load_config, HarnessConfig};
use load_harness::lifecycle::{signals, Shutdown};
use load_harness::observability::{logging, metrics};
use load_harness::store::CounterStore;
use load_harness::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => HarnessConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!("load-harness v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.dispatch.base_url,
        max_concurrent = config.dispatch.max_concurrent_requests,
        failure_threshold = config.dispatch.failure_threshold,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown;
    tokio::spawn(async move {
        signals::listen_for_signals(&signal_shutdown).await;
    });

    let store = Arc::new(CounterStore::new());
    let server = HttpServer::new(&config, store);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
