//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (timeout, tracing)
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{DispatchConfig, HarnessConfig};
use crate::http::handlers;
use crate::store::CounterStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CounterStore>,
    pub dispatch_config: DispatchConfig,
    pub started_at: Instant,
}

/// HTTP server for the counter API and the run trigger.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and shared
    /// counter store.
    pub fn new(config: &HarnessConfig, store: Arc<CounterStore>) -> Self {
        let state = AppState {
            store,
            dispatch_config: config.dispatch.clone(),
            started_at: Instant::now(),
        };

        Self {
            router: Self::build_router(config, state),
        }
    }

    fn build_router(config: &HarnessConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/", get(handlers::api_root))
            .route("/api/{*path}", get(handlers::api_endpoint))
            .route("/stats/", get(handlers::stats))
            .route("/test/{num_requests}/", post(handlers::run_test))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve connections on `listener` until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await
    }
}
