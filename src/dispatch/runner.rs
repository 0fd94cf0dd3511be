//! Dispatch orchestration.
//!
//! # Data Flow
//! ```text
//! run(n):
//!     validate count → generate token pool → spawn n limited tasks
//!     → await tasks in ordered batches of min_sample_size
//!     → record outcomes into the breaker after each batch
//!     → on trip: abort every not-yet-joined task, stop batching
//!     → snapshot(requested, requested - completed, tokens)
//! ```
//!
//! # Design Decisions
//! - Batch size equals the breaker's minimum sample size, so every breaker
//!   evaluation sees a full statistical window
//! - Individual request failures are data, never fatal to the run; only
//!   configuration and session-lifecycle violations error out
//! - The session owns the connection pool and is released on every exit
//!   path, including abort and panic, via Drop

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use rand::thread_rng;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::schema::{DispatchConfig, BACKOFF_CAP_MS};
use crate::config::validation::validate_dispatch_config;
use crate::dispatch::client::RequestClient;
use crate::dispatch::limiter::ConcurrencyLimiter;
use crate::dispatch::outcome::{RequestOutcome, RunResult};
use crate::dispatch::paths::{generate_path, generate_token_pool};
use crate::observability::metrics;
use crate::resilience::circuit_breaker::{CircuitBreaker, TripHook};
use crate::resilience::retries::RetrySchedule;

/// Errors that abort a run before any request is dispatched.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The dispatch configuration failed semantic validation.
    #[error("invalid dispatch configuration: {0}")]
    InvalidConfig(String),

    /// The per-run request count must be positive.
    #[error("requested count must be positive, got {0}")]
    InvalidRequestCount(usize),

    /// The dispatcher was used outside an open session.
    #[error("dispatcher session is not open")]
    SessionClosed,

    /// The outbound HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Per-session runtime state: connection pool, limiter and breaker.
struct Session {
    client: RequestClient,
    limiter: Arc<ConcurrencyLimiter>,
    breaker: CircuitBreaker,
}

/// Orchestrator for synthetic load runs.
///
/// A dispatcher is created from a validated config, optionally given a
/// trip hook, and must have an open session before it can run. A session
/// may serve several consecutive runs; the breaker is reset at the start
/// of each.
pub struct Dispatcher {
    config: DispatchConfig,
    trip_hook: Option<TripHook>,
    session: Option<Session>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("has_trip_hook", &self.trip_hook.is_some())
            .field("has_session", &self.session.is_some())
            .finish()
    }
}

impl Dispatcher {
    /// Validate `config` and build an idle dispatcher.
    pub fn new(config: DispatchConfig) -> Result<Self, DispatchError> {
        if let Err(errors) = validate_dispatch_config(&config) {
            let joined = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(DispatchError::InvalidConfig(joined));
        }

        Ok(Self {
            config,
            trip_hook: None,
            session: None,
        })
    }

    /// Attach the cleanup collaborator invoked once if the breaker trips.
    pub fn with_trip_hook(mut self, hook: TripHook) -> Self {
        self.trip_hook = Some(hook);
        self
    }

    /// Acquire the session-scoped resources: connection pool, run-global
    /// concurrency limiter and a closed circuit breaker.
    pub fn open_session(&mut self) -> Result<(), DispatchError> {
        let schedule = RetrySchedule::new(
            self.config.max_retry_attempts,
            Duration::from_millis(self.config.backoff_base_ms),
            Duration::from_millis(BACKOFF_CAP_MS),
        );
        let client = RequestClient::new(
            &self.config.base_url,
            Duration::from_secs(self.config.request_timeout_secs),
            schedule,
        )?;

        let mut breaker = CircuitBreaker::new(
            self.config.failure_threshold,
            self.config.min_sample_size,
        );
        if let Some(hook) = &self.trip_hook {
            breaker = breaker.with_trip_hook(Arc::clone(hook));
        }

        self.session = Some(Session {
            client,
            limiter: Arc::new(ConcurrencyLimiter::new(self.config.max_concurrent_requests)),
            breaker,
        });
        Ok(())
    }

    /// Release the session resources. Idempotent.
    pub fn close_session(&mut self) {
        self.session = None;
    }

    /// Execute one run of `num_requests` synthetic requests.
    pub async fn run(&mut self, num_requests: usize) -> Result<RunResult, DispatchError> {
        if num_requests == 0 {
            return Err(DispatchError::InvalidRequestCount(num_requests));
        }
        let batch_size = self.config.min_sample_size;
        let max_concurrent = self.config.max_concurrent_requests;
        let session = self.session.as_mut().ok_or(DispatchError::SessionClosed)?;

        session.breaker.reset();

        let tokens = generate_token_pool(&mut thread_rng());
        tracing::info!(
            requested = num_requests,
            max_concurrent,
            tokens = ?tokens,
            "Starting dispatch run"
        );

        let mut handles = spawn_request_tasks(session, num_requests, &tokens);
        while !handles.is_empty() {
            let batch: Vec<JoinHandle<RequestOutcome>> =
                handles.drain(..batch_size.min(handles.len())).collect();

            for joined in join_all(batch).await {
                let outcome = match joined {
                    Ok(outcome) => outcome,
                    Err(e) if e.is_cancelled() => RequestOutcome::Cancelled,
                    Err(e) => RequestOutcome::TransientFailureExhausted {
                        detail: format!("request task failed: {}", e),
                    },
                };
                record_outcome(&mut session.breaker, outcome);
            }

            if session.breaker.should_trip() {
                abort_remaining(handles).await;
                break;
            }
        }

        let completed = session.breaker.total_requests();
        let result = session
            .breaker
            .snapshot(num_requests, num_requests - completed, &tokens);

        tracing::info!(
            run_id = %result.run_id,
            successful = result.successful_requests,
            failed = result.failed_requests,
            cancelled = result.total_cancelled,
            breaker_triggered = result.circuit_breaker_triggered,
            "Dispatch run finished"
        );
        Ok(result)
    }
}

/// Spawn every request task upfront. Tasks queue on the shared limiter, so
/// no more than the configured cap execute at once.
fn spawn_request_tasks(
    session: &Session,
    num_requests: usize,
    tokens: &[String; 3],
) -> Vec<JoinHandle<RequestOutcome>> {
    let mut rng = thread_rng();
    let mut handles = Vec::with_capacity(num_requests);

    for _ in 0..num_requests {
        let path = generate_path(&mut rng, tokens);
        let client = session.client.clone();
        let limiter = Arc::clone(&session.limiter);

        handles.push(tokio::spawn(async move {
            let _permit = limiter.acquire().await;
            client.execute(&path).await
        }));
    }

    handles
}

fn record_outcome(breaker: &mut CircuitBreaker, outcome: RequestOutcome) {
    metrics::record_outcome(outcome.label());

    match outcome {
        RequestOutcome::Success => breaker.record_success(),
        RequestOutcome::PermanentFailure { status } => {
            breaker.record_failure(Some(&format!("HTTP {}", status)));
        }
        RequestOutcome::TransientFailureExhausted { detail } => {
            breaker.record_failure(Some(&detail));
        }
        // Not a completion; reported through the aggregate cancelled count.
        RequestOutcome::Cancelled => {}
    }
}

/// Abort and drain every not-yet-joined task after a trip. Outcomes of
/// tasks that finished before the abort landed are discarded; the snapshot
/// counts everything past the tripping batch as cancelled.
async fn abort_remaining(handles: Vec<JoinHandle<RequestOutcome>>) {
    let mut aborted = 0usize;
    let mut finished = 0usize;

    for handle in handles {
        handle.abort();
        match handle.await {
            Err(e) if e.is_cancelled() => aborted += 1,
            _ => finished += 1,
        }
    }

    tracing::debug!(aborted, finished, "Drained remaining tasks after breaker trip");
}

/// Run a single dispatch with a scoped session: open, execute, release.
/// The session is released whether the run succeeds or errors.
pub async fn run_synthetic_load(
    config: DispatchConfig,
    trip_hook: Option<TripHook>,
    num_requests: usize,
) -> Result<RunResult, DispatchError> {
    let mut dispatcher = Dispatcher::new(config)?;
    if let Some(hook) = trip_hook {
        dispatcher = dispatcher.with_trip_hook(hook);
    }

    dispatcher.open_session()?;
    let result = dispatcher.run(num_requests).await;
    dispatcher.close_session();
    result
}
