//! Outbound synthetic request execution.
//!
//! One logical request is one GET to `base_url + path`, marked as test
//! traffic via the `X-Request-Source` header so the target can account for
//! it separately. Attempts are classified into terminal or retryable and
//! driven through the retry combinator.

use std::time::Duration;

use crate::dispatch::outcome::RequestOutcome;
use crate::resilience::retries::{retry_with_backoff, Classification, RetrySchedule};
use crate::store::NAMESPACE_TEST;

/// Header marking requests as harness-generated traffic.
pub const REQUEST_SOURCE_HEADER: &str = "x-request-source";

/// HTTP client for a single dispatch session. Cheap to clone; all clones
/// share the underlying connection pool.
#[derive(Clone)]
pub struct RequestClient {
    client: reqwest::Client,
    base_url: String,
    schedule: RetrySchedule,
}

impl RequestClient {
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        schedule: RetrySchedule,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            schedule,
        })
    }

    /// Execute one logical request, retrying transient conditions per the
    /// session's schedule. Never returns an error; every failure mode maps
    /// into a [`RequestOutcome`].
    pub async fn execute(&self, path: &str) -> RequestOutcome {
        let url = format!("{}{}", self.base_url, path);

        let attempt = || {
            self.client
                .get(url.as_str())
                .header(REQUEST_SOURCE_HEADER, NAMESPACE_TEST)
                .send()
        };

        let classified = retry_with_backoff(&self.schedule, attempt, classify_response).await;

        match classified {
            Ok(outcome) => outcome,
            Err(detail) => RequestOutcome::TransientFailureExhausted { detail },
        }
    }
}

/// Map one raw attempt result into a terminal outcome or a retry.
///
/// - 2xx/3xx: success, terminal
/// - 4xx: permanent failure, terminal (client errors are not transient)
/// - 5xx, connection errors, timeouts: retryable
fn classify_response(
    result: Result<reqwest::Response, reqwest::Error>,
) -> Classification<RequestOutcome> {
    match result {
        Ok(response) => {
            let status = response.status().as_u16();
            match status {
                200..=399 => Classification::Done(RequestOutcome::Success),
                400..=499 => Classification::Done(RequestOutcome::PermanentFailure { status }),
                _ => Classification::Retry(format!("HTTP {}", status)),
            }
        }
        Err(e) if e.is_timeout() => Classification::Retry("request timed out".to_string()),
        Err(e) => Classification::Retry(format!("connection error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_status(status: u16) -> Result<reqwest::Response, reqwest::Error> {
        Ok(http::Response::builder()
            .status(status)
            .body("")
            .unwrap()
            .into())
    }

    #[test]
    fn test_classify_success_range() {
        for status in [200, 204, 301, 399] {
            assert!(matches!(
                classify_response(response_with_status(status)),
                Classification::Done(RequestOutcome::Success)
            ));
        }
    }

    #[test]
    fn test_classify_client_error_is_terminal() {
        assert!(matches!(
            classify_response(response_with_status(404)),
            Classification::Done(RequestOutcome::PermanentFailure { status: 404 })
        ));
    }

    #[test]
    fn test_classify_server_error_is_retryable() {
        for status in [500, 502, 503] {
            assert!(matches!(
                classify_response(response_with_status(status)),
                Classification::Retry(_)
            ));
        }
    }
}
