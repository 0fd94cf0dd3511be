//! Exponential backoff for retry waits.

use std::time::Duration;

/// Calculate the exponential backoff delay before the next attempt.
///
/// `attempt` is the 1-based index of the attempt that just failed, so the
/// wait doubles with every retry: `base`, `base * 2`, `base * 4`, ...
/// capped at `max_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);

    Duration::from_millis(delay_ms.min(max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_attempt() {
        assert_eq!(calculate_backoff(1, 1000, 8000), Duration::from_millis(1000));
        assert_eq!(calculate_backoff(2, 1000, 8000), Duration::from_millis(2000));
        assert_eq!(calculate_backoff(3, 1000, 8000), Duration::from_millis(4000));
        assert_eq!(calculate_backoff(4, 1000, 8000), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_caps_at_max() {
        assert_eq!(calculate_backoff(10, 1000, 8000), Duration::from_millis(8000));
        assert_eq!(calculate_backoff(63, 1000, 8000), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_zero_attempt() {
        assert_eq!(calculate_backoff(0, 1000, 8000), Duration::from_millis(0));
    }

    #[test]
    fn test_backoff_no_overflow_on_large_attempt() {
        assert_eq!(calculate_backoff(200, 1000, 8000), Duration::from_millis(8000));
    }
}
