//! Backoff policy for transient client errors.
//!
//! Applied by the HTTP clients around each request; the decision engine and
//! sweep drivers never see a transient failure that a retry resolved.

use std::time::Duration;

use rand::Rng;

use crate::error::Error;

/// Exponential backoff with jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(20),
            jitter_factor: 0.2,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay before the next attempt, or `None` when the error is not
    /// retryable or the attempt budget is spent. `attempt` is zero-based.
    pub fn next_delay(&self, error: &Error, attempt: u32) -> Option<Duration> {
        if !error.is_transient() || attempt + 1 >= self.max_attempts {
            return None;
        }
        Some(self.delay_for(attempt))
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.as_millis() as f64 * 2f64.powi(attempt.min(16) as i32);
        let capped = exp.min(self.max_delay.as_millis() as f64);
        let jitter = capped * self.jitter_factor * rand::thread_rng().gen_range(0.0..1.0);
        Duration::from_millis((capped + jitter) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_transient_is_never_retried() {
        let policy = RetryPolicy::default();
        let err = Error::api(400, "bad request");
        assert!(policy.next_delay(&err, 0).is_none());
    }

    #[test]
    fn test_transient_is_retried_until_budget_spent() {
        let policy = RetryPolicy::with_max_attempts(3);
        let err = Error::api(503, "unavailable");
        assert!(policy.next_delay(&err, 0).is_some());
        assert!(policy.next_delay(&err, 1).is_some());
        // Third attempt would be the last allowed; no delay after it.
        assert!(policy.next_delay(&err, 2).is_none());
    }

    #[test]
    fn test_delay_grows_and_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            jitter_factor: 0.0,
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
        // Capped at max_delay.
        assert_eq!(policy.delay_for(8), Duration::from_secs(2));
    }

    #[test]
    fn test_jitter_stays_within_factor() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            jitter_factor: 0.5,
        };
        for _ in 0..50 {
            let delay = policy.delay_for(1);
            assert!(delay >= Duration::from_millis(200));
            assert!(delay <= Duration::from_millis(300));
        }
    }
}
