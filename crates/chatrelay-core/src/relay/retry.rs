//! Linear backoff for client-side resends.

use std::time::Duration;

use chatrelay_types::config::ClientConfig;

/// How many times, and how patiently, a failed send is repeated.
///
/// Retry `n` (1-based) waits `n * base_delay`, so the defaults give 1s then 2s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Never resend.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before the given retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }

    /// Whether another retry is allowed after `retries_done` retries.
    pub fn allows(&self, retries_done: u32) -> bool {
        retries_done < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(1))
    }
}

impl From<&ClientConfig> for RetryPolicy {
    fn from(config: &ClientConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_base_delay_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays_are_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert!(policy.allows(0));
        assert!(policy.allows(1));
        assert!(!policy.allows(2));
    }

    #[test]
    fn test_from_client_config() {
        let config = ClientConfig {
            max_retries: 4,
            retry_base_delay_ms: 250,
            ..ClientConfig::default()
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.delay_for(3), Duration::from_millis(750));
    }

    #[test]
    fn test_none_never_allows() {
        assert!(!RetryPolicy::none().allows(0));
    }
}
