use crate::Logger;

/// Configures the retry loop of [`crate::retry::execute`].
///
/// `max_retries = 0` means exactly one send and no retries. A
/// `base_delay_ms` of zero is not rejected; it simply makes every fallback
/// wait zero-length.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base delay in milliseconds: fallback for rate-limit waits and the
    /// unit of exponential backoff after transport failures.
    pub base_delay_ms: u64,
    /// Receives one progress message per retry decision.
    pub logger: Logger,
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Exponential backoff for the transport-failure path: `base * 2^attempt`.
    pub(crate) fn backoff_ms(&self, attempt: usize) -> u64 {
        let exp = attempt.min(32) as u32;
        self.base_delay_ms.saturating_mul(1u64 << exp)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 1_000,
            logger: Logger::noop(),
        }
    }
}

/// Configures HTTP timeout and retry behavior of [`crate::CodeRefsClient`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry delay in milliseconds.
    pub base_delay_ms: u64,
}

impl ClientOptions {
    pub(crate) fn retry_config(&self, logger: Logger) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            base_delay_ms: self.base_delay_ms,
            logger,
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_retries: 5,
            base_delay_ms: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RetryConfig;

    #[test]
    fn backoff_doubles_per_attempt() {
        let config = RetryConfig::default().with_base_delay_ms(100);
        assert_eq!(config.backoff_ms(0), 100);
        assert_eq!(config.backoff_ms(1), 200);
        assert_eq!(config.backoff_ms(3), 800);
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        let config = RetryConfig::default().with_base_delay_ms(u64::MAX / 2);
        assert_eq!(config.backoff_ms(4), u64::MAX);
        assert_eq!(config.backoff_ms(usize::MAX), u64::MAX);
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay_ms, 1_000);
    }
}
