//! Resilient request executor.
//!
//! [`execute`] sends a [`RequestDescriptor`] and retries transient failures:
//! - 429 and 5xx responses wait for the server's `Retry-After` /
//!   `X-Ratelimit-Reset` hint (milliseconds), or `base_delay_ms` without one;
//! - transport failures wait `base_delay_ms * 2^attempt`.
//!
//! At most `max_retries + 1` sends happen per call. Nothing is shared
//! between calls.

use std::time::Duration;

use tokio::time::sleep;

use crate::{
    classify::{classify, Outcome},
    RequestDescriptor, RetryConfig, Transport,
};

/// Terminal failure of [`execute`].
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The last permitted send failed at the transport level. The error is
    /// the transport's own, unchanged.
    #[error(transparent)]
    Transport(E),
    /// The last permitted send returned a retryable status.
    #[error("Request failed after {max_retries} retries")]
    Exhausted { max_retries: usize },
}

/// Sends `request` through `transport`, retrying transient failures.
///
/// Any non-retryable response is returned as-is, success or not; the caller
/// decides what counts as success.
pub async fn execute<T: Transport>(
    transport: &T,
    request: &RequestDescriptor,
    config: RetryConfig,
) -> Result<reqwest::Response, RetryError<T::Error>> {
    let max_retries = config.max_retries;
    let mut attempt = 0usize;

    loop {
        tracing::debug!(
            attempt,
            method = %request.method(),
            url = %request.url(),
            "sending request"
        );

        let outcome = classify(transport.send(request.to_request()).await);
        let (delay_ms, message) = match outcome {
            Outcome::Terminal(response) => return Ok(response),
            Outcome::Retryable {
                status,
                delay_hint_ms,
            } => {
                if attempt >= max_retries {
                    tracing::warn!(status = status.as_u16(), max_retries, "retry budget exhausted");
                    return Err(RetryError::Exhausted { max_retries });
                }
                let delay_ms = delay_hint_ms.unwrap_or(config.base_delay_ms);
                let message = format!(
                    "Received {}, retrying in {delay_ms}ms (attempt {}/{max_retries})...",
                    status.as_u16(),
                    attempt + 1,
                );
                (delay_ms, message)
            }
            Outcome::TransportFailure(err) => {
                if attempt >= max_retries {
                    return Err(RetryError::Transport(err));
                }
                let delay_ms = config.backoff_ms(attempt);
                let message = format!(
                    "Network error: {err}. Retrying in {delay_ms}ms (attempt {}/{max_retries})...",
                    attempt + 1,
                );
                (delay_ms, message)
            }
        };

        config.logger.log(&message);
        sleep(Duration::from_millis(delay_ms)).await;
        attempt += 1;
    }
}
