use reqwest::{header::HeaderMap, StatusCode};

pub const RETRY_AFTER: &str = "retry-after";
pub const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// What a single send attempt produced, as seen by the retry loop.
#[derive(Debug)]
pub enum Outcome<E> {
    /// 429 or 5xx. `delay_hint_ms` is the server-provided wait, if usable.
    Retryable {
        status: StatusCode,
        delay_hint_ms: Option<u64>,
    },
    /// Any other status; handed back to the caller as-is.
    Terminal(reqwest::Response),
    /// The send itself failed.
    TransportFailure(E),
}

pub fn classify<E>(result: Result<reqwest::Response, E>) -> Outcome<E> {
    match result {
        Ok(response) => {
            let status = response.status();
            if is_retryable_status(status) {
                Outcome::Retryable {
                    status,
                    delay_hint_ms: delay_hint(response.headers()),
                }
            } else {
                Outcome::Terminal(response)
            }
        }
        Err(err) => Outcome::TransportFailure(err),
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Reads the server's wait hint in milliseconds.
///
/// `Retry-After` wins over `X-Ratelimit-Reset`. The value is taken literally
/// as a millisecond count, not as HTTP seconds or a date. Only the first
/// non-empty header is consulted: a garbage `Retry-After` yields `None`
/// even when `X-Ratelimit-Reset` is usable.
pub fn delay_hint(headers: &HeaderMap) -> Option<u64> {
    let raw = [RETRY_AFTER, X_RATELIMIT_RESET]
        .into_iter()
        .filter_map(|name| headers.get(name))
        .find(|value| !value.is_empty())?;
    raw.to_str().ok()?.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use reqwest::StatusCode;

    use super::{classify, delay_hint, is_retryable_status, Outcome};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            let name = HeaderName::from_bytes(name.as_bytes()).unwrap();
            map.insert(name, HeaderValue::from_static(value));
        }
        map
    }

    fn response(status: u16, pairs: &[(&'static str, &'static str)]) -> reqwest::Response {
        let mut builder = axum::http::Response::builder().status(status);
        for (name, value) in pairs {
            builder = builder.header(*name, *value);
        }
        reqwest::Response::from(builder.body(String::new()).unwrap())
    }

    #[test]
    fn retryable_statuses_are_429_and_5xx() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable_status(StatusCode::from_u16(599).unwrap()));
        assert!(!is_retryable_status(StatusCode::OK));
        assert!(!is_retryable_status(StatusCode::MOVED_PERMANENTLY));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::REQUEST_TIMEOUT));
    }

    #[test]
    fn zero_is_a_valid_hint() {
        assert_eq!(delay_hint(&headers(&[("Retry-After", "0")])), Some(0));
    }

    #[test]
    fn retry_after_wins_over_ratelimit_reset() {
        let map = headers(&[("Retry-After", "15"), ("X-Ratelimit-Reset", "900")]);
        assert_eq!(delay_hint(&map), Some(15));
    }

    #[test]
    fn falls_back_to_ratelimit_reset() {
        assert_eq!(delay_hint(&headers(&[("X-Ratelimit-Reset", "250")])), Some(250));
    }

    #[test]
    fn empty_retry_after_falls_through() {
        let map = headers(&[("Retry-After", ""), ("X-Ratelimit-Reset", "250")]);
        assert_eq!(delay_hint(&map), Some(250));
    }

    #[test]
    fn unusable_values_give_no_hint() {
        assert_eq!(delay_hint(&HeaderMap::new()), None);
        assert_eq!(delay_hint(&headers(&[("Retry-After", "soon")])), None);
        assert_eq!(delay_hint(&headers(&[("Retry-After", "-5")])), None);
        let map = headers(&[("Retry-After", "later"), ("X-Ratelimit-Reset", "250")]);
        assert_eq!(delay_hint(&map), None);
    }

    #[test]
    fn classify_reads_hint_from_retryable_response() {
        let outcome = classify::<std::io::Error>(Ok(response(503, &[("Retry-After", "7")])));
        match outcome {
            Outcome::Retryable {
                status,
                delay_hint_ms,
            } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(delay_hint_ms, Some(7));
            }
            other => panic!("expected retryable outcome, got {other:?}"),
        }
    }

    #[test]
    fn classify_returns_client_errors_as_terminal() {
        let outcome = classify::<std::io::Error>(Ok(response(404, &[])));
        assert!(matches!(outcome, Outcome::Terminal(res) if res.status() == StatusCode::NOT_FOUND));
    }

    #[test]
    fn classify_passes_transport_errors_through() {
        let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outcome = classify::<std::io::Error>(Err(err));
        assert!(matches!(outcome, Outcome::TransportFailure(e) if e.to_string() == "refused"));
    }
}
