//! Status classification and retry policy for network operations.

use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Default number of attempts for a single fetch.
pub const DEFAULT_ATTEMPTS: usize = 3;

/// Default delay between attempts in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// How many times a fetch is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    /// A policy with at least one attempt.
    pub fn new(attempts: usize, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Single attempt, no delay.
    #[cfg(test)]
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_ATTEMPTS,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        )
    }
}

/// A response whose status is anything other than `200 OK`.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchError {
    /// Rate limit exceeded (HTTP 429, or 403 with an exhausted rate limit)
    RateLimitExceeded(String),
    /// Authentication failed (HTTP 401)
    AuthenticationFailed(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Forbidden access (HTTP 403 non-rate-limit)
    Forbidden(String),
    /// Other 4xx responses
    ClientError(u16),
    /// 5xx responses
    ServerError(u16),
    /// Informational, redirect or non-200 success responses
    UnexpectedStatus(u16),
}

impl FetchError {
    /// Only server-side failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::ServerError(_))
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::RateLimitExceeded(msg) => {
                write!(
                    f,
                    "Rate limit exceeded: {}. Try again later or set GITHUB_TOKEN environment variable.",
                    msg
                )
            }
            FetchError::AuthenticationFailed(msg) => {
                write!(
                    f,
                    "Authentication failed: {}. Check your GITHUB_TOKEN.",
                    msg
                )
            }
            FetchError::NotFound(msg) => write!(f, "Not found: {}", msg),
            FetchError::Forbidden(msg) => {
                write!(f, "Access forbidden: {}. You may need authentication.", msg)
            }
            FetchError::ClientError(code) => write!(f, "Request error: HTTP {}", code),
            FetchError::ServerError(code) => write!(f, "Server error: HTTP {}", code),
            FetchError::UnexpectedStatus(code) => {
                write!(f, "Download failed: unexpected HTTP status {}", code)
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Classifies a response by status. Only `200 OK` is accepted.
pub fn classify_response(response: &Response) -> Result<(), FetchError> {
    let status = response.status();
    let rate_limited = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");
    classify_status(status, rate_limited)
}

fn classify_status(status: StatusCode, rate_limited: bool) -> Result<(), FetchError> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::UNAUTHORIZED => Err(FetchError::AuthenticationFailed(
            "Invalid or missing authentication token".to_string(),
        )),
        StatusCode::FORBIDDEN if rate_limited => Err(FetchError::RateLimitExceeded(
            "GitHub API rate limit exceeded".to_string(),
        )),
        StatusCode::FORBIDDEN => Err(FetchError::Forbidden(
            "Access to this resource is forbidden".to_string(),
        )),
        StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimitExceeded(
            "Too many requests".to_string(),
        )),
        StatusCode::NOT_FOUND => Err(FetchError::NotFound(
            "The requested resource was not found".to_string(),
        )),
        s if s.is_client_error() => Err(FetchError::ClientError(s.as_u16())),
        s if s.is_server_error() => Err(FetchError::ServerError(s.as_u16())),
        s => Err(FetchError::UnexpectedStatus(s.as_u16())),
    }
}

/// Passes a `200 OK` response through, turns anything else into a [`FetchError`].
pub fn check_status(response: Response) -> anyhow::Result<Response> {
    classify_response(&response)?;
    Ok(response)
}

/// Context attached to failures on the local side of a download (creating,
/// writing or flushing the destination). Never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteFailed(pub &'static str);

impl std::fmt::Display for WriteFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Whether a failed attempt should be repeated.
///
/// Transport failures (connection refused, timeouts, truncated bodies) carry no
/// [`FetchError`] and are retried. Local write failures are not.
pub fn is_retryable_error(e: &anyhow::Error) -> bool {
    if e.downcast_ref::<WriteFailed>().is_some() {
        return false;
    }
    match e.downcast_ref::<FetchError>() {
        Some(fetch_error) => fetch_error.is_retryable(),
        None => true,
    }
}
