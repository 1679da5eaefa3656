//! HTTP client module with retry logic and error handling.

mod client;
mod retry;

pub use client::HttpClient;
pub use retry::{
    DEFAULT_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, FetchError, RetryPolicy, check_status,
    classify_response,
};
