//! Client configuration.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://localhost:7257/api";
pub const DEFAULT_UPLOADS_URL: &str = "https://localhost:7257/Uploads/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Retries for transport failures of idempotent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Prefix for stored photo and document paths.
    pub uploads_base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Accept self-signed certificates, as served by a local development backend.
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            uploads_base_url: DEFAULT_UPLOADS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            accept_invalid_certs: false,
        }
    }
}
