//! HTTP transport seam. One capability contract (`get`, `post_form`, cookie
//! access) with blocking and non-blocking reqwest implementations, both
//! throttled by [`RateLimiter`](crate::limit::RateLimiter) and retried with
//! [`Backoff`](crate::retry::Backoff).

mod blocking;
mod nonblocking;

pub use blocking::ReqwestSyncTransport;
pub use nonblocking::ReqwestAsyncTransport;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::SkoobError;
use crate::limit::RateLimiter;
use crate::retry::Backoff;

pub(crate) const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; skoob-rs/0.1)";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const MAX_REDIRECTS: usize = 10;

/// Owned response snapshot: status, final URL, and body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl HttpResponse {
    /// Error on non-2xx status, otherwise pass the response through.
    pub fn error_for_status(self) -> Result<Self, SkoobError> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(SkoobError::HttpStatus {
                status: self.status,
                url: self.url,
            })
        }
    }

    /// Decode the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, SkoobError> {
        serde_json::from_str(&self.body)
            .map_err(|e| SkoobError::parse(format!("JSON body from {}: {}", self.url, e)))
    }
}

/// Blocking transport contract consumed by the synchronous services.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, SkoobError>;

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse, SkoobError>;

    /// Install a cookie (e.g. the `PHPSESSID` session token) for `url`'s host.
    fn set_cookie(&self, url: &str, name: &str, value: &str) -> Result<(), SkoobError>;
}

/// Non-blocking transport contract consumed by the asynchronous services.
#[async_trait]
pub trait AsyncHttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, SkoobError>;

    async fn post_form(&self, url: &str, form: &[(&str, &str)])
        -> Result<HttpResponse, SkoobError>;

    /// Install a cookie (e.g. the `PHPSESSID` session token) for `url`'s host.
    fn set_cookie(&self, url: &str, name: &str, value: &str) -> Result<(), SkoobError>;
}

/// Shared builder for both transports: user agent, timeout, rate limit, and
/// backoff schedule.
#[derive(Debug)]
pub struct TransportBuilder {
    user_agent: Option<String>,
    timeout: Duration,
    rate_max_calls: usize,
    rate_period: Duration,
    backoff: Backoff,
}

impl Default for TransportBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rate_max_calls: 1,
            rate_period: Duration::from_secs(1),
            backoff: Backoff::default(),
        }
    }
}

impl TransportBuilder {
    /// Set a custom User-Agent. If not set, a browser-like default is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Request timeout. Default 30s.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Allow at most `max_calls` per `period`. Default 1 call per second.
    pub fn rate_limit(mut self, max_calls: usize, period: Duration) -> Self {
        self.rate_max_calls = max_calls;
        self.rate_period = period;
        self
    }

    /// Retry schedule for transport-level failures.
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub(crate) fn limiter(&self) -> RateLimiter {
        RateLimiter::new(self.rate_max_calls, self.rate_period)
    }

    pub(crate) fn resolved_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }

    pub(crate) fn timeout_value(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn backoff_value(&self) -> Backoff {
        self.backoff.clone()
    }

    /// Build the blocking transport.
    pub fn build_blocking(self) -> Result<ReqwestSyncTransport, reqwest::Error> {
        ReqwestSyncTransport::from_builder(self)
    }

    /// Build the async transport.
    pub fn build_async(self) -> Result<ReqwestAsyncTransport, reqwest::Error> {
        ReqwestAsyncTransport::from_builder(self)
    }
}

/// Whether a reqwest error is a transport-level failure worth retrying.
/// HTTP status codes are never retried.
pub(crate) fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_for_status_passes_success_through() -> Result<(), SkoobError> {
        let resp = HttpResponse {
            status: 200,
            url: "https://www.skoob.com.br/".to_string(),
            body: "ok".to_string(),
        };
        assert_eq!(resp.error_for_status()?.body, "ok");
        Ok(())
    }

    #[test]
    fn error_for_status_rejects_4xx() {
        let resp = HttpResponse {
            status: 404,
            url: "https://www.skoob.com.br/missing".to_string(),
            body: String::new(),
        };
        match resp.error_for_status() {
            Err(SkoobError::HttpStatus { status: 404, .. }) => {}
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }

    #[test]
    fn json_decode_failure_is_parse_error() {
        let resp = HttpResponse {
            status: 200,
            url: "https://www.skoob.com.br/v1/book/1".to_string(),
            body: "not json".to_string(),
        };
        match resp.json::<serde_json::Value>() {
            Err(SkoobError::Parse { .. }) => {}
            other => panic!("expected Parse, got {:?}", other),
        }
    }
}
