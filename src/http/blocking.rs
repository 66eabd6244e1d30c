//! Blocking reqwest transport with cookie jar, rate limiting, and retries.

use std::sync::Arc;

use reqwest::cookie::Jar;
use tracing::warn;
use url::Url;

use crate::error::SkoobError;
use crate::limit::RateLimiter;
use crate::retry::Backoff;

use super::{is_transient, HttpResponse, HttpTransport, TransportBuilder, MAX_REDIRECTS};

/// Blocking HTTP transport. Holds the cookie jar so the session token
/// installed at login is sent on subsequent requests.
pub struct ReqwestSyncTransport {
    inner: reqwest::blocking::Client,
    jar: Arc<Jar>,
    limiter: RateLimiter,
    backoff: Backoff,
}

impl ReqwestSyncTransport {
    /// Transport with default user agent, timeout, and one request per second.
    pub fn new() -> Result<Self, reqwest::Error> {
        TransportBuilder::default().build_blocking()
    }

    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    pub(super) fn from_builder(builder: TransportBuilder) -> Result<Self, reqwest::Error> {
        let jar = Arc::new(Jar::default());
        let inner = reqwest::blocking::Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(builder.resolved_user_agent())
            .timeout(builder.timeout_value())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self {
            inner,
            jar,
            limiter: builder.limiter(),
            backoff: builder.backoff_value(),
        })
    }

    fn send_with_retry<F>(&self, url: &str, request: F) -> Result<HttpResponse, SkoobError>
    where
        F: Fn() -> reqwest::blocking::RequestBuilder,
    {
        let mut attempt = 0u32;
        loop {
            self.limiter.acquire();
            match request().send() {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let final_url = response.url().to_string();
                    let body = response.text().map_err(|e| SkoobError::Transport {
                        url: url.to_string(),
                        source: e,
                    })?;
                    return Ok(HttpResponse {
                        status,
                        url: final_url,
                        body,
                    });
                }
                Err(e) if is_transient(&e) && attempt < self.backoff.max_retries() => {
                    warn!(url, attempt, error = %e, "transient request failure, retrying");
                    self.backoff.sleep(attempt);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(SkoobError::Transport {
                        url: url.to_string(),
                        source: e,
                    });
                }
            }
        }
    }
}

impl HttpTransport for ReqwestSyncTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, SkoobError> {
        self.send_with_retry(url, || self.inner.get(url))
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse, SkoobError> {
        self.send_with_retry(url, || self.inner.post(url).form(form))
    }

    fn set_cookie(&self, url: &str, name: &str, value: &str) -> Result<(), SkoobError> {
        let url: Url = url
            .parse()
            .map_err(|e| SkoobError::parse(format!("cookie URL {url:?}: {e}")))?;
        self.jar.add_cookie_str(&format!("{name}={value}"), &url);
        Ok(())
    }
}

impl std::fmt::Debug for ReqwestSyncTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestSyncTransport")
            .field("limiter", &self.limiter)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}
