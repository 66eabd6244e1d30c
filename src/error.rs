//! Shared error type for the client. One closed enum covering transport,
//! authentication, not-found, and parsing failures.

use thiserror::Error;

/// Errors surfaced by services and transports.
#[derive(Debug, Error)]
pub enum SkoobError {
    /// Network-level failure (connect, timeout, body read) after retries.
    #[error("Network error: could not reach {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    /// Non-success HTTP status returned by the site.
    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    /// An expected record was absent from an API response.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Operation requires a login that has not happened.
    #[error("Not logged in. Authenticate first with 'login' or 'login_with_cookies'.")]
    AuthRequired,

    /// Login was rejected or the session token is invalid.
    #[error("Authentication failed: {message}")]
    AuthFailed { message: String },

    /// Expected DOM/JSON structure was missing or malformed.
    #[error("Could not parse {context}")]
    Parse { context: String },

    /// Rating outside the accepted 0..=5 range.
    #[error("Rating must be between 0 and 5, got {value}")]
    InvalidRating { value: f64 },

    /// The site reported failure for a profile action that must not fail silently.
    #[error("Action '{action}' was rejected by the site")]
    ActionFailed { action: String },
}

impl SkoobError {
    /// Parse failure with a short context (selector, endpoint, field).
    pub fn parse(context: impl Into<String>) -> Self {
        SkoobError::Parse {
            context: context.into(),
        }
    }
}
