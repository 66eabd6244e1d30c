//! Login flows and shared session state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::SkoobError;
use crate::http::{AsyncHttpTransport, HttpTransport};
use crate::model::User;
use crate::service::{success_flag, user_from_record};

/// Login state shared by every service built from the same client.
#[derive(Debug, Default)]
pub struct Session {
    logged_in: AtomicBool,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::Acquire)
    }

    fn set_logged_in(&self, value: bool) {
        self.logged_in.store(value, Ordering::Release);
    }

    /// Error unless a login has succeeded on this session.
    pub(crate) fn require_login(&self) -> Result<(), SkoobError> {
        debug!("validating login state");
        if self.is_logged_in() {
            Ok(())
        } else {
            warn!("operation requires authentication");
            Err(SkoobError::AuthRequired)
        }
    }
}

fn login_url(base_url: &str) -> String {
    format!("{base_url}/v1/login")
}

fn my_info_url(base_url: &str) -> String {
    format!("{base_url}/v1/user/stats:true")
}

fn login_form<'a>(email: &'a str, password: &'a str) -> [(&'static str, &'a str); 3] {
    [
        ("data[Usuario][email]", email),
        ("data[Usuario][senha]", password),
        ("data[Login][automatico]", "true"),
    ]
}

/// Reject a login envelope whose `success` flag is false.
fn check_login_payload(data: &Value) -> Result<(), SkoobError> {
    if success_flag(data) {
        Ok(())
    } else {
        let message = data
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        warn!(message, "login rejected");
        Err(SkoobError::AuthFailed { message })
    }
}

/// Decode the authenticated user's own record from the `/v1/user` envelope.
fn my_info_from_payload(data: Value, base_url: &str) -> Result<User, SkoobError> {
    if !success_flag(&data) {
        warn!("could not retrieve user information");
        return Err(SkoobError::AuthFailed {
            message: "could not retrieve user information; the session token might be invalid"
                .to_string(),
        });
    }
    let record = data
        .get("response")
        .cloned()
        .ok_or_else(|| SkoobError::parse("user payload field 'response'"))?;
    user_from_record(record, base_url)
}

/// Authenticates against the site and tracks login state for the other
/// services.
pub struct AuthService {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    session: Arc<Session>,
}

impl AuthService {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            session,
        }
    }

    /// Log in with email and password.
    pub fn login(&self, email: &str, password: &str) -> Result<User, SkoobError> {
        info!("logging in with email and password");
        let response = self
            .transport
            .post_form(&login_url(&self.base_url), &login_form(email, password))?
            .error_for_status()?;
        check_login_payload(&response.json()?)?;
        self.session.set_logged_in(true);
        let user = self.get_my_info()?;
        info!(user = %user.name, "login succeeded");
        Ok(user)
    }

    /// Log in by installing a `PHPSESSID` session token taken from a browser.
    pub fn login_with_cookies(&self, session_token: &str) -> Result<User, SkoobError> {
        info!("logging in with an existing session token");
        self.transport
            .set_cookie(&self.base_url, "PHPSESSID", session_token)?;
        let user = self.get_my_info()?;
        self.session.set_logged_in(true);
        info!(user = %user.name, "login succeeded");
        Ok(user)
    }

    /// Fetch the authenticated user's own profile.
    pub fn get_my_info(&self) -> Result<User, SkoobError> {
        let response = self
            .transport
            .get(&my_info_url(&self.base_url))?
            .error_for_status()?;
        my_info_from_payload(response.json()?, &self.base_url)
    }

    /// Error unless a login has succeeded on this session.
    pub fn validate_login(&self) -> Result<(), SkoobError> {
        self.session.require_login()
    }
}

/// Asynchronous variant of [`AuthService`].
pub struct AsyncAuthService {
    transport: Arc<dyn AsyncHttpTransport>,
    base_url: String,
    session: Arc<Session>,
}

impl AsyncAuthService {
    pub fn new(
        transport: Arc<dyn AsyncHttpTransport>,
        base_url: impl Into<String>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            session,
        }
    }

    /// Log in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SkoobError> {
        info!("logging in with email and password");
        let response = self
            .transport
            .post_form(&login_url(&self.base_url), &login_form(email, password))
            .await?
            .error_for_status()?;
        check_login_payload(&response.json()?)?;
        self.session.set_logged_in(true);
        let user = self.get_my_info().await?;
        info!(user = %user.name, "login succeeded");
        Ok(user)
    }

    /// Log in by installing a `PHPSESSID` session token taken from a browser.
    pub async fn login_with_cookies(&self, session_token: &str) -> Result<User, SkoobError> {
        info!("logging in with an existing session token");
        self.transport
            .set_cookie(&self.base_url, "PHPSESSID", session_token)?;
        let user = self.get_my_info().await?;
        self.session.set_logged_in(true);
        info!(user = %user.name, "login succeeded");
        Ok(user)
    }

    /// Fetch the authenticated user's own profile.
    pub async fn get_my_info(&self) -> Result<User, SkoobError> {
        let response = self
            .transport
            .get(&my_info_url(&self.base_url))
            .await?
            .error_for_status()?;
        my_info_from_payload(response.json()?, &self.base_url)
    }

    /// Error unless a login has succeeded on this session.
    pub fn validate_login(&self) -> Result<(), SkoobError> {
        self.session.require_login()
    }
}
