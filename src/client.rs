//! Client facades wiring every service to one shared transport and session.

use std::sync::Arc;

use crate::config::Config;
use crate::http::{AsyncHttpTransport, HttpTransport, TransportBuilder};
use crate::service::{
    AsyncAuthService, AsyncAuthorService, AsyncBookService, AsyncProfileService,
    AsyncPublisherService, AsyncUserService, AuthService, AuthorService, BookService,
    ProfileService, PublisherService, Session, UserService,
};

/// Production site address.
pub const BASE_URL: &str = "https://www.skoob.com.br";

/// Blocking client. Owns one service per area of the site, all sharing the
/// same transport and login session.
pub struct SkoobClient {
    pub auth: AuthService,
    pub books: BookService,
    pub authors: AuthorService,
    pub publishers: PublisherService,
    pub users: UserService,
    pub me: ProfileService,
}

impl SkoobClient {
    /// Connect to the production site with default transport settings.
    pub fn new() -> Result<Self, reqwest::Error> {
        let transport = TransportBuilder::default().build_blocking()?;
        Ok(Self::with_transport(Arc::new(transport), BASE_URL))
    }

    /// Connect to the production site with settings from a config file.
    pub fn with_config(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = config.apply(TransportBuilder::default()).build_blocking()?;
        Ok(Self::with_transport(Arc::new(transport), BASE_URL))
    }

    /// Build on top of an existing transport and base URL. Used by tests to
    /// point the client at a local server.
    pub fn with_transport(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let session = Arc::new(Session::default());
        Self {
            auth: AuthService::new(transport.clone(), base_url.clone(), session.clone()),
            books: BookService::new(transport.clone(), base_url.clone()),
            authors: AuthorService::new(transport.clone(), base_url.clone()),
            publishers: PublisherService::new(transport.clone(), base_url.clone()),
            users: UserService::new(transport.clone(), base_url.clone(), session.clone()),
            me: ProfileService::new(transport, base_url, session),
        }
    }
}

/// Asynchronous variant of [`SkoobClient`].
pub struct SkoobAsyncClient {
    pub auth: AsyncAuthService,
    pub books: AsyncBookService,
    pub authors: AsyncAuthorService,
    pub publishers: AsyncPublisherService,
    pub users: AsyncUserService,
    pub me: AsyncProfileService,
}

impl SkoobAsyncClient {
    /// Connect to the production site with default transport settings.
    pub fn new() -> Result<Self, reqwest::Error> {
        let transport = TransportBuilder::default().build_async()?;
        Ok(Self::with_transport(Arc::new(transport), BASE_URL))
    }

    /// Connect to the production site with settings from a config file.
    pub fn with_config(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = config.apply(TransportBuilder::default()).build_async()?;
        Ok(Self::with_transport(Arc::new(transport), BASE_URL))
    }

    /// Build on top of an existing transport and base URL.
    pub fn with_transport(
        transport: Arc<dyn AsyncHttpTransport>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        let session = Arc::new(Session::default());
        Self {
            auth: AsyncAuthService::new(transport.clone(), base_url.clone(), session.clone()),
            books: AsyncBookService::new(transport.clone(), base_url.clone()),
            authors: AsyncAuthorService::new(transport.clone(), base_url.clone()),
            publishers: AsyncPublisherService::new(transport.clone(), base_url.clone()),
            users: AsyncUserService::new(transport.clone(), base_url.clone(), session.clone()),
            me: AsyncProfileService::new(transport, base_url, session),
        }
    }
}
