//! skoob: client library for the Skoob book cataloging site, with blocking
//! and async variants over the same scraping and JSON API layer.
//!
//! ```no_run
//! use skoob::SkoobClient;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SkoobClient::new()?;
//!     let page = client.books.search("duna", Default::default(), 1)?;
//!     for book in page.results {
//!         println!("{} ({:?})", book.title, book.isbn);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod limit;
pub mod model;
pub mod parse;
pub mod retry;
pub mod service;

// Re-exports for consumers.
pub use client::{SkoobAsyncClient, SkoobClient, BASE_URL};
pub use config::{load_config, Config};
pub use error::SkoobError;
pub use http::{
    AsyncHttpTransport, HttpResponse, HttpTransport, ReqwestAsyncTransport, ReqwestSyncTransport,
    TransportBuilder,
};
pub use limit::RateLimiter;
pub use model::{
    AuthorProfile, AuthorSearchResult, Book, BookLabel, BookReview, BookSearch, BookSearchResult,
    BookShelf, BookStatus, BookUserStatus, BookcaseOption, BrazilianState, Pagination, Publisher,
    User, UserBook, UserGender, UserReadStats, UserSearch, UsersRelation,
};
pub use retry::Backoff;
