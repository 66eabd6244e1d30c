//! Typed records produced by the scraping services.
//!
//! Records are flat, request-scoped values deserialized from the site's JSON
//! (Portuguese field names are mapped via serde renames) or assembled from
//! parsed HTML.

mod author;
mod book;
mod enums;
mod page;
mod publisher;
mod user;

pub use author::{AuthorBook, AuthorProfile, AuthorSearchResult, AuthorStats, AuthorVideo};
pub use book::{Book, BookReview, BookSearchResult, BookStats};
pub use enums::{
    BookLabel, BookSearch, BookShelf, BookStatus, BookUserStatus, BookcaseOption, BrazilianState,
    UserGender, UsersRelation,
};
pub use page::Pagination;
pub use publisher::{Publisher, PublisherAuthor, PublisherItem, PublisherStats};
pub use user::{User, UserBook, UserReadStats, UserSearch, UserStats};
