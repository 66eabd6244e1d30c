//! Pure extraction layer. Every function here takes parsed HTML or a raw
//! JSON value and produces typed records; nothing in this module performs
//! network access, so the same code backs the blocking and async services.

mod author;
mod book;
mod dom;
mod ids;
mod publisher;
mod user;

pub(crate) use dom::has_any;

pub use author::{
    extract_author_books_total, parse_author_blocks, parse_author_books_listing,
    parse_author_profile,
};
pub use author::extract_total_results as extract_author_search_total;
pub use book::{
    clean_book_json, extract_edition_id_from_reviews_page, extract_total_results,
    extract_user_ids, normalize_image_url, parse_reviews, parse_search_results,
};
pub use ids::{author_id_from_url, book_id_from_url, edition_id_from_url, user_id_from_url};
pub use publisher::{parse_publisher, parse_publisher_authors, parse_publisher_books};
pub use user::{
    extract_user_search_total, has_next_page_label, parse_relation_ids, parse_user_reviews,
    parse_user_search_results,
};
