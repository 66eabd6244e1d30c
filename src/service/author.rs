//! Author search, profiles and bibliographies.

use std::sync::Arc;

use scraper::Html;
use tracing::info;

use crate::error::SkoobError;
use crate::http::{AsyncHttpTransport, HttpTransport};
use crate::model::{AuthorProfile, AuthorSearchResult, BookSearchResult, Pagination};
use crate::parse;

fn search_url(base_url: &str, query: &str, page: u32) -> String {
    format!("{base_url}/autor/lista/busca:{query}/mpage:{page}")
}

fn profile_url(base_url: &str, author_id: u64) -> String {
    format!("{base_url}/autor/{author_id}")
}

fn books_url(base_url: &str, author_id: u64, page: u32) -> String {
    format!("{base_url}/autor/livros/{author_id}/page:{page}")
}

fn search_page(
    body: &str,
    base_url: &str,
    page: u32,
) -> Result<Pagination<AuthorSearchResult>, SkoobError> {
    let doc = Html::parse_document(body);
    let results = parse::parse_author_blocks(&doc, base_url)?;
    Ok(Pagination {
        total: parse::extract_author_search_total(&doc)?,
        has_next_page: parse::has_any(&doc, "div.proximo")?,
        limit: results.len() as u32,
        results,
        page,
    })
}

fn books_page(
    body: &str,
    base_url: &str,
    page: u32,
) -> Result<Pagination<BookSearchResult>, SkoobError> {
    let doc = Html::parse_document(body);
    let results = parse::parse_author_books_listing(&doc, base_url)?;
    let total = parse::extract_author_books_total(&doc)?.unwrap_or(results.len() as u32);
    Ok(Pagination {
        total,
        has_next_page: parse::has_any(&doc, "div.proximo")?,
        limit: results.len() as u32,
        results,
        page,
    })
}

/// Searches and retrieves authors. Works without authentication.
pub struct AuthorService {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl AuthorService {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Search authors by name.
    pub fn search(&self, query: &str, page: u32) -> Result<Pagination<AuthorSearchResult>, SkoobError> {
        info!(query, page, "searching authors");
        let url = search_url(&self.base_url, query, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        let result = search_page(&response.body, &self.base_url, page)?;
        info!(found = result.results.len(), total = result.total, "author search done");
        Ok(result)
    }

    /// Fetch an author's full profile page.
    pub fn get_by_id(&self, author_id: u64) -> Result<AuthorProfile, SkoobError> {
        info!(author_id, "getting author profile");
        let url = profile_url(&self.base_url, author_id);
        let response = self.transport.get(&url)?.error_for_status()?;
        let doc = Html::parse_document(&response.body);
        parse::parse_author_profile(&doc, &self.base_url)
    }

    /// List books written by the author. The active badge on the page, when
    /// numeric, carries the full bibliography size.
    pub fn get_books(
        &self,
        author_id: u64,
        page: u32,
    ) -> Result<Pagination<BookSearchResult>, SkoobError> {
        info!(author_id, page, "getting author books");
        let url = books_url(&self.base_url, author_id, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        books_page(&response.body, &self.base_url, page)
    }
}

/// Asynchronous variant of [`AuthorService`].
pub struct AsyncAuthorService {
    transport: Arc<dyn AsyncHttpTransport>,
    base_url: String,
}

impl AsyncAuthorService {
    pub fn new(transport: Arc<dyn AsyncHttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Search authors by name.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Pagination<AuthorSearchResult>, SkoobError> {
        info!(query, page, "searching authors");
        let url = search_url(&self.base_url, query, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        search_page(&response.body, &self.base_url, page)
    }

    /// Fetch an author's full profile page.
    pub async fn get_by_id(&self, author_id: u64) -> Result<AuthorProfile, SkoobError> {
        info!(author_id, "getting author profile");
        let url = profile_url(&self.base_url, author_id);
        let response = self.transport.get(&url).await?.error_for_status()?;
        let doc = Html::parse_document(&response.body);
        parse::parse_author_profile(&doc, &self.base_url)
    }

    /// List books written by the author.
    pub async fn get_books(
        &self,
        author_id: u64,
        page: u32,
    ) -> Result<Pagination<BookSearchResult>, SkoobError> {
        info!(author_id, page, "getting author books");
        let url = books_url(&self.base_url, author_id, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        books_page(&response.body, &self.base_url, page)
    }
}
