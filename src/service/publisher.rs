//! Publisher profiles and their book/author listings.

use std::sync::Arc;

use scraper::Html;
use tracing::info;

use crate::error::SkoobError;
use crate::http::{AsyncHttpTransport, HttpTransport};
use crate::model::{Pagination, Publisher, PublisherAuthor, PublisherItem};
use crate::parse;

fn profile_url(base_url: &str, publisher_id: u64) -> String {
    format!("{base_url}/editora/{publisher_id}")
}

fn authors_url(base_url: &str, publisher_id: u64, page: u32) -> String {
    format!("{base_url}/editora/autores/{publisher_id}/mpage:{page}")
}

fn books_url(base_url: &str, publisher_id: u64, page: u32) -> String {
    format!("{base_url}/editora/livros/{publisher_id}/mpage:{page}")
}

fn authors_page(
    body: &str,
    base_url: &str,
    page: u32,
) -> Result<Pagination<PublisherAuthor>, SkoobError> {
    let doc = Html::parse_document(body);
    let results = parse::parse_publisher_authors(&doc, base_url)?;
    Ok(Pagination {
        total: results.len() as u32,
        limit: results.len() as u32,
        has_next_page: parse::has_any(&doc, "div.proximo")?,
        results,
        page,
    })
}

fn books_page(
    body: &str,
    base_url: &str,
    page: u32,
) -> Result<Pagination<PublisherItem>, SkoobError> {
    let doc = Html::parse_document(body);
    let results = parse::parse_publisher_books(&doc, base_url)?;
    Ok(Pagination {
        total: results.len() as u32,
        limit: results.len() as u32,
        has_next_page: parse::has_any(&doc, "div.proximo")?,
        results,
        page,
    })
}

/// Retrieves publishers. Works without authentication.
pub struct PublisherService {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl PublisherService {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Fetch a publisher's profile page with stats and latest releases.
    pub fn get_by_id(&self, publisher_id: u64) -> Result<Publisher, SkoobError> {
        info!(publisher_id, "getting publisher");
        let url = profile_url(&self.base_url, publisher_id);
        let response = self.transport.get(&url)?.error_for_status()?;
        let doc = Html::parse_document(&response.body);
        parse::parse_publisher(&doc, publisher_id, &self.base_url)
    }

    /// List authors published by the publisher.
    pub fn get_authors(
        &self,
        publisher_id: u64,
        page: u32,
    ) -> Result<Pagination<PublisherAuthor>, SkoobError> {
        info!(publisher_id, page, "getting publisher authors");
        let url = authors_url(&self.base_url, publisher_id, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        authors_page(&response.body, &self.base_url, page)
    }

    /// List books in the publisher's catalog.
    pub fn get_books(
        &self,
        publisher_id: u64,
        page: u32,
    ) -> Result<Pagination<PublisherItem>, SkoobError> {
        info!(publisher_id, page, "getting publisher books");
        let url = books_url(&self.base_url, publisher_id, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        books_page(&response.body, &self.base_url, page)
    }
}

/// Asynchronous variant of [`PublisherService`].
pub struct AsyncPublisherService {
    transport: Arc<dyn AsyncHttpTransport>,
    base_url: String,
}

impl AsyncPublisherService {
    pub fn new(transport: Arc<dyn AsyncHttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Fetch a publisher's profile page with stats and latest releases.
    pub async fn get_by_id(&self, publisher_id: u64) -> Result<Publisher, SkoobError> {
        info!(publisher_id, "getting publisher");
        let url = profile_url(&self.base_url, publisher_id);
        let response = self.transport.get(&url).await?.error_for_status()?;
        let doc = Html::parse_document(&response.body);
        parse::parse_publisher(&doc, publisher_id, &self.base_url)
    }

    /// List authors published by the publisher.
    pub async fn get_authors(
        &self,
        publisher_id: u64,
        page: u32,
    ) -> Result<Pagination<PublisherAuthor>, SkoobError> {
        info!(publisher_id, page, "getting publisher authors");
        let url = authors_url(&self.base_url, publisher_id, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        authors_page(&response.body, &self.base_url, page)
    }

    /// List books in the publisher's catalog.
    pub async fn get_books(
        &self,
        publisher_id: u64,
        page: u32,
    ) -> Result<Pagination<PublisherItem>, SkoobError> {
        info!(publisher_id, page, "getting publisher books");
        let url = books_url(&self.base_url, publisher_id, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        books_page(&response.body, &self.base_url, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_site_scheme() {
        assert_eq!(
            profile_url("https://www.skoob.com.br", 7),
            "https://www.skoob.com.br/editora/7"
        );
        assert_eq!(
            authors_url("https://www.skoob.com.br", 7, 2),
            "https://www.skoob.com.br/editora/autores/7/mpage:2"
        );
        assert_eq!(
            books_url("https://www.skoob.com.br", 7, 3),
            "https://www.skoob.com.br/editora/livros/7/mpage:3"
        );
    }

    #[test]
    fn listing_pages_size_from_results() -> Result<(), SkoobError> {
        let body = r#"<div class="box_autor"><a href="/autor/50-fh"><img src="/50.jpg"></a><h3>Frank Herbert</h3></div>
<div class="proximo">2</div>"#;
        let result = authors_page(body, "https://www.skoob.com.br", 1)?;
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.total, 1);
        assert_eq!(result.limit, 1);
        assert!(result.has_next_page);
        Ok(())
    }
}
