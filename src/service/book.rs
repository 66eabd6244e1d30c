//! Book search, detail lookup, reviews and reader listings.

use std::sync::Arc;

use scraper::Html;
use serde_json::Value;
use tracing::info;

use crate::error::SkoobError;
use crate::http::{AsyncHttpTransport, HttpTransport};
use crate::model::{Book, BookReview, BookSearch, BookSearchResult, BookUserStatus, Pagination};
use crate::parse;

const SEARCH_LIMIT: u32 = 30;
const REVIEWS_LIMIT: u32 = 50;

fn search_url(base_url: &str, query: &str, search_by: BookSearch, page: u32) -> String {
    format!(
        "{base_url}/livro/lista/busca:{query}/tipo:{}/mpage:{page}",
        search_by.slug()
    )
}

fn detail_url(base_url: &str, edition_id: u64) -> String {
    format!("{base_url}/v1/book/{edition_id}/stats:true")
}

fn reviews_url(base_url: &str, book_id: u64, edition_id: Option<u64>, page: u32) -> String {
    let mut url = format!("{base_url}/livro/resenhas/{book_id}/mpage:{page}/limit:{REVIEWS_LIMIT}");
    if let Some(edition_id) = edition_id {
        url.push_str(&format!("/edition:{edition_id}"));
    }
    url
}

fn readers_url(
    base_url: &str,
    book_id: u64,
    status: BookUserStatus,
    edition_id: Option<u64>,
    limit: u32,
    page: u32,
) -> String {
    let mut url = format!(
        "{base_url}/livro/leitores/{}/{book_id}/limit:{limit}/page:{page}",
        status.slug()
    );
    if let Some(edition_id) = edition_id {
        url.push_str(&format!("/edition:{edition_id}"));
    }
    url
}

fn search_page(
    body: &str,
    base_url: &str,
    page: u32,
) -> Result<Pagination<BookSearchResult>, SkoobError> {
    let doc = Html::parse_document(body);
    let results = parse::parse_search_results(&doc, base_url)?;
    let total = parse::extract_total_results(&doc)?;
    Ok(Pagination {
        has_next_page: page * SEARCH_LIMIT < total,
        results,
        total,
        page,
        limit: SEARCH_LIMIT,
    })
}

fn book_from_payload(data: Value, base_url: &str, edition_id: u64) -> Result<Book, SkoobError> {
    let record = match data.get("response") {
        Some(record) if !record.is_null() => record.clone(),
        _ => {
            let description = data
                .get("cod_description")
                .and_then(Value::as_str)
                .unwrap_or("no description provided");
            return Err(SkoobError::NotFound {
                message: format!("no book for edition {edition_id}: {description}"),
            });
        }
    };
    let cleaned = parse::clean_book_json(record, base_url)?;
    serde_json::from_value(cleaned)
        .map_err(|e| SkoobError::parse(format!("book record for edition {edition_id}: {e}")))
}

fn reviews_page(
    body: &str,
    book_id: u64,
    edition_id: Option<u64>,
    page: u32,
) -> Result<Pagination<BookReview>, SkoobError> {
    let doc = Html::parse_document(body);
    let edition_id = match edition_id {
        Some(edition_id) => Some(edition_id),
        None => parse::extract_edition_id_from_reviews_page(&doc)?,
    };
    let results = parse::parse_reviews(&doc, book_id, edition_id)?;
    Ok(Pagination {
        total: results.len() as u32,
        has_next_page: parse::has_any(&doc, "a.proximo")?,
        results,
        page,
        limit: REVIEWS_LIMIT,
    })
}

fn readers_page(body: &str, limit: u32, page: u32) -> Result<Pagination<u64>, SkoobError> {
    let doc = Html::parse_document(body);
    let results = parse::extract_user_ids(&doc)?;
    Ok(Pagination {
        total: results.len() as u32,
        has_next_page: parse::has_any(&doc, "a.proximo")?,
        results,
        page,
        limit,
    })
}

/// Searches and retrieves books. Works without authentication.
pub struct BookService {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl BookService {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Search books by query. Pages carry up to 30 results; the reported
    /// total drives `has_next_page`.
    pub fn search(
        &self,
        query: &str,
        search_by: BookSearch,
        page: u32,
    ) -> Result<Pagination<BookSearchResult>, SkoobError> {
        info!(query, page, "searching books");
        let url = search_url(&self.base_url, query, search_by, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        let result = search_page(&response.body, &self.base_url, page)?;
        info!(found = result.results.len(), total = result.total, page, "book search done");
        Ok(result)
    }

    /// Fetch one book edition's full record.
    pub fn get_by_id(&self, edition_id: u64) -> Result<Book, SkoobError> {
        info!(edition_id, "getting book");
        let url = detail_url(&self.base_url, edition_id);
        let response = self.transport.get(&url)?.error_for_status()?;
        let book = book_from_payload(response.json()?, &self.base_url, edition_id)?;
        info!(title = %book.title, edition_id, "retrieved book");
        Ok(book)
    }

    /// Fetch reviews for a book. When `edition_id` is absent it is recovered
    /// from the page's navigation menu.
    pub fn get_reviews(
        &self,
        book_id: u64,
        edition_id: Option<u64>,
        page: u32,
    ) -> Result<Pagination<BookReview>, SkoobError> {
        info!(book_id, page, "getting book reviews");
        let url = reviews_url(&self.base_url, book_id, edition_id, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        let result = reviews_page(&response.body, book_id, edition_id, page)?;
        info!(found = result.results.len(), page, "book reviews done");
        Ok(result)
    }

    /// List IDs of users who shelved the book under `status`.
    pub fn get_users_by_status(
        &self,
        book_id: u64,
        status: BookUserStatus,
        edition_id: Option<u64>,
        limit: u32,
        page: u32,
    ) -> Result<Pagination<u64>, SkoobError> {
        info!(book_id, status = status.slug(), page, "getting users by status");
        let url = readers_url(&self.base_url, book_id, status, edition_id, limit, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        let result = readers_page(&response.body, limit, page)?;
        info!(found = result.results.len(), page, "users by status done");
        Ok(result)
    }
}

/// Asynchronous variant of [`BookService`].
pub struct AsyncBookService {
    transport: Arc<dyn AsyncHttpTransport>,
    base_url: String,
}

impl AsyncBookService {
    pub fn new(transport: Arc<dyn AsyncHttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Search books by query.
    pub async fn search(
        &self,
        query: &str,
        search_by: BookSearch,
        page: u32,
    ) -> Result<Pagination<BookSearchResult>, SkoobError> {
        info!(query, page, "searching books");
        let url = search_url(&self.base_url, query, search_by, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        search_page(&response.body, &self.base_url, page)
    }

    /// Fetch one book edition's full record.
    pub async fn get_by_id(&self, edition_id: u64) -> Result<Book, SkoobError> {
        info!(edition_id, "getting book");
        let url = detail_url(&self.base_url, edition_id);
        let response = self.transport.get(&url).await?.error_for_status()?;
        book_from_payload(response.json()?, &self.base_url, edition_id)
    }

    /// Fetch reviews for a book.
    pub async fn get_reviews(
        &self,
        book_id: u64,
        edition_id: Option<u64>,
        page: u32,
    ) -> Result<Pagination<BookReview>, SkoobError> {
        info!(book_id, page, "getting book reviews");
        let url = reviews_url(&self.base_url, book_id, edition_id, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        reviews_page(&response.body, book_id, edition_id, page)
    }

    /// List IDs of users who shelved the book under `status`.
    pub async fn get_users_by_status(
        &self,
        book_id: u64,
        status: BookUserStatus,
        edition_id: Option<u64>,
        limit: u32,
        page: u32,
    ) -> Result<Pagination<u64>, SkoobError> {
        info!(book_id, status = status.slug(), page, "getting users by status");
        let url = readers_url(&self.base_url, book_id, status, edition_id, limit, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        readers_page(&response.body, limit, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urls_follow_site_scheme() {
        assert_eq!(
            search_url("https://www.skoob.com.br", "duna", BookSearch::Title, 2),
            "https://www.skoob.com.br/livro/lista/busca:duna/tipo:titulo/mpage:2"
        );
        assert_eq!(
            detail_url("https://www.skoob.com.br", 9000),
            "https://www.skoob.com.br/v1/book/9000/stats:true"
        );
        assert_eq!(
            reviews_url("https://www.skoob.com.br", 42, Some(9000), 1),
            "https://www.skoob.com.br/livro/resenhas/42/mpage:1/limit:50/edition:9000"
        );
        assert_eq!(
            readers_url(
                "https://www.skoob.com.br",
                42,
                BookUserStatus::Read,
                None,
                500,
                3
            ),
            "https://www.skoob.com.br/livro/leitores/leram/42/limit:500/page:3"
        );
    }

    #[test]
    fn search_page_reports_next_from_total() -> Result<(), SkoobError> {
        let body = r#"<div class="contador">61 encontrados</div>"#;
        let first = search_page(body, "https://www.skoob.com.br", 1)?;
        assert!(first.has_next_page);
        let last = search_page(body, "https://www.skoob.com.br", 3)?;
        assert!(!last.has_next_page);
        Ok(())
    }

    #[test]
    fn missing_book_payload_is_not_found() {
        let data = json!({"success": false, "cod_description": "Edição não encontrada"});
        match book_from_payload(data, "https://www.skoob.com.br", 77) {
            Err(SkoobError::NotFound { message }) => {
                assert!(message.contains("77"));
                assert!(message.contains("Edição não encontrada"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn book_payload_is_cleaned_before_decoding() -> Result<(), SkoobError> {
        let data = json!({
            "success": true,
            "response": {
                "id": 9000,
                "livro_id": 42,
                "titulo": "Duna",
                "isbn": "0",
                "url": "/livro/42-ed9000.html",
                "img_url": "//cache.skoob.com.br/42.jpg"
            }
        });
        let book = book_from_payload(data, "https://www.skoob.com.br", 9000)?;
        assert_eq!(book.title, "Duna");
        assert!(book.isbn.is_none());
        assert_eq!(book.url, "https://www.skoob.com.br/livro/42-ed9000.html");
        assert_eq!(book.cover_url, "https://cache.skoob.com.br/42.jpg");
        Ok(())
    }

    #[test]
    fn reviews_page_recovers_edition_from_menu() -> Result<(), SkoobError> {
        let body = r#"<div id="pg-livro-menu-principal-container">
<a href="/livro/42-duna-ed9000.html">Duna</a></div>
<div id="resenha555">
  <a href="/usuario/12-ana">Ana</a>
  <star-rating rate="4"></star-rating>
  <div id="resenhac555"><span>01/02/2020</span>Boa.</div>
</div>
<a class="proximo" href="/livro/resenhas/42/mpage:2">2</a>"#;
        let result = reviews_page(body, 42, None, 1)?;
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].edition_id, Some(9000));
        assert!(result.has_next_page);
        assert_eq!(result.total, 1);
        Ok(())
    }

    #[test]
    fn readers_page_collects_ids() -> Result<(), SkoobError> {
        let body = r#"<div class="livro-leitor-container"><a href="/usuario/5-m"></a></div>"#;
        let result = readers_page(body, 500, 1)?;
        assert_eq!(result.results, vec![5]);
        assert!(!result.has_next_page);
        assert_eq!(result.limit, 500);
        Ok(())
    }
}
