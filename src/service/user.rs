//! User profiles, relations, shelf reviews, reading goals and bookcases.
//! Every operation here requires a logged-in session.

use std::sync::Arc;

use scraper::Html;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::SkoobError;
use crate::http::{AsyncHttpTransport, HttpTransport};
use crate::model::{
    BookReview, BookcaseOption, BrazilianState, Pagination, User, UserBook, UserGender,
    UserReadStats, UserSearch, UsersRelation,
};
use crate::parse;
use crate::service::auth::Session;
use crate::service::{success_flag, user_from_record};

const RELATIONS_LIMIT: u32 = 100;
const REVIEWS_LIMIT: u32 = 50;
const BOOKCASE_LIMIT: u32 = 100;

fn profile_url(base_url: &str, user_id: u64) -> String {
    format!("{base_url}/v1/user/{user_id}/stats:true")
}

fn relations_url(base_url: &str, user_id: u64, relation: UsersRelation, page: u32) -> String {
    format!(
        "{base_url}/{}/listar/{user_id}/page:{page}/limit:{RELATIONS_LIMIT}",
        relation.slug()
    )
}

fn reviews_url(base_url: &str, user_id: u64, page: u32) -> String {
    format!("{base_url}/estante/resenhas/{user_id}/mpage:{page}/limit:{REVIEWS_LIMIT}")
}

fn read_stats_url(base_url: &str, user_id: u64) -> String {
    format!("{base_url}/v1/meta_stats/{user_id}")
}

fn bookcase_url(base_url: &str, user_id: u64, option: BookcaseOption, page: u32) -> String {
    format!(
        "{base_url}/v1/bookcase/books/{user_id}/shelf_id:{}/page:{page}/limit:{BOOKCASE_LIMIT}",
        option.code()
    )
}

fn search_url(
    base_url: &str,
    query: &str,
    gender: Option<UserGender>,
    state: Option<BrazilianState>,
    page: u32,
    limit: u32,
) -> String {
    let mut url = format!("{base_url}/usuario/lista/busca:{query}/mpage:{page}/limit:{limit}");
    if let Some(gender) = gender {
        url.push_str(&format!("/sexo:{}", gender.code()));
    }
    if let Some(state) = state {
        url.push_str(&format!("/uf:{}", state.code()));
    }
    url
}

fn user_from_payload(data: Value, base_url: &str, user_id: u64) -> Result<User, SkoobError> {
    if !success_flag(&data) {
        return Err(SkoobError::NotFound {
            message: format!("user {user_id} not found"),
        });
    }
    let record = data
        .get("response")
        .cloned()
        .ok_or_else(|| SkoobError::parse("user payload field 'response'"))?;
    user_from_record(record, base_url)
}

fn relations_page(body: &str, page: u32) -> Result<Pagination<u64>, SkoobError> {
    let doc = Html::parse_document(body);
    let results = parse::parse_relation_ids(&doc)?;
    Ok(Pagination {
        total: results.len() as u32,
        has_next_page: parse::has_any(&doc, "div.proximo")?,
        results,
        page,
        limit: RELATIONS_LIMIT,
    })
}

fn reviews_page(body: &str, user_id: u64, page: u32) -> Result<Pagination<BookReview>, SkoobError> {
    let doc = Html::parse_document(body);
    let results = parse::parse_user_reviews(&doc, user_id)?;
    Ok(Pagination {
        total: results.len() as u32,
        has_next_page: parse::has_next_page_label(&doc)?,
        results,
        page,
        limit: REVIEWS_LIMIT,
    })
}

/// Raw reading-goal record as served by the `meta_stats` endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReadStatsRecord {
    ano: i32,
    lido: u32,
    paginas_lidas: u32,
    paginas_total: u32,
    percentual_lido: f64,
    total: u32,
    velocidade_dia: f64,
    velocidade_ideal: f64,
}

fn read_stats_from_payload(data: Value, user_id: u64) -> Result<UserReadStats, SkoobError> {
    let record = data
        .get("response")
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    let record: ReadStatsRecord = serde_json::from_value(record)
        .map_err(|e| SkoobError::parse(format!("read stats for user {user_id}: {e}")))?;
    Ok(UserReadStats {
        user_id,
        year: record.ano,
        books_read: record.lido,
        pages_read: record.paginas_lidas,
        total_pages: record.paginas_total,
        percent_complete: record.percentual_lido,
        books_total: record.total,
        reading_speed: record.velocidade_dia,
        ideal_reading_speed: record.velocidade_ideal,
    })
}

/// Flags in bookcase records arrive as booleans or 0/1 numbers.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty() && s != "0",
        _ => false,
    }
}

fn user_book_from_record(record: &Value, user_id: u64) -> Option<UserBook> {
    let edition = record.get("edicao")?;
    Some(UserBook {
        user_id,
        book_id: edition.get("livro_id").and_then(Value::as_u64)?,
        edition_id: edition.get("id").and_then(Value::as_u64)?,
        rating: record.get("ranking").and_then(Value::as_f64),
        is_favorite: truthy(record.get("favorito")),
        is_wishlist: truthy(record.get("desejado")),
        is_tradable: truthy(record.get("troco")),
        is_owned: truthy(record.get("tenho")),
        is_loaned: truthy(record.get("emprestei")),
        reading_goal_year: record.get("meta").and_then(Value::as_i64).map(|v| v as i32),
        pages_read: record
            .get("paginas_lidas")
            .and_then(Value::as_u64)
            .map(|v| v as u32),
    })
}

fn bookcase_page(data: Value, user_id: u64, page: u32) -> Result<Pagination<UserBook>, SkoobError> {
    let has_next_page = data
        .get("paging")
        .and_then(|p| p.get("next_page"))
        .map(|v| !v.is_null() && truthy(Some(v)))
        .unwrap_or(false);
    let results: Vec<UserBook> = data
        .get("response")
        .and_then(Value::as_array)
        .map(|records| {
            records
                .iter()
                .filter_map(|r| user_book_from_record(r, user_id))
                .collect()
        })
        .unwrap_or_default();
    Ok(Pagination {
        total: results.len() as u32,
        has_next_page,
        results,
        page,
        limit: BOOKCASE_LIMIT,
    })
}

fn search_page(
    body: &str,
    base_url: &str,
    page: u32,
    limit: u32,
) -> Result<Pagination<UserSearch>, SkoobError> {
    let doc = Html::parse_document(body);
    let results = parse::parse_user_search_results(&doc, base_url)?;
    Ok(Pagination {
        total: parse::extract_user_search_total(&doc)?,
        has_next_page: parse::has_any(&doc, "a.proximo")?,
        results,
        page,
        limit,
    })
}

/// Fetches user profiles, relations and shelves. Requires authentication.
pub struct UserService {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    session: Arc<Session>,
}

impl UserService {
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

    /// Fetch a user's profile by ID.
    pub fn get_by_id(&self, user_id: u64) -> Result<User, SkoobError> {
        self.session.require_login()?;
        info!(user_id, "getting user");
        let url = profile_url(&self.base_url, user_id);
        let response = self.transport.get(&url)?.error_for_status()?;
        let user = user_from_payload(response.json()?, &self.base_url, user_id)?;
        info!(user = %user.name, "retrieved user");
        Ok(user)
    }

    /// List IDs of the user's friends, followed users or followers.
    pub fn get_relations(
        &self,
        user_id: u64,
        relation: UsersRelation,
        page: u32,
    ) -> Result<Pagination<u64>, SkoobError> {
        self.session.require_login()?;
        info!(user_id, relation = relation.slug(), page, "getting user relations");
        let url = relations_url(&self.base_url, user_id, relation, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        relations_page(&response.body, page)
    }

    /// Fetch reviews written by the user.
    pub fn get_reviews(&self, user_id: u64, page: u32) -> Result<Pagination<BookReview>, SkoobError> {
        self.session.require_login()?;
        info!(user_id, page, "getting user reviews");
        let url = reviews_url(&self.base_url, user_id, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        reviews_page(&response.body, user_id, page)
    }

    /// Fetch the user's reading-goal progress for the current year.
    pub fn get_read_stats(&self, user_id: u64) -> Result<UserReadStats, SkoobError> {
        self.session.require_login()?;
        info!(user_id, "getting read stats");
        let url = read_stats_url(&self.base_url, user_id);
        let response = self.transport.get(&url)?.error_for_status()?;
        read_stats_from_payload(response.json()?, user_id)
    }

    /// Fetch one shelf of the user's bookcase.
    pub fn get_bookcase(
        &self,
        user_id: u64,
        option: BookcaseOption,
        page: u32,
    ) -> Result<Pagination<UserBook>, SkoobError> {
        self.session.require_login()?;
        info!(user_id, shelf = option.code(), page, "getting bookcase");
        let url = bookcase_url(&self.base_url, user_id, option, page);
        let response = self.transport.get(&url)?.error_for_status()?;
        bookcase_page(response.json()?, user_id, page)
    }

    /// Search users by name, optionally filtered by gender and state.
    pub fn search(
        &self,
        query: &str,
        gender: Option<UserGender>,
        state: Option<BrazilianState>,
        page: u32,
        limit: u32,
    ) -> Result<Pagination<UserSearch>, SkoobError> {
        self.session.require_login()?;
        info!(query, page, "searching users");
        let url = search_url(&self.base_url, query, gender, state, page, limit);
        let response = self.transport.get(&url)?.error_for_status()?;
        search_page(&response.body, &self.base_url, page, limit)
    }
}

/// Asynchronous variant of [`UserService`].
pub struct AsyncUserService {
    transport: Arc<dyn AsyncHttpTransport>,
    base_url: String,
    session: Arc<Session>,
}

impl AsyncUserService {
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

    /// Fetch a user's profile by ID.
    pub async fn get_by_id(&self, user_id: u64) -> Result<User, SkoobError> {
        self.session.require_login()?;
        info!(user_id, "getting user");
        let url = profile_url(&self.base_url, user_id);
        let response = self.transport.get(&url).await?.error_for_status()?;
        user_from_payload(response.json()?, &self.base_url, user_id)
    }

    /// List IDs of the user's friends, followed users or followers.
    pub async fn get_relations(
        &self,
        user_id: u64,
        relation: UsersRelation,
        page: u32,
    ) -> Result<Pagination<u64>, SkoobError> {
        self.session.require_login()?;
        info!(user_id, relation = relation.slug(), page, "getting user relations");
        let url = relations_url(&self.base_url, user_id, relation, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        relations_page(&response.body, page)
    }

    /// Fetch reviews written by the user.
    pub async fn get_reviews(
        &self,
        user_id: u64,
        page: u32,
    ) -> Result<Pagination<BookReview>, SkoobError> {
        self.session.require_login()?;
        info!(user_id, page, "getting user reviews");
        let url = reviews_url(&self.base_url, user_id, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        reviews_page(&response.body, user_id, page)
    }

    /// Fetch the user's reading-goal progress for the current year.
    pub async fn get_read_stats(&self, user_id: u64) -> Result<UserReadStats, SkoobError> {
        self.session.require_login()?;
        info!(user_id, "getting read stats");
        let url = read_stats_url(&self.base_url, user_id);
        let response = self.transport.get(&url).await?.error_for_status()?;
        read_stats_from_payload(response.json()?, user_id)
    }

    /// Fetch one shelf of the user's bookcase.
    pub async fn get_bookcase(
        &self,
        user_id: u64,
        option: BookcaseOption,
        page: u32,
    ) -> Result<Pagination<UserBook>, SkoobError> {
        self.session.require_login()?;
        info!(user_id, shelf = option.code(), page, "getting bookcase");
        let url = bookcase_url(&self.base_url, user_id, option, page);
        let response = self.transport.get(&url).await?.error_for_status()?;
        bookcase_page(response.json()?, user_id, page)
    }

    /// Search users by name, optionally filtered by gender and state.
    pub async fn search(
        &self,
        query: &str,
        gender: Option<UserGender>,
        state: Option<BrazilianState>,
        page: u32,
        limit: u32,
    ) -> Result<Pagination<UserSearch>, SkoobError> {
        self.session.require_login()?;
        info!(query, page, "searching users");
        let url = search_url(&self.base_url, query, gender, state, page, limit);
        let response = self.transport.get(&url).await?.error_for_status()?;
        search_page(&response.body, &self.base_url, page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urls_follow_site_scheme() {
        let base = "https://www.skoob.com.br";
        assert_eq!(profile_url(base, 5), "https://www.skoob.com.br/v1/user/5/stats:true");
        assert_eq!(
            relations_url(base, 5, UsersRelation::Friends, 2),
            "https://www.skoob.com.br/amigos/listar/5/page:2/limit:100"
        );
        assert_eq!(
            reviews_url(base, 5, 1),
            "https://www.skoob.com.br/estante/resenhas/5/mpage:1/limit:50"
        );
        assert_eq!(
            bookcase_url(base, 5, BookcaseOption::Read, 1),
            "https://www.skoob.com.br/v1/bookcase/books/5/shelf_id:1/page:1/limit:100"
        );
        assert_eq!(
            search_url(
                base,
                "maria",
                Some(UserGender::Female),
                Some(BrazilianState::SaoPaulo),
                1,
                100
            ),
            "https://www.skoob.com.br/usuario/lista/busca:maria/mpage:1/limit:100/sexo:F/uf:SP"
        );
    }

    #[test]
    fn missing_user_is_not_found() {
        let data = json!({"success": false});
        assert!(matches!(
            user_from_payload(data, "https://www.skoob.com.br", 5),
            Err(SkoobError::NotFound { .. })
        ));
    }

    #[test]
    fn read_stats_map_portuguese_fields() -> Result<(), SkoobError> {
        let data = json!({
            "success": true,
            "response": {
                "ano": 2024,
                "lido": 12,
                "paginas_lidas": 3400,
                "paginas_total": 9000,
                "percentual_lido": 37.7,
                "total": 30,
                "velocidade_dia": 11.2,
                "velocidade_ideal": 18.0
            }
        });
        let stats = read_stats_from_payload(data, 5)?;
        assert_eq!(stats.user_id, 5);
        assert_eq!(stats.year, 2024);
        assert_eq!(stats.books_read, 12);
        assert_eq!(stats.percent_complete, 37.7);
        Ok(())
    }

    #[test]
    fn bookcase_page_maps_records_and_paging() -> Result<(), SkoobError> {
        let data = json!({
            "success": true,
            "paging": {"next_page": 2},
            "response": [
                {
                    "edicao": {"id": 9000, "livro_id": 42},
                    "ranking": 4.5,
                    "favorito": 1,
                    "desejado": 0,
                    "troco": false,
                    "tenho": true,
                    "emprestei": 0,
                    "meta": 2024,
                    "paginas_lidas": 120
                },
                {"ranking": 3.0}
            ]
        });
        let result = bookcase_page(data, 5, 1)?;
        assert_eq!(result.results.len(), 1);
        let book = &result.results[0];
        assert_eq!(book.book_id, 42);
        assert_eq!(book.edition_id, 9000);
        assert_eq!(book.rating, Some(4.5));
        assert!(book.is_favorite);
        assert!(!book.is_wishlist);
        assert!(book.is_owned);
        assert_eq!(book.reading_goal_year, Some(2024));
        assert_eq!(book.pages_read, Some(120));
        assert!(result.has_next_page);
        Ok(())
    }

    #[test]
    fn bookcase_last_page_has_no_next() -> Result<(), SkoobError> {
        let data = json!({"success": true, "paging": {"next_page": null}, "response": []});
        let result = bookcase_page(data, 5, 3)?;
        assert!(result.results.is_empty());
        assert!(!result.has_next_page);
        Ok(())
    }
}
