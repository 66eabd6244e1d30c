use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregated statistics about a book, from the `estatisticas` API block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookStats {
    #[serde(rename = "qt_lido")]
    pub readers: u32,
    #[serde(rename = "qt_lendo")]
    pub currently_reading: u32,
    #[serde(rename = "qt_vouler")]
    pub want_to_read: u32,
    #[serde(rename = "qt_relendo")]
    pub rereading: u32,
    #[serde(rename = "qt_abandonei")]
    pub abandoned: u32,

    #[serde(rename = "qt_resenhas")]
    pub reviews_count: u32,
    #[serde(rename = "ranking")]
    pub average_rating: f64,
    #[serde(rename = "qt_avaliadores")]
    pub ratings_count: u32,
    #[serde(rename = "qt_favoritos")]
    pub favorites_count: u32,
    #[serde(rename = "qt_desejados")]
    pub wishlist_count: u32,
    #[serde(rename = "qt_troco")]
    pub tradable_count: u32,
    #[serde(rename = "qt_emprestados")]
    pub loaned_count: u32,
    #[serde(rename = "qt_tenho")]
    pub owned_count: u32,
    #[serde(rename = "qt_meta")]
    pub reading_goals_count: u32,
    #[serde(rename = "qt_mulheres")]
    pub female_readers_count: u32,
    #[serde(rename = "qt_homens")]
    pub male_readers_count: u32,
    #[serde(rename = "qt_estantes")]
    pub shelves_count: u32,
}

/// Detailed information about a book edition, from the `/v1/book` API.
///
/// Deserialized after [`clean_book_json`](crate::parse::clean_book_json) has
/// normalized the raw record's quirkier fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "livro_id")]
    pub book_id: u64,
    #[serde(rename = "id")]
    pub edition_id: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "subtitulo", default)]
    pub subtitle: Option<String>,
    #[serde(rename = "serie", default)]
    pub series: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(rename = "autor", default)]
    pub authors: Option<String>,
    #[serde(rename = "sinopse", default)]
    pub description: Option<String>,
    #[serde(rename = "editora", default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(rename = "paginas", default)]
    pub page_count: u32,
    #[serde(rename = "ano", default)]
    pub publication_year: Option<i32>,
    #[serde(rename = "mes", default)]
    pub publication_month: Option<u32>,
    #[serde(rename = "idioma", default)]
    pub language: Option<String>,
    pub url: String,
    pub cover_url: String,
    #[serde(rename = "generos", default)]
    pub genres: Option<Vec<String>>,

    #[serde(rename = "estatisticas", default)]
    pub stats: Option<BookStats>,
}

/// Lightweight representation returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSearchResult {
    pub edition_id: u64,
    pub book_id: u64,
    pub title: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    pub url: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// User review for a specific book edition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookReview {
    pub review_id: u64,
    pub book_id: u64,
    pub edition_id: Option<u64>,
    pub user_id: u64,

    pub rating: f64,
    pub review_text: String,
    pub reviewed_at: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_deserializes_from_cleaned_api_record() -> Result<(), serde_json::Error> {
        let json = r#"{
            "id": 9000,
            "livro_id": 42,
            "titulo": "Duna",
            "subtitulo": "",
            "serie": "Duna",
            "volume": "1",
            "autor": "Frank Herbert",
            "sinopse": "Uma aventura no deserto.",
            "editora": "Aleph",
            "isbn": "9788576572008",
            "paginas": 680,
            "ano": 2017,
            "mes": 3,
            "idioma": "Português",
            "url": "https://www.skoob.com.br/livro/42-ed9000.html",
            "cover_url": "https://cache.skoob.com.br/local/img/42.jpg",
            "generos": ["Ficção científica"],
            "estatisticas": {
                "qt_lido": 10, "qt_lendo": 2, "qt_vouler": 5, "qt_relendo": 1,
                "qt_abandonei": 0, "qt_resenhas": 3, "ranking": 4.5,
                "qt_avaliadores": 8, "qt_favoritos": 4, "qt_desejados": 6,
                "qt_troco": 0, "qt_emprestados": 1, "qt_tenho": 9,
                "qt_meta": 2, "qt_mulheres": 5, "qt_homens": 5, "qt_estantes": 12
            }
        }"#;
        let book: Book = serde_json::from_str(json)?;
        assert_eq!(book.edition_id, 9000);
        assert_eq!(book.book_id, 42);
        assert_eq!(book.title, "Duna");
        assert_eq!(book.isbn.as_deref(), Some("9788576572008"));
        assert_eq!(book.page_count, 680);
        let stats = book.stats.expect("stats present");
        assert_eq!(stats.readers, 10);
        assert!((stats.average_rating - 4.5).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn optional_fields_default_when_absent() -> Result<(), serde_json::Error> {
        let json = r#"{
            "id": 1,
            "livro_id": 1,
            "titulo": "Sem Metadados",
            "url": "https://www.skoob.com.br/livro/1-ed1.html",
            "cover_url": ""
        }"#;
        let book: Book = serde_json::from_str(json)?;
        assert!(book.isbn.is_none());
        assert!(book.series.is_none());
        assert!(book.genres.is_none());
        assert!(book.stats.is_none());
        assert_eq!(book.page_count, 0);
        Ok(())
    }
}
