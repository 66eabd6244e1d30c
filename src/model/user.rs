use serde::{Deserialize, Serialize};

/// Minimal user information returned by the user search page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSearch {
    pub id: u64,
    pub username: String,
    pub name: String,
    pub url: String,
}

/// Profile information for a user, from the `/v1/user` API.
///
/// `profile_url` is not part of the raw record; the services compose it from
/// the base URL before deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "apelido", default)]
    pub nickname: String,
    #[serde(rename = "abbr", default)]
    pub abbreviation: String,

    pub profile_url: String,
    #[serde(rename = "skoob", default)]
    pub username: String,

    #[serde(rename = "foto_mini", default)]
    pub photo_mini: String,
    #[serde(rename = "foto_pequena", default)]
    pub photo_small: String,
    #[serde(rename = "foto_media", default)]
    pub photo_medium: String,
    #[serde(rename = "foto_grande", default)]
    pub photo_large: String,

    #[serde(rename = "premium", default)]
    pub is_premium: bool,
    #[serde(rename = "beta", default)]
    pub is_beta_user: bool,

    #[serde(default)]
    pub about: String,
    #[serde(rename = "ano", default)]
    pub signup_year: i32,
    #[serde(rename = "mes", default)]
    pub signup_month: u32,
    /// Terms-acceptance timestamp, kept verbatim as reported by the API.
    #[serde(rename = "termo", default)]
    pub signup_term: Option<String>,

    #[serde(rename = "estatisticas", default)]
    pub stats: UserStats,
}

/// Status of a specific book in a user's shelf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBook {
    pub user_id: u64,
    pub book_id: u64,
    pub edition_id: u64,

    pub rating: Option<f64>,
    pub is_favorite: bool,
    pub is_wishlist: bool,
    pub is_tradable: bool,
    pub is_owned: bool,
    pub is_loaned: bool,
    pub reading_goal_year: Option<i32>,
    pub pages_read: Option<u32>,
}

/// Reading-goal progress for a particular year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserReadStats {
    pub user_id: u64,
    pub year: i32,

    pub books_read: u32,
    pub pages_read: u32,
    pub total_pages: u32,
    pub percent_complete: f64,
    pub books_total: u32,
    pub reading_speed: f64,
    pub ideal_reading_speed: f64,
}

/// Aggregated activity counters, from the `estatisticas` API block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(rename = "livros", default)]
    pub books: u32,
    #[serde(rename = "revistas", default)]
    pub magazines: u32,
    #[serde(rename = "quadrinhos", default)]
    pub comics: u32,
    #[serde(rename = "amigos", default)]
    pub friends: u32,
    #[serde(rename = "seguidos", default)]
    pub following: u32,
    #[serde(rename = "seguidores", default)]
    pub followers: u32,
    #[serde(rename = "recados", default)]
    pub messages: u32,
    #[serde(rename = "paginometro", default)]
    pub pages_read: u32,
    #[serde(rename = "lido", default)]
    pub books_read: u32,
    #[serde(rename = "lendo", default)]
    pub currently_reading: u32,
    #[serde(rename = "vouler", default)]
    pub want_to_read: u32,
    #[serde(rename = "relendo", default)]
    pub rereading: u32,
    #[serde(rename = "abandonei", default)]
    pub abandoned: u32,
    #[serde(rename = "tenho", default)]
    pub owned: u32,
    #[serde(rename = "troco", default)]
    pub tradable: u32,
    #[serde(rename = "emprestados", default)]
    pub loaned: u32,
    #[serde(rename = "favoritos", default)]
    pub favorites: u32,
    #[serde(rename = "desejados", default)]
    pub wishlist: u32,
    #[serde(rename = "meta", default)]
    pub reading_goal: u32,
    #[serde(rename = "videos", default)]
    pub videos: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_deserializes_from_api_record() -> Result<(), serde_json::Error> {
        let json = r#"{
            "id": 5,
            "nome": "Maria Silva",
            "apelido": "maria",
            "abbr": "MS",
            "profile_url": "https://www.skoob.com.br/usuario/5-maria",
            "skoob": "maria",
            "foto_mini": "https://cache.skoob.com.br/mini.jpg",
            "foto_pequena": "https://cache.skoob.com.br/p.jpg",
            "foto_media": "https://cache.skoob.com.br/m.jpg",
            "foto_grande": "https://cache.skoob.com.br/g.jpg",
            "premium": true,
            "beta": false,
            "about": "leitora",
            "ano": 2015,
            "mes": 7,
            "termo": "2015-07-01 10:00:00",
            "estatisticas": {"livros": 120, "amigos": 4, "lido": 80}
        }"#;
        let user: User = serde_json::from_str(json)?;
        assert_eq!(user.id, 5);
        assert_eq!(user.name, "Maria Silva");
        assert!(user.is_premium);
        assert_eq!(user.stats.books, 120);
        assert_eq!(user.stats.books_read, 80);
        assert_eq!(user.stats.videos, 0);
        Ok(())
    }
}
