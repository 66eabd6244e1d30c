use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Result entry returned by the author search page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSearchResult {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub nickname: String,
    pub img_url: String,
}

/// Aggregate statistics for an author profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorStats {
    pub followers: Option<u32>,
    pub readers: Option<u32>,
    pub ratings: Option<u32>,
    pub average_rating: Option<f64>,
    /// Star label (e.g. "5 estrelas") to percentage of ratings.
    pub star_ratings: HashMap<String, f64>,
}

/// Lightweight book thumbnail from an author's bibliography.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorBook {
    pub url: Option<String>,
    pub title: Option<String>,
    pub img_url: Option<String>,
}

/// Video referenced on an author's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorVideo {
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
}

/// Full author profile assembled from the profile page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub name: String,
    pub photo_url: Option<String>,
    /// Social network identifier (e.g. "facebook") to URL.
    pub links: HashMap<String, String>,
    pub description: String,
    pub tags: Vec<String>,
    pub birth_date: Option<String>,
    pub location: Option<String>,
    /// "male"/"female" to reader percentage.
    pub gender_percentages: HashMap<String, f64>,
    pub books: Vec<AuthorBook>,
    pub videos: Vec<AuthorVideo>,
    pub stats: AuthorStats,
    pub created_at: Option<String>,
    pub created_by: Option<String>,
    pub edited_at: Option<String>,
    pub edited_by: Option<String>,
    pub approved_at: Option<String>,
    pub approved_by: Option<String>,
}
