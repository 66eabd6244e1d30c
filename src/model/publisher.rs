use serde::{Deserialize, Serialize};

/// Aggregated statistics about a publisher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublisherStats {
    pub followers: Option<u32>,
    pub average_rating: Option<f64>,
    pub ratings: Option<u32>,
    pub male_percentage: Option<u32>,
    pub female_percentage: Option<u32>,
}

/// Book entry in a publisher listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherItem {
    pub url: String,
    pub title: String,
    pub img_url: String,
}

/// Author associated with a publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherAuthor {
    pub url: String,
    pub name: String,
    pub img_url: String,
}

/// Detailed information about a publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publisher {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub stats: PublisherStats,
    pub last_releases: Vec<PublisherItem>,
}
