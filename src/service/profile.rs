//! Bookshelf actions on the authenticated user's own profile.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::error::SkoobError;
use crate::http::{AsyncHttpTransport, HttpTransport};
use crate::model::{BookLabel, BookShelf, BookStatus};
use crate::service::auth::Session;
use crate::service::success_flag;

fn label_add_url(base_url: &str, edition_id: u64, label: BookLabel) -> String {
    format!("{base_url}/v1/label_add/{edition_id}/{}", label.code())
}

fn label_del_url(base_url: &str, edition_id: u64) -> String {
    format!("{base_url}/v1/label_del/{edition_id}")
}

fn shelf_add_url(base_url: &str, edition_id: u64, status: BookStatus) -> String {
    format!("{base_url}/v1/shelf_add/{edition_id}/{}", status.code())
}

fn shelf_del_url(base_url: &str, edition_id: u64) -> String {
    format!("{base_url}/v1/shelf_del/{edition_id}")
}

fn change_shelf_url(base_url: &str, edition_id: u64, shelf: BookShelf) -> String {
    format!("{base_url}/estante/prateleira/{edition_id}/{}", shelf.slug())
}

fn rate_url(base_url: &str, edition_id: u64, rating: f64) -> String {
    format!("{base_url}/v1/book_rate/{edition_id}/{rating}")
}

fn check_rating(rating: f64) -> Result<(), SkoobError> {
    if (0.0..=5.0).contains(&rating) {
        Ok(())
    } else {
        Err(SkoobError::InvalidRating { value: rating })
    }
}

fn rating_accepted(data: &Value) -> Result<bool, SkoobError> {
    if success_flag(data) {
        Ok(true)
    } else {
        Err(SkoobError::ActionFailed {
            action: "rate_book".to_string(),
        })
    }
}

/// Manages labels, statuses, shelves and ratings on the logged-in user's
/// bookcase. Every call requires authentication.
pub struct ProfileService {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    session: Arc<Session>,
}

impl ProfileService {
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

    fn action(&self, url: &str) -> Result<bool, SkoobError> {
        self.session.require_login()?;
        let response = self.transport.get(url)?.error_for_status()?;
        Ok(success_flag(&response.json()?))
    }

    /// Tag an edition with a label such as favorite or wishlist.
    pub fn add_book_label(&self, edition_id: u64, label: BookLabel) -> Result<bool, SkoobError> {
        info!(edition_id, label = label.code(), "adding book label");
        self.action(&label_add_url(&self.base_url, edition_id, label))
    }

    /// Clear the label from an edition.
    pub fn remove_book_label(&self, edition_id: u64) -> Result<bool, SkoobError> {
        info!(edition_id, "removing book label");
        self.action(&label_del_url(&self.base_url, edition_id))
    }

    /// Set the reading status of an edition.
    pub fn update_book_status(
        &self,
        edition_id: u64,
        status: BookStatus,
    ) -> Result<bool, SkoobError> {
        info!(edition_id, status = status.code(), "updating book status");
        self.action(&shelf_add_url(&self.base_url, edition_id, status))
    }

    /// Clear the reading status of an edition.
    pub fn remove_book_status(&self, edition_id: u64) -> Result<bool, SkoobError> {
        info!(edition_id, "removing book status");
        self.action(&shelf_del_url(&self.base_url, edition_id))
    }

    /// Move an edition to another bookshelf.
    pub fn change_book_shelf(&self, edition_id: u64, shelf: BookShelf) -> Result<bool, SkoobError> {
        info!(edition_id, shelf = shelf.slug(), "changing book shelf");
        self.action(&change_shelf_url(&self.base_url, edition_id, shelf))
    }

    /// Rate an edition from 0 to 5 stars.
    pub fn rate_book(&self, edition_id: u64, rating: f64) -> Result<bool, SkoobError> {
        self.session.require_login()?;
        check_rating(rating)?;
        info!(edition_id, rating, "rating book");
        let url = rate_url(&self.base_url, edition_id, rating);
        let response = self.transport.get(&url)?.error_for_status()?;
        rating_accepted(&response.json()?)
    }
}

/// Asynchronous variant of [`ProfileService`].
pub struct AsyncProfileService {
    transport: Arc<dyn AsyncHttpTransport>,
    base_url: String,
    session: Arc<Session>,
}

impl AsyncProfileService {
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

    async fn action(&self, url: &str) -> Result<bool, SkoobError> {
        self.session.require_login()?;
        let response = self.transport.get(url).await?.error_for_status()?;
        Ok(success_flag(&response.json()?))
    }

    /// Tag an edition with a label such as favorite or wishlist.
    pub async fn add_book_label(
        &self,
        edition_id: u64,
        label: BookLabel,
    ) -> Result<bool, SkoobError> {
        info!(edition_id, label = label.code(), "adding book label");
        self.action(&label_add_url(&self.base_url, edition_id, label))
            .await
    }

    /// Clear the label from an edition.
    pub async fn remove_book_label(&self, edition_id: u64) -> Result<bool, SkoobError> {
        info!(edition_id, "removing book label");
        self.action(&label_del_url(&self.base_url, edition_id)).await
    }

    /// Set the reading status of an edition.
    pub async fn update_book_status(
        &self,
        edition_id: u64,
        status: BookStatus,
    ) -> Result<bool, SkoobError> {
        info!(edition_id, status = status.code(), "updating book status");
        self.action(&shelf_add_url(&self.base_url, edition_id, status))
            .await
    }

    /// Clear the reading status of an edition.
    pub async fn remove_book_status(&self, edition_id: u64) -> Result<bool, SkoobError> {
        info!(edition_id, "removing book status");
        self.action(&shelf_del_url(&self.base_url, edition_id)).await
    }

    /// Move an edition to another bookshelf.
    pub async fn change_book_shelf(
        &self,
        edition_id: u64,
        shelf: BookShelf,
    ) -> Result<bool, SkoobError> {
        info!(edition_id, shelf = shelf.slug(), "changing book shelf");
        self.action(&change_shelf_url(&self.base_url, edition_id, shelf))
            .await
    }

    /// Rate an edition from 0 to 5 stars.
    pub async fn rate_book(&self, edition_id: u64, rating: f64) -> Result<bool, SkoobError> {
        self.session.require_login()?;
        check_rating(rating)?;
        info!(edition_id, rating, "rating book");
        let url = rate_url(&self.base_url, edition_id, rating);
        let response = self.transport.get(&url).await?.error_for_status()?;
        rating_accepted(&response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urls_follow_site_scheme() {
        let base = "https://www.skoob.com.br";
        assert_eq!(
            label_add_url(base, 9000, BookLabel::Favorite),
            "https://www.skoob.com.br/v1/label_add/9000/8"
        );
        assert_eq!(label_del_url(base, 9000), "https://www.skoob.com.br/v1/label_del/9000");
        assert_eq!(
            shelf_add_url(base, 9000, BookStatus::Read),
            "https://www.skoob.com.br/v1/shelf_add/9000/1"
        );
        assert_eq!(shelf_del_url(base, 9000), "https://www.skoob.com.br/v1/shelf_del/9000");
        assert_eq!(
            change_shelf_url(base, 9000, BookShelf::Comic),
            "https://www.skoob.com.br/estante/prateleira/9000/comic"
        );
        assert_eq!(
            rate_url(base, 9000, 4.5),
            "https://www.skoob.com.br/v1/book_rate/9000/4.5"
        );
    }

    #[test]
    fn ratings_outside_range_are_rejected() {
        assert!(check_rating(0.0).is_ok());
        assert!(check_rating(5.0).is_ok());
        assert!(matches!(
            check_rating(5.5),
            Err(SkoobError::InvalidRating { value }) if value == 5.5
        ));
        assert!(matches!(
            check_rating(-1.0),
            Err(SkoobError::InvalidRating { .. })
        ));
    }

    #[test]
    fn rejected_rating_is_an_action_failure() {
        assert!(rating_accepted(&json!({"success": true})).unwrap());
        assert!(matches!(
            rating_accepted(&json!({"success": false})),
            Err(SkoobError::ActionFailed { action }) if action == "rate_book"
        ));
    }
}
