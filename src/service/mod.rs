//! Request-level services. Each service pairs a blocking and an async variant
//! over the same transport trait; page assembly is shared through the pure
//! helpers in [`crate::parse`], so the two variants differ only in how they
//! await the transport.

mod auth;
mod author;
mod book;
mod profile;
mod publisher;
mod user;

pub use auth::{AsyncAuthService, AuthService, Session};
pub use author::{AsyncAuthorService, AuthorService};
pub use book::{AsyncBookService, BookService};
pub use profile::{AsyncProfileService, ProfileService};
pub use publisher::{AsyncPublisherService, PublisherService};
pub use user::{AsyncUserService, UserService};

use serde_json::Value;

use crate::error::SkoobError;
use crate::model::User;

/// `success` flag of a JSON API envelope, false when absent.
pub(crate) fn success_flag(data: &Value) -> bool {
    data.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Deserialize a user record from the API, composing the absolute profile
/// URL the record only carries relative to the site root.
pub(crate) fn user_from_record(mut record: Value, base_url: &str) -> Result<User, SkoobError> {
    let relative = record
        .get("url")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if let Value::Object(map) = &mut record {
        map.insert(
            "profile_url".to_string(),
            Value::String(format!("{base_url}{relative}")),
        );
    }
    serde_json::from_value(record).map_err(|e| SkoobError::parse(format!("user record: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_record_gets_absolute_profile_url() -> Result<(), SkoobError> {
        let record = json!({
            "id": 5,
            "nome": "Maria Silva",
            "url": "/usuario/5-maria"
        });
        let user = user_from_record(record, "https://www.skoob.com.br")?;
        assert_eq!(user.profile_url, "https://www.skoob.com.br/usuario/5-maria");
        Ok(())
    }

    #[test]
    fn success_flag_defaults_to_false() {
        assert!(success_flag(&json!({"success": true})));
        assert!(!success_flag(&json!({"success": false})));
        assert!(!success_flag(&json!({})));
        assert!(!success_flag(&json!({"success": "yes"})));
    }
}
