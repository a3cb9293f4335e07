//! User response views
//!
//! Neither view carries the password hash.

use chrono::{DateTime, Utc};
use orderly_shared::models::user::User;
use serde::Serialize;
use uuid::Uuid;

/// User as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub status: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role.clone(),
            status: user.status.clone(),
            location: user.location.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Contact fields of a user, embedded in order views
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            phone: "08012345678".to_string(),
            role: "admin".to_string(),
            status: "active".to_string(),
            location: "Lagos".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_view_never_contains_password_hash() {
        let user = sample_user();
        let json = serde_json::to_value(UserView::from(&user)).unwrap();

        assert_eq!(json["email"], "jane@example.com");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_summary_fields() {
        let user = sample_user();
        let json = serde_json::to_value(UserSummary::from(&user)).unwrap();

        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["email", "id", "name", "phone"]);
    }
}
