//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user account in the system.
///
/// Users are provisioned on first successful identity exchange; the
/// identity fields are immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    /// Subject identifier assigned by the external identity provider.
    #[serde(skip_serializing)]
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Public identity of an authenticated user, as returned by
/// `GET /api/auth/me` and the identity exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl From<User> for UserIdentity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            external_id: "ext-subject-1".to_string(),
            email: "magnus@example.com".to_string(),
            display_name: "Magnus".to_string(),
            avatar_url: Some("https://cdn.example.com/a.png".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_external_id_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("external_id").is_none());
        assert_eq!(json["email"], "magnus@example.com");
    }

    #[test]
    fn test_identity_from_user() {
        let user = sample_user();
        let id = user.id;
        let identity: UserIdentity = user.into();
        assert_eq!(identity.id, id);
        assert_eq!(identity.display_name, "Magnus");
    }
}
