//! Session domain model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A server-issued session backing cookie authentication.
///
/// The raw token is never stored; only its SHA-256 hash lives in the
/// database. A user may hold several live sessions (multi-device).
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session authorizes requests only while unexpired and unrevoked.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            expires_at: now + expires_in,
            created_at: now,
            last_used_at: now,
            revoked_at: revoked.then_some(now),
        }
    }

    #[test]
    fn test_active_session() {
        let s = session(Duration::hours(1), false);
        assert!(s.is_active(Utc::now()));
    }

    #[test]
    fn test_expired_session() {
        let s = session(Duration::seconds(-1), false);
        assert!(!s.is_active(Utc::now()));
    }

    #[test]
    fn test_revoked_session() {
        let s = session(Duration::hours(1), true);
        assert!(!s.is_active(Utc::now()));
    }
}
