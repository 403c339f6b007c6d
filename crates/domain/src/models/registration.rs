//! Registration domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered attendee of an event, ordered by join time in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Attendee {
    pub user_id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

/// Acknowledgement returned by join/leave, carrying the refreshed seat
/// state so the client does not need a follow-up read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationAck {
    pub event_id: Uuid,
    pub seats_taken: i64,
    pub user_joined: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendee_serialization() {
        let attendee = Attendee {
            user_id: Uuid::new_v4(),
            display_name: "Judit".to_string(),
            joined_at: Utc::now(),
        };
        let json = serde_json::to_value(&attendee).unwrap();
        assert_eq!(json["display_name"], "Judit");
        assert!(json.get("joined_at").is_some());
    }

    #[test]
    fn test_ack_reflects_state() {
        let ack = RegistrationAck {
            event_id: Uuid::new_v4(),
            seats_taken: 3,
            user_joined: true,
        };
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["seats_taken"], 3);
        assert_eq!(json["user_joined"], true);
    }
}
