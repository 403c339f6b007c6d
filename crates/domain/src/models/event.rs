//! Event domain models and request/response types.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::registration::Attendee;
use shared::validation::{validate_event_date, validate_event_time, validate_max_seats};

/// Kind of event being organized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Tournament,
    Casual,
    Training,
    Club,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Tournament => "tournament",
            EventType::Casual => "casual",
            EventType::Training => "training",
            EventType::Club => "club",
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tournament" => Ok(EventType::Tournament),
            "casual" => Ok(EventType::Casual),
            "training" => Ok(EventType::Training),
            "club" => Ok(EventType::Club),
            _ => Err(format!("Invalid event type: {}", s)),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Skill level the event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            _ => Err(format!("Invalid skill level: {}", s)),
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the organizer acts as an individual or on behalf of a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizerKind {
    Individual,
    Club,
}

impl OrganizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizerKind::Individual => "individual",
            OrganizerKind::Club => "club",
        }
    }
}

impl FromStr for OrganizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(OrganizerKind::Individual),
            "club" => Ok(OrganizerKind::Club),
            _ => Err(format!("Invalid organizer kind: {}", s)),
        }
    }
}

/// Date bucket filter for event listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    Today,
    ThisWeek,
    ThisMonth,
}

impl DateFilter {
    /// Resolves the bucket to an inclusive `[from, to]` date range,
    /// anchored at `today`.
    pub fn range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            DateFilter::Today => (today, today),
            DateFilter::ThisWeek => (today, today + Days::new(6)),
            DateFilter::ThisMonth => {
                let next_month = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
                };
                // First of next month always exists
                let end_of_month = next_month.unwrap().pred_opt().unwrap();
                (today, end_of_month)
            }
        }
    }
}

/// A scheduled chess event with a fixed seat capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub organizer_kind: OrganizerKind,
    pub title: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub date: NaiveDate,
    /// Start time as HH:MM.
    pub time: String,
    pub event_type: EventType,
    pub skill_level: SkillLevel,
    pub max_seats: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 120, message = "title must be 1-120 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "description must be 1-2000 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 80, message = "city must be 1-80 characters"))]
    pub city: String,

    #[validate(length(min = 1, max = 200, message = "address must be 1-200 characters"))]
    pub address: String,

    #[validate(custom(function = validate_event_date))]
    pub date: NaiveDate,

    #[validate(custom(function = validate_event_time))]
    pub time: String,

    pub event_type: EventType,

    pub skill_level: SkillLevel,

    #[serde(default)]
    pub organizer_kind: Option<OrganizerKind>,

    #[validate(custom(function = validate_max_seats))]
    pub max_seats: i32,

    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Organizer-only edit of an existing event. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 120, message = "title must be 1-120 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "description must be 1-2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 80, message = "city must be 1-80 characters"))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 200, message = "address must be 1-200 characters"))]
    pub address: Option<String>,

    #[validate(custom(function = validate_event_date))]
    pub date: Option<NaiveDate>,

    #[validate(custom(function = validate_event_time))]
    pub time: Option<String>,

    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Event summary for listings, with the derived seat count and viewer
/// personalization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventSummary {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub organizer_kind: OrganizerKind,
    pub organizer_name: String,
    pub title: String,
    pub city: String,
    pub date: NaiveDate,
    pub time: String,
    pub event_type: EventType,
    pub skill_level: SkillLevel,
    pub max_seats: i32,
    pub seats_taken: i64,
    pub user_joined: bool,
    pub image_url: Option<String>,
}

/// Full event detail including the attendee list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventDetail {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub organizer_kind: OrganizerKind,
    pub organizer_name: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub date: NaiveDate,
    pub time: String,
    pub event_type: EventType,
    pub skill_level: SkillLevel,
    pub max_seats: i32,
    pub seats_taken: i64,
    pub user_joined: bool,
    pub image_url: Option<String>,
    pub attendees: Vec<Attendee>,
}

/// Response for paginated event listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventListResponse {
    pub data: Vec<EventSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Events relevant to the authenticated user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MyEventsResponse {
    pub organized: Vec<EventSummary>,
    pub joined: Vec<EventSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_request() -> CreateEventRequest {
        CreateEventRequest {
            title: "Torneo Blitz Nocturno".to_string(),
            description: "Swiss pairing, 5+0.".to_string(),
            city: "Madrid".to_string(),
            address: "Calle Mayor 1".to_string(),
            date: Utc::now().date_naive() + Duration::days(14),
            time: "19:30".to_string(),
            event_type: EventType::Tournament,
            skill_level: SkillLevel::Intermediate,
            organizer_kind: None,
            max_seats: 16,
            image_url: None,
        }
    }

    #[test]
    fn test_create_event_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_event_request_rejects_zero_seats() {
        let mut req = valid_request();
        req.max_seats = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_event_request_rejects_empty_title() {
        let mut req = valid_request();
        req.title = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_event_request_rejects_bad_time() {
        let mut req = valid_request();
        req.time = "25:99".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_event_request_rejects_past_date() {
        let mut req = valid_request();
        req.date = Utc::now().date_naive() - Duration::days(1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_event_type_round_trip() {
        for raw in ["tournament", "casual", "training", "club"] {
            let parsed: EventType = raw.parse().unwrap();
            assert_eq!(parsed.as_str(), raw);
        }
        assert!("torneo".parse::<EventType>().is_err());
    }

    #[test]
    fn test_skill_level_round_trip() {
        for raw in ["beginner", "intermediate", "advanced"] {
            let parsed: SkillLevel = raw.parse().unwrap();
            assert_eq!(parsed.as_str(), raw);
        }
        assert!("master".parse::<SkillLevel>().is_err());
    }

    #[test]
    fn test_date_filter_today() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(DateFilter::Today.range(today), (today, today));
    }

    #[test]
    fn test_date_filter_this_week() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let (from, to) = DateFilter::ThisWeek.range(today);
        assert_eq!(from, today);
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 6, 21).unwrap());
    }

    #[test]
    fn test_date_filter_this_month_ends_at_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let (from, to) = DateFilter::ThisMonth.range(today);
        assert_eq!(from, today);
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    }

    #[test]
    fn test_date_filter_this_month_december() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        let (_, to) = DateFilter::ThisMonth.range(today);
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_date_filter_serde_values() {
        assert_eq!(
            serde_json::from_str::<DateFilter>("\"this_week\"").unwrap(),
            DateFilter::ThisWeek
        );
    }
}
