//! Event entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{Event, EventType, OrganizerKind, SkillLevel};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for event_type that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_type", rename_all = "snake_case")]
pub enum EventTypeDb {
    Tournament,
    Casual,
    Training,
    Club,
}

impl From<EventTypeDb> for EventType {
    fn from(db: EventTypeDb) -> Self {
        match db {
            EventTypeDb::Tournament => EventType::Tournament,
            EventTypeDb::Casual => EventType::Casual,
            EventTypeDb::Training => EventType::Training,
            EventTypeDb::Club => EventType::Club,
        }
    }
}

impl From<EventType> for EventTypeDb {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Tournament => EventTypeDb::Tournament,
            EventType::Casual => EventTypeDb::Casual,
            EventType::Training => EventTypeDb::Training,
            EventType::Club => EventTypeDb::Club,
        }
    }
}

/// Database enum for skill_level that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "skill_level", rename_all = "snake_case")]
pub enum SkillLevelDb {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<SkillLevelDb> for SkillLevel {
    fn from(db: SkillLevelDb) -> Self {
        match db {
            SkillLevelDb::Beginner => SkillLevel::Beginner,
            SkillLevelDb::Intermediate => SkillLevel::Intermediate,
            SkillLevelDb::Advanced => SkillLevel::Advanced,
        }
    }
}

impl From<SkillLevel> for SkillLevelDb {
    fn from(value: SkillLevel) -> Self {
        match value {
            SkillLevel::Beginner => SkillLevelDb::Beginner,
            SkillLevel::Intermediate => SkillLevelDb::Intermediate,
            SkillLevel::Advanced => SkillLevelDb::Advanced,
        }
    }
}

/// Database enum for organizer_kind that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "organizer_kind", rename_all = "snake_case")]
pub enum OrganizerKindDb {
    Individual,
    Club,
}

impl From<OrganizerKindDb> for OrganizerKind {
    fn from(db: OrganizerKindDb) -> Self {
        match db {
            OrganizerKindDb::Individual => OrganizerKind::Individual,
            OrganizerKindDb::Club => OrganizerKind::Club,
        }
    }
}

impl From<OrganizerKind> for OrganizerKindDb {
    fn from(value: OrganizerKind) -> Self {
        match value {
            OrganizerKind::Individual => OrganizerKindDb::Individual,
            OrganizerKind::Club => OrganizerKindDb::Club,
        }
    }
}

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub organizer_kind: OrganizerKindDb,
    pub title: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub date: NaiveDate,
    pub time: String,
    pub event_type: EventTypeDb,
    pub skill_level: SkillLevelDb,
    pub max_seats: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            organizer_id: entity.organizer_id,
            organizer_kind: entity.organizer_kind.into(),
            title: entity.title,
            description: entity.description,
            city: entity.city,
            address: entity.address,
            date: entity.date,
            time: entity.time,
            event_type: entity.event_type.into(),
            skill_level: entity.skill_level.into(),
            max_seats: entity.max_seats,
            image_url: entity.image_url,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Event row joined with the organizer name and derived seat state.
///
/// `seats_taken` is computed as a count over live registrations in the
/// reading query; it is never stored.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithStatsEntity {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub organizer_kind: OrganizerKindDb,
    pub organizer_name: String,
    pub title: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub date: NaiveDate,
    pub time: String,
    pub event_type: EventTypeDb,
    pub skill_level: SkillLevelDb,
    pub max_seats: i32,
    pub image_url: Option<String>,
    pub seats_taken: i64,
    pub user_joined: bool,
}

/// Attendee row for the ordered attendee listing.
#[derive(Debug, Clone, FromRow)]
pub struct AttendeeEntity {
    pub user_id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

impl From<AttendeeEntity> for domain::models::Attendee {
    fn from(entity: AttendeeEntity) -> Self {
        Self {
            user_id: entity.user_id,
            display_name: entity.display_name,
            joined_at: entity.joined_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_db_round_trip() {
        for ty in [
            EventType::Tournament,
            EventType::Casual,
            EventType::Training,
            EventType::Club,
        ] {
            let db: EventTypeDb = ty.into();
            let back: EventType = db.into();
            assert_eq!(back, ty);
        }
    }

    #[test]
    fn test_skill_level_db_round_trip() {
        for level in [
            SkillLevel::Beginner,
            SkillLevel::Intermediate,
            SkillLevel::Advanced,
        ] {
            let db: SkillLevelDb = level.into();
            let back: SkillLevel = db.into();
            assert_eq!(back, level);
        }
    }

    #[test]
    fn test_organizer_kind_db_round_trip() {
        for kind in [OrganizerKind::Individual, OrganizerKind::Club] {
            let db: OrganizerKindDb = kind.into();
            let back: OrganizerKind = db.into();
            assert_eq!(back, kind);
        }
    }
}
