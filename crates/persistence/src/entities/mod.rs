//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod event;
pub mod session;
pub mod user;

pub use event::{
    AttendeeEntity, EventEntity, EventTypeDb, EventWithStatsEntity, OrganizerKindDb, SkillLevelDb,
};
pub use session::SessionEntity;
pub use user::UserEntity;
