//! Domain model definitions.

pub mod event;
pub mod registration;
pub mod session;
pub mod user;

pub use event::{
    CreateEventRequest, DateFilter, Event, EventDetail, EventListResponse, EventSummary,
    EventType, MyEventsResponse, OrganizerKind, SkillLevel, UpdateEventRequest,
};
pub use registration::{Attendee, RegistrationAck};
pub use session::Session;
pub use user::{User, UserIdentity};
