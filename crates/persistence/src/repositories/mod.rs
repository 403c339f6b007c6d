//! Repository implementations for database operations.

pub mod event;
pub mod identity_exchange;
pub mod registration;
pub mod session;
pub mod user;

pub use event::{EventListQuery, EventRepository};
pub use identity_exchange::IdentityExchangeRepository;
pub use registration::{RegistrationError, RegistrationRepository};
pub use session::SessionRepository;
pub use user::UserRepository;
