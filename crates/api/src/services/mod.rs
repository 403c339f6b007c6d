//! Application services.

pub mod cookies;
pub mod identity;
pub mod sessions;

pub use cookies::CookieHelper;
pub use identity::{ExchangeError, IdentityExchangeService};
pub use sessions::{SessionError, SessionService};
