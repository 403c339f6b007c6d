//! Request extractors.

pub mod session_auth;

pub use session_auth::{CurrentUser, OptionalCurrentUser};
