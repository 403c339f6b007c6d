//! Domain layer for the chess events backend.
//!
//! This crate contains:
//! - Domain models (User, Session, Event, Registration)
//! - Request/response types with validation
//! - Domain error types

pub mod models;
