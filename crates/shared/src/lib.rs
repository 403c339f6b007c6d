//! Shared utilities and common types for the chess events backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (session token generation, hashing)
//! - Common validation logic
//! - Cursor pagination for event listings

pub mod crypto;
pub mod pagination;
pub mod validation;
