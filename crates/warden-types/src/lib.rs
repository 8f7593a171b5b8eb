//! Warden Types - Shared domain types
//!
//! This crate contains domain types used across Warden services:
//! - Account and session identifiers
//! - Roles
//! - Authentication request/response payloads

pub mod account;
pub mod auth;
pub mod role;
pub mod session;

pub use account::*;
pub use auth::*;
pub use role::*;
pub use session::*;
