//! `tenantdesk-core` — shared building blocks for the dashboard client.
//!
//! This crate holds identifiers and errors that every other crate agrees on.
//! It has no I/O and no knowledge of HTTP or storage.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{TenantId, UserId};
