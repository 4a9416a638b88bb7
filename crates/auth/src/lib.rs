//! `tenantdesk-auth` — session token model for the dashboard client.
//!
//! Decodes bearer tokens into [`Claims`] and checks their expiry locally.
//! Authenticity is the server's concern; nothing here verifies signatures.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod codec;
pub mod permissions;
pub mod roles;

pub use claims::Claims;
pub use codec::{DecodeError, decode, is_valid, is_valid_at, now_seconds};
pub use permissions::Permission;
pub use roles::Role;
