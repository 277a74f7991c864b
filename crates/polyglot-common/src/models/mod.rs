//! Core domain models shared across all Polyglot crates.
//!
//! These are the "truth" types: what the database stores and the API serializes,
//! plus the request DTOs that validate incoming payloads.

pub mod locale;
pub mod response;
pub mod token;
pub mod translation;
pub mod user;

/// Re-export all model types for convenience.
pub use locale::*;
pub use response::*;
pub use token::*;
pub use translation::*;
pub use user::*;
