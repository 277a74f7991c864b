//! Repository pattern: one module per table group.
//!
//! Each module exposes free async functions taking `&AnyPool`. Handlers call
//! these rather than writing SQL inline.

pub mod locales;
pub mod tokens;
pub mod translations;
pub mod users;
