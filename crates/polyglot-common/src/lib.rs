//! # polyglot-common
//!
//! Shared types, configuration, error handling, and utilities used across all Polyglot crates.
//! This is the foundation layer: no request handling and no SQL, just primitives and contracts.

pub mod any_row;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod validation;
