//! Locale model: a language definition translations point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::not_blank;

/// A locale record. `name` and `short_code` are unique when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locale {
    pub id: i64,
    pub name: Option<String>,
    pub short_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /locales` and `PUT /locales/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct LocaleRequest {
    #[validate(
        required(message = "The name field is required."),
        custom(function = "not_blank", message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "The short code field is required."),
        custom(function = "not_blank", message = "The short code field is required."),
        length(max = 255, message = "The short code field must not be greater than 255 characters.")
    )]
    pub short_code: Option<String>,
}

/// Validated locale fields, ready for the repository.
#[derive(Debug, Clone)]
pub struct LocaleDraft {
    pub name: String,
    pub short_code: String,
}

impl LocaleRequest {
    /// Split into a draft once validation has passed; `None` if a required
    /// field is absent.
    pub fn into_draft(self) -> Option<LocaleDraft> {
        Some(LocaleDraft {
            name: self.name?.trim().to_string(),
            short_code: self.short_code?.trim().to_string(),
        })
    }
}

/// Query string of `GET /locales`.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleListQuery {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Case-insensitive substring of the short code
    pub short_code: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
