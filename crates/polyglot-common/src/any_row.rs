//! Manual `sqlx::FromRow<'_, sqlx::any::AnyRow>` implementations for the
//! polyglot-common model types.
//!
//! `sqlx::AnyPool` only decodes primitive types natively (i64, f64, bool,
//! String, bytes). Timestamps are stored as RFC 3339 text and tag lists as JSON
//! array text, so both are decoded from `String` here.

use chrono::{DateTime, Utc};
use sqlx::{any::AnyRow, Row};

use crate::models::{AccessToken, ExportRecord, Locale, Translation, User};

// ── Helpers ───────────────────────────────────────────────────────────────────

pub fn dt(row: &AnyRow, col: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    let s: String = row.try_get(col)?;
    parse_dt(&s).map_err(sqlx::Error::Decode)
}

pub fn opt_dt(row: &AnyRow, col: &str) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
    let s: Option<String> = row.try_get(col)?;
    s.map(|v| parse_dt(&v).map_err(sqlx::Error::Decode))
        .transpose()
}

fn parse_dt(s: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error + Send + Sync + 'static>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Ok(d.with_timezone(&Utc));
    }
    // SQLite CURRENT_TIMESTAMP format: "2024-01-15 10:30:00"
    if let Ok(d) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(d.and_utc());
    }
    if let Ok(d) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(d.and_utc());
    }
    Err(format!("cannot parse timestamp '{s}'").into())
}

/// Decode a JSON-array-of-strings column → Vec<String>
pub fn str_vec(row: &AnyRow, col: &str) -> Result<Vec<String>, sqlx::Error> {
    let s: Option<String> = row.try_get(col)?;
    match s.as_deref().map(str::trim) {
        None | Some("") | Some("[]") => Ok(vec![]),
        Some(v) => serde_json::from_str(v).map_err(|e| sqlx::Error::Decode(Box::new(e) as _)),
    }
}

/// Timestamp text in the format every writer uses.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

// ── User ──────────────────────────────────────────────────────────────────────

impl<'r> sqlx::FromRow<'r, AnyRow> for User {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: dt(row, "created_at")?,
            updated_at: dt(row, "updated_at")?,
        })
    }
}

// ── AccessToken ───────────────────────────────────────────────────────────────

impl<'r> sqlx::FromRow<'r, AnyRow> for AccessToken {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(AccessToken {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            token_hash: row.try_get("token_hash")?,
            created_at: dt(row, "created_at")?,
            last_used_at: opt_dt(row, "last_used_at")?,
        })
    }
}

// ── Locale ────────────────────────────────────────────────────────────────────

impl<'r> sqlx::FromRow<'r, AnyRow> for Locale {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Locale {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            short_code: row.try_get("short_code")?,
            created_at: dt(row, "created_at")?,
            updated_at: dt(row, "updated_at")?,
        })
    }
}

// ── Translation ───────────────────────────────────────────────────────────────

impl<'r> sqlx::FromRow<'r, AnyRow> for Translation {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Translation {
            id: row.try_get("id")?,
            key: row.try_get("key")?,
            locale_id: row.try_get("locale_id")?,
            content: row.try_get("content")?,
            tags: str_vec(row, "tags")?,
            created_at: dt(row, "created_at")?,
            updated_at: dt(row, "updated_at")?,
        })
    }
}

impl<'r> sqlx::FromRow<'r, AnyRow> for ExportRecord {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        Ok(ExportRecord {
            key: row.try_get("key")?,
            locale: row.try_get("locale")?,
            content: row.try_get("content")?,
            tags: str_vec(row, "tags")?,
        })
    }
}
