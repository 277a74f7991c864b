//! Input validation utilities.
//!
//! Centralized validation helpers used across API routes. Request DTOs derive
//! `validator::Validate`; failures surface as field-level `{code, message}` pairs.

use std::collections::HashSet;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{FieldError, PolyglotError, PolyglotResult};

/// Validate a request body, returning a PolyglotError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> PolyglotResult<()> {
    body.validate().map_err(|e| PolyglotError::Validation {
        errors: collect_field_errors(&e),
    })
}

/// Key validator uses for struct-level (`schema`) errors.
const SCHEMA_KEY: &str = "__all__";

/// Flatten validator output into field errors, ordered by field name so the
/// response body is stable. Struct-level errors are reported on the field
/// named by their code, after that field's own errors.
fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut flat: Vec<(String, bool, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let schema = field == SCHEMA_KEY;
                let name = if schema { e.code.to_string() } else { field.clone() };
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", name.replace('_', " ")));
                (name, schema, message)
            })
        })
        .collect();
    flat.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));

    flat.into_iter()
        .map(|(field, _, message)| FieldError::new(field, message))
        .collect()
}

/// Accumulates field errors discovered outside the derive (uniqueness and
/// existence checks that need the database).
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error with
    /// every recorded field.
    pub fn into_result(self) -> PolyglotResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(PolyglotError::Validation { errors: self.0 })
        }
    }
}

/// Reject empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Tags form an ordered set: every label non-blank, no label repeated.
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(ValidationError::new("tags_blank")
            .with_message("The tags field must not contain empty values.".into()));
    }

    let mut seen = HashSet::with_capacity(tags.len());
    if !tags.iter().all(|t| seen.insert(t.as_str())) {
        return Err(ValidationError::new("tags_distinct")
            .with_message("The tags field has a duplicate value.".into()));
    }

    Ok(())
}
