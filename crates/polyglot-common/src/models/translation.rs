//! Translation model: one localized string: key + locale + content + tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{not_blank, validate_tags};

/// A translation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub id: i64,
    pub key: String,
    pub locale_id: i64,
    pub content: String,
    /// Ordered, duplicate-free labels
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /translations` and `PUT /translations/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct TranslationRequest {
    #[validate(
        required(message = "The key field is required."),
        custom(function = "not_blank", message = "The key field is required."),
        length(max = 255, message = "The key field must not be greater than 255 characters.")
    )]
    pub key: Option<String>,

    #[validate(required(message = "The locale id field is required."))]
    pub locale_id: Option<i64>,

    #[validate(
        required(message = "The content field is required."),
        length(min = 1, message = "The content field is required.")
    )]
    pub content: Option<String>,

    #[validate(custom(function = "validate_tags"))]
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Validated translation fields, ready for the repository.
#[derive(Debug, Clone)]
pub struct TranslationDraft {
    pub key: String,
    pub locale_id: i64,
    pub content: String,
    pub tags: Vec<String>,
}

impl TranslationRequest {
    /// Split into a draft once validation has passed; `None` if a required
    /// field is absent. Missing tags become an empty list.
    pub fn into_draft(self) -> Option<TranslationDraft> {
        Some(TranslationDraft {
            key: self.key?.trim().to_string(),
            locale_id: self.locale_id?,
            content: self.content?,
            tags: self.tags.unwrap_or_default(),
        })
    }
}

/// Query string of `GET /translations`.
#[derive(Debug, Default, Deserialize)]
pub struct TranslationListQuery {
    /// Exact tag membership
    pub tag: Option<String>,
    /// Case-insensitive substring of the key
    pub key: Option<String>,
    /// Case-insensitive substring of the content
    pub content: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// One element of the bulk export: the translation joined with its locale code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub key: String,
    /// Short code of the referenced locale
    pub locale: Option<String>,
    pub content: String,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolyglotError;
    use crate::validation::validate_request;

    fn request(key: Option<&str>, tags: Option<Vec<&str>>) -> TranslationRequest {
        TranslationRequest {
            key: key.map(Into::into),
            locale_id: Some(1),
            content: Some("Hello".into()),
            tags: tags.map(|t| t.into_iter().map(Into::into).collect()),
        }
    }

    #[test]
    fn missing_key_is_reported_on_key() {
        for key in [None, Some(""), Some("   ")] {
            match validate_request(&request(key, None)) {
                Err(PolyglotError::Validation { errors }) => {
                    assert_eq!(errors.len(), 1);
                    assert_eq!(errors[0].code, "key");
                    assert_eq!(errors[0].message, "The key field is required.");
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let err = validate_request(&request(Some("greeting.hello"), Some(vec!["web", "web"])))
            .unwrap_err();
        let PolyglotError::Validation { errors } = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].code, "tags");
        assert_eq!(errors[0].message, "The tags field has a duplicate value.");
    }

    #[test]
    fn draft_keeps_tag_order_and_defaults_to_empty() {
        let draft = request(Some(" greeting.hello "), Some(vec!["mobile", "homepage"]))
            .into_draft()
            .unwrap();
        assert_eq!(draft.key, "greeting.hello");
        assert_eq!(draft.tags, vec!["mobile", "homepage"]);

        let draft = request(Some("greeting.bye"), None).into_draft().unwrap();
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn export_record_leaves_unicode_unescaped() {
        let record = ExportRecord {
            key: "greeting.hello".into(),
            locale: Some("ur".into()),
            content: "خوش آمدید".into(),
            tags: vec!["homepage".into()],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("خوش آمدید"));
        assert!(!json.contains("\\u"));
    }
}
