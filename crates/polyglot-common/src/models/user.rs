//! User model: the identity layer.
//!
//! A user is a name, a unique email and an Argon2id password hash. Nothing else
//! is collected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validation::not_blank;

/// A Polyglot user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub name: String,

    /// Unique, compared case-insensitively
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Registration request.
///
/// Every field is optional at the serde level so a missing field is reported
/// as a validation message rather than a deserialization failure.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "passwords_match", skip_on_field_errors = false))]
pub struct RegisterRequest {
    #[validate(
        required(message = "The name field is required."),
        custom(function = "not_blank", message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        length(min = 6, message = "The password field must be at least 6 characters.")
    )]
    pub password: Option<String>,

    pub password_confirmation: Option<String>,
}

/// A present password must be repeated exactly in `password_confirmation`.
/// The error code names the field it is reported on.
fn passwords_match(request: &RegisterRequest) -> Result<(), ValidationError> {
    match &request.password {
        Some(password) if request.password_confirmation.as_ref() != Some(password) => {
            Err(ValidationError::new("password")
                .with_message("The password field confirmation does not match.".into()))
        }
        _ => Ok(()),
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        length(min = 1, message = "The password field is required.")
    )]
    pub password: Option<String>,
}

/// Safe user representation for API responses (no sensitive fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolyglotError;
    use crate::validation::validate_request;

    fn register(password: &str, confirmation: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("Test User".into()),
            email: Some("test@example.com".into()),
            password: Some(password.into()),
            password_confirmation: Some(confirmation.into()),
        }
    }

    fn codes(err: PolyglotError) -> Vec<String> {
        match err {
            PolyglotError::Validation { errors } => errors.into_iter().map(|e| e.code).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_a_complete_registration() {
        assert!(validate_request(&register("password", "password")).is_ok());
    }

    #[test]
    fn rejects_mismatched_confirmation() {
        let err = validate_request(&register("password", "passw0rd")).unwrap_err();
        assert_eq!(codes(err), vec!["password"]);
    }

    #[test]
    fn rejects_missing_confirmation() {
        let mut req = register("password", "password");
        req.password_confirmation = None;
        let Err(PolyglotError::Validation { errors }) = validate_request(&req) else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "password");
        assert_eq!(errors[0].message, "The password field confirmation does not match.");
    }

    #[test]
    fn short_and_mismatched_password_reports_both() {
        let Err(PolyglotError::Validation { errors }) = validate_request(&register("123", "456"))
        else {
            panic!("expected validation error");
        };
        let messages: Vec<_> = errors
            .iter()
            .map(|e| (e.code.as_str(), e.message.as_str()))
            .collect();
        assert_eq!(
            messages,
            vec![
                ("password", "The password field must be at least 6 characters."),
                ("password", "The password field confirmation does not match."),
            ]
        );
    }

    #[test]
    fn rejects_short_password_and_bad_email() {
        let mut req = register("123", "123");
        req.email = Some("not-an-email".into());
        let err = validate_request(&req).unwrap_err();
        assert_eq!(codes(err), vec!["email", "password"]);
    }

    #[test]
    fn reports_every_missing_field() {
        let req = RegisterRequest {
            name: None,
            email: None,
            password: None,
            password_confirmation: None,
        };
        let err = validate_request(&req).unwrap_err();
        assert_eq!(codes(err), vec!["email", "name", "password"]);
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            name: "Test".into(),
            email: "t@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }
}
