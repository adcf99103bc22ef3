//! Request payloads for every write endpoint.
//!
//! All fields are optional at the serde level so that a missing field turns
//! into a field-level validation error instead of a deserialization failure.
//! `validate` collects every violated rule, in field order, before any domain
//! object is constructed.

use serde::Deserialize;

use crate::database::models::NewPost;
use crate::error::{ApiError, FieldError};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Trimmed value, or `None` when absent or blank
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(
    value: Option<String>,
    param: &str,
    msg: &str,
    errors: &mut Vec<FieldError>,
) -> String {
    match present(value) {
        Some(v) => v,
        None => {
            errors.push(FieldError::field(param, msg));
            String::new()
        }
    }
}

fn finish<T>(value: T, errors: Vec<FieldError>) -> Result<T, ApiError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ApiError::validation(errors))
    }
}

/// Loose syntactic check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "preferredlocation")]
    pub preferred_location: Option<String>,
    pub photo: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(self) -> Result<NewPost, ApiError> {
        let mut errors = Vec::new();
        let title = require(self.title, "title", "Title is required", &mut errors);
        let description = require(self.description, "description", "Description is required", &mut errors);
        let preferred_location = require(
            self.preferred_location,
            "preferredLocation",
            "Preferred location is required",
            &mut errors,
        );

        finish(
            NewPost {
                category: present(self.category),
                title,
                description,
                preferred_location,
                photo: present(self.photo),
            },
            errors,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddCommentRequest {
    pub text: Option<String>,
}

impl AddCommentRequest {
    pub fn validate(self) -> Result<String, ApiError> {
        let mut errors = Vec::new();
        let text = require(self.text, "text", "Text is required", &mut errors);
        finish(text, errors)
    }
}

/// Validated registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ApiError> {
        let mut errors = Vec::new();
        let name = require(self.name, "name", "Please provide your username", &mut errors);

        let email = present(self.email).unwrap_or_default();
        if !is_valid_email(&email) {
            errors.push(FieldError::field("email", "Please provide a valid e-mail"));
        }

        // Passwords are taken verbatim, whitespace included
        let password = self.password.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(FieldError::field(
                "password",
                "Please provide a password with at least 6 characters",
            ));
        }

        finish(
            Registration {
                name,
                email,
                password,
                avatar: present(self.avatar),
            },
            errors,
        )
    }
}

/// Validated login input
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, ApiError> {
        let mut errors = Vec::new();

        let email = present(self.email).unwrap_or_default();
        if !is_valid_email(&email) {
            errors.push(FieldError::field("email", "Please provide a valid e-mail"));
        }
        if self.password.is_none() {
            errors.push(FieldError::field("password", "Please provide your password"));
        }

        finish(
            Credentials {
                email,
                password: self.password.unwrap_or_default(),
            },
            errors,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_errors(err: ApiError) -> Vec<FieldError> {
        match err {
            ApiError::ValidationError { errors } => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_post_reports_every_missing_field() {
        let err = CreatePostRequest::default().validate().unwrap_err();
        let params: Vec<_> = field_errors(err).into_iter().filter_map(|e| e.param).collect();
        assert_eq!(params, vec!["title", "description", "preferredLocation"]);
    }

    #[test]
    fn create_post_accepts_legacy_location_spelling() {
        let req: CreatePostRequest = serde_json::from_value(json!({
            "title": "Chair",
            "description": "Free chair",
            "preferredlocation": "Downtown",
            "photo": ""
        }))
        .unwrap();
        let post = req.validate().unwrap();
        assert_eq!(post.preferred_location, "Downtown");
        assert_eq!(post.category, None);
        assert_eq!(post.photo, None);
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let req = CreatePostRequest {
            title: Some("   ".into()),
            description: Some("d".into()),
            preferred_location: Some("l".into()),
            ..Default::default()
        };
        let errors = field_errors(req.validate().unwrap_err());
        assert_eq!(errors, vec![FieldError::field("title", "Title is required")]);
    }

    #[test]
    fn comment_text_is_required() {
        assert!(AddCommentRequest { text: Some("".into()) }.validate().is_err());
        assert_eq!(
            AddCommentRequest { text: Some(" I'll take it ".into()) }.validate().unwrap(),
            "I'll take it"
        );
    }

    #[test]
    fn register_checks_name_email_and_password_length() {
        let req = RegisterRequest {
            name: None,
            email: Some("not-an-email".into()),
            password: Some("12345".into()),
            avatar: None,
        };
        let params: Vec<_> = field_errors(req.validate().unwrap_err())
            .into_iter()
            .filter_map(|e| e.param)
            .collect();
        assert_eq!(params, vec!["name", "email", "password"]);
    }

    #[test]
    fn login_requires_password_presence() {
        let req = LoginRequest {
            email: Some("a@x.com".into()),
            password: None,
        };
        let errors = field_errors(req.validate().unwrap_err());
        assert_eq!(errors, vec![FieldError::field("password", "Please provide your password")]);
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@@x.com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@x..com"));
    }
}
