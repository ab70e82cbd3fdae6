//! User entity.
//!
//! # Invariants
//! - `username` and `email` are unique across live users.
//! - `username` is 3..=20 characters; `email` matches `EMAIL_RE`.
//!
//! Users carry no credential material.

use crate::model::record::{Entity, FieldError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const USERNAME_FIELD: &str = "username";
pub const EMAIL_FIELD: &str = "email";

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 20;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*$")
        .expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Create request for users; trimmed by the service before storage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

/// Partial update for users. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserPatch {
    pub fn username(value: impl Into<String>) -> Self {
        Self {
            username: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn email(value: impl Into<String>) -> Self {
        Self {
            email: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

impl Entity for User {
    type Patch = UserPatch;

    const KIND: &'static str = "user";
    const UNIQUE_FIELDS: &'static [&'static str] = &[USERNAME_FIELD, EMAIL_FIELD];

    fn unique_value(&self, field: &str) -> Option<&str> {
        match field {
            USERNAME_FIELD => Some(self.username.as_str()),
            EMAIL_FIELD => Some(self.email.as_str()),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        let username_chars = self.username.chars().count();
        if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&username_chars) {
            return Err(FieldError::new(
                USERNAME_FIELD,
                format!(
                    "must be {USERNAME_MIN_CHARS}..={USERNAME_MAX_CHARS} characters, got {username_chars}"
                ),
            ));
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(FieldError::new(
                EMAIL_FIELD,
                format!("`{}` is not a valid email address", self.email),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{User, UserPatch, EMAIL_FIELD, USERNAME_FIELD};
    use crate::model::record::Entity;

    #[test]
    fn validate_accepts_well_formed_user() {
        assert!(User::new("alice", "a@x.com").validate().is_ok());
    }

    #[test]
    fn validate_rejects_short_username_and_bad_email() {
        let err = User::new("al", "a@x.com").validate().unwrap_err();
        assert_eq!(err.field, USERNAME_FIELD);

        let err = User::new("alice", "not-an-email").validate().unwrap_err();
        assert_eq!(err.field, EMAIL_FIELD);
    }

    #[test]
    fn apply_patch_only_touches_present_fields() {
        let mut user = User::new("alice", "a@x.com");
        user.apply_patch(&UserPatch::email("c@x.com"));
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "c@x.com");
    }

    #[test]
    fn patch_distinguishes_absent_from_empty() {
        let patch: UserPatch = serde_json::from_str(r#"{"email":""}"#).unwrap();
        assert_eq!(patch.username, None);
        assert_eq!(patch.email.as_deref(), Some(""));
        assert!(!patch.is_empty());
        assert!(UserPatch::default().is_empty());
    }

    #[test]
    fn unique_value_rejects_unknown_field() {
        let user = User::new("alice", "a@x.com");
        assert_eq!(user.unique_value("username"), Some("alice"));
        assert_eq!(user.unique_value("nickname"), None);
        assert_eq!(User::unique_field("email"), Some(EMAIL_FIELD));
        assert_eq!(User::unique_field("nickname"), None);
    }
}
