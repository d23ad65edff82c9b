use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

use crate::form::ValidationError;

use super::model::LoginField;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    Required,
    InvalidFormat,
    TooShort { min: usize },
}

/// The first rule a field value broke.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldFailure {
    pub field: LoginField,
    pub kind: FailureKind,
}

impl FieldFailure {
    const fn new(field: LoginField, kind: FailureKind) -> Self {
        Self { field, kind }
    }
}

impl Display for FieldFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.field, self.kind) {
            (LoginField::Username, FailureKind::Required) => f.write_str("Username is required"),
            (LoginField::Email, FailureKind::Required) => f.write_str("Email is required"),
            (LoginField::Password, FailureKind::Required) => f.write_str("Password is required"),
            (_, FailureKind::InvalidFormat) => f.write_str("Invalid email"),
            (_, FailureKind::TooShort { min }) => {
                write!(f, "Password must be at least {min} characters")
            }
        }
    }
}

impl ValidationError for FieldFailure {
    fn message(&self) -> String {
        self.to_string()
    }

    fn message_key(&self) -> Option<&'static str> {
        Some(match (self.field, self.kind) {
            (LoginField::Username, _) => "login.username.required",
            (LoginField::Email, FailureKind::InvalidFormat) => "login.email.invalid",
            (LoginField::Email, _) => "login.email.required",
            (LoginField::Password, FailureKind::TooShort { .. }) => "login.password.too_short",
            (LoginField::Password, _) => "login.password.required",
        })
    }

    fn message_params(&self) -> Vec<(&'static str, String)> {
        match self.kind {
            FailureKind::TooShort { min } => vec![("min", min.to_string())],
            _ => Vec::new(),
        }
    }
}

/// Checks one field value. Rules run in order and the first failure wins.
pub fn validate_field(field: LoginField, value: &str) -> Result<(), FieldFailure> {
    match field {
        LoginField::Username => validate_username(value),
        LoginField::Email => validate_email(value),
        LoginField::Password => validate_password(value),
    }
}

pub fn validate_username(value: &str) -> Result<(), FieldFailure> {
    if value.trim().is_empty() {
        return Err(FieldFailure::new(LoginField::Username, FailureKind::Required));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), FieldFailure> {
    if value.trim().is_empty() {
        return Err(FieldFailure::new(LoginField::Email, FailureKind::Required));
    }
    if !is_email_shape(value) {
        return Err(FieldFailure::new(LoginField::Email, FailureKind::InvalidFormat));
    }
    Ok(())
}

pub fn validate_password(value: &str) -> Result<(), FieldFailure> {
    if value.is_empty() {
        return Err(FieldFailure::new(LoginField::Password, FailureKind::Required));
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(FieldFailure::new(
            LoginField::Password,
            FailureKind::TooShort {
                min: MIN_PASSWORD_LEN,
            },
        ));
    }
    Ok(())
}

/// `local@domain` with exactly one `@`, no whitespace, and a dotted domain
/// whose labels are all non-empty.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(?:\.[^\s@.]+)+$").expect("EMAIL_SHAPE is a valid pattern")
});

pub fn is_email_shape(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}
