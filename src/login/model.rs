use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use crate::form::{FieldKey, FieldLens, FormModel};

#[derive(Clone, Debug, Default, Eq, PartialEq, crate::form::FormModel)]
pub struct LoginForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum LoginField {
    Username,
    Email,
    Password,
}

impl LoginField {
    pub const ALL: [LoginField; 3] = [LoginField::Username, LoginField::Email, LoginField::Password];

    pub fn key(self) -> FieldKey {
        let fields = LoginForm::fields();
        match self {
            LoginField::Username => fields.username().key(),
            LoginField::Email => fields.email().key(),
            LoginField::Password => fields.password().key(),
        }
    }

    pub fn from_key(key: FieldKey) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn is_masked(self) -> bool {
        self == LoginField::Password
    }
}

impl Display for LoginField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key().as_str())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unknown login field `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for LoginField {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key().as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

/// Field values that passed every rule at submit time.
///
/// Only the login screen's submit path can build one.
#[derive(Clone, Eq, PartialEq)]
pub struct SubmissionRecord {
    username: String,
    email: String,
    password: String,
}

impl SubmissionRecord {
    pub(crate) fn from_validated(form: LoginForm) -> Self {
        Self {
            username: form.username,
            email: form.email,
            password: form.password,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Debug for SubmissionRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionRecord")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
