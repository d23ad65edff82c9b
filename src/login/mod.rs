//! The login screen: three fields, their rules, and the submit flow.

mod handler;
mod model;
mod rules;
mod screen;

#[cfg(test)]
mod tests;

pub use handler::{AsyncLoginHandler, LogLoginHandler, LoginHandler, LoginRejected};
pub use model::{
    LoginField, LoginForm, LoginFormEmailLens, LoginFormFields, LoginFormPasswordLens,
    LoginFormUsernameLens, SubmissionRecord, UnknownField,
};
pub use rules::{
    FailureKind, FieldFailure, MIN_PASSWORD_LEN, is_email_shape, validate_email, validate_field,
    validate_password, validate_username,
};
pub use screen::{
    Dispatched, LoginBinding, LoginController, LoginCopy, LoginEvent, LoginScreen, LoginView,
};
