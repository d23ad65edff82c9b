pub mod components;
pub mod config;
pub mod form;
#[cfg(feature = "i18n")]
pub mod i18n;
pub mod login;
pub mod prelude;

pub use crate::components::{FormInput, InputView};
pub use crate::config::{ConfigError, LoginConfig};
pub use crate::form::{FormError, FormOptions, FormResult};
pub use crate::login::{
    Dispatched, FieldFailure, LogLoginHandler, LoginEvent, LoginField, LoginHandler,
    LoginRejected, LoginScreen, LoginView, SubmissionRecord,
};

#[cfg(feature = "i18n")]
pub use crate::i18n::{I18nManager, Locale};
