pub use crate::components::{FormInput, InputView};
pub use crate::config::LoginConfig;
pub use crate::form::{
    ErrorDisplay, FieldBinding, FieldLens, FormController, FormModel, FormOptions, FormResult,
    SubmitState, ValidationError, ValidationMode,
};
pub use crate::login::{
    Dispatched, FailureKind, FieldFailure, LogLoginHandler, LoginEvent, LoginField, LoginHandler,
    LoginRejected, LoginScreen, SubmissionRecord,
};

#[cfg(feature = "i18n")]
pub use crate::i18n::{I18nManager, Locale};
