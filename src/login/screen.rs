use std::fmt::{Display, Formatter};

use crate::components::{FormInput, InputView};
use crate::form::{
    ControllerBinding, FormController, FormError, FormModel, FormOptions, FormResult,
    FormSnapshot, ValidationError,
};
#[cfg(feature = "i18n")]
use crate::i18n::I18nManager;

use super::handler::{AsyncLoginHandler, LoginHandler};
use super::model::{
    LoginField, LoginForm, LoginFormEmailLens, LoginFormFields, LoginFormPasswordLens,
    LoginFormUsernameLens, SubmissionRecord,
};
use super::rules::{FieldFailure, validate_email, validate_password, validate_username};

pub type LoginController = FormController<LoginForm, FieldFailure>;
pub type LoginBinding<L> = ControllerBinding<LoginForm, FieldFailure, L>;

/// One discrete input event delivered by the host.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoginEvent {
    Changed { field: LoginField, value: String },
    Blurred { field: LoginField },
    SubmitRequested,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dispatched {
    Updated,
    SubmitBlocked,
    Submitted,
    Rejected,
}

/// Static copy drawn on the screen.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoginCopy {
    pub title: String,
    pub submit_label: String,
    pub username_placeholder: String,
    pub email_placeholder: String,
    pub password_placeholder: String,
}

impl Default for LoginCopy {
    fn default() -> Self {
        Self {
            title: "Welcome".to_string(),
            submit_label: "Sign in".to_string(),
            username_placeholder: "Username".to_string(),
            email_placeholder: "Email".to_string(),
            password_placeholder: "Password".to_string(),
        }
    }
}

impl LoginCopy {
    #[cfg(feature = "i18n")]
    pub fn localized(i18n: &I18nManager) -> Self {
        Self {
            title: i18n.t("login.title"),
            submit_label: i18n.t("login.submit"),
            username_placeholder: i18n.t("login.username.placeholder"),
            email_placeholder: i18n.t("login.email.placeholder"),
            password_placeholder: i18n.t("login.password.placeholder"),
        }
    }

    fn placeholder(&self, field: LoginField) -> &str {
        match field {
            LoginField::Username => &self.username_placeholder,
            LoginField::Email => &self.email_placeholder,
            LoginField::Password => &self.password_placeholder,
        }
    }
}

/// Everything a host needs to draw the screen once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoginView {
    pub title: String,
    pub inputs: Vec<InputView>,
    pub submit_label: String,
    pub submit_error: Option<String>,
}

impl Display for LoginView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(error) = &self.submit_error {
            writeln!(f, "! {error}")?;
        }
        for input in &self.inputs {
            writeln!(f, "{input}")?;
        }
        write!(f, "<{}>", self.submit_label)
    }
}

/// The login screen: owns the form state and its three bound inputs.
pub struct LoginScreen {
    controller: LoginController,
    copy: LoginCopy,
    #[cfg(feature = "i18n")]
    i18n: Option<I18nManager>,
}

impl LoginScreen {
    pub fn new(options: FormOptions) -> FormResult<Self> {
        Self::with_copy(options, LoginCopy::default())
    }

    pub fn with_copy(options: FormOptions, copy: LoginCopy) -> FormResult<Self> {
        let controller = LoginController::new(LoginForm::default(), options);
        register_rules(&controller)?;
        Ok(Self {
            controller,
            copy,
            #[cfg(feature = "i18n")]
            i18n: None,
        })
    }

    /// Screen copy and validation messages come from `i18n`.
    #[cfg(feature = "i18n")]
    pub fn localized(options: FormOptions, i18n: I18nManager) -> FormResult<Self> {
        let mut screen = Self::with_copy(options, LoginCopy::localized(&i18n))?;
        screen.i18n = Some(i18n);
        Ok(screen)
    }

    pub fn controller(&self) -> &LoginController {
        &self.controller
    }

    pub fn copy(&self) -> &LoginCopy {
        &self.copy
    }

    pub fn username_input(&self) -> FormInput<LoginBinding<LoginFormUsernameLens>> {
        FormInput::new(self.controller.bind(fields().username()))
            .placeholder(self.copy.placeholder(LoginField::Username))
    }

    pub fn email_input(&self) -> FormInput<LoginBinding<LoginFormEmailLens>> {
        FormInput::new(self.controller.bind(fields().email()))
            .placeholder(self.copy.placeholder(LoginField::Email))
    }

    pub fn password_input(&self) -> FormInput<LoginBinding<LoginFormPasswordLens>> {
        FormInput::new(self.controller.bind(fields().password()))
            .placeholder(self.copy.placeholder(LoginField::Password))
            .masked(LoginField::Password.is_masked())
    }

    pub fn change(&self, field: LoginField, value: impl Into<String>) -> FormResult<()> {
        let value = value.into();
        match field {
            LoginField::Username => self.username_input().change_text(value),
            LoginField::Email => self.email_input().change_text(value),
            LoginField::Password => self.password_input().change_text(value),
        }
    }

    pub fn blur(&self, field: LoginField) -> FormResult<()> {
        match field {
            LoginField::Username => self.username_input().blur(),
            LoginField::Email => self.email_input().blur(),
            LoginField::Password => self.password_input().blur(),
        }
    }

    /// Validates every field and hands a [`SubmissionRecord`] to `handler`
    /// only when all of them pass. Returns whether the handler was called.
    pub fn submit<H>(&self, handler: &H) -> FormResult<bool>
    where
        H: LoginHandler + ?Sized,
    {
        self.controller.submit(|form| {
            LoginHandler::login(handler, SubmissionRecord::from_validated(form))
        })
    }

    /// [`LoginScreen::submit`] for an async collaborator. Dropping the future
    /// before it completes puts the form back to `Idle`.
    pub async fn submit_async<H>(&self, handler: &H) -> FormResult<bool>
    where
        H: AsyncLoginHandler + ?Sized,
    {
        self.controller
            .submit_async(|form| {
                AsyncLoginHandler::login(handler, SubmissionRecord::from_validated(form))
            })
            .await
    }

    /// Applies one host event. A rejected submission is reported through
    /// [`LoginScreen::view`]'s `submit_error`, not as an `Err`.
    pub fn dispatch<H>(&self, event: LoginEvent, handler: &H) -> FormResult<Dispatched>
    where
        H: LoginHandler + ?Sized,
    {
        match event {
            LoginEvent::Changed { field, value } => {
                self.change(field, value)?;
                Ok(Dispatched::Updated)
            }
            LoginEvent::Blurred { field } => {
                self.blur(field)?;
                Ok(Dispatched::Updated)
            }
            LoginEvent::SubmitRequested => match self.submit(handler) {
                Ok(true) => Ok(Dispatched::Submitted),
                Ok(false) => Ok(Dispatched::SubmitBlocked),
                Err(FormError::SubmitRejected(_)) => Ok(Dispatched::Rejected),
                Err(error) => Err(error),
            },
        }
    }

    pub fn view(&self) -> FormResult<LoginView> {
        let inputs = vec![
            self.username_input().render_with(|e| self.error_text(e))?,
            self.email_input().render_with(|e| self.error_text(e))?,
            self.password_input().render_with(|e| self.error_text(e))?,
        ];
        Ok(LoginView {
            title: self.copy.title.clone(),
            inputs,
            submit_label: self.copy.submit_label.clone(),
            submit_error: self.controller.submit_error()?,
        })
    }

    /// The field that should take focus, if any field has an error.
    pub fn focus_target(&self) -> FormResult<Option<LoginField>> {
        Ok(self
            .controller
            .first_error_field()?
            .and_then(LoginField::from_key))
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<LoginForm, FieldFailure>> {
        self.controller.snapshot()
    }

    /// The error currently shown under `field`, if any.
    pub fn visible_error(&self, field: LoginField) -> FormResult<Option<FieldFailure>> {
        let fields = fields();
        match field {
            LoginField::Username => self.controller.field_error_for_display(fields.username()),
            LoginField::Email => self.controller.field_error_for_display(fields.email()),
            LoginField::Password => self.controller.field_error_for_display(fields.password()),
        }
    }

    pub fn reset(&self) -> FormResult<()> {
        self.controller.reset_to_initial()
    }

    fn error_text(&self, error: &FieldFailure) -> String {
        #[cfg(feature = "i18n")]
        if let Some(i18n) = &self.i18n {
            return i18n.message(error);
        }
        error.message()
    }
}

fn fields() -> LoginFormFields {
    LoginForm::fields()
}

fn register_rules(controller: &LoginController) -> FormResult<()> {
    let fields = fields();
    controller.register_field_validator(fields.username(), |_: &LoginForm, value: &String| {
        validate_username(value)
    })?;
    controller.register_field_validator(fields.email(), |_: &LoginForm, value: &String| {
        validate_email(value)
    })?;
    controller.register_field_validator(fields.password(), |_: &LoginForm, value: &String| {
        validate_password(value)
    })?;
    controller.register_required_field(fields.username())?;
    controller.register_required_field(fields.email())?;
    controller.register_required_field(fields.password())
}
