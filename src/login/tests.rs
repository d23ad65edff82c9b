use super::*;
use crate::form::{ErrorDisplay, FormOptions, SubmitState};
use futures::executor::block_on;
use futures::{FutureExt, future};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

fn failure(field: LoginField, kind: FailureKind) -> FieldFailure {
    FieldFailure { field, kind }
}

fn screen() -> LoginScreen {
    LoginScreen::new(FormOptions::default()).expect("screen")
}

fn fill(screen: &LoginScreen, username: &str, email: &str, password: &str) {
    screen.change(LoginField::Username, username).expect("username");
    screen.change(LoginField::Email, email).expect("email");
    screen.change(LoginField::Password, password).expect("password");
}

#[derive(Default)]
struct Recorder {
    records: RefCell<Vec<SubmissionRecord>>,
}

impl LoginHandler for Recorder {
    fn login(&self, record: SubmissionRecord) -> Result<(), LoginRejected> {
        self.records.borrow_mut().push(record);
        Ok(())
    }
}

#[test]
fn empty_value_is_required_for_every_field() {
    for field in LoginField::ALL {
        assert_eq!(
            validate_field(field, ""),
            Err(failure(field, FailureKind::Required))
        );
    }
    assert_eq!(
        validate_field(LoginField::Username, "   "),
        Err(failure(LoginField::Username, FailureKind::Required))
    );
    assert_eq!(
        validate_field(LoginField::Email, " \t"),
        Err(failure(LoginField::Email, FailureKind::Required))
    );
}

#[test]
fn email_shape_rules() {
    for bad in [
        "bob",
        "bob@",
        "@example.com",
        "bob@example",
        "bob@example.",
        "bob@.com",
        "bob@@example.com",
        "bob@exa mple.com",
        "bo b@example.com",
    ] {
        assert_eq!(
            validate_email(bad),
            Err(failure(LoginField::Email, FailureKind::InvalidFormat)),
            "{bad} should be rejected"
        );
    }
    for good in ["bob@example.com", "b.o+b@mail.example.co", "x@y.z"] {
        assert_eq!(validate_email(good), Ok(()), "{good} should be accepted");
    }
}

#[test]
fn password_length_boundary() {
    for len in 1..=5 {
        let value = "a".repeat(len);
        assert_eq!(
            validate_password(&value),
            Err(failure(
                LoginField::Password,
                FailureKind::TooShort { min: MIN_PASSWORD_LEN }
            ))
        );
    }
    assert_eq!(validate_password("123456"), Ok(()));
    assert_eq!(validate_password("çãõéíú"), Ok(()));
    assert_eq!(validate_password("      "), Ok(()));
}

#[test]
fn validation_is_idempotent() {
    for (field, value) in [
        (LoginField::Username, "bob"),
        (LoginField::Email, "bob@"),
        (LoginField::Password, "123"),
    ] {
        let first = validate_field(field, value);
        assert!((0..5).all(|_| validate_field(field, value) == first));
    }
}

#[test]
fn failure_messages_match_rule() {
    assert_eq!(
        failure(LoginField::Username, FailureKind::Required).to_string(),
        "Username is required"
    );
    assert_eq!(
        failure(LoginField::Password, FailureKind::TooShort { min: 6 }).to_string(),
        "Password must be at least 6 characters"
    );
}

#[test]
fn scenario_all_empty_shows_required_everywhere() {
    let screen = screen();
    let recorder = Recorder::default();

    assert!(!screen.submit(&recorder).expect("submit"));
    for field in LoginField::ALL {
        assert_eq!(
            screen.visible_error(field).expect("error"),
            Some(failure(field, FailureKind::Required))
        );
    }
    assert!(recorder.records.borrow().is_empty());
    assert_eq!(
        screen.focus_target().expect("focus"),
        Some(LoginField::Username)
    );
}

#[test]
fn scenario_bad_email_blocks_submit() {
    let screen = screen();
    let recorder = Recorder::default();
    fill(&screen, "bob", "bob@", "123456");

    assert!(!screen.submit(&recorder).expect("submit"));
    assert_eq!(screen.visible_error(LoginField::Username).expect("error"), None);
    assert_eq!(
        screen.visible_error(LoginField::Email).expect("error"),
        Some(failure(LoginField::Email, FailureKind::InvalidFormat))
    );
    assert_eq!(screen.visible_error(LoginField::Password).expect("error"), None);
    assert!(recorder.records.borrow().is_empty());
    assert_eq!(screen.focus_target().expect("focus"), Some(LoginField::Email));
}

#[test]
fn scenario_short_password_blocks_submit() {
    let screen = screen();
    let recorder = Recorder::default();
    fill(&screen, "bob", "bob@example.com", "12345");

    assert!(!screen.submit(&recorder).expect("submit"));
    assert_eq!(
        screen.visible_error(LoginField::Password).expect("error"),
        Some(failure(
            LoginField::Password,
            FailureKind::TooShort { min: MIN_PASSWORD_LEN }
        ))
    );
    assert!(recorder.records.borrow().is_empty());
}

#[test]
fn scenario_valid_form_produces_one_record() {
    let screen = screen();
    let recorder = Recorder::default();
    fill(&screen, "bob", "bob@example.com", "123456");

    assert!(screen.submit(&recorder).expect("submit"));
    let records = recorder.records.borrow();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].username(), "bob");
    assert_eq!(records[0].email(), "bob@example.com");
    assert_eq!(records[0].password(), "123456");
    assert_eq!(
        screen.snapshot().expect("snapshot").submit_state,
        SubmitState::Submitted
    );
}

#[test]
fn fixing_the_field_after_a_blocked_submit_allows_submission() {
    let screen = screen();
    let recorder = Recorder::default();
    fill(&screen, "bob", "bob@", "123456");
    assert!(!screen.submit(&recorder).expect("first submit"));

    screen
        .change(LoginField::Email, "bob@example.com")
        .expect("fix email");
    assert_eq!(screen.visible_error(LoginField::Email).expect("error"), None);
    assert!(screen.submit(&recorder).expect("second submit"));
    assert_eq!(recorder.records.borrow().len(), 1);
}

#[test]
fn errors_stay_hidden_until_blur() {
    let screen = screen();
    screen.change(LoginField::Email, "bob").expect("type");

    assert_eq!(screen.visible_error(LoginField::Email).expect("error"), None);
    let view = screen.view().expect("view");
    assert_eq!(view.inputs[1].error, None);

    screen.blur(LoginField::Email).expect("blur");
    assert_eq!(
        screen.visible_error(LoginField::Email).expect("error"),
        Some(failure(LoginField::Email, FailureKind::InvalidFormat))
    );
    assert_eq!(
        screen.view().expect("view").inputs[1].error.as_deref(),
        Some("Invalid email")
    );
}

#[test]
fn eager_display_shows_errors_while_typing() {
    let screen = LoginScreen::new(FormOptions {
        error_display: ErrorDisplay::Eager,
        ..FormOptions::default()
    })
    .expect("screen");
    screen.change(LoginField::Password, "123").expect("type");

    assert_eq!(
        screen.visible_error(LoginField::Password).expect("error"),
        Some(failure(
            LoginField::Password,
            FailureKind::TooShort { min: MIN_PASSWORD_LEN }
        ))
    );
}

#[test]
fn keystroke_revalidates_only_that_field() {
    let screen = screen();
    screen.change(LoginField::Username, "bob").expect("type");

    let snapshot = screen.snapshot().expect("snapshot");
    assert!(
        snapshot
            .field_meta
            .contains_key(&LoginField::Username.key())
    );
    assert!(!snapshot.field_meta.contains_key(&LoginField::Email.key()));
    assert!(!snapshot.field_meta.contains_key(&LoginField::Password.key()));
}

#[test]
fn view_masks_the_password_and_marks_required() {
    let screen = screen();
    screen.change(LoginField::Password, "hunter22").expect("type");

    let view = screen.view().expect("view");
    assert_eq!(view.title, "Welcome");
    assert_eq!(view.submit_label, "Sign in");
    let password = &view.inputs[2];
    assert_eq!(password.key, LoginField::Password.key());
    assert_eq!(password.text, "••••••••");
    assert_eq!(password.placeholder.as_deref(), Some("Password"));
    assert!(password.required);
    assert!(view.inputs.iter().all(|input| input.required));
    assert!(!view.to_string().contains("hunter22"));
}

#[test]
fn rejected_login_shows_form_level_error_and_returns_to_idle() {
    let screen = screen();
    fill(&screen, "bob", "bob@example.com", "123456");
    let reject = |_record: SubmissionRecord| -> Result<(), LoginRejected> {
        Err(LoginRejected::new("wrong password"))
    };

    let outcome = screen
        .dispatch(LoginEvent::SubmitRequested, &reject)
        .expect("dispatch");
    assert_eq!(outcome, Dispatched::Rejected);
    let view = screen.view().expect("view");
    assert_eq!(view.submit_error.as_deref(), Some("wrong password"));
    assert_eq!(
        screen.snapshot().expect("snapshot").submit_state,
        SubmitState::Idle
    );
}

#[test]
fn dispatch_drives_the_whole_flow() {
    let screen = screen();
    let recorder = Recorder::default();
    let events = [
        LoginEvent::Changed {
            field: LoginField::Username,
            value: "bob".into(),
        },
        LoginEvent::Blurred {
            field: LoginField::Username,
        },
        LoginEvent::Changed {
            field: LoginField::Email,
            value: "bob@example.com".into(),
        },
        LoginEvent::Changed {
            field: LoginField::Password,
            value: "123456".into(),
        },
    ];
    for event in events {
        assert_eq!(
            screen.dispatch(event, &recorder).expect("dispatch"),
            Dispatched::Updated
        );
    }

    assert_eq!(
        screen
            .dispatch(LoginEvent::SubmitRequested, &recorder)
            .expect("submit"),
        Dispatched::Submitted
    );
    assert_eq!(recorder.records.borrow().len(), 1);
}

#[test]
fn blocked_dispatch_reports_blocked() {
    let screen = screen();
    let outcome = screen
        .dispatch(LoginEvent::SubmitRequested, &LogLoginHandler)
        .expect("dispatch");
    assert_eq!(outcome, Dispatched::SubmitBlocked);
}

#[test]
fn async_submit_hands_record_to_future() {
    let screen = screen();
    fill(&screen, "bob", "bob@example.com", "123456");
    let seen = RefCell::new(None);

    let submitted = block_on(screen.submit_async(&|record: SubmissionRecord| {
        *seen.borrow_mut() = Some(record.username().to_string());
        async { Ok::<(), LoginRejected>(()) }
    }))
    .expect("async submit");

    assert!(submitted);
    assert_eq!(seen.borrow().as_deref(), Some("bob"));
    assert!(block_on(screen.submit_async(&LogLoginHandler)).expect("log handler"));
}

#[test]
fn abandoned_async_login_can_be_retried() {
    let screen = screen();
    let recorder = Recorder::default();
    fill(&screen, "bob", "bob@example.com", "123456");

    let never = |_record: SubmissionRecord| future::pending::<Result<(), LoginRejected>>();
    let mut in_flight = Box::pin(screen.submit_async(&never));
    assert!(in_flight.as_mut().now_or_never().is_none());
    drop(in_flight);

    assert_eq!(
        screen.snapshot().expect("snapshot").submit_state,
        SubmitState::Idle
    );
    screen.change(LoginField::Username, "bobby").expect("edit");
    assert_eq!(
        screen
            .dispatch(LoginEvent::SubmitRequested, &recorder)
            .expect("dispatch"),
        Dispatched::Submitted
    );
    assert_eq!(recorder.records.borrow()[0].username(), "bobby");
}

#[test]
fn crashed_login_handler_can_be_retried() {
    let screen = screen();
    let recorder = Recorder::default();
    fill(&screen, "bob", "bob@example.com", "123456");

    let crash = |_record: SubmissionRecord| -> Result<(), LoginRejected> {
        panic!("backend client crashed")
    };
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| screen.submit(&crash)));
    assert!(outcome.is_err());

    assert_eq!(screen.view().expect("view").submit_error, None);
    assert!(screen.submit(&recorder).expect("retry"));
    assert_eq!(recorder.records.borrow().len(), 1);
}

#[test]
fn field_names_parse_case_insensitively() {
    assert_eq!("Email".parse::<LoginField>(), Ok(LoginField::Email));
    assert_eq!(" password ".parse::<LoginField>(), Ok(LoginField::Password));
    assert_eq!(
        "phone".parse::<LoginField>(),
        Err(UnknownField("phone".to_string()))
    );
}

#[test]
fn record_debug_redacts_password() {
    let mut form = LoginForm::default();
    form.username = "bob".into();
    form.password = "123456".into();
    let record = SubmissionRecord::from_validated(form);
    let debug = format!("{record:?}");
    assert!(debug.contains("bob"));
    assert!(!debug.contains("123456"));
}

#[cfg(feature = "i18n")]
#[test]
fn localized_screen_uses_catalog_copy() {
    let screen = LoginScreen::localized(
        FormOptions::default(),
        crate::i18n::I18nManager::with_locale("pt-BR"),
    )
    .expect("screen");
    assert!(!screen.submit(&LogLoginHandler).expect("submit"));

    let view = screen.view().expect("view");
    assert_eq!(view.title, "Bem-vindo(a)");
    assert_eq!(view.submit_label, "Entrar");
    assert_eq!(view.inputs[0].placeholder.as_deref(), Some("Nome de usuário"));
    assert_eq!(view.inputs[0].error.as_deref(), Some("Username é obrigatório"));
    assert_eq!(view.inputs[2].error.as_deref(), Some("Senha é obrigatória"));
}
