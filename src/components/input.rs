use std::fmt::{Display, Formatter};

use crate::form::{FieldBinding, FieldKey, FormResult, ValidationError};

pub const MASK_CHAR: char = '•';

/// What a host draws for one bound input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputView {
    pub key: FieldKey,
    pub label: Option<String>,
    /// Raw field value. Hosts that keep their own edit buffer sync it from here.
    pub value: String,
    /// Text to draw in the control: the value, masked when `masked` is set.
    pub text: String,
    pub placeholder: Option<String>,
    pub masked: bool,
    pub required: bool,
    pub error: Option<String>,
}

impl InputView {
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Display for InputView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(label) = &self.label {
            f.write_str(label)?;
            if self.required {
                f.write_str(" *")?;
            }
            writeln!(f)?;
        }
        if self.is_empty() {
            write!(f, "[{}]", self.placeholder.as_deref().unwrap_or_default())?;
        } else {
            write!(f, "[{}]", self.text)?;
        }
        if let Some(error) = &self.error {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

/// A text input whose value and error live in the form, not in the control.
///
/// Hosts forward keystrokes with [`FormInput::change_text`] and focus loss with
/// [`FormInput::blur`], then redraw from [`FormInput::render`].
#[derive(Clone)]
pub struct FormInput<B: FieldBinding> {
    binding: B,
    label: Option<String>,
    placeholder: Option<String>,
    masked: bool,
}

impl<B: FieldBinding> FormInput<B> {
    pub fn new(binding: B) -> Self {
        Self {
            binding,
            label: None,
            placeholder: None,
            masked: false,
        }
    }

    pub fn label(mut self, value: impl Into<String>) -> Self {
        self.label = Some(value.into());
        self
    }

    pub fn placeholder(mut self, value: impl Into<String>) -> Self {
        self.placeholder = Some(value.into());
        self
    }

    pub fn masked(mut self, value: bool) -> Self {
        self.masked = value;
        self
    }

    pub fn key(&self) -> FieldKey {
        self.binding.key()
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn change_text(&self, text: impl Into<String>) -> FormResult<()> {
        self.binding.set_value(text.into())
    }

    pub fn blur(&self) -> FormResult<()> {
        self.binding.touch()
    }

    pub fn render(&self) -> FormResult<InputView> {
        self.render_with(<B::Error as ValidationError>::message)
    }

    /// Renders with a custom error formatter, e.g. a localized catalog.
    pub fn render_with(&self, format: impl Fn(&B::Error) -> String) -> FormResult<InputView> {
        let value = self.binding.value()?;
        let text = if self.masked {
            value.chars().map(|_| MASK_CHAR).collect()
        } else {
            value.clone()
        };
        Ok(InputView {
            key: self.binding.key(),
            label: self.label.clone(),
            value,
            text,
            placeholder: self.placeholder.clone(),
            masked: self.masked,
            required: self.binding.is_required()?,
            error: self.binding.display_error()?.as_ref().map(format),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Clone, Debug, PartialEq)]
    struct Short;

    impl ValidationError for Short {
        fn message(&self) -> String {
            "too short".to_string()
        }
    }

    #[derive(Default)]
    struct StubBinding {
        value: RefCell<String>,
        touched: RefCell<bool>,
    }

    impl FieldBinding for StubBinding {
        type Error = Short;

        fn key(&self) -> FieldKey {
            FieldKey::new("secret")
        }

        fn value(&self) -> FormResult<String> {
            Ok(self.value.borrow().clone())
        }

        fn display_error(&self) -> FormResult<Option<Short>> {
            let short = self.value.borrow().chars().count() < 3;
            Ok((short && *self.touched.borrow()).then_some(Short))
        }

        fn is_required(&self) -> FormResult<bool> {
            Ok(true)
        }

        fn set_value(&self, value: String) -> FormResult<()> {
            *self.value.borrow_mut() = value;
            Ok(())
        }

        fn touch(&self) -> FormResult<()> {
            *self.touched.borrow_mut() = true;
            Ok(())
        }
    }

    #[test]
    fn masked_input_hides_every_character() {
        let input = FormInput::new(StubBinding::default()).masked(true);
        input.change_text("sé€ret").expect("change");

        let view = input.render().expect("render");
        assert_eq!(view.value, "sé€ret");
        assert_eq!(view.text, "••••••");
        assert!(view.masked);
    }

    #[test]
    fn error_appears_after_blur() {
        let input = FormInput::new(StubBinding::default()).placeholder("Secret");
        input.change_text("ab").expect("change");
        assert_eq!(input.render().expect("render").error, None);

        input.blur().expect("blur");
        assert_eq!(
            input.render().expect("render").error.as_deref(),
            Some("too short")
        );
        assert_eq!(
            input
                .render_with(|_| "curto demais".to_string())
                .expect("render")
                .error
                .as_deref(),
            Some("curto demais")
        );
    }

    #[test]
    fn display_shows_placeholder_then_error_line() {
        let input = FormInput::new(StubBinding::default())
            .label("Secret")
            .placeholder("type here");
        input.blur().expect("blur");

        let rendered = input.render().expect("render").to_string();
        assert_eq!(rendered, "Secret *\n[type here]\n  too short");
    }
}
