use super::controller::{ErrorDisplay, FieldKey, FormController, FormResult, read_lock};
use super::validation::{FieldLens, FormModel, ValidationError};

/// What a bound input needs from the form: read the value and the error to
/// show, write the value, mark the field touched.
pub trait FieldBinding {
    type Error: ValidationError;

    fn key(&self) -> FieldKey;
    fn value(&self) -> FormResult<String>;
    fn display_error(&self) -> FormResult<Option<Self::Error>>;
    fn is_required(&self) -> FormResult<bool>;
    fn set_value(&self, value: String) -> FormResult<()>;
    fn touch(&self) -> FormResult<()>;
}

/// A [`FieldBinding`] backed by one text field of a [`FormController`].
#[derive(Clone)]
pub struct ControllerBinding<T, E, L>
where
    T: FormModel,
    E: ValidationError,
    L: FieldLens<T, Value = String>,
{
    controller: FormController<T, E>,
    lens: L,
}

impl<T, E, L> FieldBinding for ControllerBinding<T, E, L>
where
    T: FormModel,
    E: ValidationError,
    L: FieldLens<T, Value = String>,
{
    type Error = E;

    fn key(&self) -> FieldKey {
        self.lens.key()
    }

    fn value(&self) -> FormResult<String> {
        let state = read_lock(&self.controller.state, "reading bound value")?;
        Ok(self.lens.get(&state.model).clone())
    }

    fn display_error(&self) -> FormResult<Option<E>> {
        self.controller.display_error(self.lens.key())
    }

    fn is_required(&self) -> FormResult<bool> {
        self.controller.is_required_key(self.lens.key())
    }

    fn set_value(&self, value: String) -> FormResult<()> {
        self.controller.set(self.lens, value)
    }

    fn touch(&self) -> FormResult<()> {
        self.controller.touch(self.lens)
    }
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn bind<L>(&self, lens: L) -> ControllerBinding<T, E, L>
    where
        L: FieldLens<T, Value = String>,
    {
        ControllerBinding {
            controller: self.clone(),
            lens,
        }
    }

    pub fn field_error_for_display<L>(&self, lens: L) -> FormResult<Option<E>>
    where
        L: FieldLens<T>,
    {
        self.display_error(lens.key())
    }

    fn display_error(&self, key: FieldKey) -> FormResult<Option<E>> {
        let state = read_lock(&self.state, "reading display error")?;
        let Some(meta) = state.field_meta.get(&key) else {
            return Ok(None);
        };
        if self.options.error_display == ErrorDisplay::TouchedOrSubmitted
            && !meta.touched
            && state.submit_count == 0
        {
            return Ok(None);
        }
        Ok(meta.errors.first().cloned())
    }
}
