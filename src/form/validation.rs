use std::collections::BTreeMap;
use std::sync::Arc;

use super::controller::{
    FieldKey, FieldValidatorFn, FieldValidators, FormController, FormResult, SubmitState,
    ValidationMode, read_lock, write_lock,
};

/// A field-level validation failure that can be rendered under an input.
pub trait ValidationError: Clone + Send + Sync + 'static {
    /// Fallback message used when no catalog entry is available.
    fn message(&self) -> String;

    /// Catalog key for a localized message.
    fn message_key(&self) -> Option<&'static str> {
        None
    }

    /// `{name}` substitutions applied to the localized template.
    fn message_params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;

    /// Every field key, in declaration order.
    fn field_keys() -> &'static [FieldKey];
}

pub trait FieldValidator<T, L, E>: Send + Sync
where
    L: FieldLens<T>,
    E: ValidationError,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E>;
}

impl<T, L, E, F> FieldValidator<T, L, E> for F
where
    L: FieldLens<T>,
    E: ValidationError,
    F: for<'a> Fn(&'a T, &'a L::Value) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E> {
        (self)(model, value)
    }
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    /// Appends a validator for the lens' field. Validators run in
    /// registration order.
    pub fn register_field_validator<L, V>(&self, lens: L, validator: V) -> FormResult<()>
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let key = lens.key();
        let validator = Arc::new(validator);
        let wrapped: FieldValidatorFn<T, E> =
            Arc::new(move |model: &T| validator.validate(model, lens.get(model)));
        let mut validators = write_lock(&self.field_validators, "registering field validator")?;
        validators.entry(key).or_default().push(wrapped);
        Ok(())
    }

    /// Writes a new value for one field.
    ///
    /// Under [`ValidationMode::OnChange`] only this field is re-validated.
    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "writing form model")?;
            lens.set(&mut state.model, value);
            let is_dirty = lens.get(&state.model) != lens.get(&state.initial_model);
            if is_dirty {
                state.dirty_fields.insert(key);
            } else {
                state.dirty_fields.remove(&key);
            }
            state.ensure_meta(key).dirty = is_dirty;
            if state.submit_state == SubmitState::Submitted {
                state.submit_state = SubmitState::Idle;
            }
            tracing::debug!(form = state.id.0, field = key.as_str(), dirty = is_dirty, "field changed");
        }

        if self.options.validate_mode == ValidationMode::OnChange {
            let _ = self.validate_field_by_key(key)?;
        }
        Ok(())
    }

    /// Marks the field as touched, which makes its error eligible for display.
    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "touching field")?;
            state.ensure_meta(key).touched = true;
            tracing::debug!(form = state.id.0, field = key.as_str(), "field touched");
        }

        if self.options.validate_mode == ValidationMode::OnBlur {
            let _ = self.validate_field_by_key(key)?;
        }
        Ok(())
    }

    pub fn validate_field<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        self.validate_field_by_key(lens.key())
    }

    /// Runs every registered validator against the current model and stores
    /// the results. Does not touch fields or count as a submit attempt.
    pub fn validate_form(&self) -> FormResult<bool> {
        let validators = read_lock(&self.field_validators, "reading validators for form")?;
        let mut state = write_lock(&self.state, "applying form validation result")?;
        let errors = self.collect_form_errors(&validators, &state.model);
        let is_valid = errors.values().all(Vec::is_empty);
        for (key, field_errors) in errors {
            state.apply_errors(key, field_errors);
        }
        Ok(is_valid)
    }

    pub(super) fn validate_field_by_key(&self, key: FieldKey) -> FormResult<bool> {
        let validators = read_lock(&self.field_validators, "reading field validators")?
            .get(&key)
            .cloned()
            .unwrap_or_default();

        let mut state = write_lock(&self.state, "writing field validation result")?;
        let errors = self.run_validators(&validators, &state.model);
        let is_valid = errors.is_empty();
        tracing::debug!(form = state.id.0, field = key.as_str(), valid = is_valid, "field validated");
        state.apply_errors(key, errors);
        Ok(is_valid)
    }

    pub(super) fn collect_form_errors(
        &self,
        validators: &FieldValidators<T, E>,
        model: &T,
    ) -> BTreeMap<FieldKey, Vec<E>> {
        validators
            .iter()
            .map(|(key, field_validators)| (*key, self.run_validators(field_validators, model)))
            .collect()
    }

    fn run_validators(&self, validators: &[FieldValidatorFn<T, E>], model: &T) -> Vec<E> {
        let mut errors = Vec::new();
        for validator in validators {
            if let Err(error) = validator(model) {
                errors.push(error);
                if self.options.validate_first_error_only {
                    break;
                }
            }
        }
        errors
    }
}
