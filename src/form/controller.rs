use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Deserialize;
use thiserror::Error;

use super::validation::{FieldLens, FormModel, ValidationError};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Where the form sits in its submit cycle.
///
/// A failed validation never leaves the form in a distinct state: it stays
/// `Idle` with every error made visible.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Submitted,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

/// When a field's current error is shown to the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDisplay {
    /// Show as soon as validation produced an error.
    Eager,
    /// Show only after the field was blurred or a submit was attempted.
    TouchedOrSubmitted,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub validate_first_error_only: bool,
    pub error_display: ErrorDisplay,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_mode: ValidationMode::OnChange,
            validate_first_error_only: true,
            error_display: ErrorDisplay::TouchedOrSubmitted,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMeta<E> {
    pub dirty: bool,
    pub touched: bool,
    pub errors: Vec<E>,
}

impl<E> Default for FieldMeta<E> {
    fn default() -> Self {
        Self {
            dirty: false,
            touched: false,
            errors: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub model: T,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub submit_error: Option<String>,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    #[error("form submit is already in progress")]
    AlreadySubmitting,
    #[error("submission rejected: {0}")]
    SubmitRejected(String),
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type FieldValidatorFn<T, E> = Arc<dyn Fn(&T) -> Result<(), E> + Send + Sync>;
pub(super) type FieldValidators<T, E> = BTreeMap<FieldKey, Vec<FieldValidatorFn<T, E>>>;

pub(super) struct FormState<T, E> {
    pub(super) id: FormId,
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) submit_error: Option<String>,
    pub(super) dirty_fields: BTreeSet<FieldKey>,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
    pub(super) first_error: Option<FieldKey>,
}

impl<T, E> FormState<T, E> {
    pub(super) fn ensure_meta(&mut self, key: FieldKey) -> &mut FieldMeta<E> {
        self.field_meta.entry(key).or_default()
    }
}

impl<T: FormModel, E> FormState<T, E> {
    pub(super) fn apply_errors(&mut self, key: FieldKey, errors: Vec<E>) {
        self.ensure_meta(key).errors = errors;
        self.first_error = first_error_key::<T, E>(&self.field_meta);
    }
}

/// Shared handle over one form's state.
///
/// Clones refer to the same state, so input callbacks can capture a clone
/// while the owning screen keeps its own.
#[derive(Clone)]
pub struct FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState<T, E>>>,
    pub(super) field_validators: Arc<RwLock<FieldValidators<T, E>>>,
    pub(super) required_fields: Arc<RwLock<BTreeSet<FieldKey>>>,
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    pub fn new(initial: T, options: FormOptions) -> Self {
        Self {
            options,
            state: Arc::new(RwLock::new(FormState {
                id: FormId::next(),
                initial_model: initial.clone(),
                model: initial,
                submit_state: SubmitState::Idle,
                submit_count: 0,
                submit_error: None,
                dirty_fields: BTreeSet::new(),
                field_meta: BTreeMap::new(),
                first_error: None,
            })),
            field_validators: Arc::new(RwLock::new(BTreeMap::new())),
            required_fields: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn register_required_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let mut required = write_lock(&self.required_fields, "registering required field")?;
        required.insert(lens.key());
        Ok(())
    }

    pub fn is_required<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        self.is_required_key(lens.key())
    }

    pub(super) fn is_required_key(&self, key: FieldKey) -> FormResult<bool> {
        Ok(read_lock(&self.required_fields, "reading required fields")?.contains(&key))
    }

    /// Validates the whole form and, only if every field passes, hands the
    /// current model to `f`.
    ///
    /// Returns `Ok(false)` when validation blocked the submit. A rejection from
    /// `f` puts the form back to `Idle` with a form-level error and is returned
    /// as [`FormError::SubmitRejected`].
    pub fn submit<F, R>(&self, f: F) -> FormResult<bool>
    where
        F: FnOnce(T) -> Result<(), R>,
        R: Display,
    {
        let Some((model, guard)) = self.begin_submit()? else {
            return Ok(false);
        };
        let result = f(model).map_err(|error| error.to_string());
        self.finish_submit(guard, result)
    }

    pub async fn submit_async<F, Fut, R>(&self, f: F) -> FormResult<bool>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), R>>,
        R: Display,
    {
        let Some((model, guard)) = self.begin_submit()? else {
            return Ok(false);
        };
        let result = f(model).await.map_err(|error| error.to_string());
        self.finish_submit(guard, result)
    }

    /// On success the form is `Submitting` until the returned guard is
    /// disarmed by [`Self::finish_submit`] or dropped.
    fn begin_submit(&self) -> FormResult<Option<(T, SubmitGuard<'_, T, E>)>> {
        let validators = read_lock(&self.field_validators, "reading validators for submit")?;
        let mut state = write_lock(&self.state, "preparing submit")?;
        if state.submit_state == SubmitState::Submitting {
            return Err(FormError::AlreadySubmitting);
        }
        state.submit_count = state.submit_count.saturating_add(1);
        state.submit_error = None;
        for key in T::field_keys() {
            state.ensure_meta(*key).touched = true;
        }

        let errors = self.collect_form_errors(&validators, &state.model);
        for (key, field_errors) in errors {
            state.ensure_meta(key).errors = field_errors;
        }
        state.first_error = first_error_key::<T, E>(&state.field_meta);

        if let Some(key) = state.first_error {
            transition_submit_state(&mut state, SubmitState::Idle)?;
            tracing::debug!(
                form = state.id.0,
                first_error = key.as_str(),
                "submit blocked by validation"
            );
            return Ok(None);
        }

        transition_submit_state(&mut state, SubmitState::Submitting)?;
        let model = state.model.clone();
        drop(state);
        Ok(Some((model, SubmitGuard::arm(&self.state))))
    }

    fn finish_submit(
        &self,
        mut guard: SubmitGuard<'_, T, E>,
        result: Result<(), String>,
    ) -> FormResult<bool> {
        let mut state = write_lock(&self.state, "completing submit")?;
        guard.disarm();
        match result {
            Ok(()) => {
                transition_submit_state(&mut state, SubmitState::Submitted)?;
                tracing::info!(form = state.id.0, count = state.submit_count, "form submitted");
                Ok(true)
            }
            Err(message) => {
                transition_submit_state(&mut state, SubmitState::Idle)?;
                tracing::warn!(form = state.id.0, error = %message, "submission rejected");
                state.submit_error = Some(message.clone());
                Err(FormError::SubmitRejected(message))
            }
        }
    }

    pub fn reset_to_initial(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        state.model = state.initial_model.clone();
        state.submit_state = SubmitState::Idle;
        state.submit_count = 0;
        state.submit_error = None;
        state.dirty_fields.clear();
        state.first_error = None;
        for meta in state.field_meta.values_mut() {
            *meta = FieldMeta::default();
        }
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T, E>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        let is_valid = state.field_meta.values().all(|meta| meta.errors.is_empty());
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            submit_error: state.submit_error.clone(),
            is_dirty: !state.dirty_fields.is_empty(),
            is_valid,
            field_meta: state.field_meta.clone(),
        })
    }

    pub fn field_meta<L>(&self, lens: L) -> FormResult<Option<FieldMeta<E>>>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&lens.key())
            .cloned())
    }

    /// The first field, in declaration order, that currently has an error. Hosts use
    /// it to move focus after a blocked submit.
    pub fn first_error_field(&self) -> FormResult<Option<FieldKey>> {
        Ok(read_lock(&self.state, "reading first error key")?.first_error)
    }

    pub fn submit_error(&self) -> FormResult<Option<String>> {
        Ok(read_lock(&self.state, "reading submit error")?
            .submit_error
            .clone())
    }
}

/// Puts an abandoned submit back to `Idle`: the collaborator panicked or its
/// future was dropped before completing.
struct SubmitGuard<'a, T, E> {
    state: &'a RwLock<FormState<T, E>>,
    armed: bool,
}

impl<'a, T, E> SubmitGuard<'a, T, E> {
    fn arm(state: &'a RwLock<FormState<T, E>>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<T, E> Drop for SubmitGuard<'_, T, E> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.submit_state == SubmitState::Submitting {
            state.submit_state = SubmitState::Idle;
            tracing::warn!(form = state.id.0, "submit abandoned before completion");
        }
    }
}

pub(super) fn transition_submit_state<T, E>(
    state: &mut FormState<T, E>,
    next: SubmitState,
) -> FormResult<()> {
    let current = state.submit_state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Submitting)
            | (SubmitState::Submitted, SubmitState::Submitting)
            | (SubmitState::Submitting, SubmitState::Submitted)
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.submit_state = next;
    Ok(())
}

/// Declared fields win over keys that only show up in the metadata map.
pub(super) fn first_error_key<T: FormModel, E>(
    field_meta: &BTreeMap<FieldKey, FieldMeta<E>>,
) -> Option<FieldKey> {
    let has_error = |key: &FieldKey| field_meta.get(key).is_some_and(|meta| !meta.errors.is_empty());
    T::field_keys()
        .iter()
        .copied()
        .find(has_error)
        .or_else(|| field_meta.keys().copied().find(has_error))
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
