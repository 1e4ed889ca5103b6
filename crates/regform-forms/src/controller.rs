#![forbid(unsafe_code)]

//! Form-state controller.
//!
//! [`FormController`] owns the current values of a [`FormModel`], runs a
//! [`Resolver`] plus per-field registration rules, and tracks which errors
//! are visible, which fields are touched or dirty, the field arrays, and the
//! two-phase submit lifecycle.
//!
//! # Validation timing
//!
//! Before the first submit, [`ValidationMode`] decides whether a change or a
//! blur validates the affected field. After a submit attempt,
//! [`ReValidateMode`] takes over. Submitting always validates everything.
//!
//! # Submitting
//!
//! [`FormController::begin_submit`] validates and, when the values pass,
//! hands out a [`SubmitTicket`] carrying a snapshot of the values. The
//! caller runs its handler (possibly on another thread) and reports back via
//! [`FormController::finish_submit`]. Only one ticket is live at a time.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use regform_validation::{
    FieldError, FieldErrors, FieldPath, MinLength, Required, Resolver, ValidationResult, Validator,
};

use crate::error::FormError;
use crate::model::{FieldValue, FormModel};
use crate::submit::{SubmitError, SubmitHandler};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// When fields validate before the first submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Only submitting validates.
    #[default]
    OnSubmit,
    /// Leaving a field validates it.
    OnBlur,
    /// Every change validates the changed field.
    OnChange,
    /// First blur validates; after that, every change does.
    OnTouched,
    /// Both blur and change validate.
    All,
}

/// When fields re-validate after a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReValidateMode {
    #[default]
    OnChange,
    OnBlur,
    OnSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormOptions {
    pub mode: ValidationMode,
    pub re_validate_mode: ReValidateMode,
}

impl FormOptions {
    #[must_use]
    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn re_validate_mode(mut self, mode: ReValidateMode) -> Self {
        self.re_validate_mode = mode;
        self
    }
}

/// Rules attached to a field while it is registered.
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    required: Option<Required>,
    min_length: Option<MinLength>,
}

impl RegisterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The field must not be blank (empty text, unchecked, no choice, no date).
    #[must_use]
    pub fn required(mut self, message: impl Into<String>) -> Self {
        let message: String = message.into();
        self.required = Some(Required::new().allow_whitespace().with_message(message));
        self
    }

    /// Text must have at least `min` characters. Empty text is left to `required`.
    #[must_use]
    pub fn min_length(mut self, min: usize, message: impl Into<String>) -> Self {
        let message: String = message.into();
        self.min_length = Some(MinLength::new(min).with_message(message));
        self
    }

    fn check(&self, value: &FieldValue) -> Option<FieldError> {
        if let Some(required) = &self.required
            && value.is_blank()
        {
            let result = match value {
                FieldValue::Text(s) => required.validate(s.as_str()),
                _ => required.validate(""),
            };
            if let ValidationResult::Invalid(err) = result {
                return Some(err.into());
            }
        }
        if let (Some(rule), FieldValue::Text(s)) = (&self.min_length, value)
            && !s.is_empty()
            && let ValidationResult::Invalid(err) = rule.validate(s.as_str())
        {
            return Some(err.into());
        }
        None
    }
}

/// Options for a field array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldArrayOptions {
    /// `remove` refuses to go below this length.
    pub min_len: usize,
}

impl Default for FieldArrayOptions {
    fn default() -> Self {
        Self { min_len: 1 }
    }
}

// ---------------------------------------------------------------------------
// Field arrays
// ---------------------------------------------------------------------------

/// Stable identity of a field-array entry. Survives removal of other entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldKey(u64);

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field-{}", self.0)
    }
}

/// One entry of a field array as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayEntry {
    pub key: FieldKey,
    pub index: usize,
}

#[derive(Debug, Clone)]
struct ArrayState {
    keys: Vec<FieldKey>,
    options: FieldArrayOptions,
}

// ---------------------------------------------------------------------------
// Submit types
// ---------------------------------------------------------------------------

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(u64);

/// A validated snapshot handed to the submit handler.
#[derive(Debug, Clone)]
pub struct SubmitTicket<T> {
    id: TicketId,
    values: T,
}

impl<T> SubmitTicket<T> {
    #[must_use]
    pub fn id(&self) -> TicketId {
        self.id
    }

    #[must_use]
    pub fn values(&self) -> &T {
        &self.values
    }

    #[must_use]
    pub fn into_parts(self) -> (TicketId, T) {
        (self.id, self.values)
    }
}

/// Result of [`FormController::begin_submit`].
#[derive(Debug, Clone)]
pub enum SubmitAttempt<T> {
    /// Validation failed; the errors are now visible.
    Invalid(FieldErrors),
    /// Validation passed; run the handler and call `finish_submit`.
    Ready(SubmitTicket<T>),
}

/// Final outcome of a synchronous [`FormController::submit_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid,
    Succeeded,
    /// The handler failed; its message is the root error.
    Failed(String),
}

/// Snapshot of the controller's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormStateSnapshot {
    pub is_dirty: bool,
    pub is_valid: bool,
    pub is_submitting: bool,
    pub is_submitted: bool,
    pub is_submit_successful: bool,
    pub submit_count: u32,
    pub touched_count: usize,
    pub dirty_count: usize,
}

// ---------------------------------------------------------------------------
// FormController
// ---------------------------------------------------------------------------

/// Owns form values and their validation state.
pub struct FormController<T: FormModel, R: Resolver<T>> {
    values: T,
    defaults: T,
    resolver: R,
    options: FormOptions,
    errors: FieldErrors,
    touched: BTreeSet<FieldPath>,
    dirty: BTreeSet<FieldPath>,
    registrations: BTreeMap<FieldPath, RegisterOptions>,
    arrays: BTreeMap<FieldPath, ArrayState>,
    next_key: u64,
    submit_count: u32,
    is_submitted: bool,
    is_submit_successful: bool,
    in_flight: Option<TicketId>,
    next_ticket: u64,
}

impl<T: FormModel, R: Resolver<T>> fmt::Debug for FormController<T, R>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("values", &self.values)
            .field("options", &self.options)
            .field("errors", &self.errors)
            .field("submit_count", &self.submit_count)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<T: FormModel, R: Resolver<T>> FormController<T, R> {
    pub fn new(defaults: T, resolver: R, options: FormOptions) -> Self {
        Self {
            values: defaults.clone(),
            defaults,
            resolver,
            options,
            errors: FieldErrors::new(),
            touched: BTreeSet::new(),
            dirty: BTreeSet::new(),
            registrations: BTreeMap::new(),
            arrays: BTreeMap::new(),
            next_key: 0,
            submit_count: 0,
            is_submitted: false,
            is_submit_successful: false,
            in_flight: None,
            next_ticket: 0,
        }
    }

    // -- Values ----------------------------------------------------------------

    #[must_use]
    pub fn values(&self) -> &T {
        &self.values
    }

    #[must_use]
    pub fn default_values(&self) -> &T {
        &self.defaults
    }

    #[must_use]
    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn get(&self, path: &FieldPath) -> Result<FieldValue, FormError> {
        self.values.get(path)
    }

    /// Write a value, update dirty state, and validate if the mode says so.
    pub fn set_value(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FormError> {
        self.values.set(path, value)?;
        self.update_dirty(path);
        if self.validates_on_change(path) {
            self.validate_path(path);
        }
        Ok(())
    }

    /// Mark a field touched and validate it if the mode says so.
    pub fn blur(&mut self, path: &FieldPath) {
        self.touched.insert(path.clone());
        if self.validates_on_blur() {
            self.validate_path(path);
        }
    }

    #[must_use]
    pub fn is_touched(&self, path: &FieldPath) -> bool {
        self.touched.contains(path)
    }

    #[must_use]
    pub fn is_dirty(&self, path: &FieldPath) -> bool {
        self.dirty.contains(path)
    }

    fn update_dirty(&mut self, path: &FieldPath) {
        let changed = match (self.values.get(path), self.defaults.get(path)) {
            (Ok(now), Ok(initial)) => now != initial,
            _ => true,
        };
        if changed {
            self.dirty.insert(path.clone());
        } else {
            self.dirty.remove(path);
        }
    }

    fn validates_on_change(&self, path: &FieldPath) -> bool {
        if self.is_submitted {
            return self.options.re_validate_mode == ReValidateMode::OnChange;
        }
        match self.options.mode {
            ValidationMode::OnChange | ValidationMode::All => true,
            ValidationMode::OnTouched => self.touched.contains(path),
            ValidationMode::OnSubmit | ValidationMode::OnBlur => false,
        }
    }

    fn validates_on_blur(&self) -> bool {
        if self.is_submitted {
            return self.options.re_validate_mode == ReValidateMode::OnBlur;
        }
        matches!(
            self.options.mode,
            ValidationMode::OnBlur | ValidationMode::OnTouched | ValidationMode::All
        )
    }

    // -- Registration ------------------------------------------------------------

    /// Mount a field with its registration rules.
    pub fn register(&mut self, path: &FieldPath, options: RegisterOptions) {
        tracing::debug!(field = %path, "field registered");
        self.registrations.insert(path.clone(), options);
    }

    /// Unmount a field. Its value is kept; its rules, errors, and touched
    /// state are dropped.
    pub fn unregister(&mut self, path: &FieldPath) {
        if self.registrations.remove(path).is_some() {
            tracing::debug!(field = %path, "field unregistered");
        }
        self.errors.clear_under(path);
        self.touched.remove(path);
    }

    #[must_use]
    pub fn is_registered(&self, path: &FieldPath) -> bool {
        self.registrations.contains_key(path)
    }

    // -- Validation --------------------------------------------------------------

    /// Resolver errors plus registration-rule errors for the current values.
    ///
    /// The resolver runs first, so its message wins when both fail a path.
    fn collect_errors(&self) -> FieldErrors {
        let mut errors = self.resolver.resolve(&self.values);
        errors.merge(self.registration_errors(None));
        errors
    }

    fn registration_errors(&self, under: Option<&FieldPath>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (path, rules) in &self.registrations {
            if under.is_some_and(|prefix| !path.starts_with(prefix)) {
                continue;
            }
            if let Ok(value) = self.values.get(path)
                && let Some(err) = rules.check(&value)
            {
                errors.insert(path.clone(), err);
            }
        }
        errors
    }

    fn validate_path(&mut self, path: &FieldPath) {
        let mut found = self.resolver.resolve_path(&self.values, path);
        found.merge(self.registration_errors(Some(path)));
        self.errors.clear_under(path);
        self.errors.merge(found);
    }

    /// Validate one path (or everything) now. Returns `true` if it is valid.
    ///
    /// A whole-form trigger keeps the root error.
    pub fn trigger(&mut self, path: Option<&FieldPath>) -> bool {
        match path {
            Some(path) => {
                self.validate_path(path);
                self.errors.under(path).is_empty()
            }
            None => {
                let root = FieldPath::root();
                let kept = self.errors.remove(&root);
                self.errors = self.collect_errors();
                let valid = self.errors.is_empty();
                if let Some(err) = kept {
                    self.errors.set(root, err);
                }
                valid
            }
        }
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn error(&self, path: &FieldPath) -> Option<&str> {
        self.errors.message(path)
    }

    /// Set an error by hand, replacing any existing one for the path.
    pub fn set_error(&mut self, path: &FieldPath, message: impl Into<String>) {
        self.errors.set(path.clone(), FieldError::manual(message));
    }

    /// Clear one path (and everything under it), or every error.
    pub fn clear_errors(&mut self, path: Option<&FieldPath>) {
        match path {
            Some(path) => self.errors.clear_under(path),
            None => self.errors.clear(),
        }
    }

    #[must_use]
    pub fn form_state(&self) -> FormStateSnapshot {
        FormStateSnapshot {
            is_dirty: !self.dirty.is_empty(),
            is_valid: self.collect_errors().is_empty(),
            is_submitting: self.in_flight.is_some(),
            is_submitted: self.is_submitted,
            is_submit_successful: self.is_submit_successful,
            submit_count: self.submit_count,
            touched_count: self.touched.len(),
            dirty_count: self.dirty.len(),
        }
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    // -- Field arrays ------------------------------------------------------------

    fn alloc_key(&mut self) -> FieldKey {
        self.next_key += 1;
        FieldKey(self.next_key)
    }

    /// Declare a field array, assigning keys to its current entries.
    pub fn field_array(
        &mut self,
        array: &FieldPath,
        options: FieldArrayOptions,
    ) -> Result<(), FormError> {
        let len = self.values.array_len(array)?;
        let keys = (0..len).map(|_| self.alloc_key()).collect();
        self.arrays.insert(array.clone(), ArrayState { keys, options });
        Ok(())
    }

    fn array_state(&mut self, array: &FieldPath) -> Result<&mut ArrayState, FormError> {
        if !self.arrays.contains_key(array) {
            self.field_array(array, FieldArrayOptions::default())?;
        }
        self.arrays
            .get_mut(array)
            .ok_or_else(|| FormError::NotAnArray(array.clone()))
    }

    /// Entries of the array with their stable keys.
    pub fn fields(&mut self, array: &FieldPath) -> Result<Vec<ArrayEntry>, FormError> {
        let state = self.array_state(array)?;
        Ok(state
            .keys
            .iter()
            .enumerate()
            .map(|(index, key)| ArrayEntry { key: *key, index })
            .collect())
    }

    /// Append an empty entry. Returns its index.
    pub fn append(&mut self, array: &FieldPath) -> Result<usize, FormError> {
        self.array_state(array)?;
        let index = self.values.push_entry(array)?;
        let key = self.alloc_key();
        if let Some(state) = self.arrays.get_mut(array) {
            state.keys.push(key);
        }
        tracing::debug!(array = %array, index, "entry appended");
        self.after_array_change(array);
        Ok(index)
    }

    /// Remove entry `index`, re-indexing errors, touched, dirty, and
    /// registrations of later entries.
    pub fn remove(&mut self, array: &FieldPath, index: usize) -> Result<(), FormError> {
        let len = self.values.array_len(array)?;
        let min_len = self.array_state(array)?.options.min_len;
        if index >= len {
            return Err(FormError::IndexOutOfRange {
                path: array.clone(),
                index,
                len,
            });
        }
        if len <= min_len {
            return Err(FormError::LastEntry {
                path: array.clone(),
                min: min_len,
            });
        }
        self.values.remove_entry(array, index)?;
        if let Some(state) = self.arrays.get_mut(array)
            && index < state.keys.len()
        {
            state.keys.remove(index);
        }
        self.errors.reindex_after_removal(array, index);
        self.touched = reindex_set(&self.touched, array, index);
        self.dirty = reindex_set(&self.dirty, array, index);
        self.registrations = std::mem::take(&mut self.registrations)
            .into_iter()
            .filter_map(|(p, r)| p.after_removal(array, index).map(|p| (p, r)))
            .collect();
        tracing::debug!(array = %array, index, "entry removed");
        self.after_array_change(array);
        Ok(())
    }

    fn after_array_change(&mut self, array: &FieldPath) {
        self.update_dirty(array);
        if self.validates_on_change(array) {
            self.validate_path(array);
        }
    }

    // -- Submit --------------------------------------------------------------------

    /// Validate everything and, if valid, start a submission.
    ///
    /// Clears the previous root error. Fails with
    /// [`FormError::SubmitInFlight`] while another ticket is live.
    pub fn begin_submit(&mut self) -> Result<SubmitAttempt<T>, FormError> {
        if self.in_flight.is_some() {
            return Err(FormError::SubmitInFlight);
        }
        self.submit_count += 1;
        self.is_submitted = true;
        self.is_submit_successful = false;
        self.errors = self.collect_errors();

        if !self.errors.is_empty() {
            tracing::debug!(
                submit_count = self.submit_count,
                errors = self.errors.len(),
                "submit blocked by validation"
            );
            return Ok(SubmitAttempt::Invalid(self.errors.clone()));
        }

        self.next_ticket += 1;
        let id = TicketId(self.next_ticket);
        self.in_flight = Some(id);
        tracing::debug!(submit_count = self.submit_count, "submit started");
        Ok(SubmitAttempt::Ready(SubmitTicket {
            id,
            values: self.values.clone(),
        }))
    }

    /// Record the handler's result for the live ticket.
    pub fn finish_submit(
        &mut self,
        id: TicketId,
        result: Result<(), SubmitError>,
    ) -> Result<(), FormError> {
        if self.in_flight != Some(id) {
            return Err(FormError::StaleTicket);
        }
        self.in_flight = None;
        match result {
            Ok(()) => {
                self.is_submit_successful = true;
                tracing::debug!("submit finished");
            }
            Err(err) => {
                tracing::warn!(error = %err, "submit handler failed");
                self.set_error(&FieldPath::root(), err.to_string());
            }
        }
        Ok(())
    }

    /// Run both submit phases with `handler` on the current thread.
    pub fn submit_with<H>(&mut self, handler: &H) -> Result<SubmitOutcome, FormError>
    where
        H: SubmitHandler<T> + ?Sized,
    {
        let span = tracing::info_span!("submit", attempt = self.submit_count + 1);
        let _guard = span.enter();
        match self.begin_submit()? {
            SubmitAttempt::Invalid(_) => Ok(SubmitOutcome::Invalid),
            SubmitAttempt::Ready(ticket) => {
                let result = handler.submit(ticket.values());
                let outcome = match &result {
                    Ok(()) => SubmitOutcome::Succeeded,
                    Err(err) => SubmitOutcome::Failed(err.to_string()),
                };
                self.finish_submit(ticket.id(), result)?;
                Ok(outcome)
            }
        }
    }

    // -- Reset ---------------------------------------------------------------------

    /// Restore the default values and clear all state.
    ///
    /// Registrations stay; array keys are reassigned. A live ticket becomes
    /// stale.
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.errors.clear();
        self.touched.clear();
        self.dirty.clear();
        self.submit_count = 0;
        self.is_submitted = false;
        self.is_submit_successful = false;
        self.in_flight = None;
        let arrays: Vec<(FieldPath, FieldArrayOptions)> = self
            .arrays
            .iter()
            .map(|(p, s)| (p.clone(), s.options))
            .collect();
        self.arrays.clear();
        for (path, options) in arrays {
            // A model without this array anymore simply drops it.
            let _ = self.field_array(&path, options);
        }
        tracing::debug!("form reset");
    }

    /// Replace the defaults with `values`, then reset.
    pub fn reset_to(&mut self, values: T) {
        self.defaults = values;
        self.reset();
    }
}

fn reindex_set(set: &BTreeSet<FieldPath>, array: &FieldPath, removed: usize) -> BTreeSet<FieldPath> {
    set.iter()
        .filter_map(|p| p.after_removal(array, removed))
        .collect()
}
