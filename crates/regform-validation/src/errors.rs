#![forbid(unsafe_code)]

//! Per-field error map.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::path::FieldPath;
use crate::validators::ValidationError;

/// A single field's error, resolved to display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Stable error code (`required`, `too_short`, ...).
    pub code: &'static str,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// An error set by hand rather than by a validator.
    #[must_use]
    pub fn manual(message: impl Into<String>) -> Self {
        Self::new("manual", message)
    }
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        Self {
            code: err.code,
            message: err.format_message(),
        }
    }
}

/// Errors keyed by field path. At most one error is kept per path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    entries: BTreeMap<FieldPath, FieldError>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Record an error unless the path already has one.
    ///
    /// Returns `true` if the error was stored.
    pub fn insert(&mut self, path: FieldPath, error: impl Into<FieldError>) -> bool {
        if self.entries.contains_key(&path) {
            return false;
        }
        self.entries.insert(path, error.into());
        true
    }

    /// Record an error, replacing any existing one for the path.
    pub fn set(&mut self, path: FieldPath, error: impl Into<FieldError>) {
        self.entries.insert(path, error.into());
    }

    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&FieldError> {
        self.entries.get(path)
    }

    /// The message for `path`, if it has an error.
    #[must_use]
    pub fn message(&self, path: &FieldPath) -> Option<&str> {
        self.get(path).map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn contains(&self, path: &FieldPath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn remove(&mut self, path: &FieldPath) -> Option<FieldError> {
        self.entries.remove(path)
    }

    /// Remove `prefix` and every path under it.
    pub fn clear_under(&mut self, prefix: &FieldPath) {
        self.entries.retain(|path, _| !path.starts_with(prefix));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Errors whose path is `prefix` or lies under it.
    #[must_use]
    pub fn under(&self, prefix: &FieldPath) -> FieldErrors {
        FieldErrors {
            entries: self
                .entries
                .iter()
                .filter(|(path, _)| path.starts_with(prefix))
                .map(|(p, e)| (p.clone(), e.clone()))
                .collect(),
        }
    }

    /// Drop errors under entry `removed` of `array` and shift later entries down.
    pub fn reindex_after_removal(&mut self, array: &FieldPath, removed: usize) {
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .filter_map(|(path, err)| path.after_removal(array, removed).map(|p| (p, err)))
            .collect();
    }

    /// Copy errors from `other` for paths that have none here.
    pub fn merge(&mut self, other: FieldErrors) {
        for (path, err) in other.entries {
            self.insert(path, err);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FieldError)> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.entries.keys()
    }
}

impl FromIterator<(FieldPath, FieldError)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (FieldPath, FieldError)>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for (path, err) in iter {
            errors.insert(path, err);
        }
        errors
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a FieldPath, &'a FieldError);
    type IntoIter = std::collections::btree_map::Iter<'a, FieldPath, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
