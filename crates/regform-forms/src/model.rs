#![forbid(unsafe_code)]

//! Path-addressed access to form values.

use chrono::NaiveDate;
use regform_validation::FieldPath;

use crate::error::FormError;

/// A single field value, as seen through a [`FormModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Free text.
    Text(String),
    /// Checkbox state.
    Bool(bool),
    /// A selected option by name; `None` is the empty choice.
    Choice(Option<String>),
    /// A calendar date; `None` when cleared.
    Date(Option<NaiveDate>),
    /// Length of an array field.
    Count(usize),
}

impl FieldValue {
    /// Short name of the variant, used in type-mismatch errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Bool(_) => "bool",
            FieldValue::Choice(_) => "choice",
            FieldValue::Date(_) => "date",
            FieldValue::Count(_) => "count",
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True for the value a `required` rule rejects.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Bool(b) => !b,
            FieldValue::Choice(c) => c.is_none(),
            FieldValue::Date(d) => d.is_none(),
            FieldValue::Count(n) => *n == 0,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Option<NaiveDate>> for FieldValue {
    fn from(d: Option<NaiveDate>) -> Self {
        FieldValue::Date(d)
    }
}

/// A form's value object, addressable by [`FieldPath`].
///
/// Implementations own the mapping from dotted paths to their fields and
/// the array operations behind field arrays.
pub trait FormModel: Clone + Send + 'static {
    /// Read the value at `path`.
    fn get(&self, path: &FieldPath) -> Result<FieldValue, FormError>;

    /// Write the value at `path`.
    fn set(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FormError>;

    /// Length of the array at `path`.
    fn array_len(&self, path: &FieldPath) -> Result<usize, FormError>;

    /// Append an empty entry to the array at `path`, returning its index.
    fn push_entry(&mut self, path: &FieldPath) -> Result<usize, FormError>;

    /// Remove the entry at `index` from the array at `path`.
    fn remove_entry(&mut self, path: &FieldPath, index: usize) -> Result<(), FormError>;
}

/// Build a type-mismatch error for `path`.
pub(crate) fn mismatch(path: &FieldPath, expected: &'static str, found: &FieldValue) -> FormError {
    FormError::TypeMismatch {
        path: path.clone(),
        expected,
        found: found.kind(),
    }
}
