#![forbid(unsafe_code)]

//! Errors raised by the form controller and field models.
//!
//! These are usage errors (bad paths, wrong value kinds, array misuse,
//! submit sequencing). Field validation failures are never errors of this
//! kind; they live in [`regform_validation::FieldErrors`].

use regform_validation::FieldPath;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(FieldPath),

    #[error("field `{path}` expects a {expected} value, got {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{value}` is not an option for `{path}`")]
    InvalidChoice { path: FieldPath, value: String },

    #[error("field `{0}` is not an array")]
    NotAnArray(FieldPath),

    #[error("cannot remove entry: `{path}` has a minimum length of {min}")]
    LastEntry { path: FieldPath, min: usize },

    #[error("index {index} is out of range for `{path}` (len {len})")]
    IndexOutOfRange {
        path: FieldPath,
        index: usize,
        len: usize,
    },

    #[error("a submission is already in flight")]
    SubmitInFlight,

    #[error("submission ticket is stale or already finished")]
    StaleTicket,
}
