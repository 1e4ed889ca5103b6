#![forbid(unsafe_code)]

//! Submit handlers.
//!
//! A handler receives a validated snapshot of the form values. Returning an
//! error surfaces its message as the form's root error.

use thiserror::Error;

use crate::draft::RegistrationDraft;

/// Failure reported by a submit handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmitError {
    message: String,
}

impl SubmitError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Consumes validated form values.
pub trait SubmitHandler<T>: Send + Sync {
    fn submit(&self, values: &T) -> Result<(), SubmitError>;
}

impl<T, F> SubmitHandler<T> for F
where
    F: Fn(&T) -> Result<(), SubmitError> + Send + Sync,
{
    fn submit(&self, values: &T) -> Result<(), SubmitError> {
        self(values)
    }
}

/// Logs the submitted draft as JSON and succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSubmitHandler;

impl SubmitHandler<RegistrationDraft> for LoggingSubmitHandler {
    fn submit(&self, values: &RegistrationDraft) -> Result<(), SubmitError> {
        let json = values
            .to_json()
            .map_err(|err| SubmitError::new(format!("could not encode submission: {err}")))?;
        tracing::info!(draft = %json, "registration submitted");
        Ok(())
    }
}

/// Always fails with a fixed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailingSubmitHandler {
    message: String,
}

impl FailingSubmitHandler {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<T> SubmitHandler<T> for FailingSubmitHandler {
    fn submit(&self, _values: &T) -> Result<(), SubmitError> {
        tracing::warn!(reason = %self.message, "rejecting submission");
        Err(SubmitError::new(self.message.clone()))
    }
}
