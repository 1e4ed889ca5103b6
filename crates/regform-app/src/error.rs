#![forbid(unsafe_code)]

//! Application errors.

use std::io;
use std::path::PathBuf;

use regform_forms::FormError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid log filter `{filter}`: {reason}")]
    LogFilter { filter: String, reason: String },

    #[error("a global tracing subscriber is already installed")]
    SubscriberInstalled,

    #[error(transparent)]
    Form(#[from] FormError),
}
