#![forbid(unsafe_code)]

//! Terminal front end for the registration form.
//!
//! - [`cli`]: flags and `REGFORM_*` environment fallbacks
//! - [`logging`]: tracing subscriber feeding the in-app log pane
//! - [`app`]: the Elm-style model
//! - [`program`]: terminal event loop and background submissions

pub mod app;
pub mod cli;
pub mod error;
pub mod logging;
pub mod program;

pub use app::{AppModel, Cmd, Msg, SharedHandler, Status};
pub use error::AppError;
pub use logging::{LogRing, TracingLogLayer};
pub use program::{Program, ProgramConfig};
