#![forbid(unsafe_code)]

//! Command-line arguments.
//!
//! Every flag has a `REGFORM_*` environment fallback. Explicit flags win over
//! the environment, and the environment wins over defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use regform_forms::{FormOptions, ReValidateMode, ValidationMode};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "regform",
    version,
    about = "Terminal registration form",
    after_help = "KEYS:\n    Tab / Shift-Tab   Next / previous field\n    Enter             Submit, press a button, or toggle the calendar\n    Ctrl+R            Reset the form\n    Ctrl+Q / Ctrl+C   Quit"
)]
pub struct Opts {
    /// Render in the main screen instead of the alternate screen.
    #[arg(long, env = "REGFORM_INLINE")]
    pub inline: bool,

    /// When fields are first validated.
    #[arg(long, value_enum, default_value_t = ModeArg::OnSubmit, env = "REGFORM_MODE")]
    pub mode: ModeArg,

    /// When fields are validated again after the first submit.
    #[arg(long, value_enum, default_value_t = RevalidateArg::OnChange, env = "REGFORM_REVALIDATE")]
    pub revalidate: RevalidateArg,

    /// Also write log records to this file.
    #[arg(long, value_name = "PATH", env = "REGFORM_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, value_name = "LEVEL", default_value = "info", env = "REGFORM_LOG_LEVEL")]
    pub log_level: String,

    /// Fail every submission with this message.
    #[arg(long, value_name = "MESSAGE", env = "REGFORM_FAIL_SUBMISSIONS")]
    pub fail_submissions: Option<String>,

    /// Quit after this many milliseconds (0 disables).
    #[arg(long, value_name = "N", default_value_t = 0, env = "REGFORM_EXIT_AFTER_MS")]
    pub exit_after_ms: u64,
}

impl Opts {
    #[must_use]
    pub fn form_options(&self) -> FormOptions {
        FormOptions::default()
            .mode(self.mode.into())
            .re_validate_mode(self.revalidate.into())
    }

    #[must_use]
    pub fn exit_after(&self) -> Option<Duration> {
        (self.exit_after_ms > 0).then(|| Duration::from_millis(self.exit_after_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    OnSubmit,
    OnBlur,
    OnChange,
    OnTouched,
    All,
}

impl From<ModeArg> for ValidationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::OnSubmit => ValidationMode::OnSubmit,
            ModeArg::OnBlur => ValidationMode::OnBlur,
            ModeArg::OnChange => ValidationMode::OnChange,
            ModeArg::OnTouched => ValidationMode::OnTouched,
            ModeArg::All => ValidationMode::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RevalidateArg {
    OnChange,
    OnBlur,
    OnSubmit,
}

impl From<RevalidateArg> for ReValidateMode {
    fn from(arg: RevalidateArg) -> Self {
        match arg {
            RevalidateArg::OnChange => ReValidateMode::OnChange,
            RevalidateArg::OnBlur => ReValidateMode::OnBlur,
            RevalidateArg::OnSubmit => ReValidateMode::OnSubmit,
        }
    }
}
