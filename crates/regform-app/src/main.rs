#![forbid(unsafe_code)]

//! `regform` binary entry point.

use std::sync::Arc;

use clap::Parser;
use regform_app::cli::Opts;
use regform_app::{AppError, AppModel, Program, ProgramConfig, SharedHandler, logging};
use regform_forms::{FailingSubmitHandler, LoggingSubmitHandler, RegistrationDraft, RegistrationForm};

fn run(opts: &Opts) -> Result<(), AppError> {
    let log = logging::init(&opts.log_level, opts.log_file.as_deref())?;

    let handler: SharedHandler = match &opts.fail_submissions {
        Some(message) => Arc::new(FailingSubmitHandler::new(message.clone())),
        None => Arc::new(LoggingSubmitHandler),
    };
    let form = RegistrationForm::new(RegistrationDraft::default(), opts.form_options())?;
    let model = AppModel::new(form, handler, log);

    let config = ProgramConfig {
        inline: opts.inline,
        exit_after: opts.exit_after(),
    };
    Program::new(model, config).run()
}

fn main() {
    let opts = Opts::parse();
    if let Err(e) = run(&opts) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
