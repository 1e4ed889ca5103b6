#![forbid(unsafe_code)]

//! Event loop.
//!
//! The loop owns the terminal session, the presenter, and the model. Each
//! iteration drains finished background tasks, redraws when something
//! changed, then waits briefly for terminal input.
//!
//! # Tasks
//!
//! [`Cmd::Task`] closures run on their own thread. Their result message comes
//! back over an `mpsc` channel and is folded into the model on the UI thread,
//! so the model is never shared.

use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use regform_core::event::Event;
use regform_core::terminal_session::{SessionOptions, TerminalSession};
use regform_render::buffer::Buffer;
use regform_render::presenter::Presenter;

use crate::app::{AppModel, Cmd, Msg};
use crate::error::AppError;

/// How long one iteration waits for input.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Default)]
pub struct ProgramConfig {
    /// Stay on the main screen instead of the alternate screen.
    pub inline: bool,
    /// Quit on its own after this long.
    pub exit_after: Option<Duration>,
}

impl ProgramConfig {
    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            alternate_screen: !self.inline,
            bracketed_paste: true,
            focus_events: false,
        }
    }
}

pub struct Program {
    model: AppModel,
    config: ProgramConfig,
    tx: Sender<Msg>,
    rx: Receiver<Msg>,
    dirty: bool,
}

impl Program {
    #[must_use]
    pub fn new(model: AppModel, config: ProgramConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            model,
            config,
            tx,
            rx,
            dirty: true,
        }
    }

    #[must_use]
    pub fn model(&self) -> &AppModel {
        &self.model
    }

    /// Take over the terminal and run until quit.
    ///
    /// # Errors
    ///
    /// Terminal I/O and form usage errors end the loop.
    pub fn run(&mut self) -> Result<(), AppError> {
        let session = TerminalSession::new(self.config.session_options())?;
        let mut presenter = Presenter::new(io::stdout());
        tracing::info!(inline = self.config.inline, "registration form started");
        let result = self.run_loop(&session, &mut presenter);
        drop(session);
        match &result {
            Ok(()) => tracing::info!("registration form closed"),
            Err(err) => tracing::error!(%err, "registration form failed"),
        }
        result
    }

    fn run_loop(
        &mut self,
        session: &TerminalSession,
        presenter: &mut Presenter<Stdout>,
    ) -> Result<(), AppError> {
        let deadline = self.config.exit_after.map(|after| Instant::now() + after);
        loop {
            if self.drain_tasks()? {
                return Ok(());
            }
            if self.dirty {
                let (width, height) = session.size()?;
                let mut frame = Buffer::new(width, height);
                self.model.view(&mut frame);
                presenter.present(&frame)?;
                self.dirty = false;
            }
            if deadline.is_some_and(|at| Instant::now() >= at) {
                tracing::info!("exit timer elapsed");
                return Ok(());
            }
            if !session.poll_event(POLL_INTERVAL)? {
                continue;
            }
            let Some(event) = session.read_event()? else {
                continue;
            };
            if matches!(event, Event::Resize { .. }) {
                presenter.invalidate();
            }
            self.dirty = true;
            if self.dispatch(Msg::Event(event))? {
                return Ok(());
            }
        }
    }

    /// Fold finished tasks into the model. Returns `true` on quit.
    fn drain_tasks(&mut self) -> Result<bool, AppError> {
        loop {
            match self.rx.try_recv() {
                Ok(msg) => {
                    self.dirty = true;
                    if self.dispatch(msg)? {
                        return Ok(true);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return Ok(false),
            }
        }
    }

    /// Update the model and run the command. Returns `true` on quit.
    pub fn dispatch(&mut self, msg: Msg) -> Result<bool, AppError> {
        let cmd = self.model.update(msg)?;
        self.execute(cmd)
    }

    fn execute(&mut self, cmd: Cmd) -> Result<bool, AppError> {
        match cmd {
            Cmd::None => Ok(false),
            Cmd::Quit => Ok(true),
            Cmd::Task(task) => {
                let tx = self.tx.clone();
                thread::Builder::new()
                    .name("regform-submit".into())
                    .spawn(move || {
                        // The receiver is gone only after the loop has exited.
                        let _ = tx.send(task());
                    })?;
                Ok(false)
            }
        }
    }

    /// Block until the next task message arrives, then fold it in.
    ///
    /// Returns `Ok(None)` when no task can ever report back.
    pub fn wait_for_task(&mut self, timeout: Duration) -> Result<Option<bool>, AppError> {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => self.dispatch(msg).map(Some),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogRing;
    use chrono::NaiveDate;
    use regform_core::event::{KeyCode, KeyEvent};
    use regform_forms::{
        Address, FailingSubmitHandler, FormOptions, Gender, Hobby, RegistrationDraft,
        RegistrationForm,
    };
    use std::sync::Arc;

    use crate::app::Status;

    fn draft() -> RegistrationDraft {
        let start = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        RegistrationDraft {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@doe.com".into(),
            age: "30".into(),
            gender: Some(Gender::Others),
            address: Address {
                city: "NYC".into(),
                state: "NY".into(),
            },
            hobbies: vec![Hobby::new("chess")],
            start_date: Some(start),
            subscribe: false,
            referral: String::new(),
        }
    }

    fn program(handler: crate::app::SharedHandler) -> Program {
        let form = RegistrationForm::new(draft(), FormOptions::default()).unwrap();
        Program::new(
            AppModel::new(form, handler, LogRing::new(8)),
            ProgramConfig::default(),
        )
    }

    #[test]
    fn inline_keeps_main_screen() {
        let config = ProgramConfig {
            inline: true,
            exit_after: None,
        };
        assert!(!config.session_options().alternate_screen);
        assert!(ProgramConfig::default().session_options().alternate_screen);
    }

    #[test]
    fn submit_task_reports_back_over_channel() {
        let mut program = program(Arc::new(FailingSubmitHandler::new("offline")));
        let quit = program
            .dispatch(Msg::Event(Event::Key(KeyEvent::new(KeyCode::Enter))))
            .unwrap();
        assert!(!quit);
        assert!(program.model().form().is_submitting());

        let folded = program.wait_for_task(Duration::from_secs(5)).unwrap();
        assert_eq!(folded, Some(false));
        assert!(!program.model().form().is_submitting());
        assert_eq!(
            program.model().status(),
            &Status::Failed("offline".to_string())
        );
    }

    #[test]
    fn quit_key_stops_dispatch() {
        let mut program = program(Arc::new(FailingSubmitHandler::new("unused")));
        let key = KeyEvent::new(KeyCode::Char('q'))
            .with_modifiers(regform_core::event::Modifiers::CTRL);
        assert!(program.dispatch(Msg::Event(Event::Key(key))).unwrap());
    }
}
