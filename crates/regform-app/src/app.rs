#![forbid(unsafe_code)]

//! Application model.
//!
//! [`AppModel`] follows the Elm architecture: [`AppModel::update`] folds a
//! [`Msg`] into the state and returns a [`Cmd`] for the event loop to run,
//! and [`AppModel::view`] draws the whole screen into a buffer.
//!
//! # Layout
//!
//! ```text
//! ┌───────────────────────────────┐
//! │ title bar                     │
//! │ registration form (scrolls)   │
//! │ status line                   │
//! │ log pane (when tall enough)   │
//! └───────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use regform_core::event::{Event, KeyCode, KeyEvent};
use regform_core::geometry::Rect;
use regform_forms::{
    FormAction, FormError, RegistrationDraft, RegistrationForm, SubmitAttempt, SubmitError,
    SubmitHandler, TicketId,
};
use regform_render::buffer::Buffer;
use regform_render::drawing::{display_width, draw_str};
use regform_render::style::{Color, Style};

use crate::error::AppError;
use crate::logging::LogRing;

pub const TITLE: &str = "Registration Form";

const KEY_HELP: &str = "Tab move  Enter submit  ^R reset  ^Q quit";

/// Log lines shown under the status line.
const LOG_LINES: u16 = 5;

/// Below this height the log pane is hidden.
const MIN_HEIGHT_FOR_LOG: u16 = 16;

pub type SharedHandler = Arc<dyn SubmitHandler<RegistrationDraft>>;

// ============================================================================
// Messages and commands
// ============================================================================

#[derive(Debug)]
pub enum Msg {
    /// Terminal input.
    Event(Event),
    /// A background submission finished.
    Submitted {
        id: TicketId,
        result: Result<(), SubmitError>,
    },
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Msg::Event(event)
    }
}

/// Work for the event loop.
pub enum Cmd {
    None,
    Quit,
    /// Run on a spawned thread; the returned message is fed back to
    /// [`AppModel::update`].
    Task(Box<dyn FnOnce() -> Msg + Send>),
}

impl Cmd {
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        Cmd::Task(Box::new(f))
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cmd::None => f.write_str("None"),
            Cmd::Quit => f.write_str("Quit"),
            Cmd::Task(_) => f.write_str("Task"),
        }
    }
}

/// Outcome of the last submit, shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    /// Validation failed on this many fields.
    Invalid(usize),
    Submitting,
    Submitted,
    Failed(String),
    Reset,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => f.write_str("Ready"),
            Status::Invalid(1) => f.write_str("1 field needs attention"),
            Status::Invalid(n) => write!(f, "{n} fields need attention"),
            Status::Submitting => f.write_str("Submitting..."),
            Status::Submitted => f.write_str("Registration submitted"),
            Status::Failed(reason) => write!(f, "Submission failed: {reason}"),
            Status::Reset => f.write_str("Form reset"),
        }
    }
}

// ============================================================================
// AppModel
// ============================================================================

pub struct AppModel {
    form: RegistrationForm,
    handler: SharedHandler,
    log: LogRing,
    status: Status,
}

impl fmt::Debug for AppModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppModel")
            .field("form", &self.form)
            .field("status", &self.status)
            .field("log_lines", &self.log.len())
            .finish_non_exhaustive()
    }
}

impl AppModel {
    pub fn new(form: RegistrationForm, handler: SharedHandler, log: LogRing) -> Self {
        Self {
            form,
            handler,
            log,
            status: Status::Ready,
        }
    }

    #[must_use]
    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// # Errors
    ///
    /// Form usage errors are returned; validation failures are not errors.
    pub fn update(&mut self, msg: Msg) -> Result<Cmd, AppError> {
        match msg {
            Msg::Event(event) => self.handle_event(&event),
            Msg::Submitted { id, result } => {
                self.status = match &result {
                    Ok(()) => Status::Submitted,
                    Err(err) => Status::Failed(err.message().to_string()),
                };
                self.form.finish_submit(id, result)?;
                Ok(Cmd::None)
            }
        }
    }

    fn handle_event(&mut self, event: &Event) -> Result<Cmd, AppError> {
        if let Some(key) = event.pressed_key() {
            if is_quit(key) {
                tracing::info!("quit requested");
                return Ok(Cmd::Quit);
            }
            if key.ctrl() && key.is_char('r') {
                if self.form.is_submitting() {
                    return Ok(Cmd::None);
                }
                self.form.reset();
                self.status = Status::Reset;
                tracing::info!("form reset");
                return Ok(Cmd::None);
            }
        }
        match self.form.handle_event(event)? {
            FormAction::SubmitRequested => self.submit(),
            FormAction::Changed | FormAction::None => Ok(Cmd::None),
        }
    }

    fn submit(&mut self) -> Result<Cmd, AppError> {
        let attempt = match self.form.begin_submit() {
            Ok(attempt) => attempt,
            Err(FormError::SubmitInFlight) => return Ok(Cmd::None),
            Err(err) => return Err(err.into()),
        };
        match attempt {
            SubmitAttempt::Invalid(errors) => {
                tracing::debug!(errors = errors.len(), "submission blocked by validation");
                self.status = Status::Invalid(errors.len());
                Ok(Cmd::None)
            }
            SubmitAttempt::Ready(ticket) => {
                self.status = Status::Submitting;
                let handler = Arc::clone(&self.handler);
                Ok(Cmd::task(move || {
                    let (id, values) = ticket.into_parts();
                    let result = handler.submit(&values);
                    Msg::Submitted { id, result }
                }))
            }
        }
    }

    // ------------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------------

    pub fn view(&mut self, buf: &mut Buffer) {
        let area = buf.bounds();
        if area.is_empty() {
            return;
        }
        buf.clear();

        let (title, rest) = area.split_top(1);
        self.render_title(title, buf);

        let log_rows = if area.height >= MIN_HEIGHT_FOR_LOG {
            LOG_LINES + 1
        } else {
            0
        };
        let (rest, log) = rest.split_bottom(log_rows);
        let (body, status) = rest.split_bottom(1);

        self.form.render(body, buf);
        self.render_status(status, buf);
        if !log.is_empty() {
            self.render_log(log, buf);
        }
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let style = Style::new().fg(Color::Black).bg(Color::Cyan).bold();
        buf.set_style(area, style);
        let width = u16::try_from(display_width(TITLE)).unwrap_or(u16::MAX);
        let x = area.x + area.width.saturating_sub(width) / 2;
        draw_str(buf, x, area.y, TITLE, style, area.width);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let base = Style::new().reverse();
        buf.set_style(area, base);
        let status_style = match &self.status {
            Status::Failed(_) | Status::Invalid(_) => base.fg(Color::Red),
            Status::Submitted => base.fg(Color::Green),
            _ => base,
        };
        let text = format!(" {}", self.status);
        let used = draw_str(buf, area.x, area.y, &text, status_style, area.width);

        let help_width = u16::try_from(display_width(KEY_HELP)).unwrap_or(u16::MAX);
        if used + help_width + 2 <= area.width {
            let x = area.x + area.width - help_width - 1;
            draw_str(buf, x, area.y, KEY_HELP, base, help_width);
        }
    }

    fn render_log(&self, area: Rect, buf: &mut Buffer) {
        let (header, lines) = area.split_top(1);
        let dim = Style::new().fg(Color::DarkGray);
        let rule = format!("-- Log {}", "-".repeat(usize::from(header.width)));
        draw_str(buf, header.x, header.y, &rule, dim, header.width);

        for (dy, line) in (0..lines.height).zip(self.log.tail(usize::from(lines.height))) {
            draw_str(buf, lines.x, lines.y + dy, &line, Style::new(), lines.width);
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.ctrl() && matches!(key.code, KeyCode::Char('c' | 'q'))
}
