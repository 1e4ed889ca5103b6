#![forbid(unsafe_code)]

//! Raw-mode guard for the form's terminal.
//!
//! [`TerminalSession`] records every [`TerminalModes`] flag it turns on.
//! Teardown walks [`TEARDOWN_ORDER`] and switches off only what was enabled,
//! then shows the cursor and leaves raw mode. The same teardown runs from
//! `Drop`, from a panic hook, and from a SIGINT/SIGTERM watcher thread.
//!
//! ```no_run
//! use regform_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//!     ..Default::default()
//! })?;
//! assert!(session.modes().contains(regform_core::terminal_session::TerminalModes::ALT_SCREEN));
//! drop(session);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Stdout, Write};
use std::sync::OnceLock;
use std::time::Duration;

use bitflags::bitflags;
use crossterm::{cursor, event as ct_event, execute, terminal};

use crate::event::Event;

bitflags! {
    /// Optional terminal modes a session may switch on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TerminalModes: u8 {
        const ALT_SCREEN = 1 << 0;
        const BRACKETED_PASTE = 1 << 1;
        const FOCUS_EVENTS = 1 << 2;
    }
}

/// Modes are switched off in this order, the reverse of how they are enabled.
pub const TEARDOWN_ORDER: [TerminalModes; 3] = [
    TerminalModes::FOCUS_EVENTS,
    TerminalModes::BRACKETED_PASTE,
    TerminalModes::ALT_SCREEN,
];

/// Which modes to request. All off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Draw on the alternate screen so the shell's scrollback survives.
    pub alternate_screen: bool,
    /// Deliver pastes as one [`Event::Paste`].
    pub bracketed_paste: bool,
    /// Deliver [`Event::Focus`].
    pub focus_events: bool,
}

impl SessionOptions {
    #[must_use]
    pub fn modes(&self) -> TerminalModes {
        let mut modes = TerminalModes::empty();
        modes.set(TerminalModes::ALT_SCREEN, self.alternate_screen);
        modes.set(TerminalModes::BRACKETED_PASTE, self.bracketed_paste);
        modes.set(TerminalModes::FOCUS_EVENTS, self.focus_events);
        modes
    }
}

fn switch_on(out: &mut Stdout, mode: TerminalModes) -> io::Result<()> {
    if mode == TerminalModes::ALT_SCREEN {
        execute!(out, terminal::EnterAlternateScreen)
    } else if mode == TerminalModes::BRACKETED_PASTE {
        execute!(out, ct_event::EnableBracketedPaste)
    } else if mode == TerminalModes::FOCUS_EVENTS {
        execute!(out, ct_event::EnableFocusChange)
    } else {
        Ok(())
    }
}

fn switch_off(out: &mut Stdout, mode: TerminalModes) -> io::Result<()> {
    if mode == TerminalModes::ALT_SCREEN {
        execute!(out, terminal::LeaveAlternateScreen)
    } else if mode == TerminalModes::BRACKETED_PASTE {
        execute!(out, ct_event::DisableBracketedPaste)
    } else if mode == TerminalModes::FOCUS_EVENTS {
        execute!(out, ct_event::DisableFocusChange)
    } else {
        Ok(())
    }
}

/// Switch off `modes`, show the cursor, leave raw mode. Errors are ignored:
/// this runs while tearing down.
fn restore(modes: TerminalModes) {
    let mut out = io::stdout();
    for mode in TEARDOWN_ORDER {
        if modes.contains(mode) {
            let _ = switch_off(&mut out, mode);
        }
    }
    let _ = execute!(out, cursor::Show);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

/// Owns raw mode for its lifetime. Keep at most one alive.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    enabled: TerminalModes,
    #[cfg(unix)]
    signals: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode, then switch on each requested mode.
    ///
    /// # Errors
    ///
    /// Any failing terminal command. Modes already switched on are restored
    /// before returning.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();
        terminal::enable_raw_mode()?;

        let mut session = Self {
            options,
            enabled: TerminalModes::empty(),
            #[cfg(unix)]
            signals: None,
        };
        #[cfg(unix)]
        {
            session.signals = Some(SignalGuard::spawn()?);
        }

        let mut out = io::stdout();
        for mode in TEARDOWN_ORDER.into_iter().rev() {
            if options.modes().contains(mode) {
                switch_on(&mut out, mode)?;
                session.enabled.insert(mode);
            }
        }
        execute!(out, cursor::Hide)?;

        #[cfg(feature = "tracing")]
        tracing::info!(modes = ?session.enabled, "terminal session started");
        Ok(session)
    }

    /// Modes currently switched on.
    #[must_use]
    pub fn modes(&self) -> TerminalModes {
        self.enabled
    }

    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for input. `Ok(true)` means [`Self::read_event`]
    /// will not block.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        ct_event::poll(timeout)
    }

    /// Next event. `Ok(None)` for input the form has no use for.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        Ok(Event::from_crossterm(ct_event::read()?))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        #[cfg(unix)]
        drop(self.signals.take());
        restore(self.enabled);
        self.enabled = TerminalModes::empty();
        #[cfg(feature = "tracing")]
        tracing::info!("terminal session restored");
    }
}

fn install_panic_hook() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let next = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore(TerminalModes::all());
            next(info);
        }));
    });
}

/// Restores the terminal and exits when SIGINT or SIGTERM arrives.
#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    watcher: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn spawn() -> io::Result<Self> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM};

        let mut signals =
            signal_hook::iterator::Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let watcher = std::thread::Builder::new()
            .name("regform-signals".into())
            .spawn(move || {
                let Some(signal) = signals.forever().next() else {
                    return;
                };
                #[cfg(feature = "tracing")]
                tracing::warn!(signal, "terminating on signal");
                restore(TerminalModes::all());
                std::process::exit(128 + signal);
            })?;
        Ok(Self {
            handle,
            watcher: Some(watcher),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(watcher) = self.watcher.take() {
            let _ = watcher.join();
        }
    }
}
