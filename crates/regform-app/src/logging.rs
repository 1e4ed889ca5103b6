#![forbid(unsafe_code)]

//! Tracing setup for the terminal app.
//!
//! The terminal is in raw mode while the form runs, so nothing may be written
//! to stdout or stderr. Events are formatted by [`TracingLogLayer`] into a
//! bounded [`LogRing`] that the log pane reads, and optionally mirrored to a
//! file by a plain `fmt` layer.
//!
//! # Quick Start
//!
//! ```no_run
//! let ring = regform_app::logging::init("info", None)?;
//! tracing::info!("ready");
//! assert_eq!(ring.len(), 1);
//! # Ok::<(), regform_app::AppError>(())
//! ```

use std::collections::VecDeque;
use std::fmt::{self, Write as FmtWrite};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer, fmt as tracing_fmt};

use crate::error::AppError;

/// Lines kept by the ring installed by [`init`].
pub const DEFAULT_CAPACITY: usize = 200;

// ============================================================================
// LogRing
// ============================================================================

/// Bounded, shareable buffer of formatted log lines. Oldest lines drop first.
#[derive(Debug, Clone)]
pub struct LogRing {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogRing {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line.into());
    }

    /// The newest `n` lines, oldest first.
    #[must_use]
    pub fn tail(&self, n: usize) -> Vec<String> {
        let lines = self.lock();
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for LogRing {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ============================================================================
// Event formatting
// ============================================================================

fn level_str(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN ",
        Level::INFO => "INFO ",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        self.push(field, strip_debug_quotes(&rendered));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

fn strip_debug_quotes(s: &str) -> String {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

// ============================================================================
// TracingLogLayer
// ============================================================================

/// A `tracing_subscriber::Layer` that formats each event as one line and
/// pushes it into a [`LogRing`].
#[derive(Debug, Clone)]
pub struct TracingLogLayer {
    ring: LogRing,
    show_time: bool,
    show_target: bool,
}

impl TracingLogLayer {
    #[must_use]
    pub fn new(ring: LogRing) -> Self {
        Self {
            ring,
            show_time: true,
            show_target: false,
        }
    }

    #[must_use]
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    #[must_use]
    pub fn show_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    fn format_event(&self, event: &Event<'_>) -> String {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut line = String::new();
        if self.show_time {
            let _ = write!(line, "{} ", chrono::Local::now().format("%H:%M:%S"));
        }
        line.push_str(level_str(*metadata.level()));
        line.push(' ');
        if self.show_target {
            let _ = write!(line, "{}: ", metadata.target());
        }
        line.push_str(visitor.message.as_deref().unwrap_or_default());
        for (key, value) in &visitor.fields {
            let _ = write!(line, " {key}={value}");
        }
        line
    }
}

impl<S> Layer<S> for TracingLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.ring.push(self.format_event(event));
    }
}

// ============================================================================
// Installation
// ============================================================================

/// `RUST_LOG` when set, `fallback` otherwise.
fn env_filter(fallback: &str) -> Result<EnvFilter, AppError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback).map_err(|err| AppError::LogFilter {
        filter: fallback.to_string(),
        reason: err.to_string(),
    })
}

/// Build the subscriber without installing it.
///
/// # Errors
///
/// Fails when the filter does not parse or the log file cannot be opened.
pub fn subscriber(
    level: &str,
    log_file: Option<&Path>,
    ring: LogRing,
) -> Result<impl Subscriber + Send + Sync + 'static, AppError> {
    let filter = env_filter(level)?;
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| AppError::LogFile {
                    path: path.to_path_buf(),
                    source,
                })?;
            Some(
                tracing_fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(TracingLogLayer::new(ring))
        .with(file_layer))
}

/// Install the global subscriber and return the ring the log pane reads.
///
/// # Errors
///
/// Fails when [`subscriber`] fails or a global subscriber already exists.
pub fn init(level: &str, log_file: Option<&Path>) -> Result<LogRing, AppError> {
    let ring = LogRing::default();
    let subscriber = subscriber(level, log_file, ring.clone())?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| AppError::SubscriberInstalled)?;
    tracing::debug!(level, "logging initialised");
    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(layer: TracingLogLayer, f: impl FnOnce()) {
        let dispatch = tracing::Dispatch::new(tracing_subscriber::registry().with(layer));
        tracing::dispatcher::with_default(&dispatch, f);
    }

    #[test]
    fn ring_drops_oldest_lines() {
        let ring = LogRing::new(3);
        for i in 0..5 {
            ring.push(format!("line {i}"));
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.tail(10), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(ring.tail(1), vec!["line 4"]);
    }

    #[test]
    fn ring_clones_share_lines() {
        let ring = LogRing::new(4);
        let other = ring.clone();
        other.push("shared");
        assert_eq!(ring.tail(1), vec!["shared"]);
        ring.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn zero_capacity_keeps_one_line() {
        let ring = LogRing::new(0);
        ring.push("a");
        ring.push("b");
        assert_eq!(ring.capacity(), 1);
        assert_eq!(ring.tail(5), vec!["b"]);
    }

    #[test]
    fn formats_level_message_and_fields() {
        let ring = LogRing::new(8);
        capture(TracingLogLayer::new(ring.clone()).show_time(false), || {
            tracing::warn!(reason = "offline", attempts = 2, "rejecting submission");
        });
        assert_eq!(
            ring.tail(1),
            vec!["WARN  rejecting submission reason=offline attempts=2"]
        );
    }

    #[test]
    fn debug_strings_lose_their_quotes() {
        let ring = LogRing::new(8);
        capture(TracingLogLayer::new(ring.clone()).show_time(false), || {
            tracing::info!(path = ?"hobbies.0.name", "focus");
        });
        assert_eq!(ring.tail(1), vec!["INFO  focus path=hobbies.0.name"]);
    }

    #[test]
    fn target_is_optional() {
        let ring = LogRing::new(8);
        let layer = TracingLogLayer::new(ring.clone())
            .show_time(false)
            .show_target(true);
        capture(layer, || tracing::error!("boom"));
        let line = ring.tail(1).remove(0);
        assert!(line.starts_with("ERROR regform_app::logging"), "line: {line}");
        assert!(line.ends_with(": boom"), "line: {line}");
    }

    #[test]
    fn timestamp_prefix_is_clock_time() {
        let ring = LogRing::new(8);
        capture(TracingLogLayer::new(ring.clone()), || tracing::info!("tick"));
        let line = ring.tail(1).remove(0);
        let (time, rest) = line.split_at(8);
        assert_eq!(time.len(), 8);
        assert_eq!(time.as_bytes()[2], b':');
        assert_eq!(rest, " INFO  tick");
    }

    #[test]
    fn bad_fallback_filter_is_reported() {
        // Only meaningful when RUST_LOG does not override the fallback.
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = subscriber("regform=loud", None, LogRing::new(1)).err();
        assert!(matches!(err, Some(AppError::LogFilter { .. })));
    }
}
