#![forbid(unsafe_code)]

//! Presenter: state-tracked terminal emission.
//!
//! The presenter keeps the last frame it wrote and, on each call to
//! [`Presenter::present`], emits only the cells that changed. Adjacent
//! changed cells on a row form a run that needs a single cursor move, and
//! style escapes are only written when the style differs from the previous
//! emitted cell.
//!
//! # Usage
//!
//! ```
//! use regform_render::buffer::Buffer;
//! use regform_render::presenter::Presenter;
//!
//! let mut presenter = Presenter::new(Vec::new());
//! let frame = Buffer::new(20, 4);
//! presenter.present(&frame)?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, BufWriter, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::buffer::Buffer;
use crate::cell::{Cell, CellContent};
use crate::style::{Color, StyleFlags};

/// Size of the internal write buffer (64KB).
const BUFFER_CAPACITY: usize = 64 * 1024;

/// Cached style state for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: Color,
    bg: Color,
    flags: StyleFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            flags: cell.flags,
        }
    }
}

/// A horizontal span of changed cells on one row (inclusive bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChangeRun {
    y: u16,
    x0: u16,
    x1: u16,
}

/// State-tracked presenter writing to any [`Write`] sink.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    /// Last presented frame. `None` forces a full repaint.
    previous: Option<Buffer>,
    current_style: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            previous: None,
            current_style: None,
            cursor: None,
        }
    }

    /// Present a frame, emitting only what changed since the last one.
    ///
    /// A size change or a prior [`Presenter::invalidate`] clears the screen
    /// and repaints every cell.
    pub fn present(&mut self, frame: &Buffer) -> io::Result<()> {
        let full = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.width() != frame.width() || prev.height() != frame.height());

        if full {
            queue!(self.writer, Clear(ClearType::All))?;
            self.cursor = None;
            self.current_style = None;
        }

        let runs = compute_runs(if full { None } else { self.previous.as_ref() }, frame);
        for run in &runs {
            self.move_cursor_to(run.x0, run.y)?;
            for x in run.x0..=run.x1 {
                if let Some(cell) = frame.get(x, run.y) {
                    self.emit_cell(cell)?;
                }
            }
        }

        queue!(self.writer, SetAttribute(Attribute::Reset))?;
        self.current_style = None;
        self.writer.flush()?;
        self.previous = Some(frame.clone());
        Ok(())
    }

    /// Forget the last frame so the next present repaints everything.
    ///
    /// Call after a resize or when the terminal state is unknown.
    pub fn invalidate(&mut self) {
        self.previous = None;
        self.current_style = None;
        self.cursor = None;
    }

    fn emit_cell(&mut self, cell: &Cell) -> io::Result<()> {
        if cell.is_continuation() {
            return Ok(());
        }
        self.emit_style_changes(cell)?;
        let width = match &cell.content {
            CellContent::Empty => {
                queue!(self.writer, Print(' '))?;
                1
            }
            CellContent::Char(c) => {
                queue!(self.writer, Print(*c))?;
                UnicodeWidthChar::width(*c).unwrap_or(1).max(1)
            }
            CellContent::Grapheme(g) => {
                queue!(self.writer, Print(g.as_ref()))?;
                UnicodeWidthStr::width(g.as_ref()).max(1)
            }
            CellContent::Continuation => 0,
        };
        if let Some((x, y)) = self.cursor {
            self.cursor = Some((x.saturating_add(width as u16), y));
        }
        Ok(())
    }

    fn emit_style_changes(&mut self, cell: &Cell) -> io::Result<()> {
        let style = CellStyle::from_cell(cell);
        if self.current_style == Some(style) {
            return Ok(());
        }
        // Reset then apply; simpler than incremental SGR diffs.
        queue!(self.writer, SetAttribute(Attribute::Reset))?;
        if style.fg != Color::Reset {
            queue!(self.writer, SetForegroundColor(style.fg.into()))?;
        }
        if style.bg != Color::Reset {
            queue!(self.writer, SetBackgroundColor(style.bg.into()))?;
        }
        for (flag, attr) in [
            (StyleFlags::BOLD, Attribute::Bold),
            (StyleFlags::DIM, Attribute::Dim),
            (StyleFlags::ITALIC, Attribute::Italic),
            (StyleFlags::UNDERLINE, Attribute::Underlined),
            (StyleFlags::REVERSE, Attribute::Reverse),
        ] {
            if style.flags.contains(flag) {
                queue!(self.writer, SetAttribute(attr))?;
            }
        }
        self.current_style = Some(style);
        Ok(())
    }

    fn move_cursor_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        if self.cursor == Some((x, y)) {
            return Ok(());
        }
        queue!(self.writer, MoveTo(x, y))?;
        self.cursor = Some((x, y));
        Ok(())
    }

    /// Flush any buffered output.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Get the inner writer (consuming the presenter).
    pub fn into_inner(self) -> io::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

/// Group cells that differ from `previous` into per-row runs.
///
/// A changed continuation cell extends the run back to its head so wide
/// graphemes are always re-emitted whole.
fn compute_runs(previous: Option<&Buffer>, next: &Buffer) -> Vec<ChangeRun> {
    let mut runs = Vec::new();
    for y in 0..next.height() {
        let row = next.row_cells(y);
        let prev_row = previous.map(|p| p.row_cells(y));
        let mut open: Option<ChangeRun> = None;
        for (x, cell) in row.iter().enumerate() {
            let changed = prev_row.is_none_or(|p| p.get(x) != Some(cell));
            let x = x as u16;
            if changed {
                let mut x0 = x;
                while x0 > 0 && row[x0 as usize].is_continuation() {
                    x0 -= 1;
                }
                match open.as_mut() {
                    Some(run) => run.x1 = x,
                    None => open = Some(ChangeRun { y, x0, x1: x }),
                }
            } else if let Some(run) = open.take() {
                runs.push(run);
            }
        }
        if let Some(run) = open {
            runs.push(run);
        }
    }
    runs
}
