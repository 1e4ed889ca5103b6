#![forbid(unsafe_code)]

//! One frame of cells, row by row.
//!
//! The size is fixed at construction and `cells` always holds exactly
//! `width * height` entries. A wide grapheme is written whole or not at all,
//! and the cells it covers after the first hold [`CellContent::Continuation`].

use regform_core::geometry::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cell::{Cell, CellContent};
use crate::style::Style;

/// ```
/// use regform_render::buffer::Buffer;
/// use regform_render::cell::Cell;
///
/// let mut frame = Buffer::new(12, 2);
/// for (x, c) in "Age".chars().enumerate() {
///     frame.set(x as u16, 1, Cell::from_char(c));
/// }
/// assert_eq!(frame.find_row("Age"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Blank frame. A zero-sized frame accepts and drops every write.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.cells.get(self.index(x, y)?)
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        let i = self.index(x, y)?;
        self.cells.get_mut(i)
    }

    /// Write `cell` at (x, y). Writes outside the frame are dropped. Wide graphemes that do not fit
    /// entirely are skipped. Overwriting half of an existing wide grapheme
    /// blanks the other half.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = match &cell.content {
            CellContent::Char(c) => UnicodeWidthChar::width(*c).unwrap_or(1),
            CellContent::Grapheme(g) => UnicodeWidthStr::width(g.as_ref()),
            _ => 1,
        }
        .max(1);

        let last = x as usize + width - 1;
        if last >= self.width as usize || y >= self.height {
            return;
        }

        for i in 0..width {
            self.cleanup_overlap(x + i as u16, y);
        }

        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell.clone();
        }
        for i in 1..width {
            if let Some(idx) = self.index(x + i as u16, y) {
                self.cells[idx] = Cell {
                    content: CellContent::Continuation,
                    ..cell.clone()
                };
            }
        }
    }

    /// Blank the partner cells of any wide grapheme that covers (x, y).
    fn cleanup_overlap(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if self.cells[idx].is_continuation() {
            // Walk left to the head and blank it.
            let mut hx = x;
            while hx > 0 {
                hx -= 1;
                let Some(h) = self.index(hx, y) else { break };
                if !self.cells[h].is_continuation() {
                    self.cells[h].content = CellContent::Empty;
                    break;
                }
                self.cells[h].content = CellContent::Empty;
            }
        }
        // Blank any tail to the right of this cell.
        let mut tx = x + 1;
        while let Some(t) = self.index(tx, y) {
            if !self.cells[t].is_continuation() {
                break;
            }
            self.cells[t].content = CellContent::Empty;
            tx += 1;
        }
    }

    /// Apply a style to every cell in `rect` (clipped to the buffer).
    pub fn set_style(&mut self, rect: Rect, style: Style) {
        if style.is_empty() {
            return;
        }
        for y in rect.y..rect.bottom().min(self.height) {
            for x in rect.x..rect.right().min(self.width) {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.apply(style);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::default());
    }

    /// Row `y`, empty past the bottom edge.
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        self.cells
            .chunks_exact(usize::from(self.width).max(1))
            .nth(usize::from(y))
            .unwrap_or(&[])
    }

    /// Plain text of row `y` (styles dropped, continuation cells skipped).
    pub fn row_text(&self, y: u16) -> String {
        let mut out = String::with_capacity(self.width as usize);
        for cell in self.row_cells(y) {
            cell.push_symbol(&mut out);
        }
        out
    }

    /// All rows as plain text with trailing blanks trimmed.
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| self.row_text(y).trim_end().to_string())
            .collect()
    }

    /// Find the first row whose text contains `needle`.
    pub fn find_row(&self, needle: &str) -> Option<u16> {
        (0..self.height).find(|&y| self.row_text(y).contains(needle))
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
