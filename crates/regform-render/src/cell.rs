#![forbid(unsafe_code)]

//! A single terminal cell.

use crate::style::{Color, Style, StyleFlags};

/// What a cell displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellContent {
    /// Blank cell (rendered as a space).
    #[default]
    Empty,
    /// A single-codepoint grapheme.
    Char(char),
    /// A multi-codepoint grapheme cluster.
    Grapheme(Box<str>),
    /// Trailing half of a wide grapheme owned by the cell to its left.
    Continuation,
}

impl CellContent {
    /// The character, if this is a single-codepoint cell.
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            CellContent::Char(c) => Some(*c),
            _ => None,
        }
    }
}

/// A terminal cell: content plus resolved colors and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub content: CellContent,
    pub fg: Color,
    pub bg: Color,
    pub flags: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: CellContent::Empty,
            fg: Color::Reset,
            bg: Color::Reset,
            flags: StyleFlags::empty(),
        }
    }
}

impl Cell {
    /// A cell holding a single character.
    #[must_use]
    pub fn from_char(c: char) -> Self {
        Self {
            content: CellContent::Char(c),
            ..Self::default()
        }
    }

    /// A cell holding a grapheme cluster.
    #[must_use]
    pub fn from_grapheme(g: &str) -> Self {
        let mut chars = g.chars();
        let content = match (chars.next(), chars.next()) {
            (Some(c), None) => CellContent::Char(c),
            (None, _) => CellContent::Empty,
            _ => CellContent::Grapheme(g.into()),
        };
        Self {
            content,
            ..Self::default()
        }
    }

    /// Apply a partial style to this cell.
    pub fn apply(&mut self, style: Style) {
        if let Some(fg) = style.fg {
            self.fg = fg;
        }
        if let Some(bg) = style.bg {
            self.bg = bg;
        }
        if let Some(attrs) = style.attrs {
            self.flags |= attrs;
        }
    }

    /// Builder form of [`Cell::apply`].
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.apply(style);
        self
    }

    /// True for the trailing half of a wide grapheme.
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        matches!(self.content, CellContent::Continuation)
    }

    /// Push the cell's visible symbol onto `out`.
    pub fn push_symbol(&self, out: &mut String) {
        match &self.content {
            CellContent::Empty => out.push(' '),
            CellContent::Char(c) => out.push(*c),
            CellContent::Grapheme(g) => out.push_str(g),
            CellContent::Continuation => {}
        }
    }
}
