#![forbid(unsafe_code)]

//! Colors, attribute flags, and composable styles.

use bitflags::bitflags;

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// The terminal's default color.
    Reset,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    DarkGray,
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        use crossterm::style::Color as Ct;
        match color {
            Color::Reset => Ct::Reset,
            Color::Black => Ct::Black,
            Color::Red => Ct::Red,
            Color::Green => Ct::Green,
            Color::Yellow => Ct::Yellow,
            Color::Blue => Ct::Blue,
            Color::Magenta => Ct::Magenta,
            Color::Cyan => Ct::Cyan,
            Color::White => Ct::White,
            Color::Gray => Ct::Grey,
            Color::DarkGray => Ct::DarkGrey,
            Color::Rgb(r, g, b) => Ct::Rgb { r, g, b },
        }
    }
}

bitflags! {
    /// Text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        /// Bold / increased intensity.
        const BOLD      = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM       = 0b0000_0010;
        /// Italic text.
        const ITALIC    = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE = 0b0000_1000;
        /// Reverse video (swap fg/bg).
        const REVERSE   = 0b0010_0000;
    }
}

/// A partial style. `None` fields leave the underlying cell untouched when
/// the style is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Attribute flags.
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// An empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attribute flags.
    #[must_use]
    pub fn add(mut self, flags: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flags);
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.add(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn dim(self) -> Self {
        self.add(StyleFlags::DIM)
    }

    #[must_use]
    pub fn underline(self) -> Self {
        self.add(StyleFlags::UNDERLINE)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        self.add(StyleFlags::REVERSE)
    }

    /// True if applying this style changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Layer `other` on top of `self`. Set fields of `other` win, flags merge.
    #[must_use]
    pub fn patch(self, other: Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: match (self.attrs, other.attrs) {
                (Some(a), Some(b)) => Some(a | b),
                (a, b) => b.or(a),
            },
        }
    }

    /// The flags to emit, treating unset as none.
    #[must_use]
    pub fn flags(&self) -> StyleFlags {
        self.attrs.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let style = Style::new().fg(Color::Red).bold().underline();
        assert_eq!(style.fg, Some(Color::Red));
        assert!(style.bg.is_none());
        assert_eq!(style.flags(), StyleFlags::BOLD | StyleFlags::UNDERLINE);
    }

    #[test]
    fn patch_prefers_overlay_and_merges_flags() {
        let base = Style::new().fg(Color::White).bg(Color::Black).dim();
        let overlay = Style::new().fg(Color::Red).bold();
        let merged = base.patch(overlay);
        assert_eq!(merged.fg, Some(Color::Red));
        assert_eq!(merged.bg, Some(Color::Black));
        assert_eq!(merged.flags(), StyleFlags::DIM | StyleFlags::BOLD);
    }

    #[test]
    fn empty_style() {
        assert!(Style::new().is_empty());
        assert!(!Style::new().reverse().is_empty());
    }

    #[test]
    fn converts_to_crossterm() {
        let ct: crossterm::style::Color = Color::Rgb(1, 2, 3).into();
        assert_eq!(ct, crossterm::style::Color::Rgb { r: 1, g: 2, b: 3 });
    }
}
