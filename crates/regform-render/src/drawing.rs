#![forbid(unsafe_code)]

//! Grapheme-aware text drawing and measurement helpers.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::buffer::Buffer;
use crate::cell::Cell;
use crate::style::Style;

/// Draw `s` at (x, y), clipped to `max_width` cells.
///
/// Zero-width graphemes are skipped and a wide grapheme that would cross the
/// clip edge ends the run. Returns the number of columns written.
pub fn draw_str(buf: &mut Buffer, x: u16, y: u16, s: &str, style: Style, max_width: u16) -> u16 {
    let mut col = 0u16;
    for grapheme in s.graphemes(true) {
        if col >= max_width {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme) as u16;
        if w == 0 {
            continue;
        }
        if col + w > max_width {
            break;
        }
        buf.set(
            x.saturating_add(col),
            y,
            Cell::from_grapheme(grapheme).with_style(style),
        );
        col = col.saturating_add(w);
    }
    col
}

/// Display width of `s` in terminal cells.
#[inline]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Number of extended grapheme clusters in `s`.
pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Display width (cells) of the first `count` graphemes.
pub fn grapheme_display_width(s: &str, count: usize) -> usize {
    s.graphemes(true)
        .take(count)
        .map(UnicodeWidthStr::width)
        .sum()
}

/// Byte offset of the nth grapheme cluster, or `s.len()` past the end.
pub fn grapheme_byte_offset(s: &str, index: usize) -> usize {
    s.grapheme_indices(true)
        .nth(index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Truncate `s` so it fits in `max_width` cells, appending `…` when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > max_width - 1 {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn draw_clips_to_max_width() {
        let mut buf = Buffer::new(10, 1);
        let written = draw_str(&mut buf, 1, 0, "hello", Style::new(), 3);
        assert_eq!(written, 3);
        assert_eq!(buf.row_text(0).trim_end(), " hel");
    }

    #[test]
    fn draw_applies_style() {
        let mut buf = Buffer::new(4, 1);
        draw_str(&mut buf, 0, 0, "ab", Style::new().fg(Color::Red), 4);
        assert_eq!(buf.get(1, 0).map(|c| c.fg), Some(Color::Red));
        assert_eq!(buf.get(2, 0).map(|c| c.fg), Some(Color::Reset));
    }

    #[test]
    fn wide_grapheme_at_edge_stops() {
        let mut buf = Buffer::new(10, 1);
        let written = draw_str(&mut buf, 0, 0, "a中b", Style::new(), 2);
        assert_eq!(written, 1);
        assert_eq!(buf.row_text(0).trim_end(), "a");
    }

    #[test]
    fn grapheme_count_unicode() {
        assert_eq!(grapheme_count("hello"), 5);
        assert_eq!(grapheme_count("café"), 4);
        assert_eq!(grapheme_count("e\u{301}x"), 2);
    }

    #[test]
    fn grapheme_byte_offset_basic() {
        assert_eq!(grapheme_byte_offset("hello", 0), 0);
        assert_eq!(grapheme_byte_offset("hello", 3), 3);
        assert_eq!(grapheme_byte_offset("héllo", 2), 3);
        assert_eq!(grapheme_byte_offset("hi", 10), 2);
    }

    #[test]
    fn grapheme_display_width_counts_wide() {
        assert_eq!(grapheme_display_width("中文ab", 2), 4);
        assert_eq!(grapheme_display_width("ab", 10), 2);
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        assert_eq!(truncate_to_width("hello", 0), "");
    }
}
