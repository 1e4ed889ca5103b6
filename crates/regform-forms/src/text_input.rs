#![forbid(unsafe_code)]

//! Single-line text editing over a borrowed `String`.
//!
//! The form keeps field values in its model, so [`TextInput`] only owns the
//! editing state (cursor and horizontal scroll) and edits whichever string
//! the caller hands it. Cursor positions are grapheme indices.

use regform_core::event::{KeyCode, KeyEvent};
use regform_core::geometry::Rect;
use regform_render::buffer::Buffer;
use regform_render::drawing::{
    draw_str, grapheme_byte_offset, grapheme_count, grapheme_display_width,
};
use regform_render::style::{Style, StyleFlags};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Which characters an input accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharFilter {
    #[default]
    Any,
    /// Digits, `.`, and `-`.
    Numeric,
}

impl CharFilter {
    #[must_use]
    pub fn accepts(self, c: char) -> bool {
        match self {
            CharFilter::Any => !c.is_control(),
            CharFilter::Numeric => c.is_ascii_digit() || c == '.' || c == '-',
        }
    }
}

/// What a key did to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    /// The key is not an editing key.
    Unchanged,
    /// Only the cursor moved.
    Moved,
    /// The value changed.
    Changed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Word,
    Punct,
}

fn class(g: &str) -> CharClass {
    if g.chars().all(char::is_whitespace) {
        CharClass::Space
    } else if g.chars().any(char::is_alphanumeric) {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

/// Styles for the value and the placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputStyle {
    pub text: Style,
    pub placeholder: Style,
}

/// Cursor and scroll state for one text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    cursor: usize,
    scroll_cells: usize,
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position as a grapheme index.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Put the cursor after the last grapheme of `value`.
    pub fn move_to_end(&mut self, value: &str) {
        self.cursor = grapheme_count(value);
        self.scroll_cells = 0;
    }

    /// Apply an editing key to `value`.
    pub fn handle_key(&mut self, value: &mut String, key: &KeyEvent, filter: CharFilter) -> TextEdit {
        self.cursor = self.cursor.min(grapheme_count(value));
        let ctrl = key.ctrl();

        match key.code {
            KeyCode::Char('u') if ctrl => {
                if value.is_empty() {
                    return TextEdit::Unchanged;
                }
                value.clear();
                self.cursor = 0;
                TextEdit::Changed
            }
            KeyCode::Char(c) if !ctrl && !key.alt() => {
                if !filter.accepts(c) {
                    return TextEdit::Unchanged;
                }
                self.insert_char(value, c);
                TextEdit::Changed
            }
            KeyCode::Backspace => {
                let start = if ctrl {
                    self.word_left(value)
                } else {
                    self.cursor.saturating_sub(1)
                };
                self.delete_range(value, start, self.cursor)
            }
            KeyCode::Delete => {
                let end = if ctrl {
                    self.word_right(value)
                } else {
                    (self.cursor + 1).min(grapheme_count(value))
                };
                self.delete_range(value, self.cursor, end)
            }
            KeyCode::Left => {
                let target = if ctrl {
                    self.word_left(value)
                } else {
                    self.cursor.saturating_sub(1)
                };
                self.move_to(target)
            }
            KeyCode::Right => {
                let target = if ctrl {
                    self.word_right(value)
                } else {
                    (self.cursor + 1).min(grapheme_count(value))
                };
                self.move_to(target)
            }
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(grapheme_count(value)),
            _ => TextEdit::Unchanged,
        }
    }

    /// Insert pasted text at the cursor. Newlines become spaces and filtered
    /// characters are dropped.
    pub fn paste(&mut self, value: &mut String, text: &str, filter: CharFilter) -> TextEdit {
        self.cursor = self.cursor.min(grapheme_count(value));
        let mut changed = false;
        for c in text.chars() {
            let c = if c == '\n' || c == '\r' { ' ' } else { c };
            if filter.accepts(c) {
                self.insert_char(value, c);
                changed = true;
            }
        }
        if changed {
            TextEdit::Changed
        } else {
            TextEdit::Unchanged
        }
    }

    fn insert_char(&mut self, value: &mut String, c: char) {
        let before = grapheme_count(value);
        let offset = grapheme_byte_offset(value, self.cursor);
        value.insert(offset, c);
        // A combining mark joins the previous grapheme instead of adding one.
        if grapheme_count(value) > before {
            self.cursor += 1;
        }
    }

    fn delete_range(&mut self, value: &mut String, start: usize, end: usize) -> TextEdit {
        if start >= end {
            return TextEdit::Unchanged;
        }
        let byte_start = grapheme_byte_offset(value, start);
        let byte_end = grapheme_byte_offset(value, end);
        value.drain(byte_start..byte_end);
        self.cursor = start;
        TextEdit::Changed
    }

    fn move_to(&mut self, target: usize) -> TextEdit {
        if target == self.cursor {
            return TextEdit::Unchanged;
        }
        self.cursor = target;
        TextEdit::Moved
    }

    fn word_left(&self, value: &str) -> usize {
        let graphemes: Vec<&str> = value.graphemes(true).collect();
        let mut pos = self.cursor.min(graphemes.len());
        if pos == 0 {
            return 0;
        }
        let target = class(graphemes[pos - 1]);
        while pos > 0 && class(graphemes[pos - 1]) == target {
            pos -= 1;
        }
        pos
    }

    fn word_right(&self, value: &str) -> usize {
        let graphemes: Vec<&str> = value.graphemes(true).collect();
        let max = graphemes.len();
        let mut pos = self.cursor.min(max);
        if pos >= max {
            return max;
        }
        let target = class(graphemes[pos]);
        while pos < max && class(graphemes[pos]) == target {
            pos += 1;
        }
        pos
    }

    fn effective_scroll(&self, value: &str, viewport: usize) -> usize {
        let cursor_x = grapheme_display_width(value, self.cursor);
        let mut scroll = self.scroll_cells;
        if cursor_x < scroll {
            scroll = cursor_x;
        }
        if cursor_x >= scroll + viewport {
            scroll = cursor_x + 1 - viewport;
        }
        scroll
    }

    /// Draw `value` (or `placeholder` when empty) into the first row of `area`.
    ///
    /// With `focused` set, the cursor cell is drawn in reverse video and the
    /// scroll offset follows the cursor.
    pub fn render(
        &mut self,
        value: &str,
        placeholder: &str,
        area: Rect,
        buf: &mut Buffer,
        style: InputStyle,
        focused: bool,
    ) {
        if area.is_empty() {
            return;
        }
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), style.text);

        let viewport = usize::from(area.width);
        self.cursor = self.cursor.min(grapheme_count(value));
        let scroll = if focused {
            self.effective_scroll(value, viewport)
        } else {
            0
        };
        self.scroll_cells = scroll;

        let (text, text_style) = if value.is_empty() {
            (placeholder, style.placeholder)
        } else {
            (value, style.text)
        };

        let mut visual_x = 0usize;
        for g in text.graphemes(true) {
            let w = UnicodeWidthStr::width(g);
            if w == 0 {
                continue;
            }
            if visual_x + w <= scroll {
                visual_x += w;
                continue;
            }
            if visual_x < scroll {
                // Wide grapheme cut by the left edge: blank its visible part.
                let visible = visual_x + w - scroll;
                draw_str(buf, area.x, area.y, &" ".repeat(visible), text_style, visible as u16);
                visual_x += w;
                continue;
            }
            let rel = visual_x - scroll;
            if rel + w > viewport {
                break;
            }
            draw_str(buf, area.x + rel as u16, area.y, g, text_style, w as u16);
            visual_x += w;
        }

        if focused {
            let cursor_rel = if value.is_empty() {
                0
            } else {
                grapheme_display_width(value, self.cursor).saturating_sub(scroll)
            };
            if cursor_rel < viewport
                && let Some(cell) = buf.get_mut(area.x + cursor_rel as u16, area.y)
            {
                cell.flags ^= StyleFlags::REVERSE;
            }
        }
    }
}
