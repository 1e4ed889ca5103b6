#![forbid(unsafe_code)]

//! Keyboard date picker.
//!
//! The picker owns only its open/closed state and the highlighted day; the
//! selected date lives in the form model and is passed in on every call.

use chrono::{Datelike, Days, Months, NaiveDate};
use regform_core::event::{KeyCode, KeyEvent};
use regform_core::geometry::Rect;
use regform_render::buffer::Buffer;
use regform_render::drawing::draw_str;
use regform_render::style::Style;

/// Display format of a selected date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const WEEKDAY_HEADER: &str = "Mo Tu We Th Fr Sa Su";

/// Columns needed by the calendar grid.
pub const CALENDAR_WIDTH: u16 = 20;
/// Rows needed by the calendar grid: title, header, six weeks.
pub const CALENDAR_HEIGHT: u16 = 8;

/// Outcome of a key handled by [`DatePicker::handle_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEvent {
    Ignored,
    Opened,
    /// The highlighted day moved.
    Moved,
    /// Closed without selecting.
    Closed,
    /// A day was picked and the calendar closed.
    Selected(NaiveDate),
    /// The selection was removed.
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarStyle {
    pub title: Style,
    pub header: Style,
    pub day: Style,
    pub today: Style,
    pub selected: Style,
    pub cursor: Style,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
    today: NaiveDate,
    cursor: NaiveDate,
    open: bool,
}

impl DatePicker {
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            cursor: today,
            open: false,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The highlighted day while open.
    #[must_use]
    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Open the calendar on `selected`, or on today when nothing is selected.
    pub fn open(&mut self, selected: Option<NaiveDate>) {
        self.cursor = selected.unwrap_or(self.today);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn handle_key(&mut self, selected: Option<NaiveDate>, key: &KeyEvent) -> DateEvent {
        if !self.open {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.open(selected);
                    DateEvent::Opened
                }
                KeyCode::Delete | KeyCode::Backspace if selected.is_some() => DateEvent::Cleared,
                _ => DateEvent::Ignored,
            };
        }

        let target = match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.open = false;
                return DateEvent::Selected(self.cursor);
            }
            KeyCode::Escape => {
                self.open = false;
                return DateEvent::Closed;
            }
            KeyCode::Left => self.cursor.checked_sub_days(Days::new(1)),
            KeyCode::Right => self.cursor.checked_add_days(Days::new(1)),
            KeyCode::Up => self.cursor.checked_sub_days(Days::new(7)),
            KeyCode::Down => self.cursor.checked_add_days(Days::new(7)),
            KeyCode::PageUp => self.cursor.checked_sub_months(Months::new(1)),
            KeyCode::PageDown => self.cursor.checked_add_months(Months::new(1)),
            KeyCode::Home => self.cursor.with_day(1),
            KeyCode::End => last_of_month(self.cursor),
            KeyCode::Char('t') => Some(self.today),
            _ => return DateEvent::Ignored,
        };
        match target {
            Some(day) if day != self.cursor => {
                self.cursor = day;
                DateEvent::Moved
            }
            _ => DateEvent::Ignored,
        }
    }

    /// Draw the closed field: the selected date or `placeholder`.
    pub fn render_field(
        &self,
        selected: Option<NaiveDate>,
        placeholder: &str,
        area: Rect,
        buf: &mut Buffer,
        style: Style,
        placeholder_style: Style,
    ) {
        if area.is_empty() {
            return;
        }
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), style);
        match selected {
            Some(date) => {
                let text = date.format(DATE_FORMAT).to_string();
                draw_str(buf, area.x, area.y, &text, style, area.width);
            }
            None => {
                draw_str(buf, area.x, area.y, placeholder, placeholder_style, area.width);
            }
        }
    }

    /// Draw the month grid around the highlighted day. Weeks start on Monday.
    pub fn render_calendar(
        &self,
        selected: Option<NaiveDate>,
        area: Rect,
        buf: &mut Buffer,
        style: &CalendarStyle,
    ) {
        if area.is_empty() {
            return;
        }
        let width = area.width.min(CALENDAR_WIDTH);
        let title = self.cursor.format("%B %Y").to_string();
        draw_str(buf, area.x, area.y, &title, style.title, width);

        let Some(header) = area.row(1) else {
            return;
        };
        draw_str(buf, header.x, header.y, WEEKDAY_HEADER, style.header, width);

        let Some(first) = self.cursor.with_day(1) else {
            return;
        };
        let offset = first.weekday().num_days_from_monday() as u16;
        let mut day = first;
        let mut slot = offset;
        while day.month() == first.month() {
            let week = slot / 7;
            let col = slot % 7;
            let Some(row) = area.row(2 + week) else {
                break;
            };
            let x = row.x + col * 3;
            if x + 2 <= row.x + width {
                let mut cell_style = style.day;
                if day == self.today {
                    cell_style = cell_style.patch(style.today);
                }
                if Some(day) == selected {
                    cell_style = cell_style.patch(style.selected);
                }
                if day == self.cursor {
                    cell_style = cell_style.patch(style.cursor);
                }
                let label = format!("{:>2}", day.day());
                draw_str(buf, x, row.y, &label, cell_style, 2);
            }
            slot += 1;
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }
}

fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn press(picker: &mut DatePicker, selected: Option<NaiveDate>, code: KeyCode) -> DateEvent {
        picker.handle_key(selected, &KeyEvent::new(code))
    }

    #[test]
    fn enter_opens_on_selected_or_today() {
        let mut picker = DatePicker::new(d(2024, 6, 15));
        assert_eq!(press(&mut picker, Some(d(2024, 1, 3)), KeyCode::Enter), DateEvent::Opened);
        assert_eq!(picker.cursor(), d(2024, 1, 3));
        assert_eq!(press(&mut picker, None, KeyCode::Escape), DateEvent::Closed);
        assert_eq!(press(&mut picker, None, KeyCode::Char(' ')), DateEvent::Opened);
        assert_eq!(picker.cursor(), d(2024, 6, 15));
    }

    #[test]
    fn arrows_move_days_and_weeks() {
        let mut picker = DatePicker::new(d(2024, 3, 1));
        picker.open(None);
        assert_eq!(press(&mut picker, None, KeyCode::Left), DateEvent::Moved);
        assert_eq!(picker.cursor(), d(2024, 2, 29));
        press(&mut picker, None, KeyCode::Down);
        assert_eq!(picker.cursor(), d(2024, 3, 7));
        press(&mut picker, None, KeyCode::Up);
        press(&mut picker, None, KeyCode::Right);
        assert_eq!(picker.cursor(), d(2024, 3, 1));
    }

    #[test]
    fn month_paging_clamps_day() {
        let mut picker = DatePicker::new(d(2023, 1, 31));
        picker.open(None);
        press(&mut picker, None, KeyCode::PageDown);
        assert_eq!(picker.cursor(), d(2023, 2, 28));

        let mut leap = DatePicker::new(d(2024, 1, 31));
        leap.open(None);
        press(&mut leap, None, KeyCode::PageDown);
        assert_eq!(leap.cursor(), d(2024, 2, 29));
        press(&mut leap, None, KeyCode::PageUp);
        assert_eq!(leap.cursor(), d(2024, 1, 29));
    }

    #[test]
    fn home_end_and_today() {
        let mut picker = DatePicker::new(d(2024, 6, 15));
        picker.open(Some(d(2024, 2, 10)));
        press(&mut picker, None, KeyCode::End);
        assert_eq!(picker.cursor(), d(2024, 2, 29));
        press(&mut picker, None, KeyCode::Home);
        assert_eq!(picker.cursor(), d(2024, 2, 1));
        assert_eq!(press(&mut picker, None, KeyCode::Home), DateEvent::Ignored);
        press(&mut picker, None, KeyCode::Char('t'));
        assert_eq!(picker.cursor(), d(2024, 6, 15));
    }

    #[test]
    fn enter_selects_and_closes() {
        let mut picker = DatePicker::new(d(2024, 6, 15));
        picker.open(None);
        press(&mut picker, None, KeyCode::Right);
        assert_eq!(
            press(&mut picker, None, KeyCode::Enter),
            DateEvent::Selected(d(2024, 6, 16))
        );
        assert!(!picker.is_open());
    }

    #[test]
    fn delete_clears_only_when_set() {
        let mut picker = DatePicker::new(d(2024, 6, 15));
        assert_eq!(
            press(&mut picker, Some(d(2024, 6, 1)), KeyCode::Delete),
            DateEvent::Cleared
        );
        assert_eq!(press(&mut picker, None, KeyCode::Backspace), DateEvent::Ignored);
        assert_eq!(press(&mut picker, None, KeyCode::Left), DateEvent::Ignored);
    }

    #[test]
    fn field_shows_iso_date_or_placeholder() {
        let picker = DatePicker::new(d(2024, 6, 15));
        let mut buf = Buffer::new(12, 1);
        picker.render_field(
            Some(d(2024, 6, 5)),
            "pick",
            Rect::from_size(12, 1),
            &mut buf,
            Style::new(),
            Style::new(),
        );
        assert_eq!(buf.row_text(0).trim_end(), "2024-06-05");

        let mut buf = Buffer::new(12, 1);
        picker.render_field(None, "pick", Rect::from_size(12, 1), &mut buf, Style::new(), Style::new());
        assert_eq!(buf.row_text(0).trim_end(), "pick");
    }

    #[test]
    fn calendar_grid_starts_on_monday() {
        // June 2024 starts on a Saturday.
        let mut picker = DatePicker::new(d(2024, 6, 15));
        picker.open(None);
        let mut buf = Buffer::new(CALENDAR_WIDTH, CALENDAR_HEIGHT);
        picker.render_calendar(
            None,
            Rect::from_size(CALENDAR_WIDTH, CALENDAR_HEIGHT),
            &mut buf,
            &CalendarStyle::default(),
        );
        assert_eq!(buf.row_text(0).trim_end(), "June 2024");
        assert_eq!(buf.row_text(1), WEEKDAY_HEADER);
        assert_eq!(buf.row_text(2), "                1  2");
        assert_eq!(buf.row_text(3), " 3  4  5  6  7  8  9");
        assert_eq!(buf.row_text(6).trim_end(), "24 25 26 27 28 29 30");
    }
}
