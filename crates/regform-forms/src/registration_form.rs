#![forbid(unsafe_code)]

//! The registration form widget.
//!
//! [`RegistrationForm`] binds a [`FormController`] over [`RegistrationDraft`]
//! to terminal controls: text inputs, the gender select, the hobby list with
//! its add and remove buttons, the start-date picker, the newsletter checkbox,
//! the referral input that only exists while subscribed, and the submit
//! button.
//!
//! Keys go in through [`RegistrationForm::handle_event`]; a
//! [`FormAction::SubmitRequested`] tells the caller to start a submission
//! with [`RegistrationForm::begin_submit`].

use chrono::NaiveDate;
use regform_core::event::{Event, KeyCode, KeyEvent};
use regform_core::geometry::Rect;
use regform_render::buffer::Buffer;
use regform_render::drawing::{draw_str, truncate_to_width};
use regform_render::style::{Color, Style};
use regform_validation::{FieldErrors, FieldPath};

use crate::controller::{
    FieldArrayOptions, FormController, FormOptions, RegisterOptions, SubmitAttempt,
    SubmitOutcome, TicketId,
};
use crate::date_picker::{CALENDAR_HEIGHT, CALENDAR_WIDTH, CalendarStyle, DateEvent, DatePicker};
use crate::draft::{Gender, RegistrationDraft};
use crate::error::FormError;
use crate::model::{FieldValue, mismatch};
use crate::schema::{REFERRAL_REQUIRED, RegistrationSchema, registration_schema};
use crate::submit::{SubmitError, SubmitHandler};
use crate::text_input::{CharFilter, InputStyle, TextEdit, TextInput};

pub type RegistrationController = FormController<RegistrationDraft, RegistrationSchema>;

const LABEL_WIDTH: u16 = 16;
const HOBBIES: &str = "hobbies";
const SUBSCRIBE: &str = "subscribe";
const REFERRAL: &str = "referral";
const GENDER: &str = "gender";
const START_DATE: &str = "startDate";

const SELECT_PLACEHOLDER: &str = "-- Select --";
const DATE_PLACEHOLDER: &str = "YYYY-MM-DD";
const ADD_HOBBY: &str = "[ Add Hobby ]";
const REMOVE_HOBBY: &str = "[ Remove Hobby ]";
const SUBMIT: &str = "[ Submit ]";
const SUBMITTING: &str = "[ Submitting... ]";

/// The single-line text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    FirstName,
    LastName,
    Email,
    Age,
    City,
    State,
    Referral,
}

impl TextField {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            TextField::FirstName => "firstName",
            TextField::LastName => "lastName",
            TextField::Email => "email",
            TextField::Age => "age",
            TextField::City => "address.city",
            TextField::State => "address.state",
            TextField::Referral => REFERRAL,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TextField::FirstName => "First Name",
            TextField::LastName => "Last Name",
            TextField::Email => "Email",
            TextField::Age => "Age",
            TextField::City => "City",
            TextField::State => "State",
            TextField::Referral => "Referral",
        }
    }

    const fn placeholder(self) -> &'static str {
        match self {
            TextField::Referral => "How did you hear about us?",
            _ => "",
        }
    }

    const fn filter(self) -> CharFilter {
        match self {
            TextField::Age => CharFilter::Numeric,
            _ => CharFilter::Any,
        }
    }

    fn value(self, draft: &RegistrationDraft) -> &str {
        match self {
            TextField::FirstName => &draft.first_name,
            TextField::LastName => &draft.last_name,
            TextField::Email => &draft.email,
            TextField::Age => &draft.age,
            TextField::City => &draft.address.city,
            TextField::State => &draft.address.state,
            TextField::Referral => &draft.referral,
        }
    }
}

/// A focusable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Text(TextField),
    Gender,
    HobbyName(usize),
    RemoveHobby(usize),
    AddHobby,
    StartDate,
    Subscribe,
    Submit,
}

fn hobby_name_path(index: usize) -> FieldPath {
    FieldPath::from(HOBBIES).index(index).key("name")
}

impl FocusTarget {
    /// The field this control edits, if any. Leaving the control blurs it.
    #[must_use]
    pub fn field_path(self) -> Option<FieldPath> {
        match self {
            FocusTarget::Text(field) => Some(FieldPath::from(field.path())),
            FocusTarget::Gender => Some(FieldPath::from(GENDER)),
            FocusTarget::HobbyName(i) => Some(hobby_name_path(i)),
            FocusTarget::StartDate => Some(FieldPath::from(START_DATE)),
            FocusTarget::Subscribe => Some(FieldPath::from(SUBSCRIBE)),
            FocusTarget::RemoveHobby(_) | FocusTarget::AddHobby | FocusTarget::Submit => None,
        }
    }

    /// The error path shown next to this control. The Add Hobby button
    /// carries the array-level error.
    fn error_path(self) -> Option<FieldPath> {
        match self {
            FocusTarget::AddHobby => Some(FieldPath::from(HOBBIES)),
            other => other.field_path(),
        }
    }
}

/// What a handled event asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Nothing happened.
    None,
    /// State changed; redraw.
    Changed,
    /// The user asked to submit.
    SubmitRequested,
}

/// Styles used by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStyles {
    pub base: Style,
    pub label: Style,
    pub focused_label: Style,
    pub heading: Style,
    pub input: Style,
    pub placeholder: Style,
    pub error: Style,
    pub root_error: Style,
    pub button: Style,
    pub focused_button: Style,
    pub disabled: Style,
    pub calendar: CalendarStyle,
}

impl Default for FormStyles {
    fn default() -> Self {
        Self {
            base: Style::new(),
            label: Style::new().fg(Color::Cyan),
            focused_label: Style::new().fg(Color::Yellow).bold(),
            heading: Style::new().bold(),
            input: Style::new().underline(),
            placeholder: Style::new().fg(Color::DarkGray),
            error: Style::new().fg(Color::Red),
            root_error: Style::new().fg(Color::Red).bold(),
            button: Style::new().bold(),
            focused_button: Style::new().bold().reverse(),
            disabled: Style::new().dim(),
            calendar: CalendarStyle {
                title: Style::new().bold(),
                header: Style::new().fg(Color::Cyan),
                day: Style::new(),
                today: Style::new().underline(),
                selected: Style::new().fg(Color::Green).bold(),
                cursor: Style::new().reverse(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Row {
    Field(FocusTarget),
    Heading(&'static str),
    Hobby(usize),
    AddHobby,
    Calendar(u16),
    Error(String),
    Blank,
    Submit,
    RootError(String),
}

impl Row {
    fn holds(&self, target: FocusTarget) -> bool {
        match (self, target) {
            (Row::Field(t), target) => *t == target,
            (Row::Hobby(i), FocusTarget::HobbyName(j) | FocusTarget::RemoveHobby(j)) => *i == j,
            (Row::AddHobby, FocusTarget::AddHobby) | (Row::Submit, FocusTarget::Submit) => true,
            _ => false,
        }
    }
}

fn push_field(rows: &mut Vec<Row>, row: Row, errors: &FieldErrors, path: &FieldPath) {
    rows.push(row);
    if let Some(message) = errors.message(path) {
        rows.push(Row::Error(message.to_string()));
    }
}

/// The registration form: controller plus terminal controls.
#[derive(Debug)]
pub struct RegistrationForm {
    controller: RegistrationController,
    focus: FocusTarget,
    input: TextInput,
    picker: DatePicker,
    scroll: usize,
    styles: FormStyles,
}

impl RegistrationForm {
    /// Mount the form with `defaults`, using the local date as "today".
    pub fn new(defaults: RegistrationDraft, options: FormOptions) -> Result<Self, FormError> {
        let today = chrono::Local::now().date_naive();
        let mut controller = FormController::new(defaults, registration_schema(), options);
        controller.field_array(&FieldPath::from(HOBBIES), FieldArrayOptions { min_len: 1 })?;
        let mut form = Self {
            controller,
            focus: FocusTarget::Text(TextField::FirstName),
            input: TextInput::new(),
            picker: DatePicker::new(today),
            scroll: 0,
            styles: FormStyles::default(),
        };
        form.sync_referral();
        form.enter_focus();
        Ok(form)
    }

    /// Use `today` for the date picker's "today" and its default cursor.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.picker = DatePicker::new(today);
        self
    }

    #[must_use]
    pub fn with_styles(mut self, styles: FormStyles) -> Self {
        self.styles = styles;
        self
    }

    #[must_use]
    pub fn controller(&self) -> &RegistrationController {
        &self.controller
    }

    #[must_use]
    pub fn values(&self) -> &RegistrationDraft {
        self.controller.values()
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        self.controller.errors()
    }

    #[must_use]
    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    #[must_use]
    pub fn date_picker(&self) -> &DatePicker {
        &self.picker
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.controller.is_submitting()
    }

    /// Controls in keyboard order.
    #[must_use]
    pub fn focus_order(&self) -> Vec<FocusTarget> {
        let values = self.controller.values();
        let mut order = vec![
            FocusTarget::Text(TextField::FirstName),
            FocusTarget::Text(TextField::LastName),
            FocusTarget::Text(TextField::Email),
            FocusTarget::Text(TextField::Age),
            FocusTarget::Gender,
            FocusTarget::Text(TextField::City),
            FocusTarget::Text(TextField::State),
        ];
        let hobbies = values.hobbies.len();
        for i in 0..hobbies {
            order.push(FocusTarget::HobbyName(i));
            if hobbies > 1 {
                order.push(FocusTarget::RemoveHobby(i));
            }
        }
        order.extend([
            FocusTarget::AddHobby,
            FocusTarget::StartDate,
            FocusTarget::Subscribe,
        ]);
        if values.subscribe {
            order.push(FocusTarget::Text(TextField::Referral));
        }
        order.push(FocusTarget::Submit);
        order
    }

    /// Move focus to `target`, blurring the current control. Returns `false`
    /// if `target` is not currently shown.
    pub fn focus_on(&mut self, target: FocusTarget) -> bool {
        if !self.focus_order().contains(&target) {
            return false;
        }
        if target != self.focus {
            self.leave_focus();
            self.focus = target;
            self.enter_focus();
        }
        true
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let len = order.len();
        let pos = order.iter().position(|t| *t == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        self.leave_focus();
        self.focus = order[next];
        self.enter_focus();
    }

    fn leave_focus(&mut self) {
        self.picker.close();
        if let Some(path) = self.focus.field_path() {
            self.controller.blur(&path);
        }
    }

    fn enter_focus(&mut self) {
        let values = self.controller.values();
        match self.focus {
            FocusTarget::Text(field) => self.input.move_to_end(field.value(values)),
            FocusTarget::HobbyName(i) => {
                let name = values.hobbies.get(i).map_or("", |h| h.name.as_str());
                self.input.move_to_end(name);
            }
            _ => {}
        }
    }

    /// Write a value through the controller, keeping the referral field's
    /// registration in step with `subscribe`.
    pub fn set_value(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FormError> {
        self.controller.set_value(path, value)?;
        if path == &FieldPath::from(SUBSCRIBE) {
            self.sync_referral();
        }
        Ok(())
    }

    fn sync_referral(&mut self) {
        let path = FieldPath::from(REFERRAL);
        let shown = self.controller.values().subscribe;
        if shown && !self.controller.is_registered(&path) {
            self.controller
                .register(&path, RegisterOptions::new().required(REFERRAL_REQUIRED));
        } else if !shown && self.controller.is_registered(&path) {
            self.controller.unregister(&path);
            if self.focus == FocusTarget::Text(TextField::Referral) {
                self.focus = FocusTarget::Subscribe;
            }
        }
    }

    // -- Events ----------------------------------------------------------------

    pub fn handle_event(&mut self, event: &Event) -> Result<FormAction, FormError> {
        match event {
            Event::Paste(text) => self.paste(text),
            _ => match event.pressed_key() {
                Some(key) => self.handle_key(key),
                None => Ok(FormAction::None),
            },
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<FormAction, FormError> {
        if self.picker.is_open() {
            match key.code {
                KeyCode::Tab | KeyCode::BackTab => self.picker.close(),
                _ => return self.date_key(key),
            }
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                return Ok(FormAction::Changed);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                return Ok(FormAction::Changed);
            }
            KeyCode::Enter => return self.activate(key),
            _ => {}
        }

        match self.focus {
            FocusTarget::Text(field) => {
                self.edit_text(&FieldPath::from(field.path()), key, field.filter())
            }
            FocusTarget::HobbyName(i) => self.edit_text(&hobby_name_path(i), key, CharFilter::Any),
            FocusTarget::Gender => match key.code {
                KeyCode::Left => self.cycle_gender(false),
                KeyCode::Right | KeyCode::Char(' ') => self.cycle_gender(true),
                _ => Ok(FormAction::None),
            },
            FocusTarget::Subscribe => match key.code {
                KeyCode::Char(' ') => self.toggle_subscribe(),
                _ => Ok(FormAction::None),
            },
            FocusTarget::StartDate => self.date_key(key),
            FocusTarget::RemoveHobby(_) | FocusTarget::AddHobby | FocusTarget::Submit => {
                match key.code {
                    KeyCode::Char(' ') => self.activate(key),
                    _ => Ok(FormAction::None),
                }
            }
        }
    }

    fn activate(&mut self, key: &KeyEvent) -> Result<FormAction, FormError> {
        match self.focus {
            FocusTarget::RemoveHobby(i) => self.remove_hobby(i),
            FocusTarget::AddHobby => self.add_hobby(),
            FocusTarget::StartDate => self.date_key(key),
            _ if self.controller.is_submitting() => Ok(FormAction::None),
            _ => Ok(FormAction::SubmitRequested),
        }
    }

    fn text_value(&self, path: &FieldPath) -> Result<String, FormError> {
        match self.controller.get(path)? {
            FieldValue::Text(s) => Ok(s),
            other => Err(mismatch(path, "text", &other)),
        }
    }

    fn edit_text(
        &mut self,
        path: &FieldPath,
        key: &KeyEvent,
        filter: CharFilter,
    ) -> Result<FormAction, FormError> {
        let mut value = self.text_value(path)?;
        match self.input.handle_key(&mut value, key, filter) {
            TextEdit::Unchanged => Ok(FormAction::None),
            TextEdit::Moved => Ok(FormAction::Changed),
            TextEdit::Changed => {
                self.controller.set_value(path, FieldValue::Text(value))?;
                Ok(FormAction::Changed)
            }
        }
    }

    fn paste(&mut self, text: &str) -> Result<FormAction, FormError> {
        let (path, filter) = match self.focus {
            FocusTarget::Text(field) => (FieldPath::from(field.path()), field.filter()),
            FocusTarget::HobbyName(i) => (hobby_name_path(i), CharFilter::Any),
            _ => return Ok(FormAction::None),
        };
        let mut value = self.text_value(&path)?;
        if self.input.paste(&mut value, text, filter) == TextEdit::Unchanged {
            return Ok(FormAction::None);
        }
        self.controller.set_value(&path, FieldValue::Text(value))?;
        Ok(FormAction::Changed)
    }

    fn cycle_gender(&mut self, forward: bool) -> Result<FormAction, FormError> {
        let next = Gender::cycle(self.controller.values().gender, forward);
        self.controller.set_value(
            &FieldPath::from(GENDER),
            FieldValue::Choice(next.map(|g| g.as_str().to_string())),
        )?;
        Ok(FormAction::Changed)
    }

    fn toggle_subscribe(&mut self) -> Result<FormAction, FormError> {
        let subscribe = !self.controller.values().subscribe;
        self.set_value(&FieldPath::from(SUBSCRIBE), FieldValue::Bool(subscribe))?;
        tracing::debug!(subscribe, "referral field toggled");
        Ok(FormAction::Changed)
    }

    fn date_key(&mut self, key: &KeyEvent) -> Result<FormAction, FormError> {
        let path = FieldPath::from(START_DATE);
        let selected = self.controller.values().start_date;
        match self.picker.handle_key(selected, key) {
            DateEvent::Ignored => Ok(FormAction::None),
            DateEvent::Opened | DateEvent::Moved | DateEvent::Closed => Ok(FormAction::Changed),
            DateEvent::Selected(date) => {
                self.controller.set_value(&path, FieldValue::Date(Some(date)))?;
                Ok(FormAction::Changed)
            }
            DateEvent::Cleared => {
                self.controller.set_value(&path, FieldValue::Date(None))?;
                Ok(FormAction::Changed)
            }
        }
    }

    /// Append an empty hobby and focus its name input.
    pub fn add_hobby(&mut self) -> Result<FormAction, FormError> {
        let index = self.controller.append(&FieldPath::from(HOBBIES))?;
        self.leave_focus();
        self.focus = FocusTarget::HobbyName(index);
        self.enter_focus();
        Ok(FormAction::Changed)
    }

    /// Remove hobby `index`. Focus stays on the Remove Hobby buttons while
    /// any are shown.
    pub fn remove_hobby(&mut self, index: usize) -> Result<FormAction, FormError> {
        self.controller.remove(&FieldPath::from(HOBBIES), index)?;
        let remaining = self.controller.values().hobbies.len();
        if matches!(
            self.focus,
            FocusTarget::RemoveHobby(_) | FocusTarget::HobbyName(_)
        ) {
            self.focus = if remaining > 1 {
                FocusTarget::RemoveHobby(index.min(remaining - 1))
            } else {
                FocusTarget::HobbyName(0)
            };
            self.enter_focus();
        }
        Ok(FormAction::Changed)
    }

    // -- Submit ----------------------------------------------------------------

    /// Validate and, when valid, start a submission. Invalid drafts move
    /// focus to the first control with an error.
    pub fn begin_submit(&mut self) -> Result<SubmitAttempt<RegistrationDraft>, FormError> {
        self.picker.close();
        let attempt = self.controller.begin_submit()?;
        if let SubmitAttempt::Invalid(errors) = &attempt {
            self.focus_first_invalid(errors);
        }
        Ok(attempt)
    }

    pub fn finish_submit(
        &mut self,
        id: TicketId,
        result: Result<(), SubmitError>,
    ) -> Result<(), FormError> {
        self.controller.finish_submit(id, result)
    }

    /// Submit synchronously with `handler`.
    pub fn submit_with<H>(&mut self, handler: &H) -> Result<SubmitOutcome, FormError>
    where
        H: SubmitHandler<RegistrationDraft> + ?Sized,
    {
        self.picker.close();
        let outcome = self.controller.submit_with(handler)?;
        if outcome == SubmitOutcome::Invalid {
            let errors = self.controller.errors().clone();
            self.focus_first_invalid(&errors);
        }
        Ok(outcome)
    }

    fn focus_first_invalid(&mut self, errors: &FieldErrors) {
        let target = self.focus_order().into_iter().find(|target| {
            target
                .error_path()
                .is_some_and(|path| errors.contains(&path))
        });
        if let Some(target) = target {
            self.focus = target;
            self.enter_focus();
        }
    }

    /// Replace the defaults and start over.
    pub fn reset_to(&mut self, values: RegistrationDraft) {
        self.controller.reset_to(values);
        self.after_reset();
    }

    /// Restore the defaults and start over.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.after_reset();
    }

    fn after_reset(&mut self) {
        self.picker.close();
        self.scroll = 0;
        self.focus = FocusTarget::Text(TextField::FirstName);
        self.sync_referral();
        self.enter_focus();
    }

    // -- Rendering -------------------------------------------------------------

    fn layout_rows(&self) -> Vec<Row> {
        let values = self.controller.values();
        let errors = self.controller.errors();
        let mut rows = Vec::new();

        let text = |rows: &mut Vec<Row>, field: TextField| {
            push_field(
                rows,
                Row::Field(FocusTarget::Text(field)),
                errors,
                &FieldPath::from(field.path()),
            );
        };

        text(&mut rows, TextField::FirstName);
        text(&mut rows, TextField::LastName);
        text(&mut rows, TextField::Email);
        text(&mut rows, TextField::Age);
        push_field(
            &mut rows,
            Row::Field(FocusTarget::Gender),
            errors,
            &FieldPath::from(GENDER),
        );
        text(&mut rows, TextField::City);
        text(&mut rows, TextField::State);

        rows.push(Row::Heading("Hobbies"));
        for i in 0..values.hobbies.len() {
            push_field(&mut rows, Row::Hobby(i), errors, &hobby_name_path(i));
        }
        push_field(&mut rows, Row::AddHobby, errors, &FieldPath::from(HOBBIES));

        rows.push(Row::Field(FocusTarget::StartDate));
        if self.picker.is_open() {
            rows.extend((0..CALENDAR_HEIGHT).map(Row::Calendar));
        }
        if let Some(message) = errors.message(&FieldPath::from(START_DATE)) {
            rows.push(Row::Error(message.to_string()));
        }

        push_field(
            &mut rows,
            Row::Field(FocusTarget::Subscribe),
            errors,
            &FieldPath::from(SUBSCRIBE),
        );
        if values.subscribe {
            text(&mut rows, TextField::Referral);
        }

        rows.push(Row::Blank);
        rows.push(Row::Submit);
        if let Some(message) = errors.message(&FieldPath::root()) {
            rows.push(Row::RootError(message.to_string()));
        }
        rows
    }

    /// Rows that must stay visible for the focused control: its own row, the
    /// open calendar, its error line, and the root error below Submit.
    fn focus_span(&self, rows: &[Row]) -> Option<(usize, usize)> {
        let start = rows.iter().position(|row| row.holds(self.focus))?;
        let mut end = start;
        if self.focus == FocusTarget::StartDate && self.picker.is_open() {
            end += usize::from(CALENDAR_HEIGHT);
        }
        match rows.get(end + 1) {
            Some(Row::Error(_)) => end += 1,
            Some(Row::RootError(_)) if self.focus == FocusTarget::Submit => end += 1,
            _ => {}
        }
        Some((start, end))
    }

    /// Draw the form into `area`, scrolling so the focused control is visible.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.styles.base);

        let rows = self.layout_rows();
        let height = usize::from(area.height);
        if let Some((start, end)) = self.focus_span(&rows) {
            if end >= self.scroll + height {
                self.scroll = end + 1 - height;
            }
            if start < self.scroll {
                self.scroll = start;
            }
        }
        self.scroll = self.scroll.min(rows.len().saturating_sub(height));

        let label_w = LABEL_WIDTH.min(area.width);
        let value_x = area.x + label_w;
        let value_w = area.width - label_w;

        let calendar = self.picker.is_open().then(|| {
            let mut cal = Buffer::new(CALENDAR_WIDTH, CALENDAR_HEIGHT);
            self.picker.render_calendar(
                self.controller.values().start_date,
                cal.bounds(),
                &mut cal,
                &self.styles.calendar,
            );
            cal
        });

        for (offset, row) in rows.iter().skip(self.scroll).take(height).enumerate() {
            let y = area.y + offset as u16;
            let value_area = Rect::new(value_x, y, value_w, 1);
            match row {
                Row::Field(target) => {
                    self.draw_label(*target, area.x, y, label_w, buf);
                    self.draw_control(*target, value_area, buf);
                }
                Row::Heading(text) => {
                    draw_str(buf, area.x, y, text, self.styles.heading, area.width);
                }
                Row::Hobby(i) => self.draw_hobby(*i, area.x, label_w, value_area, buf),
                Row::AddHobby => {
                    let style = self.button_style(FocusTarget::AddHobby, false);
                    draw_str(buf, value_x, y, ADD_HOBBY, style, value_w);
                }
                Row::Calendar(line) => {
                    if let Some(cal) = &calendar {
                        for (dx, cell) in cal.row_cells(*line).iter().enumerate() {
                            if dx >= usize::from(value_w) {
                                break;
                            }
                            buf.set(value_x + dx as u16, y, cell.clone());
                        }
                    }
                }
                Row::Error(message) => {
                    let text = truncate_to_width(message, usize::from(value_w));
                    draw_str(buf, value_x, y, &text, self.styles.error, value_w);
                }
                Row::Blank => {}
                Row::Submit => {
                    let busy = self.controller.is_submitting();
                    let label = if busy { SUBMITTING } else { SUBMIT };
                    let style = self.button_style(FocusTarget::Submit, busy);
                    draw_str(buf, value_x, y, label, style, value_w);
                }
                Row::RootError(message) => {
                    let text = truncate_to_width(message, usize::from(area.width));
                    draw_str(buf, area.x, y, &text, self.styles.root_error, area.width);
                }
            }
        }
    }

    fn label_style(&self, focused: bool) -> Style {
        if focused {
            self.styles.focused_label
        } else {
            self.styles.label
        }
    }

    fn button_style(&self, target: FocusTarget, disabled: bool) -> Style {
        if disabled {
            self.styles.button.patch(self.styles.disabled)
        } else if self.focus == target {
            self.styles.focused_button
        } else {
            self.styles.button
        }
    }

    fn draw_label(&self, target: FocusTarget, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        let label = match target {
            FocusTarget::Text(field) => field.label(),
            FocusTarget::Gender => "Select Gender:",
            FocusTarget::StartDate => "Start Date",
            _ => return,
        };
        let style = self.label_style(self.focus == target);
        draw_str(buf, x, y, label, style, width.saturating_sub(1));
    }

    fn draw_control(&mut self, target: FocusTarget, area: Rect, buf: &mut Buffer) {
        let focused = self.focus == target;
        let values = self.controller.values();
        match target {
            FocusTarget::Text(field) => {
                let style = InputStyle {
                    text: self.styles.input,
                    placeholder: self.styles.placeholder,
                };
                let value = field.value(values);
                if focused {
                    self.input
                        .render(value, field.placeholder(), area, buf, style, true);
                } else {
                    TextInput::new().render(value, field.placeholder(), area, buf, style, false);
                }
            }
            FocusTarget::Gender => {
                let (text, style) = match values.gender {
                    Some(g) => (g.as_str(), self.styles.input),
                    None => (SELECT_PLACEHOLDER, self.styles.placeholder),
                };
                let shown = if focused {
                    format!("< {text} >")
                } else {
                    format!("  {text}  ")
                };
                let style = if focused {
                    style.patch(self.styles.focused_label)
                } else {
                    style
                };
                draw_str(buf, area.x, area.y, &shown, style, area.width);
            }
            FocusTarget::StartDate => {
                let style = if focused {
                    self.styles.input.patch(self.styles.focused_label)
                } else {
                    self.styles.input
                };
                self.picker.render_field(
                    values.start_date,
                    DATE_PLACEHOLDER,
                    area,
                    buf,
                    style,
                    self.styles.placeholder,
                );
            }
            FocusTarget::Subscribe => {
                let mark = if values.subscribe { "[x]" } else { "[ ]" };
                let text = format!("{mark} Subscribe to newsletter");
                draw_str(buf, area.x, area.y, &text, self.label_style(focused), area.width);
            }
            _ => {}
        }
    }

    fn draw_hobby(&mut self, index: usize, x: u16, label_w: u16, area: Rect, buf: &mut Buffer) {
        let values = self.controller.values();
        let count = values.hobbies.len();
        let name = values.hobbies.get(index).map_or("", |h| h.name.as_str());
        let name_focused = self.focus == FocusTarget::HobbyName(index);

        let label = format!("  #{}", index + 1);
        draw_str(buf, x, area.y, &label, self.label_style(name_focused), label_w);

        let button_w = REMOVE_HOBBY.len() as u16;
        let input_w = if count > 1 {
            area.width.saturating_sub(button_w + 1)
        } else {
            area.width
        };
        let input_area = Rect::new(area.x, area.y, input_w, 1);
        let style = InputStyle {
            text: self.styles.input,
            placeholder: self.styles.placeholder,
        };
        if name_focused {
            self.input
                .render(name, "Hobby name", input_area, buf, style, true);
        } else {
            TextInput::new().render(name, "Hobby name", input_area, buf, style, false);
        }

        if count > 1 {
            let bx = area.x + input_w + 1;
            let style = self.button_style(FocusTarget::RemoveHobby(index), false);
            draw_str(buf, bx, area.y, REMOVE_HOBBY, style, area.right().saturating_sub(bx));
        }
    }
}
