//! Registration form end-to-end scenarios.
//!
//! Every scenario drives the form the way the terminal app does: key events
//! into [`RegistrationForm::handle_event`], submissions through a handler,
//! and assertions on the rendered buffer.
//!
//! # Running Tests
//!
//! ```sh
//! cargo test -p regform-forms --test registration_e2e -- --nocapture
//! ```

#![cfg(test)]

use std::sync::Mutex;

use chrono::NaiveDate;
use regform_core::event::{Event, KeyCode, KeyEvent};
use regform_core::geometry::Rect;
use regform_forms::schema;
use regform_forms::{
    Address, FocusTarget, FormAction, FormError, FormOptions, Gender, Hobby, RegistrationDraft,
    RegistrationForm, SubmitAttempt, SubmitError, SubmitHandler, SubmitOutcome, TextField,
};
use regform_render::buffer::Buffer;
use regform_validation::FieldPath;
use serde_json::json;

// ============================================================================
// Test Utilities
// ============================================================================

fn log_jsonl(step: &str, data: serde_json::Value) {
    eprintln!("{}", json!({ "step": step, "data": data }));
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn new_form() -> RegistrationForm {
    RegistrationForm::new(RegistrationDraft::starting(start_date()), FormOptions::default())
        .unwrap()
        .with_today(start_date())
}

/// The scenario-A draft.
fn jane() -> RegistrationDraft {
    RegistrationDraft {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@doe.com".into(),
        age: "25".into(),
        gender: Some(Gender::Male),
        address: Address {
            city: "NYC".into(),
            state: "NY".into(),
        },
        hobbies: vec![Hobby::new("chess")],
        start_date: Some(start_date()),
        subscribe: false,
        referral: String::new(),
    }
}

fn press(form: &mut RegistrationForm, code: KeyCode) -> FormAction {
    form.handle_event(&Event::Key(KeyEvent::new(code))).unwrap()
}

fn type_str(form: &mut RegistrationForm, s: &str) {
    for c in s.chars() {
        press(form, KeyCode::Char(c));
    }
}

fn clear_field(form: &mut RegistrationForm) {
    for _ in 0..32 {
        press(form, KeyCode::Backspace);
    }
}

fn render(form: &mut RegistrationForm) -> Buffer {
    let mut buf = Buffer::new(72, 48);
    form.render(Rect::from_size(72, 48), &mut buf);
    buf
}

/// Row of `needle`, and the row right after it holds `error`.
fn assert_error_below(buf: &Buffer, needle: &str, error: &str) {
    let field = buf
        .find_row(needle)
        .unwrap_or_else(|| panic!("{needle:?} not rendered:\n{}", buf.to_lines().join("\n")));
    assert!(
        buf.row_text(field + 1).contains(error),
        "expected {error:?} under {needle:?}:\n{}",
        buf.to_lines().join("\n")
    );
}

/// Records every draft it is handed.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<RegistrationDraft>>,
}

impl Recorder {
    fn calls(&self) -> Vec<RegistrationDraft> {
        self.seen.lock().unwrap().clone()
    }
}

impl SubmitHandler<RegistrationDraft> for Recorder {
    fn submit(&self, values: &RegistrationDraft) -> Result<(), SubmitError> {
        self.seen.lock().unwrap().push(values.clone());
        Ok(())
    }
}

/// Fill the scenario-A values by keyboard, starting from a fresh form.
fn fill_jane_by_keys(form: &mut RegistrationForm) {
    type_str(form, "Jane");
    press(form, KeyCode::Tab);
    type_str(form, "Doe");
    press(form, KeyCode::Tab);
    type_str(form, "jane@doe.com");
    press(form, KeyCode::Tab);
    clear_field(form);
    type_str(form, "25");
    press(form, KeyCode::Tab);
    press(form, KeyCode::Right);
    press(form, KeyCode::Tab);
    type_str(form, "NYC");
    press(form, KeyCode::Tab);
    type_str(form, "NY");
    press(form, KeyCode::Tab);
    assert_eq!(form.focus(), FocusTarget::HobbyName(0));
    type_str(form, "chess");
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_valid_draft_submits_once() {
    let mut form = new_form();
    fill_jane_by_keys(&mut form);
    assert_eq!(form.values(), &jane());

    let action = press(&mut form, KeyCode::Enter);
    assert_eq!(action, FormAction::SubmitRequested);

    let handler = Recorder::default();
    let outcome = form.submit_with(&handler).unwrap();
    log_jsonl(
        "scenario_a",
        json!({ "outcome": format!("{outcome:?}"), "draft": form.values() }),
    );

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert!(form.errors().is_empty());
    assert_eq!(handler.calls(), vec![jane()]);
    let state = form.controller().form_state();
    assert!(state.is_submit_successful);
    assert!(!state.is_submitting);
}

#[test]
fn scenario_b_bad_email_blocks_submit() {
    let mut form = new_form();
    form.reset_to(RegistrationDraft {
        email: "not-an-email".into(),
        ..jane()
    });
    let handler = Recorder::default();
    let outcome = form.submit_with(&handler).unwrap();
    let buf = render(&mut form);
    log_jsonl("scenario_b", json!({ "errors": form.errors(), "screen": buf.to_lines() }));

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert!(handler.calls().is_empty());
    assert_eq!(
        form.errors().message(&FieldPath::from("email")),
        Some(schema::EMAIL_INVALID)
    );
    assert_eq!(form.errors().len(), 1);
    assert_error_below(&buf, "not-an-email", schema::EMAIL_INVALID);
    assert_eq!(form.focus(), FocusTarget::Text(TextField::Email));
}

#[test]
fn scenario_c_empty_hobbies_blocks_submit() {
    let mut form = new_form();
    form.reset_to(RegistrationDraft {
        hobbies: Vec::new(),
        ..jane()
    });
    let handler = Recorder::default();
    let outcome = form.submit_with(&handler).unwrap();
    let buf = render(&mut form);
    log_jsonl("scenario_c", json!({ "errors": form.errors() }));

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert!(handler.calls().is_empty());
    assert_eq!(
        form.errors().message(&FieldPath::from("hobbies")),
        Some(schema::HOBBIES_EMPTY)
    );
    assert_error_below(&buf, "[ Add Hobby ]", schema::HOBBIES_EMPTY);
    assert_eq!(form.focus(), FocusTarget::AddHobby);
}

#[test]
fn scenario_d_referral_required_only_while_subscribed() {
    let mut form = new_form();
    form.reset_to(jane());
    assert!(form.focus_on(FocusTarget::Subscribe));
    press(&mut form, KeyCode::Char(' '));
    assert!(form.values().subscribe);

    let handler = Recorder::default();
    assert_eq!(form.submit_with(&handler).unwrap(), SubmitOutcome::Invalid);
    let buf = render(&mut form);
    log_jsonl("scenario_d_blocked", json!({ "screen": buf.to_lines() }));
    assert!(handler.calls().is_empty());
    assert_error_below(&buf, "How did you hear about us?", schema::REFERRAL_REQUIRED);
    assert_eq!(form.focus(), FocusTarget::Text(TextField::Referral));

    type_str(&mut form, "friend");
    // Re-validation on change clears the message right away.
    assert!(form.errors().is_empty());
    assert_eq!(form.submit_with(&handler).unwrap(), SubmitOutcome::Succeeded);
    let calls = handler.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].subscribe);
    assert_eq!(calls[0].referral, "friend");
    log_jsonl("scenario_d_ok", json!({ "draft": calls[0] }));
}

#[test]
fn hidden_referral_keeps_value_but_skips_validation() {
    let mut form = new_form();
    form.reset_to(jane());
    assert!(form.focus_on(FocusTarget::Subscribe));
    press(&mut form, KeyCode::Char(' '));
    press(&mut form, KeyCode::Tab);
    type_str(&mut form, "  ");
    press(&mut form, KeyCode::BackTab);
    press(&mut form, KeyCode::Char(' '));

    let handler = Recorder::default();
    assert_eq!(form.submit_with(&handler).unwrap(), SubmitOutcome::Succeeded);
    assert_eq!(handler.calls()[0].referral, "  ");
    assert!(!handler.calls()[0].subscribe);
}

// ============================================================================
// Field rules
// ============================================================================

#[test]
fn age_threshold_is_numeric() {
    let mut form = new_form();
    form.reset_to(jane());
    let age = FieldPath::from("age");
    for (value, ok) in [("100", true), ("18", true), ("17", false), ("9", false)] {
        form.set_value(&age, value.into()).unwrap();
        let valid = form.submit_with(&|_: &RegistrationDraft| -> Result<(), SubmitError> { Ok(()) })
            .unwrap()
            == SubmitOutcome::Succeeded;
        log_jsonl("age", json!({ "value": value, "valid": valid }));
        assert_eq!(valid, ok, "age {value}");
        if !ok {
            assert_eq!(form.errors().message(&age), Some(schema::AGE_TOO_LOW));
        }
    }
}

#[test]
fn missing_required_fields_show_exact_messages() {
    let mut form = new_form();
    let handler = Recorder::default();
    assert_eq!(form.submit_with(&handler).unwrap(), SubmitOutcome::Invalid);
    assert!(handler.calls().is_empty());
    let buf = render(&mut form);
    assert_error_below(&buf, "First Name", schema::FIRST_NAME_REQUIRED);
    assert_error_below(&buf, "Last Name", schema::LAST_NAME_REQUIRED);
    assert_error_below(&buf, "Select Gender:", schema::GENDER_REQUIRED);
    assert_error_below(&buf, "City", schema::CITY_REQUIRED);
    assert_error_below(&buf, "State", schema::STATE_REQUIRED);
    assert_error_below(&buf, "Hobby name", schema::HOBBY_NAME_REQUIRED);
}

#[test]
fn remove_hobby_keeps_order_and_shifts_errors() {
    let mut form = new_form();
    form.reset_to(RegistrationDraft {
        hobbies: vec![Hobby::new("a"), Hobby::new(""), Hobby::new("c")],
        ..jane()
    });
    assert_eq!(form.submit_with(&Recorder::default()).unwrap(), SubmitOutcome::Invalid);
    assert!(form.errors().contains(&FieldPath::from("hobbies.1.name")));

    assert!(form.focus_on(FocusTarget::RemoveHobby(0)));
    press(&mut form, KeyCode::Enter);
    let names: Vec<&str> = form.values().hobbies.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["", "c"]);
    assert!(form.errors().contains(&FieldPath::from("hobbies.0.name")));
    assert!(!form.errors().contains(&FieldPath::from("hobbies.1.name")));
}

#[test]
fn remove_button_hidden_with_one_hobby() {
    let mut form = new_form();
    let buf = render(&mut form);
    assert!(buf.find_row("[ Remove Hobby ]").is_none());
    assert!(!form.focus_order().contains(&FocusTarget::RemoveHobby(0)));

    form.add_hobby().unwrap();
    let buf = render(&mut form);
    assert!(buf.find_row("[ Remove Hobby ]").is_some());
    assert_eq!(form.values().hobbies[1], Hobby::default());
}

// ============================================================================
// Submitting state
// ============================================================================

#[test]
fn submitting_state_disables_submit_and_failure_sets_root_error() {
    let mut form = new_form();
    form.reset_to(jane());

    let SubmitAttempt::Ready(ticket) = form.begin_submit().unwrap() else {
        panic!("jane should validate");
    };
    assert!(form.is_submitting());
    let buf = render(&mut form);
    assert!(buf.find_row("[ Submitting... ]").is_some());
    assert!(buf.find_row("[ Submit ]").is_none());

    assert!(form.focus_on(FocusTarget::Submit));
    assert_eq!(press(&mut form, KeyCode::Enter), FormAction::None);
    assert_eq!(form.begin_submit().unwrap_err(), FormError::SubmitInFlight);

    form.finish_submit(ticket.id(), Err(SubmitError::new("Server rejected the registration")))
        .unwrap();
    assert!(!form.is_submitting());
    let buf = render(&mut form);
    log_jsonl("submit_failed", json!({ "screen": buf.to_lines() }));
    let submit = buf.find_row("[ Submit ]").unwrap();
    assert!(buf.row_text(submit + 1).contains("Server rejected the registration"));

    // The next attempt clears the root error first.
    let SubmitAttempt::Ready(ticket) = form.begin_submit().unwrap() else {
        panic!("still valid");
    };
    assert!(form.errors().is_empty());
    form.finish_submit(ticket.id(), Ok(())).unwrap();
    assert!(form.controller().form_state().is_submit_successful);
}
