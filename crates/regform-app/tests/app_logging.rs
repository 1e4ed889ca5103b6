//! App-level logging: the submit log line reaches the log pane and the
//! optional log file.
//!
//! # Running Tests
//!
//! ```sh
//! cargo test -p regform-app --test app_logging -- --nocapture
//! ```

#![cfg(test)]

use std::sync::Arc;

use chrono::NaiveDate;
use regform_app::logging::{self, LogRing};
use regform_app::{AppModel, Cmd, Msg, Status};
use regform_core::event::{Event, KeyCode, KeyEvent};
use regform_forms::{
    Address, FormOptions, Gender, Hobby, LoggingSubmitHandler, RegistrationDraft,
    RegistrationForm,
};
use regform_render::buffer::Buffer;
use serde_json::json;

fn log_jsonl(step: &str, data: serde_json::Value) {
    eprintln!("{}", json!({ "step": step, "data": data }));
}

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
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        subscribe: false,
        referral: String::new(),
    }
}

fn model(ring: LogRing) -> AppModel {
    let form = RegistrationForm::new(jane(), FormOptions::default()).unwrap();
    AppModel::new(form, Arc::new(LoggingSubmitHandler), ring)
}

/// Submit with Enter and run the task on this thread so the thread-local
/// dispatcher sees its events.
fn submit_inline(model: &mut AppModel) {
    let cmd = model
        .update(Msg::Event(Event::Key(KeyEvent::new(KeyCode::Enter))))
        .unwrap();
    let Cmd::Task(task) = cmd else {
        panic!("expected a submit task, got {cmd:?}");
    };
    let after = model.update(task()).unwrap();
    assert!(after.is_none());
}

#[test]
fn submission_is_logged_to_pane_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regform.log");
    let ring = LogRing::new(32);
    let subscriber = logging::subscriber("info", Some(&path), ring.clone()).unwrap();
    let dispatch = tracing::Dispatch::new(subscriber);

    let mut app = model(ring.clone());
    tracing::dispatcher::with_default(&dispatch, || submit_inline(&mut app));
    assert_eq!(app.status(), &Status::Submitted);

    let lines = ring.tail(32);
    log_jsonl("ring", json!(lines));
    let submitted = lines
        .iter()
        .find(|line| line.contains("registration submitted"))
        .expect("submit line in ring");
    assert!(submitted.contains("INFO"), "line: {submitted}");
    assert!(submitted.contains(r#""firstName":"Jane""#), "line: {submitted}");

    drop(dispatch);
    let file = std::fs::read_to_string(&path).unwrap();
    log_jsonl("file", json!(file));
    assert!(file.contains("registration submitted"), "file: {file}");
    assert!(file.contains("INFO"), "file: {file}");

    let mut buf = Buffer::new(100, 30);
    app.view(&mut buf);
    assert!(buf.find_row("registration submitted").is_some());
    assert!(buf.find_row("Registration submitted").is_some());
}

#[test]
fn filter_drops_events_below_level() {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let ring = LogRing::new(8);
    let subscriber = logging::subscriber("warn", None, ring.clone()).unwrap();
    let dispatch = tracing::Dispatch::new(subscriber);

    let mut app = model(ring.clone());
    tracing::dispatcher::with_default(&dispatch, || submit_inline(&mut app));

    assert!(
        ring.tail(8)
            .iter()
            .all(|line| !line.contains("registration submitted")),
        "lines: {:?}",
        ring.tail(8)
    );
}

#[test]
fn unwritable_log_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("regform.log");
    let err = logging::subscriber("info", Some(&path), LogRing::new(1)).err();
    match err {
        Some(regform_app::AppError::LogFile { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected LogFile error, got {other:?}"),
    }
}
