#![forbid(unsafe_code)]

//! Registration form: draft model, schema, form-state controller, and the
//! terminal controls that edit it.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use regform_forms::{FormController, FormOptions, RegistrationDraft, SubmitOutcome};
//! use regform_forms::schema::registration_schema;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let mut form = FormController::new(
//!     RegistrationDraft::starting(start),
//!     registration_schema(),
//!     FormOptions::default(),
//! );
//! let outcome = form.submit_with(&regform_forms::LoggingSubmitHandler).unwrap();
//! assert_eq!(outcome, SubmitOutcome::Invalid);
//! assert_eq!(form.error(&"firstName".into()), Some("First Name is required"));
//! ```

pub mod controller;
pub mod date_picker;
pub mod draft;
pub mod error;
pub mod model;
pub mod registration_form;
pub mod schema;
pub mod submit;
pub mod text_input;

pub use controller::{
    ArrayEntry, FieldArrayOptions, FieldKey, FormController, FormOptions, FormStateSnapshot,
    ReValidateMode, RegisterOptions, SubmitAttempt, SubmitOutcome, SubmitTicket, TicketId,
    ValidationMode,
};
pub use date_picker::{DateEvent, DatePicker};
pub use draft::{Address, Gender, Hobby, RegistrationDraft};
pub use error::FormError;
pub use model::{FieldValue, FormModel};
pub use registration_form::{FocusTarget, FormAction, FormStyles, RegistrationForm, TextField};
pub use submit::{FailingSubmitHandler, LoggingSubmitHandler, SubmitError, SubmitHandler};
