#![forbid(unsafe_code)]

//! Validation rules for [`RegistrationDraft`].

use regform_validation::{Email, MinItems, MinLength, MinValue, Present, Schema};

use crate::draft::{Hobby, RegistrationDraft};

pub const FIRST_NAME_REQUIRED: &str = "First Name is required";
pub const LAST_NAME_REQUIRED: &str = "Last Name is required";
pub const EMAIL_INVALID: &str = "Invalid Email Address";
pub const AGE_TOO_LOW: &str = "You must be at least 18 years old";
pub const GENDER_REQUIRED: &str = "Gender is required";
pub const CITY_REQUIRED: &str = "City is required";
pub const STATE_REQUIRED: &str = "State is required";
pub const HOBBY_NAME_REQUIRED: &str = "Hobby name is required";
pub const HOBBIES_EMPTY: &str = "At least one hobby is required";
pub const START_DATE_MISSING: &str = "Expected date, received null";
pub const REFERRAL_REQUIRED: &str = "Referral source is required";

/// Minimum accepted age.
pub const MIN_AGE: f64 = 18.0;

pub type RegistrationSchema = Schema<RegistrationDraft>;

/// The whole-draft schema.
///
/// `subscribe` accepts any value and `referral` has no rule here; the
/// referral requirement is a registration rule that only applies while the
/// field is shown.
#[must_use]
pub fn registration_schema() -> RegistrationSchema {
    Schema::new()
        .field(
            "firstName",
            |d: &RegistrationDraft| d.first_name.as_str(),
            MinLength::new(1).with_message(FIRST_NAME_REQUIRED),
        )
        .field(
            "lastName",
            |d: &RegistrationDraft| d.last_name.as_str(),
            MinLength::new(1).with_message(LAST_NAME_REQUIRED),
        )
        .field(
            "email",
            |d: &RegistrationDraft| d.email.as_str(),
            Email::new().with_message(EMAIL_INVALID),
        )
        .field(
            "age",
            |d: &RegistrationDraft| d.age.as_str(),
            MinValue::new(MIN_AGE).with_message(AGE_TOO_LOW),
        )
        .field(
            "gender",
            |d: &RegistrationDraft| &d.gender,
            Present::new("gender").with_message(GENDER_REQUIRED),
        )
        .field(
            "address.city",
            |d: &RegistrationDraft| d.address.city.as_str(),
            MinLength::new(1).with_message(CITY_REQUIRED),
        )
        .field(
            "address.state",
            |d: &RegistrationDraft| d.address.state.as_str(),
            MinLength::new(1).with_message(STATE_REQUIRED),
        )
        .each(
            "hobbies",
            |d: &RegistrationDraft| d.hobbies.as_slice(),
            "name",
            |h: &Hobby| h.name.as_str(),
            MinLength::new(1).with_message(HOBBY_NAME_REQUIRED),
        )
        .field(
            "hobbies",
            |d: &RegistrationDraft| d.hobbies.as_slice(),
            MinItems::new(1).with_message(HOBBIES_EMPTY),
        )
        .field(
            "startDate",
            |d: &RegistrationDraft| &d.start_date,
            Present::new("date"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{Address, Gender};
    use chrono::NaiveDate;
    use regform_validation::{FieldPath, Resolver};

    fn valid() -> RegistrationDraft {
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

    fn message(d: &RegistrationDraft, path: &str) -> Option<String> {
        registration_schema()
            .resolve(d)
            .message(&FieldPath::parse(path))
            .map(str::to_string)
    }

    #[test]
    fn valid_draft_has_no_errors() {
        assert!(registration_schema().resolve(&valid()).is_empty());
    }

    #[test]
    fn default_draft_reports_every_required_field() {
        let d = RegistrationDraft::starting(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let errs = registration_schema().resolve(&d);
        let paths: Vec<String> = errs.paths().map(ToString::to_string).collect();
        assert_eq!(
            paths,
            [
                "address.city",
                "address.state",
                "email",
                "firstName",
                "gender",
                "hobbies.0.name",
                "lastName",
            ]
        );
        assert_eq!(message(&d, "email").as_deref(), Some(EMAIL_INVALID));
        assert_eq!(message(&d, "gender").as_deref(), Some(GENDER_REQUIRED));
    }

    #[test]
    fn age_is_numeric() {
        let mut d = valid();
        for (age, ok) in [("18", true), ("100", true), ("9", false), ("17.9", false), ("", false), ("x", false)] {
            d.age = age.into();
            assert_eq!(message(&d, "age").is_none(), ok, "age {age:?}");
        }
        d.age = "17".into();
        assert_eq!(message(&d, "age").as_deref(), Some(AGE_TOO_LOW));
    }

    #[test]
    fn whitespace_counts_as_length() {
        let mut d = valid();
        d.first_name = " ".into();
        assert!(message(&d, "firstName").is_none());
    }

    #[test]
    fn empty_hobbies() {
        let mut d = valid();
        d.hobbies.clear();
        assert_eq!(message(&d, "hobbies").as_deref(), Some(HOBBIES_EMPTY));
    }

    #[test]
    fn cleared_start_date() {
        let mut d = valid();
        d.start_date = None;
        assert_eq!(message(&d, "startDate").as_deref(), Some(START_DATE_MISSING));
    }

    #[test]
    fn referral_has_no_schema_rule() {
        let mut d = valid();
        d.subscribe = true;
        assert!(registration_schema().resolve(&d).is_empty());
    }
}
