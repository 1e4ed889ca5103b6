#![forbid(unsafe_code)]

//! The registration draft: the form's in-memory value object.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use regform_validation::{FieldPath, Segment};
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::model::{FieldValue, FormModel, mismatch};

/// Gender options offered by the select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    /// All options in display order.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Others];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "Others",
        }
    }

    /// Step through `None → Male → Female → Others → None`.
    #[must_use]
    pub fn cycle(current: Option<Gender>, forward: bool) -> Option<Gender> {
        let order = [
            None,
            Some(Gender::Male),
            Some(Gender::Female),
            Some(Gender::Others),
        ];
        let pos = order.iter().position(|g| *g == current).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        order[next]
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hobby {
    pub name: String,
}

impl Hobby {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Values collected by the registration form.
///
/// Serializes with camelCase keys (`firstName`, `startDate`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Age as typed.
    pub age: String,
    pub gender: Option<Gender>,
    pub address: Address,
    pub hobbies: Vec<Hobby>,
    pub start_date: Option<NaiveDate>,
    pub subscribe: bool,
    pub referral: String,
}

impl RegistrationDraft {
    /// Defaults with `start_date` set to `start`.
    #[must_use]
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            age: "18".to_string(),
            gender: None,
            address: Address::default(),
            hobbies: vec![Hobby::default()],
            start_date: Some(start),
            subscribe: false,
            referral: String::new(),
        }
    }

    /// Serialize to the JSON shape used in submission logs.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Default for RegistrationDraft {
    /// Defaults with today's local date as the start date.
    fn default() -> Self {
        Self::starting(chrono::Local::now().date_naive())
    }
}

fn text(path: &FieldPath, value: FieldValue) -> Result<String, FormError> {
    match value {
        FieldValue::Text(s) => Ok(s),
        other => Err(mismatch(path, "text", &other)),
    }
}

const HOBBIES: &str = "hobbies";

impl RegistrationDraft {
    fn text_slot(&mut self, path: &FieldPath) -> Option<&mut String> {
        let slot = match path.segments() {
            [Segment::Key(k)] => match k.as_str() {
                "firstName" => &mut self.first_name,
                "lastName" => &mut self.last_name,
                "email" => &mut self.email,
                "age" => &mut self.age,
                "referral" => &mut self.referral,
                _ => return None,
            },
            [Segment::Key(a), Segment::Key(k)] if a == "address" => match k.as_str() {
                "city" => &mut self.address.city,
                "state" => &mut self.address.state,
                _ => return None,
            },
            [Segment::Key(h), Segment::Index(i), Segment::Key(k)] if h == HOBBIES && k == "name" => {
                &mut self.hobbies.get_mut(*i)?.name
            }
            _ => return None,
        };
        Some(slot)
    }

    fn is_hobbies(path: &FieldPath) -> bool {
        matches!(path.segments(), [Segment::Key(k)] if k == HOBBIES)
    }
}

impl FormModel for RegistrationDraft {
    fn get(&self, path: &FieldPath) -> Result<FieldValue, FormError> {
        let unknown = || FormError::UnknownField(path.clone());
        let value = match path.segments() {
            [Segment::Key(k)] => match k.as_str() {
                "firstName" => FieldValue::Text(self.first_name.clone()),
                "lastName" => FieldValue::Text(self.last_name.clone()),
                "email" => FieldValue::Text(self.email.clone()),
                "age" => FieldValue::Text(self.age.clone()),
                "referral" => FieldValue::Text(self.referral.clone()),
                "gender" => FieldValue::Choice(self.gender.map(|g| g.as_str().to_string())),
                "startDate" => FieldValue::Date(self.start_date),
                "subscribe" => FieldValue::Bool(self.subscribe),
                HOBBIES => FieldValue::Count(self.hobbies.len()),
                _ => return Err(unknown()),
            },
            [Segment::Key(a), Segment::Key(k)] if a == "address" => match k.as_str() {
                "city" => FieldValue::Text(self.address.city.clone()),
                "state" => FieldValue::Text(self.address.state.clone()),
                _ => return Err(unknown()),
            },
            [Segment::Key(h), Segment::Index(i), Segment::Key(k)] if h == HOBBIES && k == "name" => {
                let hobby = self.hobbies.get(*i).ok_or_else(|| FormError::IndexOutOfRange {
                    path: path.clone(),
                    index: *i,
                    len: self.hobbies.len(),
                })?;
                FieldValue::Text(hobby.name.clone())
            }
            _ => return Err(unknown()),
        };
        Ok(value)
    }

    fn set(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FormError> {
        if let [Segment::Key(k)] = path.segments() {
            match k.as_str() {
                "gender" => {
                    self.gender = match value {
                        FieldValue::Choice(None) => None,
                        FieldValue::Choice(Some(s)) if s.is_empty() => None,
                        FieldValue::Choice(Some(s)) => Some(s.parse().map_err(|()| {
                            FormError::InvalidChoice {
                                path: path.clone(),
                                value: s.clone(),
                            }
                        })?),
                        other => return Err(mismatch(path, "choice", &other)),
                    };
                    return Ok(());
                }
                "startDate" => {
                    self.start_date = match value {
                        FieldValue::Date(d) => d,
                        other => return Err(mismatch(path, "date", &other)),
                    };
                    return Ok(());
                }
                "subscribe" => {
                    self.subscribe = match value {
                        FieldValue::Bool(b) => b,
                        other => return Err(mismatch(path, "bool", &other)),
                    };
                    return Ok(());
                }
                HOBBIES => return Err(mismatch(path, "array", &value)),
                _ => {}
            }
        }
        if let [Segment::Key(h), Segment::Index(i), ..] = path.segments()
            && h == HOBBIES
            && *i >= self.hobbies.len()
        {
            return Err(FormError::IndexOutOfRange {
                path: path.clone(),
                index: *i,
                len: self.hobbies.len(),
            });
        }
        let s = text(path, value)?;
        let slot = self
            .text_slot(path)
            .ok_or_else(|| FormError::UnknownField(path.clone()))?;
        *slot = s;
        Ok(())
    }

    fn array_len(&self, path: &FieldPath) -> Result<usize, FormError> {
        if Self::is_hobbies(path) {
            Ok(self.hobbies.len())
        } else {
            Err(FormError::NotAnArray(path.clone()))
        }
    }

    fn push_entry(&mut self, path: &FieldPath) -> Result<usize, FormError> {
        if !Self::is_hobbies(path) {
            return Err(FormError::NotAnArray(path.clone()));
        }
        self.hobbies.push(Hobby::default());
        Ok(self.hobbies.len() - 1)
    }

    fn remove_entry(&mut self, path: &FieldPath, index: usize) -> Result<(), FormError> {
        if !Self::is_hobbies(path) {
            return Err(FormError::NotAnArray(path.clone()));
        }
        if index >= self.hobbies.len() {
            return Err(FormError::IndexOutOfRange {
                path: path.clone(),
                index,
                len: self.hobbies.len(),
            });
        }
        self.hobbies.remove(index);
        Ok(())
    }
}
