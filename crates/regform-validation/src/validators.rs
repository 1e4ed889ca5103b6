#![forbid(unsafe_code)]

//! The [`Validator`] trait and the field rules the registration form needs.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Empty text.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Fewer characters than allowed.
pub const ERROR_CODE_MIN_LENGTH: &str = "too_short";
/// Not an email address.
pub const ERROR_CODE_EMAIL: &str = "invalid_string";
/// Number or list below its minimum.
pub const ERROR_CODE_MIN_VALUE: &str = "too_small";
/// A required value of some type is absent.
pub const ERROR_CODE_INVALID_TYPE: &str = "invalid_type";

type Message = Cow<'static, str>;

/// One failed rule.
///
/// `message` may hold `{name}` placeholders filled from `params` by
/// [`ValidationError::format_message`].
///
/// ```rust
/// use regform_validation::ValidationError;
///
/// let error = ValidationError::new("too_short", "Use {min} or more characters")
///     .with_param("min", 8);
/// assert_eq!(error.to_string(), "Use 8 or more characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
    pub params: Vec<(&'static str, String)>,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    #[must_use]
    pub fn format_message(&self) -> String {
        self.params
            .iter()
            .fold(self.message.clone(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_message())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    fn check(ok: bool, fail: impl FnOnce() -> ValidationError) -> Self {
        if ok { Self::Valid } else { Self::Invalid(fail()) }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(err) => Some(err),
        }
    }

    /// The formatted message of a failure.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ValidationError::format_message)
    }
}

/// A rule over one value.
///
/// ```rust
/// use regform_validation::{ValidationError, ValidationResult, Validator};
///
/// struct NoDigits;
///
/// impl Validator<str> for NoDigits {
///     fn validate(&self, value: &str) -> ValidationResult {
///         if value.chars().any(|c| c.is_ascii_digit()) {
///             ValidationResult::Invalid(ValidationError::new("digits", self.message()))
///         } else {
///             ValidationResult::Valid
///         }
///     }
///
///     fn message(&self) -> &str {
///         "Letters only"
///     }
/// }
///
/// assert!(NoDigits.validate("Jane").is_valid());
/// ```
pub trait Validator<T: ?Sized>: Send + Sync {
    fn validate(&self, value: &T) -> ValidationResult;

    /// Message used on failure.
    fn message(&self) -> &str;
}

macro_rules! message_builder {
    ($($ty:ty),+ $(,)?) => {$(
        impl $ty {
            /// Replace the failure message.
            #[must_use]
            pub fn with_message(mut self, message: impl Into<Message>) -> Self {
                self.message = message.into();
                self
            }
        }
    )+};
}

message_builder!(Required, MinLength, Email, MinValue, Present, MinItems);

/// Text must not be empty. Whitespace-only text counts as empty unless
/// [`Required::allow_whitespace`] is set.
#[derive(Debug, Clone)]
pub struct Required {
    pub allow_whitespace: bool,
    message: Message,
}

impl Default for Required {
    fn default() -> Self {
        Self {
            allow_whitespace: false,
            message: Cow::Borrowed("This field is required"),
        }
    }
}

impl Required {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow_whitespace(mut self) -> Self {
        self.allow_whitespace = true;
        self
    }
}

impl Validator<str> for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        let text = if self.allow_whitespace {
            value
        } else {
            value.trim()
        };
        ValidationResult::check(!text.is_empty(), || {
            ValidationError::new(ERROR_CODE_REQUIRED, self.message.as_ref())
        })
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// At least `min` characters, counted as Unicode scalar values. Spaces count.
#[derive(Debug, Clone)]
pub struct MinLength {
    pub min: usize,
    message: Message,
}

impl MinLength {
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self {
            min,
            message: Cow::Borrowed("Must be at least {min} characters"),
        }
    }
}

impl Validator<str> for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        let len = value.chars().count();
        ValidationResult::check(len >= self.min, || {
            ValidationError::new(ERROR_CODE_MIN_LENGTH, self.message.as_ref())
                .with_param("min", self.min)
                .with_param("actual", len)
        })
    }

    fn message(&self) -> &str {
        &self.message
    }
}

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Z0-9_'+\-.]*)[A-Z0-9_+-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$").ok()
});

/// An email address: no leading dot or `..` in the local part, and a domain
/// ending in a TLD of two or more letters.
#[derive(Debug, Clone)]
pub struct Email {
    message: Message,
}

impl Default for Email {
    fn default() -> Self {
        Self {
            message: Cow::Borrowed("Invalid email"),
        }
    }
}

impl Email {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(value: &str) -> bool {
        !value.starts_with('.')
            && !value.contains("..")
            && EMAIL_PATTERN
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(value))
    }
}

impl Validator<str> for Email {
    fn validate(&self, value: &str) -> ValidationResult {
        ValidationResult::check(Self::matches(value), || {
            ValidationError::new(ERROR_CODE_EMAIL, self.message.as_ref())
                .with_param("validation", "email")
        })
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Text that parses as a finite number no smaller than `min`. Surrounding
/// whitespace is ignored; anything unparsable fails.
#[derive(Debug, Clone)]
pub struct MinValue {
    pub min: f64,
    message: Message,
}

impl MinValue {
    #[must_use]
    pub fn new(min: f64) -> Self {
        Self {
            min,
            message: Cow::Borrowed("Must be at least {min}"),
        }
    }
}

impl Validator<str> for MinValue {
    fn validate(&self, value: &str) -> ValidationResult {
        let text = value.trim();
        let ok = text
            .parse::<f64>()
            .is_ok_and(|n| n.is_finite() && n >= self.min);
        ValidationResult::check(ok, || {
            ValidationError::new(ERROR_CODE_MIN_VALUE, self.message.as_ref())
                .with_param("min", self.min)
                .with_param("actual", text)
        })
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// An `Option` must be `Some`. The default message reads
/// `Expected <type>, received null`.
#[derive(Debug, Clone)]
pub struct Present {
    message: Message,
}

impl Present {
    #[must_use]
    pub fn new(expected: &str) -> Self {
        Self {
            message: Cow::Owned(format!("Expected {expected}, received null")),
        }
    }
}

impl<T: Send + Sync> Validator<Option<T>> for Present {
    fn validate(&self, value: &Option<T>) -> ValidationResult {
        ValidationResult::check(value.is_some(), || {
            ValidationError::new(ERROR_CODE_INVALID_TYPE, self.message.as_ref())
                .with_param("received", "null")
        })
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// A list with at least `min` entries.
#[derive(Debug, Clone)]
pub struct MinItems {
    pub min: usize,
    message: Message,
}

impl MinItems {
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self {
            min,
            message: Cow::Borrowed("Must contain at least {min} element(s)"),
        }
    }
}

impl<E: Send + Sync> Validator<[E]> for MinItems {
    fn validate(&self, value: &[E]) -> ValidationResult {
        ValidationResult::check(value.len() >= self.min, || {
            ValidationError::new(ERROR_CODE_MIN_VALUE, self.message.as_ref())
                .with_param("min", self.min)
                .with_param("actual", value.len())
        })
    }

    fn message(&self) -> &str {
        &self.message
    }
}
