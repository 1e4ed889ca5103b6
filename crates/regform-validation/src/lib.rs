#![forbid(unsafe_code)]

//! Field validation for the registration form.
//!
//! [`Validator`] rules check single values. [`FieldPath`] and [`FieldErrors`]
//! address failures inside a model, and [`Schema`] runs a list of rules
//! through the [`Resolver`] seam.
//!
//! ```rust
//! use regform_validation::{MinLength, Validator};
//!
//! let name = MinLength::new(1).with_message("First Name is required");
//! assert!(name.validate("Jane").is_valid());
//! assert_eq!(
//!     name.validate("").error_message().as_deref(),
//!     Some("First Name is required")
//! );
//! ```

pub mod errors;
pub mod path;
pub mod resolver;
mod validators;

pub use errors::{FieldError, FieldErrors};
pub use path::{FieldPath, ROOT, Segment};
pub use resolver::{Resolver, Schema};
pub use validators::{
    ERROR_CODE_EMAIL, ERROR_CODE_INVALID_TYPE, ERROR_CODE_MIN_LENGTH, ERROR_CODE_MIN_VALUE,
    ERROR_CODE_REQUIRED, Email, MinItems, MinLength, MinValue, Present, Required,
    ValidationError, ValidationResult, Validator,
};
