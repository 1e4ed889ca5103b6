#![forbid(unsafe_code)]

//! Whole-model validation.
//!
//! A [`Resolver`] turns a complete form model into a [`FieldErrors`] map.
//! [`Schema`] is the stock implementation: an ordered list of rules, each
//! reading one part of the model and running a [`Validator`] over it.
//!
//! ```
//! use regform_validation::{FieldPath, MinLength, Resolver, Schema};
//!
//! struct Login { user: String }
//!
//! let schema = Schema::<Login>::new()
//!     .field("user", |m| m.user.as_str(), MinLength::new(1).with_message("User is required"));
//!
//! let errors = schema.resolve(&Login { user: String::new() });
//! assert_eq!(errors.message(&FieldPath::parse("user")), Some("User is required"));
//! ```

use std::fmt;

use crate::errors::{FieldError, FieldErrors};
use crate::path::FieldPath;
use crate::validators::{ValidationResult, Validator};

/// Validates a whole model at once.
pub trait Resolver<T: ?Sized>: Send + Sync {
    /// Validate `values`, returning every failing path.
    fn resolve(&self, values: &T) -> FieldErrors;

    /// Validate `values` and keep only errors at or under `path`.
    fn resolve_path(&self, values: &T, path: &FieldPath) -> FieldErrors {
        self.resolve(values).under(path)
    }
}

impl<T: ?Sized, F> Resolver<T> for F
where
    F: Fn(&T) -> FieldErrors + Send + Sync,
{
    fn resolve(&self, values: &T) -> FieldErrors {
        self(values)
    }
}

type Rule<T> = Box<dyn Fn(&T, &mut FieldErrors) + Send + Sync>;

fn record(errors: &mut FieldErrors, path: FieldPath, result: ValidationResult) {
    if let ValidationResult::Invalid(err) = result {
        errors.insert(path, FieldError::from(err));
    }
}

/// An ordered rule set over a model type.
///
/// Rules run in insertion order. The first failure per path is kept.
pub struct Schema<T: ?Sized> {
    rules: Vec<Rule<T>>,
}

impl<T: ?Sized> Default for Schema<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T: ?Sized + 'static> Schema<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a value reached by `get` at `path`.
    #[must_use]
    pub fn field<V, G, R>(mut self, path: &str, get: G, validator: R) -> Self
    where
        V: ?Sized + 'static,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        R: Validator<V> + 'static,
    {
        let path = FieldPath::parse(path);
        self.rules.push(Box::new(move |values, errors| {
            record(errors, path.clone(), validator.validate(get(values)));
        }));
        self
    }

    /// Validate a field of every element of the array reached by `items`.
    ///
    /// Errors land at `<array>.<index>.<member>`.
    #[must_use]
    pub fn each<E, V, G, H, R>(
        mut self,
        array: &str,
        items: G,
        member: &str,
        get: H,
        validator: R,
    ) -> Self
    where
        E: 'static,
        V: ?Sized + 'static,
        G: Fn(&T) -> &[E] + Send + Sync + 'static,
        H: Fn(&E) -> &V + Send + Sync + 'static,
        R: Validator<V> + 'static,
    {
        let array = FieldPath::parse(array);
        let member = member.to_string();
        self.rules.push(Box::new(move |values, errors| {
            for (i, item) in items(values).iter().enumerate() {
                let path = array.clone().index(i).key(member.as_str());
                record(errors, path, validator.validate(get(item)));
            }
        }));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T: ?Sized> Resolver<T> for Schema<T> {
    fn resolve(&self, values: &T) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for rule in &self.rules {
            rule(values, &mut errors);
        }
        errors
    }
}

impl<T: ?Sized> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("rules", &format!("[{} rules]", self.rules.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{Email, MinItems, MinLength, Required};

    struct Item {
        name: String,
    }

    struct Model {
        email: String,
        items: Vec<Item>,
    }

    fn schema() -> Schema<Model> {
        Schema::new()
            .field("email", |m: &Model| m.email.as_str(), Email::new())
            .field(
                "email",
                |m: &Model| m.email.as_str(),
                Required::new().with_message("never shown"),
            )
            .each(
                "items",
                |m: &Model| m.items.as_slice(),
                "name",
                |i: &Item| i.name.as_str(),
                MinLength::new(1).with_message("Name is required"),
            )
            .field(
                "items",
                |m: &Model| m.items.as_slice(),
                MinItems::new(1).with_message("Need one"),
            )
    }

    #[test]
    fn first_rule_per_path_wins() {
        let errs = schema().resolve(&Model {
            email: String::new(),
            items: vec![],
        });
        assert_eq!(errs.message(&"email".into()), Some("Invalid email"));
        assert_eq!(errs.message(&"items".into()), Some("Need one"));
    }

    #[test]
    fn each_indexes_paths() {
        let errs = schema().resolve(&Model {
            email: "a@b.co".into(),
            items: vec![
                Item { name: "x".into() },
                Item {
                    name: String::new(),
                },
            ],
        });
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.message(&"items.1.name".into()), Some("Name is required"));
    }

    #[test]
    fn resolve_path_filters() {
        let model = Model {
            email: String::new(),
            items: vec![Item {
                name: String::new(),
            }],
        };
        let s = schema();
        let only = s.resolve_path(&model, &"items".into());
        assert_eq!(only.len(), 1);
        assert!(only.contains(&"items.0.name".into()));
    }

    #[test]
    fn closures_are_resolvers() {
        let resolver = |m: &Model| {
            let mut e = FieldErrors::new();
            if m.items.is_empty() {
                e.insert(FieldPath::root(), FieldError::manual("empty"));
            }
            e
        };
        let errs = resolver.resolve(&Model {
            email: String::new(),
            items: vec![],
        });
        assert_eq!(errs.message(&FieldPath::root()), Some("empty"));
    }
}
