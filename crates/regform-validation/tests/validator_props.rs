//! Property tests for validators and error maps.

use proptest::prelude::*;
use regform_validation::{
    Email, FieldError, FieldErrors, FieldPath, MinLength, MinValue, Required, Validator,
};

proptest! {
    /// MinLength(1) fails only for the empty string.
    #[test]
    fn min_length_one_fails_only_on_empty(s in "\\PC{0,12}") {
        prop_assert_eq!(MinLength::new(1).validate(s.as_str()).is_valid(), !s.is_empty());
    }

    /// Required with whitespace allowed behaves like MinLength(1).
    #[test]
    fn required_allowing_whitespace_matches_min_length(s in "[ \\ta-z]{0,6}") {
        prop_assert_eq!(
            Required::new().allow_whitespace().validate(s.as_str()).is_valid(),
            MinLength::new(1).validate(s.as_str()).is_valid()
        );
    }

    /// Integers at or above the threshold pass, below fail.
    #[test]
    fn min_value_threshold(n in -1000i64..1000) {
        let v = MinValue::new(18.0);
        prop_assert_eq!(v.validate(n.to_string().as_str()).is_valid(), n >= 18);
    }

    /// Generated well-formed addresses are accepted.
    #[test]
    fn email_accepts_generated(
        local in "[a-z0-9][a-z0-9_+-]{0,8}",
        domain in "[a-z0-9][a-z0-9-]{0,8}",
        tld in "[a-z]{2,6}",
    ) {
        let addr = format!("{local}@{domain}.{tld}");
        prop_assert!(Email::new().validate(addr.as_str()).is_valid(), "{}", addr);
    }

    /// Strings without an `@` are never emails.
    #[test]
    fn email_rejects_without_at(s in "[^@]{0,20}") {
        prop_assert!(Email::new().validate(s.as_str()).is_invalid());
    }

    /// Removing an array entry never leaves an error at an index past the new end.
    #[test]
    fn reindex_keeps_indices_in_bounds(
        len in 1usize..8,
        failing in proptest::collection::vec(any::<bool>(), 8),
        remove in 0usize..8,
    ) {
        prop_assume!(remove < len);
        let array = FieldPath::parse("hobbies");
        let mut errors = FieldErrors::new();
        for (i, fails) in failing.iter().take(len).enumerate() {
            if *fails {
                errors.insert(array.clone().index(i).key("name"), FieldError::manual(format!("e{i}")));
            }
        }
        errors.reindex_after_removal(&array, remove);
        for path in errors.paths() {
            let idx = path.index_under(&array);
            prop_assert!(idx.is_some_and(|i| i < len - 1));
        }
        let expected = failing
            .iter()
            .take(len)
            .enumerate()
            .filter(|(i, f)| **f && *i != remove)
            .count();
        prop_assert_eq!(errors.len(), expected);
    }
}
