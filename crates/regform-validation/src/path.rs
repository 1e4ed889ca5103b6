#![forbid(unsafe_code)]

//! Dotted field paths such as `address.city` or `hobbies.0.name`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved path for errors not tied to a single field.
pub const ROOT: &str = "root";

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// A named member (`address`, `city`).
    Key(String),
    /// A position inside an array (`0`).
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A path to a value inside a form model.
///
/// Parsed from dotted notation; all-digit segments become indices.
///
/// ```
/// use regform_validation::path::{FieldPath, Segment};
///
/// let path = FieldPath::parse("hobbies.2.name");
/// assert_eq!(path.segments()[1], Segment::Index(2));
/// assert_eq!(path.to_string(), "hobbies.2.name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse dotted notation. Empty segments are skipped.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let segments = s
            .split('.')
            .filter(|part| !part.is_empty())
            .map(|part| match part.parse::<usize>() {
                Ok(i) if part.bytes().all(|b| b.is_ascii_digit()) => Segment::Index(i),
                _ => Segment::Key(part.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// The reserved root-error path.
    #[must_use]
    pub fn root() -> Self {
        Self::parse(ROOT)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::Key(k)] if k == ROOT)
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// True if `prefix` is this path or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// The array index directly under `array`, if this path lives there.
    #[must_use]
    pub fn index_under(&self, array: &FieldPath) -> Option<usize> {
        if !self.starts_with(array) {
            return None;
        }
        match self.segments.get(array.segments.len()) {
            Some(Segment::Index(i)) => Some(*i),
            _ => None,
        }
    }

    /// Rewrite this path after entry `removed` of `array` was removed.
    ///
    /// Paths under the removed entry yield `None`. Paths under later entries
    /// shift down by one. Everything else is returned unchanged.
    #[must_use]
    pub fn after_removal(&self, array: &FieldPath, removed: usize) -> Option<FieldPath> {
        match self.index_under(array) {
            Some(i) if i == removed => None,
            Some(i) if i > removed => {
                let mut shifted = self.clone();
                shifted.segments[array.segments.len()] = Segment::Index(i - 1);
                Some(shifted)
            }
            _ => Some(self.clone()),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(p: &FieldPath) -> Self {
        p.clone()
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let p = FieldPath::parse("address.city");
        assert_eq!(
            p.segments(),
            &[Segment::Key("address".into()), Segment::Key("city".into())]
        );
        assert_eq!(p.to_string(), "address.city");
        assert_eq!(FieldPath::parse("a..b").to_string(), "a.b");
        assert!(FieldPath::parse("").is_empty());
    }

    #[test]
    fn signed_numbers_stay_keys() {
        let p = FieldPath::parse("a.+1");
        assert_eq!(p.segments()[1], Segment::Key("+1".into()));
    }

    #[test]
    fn root_path() {
        assert!(FieldPath::root().is_root());
        assert!(!FieldPath::parse("root.x").is_root());
    }

    #[test]
    fn builder_matches_parse() {
        let built = FieldPath::parse("hobbies").index(1).key("name");
        assert_eq!(built, FieldPath::parse("hobbies.1.name"));
    }

    #[test]
    fn index_under_array() {
        let arr = FieldPath::parse("hobbies");
        assert_eq!(FieldPath::parse("hobbies.3.name").index_under(&arr), Some(3));
        assert_eq!(FieldPath::parse("hobbies").index_under(&arr), None);
        assert_eq!(FieldPath::parse("email").index_under(&arr), None);
    }

    #[test]
    fn after_removal_reindexes() {
        let arr = FieldPath::parse("hobbies");
        assert_eq!(FieldPath::parse("hobbies.1.name").after_removal(&arr, 1), None);
        assert_eq!(
            FieldPath::parse("hobbies.2.name").after_removal(&arr, 1),
            Some(FieldPath::parse("hobbies.1.name"))
        );
        assert_eq!(
            FieldPath::parse("hobbies.0.name").after_removal(&arr, 1),
            Some(FieldPath::parse("hobbies.0.name"))
        );
        assert_eq!(
            FieldPath::parse("hobbies").after_removal(&arr, 0),
            Some(FieldPath::parse("hobbies"))
        );
    }

    #[test]
    fn serializes_as_string() {
        let p = FieldPath::parse("hobbies.0.name");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"hobbies.0.name\"");
        let back: FieldPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
