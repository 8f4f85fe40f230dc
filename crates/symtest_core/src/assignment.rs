//! Concrete assignments of symbolic variables.

use crate::codec::decode_entry;
use crate::error::CoreResult;
use crate::escape::unescape;
use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Mapping from variable base name to concrete value.
///
/// Insertion order is kept so snapshots in reports read the same way
/// the engine wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Assignment {
    values: IndexMap<String, Value>,
}

impl Assignment {
    /// Create an empty assignment (replay with defaults)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode raw `(encoded name, raw bytes)` entries as stored by the engine
    ///
    /// # Errors
    ///
    /// Returns `Decoding` on the first malformed entry
    pub fn from_raw_entries<'a, I>(entries: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        let mut assignment = Self::new();
        for (name, raw) in entries {
            let (base, value) = decode_entry(name, raw)?;
            assignment.insert(base, value);
        }
        Ok(assignment)
    }

    /// Build an assignment from operator overrides of `(name, escaped value)`
    ///
    /// # Errors
    ///
    /// Returns `Decoding` on a malformed escape, name or value
    pub fn from_overrides<I, N, V>(overrides: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut assignment = Self::new();
        for (name, escaped) in overrides {
            let raw = unescape(escaped.as_ref())?;
            let (base, value) = decode_entry(name.as_ref(), &raw)?;
            assignment.insert(base, value);
        }
        Ok(assignment)
    }

    /// Set a value, replacing any previous one for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check whether a name is assigned
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of assigned names
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check for an empty assignment
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut assignment = Self::new();
        for (name, value) in iter {
            assignment.insert(name, value);
        }
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_entries() {
        let raw: Vec<(&str, &[u8])> = vec![
            ("x.i#0", &[42u8, 0, 0, 0][..]),
            ("name.s", &b"bob"[..]),
            ("plain", &b"\x01\x02"[..]),
        ];
        let assignment = Assignment::from_raw_entries(raw).unwrap();
        assert_eq!(assignment.len(), 3);
        assert_eq!(assignment.get("x"), Some(&Value::Int(42)));
        assert_eq!(assignment.get("name"), Some(&Value::from("bob")));
        assert_eq!(assignment.get("plain"), Some(&Value::Bytes(vec![1, 2])));
    }

    #[test]
    fn test_from_raw_entries_rejects_bad_kind() {
        let raw: Vec<(&str, &[u8])> = vec![("x.z", &b"1"[..])];
        let err = Assignment::from_raw_entries(raw).unwrap_err();
        assert_eq!(err.kind_name(), "DecodingError");
    }

    #[test]
    fn test_from_overrides_unescapes() {
        let assignment =
            Assignment::from_overrides([("s", r"a\x00b"), ("n.i", r"\x05\x00\x00\x00")]).unwrap();
        assert_eq!(assignment.get("s"), Some(&Value::Bytes(b"a\0b".to_vec())));
        assert_eq!(assignment.get("n"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_later_entry_wins() {
        let assignment: Assignment = [("x", 1i32), ("x", 2i32)].into_iter().collect();
        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment.get("x"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_display() {
        let mut assignment = Assignment::new();
        assert_eq!(assignment.to_string(), "{}");
        assignment.insert("x", 42);
        assignment.insert("s", "hi");
        assert_eq!(assignment.to_string(), "{x: 42, s: \"hi\"}");
    }

    #[test]
    fn test_serialize_in_order() {
        let assignment: Assignment = [("b", Value::Int(1)), ("a", Value::from("z"))]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&assignment).unwrap(), r#"{"b":1,"a":"z"}"#);
    }
}
