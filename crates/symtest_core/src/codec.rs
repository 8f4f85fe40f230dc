//! Assignment-name codec.
//!
//! A raw assignment name has the form `base ( '.' kind ( '#' hint )? )?`
//! where `kind` is `s` (byte string, the default) or `i` (4-byte
//! little-endian signed integer) and `hint` is an opaque token the engine
//! uses to keep otherwise identical names apart.

use crate::error::{CoreError, CoreResult};
use crate::value::{Kind, Value};
use std::fmt;

/// Width of an encoded integer value
pub const INT_WIDTH: usize = 4;

/// A parsed assignment name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignmentName {
    /// Variable name as seen by the test body
    pub base: String,
    /// Declared kind
    pub kind: Kind,
    /// Disambiguating hint, ignored when decoding values
    pub hint: Option<String>,
}

impl AssignmentName {
    /// Create a name with no hint
    #[must_use]
    pub fn new(base: impl Into<String>, kind: Kind) -> Self {
        Self {
            base: base.into(),
            kind,
            hint: None,
        }
    }

    /// Attach a hint
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Parse a raw name
    ///
    /// # Errors
    ///
    /// Returns `Decoding` when a kind segment is present but is not `s` or `i`
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let Some((base, rest)) = raw.split_once('.') else {
            return Ok(Self::new(raw, Kind::Sequence));
        };

        let (letter, hint) = match rest.split_once('#') {
            Some((letter, hint)) => (letter, Some(hint.to_string())),
            None => (rest, None),
        };

        let kind = Kind::from_letter(letter).map_err(|_| {
            CoreError::decoding(format!("invalid kind '{}' in assignment name '{}'", letter, raw))
        })?;

        Ok(Self {
            base: base.to_string(),
            kind,
            hint,
        })
    }

    /// Decode a raw value according to this name's kind
    ///
    /// # Errors
    ///
    /// See [`decode_value`]
    pub fn decode(&self, raw: &[u8]) -> CoreResult<Value> {
        decode_value(self.kind, raw)
    }
}

impl fmt::Display for AssignmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.base, self.kind)?;
        if let Some(hint) = &self.hint {
            write!(f, "#{}", hint)?;
        }
        Ok(())
    }
}

/// Build a raw assignment name.
///
/// With neither kind nor hint the bare base name is returned, which
/// decodes as a byte string. `base` must not contain `.`.
#[must_use]
pub fn encode_name(base: &str, kind: Option<Kind>, hint: Option<&str>) -> String {
    match (kind, hint) {
        (None, None) => base.to_string(),
        (kind, hint) => {
            let mut name = AssignmentName::new(base, kind.unwrap_or_default());
            name.hint = hint.map(str::to_string);
            name.to_string()
        }
    }
}

/// Parse a raw assignment name into its base name and kind
///
/// # Errors
///
/// Returns `Decoding` on a malformed kind
pub fn decode_name(raw: &str) -> CoreResult<(String, Kind)> {
    let name = AssignmentName::parse(raw)?;
    Ok((name.base, name.kind))
}

/// Decode raw value bytes for a kind
///
/// # Errors
///
/// Returns `Decoding` if an integer value is not exactly four bytes
pub fn decode_value(kind: Kind, raw: &[u8]) -> CoreResult<Value> {
    match kind {
        Kind::Sequence => Ok(Value::Bytes(raw.to_vec())),
        Kind::Integer => {
            let bytes: [u8; INT_WIDTH] = raw.try_into().map_err(|_| {
                CoreError::decoding(format!(
                    "integer value must be {} bytes, got {}",
                    INT_WIDTH,
                    raw.len()
                ))
            })?;
            Ok(Value::Int(i32::from_le_bytes(bytes)))
        }
    }
}

/// Encode a value into its raw byte form
#[must_use]
pub fn encode_value(value: &Value) -> Vec<u8> {
    match value {
        Value::Bytes(bytes) => bytes.clone(),
        Value::Int(v) => v.to_le_bytes().to_vec(),
    }
}

/// Decode one raw `(name, bytes)` entry into `(base, value)`
///
/// # Errors
///
/// Returns `Decoding` on a malformed name or value
pub fn decode_entry(raw_name: &str, raw_value: &[u8]) -> CoreResult<(String, Value)> {
    let name = AssignmentName::parse(raw_name)?;
    let value = name.decode(raw_value)?;
    Ok((name.base, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_bare_name() {
        let name = AssignmentName::parse("path").unwrap();
        assert_eq!(name.base, "path");
        assert_eq!(name.kind, Kind::Sequence);
        assert_eq!(name.hint, None);
    }

    #[test]
    fn test_parse_with_kind_and_hint() {
        let name = AssignmentName::parse("count.i#3").unwrap();
        assert_eq!(name.base, "count");
        assert_eq!(name.kind, Kind::Integer);
        assert_eq!(name.hint.as_deref(), Some("3"));
    }

    #[test]
    fn test_parse_bad_kind() {
        let err = AssignmentName::parse("count.q").unwrap_err();
        assert_eq!(err.kind_name(), "DecodingError");
        assert!(decode_name("count.").is_err());
        assert!(decode_name("count.q#1").is_err());
    }

    #[test]
    fn test_encode_name_forms() {
        assert_eq!(encode_name("x", None, None), "x");
        assert_eq!(encode_name("x", Some(Kind::Integer), None), "x.i");
        assert_eq!(encode_name("x", Some(Kind::Integer), Some("7")), "x.i#7");
        assert_eq!(encode_name("x", None, Some("a1")), "x.s#a1");
    }

    #[test]
    fn test_decode_int_value() {
        assert_eq!(decode_value(Kind::Integer, &42i32.to_le_bytes()).unwrap(), Value::Int(42));
        assert_eq!(
            decode_value(Kind::Integer, &[0xff, 0xff, 0xff, 0xff]).unwrap(),
            Value::Int(-1)
        );
    }

    #[test]
    fn test_decode_int_wrong_width() {
        assert!(decode_value(Kind::Integer, &[1, 2, 3]).is_err());
        assert!(decode_value(Kind::Integer, &[1, 2, 3, 4, 5]).is_err());
        assert!(decode_value(Kind::Integer, &[]).is_err());
    }

    #[test]
    fn test_decode_entry() {
        let (base, value) = decode_entry("n.i#0", &[7, 0, 0, 0]).unwrap();
        assert_eq!(base, "n");
        assert_eq!(value, Value::Int(7));

        let (base, value) = decode_entry("s", b"hello").unwrap();
        assert_eq!(base, "s");
        assert_eq!(value, Value::from("hello"));
    }

    #[test]
    fn test_encode_value() {
        assert_eq!(encode_value(&Value::Int(1)), vec![1, 0, 0, 0]);
        assert_eq!(encode_value(&Value::from("ab")), b"ab".to_vec());
    }

    fn kind_strategy() -> impl Strategy<Value = Option<Kind>> {
        prop_oneof![
            Just(None),
            Just(Some(Kind::Sequence)),
            Just(Some(Kind::Integer)),
        ]
    }

    proptest::proptest! {
        #[test]
        fn prop_name_roundtrip(
            base in "[A-Za-z0-9_]{0,12}",
            kind in kind_strategy(),
            hint in proptest::option::of("[A-Za-z0-9_]{1,8}")
        ) {
            let encoded = encode_name(&base, kind, hint.as_deref());
            let (decoded_base, decoded_kind) = decode_name(&encoded).unwrap();
            prop_assert_eq!(decoded_base, base);
            prop_assert_eq!(decoded_kind, kind.unwrap_or_default());
        }

        #[test]
        fn prop_int_value_is_little_endian(bytes in proptest::array::uniform4(any::<u8>())) {
            let value = decode_value(Kind::Integer, &bytes).unwrap();
            prop_assert_eq!(value, Value::Int(i32::from_le_bytes(bytes)));
        }

        #[test]
        fn prop_sequence_value_is_identity(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let value = decode_value(Kind::Sequence, &bytes).unwrap();
            prop_assert_eq!(value, Value::Bytes(bytes));
        }
    }
}
