//! Typed values produced by symbolic acquisitions and assignments.

use crate::error::{CoreError, CoreResult};
use serde::{Serialize, Serializer};
use std::fmt;

/// Declared kind of a symbolic variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Kind {
    /// Byte string, encoded as `s`
    #[default]
    Sequence,
    /// Signed 32-bit integer, encoded as `i`
    Integer,
}

impl Kind {
    /// Grammar letter for this kind
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Sequence => 's',
            Self::Integer => 'i',
        }
    }

    /// Parse a grammar letter
    ///
    /// # Errors
    ///
    /// Returns `Decoding` for anything other than `s` or `i`
    pub fn from_letter(letter: &str) -> CoreResult<Self> {
        match letter {
            "s" => Ok(Self::Sequence),
            "i" => Ok(Self::Integer),
            other => Err(CoreError::decoding(format!(
                "invalid assignment kind '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A concrete value held by an assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Raw byte string
    Bytes(Vec<u8>),
    /// Signed 32-bit integer
    Int(i32),
}

impl Value {
    /// Kind of this value
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bytes(_) => Kind::Sequence,
            Self::Int(_) => Kind::Integer,
        }
    }

    /// Borrow the bytes of a sequence value
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Int(_) => None,
        }
    }

    /// Integer payload, if any
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Bytes(_) => None,
        }
    }

    /// Interpret this value as an integer.
    ///
    /// Byte strings are accepted when they hold decimal text, so
    /// hand-written assignments like `x=42` replay as integers.
    ///
    /// # Errors
    ///
    /// Returns `Decoding` if the bytes are not a decimal `i32`
    pub fn to_int(&self) -> CoreResult<i32> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Bytes(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.trim().parse::<i32>().ok())
                .ok_or_else(|| {
                    CoreError::decoding(format!(
                        "value '{}' is not an integer",
                        String::from_utf8_lossy(bytes)
                    ))
                }),
        }
    }

    /// Interpret this value as a byte string; integers render as decimal text
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Int(v) => v.to_string().into_bytes(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Bytes(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => write!(f, "{:?}", s),
                Err(_) => write!(f, "0x{}", hex::encode(bytes)),
            },
        }
    }
}

/// JSON form of a byte string that is not UTF-8
#[derive(Serialize)]
struct HexBytes {
    hex: String,
}

/// UTF-8 byte strings serialize as plain strings, integers as numbers and
/// any other bytes as `{"hex": "..."}`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_i32(*v),
            Self::Bytes(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => serializer.serialize_str(s),
                Err(_) => HexBytes {
                    hex: hex::encode(bytes),
                }
                .serialize(serializer),
            },
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Bytes(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}
