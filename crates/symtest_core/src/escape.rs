//! Unescaping of operator-supplied assignment values.
//!
//! Values given on the command line are escaped byte strings
//! (`"a\x00b\n"`). Recognized escapes: `\\ \' \" \a \b \f \n \r \t \v`,
//! `\xHH`, octal `\o`..`\ooo` and backslash-newline (dropped). Any other
//! escape is kept verbatim.

use crate::error::{CoreError, CoreResult};

/// Unescape an escaped byte string
///
/// # Errors
///
/// Returns `Decoding` on a malformed `\x` escape or a trailing backslash
pub fn unescape(escaped: &str) -> CoreResult<Vec<u8>> {
    let input = escaped.as_bytes();
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte != b'\\' {
            out.push(byte);
            i += 1;
            continue;
        }

        let Some(&next) = input.get(i + 1) else {
            return Err(CoreError::decoding("trailing backslash in escaped value"));
        };
        i += 2;

        match next {
            b'\\' => out.push(b'\\'),
            b'\'' => out.push(b'\''),
            b'"' => out.push(b'"'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0b),
            b'\n' => {}
            b'x' => {
                let digits = input
                    .get(i..i + 2)
                    .filter(|d| d.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|d| std::str::from_utf8(d).ok())
                    .and_then(|d| u8::from_str_radix(d, 16).ok())
                    .ok_or_else(|| {
                        CoreError::decoding(format!("invalid \\x escape at offset {}", i - 2))
                    })?;
                out.push(digits);
                i += 2;
            }
            b'0'..=b'7' => {
                let mut value = u32::from(next - b'0');
                let mut taken = 1;
                while taken < 3 {
                    match input.get(i) {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            i += 1;
                            taken += 1;
                        }
                        _ => break,
                    }
                }
                // \400 and above wrap like a byte store
                out.push((value & 0xff) as u8);
            }
            other => {
                out.push(b'\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_passthrough() {
        assert_eq!(unescape("hello").unwrap(), b"hello".to_vec());
        assert_eq!(unescape("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape(r"a\nb\tc").unwrap(), b"a\nb\tc".to_vec());
        assert_eq!(unescape(r"\\").unwrap(), b"\\".to_vec());
        assert_eq!(unescape(r#"\'\""#).unwrap(), b"'\"".to_vec());
        assert_eq!(unescape(r"\a\b\f\v\r").unwrap(), vec![7, 8, 12, 11, 13]);
    }

    #[test]
    fn test_hex_escape() {
        assert_eq!(unescape(r"\x00\x2a\xFF").unwrap(), vec![0x00, 0x2a, 0xff]);
        assert!(unescape(r"\x4").is_err());
        assert!(unescape(r"\xzz").is_err());
        assert!(unescape(r"\x+f").is_err());
    }

    #[test]
    fn test_octal_escape() {
        assert_eq!(unescape(r"\0").unwrap(), vec![0]);
        assert_eq!(unescape(r"\101").unwrap(), b"A".to_vec());
        assert_eq!(unescape(r"\1018").unwrap(), b"A8".to_vec());
    }

    #[test]
    fn test_unknown_escape_kept() {
        assert_eq!(unescape(r"\q").unwrap(), b"\\q".to_vec());
    }

    #[test]
    fn test_trailing_backslash() {
        let err = unescape("abc\\").unwrap_err();
        assert_eq!(err.kind_name(), "DecodingError");
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(unescape("a\\\nb").unwrap(), b"ab".to_vec());
    }
}
