//! Quoting and unquoting of JSON string literals.
//!
//! [`quote`] produces the shortest conventional escaping: `"`, `\`, newline,
//! carriage return and tab use their two-character forms, every other control
//! character becomes `\u00XX`. [`unquote`] accepts everything JSON allows,
//! including surrogate pairs. An unpaired surrogate decodes to U+FFFD.
use alloc::{borrow::Cow, string::String};

use crate::error::{Error, ErrorCode, ScanError};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Returns `s` as a quoted JSON string literal.
///
/// ```rust
/// assert_eq!(jsonsplice::escape::quote("a\"b\n"), r#""a\"b\n""#);
/// ```
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    write_quoted(s, &mut out);
    out
}

/// Appends `s` to `out` as a quoted JSON string literal.
pub fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    let mut last = 0;
    for (i, b) in s.bytes().enumerate() {
        let short = match b {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x00..=0x1f => "",
            _ => continue,
        };
        out.push_str(&s[last..i]);
        if short.is_empty() {
            out.push_str("\\u00");
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0xf)]));
        } else {
            out.push_str(short);
        }
        last = i + 1;
    }
    out.push_str(&s[last..]);
    out.push('"');
}

/// Decodes the body of a JSON string literal (the text between the quotes).
///
/// Borrows from `body` when it contains no escape sequences.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for a malformed escape sequence.
///
/// ```rust
/// use jsonsplice::escape::unquote;
///
/// assert_eq!(unquote(r"plain").unwrap(), "plain");
/// assert_eq!(unquote(r"\ud83d\ude00 \u00e9").unwrap(), "\u{1F600} é");
/// assert!(unquote(r"\x").is_err());
/// ```
pub fn unquote(body: &str) -> Result<Cow<'_, str>, Error> {
    unescape(body).map_err(|e| e.into_error(body))
}

pub(crate) fn unescape(body: &str) -> Result<Cow<'_, str>, ScanError> {
    let Some(first) = body.find('\\') else {
        return Ok(Cow::Borrowed(body));
    };
    let bytes = body.as_bytes();
    let mut out = String::with_capacity(body.len());
    out.push_str(&body[..first]);
    let mut i = first;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            let next = body[i..].find('\\').map_or(bytes.len(), |n| i + n);
            out.push_str(&body[i..next]);
            i = next;
            continue;
        }
        let Some(&esc) = bytes.get(i + 1) else {
            return Err(ScanError::new(ErrorCode::Eof, bytes.len()));
        };
        let simple = match esc {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let (c, used) = decode_unicode(body, i)?;
                out.push(c);
                i += used;
                continue;
            }
            _ => return Err(ScanError::new(ErrorCode::InvalidEscape, i)),
        };
        out.push(simple);
        i += 2;
    }
    Ok(Cow::Owned(out))
}

/// Decodes `\uXXXX` at `at`, joining a following low surrogate escape.
/// Returns the character and the number of bytes consumed.
fn decode_unicode(body: &str, at: usize) -> Result<(char, usize), ScanError> {
    let hi = hex4(body, at + 2)?;
    if !(0xD800..0xDC00).contains(&hi) {
        return Ok((char::from_u32(hi).unwrap_or(char::REPLACEMENT_CHARACTER), 6));
    }
    let rest = &body.as_bytes()[at + 6..];
    if rest.len() >= 6 && rest[0] == b'\\' && rest[1] == b'u' {
        let lo = hex4(body, at + 8)?;
        if (0xDC00..0xE000).contains(&lo) {
            let c = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
            return Ok((char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER), 12));
        }
    }
    Ok((char::REPLACEMENT_CHARACTER, 6))
}

fn hex4(body: &str, at: usize) -> Result<u32, ScanError> {
    let digits = body
        .as_bytes()
        .get(at..at + 4)
        .ok_or(ScanError::new(ErrorCode::Eof, body.len()))?;
    let mut v = 0u32;
    for (k, &d) in digits.iter().enumerate() {
        let n = char::from(d)
            .to_digit(16)
            .ok_or(ScanError::new(ErrorCode::InvalidEscape, at + k))?;
        v = (v << 4) | n;
    }
    Ok(v)
}
