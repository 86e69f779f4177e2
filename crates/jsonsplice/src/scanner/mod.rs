//! Scanner: validating skipper and path locator over borrowed JSON text.
//!
//! What it does
//! - [`skip_one`] consumes exactly one value and reports its byte span, kind
//!   and whether a string span contains escapes. Literals, number grammar,
//!   string escapes, control characters and nesting depth are all checked.
//! - [`Children`] walks one layer of an array or object, yielding key and
//!   value spans, and remembers where the closing delimiter is.
//! - [`locate`] follows a path from a position without materialising any
//!   intermediate value.
//!
//! Invariants
//! - Every position handed out is a byte offset into the scanned `&str` and
//!   lies on a char boundary (all delimiters are ASCII).
//! - Containers are skipped with an explicit stack, so deep input never grows
//!   the call stack; depth is bounded by `max_depth` instead.
//! - Nothing here allocates except the closer stack and unescaped keys.
use alloc::{borrow::Cow, vec::Vec};

use bstr::ByteSlice;

use crate::{
    Error, PathSegment, ValueType,
    error::{ErrorCode, ScanError},
    escape::unescape,
    options::DEFAULT_MAX_DEPTH,
};


/// Bytes that end a run of plain string content.
const STRING_SPECIAL: &[u8] = b"\"\\\x00\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f\x10\x11\x12\x13\x14\x15\x16\x17\x18\x19\x1a\x1b\x1c\x1d\x1e\x1f";

#[inline]
pub(crate) fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Returns the first non-blank position at or after `pos`.
#[inline]
pub(crate) fn skip_blank(src: &[u8], mut pos: usize) -> usize {
    while pos < src.len() && is_blank(src[pos]) {
        pos += 1;
    }
    pos
}

/// `s` without leading and trailing JSON blanks.
pub(crate) fn trim_blank(s: &str) -> &str {
    s.trim_matches([' ', '\t', '\n', '\r'])
}

/// The exact text of one value: `src[start..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) kind: ValueType,
    /// Only meaningful for strings.
    pub(crate) escaped: bool,
}

/// An object member key, including its quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeySpan {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) escaped: bool,
}

impl KeySpan {
    pub(crate) fn text<'s>(&self, src: &'s str) -> Result<Cow<'s, str>, ScanError> {
        let body = &src[self.start + 1..self.end - 1];
        if !self.escaped {
            return Ok(Cow::Borrowed(body));
        }
        unescape(body).map_err(|mut e| {
            e.pos += self.start + 1;
            e
        })
    }

    pub(crate) fn matches(&self, src: &str, want: &str) -> Result<bool, ScanError> {
        Ok(self.text(src)? == want)
    }
}

/// One member of an array (no key) or object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Child {
    pub(crate) key: Option<KeySpan>,
    pub(crate) value: Span,
}

impl Child {
    /// Where the member begins: its key for objects, its value for arrays.
    pub(crate) fn start(&self) -> usize {
        self.key.map_or(self.value.start, |k| k.start)
    }
}

/// Consumes a string starting at the opening quote `src[start]`.
///
/// Returns the position after the closing quote and whether any escape
/// sequence was seen.
pub(crate) fn scan_string(src: &[u8], start: usize) -> Result<(usize, bool), ScanError> {
    let mut i = start + 1;
    let mut escaped = false;
    loop {
        let Some(off) = src[i..].find_byteset(STRING_SPECIAL) else {
            return Err(ScanError::new(ErrorCode::Eof, src.len()));
        };
        i += off;
        match src[i] {
            b'"' => return Ok((i + 1, escaped)),
            b'\\' => {
                escaped = true;
                match src.get(i + 1) {
                    None => return Err(ScanError::new(ErrorCode::Eof, src.len())),
                    Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => i += 2,
                    Some(b'u') => {
                        for k in i + 2..i + 6 {
                            match src.get(k) {
                                None => return Err(ScanError::new(ErrorCode::Eof, src.len())),
                                Some(h) if h.is_ascii_hexdigit() => {}
                                Some(_) => return Err(ScanError::new(ErrorCode::InvalidEscape, k)),
                            }
                        }
                        i += 6;
                    }
                    Some(_) => return Err(ScanError::new(ErrorCode::InvalidEscape, i)),
                }
            }
            _ => return Err(ScanError::new(ErrorCode::ControlChar, i)),
        }
    }
}

fn scan_digits(src: &[u8], mut i: usize) -> usize {
    while src.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}

/// Consumes a number following the JSON grammar and returns its end.
pub(crate) fn scan_number(src: &[u8], start: usize) -> Result<usize, ScanError> {
    let mut i = start;
    if src.get(i) == Some(&b'-') {
        i += 1;
    }
    match src.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i = scan_digits(src, i + 1),
        None => return Err(ScanError::new(ErrorCode::Eof, src.len())),
        Some(_) => return Err(ScanError::new(ErrorCode::InvalidNumber, i)),
    }
    if src.get(i) == Some(&b'.') {
        let frac = scan_digits(src, i + 1);
        if frac == i + 1 {
            return Err(ScanError::new(ErrorCode::InvalidNumber, frac));
        }
        i = frac;
    }
    if matches!(src.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(src.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp = scan_digits(src, i);
        if exp == i {
            return Err(ScanError::new(ErrorCode::InvalidNumber, i));
        }
        i = exp;
    }
    Ok(i)
}

fn scan_literal(src: &[u8], start: usize, word: &[u8]) -> Result<usize, ScanError> {
    for (k, &w) in word.iter().enumerate() {
        match src.get(start + k) {
            None => return Err(ScanError::new(ErrorCode::Eof, src.len())),
            Some(&c) if c == w => {}
            Some(_) => return Err(ScanError::new(ErrorCode::InvalidLiteral, start + k)),
        }
    }
    Ok(start + word.len())
}

/// Consumes a non-container value at `start` (no leading blanks).
fn scan_scalar(src: &[u8], start: usize) -> Result<Span, ScanError> {
    let Some(&c) = src.get(start) else {
        return Err(ScanError::new(ErrorCode::Eof, src.len()));
    };
    let (end, kind, escaped) = match c {
        b'"' => {
            let (end, escaped) = scan_string(src, start)?;
            (end, ValueType::String, escaped)
        }
        b'-' | b'0'..=b'9' => (scan_number(src, start)?, ValueType::Number, false),
        b't' => (scan_literal(src, start, b"true")?, ValueType::True, false),
        b'f' => (scan_literal(src, start, b"false")?, ValueType::False, false),
        b'n' => (scan_literal(src, start, b"null")?, ValueType::Null, false),
        _ => return Err(ScanError::new(ErrorCode::InvalidChar, start)),
    };
    Ok(Span {
        start,
        end,
        kind,
        escaped,
    })
}

/// Consumes `"key"` and the following `:`; returns the position after the
/// colon.
fn object_key(src: &[u8], pos: usize) -> Result<(KeySpan, usize), ScanError> {
    let start = skip_blank(src, pos);
    match src.get(start) {
        Some(b'"') => {}
        None => return Err(ScanError::new(ErrorCode::Eof, src.len())),
        Some(_) => return Err(ScanError::new(ErrorCode::InvalidChar, start)),
    }
    let (end, escaped) = scan_string(src, start)?;
    let colon = skip_blank(src, end);
    match src.get(colon) {
        Some(b':') => Ok((
            KeySpan {
                start,
                end,
                escaped,
            },
            colon + 1,
        )),
        None => Err(ScanError::new(ErrorCode::Eof, src.len())),
        Some(_) => Err(ScanError::new(ErrorCode::InvalidChar, colon)),
    }
}

const fn closer_of(open: u8) -> u8 {
    if open == b'[' { b']' } else { b'}' }
}

/// Skips one value starting at `pos` (leading blanks are skipped).
///
/// `depth` is the nesting level the value sits at; a container found here
/// occupies level `depth + 1`.
pub(crate) fn skip_one(
    src: &str,
    pos: usize,
    depth: usize,
    max_depth: usize,
) -> Result<Span, ScanError> {
    let b = src.as_bytes();
    let start = skip_blank(b, pos);
    match b.get(start) {
        Some(b'[' | b'{') => skip_container(b, start, depth, max_depth),
        _ => scan_scalar(b, start),
    }
}

fn skip_container(
    b: &[u8],
    start: usize,
    depth: usize,
    max_depth: usize,
) -> Result<Span, ScanError> {
    let kind = if b[start] == b'[' {
        ValueType::Array
    } else {
        ValueType::Object
    };
    let mut closers: Vec<u8> = Vec::new();
    let mut i = start;
    loop {
        i = skip_blank(b, i);
        match b.get(i) {
            Some(&open @ (b'[' | b'{')) => {
                if depth + closers.len() + 1 > max_depth {
                    return Err(ScanError::new(ErrorCode::RecurseExceedMax, i));
                }
                let closer = closer_of(open);
                closers.push(closer);
                i = skip_blank(b, i + 1);
                match b.get(i) {
                    None => return Err(ScanError::new(ErrorCode::Eof, b.len())),
                    Some(&c) if c == closer => {
                        closers.pop();
                        i += 1;
                    }
                    Some(_) => {
                        if closer == b'}' {
                            i = object_key(b, i)?.1;
                        }
                        continue;
                    }
                }
            }
            _ => i = scan_scalar(b, i)?.end,
        }

        // A value just ended; close containers until one expects another member.
        loop {
            let Some(&closer) = closers.last() else {
                return Ok(Span {
                    start,
                    end: i,
                    kind,
                    escaped: false,
                });
            };
            i = skip_blank(b, i);
            match b.get(i) {
                None => return Err(ScanError::new(ErrorCode::Eof, b.len())),
                Some(b',') => {
                    i += 1;
                    if closer == b'}' {
                        i = object_key(b, i)?.1;
                    }
                    break;
                }
                Some(&c) if c == closer => {
                    closers.pop();
                    i += 1;
                }
                Some(_) => return Err(ScanError::new(ErrorCode::InvalidChar, i)),
            }
        }
    }
}

/// Walks the direct members of the container opening at `open`.
pub(crate) struct Children<'s> {
    src: &'s str,
    pos: usize,
    closer: u8,
    depth: usize,
    max_depth: usize,
    first: bool,
    close: Option<usize>,
}

impl<'s> Children<'s> {
    /// `src[open]` must be `[` or `{`; `depth` is the level of the container's
    /// parent.
    pub(crate) fn new(
        src: &'s str,
        open: usize,
        depth: usize,
        max_depth: usize,
    ) -> Result<Self, ScanError> {
        if depth + 1 > max_depth {
            return Err(ScanError::new(ErrorCode::RecurseExceedMax, open));
        }
        Ok(Self {
            src,
            pos: open + 1,
            closer: closer_of(src.as_bytes()[open]),
            depth: depth + 1,
            max_depth,
            first: true,
            close: None,
        })
    }

    pub(crate) fn next_child(&mut self) -> Result<Option<Child>, ScanError> {
        if self.close.is_some() {
            return Ok(None);
        }
        let b = self.src.as_bytes();
        let mut i = skip_blank(b, self.pos);
        match b.get(i) {
            None => return Err(ScanError::new(ErrorCode::Eof, b.len())),
            Some(&c) if c == self.closer => {
                self.close = Some(i);
                return Ok(None);
            }
            Some(b',') if !self.first => i += 1,
            Some(_) if self.first => {}
            Some(_) => return Err(ScanError::new(ErrorCode::InvalidChar, i)),
        }
        self.first = false;
        let key = if self.closer == b'}' {
            let (key, after) = object_key(b, i)?;
            i = after;
            Some(key)
        } else {
            None
        };
        let value = skip_one(self.src, i, self.depth, self.max_depth)?;
        self.pos = value.end;
        Ok(Some(Child { key, value }))
    }

    /// Consumes the remaining members and returns the closing delimiter's
    /// position.
    pub(crate) fn close_pos(&mut self) -> Result<usize, ScanError> {
        while self.next_child()?.is_some() {}
        self.close
            .ok_or(ScanError::new(ErrorCode::Eof, self.src.len()))
    }
}

/// The target of a successful [`locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Located {
    /// The member's key quote for object members, else the value start.
    pub(crate) key_start: usize,
    pub(crate) value: Span,
}

/// Follows `path` from the value at `pos`.
///
/// A missing member fails with [`ErrorCode::NotFound`] positioned at the
/// closing delimiter of the container lacking it, `segment` naming the path
/// index.
pub(crate) fn locate(
    src: &str,
    pos: usize,
    path: &[PathSegment<'_>],
    max_depth: usize,
) -> Result<Located, ScanError> {
    let b = src.as_bytes();
    let mut cur = skip_blank(b, pos);
    let mut key_start = cur;
    for (depth, seg) in path.iter().enumerate() {
        let open = skip_blank(b, cur);
        let Some(&c) = b.get(open) else {
            return Err(ScanError::new(ErrorCode::Eof, b.len()));
        };
        match (c, seg) {
            (b'{', PathSegment::Key(want)) => {
                let mut children = Children::new(src, open, depth, max_depth)?;
                loop {
                    let Some(child) = children.next_child()? else {
                        return Err(ScanError::not_found(children.close_pos()?, depth));
                    };
                    let Some(key) = child.key else { continue };
                    if key.matches(src, want)? {
                        key_start = key.start;
                        cur = child.value.start;
                        break;
                    }
                }
            }
            (b'[', PathSegment::Index(want)) => {
                let mut children = Children::new(src, open, depth, max_depth)?;
                let mut n = 0;
                loop {
                    let Some(child) = children.next_child()? else {
                        return Err(ScanError::not_found(children.close_pos()?, depth));
                    };
                    if n == *want {
                        key_start = child.value.start;
                        cur = child.value.start;
                        break;
                    }
                    n += 1;
                }
            }
            (b'{' | b'[' | b'"' | b'-' | b'0'..=b'9' | b't' | b'f' | b'n', _) => {
                return Err(ScanError::new(ErrorCode::UnsupportedType, open));
            }
            _ => return Err(ScanError::new(ErrorCode::InvalidChar, open)),
        }
    }
    let value = skip_one(src, cur, path.len(), max_depth)?;
    if path.is_empty() {
        key_start = value.start;
    }
    Ok(Located { key_start, value })
}

/// Skips one value and requires only blanks after it.
pub(crate) fn validate_document(src: &str, max_depth: usize) -> Result<Span, ScanError> {
    let span = skip_one(src, 0, 0, max_depth)?;
    let rest = skip_blank(src.as_bytes(), span.end);
    if rest != src.len() {
        return Err(ScanError::new(ErrorCode::InvalidChar, rest));
    }
    Ok(span)
}

/// Skips the JSON value starting at `*pos` (after any blanks), leaving `*pos`
/// just past it. Returns the value's start.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed text and
/// [`Error::RecurseExceedMax`] for nesting deeper than the default bound.
///
/// ```rust
/// let json = r#" [1, {"a": 2}] "tail""#;
/// let mut pos = 0;
/// assert_eq!(jsonsplice::skip(json, &mut pos).unwrap(), 1);
/// assert_eq!(&json[pos..], r#" "tail""#);
/// ```
pub fn skip(json: &str, pos: &mut usize) -> Result<usize, Error> {
    let span = skip_one(json, *pos, 0, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(json))?;
    *pos = span.end;
    Ok(span.start)
}

/// Whether `json` holds exactly one well-formed value, optionally surrounded
/// by blanks.
#[must_use]
pub fn is_valid(json: &str) -> bool {
    validate_document(json, DEFAULT_MAX_DEPTH).is_ok()
}

/// Finds the value at `path` and returns its byte range and kind.
///
/// # Errors
///
/// [`Error::NotExist`] when a member is missing, [`Error::UnsupportedType`]
/// when a segment does not fit the container, [`Error::Syntax`] for
/// malformed text on the way.
pub fn locate_span(
    json: &str,
    path: &[PathSegment<'_>],
) -> Result<(usize, usize, ValueType), Error> {
    let found = locate(json, 0, path, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(json))?;
    Ok((found.value.start, found.value.end, found.value.kind))
}
