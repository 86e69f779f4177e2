use alloc::{
    format,
    string::{String, ToString},
};
use thiserror::Error;

/// Bytes of context shown on either side of a syntax error position.
const SNIPPET_RADIUS: usize = 16;

/// Errors returned by lookups, casts and mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("value not exists")]
    NotExist,
    #[error("unsupported type")]
    UnsupportedType,
    /// The path segment at `index` addresses an array slot that does not
    /// exist and appending was not allowed.
    #[error("index out of range at path segment {index}")]
    IndexOutOfRange { index: usize },
    #[error("recursion depth exceeds the maximum")]
    RecurseExceedMax,
}

/// Malformed JSON text, with a window of the text around the offending byte.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error at index {pos}: {msg}\n\n\t{snippet}\n\t{marker}\n")]
pub struct SyntaxError {
    pos: usize,
    msg: String,
    snippet: String,
    marker: String,
}

impl SyntaxError {
    /// Builds an error for `src` at byte offset `pos`.
    pub(crate) fn new(src: &str, pos: usize, msg: impl Into<String>) -> Self {
        let pos = pos.min(src.len());
        let mut lo = pos.saturating_sub(SNIPPET_RADIUS);
        while !src.is_char_boundary(lo) {
            lo -= 1;
        }
        let mut hi = (pos + SNIPPET_RADIUS).min(src.len());
        while !src.is_char_boundary(hi) {
            hi += 1;
        }
        let snippet = src[lo..hi].to_string();
        let mut at = pos;
        while !src.is_char_boundary(at) {
            at -= 1;
        }
        // Marks count characters, not bytes.
        let mut marker = ".".repeat(src[lo..at].chars().count());
        marker.push('^');
        marker.push_str(&".".repeat(src[at..hi].chars().count().saturating_sub(1)));
        Self {
            pos,
            msg: msg.into(),
            snippet,
            marker,
        }
    }

    /// Byte offset of the error within the scanned text.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Short description of what went wrong.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// The text surrounding [`pos`](Self::pos).
    #[must_use]
    pub fn snippet(&self) -> &str {
        &self.snippet
    }
}

/// Failure kinds produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    Eof,
    InvalidChar,
    InvalidLiteral,
    InvalidNumber,
    InvalidEscape,
    ControlChar,
    NotFound,
    UnsupportedType,
    RecurseExceedMax,
}

impl ErrorCode {
    fn message(self) -> &'static str {
        match self {
            ErrorCode::Eof => "unexpected end of input",
            ErrorCode::InvalidChar => "invalid character",
            ErrorCode::InvalidLiteral => "invalid literal",
            ErrorCode::InvalidNumber => "invalid number",
            ErrorCode::InvalidEscape => "invalid escape sequence",
            ErrorCode::ControlChar => "control character in string",
            ErrorCode::NotFound => "value not exists",
            ErrorCode::UnsupportedType => "unsupported type",
            ErrorCode::RecurseExceedMax => "recursion depth exceeds the maximum",
        }
    }
}

/// A scanner failure, positioned in the text that was being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub(crate) code: ErrorCode,
    pub(crate) pos: usize,
    /// For [`ErrorCode::NotFound`], the index of the path segment that was
    /// missing.
    pub(crate) segment: usize,
}

impl ScanError {
    pub(crate) fn new(code: ErrorCode, pos: usize) -> Self {
        Self {
            code,
            pos,
            segment: 0,
        }
    }

    pub(crate) fn not_found(pos: usize, segment: usize) -> Self {
        Self {
            code: ErrorCode::NotFound,
            pos,
            segment,
        }
    }

    /// Converts into the public error, rendering a snippet of `src`.
    pub(crate) fn into_error(self, src: &str) -> Error {
        match self.code {
            ErrorCode::NotFound => Error::NotExist,
            ErrorCode::UnsupportedType => Error::UnsupportedType,
            ErrorCode::RecurseExceedMax => Error::RecurseExceedMax,
            ErrorCode::InvalidChar => {
                let msg = match src.get(self.pos..).and_then(|rest| rest.chars().next()) {
                    Some(c) => format!("invalid character '{c}'"),
                    None => ErrorCode::Eof.message().to_string(),
                };
                Error::Syntax(SyntaxError::new(src, self.pos, msg))
            }
            code => Error::Syntax(SyntaxError::new(src, self.pos, code.message())),
        }
    }
}
