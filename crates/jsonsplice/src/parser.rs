//! A cursor over a JSON buffer.
use crate::{
    Error, PathSegment, Value,
    error::ScanError,
    options::ParserOptions,
    scanner::{Located, locate, skip_one},
};

/// A position in a borrowed JSON buffer from which values are skipped or
/// looked up.
///
/// Parsers are `Copy` and cheap to make; use one per read.
///
/// ```rust
/// use jsonsplice::Parser;
///
/// let mut parser = Parser::new(r#" 1 [2] {"a":3}"#);
/// assert_eq!(parser.parse().unwrap().raw().unwrap(), "1");
/// assert_eq!(parser.parse().unwrap().raw().unwrap(), "[2]");
/// assert_eq!(parser.pos(), 6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    src: &'a str,
    pos: usize,
    options: ParserOptions,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self::with_options(src, ParserOptions::default())
    }

    #[must_use]
    pub fn with_options(src: &'a str, options: ParserOptions) -> Self {
        Self {
            src,
            pos: 0,
            options,
        }
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Moves the cursor back to the start of the buffer.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Reads the value at the cursor and moves past it.
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`] for malformed text, [`Error::RecurseExceedMax`] for
    /// nesting deeper than [`ParserOptions::max_depth`].
    pub fn parse(&mut self) -> Result<Value<'a>, Error> {
        let span = skip_one(self.src, self.pos, 0, self.options.max_depth)
            .map_err(|e| self.error(e))?;
        self.pos = span.end;
        Ok(Value::from_span(self.src, span))
    }

    /// Moves past the value at the cursor and returns where it started.
    ///
    /// # Errors
    ///
    /// As [`parse`](Self::parse).
    pub fn skip(&mut self) -> Result<usize, Error> {
        let span = skip_one(self.src, self.pos, 0, self.options.max_depth)
            .map_err(|e| self.error(e))?;
        self.pos = span.end;
        Ok(span.start)
    }

    /// Looks up `path` inside the value at the cursor and moves past the
    /// target.
    ///
    /// # Errors
    ///
    /// [`Error::NotExist`] when a member is missing,
    /// [`Error::UnsupportedType`] when a segment does not fit its container,
    /// plus the errors of [`parse`](Self::parse).
    pub fn get_by_path(&mut self, path: &[PathSegment<'_>]) -> Result<Value<'a>, Error> {
        let found = self.locate(path).map_err(|e| {
            tracing::trace!(code = ?e.code, pos = e.pos, depth = path.len(), "path lookup failed");
            self.error(e)
        })?;
        self.pos = found.value.end;
        Ok(Value::from_span(self.src, found.value))
    }

    pub(crate) fn locate(&self, path: &[PathSegment<'_>]) -> Result<Located, ScanError> {
        locate(self.src, self.pos, path, self.options.max_depth)
    }

    pub(crate) fn error(&self, err: ScanError) -> Error {
        err.into_error(self.src)
    }
}
