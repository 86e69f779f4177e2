//! The lazy JSON [`Value`] and its kinds.
//!
//! A `Value` is a view of the exact text of one JSON value, tagged with its
//! [`ValueType`]. Nothing is decoded until a cast asks for it, and children are
//! found by scanning the text on demand.
use alloc::{
    borrow::Cow,
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};
use core::{fmt, ops::Deref};

use crate::{
    Error, PathSegment, base64,
    error::{ErrorCode, ScanError, SyntaxError},
    escape::{quote, unescape, write_quoted},
    options::DEFAULT_MAX_DEPTH,
    scanner::{Children, Span, locate, scan_number, skip_blank, trim_blank, validate_document},
};

/// The kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueType {
    /// No value: the result of a lookup that found nothing.
    #[default]
    None,
    /// A failed operation; the value carries the [`Error`].
    Error,
    Null,
    True,
    False,
    Array,
    Object,
    String,
    Number,
}

impl ValueType {
    /// The kind a JSON value starting with `b` would have.
    pub(crate) fn from_leading_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'n' => Self::Null,
            b't' => Self::True,
            b'f' => Self::False,
            b'[' => Self::Array,
            b'{' => Self::Object,
            b'"' => Self::String,
            b'-' | b'0'..=b'9' => Self::Number,
            _ => return None,
        })
    }
}

/// A JSON value held as text.
///
/// `Value<'a>` either borrows the text from a caller buffer (see
/// [`Value::new`]) or holds a span of a shared, reference-counted buffer (see
/// [`Value::from_owned`] and every mutation). Children found by navigation
/// point into the same text as their parent, so a lookup result does not
/// borrow the value it came from.
/// Failed lookups produce a `Value` of kind [`ValueType::Error`]; navigating
/// further from it keeps returning the same error, so a chain of lookups only
/// needs checking once at the end.
///
/// # Examples
///
/// ```
/// use jsonsplice::{Value, path};
///
/// let doc = Value::new(r#"{"user": {"name": "Ada", "tags": ["x", "y"]}}"#);
/// assert_eq!(doc.get("user").get("name").as_str().unwrap(), "Ada");
/// assert_eq!(doc.get_by_path(&path!["user", "tags", 1]).raw().unwrap(), r#""y""#);
/// assert!(doc.get("nope").get("deeper").check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Value<'a> {
    pub(crate) repr: Repr<'a>,
}

#[derive(Debug, Clone, Default)]
pub(crate) enum Repr<'a> {
    #[default]
    Empty,
    Invalid(Error),
    Json {
        raw: Text<'a>,
        kind: ValueType,
        /// Whether a string contains escapes; `None` until the text has been
        /// validated.
        escaped: Option<bool>,
    },
}

/// The text behind a [`Value`]: a caller's buffer, or a range of a shared one.
#[derive(Clone)]
pub(crate) enum Text<'a> {
    Borrowed(&'a str),
    Shared {
        buf: Arc<str>,
        start: usize,
        end: usize,
    },
}

impl<'a> Text<'a> {
    pub(crate) fn owned(text: String) -> Self {
        let end = text.len();
        Self::Shared {
            buf: Arc::from(text),
            start: 0,
            end,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            Self::Borrowed(s) => *s,
            Self::Shared { buf, start, end } => &buf[*start..*end],
        }
    }

    /// The bytes `start..end` of this text, sharing its storage.
    pub(crate) fn slice(&self, start: usize, end: usize) -> Self {
        match self {
            Self::Borrowed(s) => Self::Borrowed(&s[start..end]),
            Self::Shared { buf, start: base, .. } => Self::Shared {
                buf: Arc::clone(buf),
                start: base + start,
                end: base + end,
            },
        }
    }

    fn into_static(self) -> Text<'static> {
        match self {
            Self::Borrowed(s) => Text::owned(s.into()),
            Self::Shared { buf, start, end } => Text::Shared { buf, start, end },
        }
    }
}

impl Deref for Text<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for Text<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<'a> Value<'a> {
    /// Wraps `json` without validating it.
    ///
    /// Only the first non-blank byte is inspected to decide the kind; the rest
    /// is checked when it is read. Blank input or an impossible first byte
    /// yields an [`ValueType::Error`] value.
    #[must_use]
    pub fn new(json: &'a str) -> Self {
        Self::lazy(Text::Borrowed(json))
    }

    /// Validates that `json` is exactly one value, optionally surrounded by
    /// blanks, and wraps it.
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`] for malformed text, [`Error::RecurseExceedMax`] for
    /// nesting deeper than the default bound.
    pub fn parse(json: &'a str) -> Result<Self, Error> {
        let span = validate_document(json, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(json))?;
        Ok(Self::json(Text::Borrowed(json), span.kind, Some(span.escaped)))
    }

    /// Wraps validated number text.
    #[must_use]
    pub fn from_number(text: &'a str) -> Self {
        match scan_number(text.as_bytes(), 0) {
            Ok(end) if end == text.len() => {
                Self::json(Text::Borrowed(text), ValueType::Number, Some(false))
            }
            Ok(end) => {
                Self::from_error(ScanError::new(ErrorCode::InvalidChar, end).into_error(text))
            }
            Err(e) => Self::from_error(e.into_error(text)),
        }
    }

    pub(crate) fn lazy(raw: Text<'a>) -> Self {
        let at = skip_blank(raw.as_bytes(), 0);
        let leading = raw.as_bytes().get(at).copied();
        match leading.map(ValueType::from_leading_byte) {
            Some(Some(kind)) => Self::json(raw, kind, None),
            Some(None) => {
                Self::from_error(ScanError::new(ErrorCode::InvalidChar, at).into_error(&raw))
            }
            None => Self::from_error(ScanError::new(ErrorCode::Eof, at).into_error(&raw)),
        }
    }

    pub(crate) fn json(raw: Text<'a>, kind: ValueType, escaped: Option<bool>) -> Self {
        Self {
            repr: Repr::Json { raw, kind, escaped },
        }
    }

    /// A child found by the scanner inside `src`.
    pub(crate) fn from_span(src: &'a str, span: Span) -> Self {
        Self::json(
            Text::Borrowed(&src[span.start..span.end]),
            span.kind,
            Some(span.escaped),
        )
    }

    /// A child of this value; `span` is relative to [`raw`](Self::raw).
    pub(crate) fn child(&self, span: Span) -> Self {
        match &self.repr {
            Repr::Json { raw, .. } => Self::json(
                raw.slice(span.start, span.end),
                span.kind,
                Some(span.escaped),
            ),
            _ => Self::default(),
        }
    }

    pub(crate) fn from_error(err: Error) -> Self {
        Self {
            repr: Repr::Invalid(err),
        }
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match &self.repr {
            Repr::Empty => ValueType::None,
            Repr::Invalid(_) => ValueType::Error,
            Repr::Json { kind, .. } => *kind,
        }
    }

    /// `true` unless the value is [`ValueType::None`] or [`ValueType::Error`].
    #[must_use]
    pub fn exists(&self) -> bool {
        matches!(self.repr, Repr::Json { .. })
    }

    /// `true` unless the value is [`ValueType::Error`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !matches!(self.repr, Repr::Invalid(_))
    }

    /// # Errors
    ///
    /// [`Error::NotExist`] for a [`ValueType::None`] value, the carried error
    /// for a [`ValueType::Error`] value.
    pub fn check(&self) -> Result<(), Error> {
        self.parts().map(|_| ())
    }

    /// The carried error of a [`ValueType::Error`] value.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match &self.repr {
            Repr::Invalid(e) => Some(e),
            _ => None,
        }
    }

    /// The JSON text, including any blanks a root value was created with.
    ///
    /// # Errors
    ///
    /// See [`check`](Self::check).
    pub fn raw(&self) -> Result<&str, Error> {
        self.parts().map(|(raw, _, _)| raw)
    }

    /// Whether the text is borrowed from a caller buffer rather than held in a
    /// shared one.
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(
            self.repr,
            Repr::Json {
                raw: Text::Borrowed(_),
                ..
            }
        )
    }

    /// Detaches the value from the buffer it borrows. Text that is already
    /// shared is kept as is.
    #[must_use]
    pub fn into_owned(self) -> Value<'static> {
        Value {
            repr: match self.repr {
                Repr::Empty => Repr::Empty,
                Repr::Invalid(e) => Repr::Invalid(e),
                Repr::Json { raw, kind, escaped } => Repr::Json {
                    raw: raw.into_static(),
                    kind,
                    escaped,
                },
            },
        }
    }

    pub(crate) fn parts(&self) -> Result<(&str, ValueType, Option<bool>), Error> {
        match &self.repr {
            Repr::Empty => Err(Error::NotExist),
            Repr::Invalid(e) => Err(e.clone()),
            Repr::Json { raw, kind, escaped } => Ok((raw.as_str(), *kind, *escaped)),
        }
    }

    /// The raw text and opening delimiter of a container of kind `want`.
    pub(crate) fn container(&self, want: ValueType) -> Result<(&str, usize), Error> {
        let (raw, kind, _) = self.parts()?;
        if kind != want {
            return Err(Error::UnsupportedType);
        }
        Ok((raw, skip_blank(raw.as_bytes(), 0)))
    }

    /// Exact text, kind and escape flag of a scalar accepted by `want`,
    /// validating text that has not been scanned yet.
    fn scalar(&self, want: fn(ValueType) -> bool) -> Result<(&str, ValueType, bool), Error> {
        let (raw, kind, escaped) = self.parts()?;
        if !want(kind) {
            return Err(Error::UnsupportedType);
        }
        match escaped {
            Some(escaped) => Ok((trim_blank(raw), kind, escaped)),
            None => {
                let span =
                    validate_document(raw, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(raw))?;
                Ok((&raw[span.start..span.end], kind, span.escaped))
            }
        }
    }

    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is `true` or `false`.
    pub fn as_bool(&self) -> Result<bool, Error> {
        let (_, kind, _) = self.scalar(|k| matches!(k, ValueType::True | ValueType::False))?;
        Ok(kind == ValueType::True)
    }

    /// The number text, exactly as written.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is a number.
    pub fn as_number(&self) -> Result<&str, Error> {
        self.scalar(|k| k == ValueType::Number).map(|(text, _, _)| text)
    }

    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is a number,
    /// [`Error::Syntax`] when it is not an integer in range.
    pub fn as_i64(&self) -> Result<i64, Error> {
        let text = self.as_number()?;
        text.parse()
            .map_err(|e: core::num::ParseIntError| SyntaxError::new(text, 0, e.to_string()).into())
    }

    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is a number,
    /// [`Error::Syntax`] when it is not a non-negative integer in range.
    pub fn as_u64(&self) -> Result<u64, Error> {
        let text = self.as_number()?;
        text.parse()
            .map_err(|e: core::num::ParseIntError| SyntaxError::new(text, 0, e.to_string()).into())
    }

    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is a number,
    /// [`Error::Syntax`] when it overflows `f64`.
    pub fn as_f64(&self) -> Result<f64, Error> {
        let text = self.as_number()?;
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(SyntaxError::new(text, 0, "number out of range").into()),
            Err(e) => Err(SyntaxError::new(text, 0, e.to_string()).into()),
        }
    }

    /// The decoded string. Borrows when the text has no escapes.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is a string.
    pub fn as_str(&self) -> Result<Cow<'_, str>, Error> {
        let (text, _, escaped) = self.scalar(|k| k == ValueType::String)?;
        let body = &text[1..text.len() - 1];
        if !escaped {
            return Ok(Cow::Borrowed(body));
        }
        unescape(body).map_err(|e| e.into_error(body))
    }

    /// Decodes a base64 string value.
    ///
    /// # Errors
    ///
    /// As [`as_str`](Self::as_str), plus [`Error::Syntax`] for invalid base64.
    pub fn as_base64_bytes(&self) -> Result<Vec<u8>, Error> {
        base64::decode(&self.as_str()?)
    }

    /// Number of direct children of an array or object.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] for scalars, [`Error::Syntax`] for malformed
    /// children.
    pub fn len(&self) -> Result<usize, Error> {
        let (raw, kind, _) = self.parts()?;
        if !matches!(kind, ValueType::Array | ValueType::Object) {
            return Err(Error::UnsupportedType);
        }
        let open = skip_blank(raw.as_bytes(), 0);
        let mut children =
            Children::new(raw, open, 0, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(raw))?;
        let mut n = 0;
        while children.next_child().map_err(|e| e.into_error(raw))?.is_some() {
            n += 1;
        }
        Ok(n)
    }

    /// Whether an array or object has no children.
    ///
    /// # Errors
    ///
    /// As [`len`](Self::len).
    pub fn is_empty(&self) -> Result<bool, Error> {
        let (raw, kind, _) = self.parts()?;
        if !matches!(kind, ValueType::Array | ValueType::Object) {
            return Err(Error::UnsupportedType);
        }
        let open = skip_blank(raw.as_bytes(), 0);
        let mut children =
            Children::new(raw, open, 0, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(raw))?;
        Ok(children.next_child().map_err(|e| e.into_error(raw))?.is_none())
    }

    /// The member `key` of an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Self {
        self.get_by_path(&[PathSegment::Key(Cow::Borrowed(key))])
    }

    /// The element at `index` of an array.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.get_by_path(&[PathSegment::Index(index)])
    }

    /// Follows `path` without decoding anything on the way.
    ///
    /// An empty path returns this value. Lookup failures are returned as
    /// [`ValueType::Error`] values: [`Error::NotExist`] for a missing member,
    /// [`Error::UnsupportedType`] when a segment does not fit the container.
    #[must_use]
    pub fn get_by_path(&self, path: &[PathSegment<'_>]) -> Self {
        let (raw, kind) = match &self.repr {
            Repr::Json { raw, kind, .. } if !path.is_empty() => (raw.as_str(), *kind),
            _ => return self.clone(),
        };
        let fits = match &path[0] {
            PathSegment::Key(_) => kind == ValueType::Object,
            PathSegment::Index(_) => kind == ValueType::Array,
        };
        if !fits {
            return Self::from_error(Error::UnsupportedType);
        }
        match locate(raw, 0, path, DEFAULT_MAX_DEPTH) {
            Ok(found) => self.child(found.value),
            Err(e) => Self::from_error(e.into_error(raw)),
        }
    }
}

impl Value<'static> {
    /// Wraps owned text without validating it; see [`Value::new`].
    #[must_use]
    pub fn from_owned(json: String) -> Self {
        Self::lazy(Text::owned(json))
    }

    /// Copies `json` into an owned value; see [`Value::new`].
    #[must_use]
    pub fn copied(json: &str) -> Self {
        Self::lazy(Text::owned(json.into()))
    }

    #[must_use]
    pub fn null() -> Self {
        Self::json(Text::Borrowed("null"), ValueType::Null, Some(false))
    }

    #[must_use]
    pub fn from_bool(v: bool) -> Self {
        if v {
            Self::json(Text::Borrowed("true"), ValueType::True, Some(false))
        } else {
            Self::json(Text::Borrowed("false"), ValueType::False, Some(false))
        }
    }

    #[must_use]
    pub fn from_i64(v: i64) -> Self {
        Self::json(Text::owned(v.to_string()), ValueType::Number, Some(false))
    }

    #[must_use]
    pub fn from_u64(v: u64) -> Self {
        Self::json(Text::owned(v.to_string()), ValueType::Number, Some(false))
    }

    /// A number value; NaN and infinities give an [`Error::UnsupportedType`]
    /// error value.
    #[must_use]
    pub fn from_f64(v: f64) -> Self {
        if !v.is_finite() {
            return Self::from_error(Error::UnsupportedType);
        }
        Self::json(Text::owned(v.to_string()), ValueType::Number, Some(false))
    }

    /// A string value holding `s`, quoted and escaped.
    #[must_use]
    pub fn from_str_value(s: &str) -> Self {
        let quoted = quote(s);
        let escaped = quoted.len() > s.len() + 2;
        Self::json(Text::owned(quoted), ValueType::String, Some(escaped))
    }

    /// A string value holding `bytes` in base64.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_str_value(&base64::encode(bytes))
    }

    /// An array of `elems`, in order. Any invalid element makes the result an
    /// error value.
    #[must_use]
    pub fn from_elems(elems: &[Value<'_>]) -> Self {
        let mut out = String::from("[");
        for (i, elem) in elems.iter().enumerate() {
            let text = match elem.raw() {
                Ok(text) => trim_blank(text),
                Err(e) => return Self::from_error(e),
            };
            if i > 0 {
                out.push(',');
            }
            out.push_str(text);
        }
        out.push(']');
        Self::json(Text::owned(out), ValueType::Array, None)
    }

    /// An object of `pairs`, in order. Any invalid member value makes the
    /// result an error value.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, Value<'_>)]) -> Self {
        let mut out = String::from("{");
        for (i, (key, value)) in pairs.iter().enumerate() {
            let text = match value.raw() {
                Ok(text) => trim_blank(text),
                Err(e) => return Self::from_error(e),
            };
            if i > 0 {
                out.push(',');
            }
            write_quoted(key, &mut out);
            out.push(':');
            out.push_str(text);
        }
        out.push('}');
        Self::json(Text::owned(out), ValueType::Object, None)
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Empty, Repr::Empty) => true,
            (Repr::Invalid(a), Repr::Invalid(b)) => a == b,
            (
                Repr::Json { raw: a, kind: ka, .. },
                Repr::Json { raw: b, kind: kb, .. },
            ) => ka == kb && a == b,
            _ => false,
        }
    }
}

/// Writes the JSON text; a [`ValueType::None`] value writes nothing and an
/// error value writes its error.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Empty => Ok(()),
            Repr::Invalid(e) => write!(f, "{e}"),
            Repr::Json { raw, .. } => f.write_str(raw.as_str()),
        }
    }
}

impl From<Error> for Value<'_> {
    fn from(err: Error) -> Self {
        Value::from_error(err)
    }
}
