//! Splice edits: replace, insert and remove members by rewriting only the
//! bytes involved.
//!
//! Every edit builds a new buffer from the untouched prefix and suffix of the
//! old text plus the new member, validates it, and replaces the edited
//! [`Value`]. Formatting outside the edited member is kept byte for byte.
use alloc::{borrow::Cow, string::String, vec, vec::Vec};

use crate::{
    Error, IndexVal, KeyVal, PathSegment, Parser, Value, ValueType,
    error::ErrorCode,
    escape::write_quoted,
    options::DEFAULT_MAX_DEPTH,
    scanner::{Children, Span, is_blank, skip_blank, validate_document},
    value::Text,
};

/// Room reserved per synthesized path segment.
const INSERTED_SEGMENT_SIZE: usize = 8;

/// Where an insertion before `close` goes: after the last member, with the
/// blanks before the closer dropped. The flag is `true` when the container
/// has no members.
fn insertion_point(src: &[u8], close: usize) -> (usize, bool) {
    let mut stop = close;
    while stop > 0 && is_blank(src[stop - 1]) {
        stop -= 1;
    }
    let empty = stop > 0 && matches!(src[stop - 1], b'[' | b'{');
    (stop, empty)
}

/// The bytes to cut so that the member spanning `start..end` disappears along
/// with exactly one separating comma.
fn removal_range(src: &[u8], start: usize, end: usize) -> (usize, usize) {
    let mut before = start;
    while before > 0 && is_blank(src[before - 1]) {
        before -= 1;
    }
    if before > 0 && src[before - 1] == b',' {
        return (before - 1, end);
    }
    let mut after = skip_blank(src, end);
    if src.get(after) == Some(&b',') {
        after += 1;
    }
    (start, after)
}

/// Writes the member addressed by `path` inside the container that lacks
/// `path[0]`, wrapping `value` in one new container per further segment.
fn write_path_and_value(out: &mut String, path: &[PathSegment<'_>], value: &str) {
    if let Some(PathSegment::Key(key)) = path.first() {
        write_quoted(key, out);
        out.push(':');
    }
    for seg in path.iter().skip(1) {
        match seg {
            PathSegment::Key(key) => {
                out.push('{');
                write_quoted(key, out);
                out.push(':');
            }
            PathSegment::Index(_) => out.push('['),
        }
    }
    out.push_str(value);
    for seg in path.iter().skip(1).rev() {
        out.push(match seg {
            PathSegment::Key(_) => '}',
            PathSegment::Index(_) => ']',
        });
    }
}

/// The exact text of a value about to be inserted, validated.
fn insertable<'v>(value: &'v Value<'_>) -> Result<&'v str, Error> {
    let raw = value.raw()?;
    let span = validate_document(raw, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(raw))?;
    Ok(&raw[span.start..span.end])
}

fn insertable_text(json: &str) -> Result<(&str, Span), Error> {
    let span = validate_document(json, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(json))?;
    Ok((&json[span.start..span.end], span))
}

/// Copies `src` into `out` up to `until`, substituting each `(span, text)`
/// edit. Edits must be sorted and disjoint.
fn splice_into(out: &mut String, src: &str, edits: &[(Span, &str)], until: usize) {
    let mut at = 0;
    for (span, text) in edits {
        out.push_str(&src[at..span.start]);
        out.push_str(text);
        at = span.end;
    }
    out.push_str(&src[at..until]);
}

impl Value<'_> {
    /// Replaces the value with one parsed from a freshly built buffer.
    fn replace_with(&mut self, buf: String) -> Result<(), Error> {
        let span = validate_document(&buf, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(&buf))?;
        *self = Value::json(Text::owned(buf), span.kind, Some(span.escaped));
        Ok(())
    }

    /// Writes `json` at `path`, creating missing members.
    ///
    /// Returns whether the target existed before. When it did not, the
    /// member is appended to the deepest existing container on the path, and
    /// the rest of the path is created as nested objects and arrays around
    /// `json`. An array segment in that missing part is only accepted when
    /// `allow_append` is set. An empty path replaces the whole value.
    ///
    /// # Errors
    ///
    /// - [`Error::Syntax`] when `json` is not exactly one value.
    /// - [`Error::IndexOutOfRange`] naming the first array segment that would
    ///   need appending while `allow_append` is off.
    /// - [`Error::UnsupportedType`] when a segment does not fit its container.
    /// - The error of a [`ValueType::Error`] value, or [`Error::NotExist`] for
    ///   a [`ValueType::None`] one.
    ///
    /// On error the value is left unchanged.
    ///
    /// ```rust
    /// use jsonsplice::{Value, path};
    ///
    /// let mut doc = Value::copied(r#"{"a": {"keep": true}}"#);
    /// assert!(!doc.set_by_path(true, "2", &path!["a", "b", 0, "c"]).unwrap());
    /// assert_eq!(doc.raw().unwrap(), r#"{"a": {"keep": true,"b":[{"c":2}]}}"#);
    /// ```
    pub fn set_by_path(
        &mut self,
        allow_append: bool,
        json: &str,
        path: &[PathSegment<'_>],
    ) -> Result<bool, Error> {
        let (text, span) = insertable_text(json)?;
        if path.is_empty() {
            *self = Value::json(Text::owned(text.into()), span.kind, Some(span.escaped));
            return Ok(true);
        }
        let (raw, _, _) = self.parts()?;
        let parser = Parser::new(raw);
        let (buf, existed) = match parser.locate(path) {
            Ok(found) => {
                let mut buf = String::with_capacity(raw.len() + text.len());
                buf.push_str(&raw[..found.value.start]);
                buf.push_str(text);
                buf.push_str(&raw[found.value.end..]);
                (buf, true)
            }
            Err(e) if e.code == ErrorCode::NotFound => {
                let missing = &path[e.segment..];
                if !allow_append {
                    if let Some(i) = missing.iter().position(|s| s.as_index().is_some()) {
                        return Err(Error::IndexOutOfRange {
                            index: e.segment + i,
                        });
                    }
                }
                let (stop, empty) = insertion_point(raw.as_bytes(), e.pos);
                let mut buf = String::with_capacity(
                    raw.len() + text.len() + INSERTED_SEGMENT_SIZE * missing.len(),
                );
                buf.push_str(&raw[..stop]);
                if !empty {
                    buf.push(',');
                }
                write_path_and_value(&mut buf, missing, text);
                buf.push_str(&raw[e.pos..]);
                (buf, false)
            }
            Err(e) => return Err(parser.error(e)),
        };
        self.replace_with(buf)?;
        tracing::debug!(
            depth = path.len(),
            existed,
            len = self.raw().map_or(0, str::len),
            "set by path"
        );
        Ok(existed)
    }

    /// Removes the member at `path`.
    ///
    /// Returns `false`, leaving the text untouched, when there is no such
    /// member. An empty path turns the value into [`ValueType::None`].
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] when a segment does not fit its container,
    /// [`Error::Syntax`] for malformed text on the way, and the error of an
    /// invalid value.
    ///
    /// ```rust
    /// use jsonsplice::{Value, path};
    ///
    /// let mut doc = Value::copied(r#"{ "a":1 , "b":2 }"#);
    /// assert!(doc.unset_by_path(&path!["a"]).unwrap());
    /// assert_eq!(doc.raw().unwrap(), r#"{  "b":2 }"#);
    /// ```
    pub fn unset_by_path(&mut self, path: &[PathSegment<'_>]) -> Result<bool, Error> {
        if path.is_empty() {
            *self = Value::default();
            return Ok(true);
        }
        let (raw, _, _) = self.parts()?;
        let parser = Parser::new(raw);
        let found = match parser.locate(path) {
            Ok(found) => found,
            Err(e) if e.code == ErrorCode::NotFound => {
                tracing::debug!(depth = path.len(), "unset by path: member absent");
                return Ok(false);
            }
            Err(e) => return Err(parser.error(e)),
        };
        let (from, to) = removal_range(raw.as_bytes(), found.key_start, found.value.end);
        let mut buf = String::with_capacity(raw.len() - (to - from));
        buf.push_str(&raw[..from]);
        buf.push_str(&raw[to..]);
        self.replace_with(buf)?;
        tracing::debug!(depth = path.len(), removed = to - from, "unset by path");
        Ok(true)
    }

    /// Sets member `key` of an object; see [`set_by_path`](Self::set_by_path).
    ///
    /// # Errors
    ///
    /// As [`set_by_path`](Self::set_by_path), plus the error of an invalid
    /// `value`.
    pub fn set(&mut self, key: &str, value: &Value<'_>) -> Result<bool, Error> {
        let json = value.raw()?;
        self.set_by_path(false, json, &[PathSegment::Key(Cow::Borrowed(key))])
    }

    /// Sets element `index` of an array, appending when it is past the end.
    ///
    /// # Errors
    ///
    /// As [`set`](Self::set).
    pub fn set_by_index(&mut self, index: usize, value: &Value<'_>) -> Result<bool, Error> {
        let json = value.raw()?;
        self.set_by_path(true, json, &[PathSegment::Index(index)])
    }

    /// Removes member `key` of an object.
    ///
    /// # Errors
    ///
    /// As [`unset_by_path`](Self::unset_by_path).
    pub fn unset(&mut self, key: &str) -> Result<bool, Error> {
        self.unset_by_path(&[PathSegment::Key(Cow::Borrowed(key))])
    }

    /// Removes element `index` of an array.
    ///
    /// # Errors
    ///
    /// As [`unset_by_path`](Self::unset_by_path).
    pub fn unset_by_index(&mut self, index: usize) -> Result<bool, Error> {
        self.unset_by_path(&[PathSegment::Index(index)])
    }

    /// Sets several members of an object with one scan of its members.
    ///
    /// Each existing member is claimed by the first request naming it; the
    /// remaining requests are appended in request order, so a key requested
    /// twice ends up twice in the object. Returns how many requests replaced
    /// an existing member.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is an object, and the
    /// errors of invalid request values.
    pub fn set_many(&mut self, pairs: &[KeyVal<'_, '_>]) -> Result<usize, Error> {
        if pairs.is_empty() {
            return Ok(0);
        }
        let texts = pairs
            .iter()
            .map(|kv| insertable(&kv.value))
            .collect::<Result<Vec<_>, _>>()?;
        let (raw, open) = self.container(ValueType::Object)?;
        let mut claimed: Vec<Option<Span>> = vec![None; pairs.len()];
        let mut children =
            Children::new(raw, open, 0, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(raw))?;
        while let Some(child) = children.next_child().map_err(|e| e.into_error(raw))? {
            let Some(key) = child.key else { continue };
            let key = key.text(raw).map_err(|e| e.into_error(raw))?;
            if let Some(slot) = pairs
                .iter()
                .zip(claimed.iter_mut())
                .find_map(|(kv, slot)| (slot.is_none() && kv.key == key).then_some(slot))
            {
                *slot = Some(child.value);
            }
        }
        let close = children.close_pos().map_err(|e| e.into_error(raw))?;

        let missing: Vec<_> = pairs
            .iter()
            .zip(&texts)
            .zip(&claimed)
            .filter(|(_, slot)| slot.is_none())
            .map(|((kv, text), _)| (kv.key, *text))
            .collect();
        let buf = Self::rebuild(raw, close, &claimed, &texts, missing.len(), |out| {
            for (i, (key, text)) in missing.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_quoted(key, out);
                out.push(':');
                out.push_str(text);
            }
        });
        let matched = pairs.len() - missing.len();
        self.replace_with(buf)?;
        tracing::debug!(requests = pairs.len(), matched, "set many");
        Ok(matched)
    }

    /// Sets several elements of an array with one scan; indices past the end
    /// are appended in request order. Returns how many requests replaced an
    /// existing element.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is an array, and the
    /// errors of invalid request values.
    pub fn set_many_by_index(&mut self, elems: &[IndexVal<'_>]) -> Result<usize, Error> {
        if elems.is_empty() {
            return Ok(0);
        }
        let texts = elems
            .iter()
            .map(|iv| insertable(&iv.value))
            .collect::<Result<Vec<_>, _>>()?;
        let (raw, open) = self.container(ValueType::Array)?;
        let mut claimed: Vec<Option<Span>> = vec![None; elems.len()];
        let mut children =
            Children::new(raw, open, 0, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(raw))?;
        let mut index = 0;
        while let Some(child) = children.next_child().map_err(|e| e.into_error(raw))? {
            if let Some(slot) = elems
                .iter()
                .zip(claimed.iter_mut())
                .find_map(|(iv, slot)| (slot.is_none() && iv.index == index).then_some(slot))
            {
                *slot = Some(child.value);
            }
            index += 1;
        }
        let close = children.close_pos().map_err(|e| e.into_error(raw))?;

        let missing: Vec<&str> = texts
            .iter()
            .zip(&claimed)
            .filter(|(_, slot)| slot.is_none())
            .map(|(text, _)| *text)
            .collect();
        let buf = Self::rebuild(raw, close, &claimed, &texts, missing.len(), |out| {
            for (i, text) in missing.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(text);
            }
        });
        let matched = elems.len() - missing.len();
        self.replace_with(buf)?;
        tracing::debug!(requests = elems.len(), matched, "set many by index");
        Ok(matched)
    }

    /// Builds the buffer for a batch set: claimed members replaced in place,
    /// then `append` writing the missing ones before the closer at `close`.
    fn rebuild(
        raw: &str,
        close: usize,
        claimed: &[Option<Span>],
        texts: &[&str],
        missing: usize,
        append: impl FnOnce(&mut String),
    ) -> String {
        let mut edits: Vec<(Span, &str)> = claimed
            .iter()
            .zip(texts)
            .filter_map(|(slot, text)| slot.map(|span| (span, *text)))
            .collect();
        edits.sort_unstable_by_key(|(span, _)| span.start);
        let added: usize = texts.iter().map(|t| t.len() + INSERTED_SEGMENT_SIZE).sum();
        let mut out = String::with_capacity(raw.len() + added);
        if missing == 0 {
            splice_into(&mut out, raw, &edits, raw.len());
            return out;
        }
        let (stop, empty) = insertion_point(raw.as_bytes(), close);
        splice_into(&mut out, raw, &edits, stop);
        if !empty {
            out.push(',');
        }
        append(&mut out);
        out.push_str(&raw[close..]);
        out
    }

    /// Removes several members of an object with one scan. Returns how many
    /// requests matched a member; a key requested twice matches once.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is an object.
    pub fn unset_many(&mut self, keys: &[&str]) -> Result<usize, Error> {
        if keys.is_empty() {
            return Ok(0);
        }
        let (raw, open) = self.container(ValueType::Object)?;
        let mut claimed = vec![false; keys.len()];
        let mut ranges = Vec::new();
        let mut children =
            Children::new(raw, open, 0, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(raw))?;
        while let Some(child) = children.next_child().map_err(|e| e.into_error(raw))? {
            let Some(key) = child.key else { continue };
            let key = key.text(raw).map_err(|e| e.into_error(raw))?;
            if let Some(slot) = keys
                .iter()
                .zip(claimed.iter_mut())
                .find_map(|(k, slot)| (!*slot && *k == key).then_some(slot))
            {
                *slot = true;
                ranges.push((child.start(), child.value.end));
            }
        }
        self.remove_ranges(ranges)
    }

    /// Removes several elements of an array with one scan. Returns how many
    /// requests matched an element.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is an array.
    pub fn unset_many_by_index(&mut self, indices: &[usize]) -> Result<usize, Error> {
        if indices.is_empty() {
            return Ok(0);
        }
        let (raw, open) = self.container(ValueType::Array)?;
        let mut claimed = vec![false; indices.len()];
        let mut ranges = Vec::new();
        let mut children =
            Children::new(raw, open, 0, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(raw))?;
        let mut index = 0;
        while let Some(child) = children.next_child().map_err(|e| e.into_error(raw))? {
            if let Some(slot) = indices
                .iter()
                .zip(claimed.iter_mut())
                .find_map(|(i, slot)| (!*slot && *i == index).then_some(slot))
            {
                *slot = true;
                ranges.push((child.start(), child.value.end));
            }
            index += 1;
        }
        self.remove_ranges(ranges)
    }

    /// Cuts members given as ascending `(start, end)` spans, last first.
    fn remove_ranges(&mut self, ranges: Vec<(usize, usize)>) -> Result<usize, Error> {
        if ranges.is_empty() {
            return Ok(0);
        }
        let mut buf = String::from(self.raw()?);
        for &(start, end) in ranges.iter().rev() {
            let (from, to) = removal_range(buf.as_bytes(), start, end);
            buf.replace_range(from..to, "");
        }
        self.replace_with(buf)?;
        tracing::debug!(removed = ranges.len(), "unset many");
        Ok(ranges.len())
    }
}
