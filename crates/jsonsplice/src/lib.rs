//! Lazy, zero-copy JSON values with path lookups and splice edits.
//!
//! A [`Value`] wraps the text of a JSON document and finds members by
//! scanning that text on demand, so reading two fields of a large payload
//! never builds a tree. Edits such as [`Value::set_by_path`] rewrite only the
//! bytes of the member involved and keep every other byte of the document,
//! whitespace included.
//!
//! ```rust
//! use jsonsplice::{Value, path};
//!
//! let mut doc = Value::copied(r#"{"id": 7, "tags": ["a"]}"#);
//! assert_eq!(doc.get("id").as_i64().unwrap(), 7);
//!
//! doc.set_by_path(true, r#""b""#, &path!["tags", 1]).unwrap();
//! assert_eq!(doc.raw().unwrap(), r#"{"id": 7, "tags": ["a","b"]}"#);
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod batch;
mod error;
mod mutation;
mod options;
mod parser;
mod path;
mod scanner;
mod searcher;
mod value;

pub mod base64;
pub mod escape;

#[cfg(test)]
mod tests;

pub use batch::{IndexVal, KeyVal};
pub use error::{Error, SyntaxError};
pub use options::{DEFAULT_MAX_DEPTH, ParserOptions};
pub use parser::Parser;
pub use path::{PathSegment, PathSegmentFrom};
pub use scanner::{is_valid, locate_span, skip};
pub use searcher::Searcher;
pub use value::{Value, ValueType};

#[doc(hidden)]
pub use alloc::vec;

/// Macro to build a `Vec<PathSegment>` from a heterogeneous list of keys and
/// indices.
///
/// ```rust
/// extern crate alloc;
/// # use jsonsplice::{path, PathSegment};
/// let p = path![0, "foo", 2];
/// assert_eq!(
///     p,
///     vec![
///         PathSegment::Index(0),
///         PathSegment::Key("foo".into()),
///         PathSegment::Index(2)
///     ]
/// );
/// ```
///
/// A negative index panics.
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        use $crate::PathSegmentFrom;
        $crate::vec![$($crate::PathSegment::from_path_segment($elem)),*]
    }};
}
