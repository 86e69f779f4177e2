/// Default bound on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// Configuration options for [`Parser`](crate::Parser) and
/// [`Searcher`](crate::Searcher).
///
/// # Examples
///
/// ```rust
/// use jsonsplice::{ParserOptions, Searcher, path};
///
/// let options = ParserOptions { max_depth: 8 };
/// let searcher = Searcher::with_options(r#"{"a":[1,2]}"#, options);
/// assert_eq!(searcher.get_by_path(&path!["a", 1]).unwrap().raw().unwrap(), "2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum number of nested arrays and objects the scanner descends into
    /// before failing with [`Error::RecurseExceedMax`](crate::Error::RecurseExceedMax).
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
