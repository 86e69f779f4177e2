use crate::{Error, PathSegment, Parser, Value, options::ParserOptions};

/// One-shot path queries over a JSON buffer.
///
/// Every query starts from the beginning of the buffer, so a `Searcher` can
/// be shared between threads and queried repeatedly.
///
/// ```rust
/// use jsonsplice::{Searcher, path};
///
/// let searcher = Searcher::new(r#"{"b":[1,1,1],"c":{"d":1,"e":1,"f":1},"a":1}"#);
/// assert_eq!(searcher.get_by_path(&path!["c", "f"]).unwrap().raw().unwrap(), "1");
/// assert!(searcher.get_by_path(&path!["x"]).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Searcher<'a> {
    parser: Parser<'a>,
}

impl<'a> Searcher<'a> {
    #[must_use]
    pub fn new(json: &'a str) -> Self {
        Self {
            parser: Parser::new(json),
        }
    }

    #[must_use]
    pub fn with_options(json: &'a str, options: ParserOptions) -> Self {
        Self {
            parser: Parser::with_options(json, options),
        }
    }

    /// The value at `path`, borrowing from the searched buffer.
    ///
    /// # Errors
    ///
    /// See [`Parser::get_by_path`].
    pub fn get_by_path(&self, path: &[PathSegment<'_>]) -> Result<Value<'a>, Error> {
        let mut parser = self.parser;
        parser.reset();
        parser.get_by_path(path)
    }

    /// The value at `path`, copied out of the searched buffer.
    ///
    /// # Errors
    ///
    /// See [`Parser::get_by_path`].
    pub fn get_by_path_copy(&self, path: &[PathSegment<'_>]) -> Result<Value<'static>, Error> {
        self.get_by_path(path).map(Value::into_owned)
    }
}
