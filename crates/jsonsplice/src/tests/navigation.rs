use alloc::{borrow::Cow, string::String, vec::Vec};

use rstest::rstest;

use crate::{Error, IndexVal, KeyVal, Parser, ParserOptions, PathSegment, Searcher, Value, path};

const DOC: &str = r#"{"b":[1,1,1],"c":{"d":1,"e":1,"f":1},"a":1}"#;

#[rstest]
#[case(path![], DOC)]
#[case(path!["a"], "1")]
#[case(path!["b"], "[1,1,1]")]
#[case(path!["b", 2], "1")]
#[case(path!["c", "f"], "1")]
#[case(path!["c"], r#"{"d":1,"e":1,"f":1}"#)]
fn get_by_path_finds_exact_spans(#[case] path: Vec<PathSegment<'static>>, #[case] raw: &str) {
    let doc = Value::new(DOC);
    assert_eq!(doc.get_by_path(&path).raw(), Ok(raw));
    assert_eq!(Searcher::new(DOC).get_by_path(&path).unwrap().raw(), Ok(raw));
}

#[rstest]
#[case(path!["x"], Error::NotExist)]
#[case(path!["b", 3], Error::NotExist)]
#[case(path![0], Error::UnsupportedType)]
#[case(path!["a", "z"], Error::UnsupportedType)]
#[case(path!["c", 0], Error::UnsupportedType)]
#[case(path!["c", "x", "y"], Error::NotExist)]
fn get_by_path_failures(#[case] path: Vec<PathSegment<'static>>, #[case] err: Error) {
    let doc = Value::new(DOC);
    assert_eq!(doc.get_by_path(&path).check(), Err(err.clone()));
    assert_eq!(Searcher::new(DOC).get_by_path(&path), Err(err));
}

#[test]
fn get_and_index_chain() {
    let doc = Value::new(r#" { "list" : [ {"name": "x"} , 2 ] } "#);
    assert_eq!(doc.get("list").index(0).get("name").as_str().unwrap(), "x");
    assert_eq!(doc.get("list").index(1).as_i64(), Ok(2));
    assert_eq!(doc.get("list").index(2).check(), Err(Error::NotExist));
    assert_eq!(doc.index(0).check(), Err(Error::UnsupportedType));
    assert_eq!(doc.get("list").get("name").check(), Err(Error::UnsupportedType));
}

#[test]
fn children_share_the_parent_text() {
    let text = String::from(r#"{"a":[true, {"b":"x"}]}"#);
    let doc = Value::new(&text);
    let leaf = doc.get("a").index(1).get("b");
    assert!(leaf.is_borrowed());
    assert_eq!(leaf.as_str().unwrap(), "x");

    let doc = Value::copied(&text);
    let leaf = doc.get("a").index(0);
    let missing = doc.get("a").index(5).get("c");
    drop(doc);
    assert!(!leaf.is_borrowed());
    assert_eq!(leaf.as_bool(), Ok(true));
    assert_eq!(missing.check(), Err(Error::NotExist));
}

#[test]
fn syntax_errors_surface_on_lookup() {
    let doc = Value::new(r#"{"a":1,"b":tru}"#);
    assert_eq!(doc.get("a").raw(), Ok("1"));
    assert!(matches!(doc.get("b").check(), Err(Error::Syntax(_))));
    assert!(matches!(doc.get("c").check(), Err(Error::Syntax(_))));
}

#[test]
fn searcher_copies_outlive_buffer() {
    let buf = String::from(DOC);
    let copied = Searcher::new(&buf).get_by_path_copy(&path!["c"]).unwrap();
    drop(buf);
    assert!(!copied.is_borrowed());
    assert_eq!(copied.get("e").as_i64(), Ok(1));
}

#[test]
fn searcher_reports_syntax_errors() {
    let Err(Error::Syntax(e)) = Searcher::new("{ ] }").get_by_path(&[]) else {
        panic!("expected a syntax error");
    };
    assert_eq!(e.pos(), 2);
    assert_eq!(e.message(), "invalid character ']'");
}

#[test]
fn depth_option_bounds_lookups() {
    let options = ParserOptions { max_depth: 2 };
    let searcher = Searcher::with_options("[[[1]]]", options);
    assert_eq!(searcher.get_by_path(&path![0, 0, 0]), Err(Error::RecurseExceedMax));
    assert_eq!(searcher.get_by_path(&[]), Err(Error::RecurseExceedMax));
    assert_eq!(
        Searcher::with_options("[[1]]", options)
            .get_by_path(&path![0, 0])
            .unwrap()
            .raw(),
        Ok("1")
    );
}

#[test]
fn parser_walks_a_sequence() {
    let src = r#"{"a":1} [2, 3] "s""#;
    let mut parser = Parser::new(src);
    assert_eq!(parser.skip(), Ok(0));
    assert_eq!(parser.pos(), 7);
    let mut probe = parser;
    assert_eq!(probe.get_by_path(&path![1]).unwrap().raw(), Ok("3"));
    assert_eq!(probe.pos(), 13);
    assert_eq!(parser.parse().unwrap().raw(), Ok("[2, 3]"));
    assert_eq!(parser.parse().unwrap().raw(), Ok(r#""s""#));
    assert!(matches!(parser.parse(), Err(Error::Syntax(_))));
    parser.reset();
    assert_eq!(parser.get_by_path(&path!["a"]).unwrap().as_i64(), Ok(1));
    assert_eq!(parser.source(), src);
}

#[test]
fn get_many_keeps_request_order() {
    let doc = Value::new(r#"{"a":1,"b":[2],"c":"3","a":4}"#);
    let mut wanted = [
        KeyVal::new("c", Value::null()),
        KeyVal::new("missing", Value::null()),
        KeyVal::new("a", Value::default()),
        KeyVal::new("a", Value::default()),
    ];
    doc.get_many(&mut wanted).unwrap();
    assert_eq!(wanted[0].value.raw(), Ok(r#""3""#));
    assert!(!wanted[1].value.exists());
    assert!(wanted[1].value.is_valid());
    assert_eq!(wanted[2].value.raw(), Ok("1"));
    assert_eq!(wanted[3].value.raw(), Ok("1"));

    let arr = Value::new("[]");
    let mut wrong = [KeyVal::new("a", Value::default())];
    assert_eq!(arr.get_many(&mut wrong), Err(Error::UnsupportedType));
}

#[test]
fn index_many_keeps_request_order() {
    let doc = Value::new("[10, 11, 12]");
    let mut wanted = [
        IndexVal::new(2, Value::default()),
        IndexVal::new(7, Value::default()),
        IndexVal::new(0, Value::default()),
    ];
    doc.index_many(&mut wanted).unwrap();
    let raws: Vec<_> = wanted.iter().map(|iv| iv.value.raw().ok()).collect();
    assert_eq!(raws, [Some("12"), None, Some("10")]);
}

#[test]
fn iteration_stops_early_and_repeats() {
    let doc = Value::new(r#"{"x":1,"y\n":2,"z":3}"#);
    for _ in 0..2 {
        let mut keys = Vec::new();
        doc.for_each_kv(|k, v| {
            keys.push((k, v.as_i64().unwrap()));
            keys.len() < 2
        })
        .unwrap();
        assert_eq!(
            keys,
            [(Cow::Borrowed("x"), 1), (Cow::Owned(String::from("y\n")), 2)]
        );
    }

    let arr = Value::new("[true, false, null]");
    let mut seen = Vec::new();
    arr.for_each_elem(|i, v| {
        seen.push((i, v.value_type()));
        true
    })
    .unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[2], (2, crate::ValueType::Null));
    assert_eq!(doc.for_each_elem(|_, _| true), Err(Error::UnsupportedType));
    assert_eq!(arr.for_each_kv(|_, _| true), Err(Error::UnsupportedType));
}
