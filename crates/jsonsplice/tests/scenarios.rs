#![expect(missing_docs)]

use jsonsplice::{Error, KeyVal, Searcher, Value, path};

#[test]
fn replace_existing_member() {
    let mut v = Value::new(r#"{"a":1}"#);
    assert!(v.set("a", &Value::from_i64(2)).unwrap());
    assert_eq!(v.raw().unwrap(), r#"{"a":2}"#);
}

#[test]
fn append_missing_member() {
    let mut v = Value::new(r#"{"b":1 }"#);
    assert!(!v.set("a", &Value::from_i64(2)).unwrap());
    assert_eq!(v.raw().unwrap(), r#"{"b":1,"a":2}"#);
}

#[test]
fn append_past_array_end() {
    let mut v = Value::new("[1]");
    assert!(!v.set_by_index(1, &Value::from_i64(2)).unwrap());
    assert_eq!(v.raw().unwrap(), "[1,2]");
}

#[test]
fn unset_takes_one_separator() {
    let mut v = Value::new(r#"{ "a":1 , "b":2 }"#);
    assert!(v.unset("a").unwrap());
    assert_eq!(v.raw().unwrap(), r#"{  "b":2 }"#);
}

#[test]
fn unset_missing_is_untouched() {
    let src = r#"{ "a":1 }"#;
    let mut v = Value::new(src);
    assert!(!v.unset("z").unwrap());
    assert_eq!(v.raw().unwrap(), src);
}

#[test]
fn searcher_finds_nested_member() {
    let searcher = Searcher::new(r#"{"b":[1,1,1],"c":{"d":1,"e":1,"f":1},"a":1}"#);
    let v = searcher.get_by_path(&path!["c", "f"]).unwrap();
    assert_eq!(v.raw().unwrap(), "1");
    assert_eq!(v.as_i64().unwrap(), 1);
}

#[test]
fn malformed_input_is_a_syntax_error() {
    let err = Searcher::new("{ ] }").get_by_path(&[]).unwrap_err();
    insta::assert_snapshot!(
        format!("{err:?}"),
        @r#"Syntax(SyntaxError { pos: 2, msg: "invalid character ']'", snippet: "{ ] }", marker: "..^.." })"#
    );
    assert_eq!(
        err.to_string(),
        "Syntax error at index 2: invalid character ']'\n\n\t{ ] }\n\t..^..\n"
    );

    let unclosed = Searcher::new("{ ] ").get_by_path(&path!["a"]);
    assert!(matches!(unclosed, Err(Error::Syntax(e)) if e.pos() == 2));
}

#[test]
fn missing_path_materialises_wrappers() {
    let mut v = Value::new("{}");
    assert!(!v.set_by_path(true, "2", &path!["a", 1, "a"]).unwrap());
    assert_eq!(v.raw().unwrap(), r#"{"a":[{"a":2}]}"#);

    let mut strict = Value::new("{}");
    assert_eq!(
        strict.set_by_path(false, "2", &path!["a", 1, "a"]),
        Err(Error::IndexOutOfRange { index: 1 })
    );
}

#[test]
fn get_many_follows_request_order() {
    let doc = Value::new(r#"{"a":"first","b":0,"c":"third"}"#);
    let mut wanted = [
        KeyVal::new("c", Value::default()),
        KeyVal::new("a", Value::default()),
    ];
    doc.get_many(&mut wanted).unwrap();
    assert_eq!(wanted[0].value.as_str().unwrap(), "third");
    assert_eq!(wanted[1].value.as_str().unwrap(), "first");
}
