use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::{QuickCheck, TestResult, Testable};
use quickcheck_macros::quickcheck;
use serde_json::{Map, Value as Json};

use super::arbitrary::{JsonDoc, Key, Replacement};
use crate::{Error, KeyVal, Value, is_valid, locate_span, path, skip};

fn run<A: Testable>(prop: A) {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new().tests(tests).quickcheck(prop);
}

/// Both sides go through the same float parser, so equal number text gives
/// equal values.
fn same_json(ours: &str, oracle: &Json) -> bool {
    serde_json::from_str::<Json>(ours).ok()
        == serde_json::from_str::<Json>(&oracle.to_string()).ok()
}

/// Property: every member of a generated document is found at exactly the
/// text serde_json would render for it, and past-the-end lookups miss.
#[test]
fn lookups_agree_with_serde_json() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc) -> bool {
        let text = doc.text();
        if !is_valid(&text) || Value::parse(&text).is_err() {
            return false;
        }
        let value = Value::new(&text);
        match &doc.value {
            Json::Object(map) => {
                value.len() == Ok(map.len())
                    && map
                        .iter()
                        .all(|(k, want)| value.get(k).raw().is_ok_and(|raw| same_json(raw, want)))
            }
            Json::Array(items) => {
                value.len() == Ok(items.len())
                    && value.index(items.len()).check() == Err(Error::NotExist)
                    && items
                        .iter()
                        .enumerate()
                        .all(|(i, want)| value.index(i).raw().is_ok_and(|raw| same_json(raw, want)))
            }
            other => value.raw().is_ok_and(|raw| same_json(raw, other)),
        }
    }

    run(prop as fn(JsonDoc) -> bool);
}

/// Property: setting an object member matches `Map::insert`.
#[test]
fn object_set_matches_map_insert() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc, key: Key, repl: Replacement) -> TestResult {
        let Json::Object(mut map) = doc.value.clone() else {
            return TestResult::discard();
        };
        let text = doc.text();
        let mut value = Value::new(&text);
        let Ok(existed) = value.set_by_path(false, &repl.text(), &path![key.0.as_str()]) else {
            return TestResult::failed();
        };
        let had = map.insert(key.0, repl.0).is_some();
        let Ok(raw) = value.raw() else {
            return TestResult::failed();
        };
        TestResult::from_bool(existed == had && same_json(raw, &Json::Object(map)))
    }

    run(prop as fn(JsonDoc, Key, Replacement) -> TestResult);
}

/// Property: removing an object member leaves exactly the other members.
#[test]
fn object_unset_matches_filter() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc, key: Key) -> TestResult {
        let Json::Object(map) = doc.value.clone() else {
            return TestResult::discard();
        };
        let text = doc.text();
        let mut value = Value::new(&text);
        let Ok(removed) = value.unset_by_path(&path![key.0.as_str()]) else {
            return TestResult::failed();
        };
        let had = map.contains_key(&key.0);
        let kept: Map<String, Json> = map.into_iter().filter(|(k, _)| *k != key.0).collect();
        let Ok(raw) = value.raw() else {
            return TestResult::failed();
        };
        TestResult::from_bool(removed == had && same_json(raw, &Json::Object(kept)))
    }

    run(prop as fn(JsonDoc, Key) -> TestResult);
}

/// Property: setting an element replaces in range and appends past the end.
#[test]
fn array_set_matches_vec() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc, index: usize, repl: Replacement) -> TestResult {
        let Json::Array(mut items) = doc.value.clone() else {
            return TestResult::discard();
        };
        let index = index % (items.len() + 2);
        let text = doc.text();
        let mut value = Value::new(&text);
        let Ok(existed) = value.set_by_path(true, &repl.text(), &path![index]) else {
            return TestResult::failed();
        };
        let had = index < items.len();
        if had {
            items[index] = repl.0;
        } else {
            items.push(repl.0);
        }
        let Ok(raw) = value.raw() else {
            return TestResult::failed();
        };
        TestResult::from_bool(existed == had && same_json(raw, &Json::Array(items)))
    }

    run(prop as fn(JsonDoc, usize, Replacement) -> TestResult);
}

/// Property: removing an element matches `Vec::remove`.
#[test]
fn array_unset_matches_vec() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc, index: usize) -> TestResult {
        let Json::Array(mut items) = doc.value.clone() else {
            return TestResult::discard();
        };
        let index = index % (items.len() + 1);
        let text = doc.text();
        let mut value = Value::new(&text);
        let Ok(removed) = value.unset_by_path(&path![index]) else {
            return TestResult::failed();
        };
        let had = index < items.len();
        if had {
            items.remove(index);
        }
        let Ok(raw) = value.raw() else {
            return TestResult::failed();
        };
        TestResult::from_bool(removed == had && same_json(raw, &Json::Array(items)))
    }

    run(prop as fn(JsonDoc, usize) -> TestResult);
}

/// Property: a batch lookup answers each key like a single lookup.
#[test]
fn get_many_matches_get() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc, keys: Vec<Key>) -> TestResult {
        if !doc.value.is_object() {
            return TestResult::discard();
        }
        let text = doc.text();
        let value = Value::new(&text);
        let mut pairs: Vec<KeyVal<'_, '_>> = keys
            .iter()
            .map(|k| KeyVal::new(&k.0, Value::default()))
            .collect();
        if value.get_many(&mut pairs).is_err() {
            return TestResult::failed();
        }
        TestResult::from_bool(pairs.iter().all(|kv| match value.get(kv.key).raw() {
            Ok(raw) => kv.value.raw() == Ok(raw),
            Err(_) => !kv.value.exists(),
        }))
    }

    run(prop as fn(JsonDoc, Vec<Key>) -> TestResult);
}

/// Property: no proper prefix of a container document is valid, and reading
/// one reports an error instead of panicking.
#[test]
fn truncated_documents_are_rejected() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc, cut: usize) -> bool {
        let text = doc.text();
        let mut cut = cut % text.len().max(1);
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        let prefix = &text[..cut];
        let value = Value::new(prefix);
        !is_valid(prefix) && value.len().is_err() && Value::parse(prefix).is_err()
    }

    run(prop as fn(JsonDoc, usize) -> bool);
}

#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn arbitrary_text_never_panics(text: String, key: Key, index: usize) -> bool {
    let index = index % 4;
    let value = Value::new(&text);
    let _ = value.get(&key.0).index(index).check();
    let _ = value.len();
    let _ = value.to_vec();
    let _ = value.as_str();
    let _ = locate_span(&text, &path![key.0.as_str()]);
    let mut pos = 0;
    let _ = skip(&text, &mut pos);

    let mut edited = Value::new(&text);
    let _ = edited.set_by_path(true, "0", &path![key.0.as_str(), index]);
    let _ = edited.unset_many(&[key.0.as_str()]);
    let _ = edited.to_string();

    is_valid(&text) == Value::parse(&text).is_ok()
}
