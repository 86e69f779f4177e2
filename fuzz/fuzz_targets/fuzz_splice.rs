#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonsplice::{PathSegment, Value, is_valid};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value as Json};

const HEADER: usize = 5; // 1 op byte + 4-byte path seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r"];

static KEYS: &[&str] = &["a", "b", "c", "", "a\"b", "\u{e9}"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed % 10 == 0 {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        let limit = max_size - prefix;
        prefix += append_whitespace(&mut data[prefix..], limit);
        prefix += append_value(&mut data[prefix..], size, max_size - prefix);
        prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Appends up to eight JSON blanks, never more than `limit` bytes.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let n = rng.random_range(1..=limit.min(8));
        for b in &mut buf[..n] {
            *b = WS_TABLE[rng.random_range(0..WS_TABLE.len())][0];
        }
        n
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Json);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Json::Null,
            1 => Json::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Json::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=6 => Json::String(u.arbitrary()?),
            7..=10 => Json::String(KEYS[u.choose_index(KEYS.len())?].to_string()),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Json::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let m: Vec<(usize, ArbitraryValue)> = u.arbitrary()?;
                Json::Object(Map::from_iter(
                    m.into_iter().map(|(k, v)| (KEYS[k % KEYS.len()].to_string(), v.0)),
                ))
            }
        };
        Ok(ArbitraryValue(value))
    }
}

/// Up to three segments drawn from the seed: two bits of kind, then a key
/// or a small index.
fn path_from_seed(mut seed: u32) -> Vec<PathSegment<'static>> {
    let len = (seed & 3) as usize;
    seed >>= 2;
    (0..len)
        .map(|_| {
            let seg = if seed & 1 == 0 {
                PathSegment::from(KEYS[(seed >> 1) as usize % KEYS.len()])
            } else {
                PathSegment::Index((seed >> 1) as usize % 4)
            };
            seed >>= 5;
            seg
        })
        .collect()
}

fn splice(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let op = data[0];
    let path = path_from_seed(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    let text = String::from_utf8_lossy(&data[HEADER..]).into_owned();

    let valid = is_valid(&text);
    if serde_json::from_str::<Json>(&text).is_ok() {
        assert!(valid, "rejected json that serde_json accepts: {text}");
    }

    let doc = Value::new(&text);
    let _ = doc.get_by_path(&path).raw();
    let _ = doc.len();

    let mut edited = Value::new(&text);
    let outcome = match op % 3 {
        0 => edited.set_by_path(op & 4 != 0, "[0,{\"k\":1}]", &path),
        1 => edited.unset_by_path(&path),
        _ => edited.unset_many(&["a", "b"]).map(|n| n > 0),
    };
    if valid && outcome.is_ok() && edited.exists() {
        let raw = edited.raw().expect("edited value has text");
        assert!(is_valid(raw), "edit produced invalid json: {raw}");
        if op % 3 == 0 && outcome == Ok(true) {
            assert_eq!(edited.get_by_path(&path).index(1).get("k").as_i64(), Ok(1));
        }
    }
}

fuzz_target!(|data: &[u8]| splice(data));
