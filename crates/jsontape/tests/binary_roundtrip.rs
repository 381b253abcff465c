//! Binary view: wire format, O(1) skip, roundtrips, and validation.

use jsontape::{
    binary, binary_from_slice, lazy, materialize, ErrorKind, Options, Tape, Value, View,
};
use serde_json::json;

fn opts() -> Options {
    Options::default()
}

#[test]
fn scalar_wire_bytes_are_exact() {
    let cases: Vec<(&[u8], Vec<u8>)> = vec![
        (b"null", vec![0x00]),
        (b"false", vec![0x01]),
        (b"true", vec![0x02]),
        // int, width class in the high nibble
        (b"5", vec![0x03, 0x05]),
        (b"-1", vec![0x03, 0xFF]),
        (b"300", vec![0x13, 0x2C, 0x01]),
        (b"70000", {
            let mut v = vec![0x23];
            v.extend_from_slice(&70000i32.to_le_bytes());
            v
        }),
        (b"5000000000", {
            let mut v = vec![0x33];
            v.extend_from_slice(&5000000000i64.to_le_bytes());
            v
        }),
        // float32 when the value survives the round-trip
        (b"1.5", {
            let mut v = vec![0x04];
            v.extend_from_slice(&1.5f32.to_le_bytes());
            v
        }),
        (b"250.1", {
            let mut v = vec![0x14];
            v.extend_from_slice(&250.1f64.to_le_bytes());
            v
        }),
        // string: u32 length, then raw bytes
        (b"\"hi\"", vec![0x05, 2, 0, 0, 0, b'h', b'i']),
        // empty containers: total 9, count 0
        (b"[]", vec![0x07, 9, 0, 0, 0, 0, 0, 0, 0]),
        (b"{}", vec![0x06, 9, 0, 0, 0, 0, 0, 0, 0]),
    ];
    for (doc, expected) in cases {
        let tape = binary_from_slice(doc, opts()).unwrap();
        assert_eq!(
            tape.as_bytes(),
            &expected[..],
            "tape of {}",
            String::from_utf8_lossy(doc)
        );
    }
}

#[test]
fn object_wire_layout_carries_total_and_count() {
    let tape = binary_from_slice(br#"{"a":1}"#, opts()).unwrap();
    let expected = vec![
        0x06, // object tag
        17, 0, 0, 0, // total byte length, including the tag
        1, 0, 0, 0, // member count
        0x05, 1, 0, 0, 0, b'a', // key
        0x03, 0x01, // value
    ];
    assert_eq!(tape.as_bytes(), &expected[..]);
}

#[test]
fn composite_skip_is_the_embedded_total() {
    let tape = binary_from_slice(br#"{"a": [1, 2, {"b": "ccc"}], "d": 4.5}"#, opts()).unwrap();
    let v = tape.view();
    assert_eq!(v.skip().unwrap(), tape.as_bytes().len());
    assert_eq!(v.count().unwrap(), 2);
}

#[test]
fn materialization_agrees_across_views() {
    let cases = vec![
        json!(null),
        json!([]),
        json!({"a": 1, "b": [true, null, "x"], "c": {"d": 2.5}}),
        json!([[1, 2], [3, 4]]),
        json!({"big": i64::MAX, "neg": i64::MIN}),
        json!("escaped \" and \n"),
    ];
    for case in cases {
        let bytes = serde_json::to_vec(&case).unwrap();
        let direct = materialize(lazy(&bytes, opts()).unwrap()).unwrap();
        let tape = binary_from_slice(&bytes, opts()).unwrap();
        assert_eq!(materialize(tape.view()).unwrap(), direct, "case {case}");
    }
}

#[test]
fn escaped_strings_are_stored_decoded() {
    let tape = binary_from_slice(br#""a\u00e9\n""#, opts()).unwrap();
    let v = tape.view();
    let s = v.apply_string().unwrap();
    assert!(!s.is_escaped());
    assert_eq!(s.decode().unwrap(), "a\u{e9}\n");
}

#[test]
fn reencoding_a_tape_is_byte_stable() {
    let docs: Vec<&[u8]> = vec![
        b"[1, 300, 5000000000, 1.5, 250.1, \"x\", null, true]",
        br#"{"nested": {"deep": [[], {}, [0]]}}"#,
    ];
    for doc in docs {
        let tape = binary_from_slice(doc, opts()).unwrap();
        let again = binary(tape.view()).unwrap();
        assert_eq!(tape.as_bytes(), again.as_bytes());
    }
}

#[test]
fn wide_integers_narrow_back_on_read() {
    let tape = binary_from_slice(b"18446744073709551615", opts()).unwrap();
    assert_eq!(
        materialize(tape.view()).unwrap(),
        Value::UInt(u64::MAX)
    );

    let tape = binary_from_slice(b"170141183460469231731687303715884105727", opts()).unwrap();
    assert_eq!(materialize(tape.view()).unwrap(), Value::BigInt(i128::MAX));
}

#[test]
fn nonfinite_floats_survive_the_tape() {
    let f64_opts = Options {
        float64: true,
        ..Default::default()
    };
    let tape = binary_from_slice(b"[NaN, Inf, -Inf]", f64_opts).unwrap();
    match materialize(tape.view()).unwrap() {
        Value::Array(items) => {
            assert!(matches!(items[0], Value::Float(f) if f.is_nan()));
            assert_eq!(items[1], Value::Float(f64::INFINITY));
            assert_eq!(items[2], Value::Float(f64::NEG_INFINITY));
        }
        _ => unreachable!(),
    }
}

#[test]
fn unrecognized_tags_are_rejected() {
    let err = Tape::from_bytes(vec![0x0F], opts()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidBinaryTag);

    // A valid kind nibble with an undefined size class is also rejected.
    let err = Tape::from_bytes(vec![0x53], opts()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidBinaryTag);

    let err = Tape::from_bytes(vec![], opts()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEof);
}

#[test]
fn validate_accepts_written_tapes_and_rejects_damage() {
    let tape = binary_from_slice(br#"{"a": [1, "xy"], "b": null}"#, opts()).unwrap();
    tape.validate().unwrap();

    // Truncate the payload: lengths no longer hold.
    let mut bytes = tape.as_bytes().to_vec();
    bytes.truncate(bytes.len() - 1);
    let damaged = Tape::from_bytes(bytes, opts()).unwrap();
    assert!(damaged.validate().is_err());

    // Trailing garbage past the root value.
    let mut bytes = tape.as_bytes().to_vec();
    bytes.push(0xAB);
    let damaged = Tape::from_bytes(bytes, opts()).unwrap();
    assert_eq!(
        damaged.validate().unwrap_err().kind,
        ErrorKind::InvalidChar
    );
}
