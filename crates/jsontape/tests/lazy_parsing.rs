//! Lazy view: kind inference, on-demand validation, skip, and errors.

use jsontape::{lazy, materialize, ErrorKind, Kind, Options, Value, View};

#[test]
fn kind_follows_the_leading_byte() {
    let opts = Options::default();
    let cases: Vec<(&[u8], Kind)> = vec![
        (b"{}", Kind::Object),
        (b"  {\"a\":1}", Kind::Object),
        (b"[1]", Kind::Array),
        (b"\"s\"", Kind::String),
        (b"null", Kind::Null),
        (b"\t\ntrue", Kind::True),
        (b"false", Kind::False),
        (b"-1", Kind::Number),
        (b"9", Kind::Number),
        (b"0.25", Kind::Number),
    ];
    for (doc, kind) in cases {
        assert_eq!(lazy(doc, opts).unwrap().kind(), kind);
    }
}

#[test]
fn keywords_are_verified_eagerly() {
    let opts = Options::default();
    assert_eq!(lazy(b"tru", opts).unwrap_err().kind, ErrorKind::InvalidJson);
    assert_eq!(lazy(b"nul", opts).unwrap_err().kind, ErrorKind::InvalidJson);
    assert_eq!(
        lazy(b"falsy", opts).unwrap_err().kind,
        ErrorKind::InvalidJson
    );
}

#[test]
fn unrecognized_leading_byte_fails() {
    let opts = Options::default();
    let err = lazy(b"  x", opts).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidJson);
    assert_eq!(err.pos, 2);
    assert_eq!(lazy(b"", opts).unwrap_err().kind, ErrorKind::UnexpectedEof);
    // NaN/Inf/+ start numbers only under float64.
    assert_eq!(lazy(b"NaN", opts).unwrap_err().kind, ErrorKind::InvalidJson);
    let f64_opts = Options {
        float64: true,
        ..Default::default()
    };
    assert_eq!(lazy(b"NaN", f64_opts).unwrap().kind(), Kind::Number);
    assert_eq!(lazy(b"+1", f64_opts).unwrap().kind(), Kind::Number);
}

#[test]
fn skip_lands_one_past_every_value() {
    let opts = Options::default();
    let docs: Vec<&[u8]> = vec![
        b"null",
        b"true",
        b"false",
        b"12345",
        b"-1.5e3",
        b"\"a\\\"b\"",
        b"[]",
        b"{}",
        b"[1, [2, {\"a\": null}], \"x\"]",
        b"{\"k\": {\"n\": [true, false]}, \"m\": 2}",
    ];
    for doc in docs {
        let v = lazy(doc, opts).unwrap();
        assert_eq!(
            v.skip().unwrap(),
            doc.len(),
            "skip over {}",
            String::from_utf8_lossy(doc)
        );
    }
}

#[test]
fn grammar_errors_carry_kind_and_position() {
    let opts = Options::default();

    let err = materialize(lazy(br#"{"a"1}"#, opts).unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedColon);
    assert_eq!(err.pos, 4);

    let err = materialize(lazy(b"[1 2]", opts).unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedComma);

    // No trailing comma: a '}' directly after ',' is rejected at the key.
    let err = materialize(lazy(br#"{"a":1,}"#, opts).unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedOpeningQuoteChar);

    let err = materialize(lazy(b"[1,]", opts).unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidJson);

    let err = materialize(lazy(br#"{"a" : }"#, opts).unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidJson);

    let err = materialize(lazy(b"\"abc", opts).unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEof);

    let err = materialize(lazy(b"[true", opts).unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEof);
}

#[test]
fn top_level_trailing_bytes_are_rejected() {
    let opts = Options::default();
    let err = materialize(lazy(b"1 x", opts).unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidChar);
    assert_eq!(err.pos, 2);

    let err = materialize(lazy(br#"{"a":1} {"b":2}"#, opts).unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidChar);

    // Trailing whitespace is fine.
    assert!(materialize(lazy(b" 1 \n", opts).unwrap()).is_ok());
}

#[test]
fn strings_decode_on_demand() {
    let opts = Options::default();
    let v = lazy(br#""plain""#, opts).unwrap();
    let s = v.apply_string().unwrap();
    assert!(!s.is_escaped());
    assert_eq!(s.decode().unwrap(), "plain");

    let v = lazy(br#""a\"b\u00e9\n""#, opts).unwrap();
    let s = v.apply_string().unwrap();
    assert!(s.is_escaped());
    assert_eq!(s.decode().unwrap(), "a\"b\u{e9}\n");
}

#[test]
fn integer_magnitudes_stay_on_the_narrowest_rung() {
    let opts = Options::default();
    let value = materialize(lazy(b"[1, 9223372036854775807, -5, 0]", opts).unwrap()).unwrap();
    match value {
        Value::Array(items) => {
            for item in items {
                assert!(matches!(item, Value::Int(_)), "not an Int: {item:?}");
            }
        }
        _ => unreachable!(),
    }

    let value = materialize(lazy(b"9223372036854775808", opts).unwrap()).unwrap();
    assert_eq!(value, Value::UInt(9223372036854775808));

    let value = materialize(lazy(b"18446744073709551616", opts).unwrap()).unwrap();
    assert_eq!(value, Value::BigInt(18446744073709551616));
}

#[test]
fn float64_mode_forces_floats_and_extends_the_grammar() {
    let opts = Options {
        float64: true,
        ..Default::default()
    };
    let value = materialize(lazy(b"[2, +5, -Inf, NaN]", opts).unwrap()).unwrap();
    match value {
        Value::Array(items) => {
            assert_eq!(items[0], Value::Float(2.0));
            assert_eq!(items[1], Value::Float(5.0));
            assert_eq!(items[2], Value::Float(f64::NEG_INFINITY));
            assert!(matches!(items[3], Value::Float(f) if f.is_nan()));
        }
        _ => unreachable!(),
    }
}

#[test]
fn object_views_count_and_get() {
    let opts = Options::default();
    let v = lazy(br#"{"a": 1, "b\n": 2, "c": [3]}"#, opts).unwrap();
    let obj = v.object().unwrap();
    assert_eq!(obj.len().unwrap(), 3);
    assert!(!obj.is_empty().unwrap());
    // Escaped keys compare decoded.
    let hit = obj.get("b\n").unwrap().unwrap();
    assert_eq!(materialize(hit).unwrap(), Value::Int(2));
    assert!(obj.get("missing").unwrap().is_none());

    let arr = obj.get("c").unwrap().unwrap().array().unwrap();
    assert_eq!(arr.len().unwrap(), 1);
    let first = arr.get(0).unwrap().unwrap();
    assert_eq!(materialize(first).unwrap(), Value::Int(3));
}
