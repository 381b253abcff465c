//! Selection: apply_each, path navigation, predicates, short-circuiting.

use jsontape::{
    binary_from_slice, find, find_all, find_index, find_key, lazy, materialize, shallow_reader,
    Applied, Entry, ErrorKind, Num, Options, Seg, Step, Value, View,
};

fn opts() -> Options {
    Options::default()
}

const DOC: &[u8] = br#"{"store": {"books": [{"title": "Dune", "pages": 412}, {"title": "Solaris", "pages": 204}]}}"#;

#[test]
fn paths_walk_both_views() {
    let path = [
        Seg::Key("store"),
        Seg::Key("books"),
        Seg::Index(1),
        Seg::Key("title"),
    ];

    let v = lazy(DOC, opts()).unwrap();
    let hit = find(v, &path).unwrap();
    assert_eq!(hit.apply_string().unwrap().decode().unwrap(), "Solaris");

    let tape = binary_from_slice(DOC, opts()).unwrap();
    let hit = find(tape.view(), &path).unwrap();
    assert_eq!(hit.apply_string().unwrap().decode().unwrap(), "Solaris");
}

#[test]
fn missing_steps_report_selection_errors() {
    let v = lazy(DOC, opts()).unwrap();
    assert_eq!(
        find(v, &[Seg::Key("shop")]).unwrap_err().kind,
        ErrorKind::KeyNotFound
    );
    assert_eq!(
        find(v, &[Seg::Key("store"), Seg::Key("books"), Seg::Index(9)])
            .unwrap_err()
            .kind,
        ErrorKind::IndexOutOfBounds
    );
}

#[test]
fn scalars_are_not_selectable() {
    let v = lazy(b"42", opts()).unwrap();
    let err = v
        .apply_each::<(), _>(|_, _| Ok(Step::Continue(0)))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
}

#[test]
fn short_circuit_stops_the_traversal() {
    let v = lazy(br#"[10, 20, 30, 40]"#, opts()).unwrap();
    let mut visited = 0usize;
    let applied = v
        .apply_each(|entry, child| {
            visited += 1;
            match entry {
                Entry::Index(1) => Ok(Step::Halt(child)),
                _ => Ok(Step::Continue(0)),
            }
        })
        .unwrap();
    // Members after the halt are never visited.
    assert_eq!(visited, 2);
    let hit = applied.halted().expect("halted");
    assert_eq!(hit.apply_number().unwrap(), Num::Int(20));
}

#[test]
fn callbacks_can_absorb_the_child_position() {
    let v = lazy(br#"[1, [2, 3], 4]"#, opts()).unwrap();
    let applied = v
        .apply_array::<core::convert::Infallible, _>(|_, child| {
            // Hand the terminal position back so the driver does not skip.
            Ok(Step::Continue(child.skip()?))
        })
        .unwrap();
    match applied {
        Applied::Complete(end) => assert_eq!(end, 14),
        Applied::Halted(never) => match never {},
    }
}

#[test]
fn predicates_collect_matches_in_order() {
    let v = lazy(br#"{"a": 1, "bb": 2, "c": 3, "dd": 4}"#, opts()).unwrap();
    let long_keys = find_all(v, |entry, _| match entry {
        Entry::Key(k) => k.raw().len() > 1,
        Entry::Index(_) => false,
    })
    .unwrap();
    let values: Vec<Value> = long_keys
        .into_iter()
        .map(|child| materialize(child).unwrap())
        .collect();
    assert_eq!(values, vec![Value::Int(2), Value::Int(4)]);
}

#[test]
fn shallow_readers_are_reusable() {
    let path = [Seg::Key("store"), Seg::Key("books"), Seg::Index(0)];
    let reader = shallow_reader(&path);

    let v = lazy(DOC, opts()).unwrap();
    let first = reader(v).unwrap();
    assert_eq!(
        materialize(find_key(first, "pages").unwrap()).unwrap(),
        Value::Int(412)
    );

    let other = br#"{"store": {"books": [{"pages": 7}]}}"#;
    let v = lazy(other, opts()).unwrap();
    let first = reader(v).unwrap();
    assert_eq!(
        materialize(find_key(first, "pages").unwrap()).unwrap(),
        Value::Int(7)
    );
}

#[test]
fn find_index_walks_arrays() {
    let v = lazy(b"[\"a\", \"b\", \"c\"]", opts()).unwrap();
    let hit = find_index(v, 2).unwrap();
    assert_eq!(hit.apply_string().unwrap().decode().unwrap(), "c");
}
