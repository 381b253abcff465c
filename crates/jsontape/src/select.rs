//! Path navigation over lazy and binary views without materialization.

use core::convert::Infallible;

use crate::error::{Error, ErrorKind, Result};
use crate::view::{must_complete, Entry, Step, View};

/// One step of a selection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seg<'s> {
    Key(&'s str),
    Index(usize),
}

/// Finds the child under `key`, short-circuiting the traversal at the first
/// match.
pub fn find_key<V: View>(v: V, key: &str) -> Result<V> {
    let pos = v.pos();
    let applied = v.apply_object(|k, child| {
        Ok(if k.matches(key) {
            Step::Halt(child)
        } else {
            Step::Continue(0)
        })
    })?;
    applied
        .halted()
        .ok_or_else(|| Error::new(ErrorKind::KeyNotFound, pos).ctx("object"))
}

/// Finds the element at `index`.
pub fn find_index<V: View>(v: V, index: usize) -> Result<V> {
    let pos = v.pos();
    let applied = v.apply_array(|i, child| {
        Ok(if i == index {
            Step::Halt(child)
        } else {
            Step::Continue(0)
        })
    })?;
    applied
        .halted()
        .ok_or_else(|| Error::new(ErrorKind::IndexOutOfBounds, pos).ctx("array"))
}

/// Walks a whole path, returning the view at its end.
///
/// # Example
///
/// ```
/// use jsontape::{find, lazy, Num, Options, Seg, View};
///
/// let v = lazy(br#"{"a": {"b": [10, 20]}}"#, Options::default()).unwrap();
/// let hit = find(v, &[Seg::Key("a"), Seg::Key("b"), Seg::Index(1)]).unwrap();
/// assert_eq!(hit.apply_number().unwrap(), Num::Int(20));
/// ```
pub fn find<V: View>(v: V, path: &[Seg<'_>]) -> Result<V> {
    let mut cur = v;
    for seg in path {
        cur = match seg {
            Seg::Key(key) => find_key(cur, key)?,
            Seg::Index(index) => find_index(cur, *index)?,
        };
    }
    Ok(cur)
}

/// Collects every direct child matching the predicate, in input order.
pub fn find_all<V: View, P>(v: V, mut pred: P) -> Result<Vec<V>>
where
    P: FnMut(&Entry<'_>, &V) -> bool,
{
    let mut out = Vec::new();
    let applied = v.apply_each::<Infallible, _>(|entry, child| {
        if pred(&entry, &child) {
            out.push(child);
        }
        Ok(Step::Continue(0))
    })?;
    let _ = must_complete(applied);
    Ok(out)
}

/// Builds a reusable walker for a fixed path.
///
/// The returned closure runs [`find`] over the captured path against any
/// view handed to it.
pub fn shallow_reader<'p, V: View>(path: &'p [Seg<'p>]) -> impl Fn(V) -> Result<V> + 'p {
    move |v: V| find(v, path)
}
