//! The traversal protocol shared by the lazy and binary views.
//!
//! Every consumer (materializers, counters, selectors, the binary writer)
//! drives values through the same `apply_*` surface with the same callback
//! contract, so they share code paths without allocation.

use core::convert::Infallible;

use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::num::Num;
use crate::options::Options;
use crate::ptr_str::PtrStr;

/// Callback verdict for the `apply_*` drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    /// `Continue(0)`: the callback did not consume the child; the driver
    /// calls `skip` on it. `Continue(n)` with `n > 0`: the callback already
    /// advanced to byte `n` and the driver resumes there.
    Continue(usize),
    /// Short-circuit: the driver stops and propagates the payload upward
    /// unchanged.
    Halt(T),
}

/// Driver outcome of an `apply_*` traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied<T> {
    /// The whole value was traversed; the payload is the position one past
    /// its end.
    Complete(usize),
    /// A callback halted the traversal.
    Halted(T),
}

impl<T> Applied<T> {
    /// The halt payload, if any.
    pub fn halted(self) -> Option<T> {
        match self {
            Applied::Halted(t) => Some(t),
            Applied::Complete(_) => None,
        }
    }
}

/// Extracts the end position from a traversal that cannot halt.
pub(crate) fn must_complete(applied: Applied<Infallible>) -> usize {
    match applied {
        Applied::Complete(end) => end,
        Applied::Halted(never) => match never {},
    }
}

/// One member delivered by [`View::apply_each`]: an object key or an array
/// index.
#[derive(Debug, Clone, Copy)]
pub enum Entry<'k> {
    Key(PtrStr<'k>),
    Index(usize),
}

/// The uniform traversal surface over a JSON representation.
///
/// Implemented by [`LazyValue`](crate::LazyValue) (cursor over raw JSON
/// text) and [`BinaryValue`](crate::BinaryValue) (cursor over a binary
/// tape). Views are cheap `Copy` cursors; traversing one never mutates it.
pub trait View: Copy {
    /// The value's kind tag.
    fn kind(&self) -> Kind;

    /// Absolute byte position of the value's first byte.
    fn pos(&self) -> usize;

    /// The options this view was created with.
    fn opts(&self) -> Options;

    /// Iterates the members of an object, delivering each key and child to
    /// the callback.
    fn apply_object<T, F>(&self, f: F) -> Result<Applied<T>>
    where
        F: FnMut(PtrStr<'_>, Self) -> Result<Step<T>>;

    /// Iterates the elements of an array, delivering each index and child
    /// to the callback.
    fn apply_array<T, F>(&self, f: F) -> Result<Applied<T>>
    where
        F: FnMut(usize, Self) -> Result<Step<T>>;

    /// The string body at this value. Escapes are not decoded here.
    fn apply_string(&self) -> Result<PtrStr<'_>>;

    /// The number at this value, on the narrowest rung of the ladder.
    fn apply_number(&self) -> Result<Num>;

    /// Position one past this value. O(1) on binary composites, a scan on
    /// lazy ones.
    fn skip(&self) -> Result<usize>;

    /// For a root view, verifies nothing but whitespace follows `end`.
    /// No-op on child views.
    fn check_root(&self, end: usize) -> Result<()>;

    /// Dispatches to `apply_object` or `apply_array`; scalars are not
    /// selectable.
    fn apply_each<T, F>(&self, mut f: F) -> Result<Applied<T>>
    where
        F: FnMut(Entry<'_>, Self) -> Result<Step<T>>,
    {
        match self.kind() {
            Kind::Object => self.apply_object(|key, child| f(Entry::Key(key), child)),
            Kind::Array => self.apply_array(|index, child| f(Entry::Index(index), child)),
            kind => Err(Error::mismatch("object or array", kind, self.pos())),
        }
    }

    /// Projects this view as an object.
    fn object(self) -> Result<ObjectView<Self>> {
        if self.kind() != Kind::Object {
            return Err(Error::mismatch("object", self.kind(), self.pos()).ctx("object"));
        }
        Ok(ObjectView { v: self })
    }

    /// Projects this view as an array.
    fn array(self) -> Result<ArrayView<Self>> {
        if self.kind() != Kind::Array {
            return Err(Error::mismatch("array", self.kind(), self.pos()).ctx("array"));
        }
        Ok(ArrayView { v: self })
    }
}

/// An object projection of a view. Operations re-parse on each call and are
/// O(members).
#[derive(Debug, Clone, Copy)]
pub struct ObjectView<V> {
    v: V,
}

impl<V: View> ObjectView<V> {
    /// The underlying view.
    pub fn value(&self) -> V {
        self.v
    }

    /// Number of members, by a counting pass.
    pub fn len(&self) -> Result<usize> {
        let mut n = 0usize;
        let applied = self.v.apply_object::<Infallible, _>(|_, _| {
            n += 1;
            Ok(Step::Continue(0))
        })?;
        let _ = must_complete(applied);
        Ok(n)
    }

    /// Whether the object has no members.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// The child under `key`, if present. On duplicate keys the first match
    /// wins (the traversal short-circuits).
    pub fn get(&self, key: &str) -> Result<Option<V>> {
        let applied = self.v.apply_object(|k, child| {
            Ok(if k.matches(key) {
                Step::Halt(child)
            } else {
                Step::Continue(0)
            })
        })?;
        Ok(applied.halted())
    }

    /// Ordered iteration; same callback contract as `apply_object`.
    pub fn each<T, F>(&self, f: F) -> Result<Applied<T>>
    where
        F: FnMut(PtrStr<'_>, V) -> Result<Step<T>>,
    {
        self.v.apply_object(f)
    }
}

/// An array projection of a view. Operations re-parse on each call and are
/// O(elements).
#[derive(Debug, Clone, Copy)]
pub struct ArrayView<V> {
    v: V,
}

impl<V: View> ArrayView<V> {
    /// The underlying view.
    pub fn value(&self) -> V {
        self.v
    }

    /// Number of elements, by a counting pass.
    pub fn len(&self) -> Result<usize> {
        let mut n = 0usize;
        let applied = self.v.apply_array::<Infallible, _>(|_, _| {
            n += 1;
            Ok(Step::Continue(0))
        })?;
        let _ = must_complete(applied);
        Ok(n)
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// The element at `index`, if present.
    pub fn get(&self, index: usize) -> Result<Option<V>> {
        let applied = self.v.apply_array(|i, child| {
            Ok(if i == index {
                Step::Halt(child)
            } else {
                Step::Continue(0)
            })
        })?;
        Ok(applied.halted())
    }

    /// Ordered iteration; same callback contract as `apply_array`.
    pub fn each<T, F>(&self, f: F) -> Result<Applied<T>>
    where
        F: FnMut(usize, V) -> Result<Step<T>>,
    {
        self.v.apply_array(f)
    }
}
