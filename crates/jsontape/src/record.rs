//! The record materializer: statically-shaped targets built from either
//! view through per-type field dispatch.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::materialize::{build, Value, ValueFactory};
use crate::view::{must_complete, Step, View};

/// A type that can be built from a JSON view.
///
/// `materialize` returns the constructed value together with the byte
/// position one past it, so container implementations can hand the driver
/// `Continue(end)` and avoid a redundant skip. Most callers use
/// [`materialize_as`] instead, which adds the root trailing-bytes check.
pub trait Materialize: Sized {
    fn materialize<V: View>(v: V) -> Result<(Self, usize)>;

    /// Whether a value of the given kind can materialize into `Self`.
    /// Drives `oneof` union dispatch.
    fn accepts(kind: Kind) -> bool {
        let _ = kind;
        true
    }
}

/// A pre-constructed mutable target populated member by member.
pub trait MaterializeInto {
    /// Fills `self` from the object at `v`, returning the position one past
    /// it. Members absent from the document keep their prior value.
    fn materialize_into<V: View>(&mut self, v: V) -> Result<usize>;
}

/// Materializes a view into `T`.
///
/// For a root view this also verifies that nothing but whitespace follows
/// the value.
pub fn materialize_as<T: Materialize, V: View>(v: V) -> Result<T> {
    let (value, end) = T::materialize(v)?;
    v.check_root(end)?;
    Ok(value)
}

/// Populates a pre-constructed mutable instance from a view.
pub fn materialize_into<T: MaterializeInto, V: View>(v: V, target: &mut T) -> Result<()> {
    let end = target.materialize_into(v)?;
    v.check_root(end)?;
    Ok(())
}

/// The absent-value sentinel for union-typed fields.
///
/// A missing member materializes as `Absent` (the default), JSON `null` as
/// `Null`, and anything else as `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maybe<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Maybe::Absent
    }
}

impl<T> Maybe<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Maybe::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Maybe::Null)
    }

    /// The payload, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Maybe::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl Materialize for bool {
    fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
        match v.kind() {
            Kind::True => Ok((true, v.skip()?)),
            Kind::False => Ok((false, v.skip()?)),
            kind => Err(Error::mismatch("bool", kind, v.pos())),
        }
    }

    fn accepts(kind: Kind) -> bool {
        matches!(kind, Kind::True | Kind::False)
    }
}

macro_rules! materialize_int {
    ($($ty:ty),+) => {$(
        impl Materialize for $ty {
            fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
                if !v.kind().is_number() {
                    return Err(Error::mismatch(stringify!($ty), v.kind(), v.pos()));
                }
                let n = v.apply_number()?;
                let value = n
                    .as_i128()
                    .and_then(|i| <$ty>::try_from(i).ok())
                    .ok_or_else(|| Error::mismatch(stringify!($ty), v.kind(), v.pos()))?;
                Ok((value, v.skip()?))
            }

            fn accepts(kind: Kind) -> bool {
                matches!(kind, Kind::Number | Kind::Int)
            }
        }
    )+};
}

materialize_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

macro_rules! materialize_float {
    ($($ty:ty),+) => {$(
        impl Materialize for $ty {
            fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
                if !v.kind().is_number() {
                    return Err(Error::mismatch(stringify!($ty), v.kind(), v.pos()));
                }
                let n = v.apply_number()?;
                Ok((n.as_f64() as $ty, v.skip()?))
            }

            fn accepts(kind: Kind) -> bool {
                kind.is_number()
            }
        }
    )+};
}

materialize_float!(f32, f64);

impl Materialize for String {
    fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
        if v.kind() != Kind::String {
            return Err(Error::mismatch("string", v.kind(), v.pos()));
        }
        let s = v.apply_string()?.decode()?;
        Ok((s, v.skip()?))
    }

    fn accepts(kind: Kind) -> bool {
        kind == Kind::String
    }
}

impl<T: Materialize> Materialize for Option<T> {
    fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
        if v.kind() == Kind::Null {
            return Ok((None, v.skip()?));
        }
        let (value, end) = T::materialize(v)?;
        Ok((Some(value), end))
    }

    fn accepts(kind: Kind) -> bool {
        kind == Kind::Null || T::accepts(kind)
    }
}

impl<T: Materialize> Materialize for Maybe<T> {
    fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
        if v.kind() == Kind::Null {
            return Ok((Maybe::Null, v.skip()?));
        }
        let (value, end) = T::materialize(v)?;
        Ok((Maybe::Value(value), end))
    }

    fn accepts(kind: Kind) -> bool {
        kind == Kind::Null || T::accepts(kind)
    }
}

impl<T: Materialize> Materialize for Vec<T> {
    fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
        if v.kind() != Kind::Array {
            return Err(Error::mismatch("array", v.kind(), v.pos()));
        }
        let mut out = Vec::new();
        let applied = v.apply_array::<core::convert::Infallible, _>(|_, child| {
            let (value, end) = T::materialize(child)?;
            out.push(value);
            Ok(Step::Continue(end))
        })?;
        Ok((out, must_complete(applied)))
    }

    fn accepts(kind: Kind) -> bool {
        kind == Kind::Array
    }
}

impl<T: Materialize> Materialize for BTreeMap<String, T> {
    fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
        if v.kind() != Kind::Object {
            return Err(Error::mismatch("object", v.kind(), v.pos()));
        }
        let mut out = BTreeMap::new();
        let applied = v.apply_object::<core::convert::Infallible, _>(|key, child| {
            let key = key.decode()?;
            let (value, end) = T::materialize(child)?;
            out.insert(key, value);
            Ok(Step::Continue(end))
        })?;
        Ok((out, must_complete(applied)))
    }

    fn accepts(kind: Kind) -> bool {
        kind == Kind::Object
    }
}

impl Materialize for Value {
    fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
        build(v, &ValueFactory)
    }
}

/// Generates a record type plus its [`Materialize`] implementation: the
/// per-type field dispatch is a compile-time match ladder over the
/// incoming keys.
///
/// Arms, one per construction strategy:
///
/// - **Named-field struct**: slots accumulate, construction by struct
///   literal. `as "key"` overrides the JSON key (the field name otherwise);
///   `= expr` supplies a default for missing members (`Default::default()`
///   otherwise, so each field type without an explicit default must
///   implement `Default`).
/// - **Tuple struct**: positional construction from the slots in
///   declaration order; the field names label the slots and default the
///   JSON keys.
/// - **`mutable struct`**: also generates `Default` (from the field
///   defaults; do not derive it) and [`MaterializeInto`], assigning members
///   as they arrive.
/// - **`enum`**: a string enum; variant names match case-insensitively.
/// - **`oneof`**: a union where the first variant whose payload type accepts
///   the JSON kind wins, with `null` biased to the null-admitting variant.
///
/// Unknown keys are skipped; duplicate keys overwrite (last write wins).
///
/// # Example
///
/// ```
/// use jsontape::{lazy, materialize_as, record, Options};
///
/// record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Point {
///         x: i64,
///         y: i64,
///         label: String as "name" = String::from("origin"),
///     }
/// }
///
/// let v = lazy(br#"{"y": 2, "x": 1}"#, Options::default()).unwrap();
/// let p: Point = materialize_as(v).unwrap();
/// assert_eq!(p, Point { x: 1, y: 2, label: "origin".into() });
/// ```
#[macro_export]
macro_rules! record {
    (@key $field:ident $key:literal) => {
        $key
    };
    (@key $field:ident) => {
        ::core::stringify!($field)
    };
    (@take $field:ident $default:expr) => {
        match $field {
            ::core::option::Option::Some(value) => value,
            ::core::option::Option::None => $default,
        }
    };
    (@take $field:ident) => {
        match $field {
            ::core::option::Option::Some(value) => value,
            ::core::option::Option::None => ::core::default::Default::default(),
        }
    };
    (@field_default $default:expr) => {
        $default
    };
    (@field_default) => {
        ::core::default::Default::default()
    };

    // Named-field struct: keyword construction.
    (
        $(#[$meta:meta])*
        $vis:vis struct $T:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(as $key:literal)? $(= $default:expr)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $T {
            $( $(#[$fmeta])* $fvis $field: $ty, )+
        }

        impl $crate::Materialize for $T {
            fn materialize<V: $crate::View>(view: V) -> $crate::Result<(Self, usize)> {
                $( let mut $field: ::core::option::Option<$ty> = ::core::option::Option::None; )+
                let applied = view.apply_object::<::core::convert::Infallible, _>(|key, child| {
                    $(
                        if key.matches($crate::record!(@key $field $($key)?)) {
                            let (value, end) =
                                <$ty as $crate::Materialize>::materialize(child)
                                    .map_err(|e| e.in_field($crate::record!(@key $field $($key)?)))?;
                            $field = ::core::option::Option::Some(value);
                            return ::core::result::Result::Ok($crate::Step::Continue(end));
                        }
                    )+
                    ::core::result::Result::Ok($crate::Step::Continue(0))
                })?;
                let end = match applied {
                    $crate::Applied::Complete(end) => end,
                    $crate::Applied::Halted(never) => match never {},
                };
                ::core::result::Result::Ok((
                    $T { $( $field: $crate::record!(@take $field $($default)?) ),+ },
                    end,
                ))
            }

            fn accepts(kind: $crate::Kind) -> bool {
                kind == $crate::Kind::Object
            }
        }
    };

    // Tuple struct: positional construction in declaration order.
    (
        $(#[$meta:meta])*
        $vis:vis struct $T:ident (
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(as $key:literal)? $(= $default:expr)?
            ),+ $(,)?
        );
    ) => {
        $(#[$meta])*
        $vis struct $T ( $( $(#[$fmeta])* $fvis $ty, )+ );

        impl $crate::Materialize for $T {
            fn materialize<V: $crate::View>(view: V) -> $crate::Result<(Self, usize)> {
                $( let mut $field: ::core::option::Option<$ty> = ::core::option::Option::None; )+
                let applied = view.apply_object::<::core::convert::Infallible, _>(|key, child| {
                    $(
                        if key.matches($crate::record!(@key $field $($key)?)) {
                            let (value, end) =
                                <$ty as $crate::Materialize>::materialize(child)
                                    .map_err(|e| e.in_field($crate::record!(@key $field $($key)?)))?;
                            $field = ::core::option::Option::Some(value);
                            return ::core::result::Result::Ok($crate::Step::Continue(end));
                        }
                    )+
                    ::core::result::Result::Ok($crate::Step::Continue(0))
                })?;
                let end = match applied {
                    $crate::Applied::Complete(end) => end,
                    $crate::Applied::Halted(never) => match never {},
                };
                ::core::result::Result::Ok((
                    $T ( $( $crate::record!(@take $field $($default)?) ),+ ),
                    end,
                ))
            }

            fn accepts(kind: $crate::Kind) -> bool {
                kind == $crate::Kind::Object
            }
        }
    };

    // Mutable struct: default-then-assign.
    (
        $(#[$meta:meta])*
        $vis:vis mutable struct $T:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(as $key:literal)? $(= $default:expr)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $T {
            $( $(#[$fmeta])* $fvis $field: $ty, )+
        }

        impl ::core::default::Default for $T {
            fn default() -> Self {
                Self { $( $field: $crate::record!(@field_default $($default)?) ),+ }
            }
        }

        impl $crate::MaterializeInto for $T {
            fn materialize_into<V: $crate::View>(&mut self, view: V) -> $crate::Result<usize> {
                let applied = view.apply_object::<::core::convert::Infallible, _>(|key, child| {
                    $(
                        if key.matches($crate::record!(@key $field $($key)?)) {
                            let (value, end) =
                                <$ty as $crate::Materialize>::materialize(child)
                                    .map_err(|e| e.in_field($crate::record!(@key $field $($key)?)))?;
                            self.$field = value;
                            return ::core::result::Result::Ok($crate::Step::Continue(end));
                        }
                    )+
                    ::core::result::Result::Ok($crate::Step::Continue(0))
                })?;
                match applied {
                    $crate::Applied::Complete(end) => ::core::result::Result::Ok(end),
                    $crate::Applied::Halted(never) => match never {},
                }
            }
        }

        impl $crate::Materialize for $T {
            fn materialize<V: $crate::View>(view: V) -> $crate::Result<(Self, usize)> {
                let mut out = <$T as ::core::default::Default>::default();
                let end = $crate::MaterializeInto::materialize_into(&mut out, view)?;
                ::core::result::Result::Ok((out, end))
            }

            fn accepts(kind: $crate::Kind) -> bool {
                kind == $crate::Kind::Object
            }
        }
    };

    // String enum: case-insensitive variant match.
    (
        $(#[$meta:meta])*
        $vis:vis enum $T:ident {
            $( $(#[$vmeta:meta])* $Var:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $T {
            $( $(#[$vmeta])* $Var, )+
        }

        impl $crate::Materialize for $T {
            fn materialize<V: $crate::View>(view: V) -> $crate::Result<(Self, usize)> {
                let s = view.apply_string()?.decode()?;
                let end = view.skip()?;
                $(
                    if s.eq_ignore_ascii_case(::core::stringify!($Var)) {
                        return ::core::result::Result::Ok(($T::$Var, end));
                    }
                )+
                ::core::result::Result::Err($crate::Error {
                    kind: $crate::ErrorKind::TypeMismatch {
                        expected: ::core::stringify!($T),
                        found: $crate::Kind::String,
                    },
                    pos: $crate::View::pos(&view),
                    context: "value",
                })
            }

            fn accepts(kind: $crate::Kind) -> bool {
                kind == $crate::Kind::String
            }
        }
    };

    // Union of variants: first variant whose type accepts the kind wins,
    // null biased to the null-admitting variant.
    (
        $(#[$meta:meta])*
        $vis:vis oneof $T:ident {
            $( $(#[$vmeta:meta])* $Var:ident ( $ty:ty ) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $T {
            $( $(#[$vmeta])* $Var($ty), )+
        }

        impl $crate::Materialize for $T {
            fn materialize<V: $crate::View>(view: V) -> $crate::Result<(Self, usize)> {
                let kind = $crate::View::kind(&view);
                if kind == $crate::Kind::Null {
                    $(
                        if <$ty as $crate::Materialize>::accepts($crate::Kind::Null) {
                            let (value, end) =
                                <$ty as $crate::Materialize>::materialize(view)?;
                            return ::core::result::Result::Ok(($T::$Var(value), end));
                        }
                    )+
                }
                $(
                    if <$ty as $crate::Materialize>::accepts(kind) {
                        let (value, end) = <$ty as $crate::Materialize>::materialize(view)?;
                        return ::core::result::Result::Ok(($T::$Var(value), end));
                    }
                )+
                ::core::result::Result::Err($crate::Error {
                    kind: $crate::ErrorKind::TypeMismatch {
                        expected: ::core::stringify!($T),
                        found: kind,
                    },
                    pos: $crate::View::pos(&view),
                    context: "value",
                })
            }

            fn accepts(kind: $crate::Kind) -> bool {
                false $( || <$ty as $crate::Materialize>::accepts(kind) )+
            }
        }
    };
}
