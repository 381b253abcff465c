//! The generic materializer: builds container trees from either view.

use core::convert::Infallible;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::kind::Kind;
use crate::num::Num;
use crate::view::{must_complete, Step, View};

/// The default map behind [`Value::Object`]. Insertion order is not
/// preserved; duplicate keys resolve last-write-wins.
pub type Map = BTreeMap<String, Value>;

/// A materialized generic JSON value.
///
/// Numbers land on the narrowest rung of the ladder: a value fitting `i64`
/// never appears as `i128`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    BigInt(i128),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Returns `true` if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The value as `i64`, if it is an integer rung that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            Value::BigInt(i) => i64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// The value as `f64`, for any numeric rung.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            Value::BigInt(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The value as `&str`, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Num> for Value {
    fn from(n: Num) -> Self {
        match n {
            Num::Int(i) => Value::Int(i),
            Num::UInt(u) => Value::UInt(u),
            Num::BigInt(i) => Value::BigInt(i),
            Num::Float(f) => Value::Float(f),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::json!(i),
            Value::UInt(u) => serde_json::json!(u),
            // serde_json has no native i128; fit-check, then lose precision.
            Value::BigInt(i) => {
                if let Ok(v) = i64::try_from(i) {
                    serde_json::json!(v)
                } else if let Ok(v) = u64::try_from(i) {
                    serde_json::json!(v)
                } else {
                    serde_json::json!(i as f64)
                }
            }
            Value::Float(f) => serde_json::json!(f),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Container constructor hooks driving the generic materializer.
///
/// The default [`ValueFactory`] produces [`Value`]; callers can supply any
/// container family compatible with the insert/push protocols.
pub trait Factory {
    type Value;
    type Object;
    type Array;

    fn new_object(&self) -> Self::Object;
    fn insert(&self, obj: &mut Self::Object, key: String, val: Self::Value);
    fn finish_object(&self, obj: Self::Object) -> Self::Value;

    fn new_array(&self) -> Self::Array;
    fn push(&self, arr: &mut Self::Array, val: Self::Value);
    fn finish_array(&self, arr: Self::Array) -> Self::Value;

    fn string(&self, s: String) -> Self::Value;
    fn number(&self, n: Num) -> Self::Value;
    fn boolean(&self, b: bool) -> Self::Value;
    fn null(&self) -> Self::Value;
}

/// The default factory, producing [`Value`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueFactory;

impl Factory for ValueFactory {
    type Value = Value;
    type Object = Map;
    type Array = Vec<Value>;

    fn new_object(&self) -> Map {
        Map::new()
    }

    fn insert(&self, obj: &mut Map, key: String, val: Value) {
        obj.insert(key, val);
    }

    fn finish_object(&self, obj: Map) -> Value {
        Value::Object(obj)
    }

    fn new_array(&self) -> Vec<Value> {
        Vec::new()
    }

    fn push(&self, arr: &mut Vec<Value>, val: Value) {
        arr.push(val);
    }

    fn finish_array(&self, arr: Vec<Value>) -> Value {
        Value::Array(arr)
    }

    fn string(&self, s: String) -> Value {
        Value::Str(s)
    }

    fn number(&self, n: Num) -> Value {
        Value::from(n)
    }

    fn boolean(&self, b: bool) -> Value {
        Value::Bool(b)
    }

    fn null(&self) -> Value {
        Value::Null
    }
}

/// Materializes a view into a generic [`Value`] tree.
///
/// For a root view this also verifies that nothing but whitespace follows
/// the value.
///
/// # Example
///
/// ```
/// use jsontape::{lazy, materialize, Options, Value};
///
/// let v = lazy(br#"{"a": 1}"#, Options::default()).unwrap();
/// let value = materialize(v).unwrap();
/// match value {
///     Value::Object(map) => assert_eq!(map["a"], Value::Int(1)),
///     _ => unreachable!(),
/// }
/// ```
pub fn materialize<V: View>(v: V) -> Result<Value> {
    materialize_with(v, &ValueFactory)
}

/// Materializes a view through caller-supplied container hooks.
pub fn materialize_with<V: View, F: Factory>(v: V, factory: &F) -> Result<F::Value> {
    let (val, end) = build(v, factory)?;
    v.check_root(end)?;
    Ok(val)
}

pub(crate) fn build<V: View, F: Factory>(v: V, factory: &F) -> Result<(F::Value, usize)> {
    match v.kind() {
        Kind::Object => {
            let mut obj = factory.new_object();
            let applied = v.apply_object::<Infallible, _>(|key, child| {
                let key = key.decode()?;
                let (val, end) = build(child, factory)?;
                factory.insert(&mut obj, key, val);
                Ok(Step::Continue(end))
            })?;
            Ok((factory.finish_object(obj), must_complete(applied)))
        }
        Kind::Array => {
            let mut arr = factory.new_array();
            let applied = v.apply_array::<Infallible, _>(|_, child| {
                let (val, end) = build(child, factory)?;
                factory.push(&mut arr, val);
                Ok(Step::Continue(end))
            })?;
            Ok((factory.finish_array(arr), must_complete(applied)))
        }
        Kind::String => {
            let s = v.apply_string()?.decode()?;
            Ok((factory.string(s), v.skip()?))
        }
        Kind::Number | Kind::Int | Kind::Float => {
            Ok((factory.number(v.apply_number()?), v.skip()?))
        }
        Kind::True => Ok((factory.boolean(true), v.skip()?)),
        Kind::False => Ok((factory.boolean(false), v.skip()?)),
        Kind::Null => Ok((factory.null(), v.skip()?)),
    }
}
