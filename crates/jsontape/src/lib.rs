//! Three cooperating representations of a JSON document:
//!
//! - a **lazy view** ([`LazyValue`]): a cursor over the original text that
//!   validates and sub-parses on demand;
//! - a **binary view** ([`Tape`] / [`BinaryValue`]): a compact,
//!   self-describing re-encoding with O(1) composite skipping and typed
//!   numeric storage;
//! - **materialized values**: generic [`Value`] trees or caller-defined
//!   record types built through the [`Materialize`] trait and the
//!   [`record!`] macro.
//!
//! All three share one traversal protocol (the [`View`] trait and its
//! `apply_*` drivers), so materializers, counters, selectors and the binary
//! writer run on the same code paths.
//!
//! # Example
//!
//! ```
//! use jsontape::{binary, lazy, materialize, Options, Value};
//!
//! let doc = br#"{"name": "deep thought", "answer": 42}"#;
//! let opts = Options::default();
//!
//! // Materialize straight from the text...
//! let direct = materialize(lazy(doc, opts).unwrap()).unwrap();
//!
//! // ...or go through the binary tape; the result is the same.
//! let tape = binary(lazy(doc, opts).unwrap()).unwrap();
//! assert_eq!(materialize(tape.view()).unwrap(), direct);
//!
//! match direct {
//!     Value::Object(map) => assert_eq!(map["answer"], Value::Int(42)),
//!     _ => unreachable!(),
//! }
//! ```

mod binary;
mod error;
mod kind;
mod lazy;
mod materialize;
mod matrix;
mod num;
mod options;
mod ptr_str;
mod record;
mod scan;
mod select;
mod view;

pub use binary::{binary, binary_from_slice, BinaryValue, Tape};
pub use error::{Error, ErrorKind, Result};
pub use kind::Kind;
pub use lazy::{lazy, LazyValue};
pub use materialize::{materialize, materialize_with, Factory, Map, Value, ValueFactory};
pub use matrix::Matrix;
pub use num::Num;
pub use options::Options;
pub use ptr_str::PtrStr;
pub use record::{materialize_as, materialize_into, Materialize, MaterializeInto, Maybe};
pub use select::{find, find_all, find_index, find_key, shallow_reader, Seg};
pub use view::{Applied, ArrayView, Entry, ObjectView, Step, View};
