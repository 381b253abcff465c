//! The binary writer: one traversal of any view onto a tape.

use core::convert::Infallible;

use jsontape_buffers::Writer;

use crate::binary::{make_tag, Tape};
use crate::error::{Error, ErrorKind, Result};
use crate::kind::{self, Kind};
use crate::lazy::lazy;
use crate::num::Num;
use crate::options::Options;
use crate::ptr_str::PtrStr;
use crate::view::{must_complete, Step, View};

/// Re-encodes a view onto a fresh tape.
///
/// Numbers are eagerly re-classified into `Int`/`Float` on the narrowest
/// width class; escaped source strings are decoded before writing.
/// Container length and count fields are written as placeholders and
/// patched once the children are on the tape. Encoding a binary view is
/// byte-stable.
///
/// # Example
///
/// ```
/// use jsontape::{binary, lazy, materialize, Options};
///
/// let opts = Options::default();
/// let tape = binary(lazy(b"[1, 2.5, \"x\"]", opts).unwrap()).unwrap();
/// let value = materialize(tape.view()).unwrap();
/// assert_eq!(value, materialize(lazy(b"[1, 2.5, \"x\"]", opts).unwrap()).unwrap());
/// ```
pub fn binary<V: View>(v: V) -> Result<Tape> {
    let mut w = Writer::new();
    let end = write_value(&mut w, v)?;
    v.check_root(end)?;
    Tape::from_bytes(w.into_vec(), v.opts())
}

/// Parses `buf` lazily and re-encodes it onto a tape in one pass.
pub fn binary_from_slice(buf: &[u8], opts: Options) -> Result<Tape> {
    binary(lazy(buf, opts)?)
}

fn write_value<V: View>(w: &mut Writer, v: V) -> Result<usize> {
    match v.kind() {
        Kind::Null => {
            w.u8(make_tag(kind::TAG_NULL, 0));
            v.skip()
        }
        Kind::True => {
            w.u8(make_tag(kind::TAG_TRUE, 0));
            v.skip()
        }
        Kind::False => {
            w.u8(make_tag(kind::TAG_FALSE, 0));
            v.skip()
        }
        Kind::String => {
            let s = v.apply_string()?;
            write_string(w, &s)?;
            v.skip()
        }
        Kind::Number | Kind::Int | Kind::Float => {
            write_num(w, v.apply_number()?);
            v.skip()
        }
        Kind::Object => {
            let start = w.pos();
            w.u8(make_tag(kind::TAG_OBJECT, 0));
            w.u32(0);
            w.u32(0);
            let mut count = 0u32;
            let applied = v.apply_object::<Infallible, _>(|key, child| {
                write_string(w, &key)?;
                let end = write_value(w, child)?;
                count += 1;
                Ok(Step::Continue(end))
            })?;
            let end = must_complete(applied);
            let total = (w.pos() - start) as u32;
            w.patch_u32(start + 1, total);
            w.patch_u32(start + 5, count);
            Ok(end)
        }
        Kind::Array => {
            let start = w.pos();
            w.u8(make_tag(kind::TAG_ARRAY, 0));
            w.u32(0);
            w.u32(0);
            let mut count = 0u32;
            let applied = v.apply_array::<Infallible, _>(|_, child| {
                let end = write_value(w, child)?;
                count += 1;
                Ok(Step::Continue(end))
            })?;
            let end = must_complete(applied);
            let total = (w.pos() - start) as u32;
            w.patch_u32(start + 1, total);
            w.patch_u32(start + 5, count);
            Ok(end)
        }
    }
}

fn write_string(w: &mut Writer, s: &PtrStr<'_>) -> Result<()> {
    w.u8(make_tag(kind::TAG_STRING, 0));
    if s.is_escaped() {
        let decoded = s.decode()?;
        w.u32(decoded.len() as u32);
        w.buf(decoded.as_bytes());
    } else {
        core::str::from_utf8(s.raw())
            .map_err(|_| Error::new(ErrorKind::InvalidChar, s.offset()).ctx("string"))?;
        w.u32(s.raw().len() as u32);
        w.buf(s.raw());
    }
    Ok(())
}

fn write_num(w: &mut Writer, n: Num) {
    match n {
        Num::Int(i) => write_int(w, i as i128),
        Num::UInt(u) => write_int(w, u as i128),
        Num::BigInt(i) => write_int(w, i),
        Num::Float(f) => {
            // binary32 only when the value survives the round-trip exactly.
            if (f as f32) as f64 == f {
                w.u8(make_tag(kind::TAG_FLOAT, 0));
                w.f32(f as f32);
            } else {
                w.u8(make_tag(kind::TAG_FLOAT, 1));
                w.f64(f);
            }
        }
    }
}

fn write_int(w: &mut Writer, v: i128) {
    if let Ok(i) = i8::try_from(v) {
        w.u8(make_tag(kind::TAG_INT, 0));
        w.i8(i);
    } else if let Ok(i) = i16::try_from(v) {
        w.u8(make_tag(kind::TAG_INT, 1));
        w.i16(i);
    } else if let Ok(i) = i32::try_from(v) {
        w.u8(make_tag(kind::TAG_INT, 2));
        w.i32(i);
    } else if let Ok(i) = i64::try_from(v) {
        w.u8(make_tag(kind::TAG_INT, 3));
        w.i64(i);
    } else {
        w.u8(make_tag(kind::TAG_INT, 4));
        w.i128(v);
    }
}
