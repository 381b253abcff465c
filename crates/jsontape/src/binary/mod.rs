//! The binary view: a compact, self-describing re-encoding of a JSON value
//! with O(1) composite skipping.
//!
//! A value starts with one tag byte (low nibble kind, high nibble size
//! class) followed by its payload. Composites carry a `u32`
//! total-byte-length (the entire value including the tag) and a `u32`
//! member/element count, which is the only mechanism behind O(1) `skip`.
//! All multi-byte payloads are little-endian.

mod encoder;

pub use encoder::{binary, binary_from_slice};

use core::convert::Infallible;

use jsontape_buffers::Reader;

use crate::error::{Error, ErrorKind, Result};
use crate::kind::{self, Kind};
use crate::num::Num;
use crate::options::Options;
use crate::ptr_str::PtrStr;
use crate::view::{must_complete, Applied, Step, View};

pub(crate) fn make_tag(kind_nibble: u8, class: u8) -> u8 {
    (class << 4) | kind_nibble
}

/// The owned byte buffer backing a binary view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    bytes: Vec<u8>,
    kind: Kind,
    opts: Options,
}

impl Tape {
    /// Wraps pre-encoded tape bytes, rejecting an unrecognized root tag
    /// with `InvalidBinaryTag`.
    pub fn from_bytes(bytes: Vec<u8>, opts: Options) -> Result<Tape> {
        let root = BinaryValue::at(&bytes, 0, opts, true)?;
        let kind = root.kind;
        Ok(Tape { bytes, kind, opts })
    }

    /// The raw tape bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the tape, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The options the tape was produced with.
    pub fn opts(&self) -> Options {
        self.opts
    }

    /// The root cursor over this tape.
    pub fn view(&self) -> BinaryValue<'_> {
        BinaryValue {
            tape: &self.bytes,
            pos: 0,
            kind: self.kind,
            opts: self.opts,
            root: true,
        }
    }

    /// Deep-validates the tape: every tag recognized, every length
    /// consistent, and exactly one value spanning the whole buffer.
    pub fn validate(&self) -> Result<()> {
        let end = validate_value(self.view())?;
        if end != self.bytes.len() {
            return Err(Error::new(ErrorKind::InvalidChar, end));
        }
        Ok(())
    }
}

fn validate_value(v: BinaryValue<'_>) -> Result<usize> {
    match v.kind {
        Kind::Object => {
            let applied = v.apply_object::<Infallible, _>(|_, child| {
                Ok(Step::Continue(validate_value(child)?))
            })?;
            Ok(must_complete(applied))
        }
        Kind::Array => {
            let applied = v.apply_array::<Infallible, _>(|_, child| {
                Ok(Step::Continue(validate_value(child)?))
            })?;
            Ok(must_complete(applied))
        }
        _ => v.skip(),
    }
}

/// A cursor over a binary tape.
///
/// Borrowed from a [`Tape`]; the tag at `pos` encodes the kind. Composite
/// skipping reads the embedded total-byte-length and is O(1).
#[derive(Debug, Clone, Copy)]
pub struct BinaryValue<'a> {
    tape: &'a [u8],
    pos: usize,
    kind: Kind,
    opts: Options,
    root: bool,
}

impl<'a> BinaryValue<'a> {
    pub(crate) fn at(tape: &'a [u8], pos: usize, opts: Options, root: bool) -> Result<Self> {
        let tag = *tape
            .get(pos)
            .ok_or_else(|| Error::eof(pos))?;
        let kind = Kind::from_tag_nibble(tag & 0x0F)
            .ok_or_else(|| Error::new(ErrorKind::InvalidBinaryTag, pos))?;
        let class = tag >> 4;
        let class_ok = match kind {
            Kind::Int => class <= 4,
            Kind::Float => class <= 1,
            _ => class == 0,
        };
        if !class_ok {
            return Err(Error::new(ErrorKind::InvalidBinaryTag, pos));
        }
        Ok(Self {
            tape,
            pos,
            kind,
            opts,
            root,
        })
    }

    fn class(&self) -> u8 {
        self.tape[self.pos] >> 4
    }

    fn check(&self, at: usize, n: usize) -> Result<()> {
        if at + n > self.tape.len() {
            return Err(Error::eof(self.tape.len()));
        }
        Ok(())
    }

    fn u32_at(&self, at: usize) -> Result<u32> {
        self.check(at, 4)?;
        Ok(Reader::at(self.tape, at).u32())
    }

    /// The member/element count stored in this composite's header. O(1).
    pub fn count(&self) -> Result<u32> {
        if !self.kind.is_container() {
            return Err(Error::mismatch("object or array", self.kind, self.pos));
        }
        self.u32_at(self.pos + 5)
    }

    fn child(&self, x: usize) -> Result<BinaryValue<'a>> {
        BinaryValue::at(self.tape, x, self.opts, false)
    }

    /// Reads a String-tagged key at `x`, returning the body and the
    /// position past it.
    fn read_key(&self, x: usize) -> Result<(PtrStr<'a>, usize)> {
        let tag = *self
            .tape
            .get(x)
            .ok_or_else(|| Error::eof(x).ctx("object"))?;
        if tag != make_tag(kind::TAG_STRING, 0) {
            return Err(Error::new(ErrorKind::InvalidBinaryTag, x).ctx("object"));
        }
        let len = self.u32_at(x + 1)? as usize;
        self.check(x + 5, len)?;
        let body = &self.tape[x + 5..x + 5 + len];
        Ok((PtrStr::new(body, x + 5, false), x + 5 + len))
    }

    /// Header of a composite: (position past the value, position of the
    /// first member, member count).
    fn container_header(&self) -> Result<(usize, usize, u32)> {
        let total = self.u32_at(self.pos + 1)? as usize;
        self.check(self.pos, total)?;
        let count = self.u32_at(self.pos + 5)?;
        Ok((self.pos + total, self.pos + 9, count))
    }
}

impl<'a> View for BinaryValue<'a> {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn opts(&self) -> Options {
        self.opts
    }

    fn apply_object<T, F>(&self, mut f: F) -> Result<Applied<T>>
    where
        F: FnMut(PtrStr<'_>, Self) -> Result<Step<T>>,
    {
        if self.kind != Kind::Object {
            return Err(Error::new(ErrorKind::ExpectedOpeningObjectChar, self.pos).ctx("object"));
        }
        let (end, mut x, count) = self.container_header()?;
        for _ in 0..count {
            let (key, after_key) = self.read_key(x)?;
            let child = self.child(after_key)?;
            match f(key, child)? {
                Step::Halt(t) => return Ok(Applied::Halted(t)),
                Step::Continue(0) => x = child.skip()?,
                Step::Continue(n) => x = n,
            }
        }
        if x != end {
            return Err(Error::new(ErrorKind::InvalidBinaryTag, x).ctx("object"));
        }
        Ok(Applied::Complete(end))
    }

    fn apply_array<T, F>(&self, mut f: F) -> Result<Applied<T>>
    where
        F: FnMut(usize, Self) -> Result<Step<T>>,
    {
        if self.kind != Kind::Array {
            return Err(Error::new(ErrorKind::ExpectedOpeningArrayChar, self.pos).ctx("array"));
        }
        let (end, mut x, count) = self.container_header()?;
        for index in 0..count as usize {
            let child = self.child(x)?;
            match f(index, child)? {
                Step::Halt(t) => return Ok(Applied::Halted(t)),
                Step::Continue(0) => x = child.skip()?,
                Step::Continue(n) => x = n,
            }
        }
        if x != end {
            return Err(Error::new(ErrorKind::InvalidBinaryTag, x).ctx("array"));
        }
        Ok(Applied::Complete(end))
    }

    fn apply_string(&self) -> Result<PtrStr<'_>> {
        if self.kind != Kind::String {
            return Err(Error::mismatch("string", self.kind, self.pos).ctx("string"));
        }
        let len = self.u32_at(self.pos + 1)? as usize;
        self.check(self.pos + 5, len)?;
        let body = &self.tape[self.pos + 5..self.pos + 5 + len];
        Ok(PtrStr::new(body, self.pos + 5, false))
    }

    fn apply_number(&self) -> Result<Num> {
        match self.kind {
            Kind::Int => {
                let width = 1usize << self.class();
                self.check(self.pos + 1, width)?;
                let mut r = Reader::at(self.tape, self.pos + 1);
                Ok(match self.class() {
                    0 => Num::Int(r.i8() as i64),
                    1 => Num::Int(r.i16() as i64),
                    2 => Num::Int(r.i32() as i64),
                    3 => Num::Int(r.i64()),
                    _ => Num::narrow_i128(r.i128()),
                })
            }
            Kind::Float => {
                if self.class() == 0 {
                    self.check(self.pos + 1, 4)?;
                    Ok(Num::Float(Reader::at(self.tape, self.pos + 1).f32() as f64))
                } else {
                    self.check(self.pos + 1, 8)?;
                    Ok(Num::Float(Reader::at(self.tape, self.pos + 1).f64()))
                }
            }
            kind => Err(Error::mismatch("number", kind, self.pos).ctx("number")),
        }
    }

    fn skip(&self) -> Result<usize> {
        match self.kind {
            Kind::Null | Kind::True | Kind::False => Ok(self.pos + 1),
            Kind::Int => {
                let width = 1usize << self.class();
                self.check(self.pos + 1, width)?;
                Ok(self.pos + 1 + width)
            }
            Kind::Float => {
                let width = if self.class() == 0 { 4 } else { 8 };
                self.check(self.pos + 1, width)?;
                Ok(self.pos + 1 + width)
            }
            Kind::String => {
                let len = self.u32_at(self.pos + 1)? as usize;
                self.check(self.pos + 5, len)?;
                Ok(self.pos + 5 + len)
            }
            Kind::Object | Kind::Array => {
                let total = self.u32_at(self.pos + 1)? as usize;
                self.check(self.pos, total)?;
                Ok(self.pos + total)
            }
            // Lazy-only kind; never stored on a tape.
            Kind::Number => Err(Error::new(ErrorKind::InvalidBinaryTag, self.pos)),
        }
    }

    fn check_root(&self, end: usize) -> Result<()> {
        if self.root && end != self.tape.len() {
            return Err(Error::new(ErrorKind::InvalidChar, end));
        }
        Ok(())
    }
}
