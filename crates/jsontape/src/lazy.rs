//! The lazy view: a cursor over raw JSON text that validates and sub-parses
//! on demand.

use core::convert::Infallible;

use crate::error::{Error, ErrorKind, Result};
use crate::kind::Kind;
use crate::num::Num;
use crate::options::Options;
use crate::ptr_str::PtrStr;
use crate::scan;
use crate::view::{Applied, Step, View};

/// A cursor over raw JSON bytes with the leading kind inferred but contents
/// unparsed.
///
/// Construction validates `null`/`true`/`false` in full; objects, arrays,
/// strings and numbers are recognized by their leading byte only and
/// validated when traversed. The view borrows its buffer and never owns it.
#[derive(Debug, Clone, Copy)]
pub struct LazyValue<'a> {
    buf: &'a [u8],
    pos: usize,
    kind: Kind,
    opts: Options,
    root: bool,
}

/// Builds a [`LazyValue`] over `buf`, positioned at the first
/// non-whitespace byte.
///
/// Under `jsonlines` the top-level kind is unconditionally `Array` at
/// position 0.
///
/// # Example
///
/// ```
/// use jsontape::{lazy, Kind, Options, View};
///
/// let v = lazy(b"  [1, 2]", Options::default()).unwrap();
/// assert_eq!(v.kind(), Kind::Array);
/// assert_eq!(v.pos(), 2);
/// ```
pub fn lazy(buf: &[u8], opts: Options) -> Result<LazyValue<'_>> {
    if opts.jsonlines {
        return Ok(LazyValue {
            buf,
            pos: 0,
            kind: Kind::Array,
            opts,
            root: true,
        });
    }
    let x = scan::skip_ws(buf, 0);
    LazyValue::at(buf, x, opts, true)
}

impl<'a> LazyValue<'a> {
    pub(crate) fn at(buf: &'a [u8], x: usize, opts: Options, root: bool) -> Result<Self> {
        let kind = match scan::byte_at(buf, x)? {
            b'{' => Kind::Object,
            b'[' => Kind::Array,
            b'"' => Kind::String,
            b'n' => {
                scan::expect_keyword(buf, x, b"null")?;
                Kind::Null
            }
            b't' => {
                scan::expect_keyword(buf, x, b"true")?;
                Kind::True
            }
            b'f' => {
                scan::expect_keyword(buf, x, b"false")?;
                Kind::False
            }
            b'-' | b'0'..=b'9' => Kind::Number,
            b'N' | b'I' | b'+' if opts.float64 => Kind::Number,
            _ => return Err(Error::new(ErrorKind::InvalidJson, x)),
        };
        Ok(Self {
            buf,
            pos: x,
            kind,
            opts,
            root,
        })
    }

    /// The backing buffer.
    pub fn buf(&self) -> &'a [u8] {
        self.buf
    }

    /// A child view at `x`. Children drop the jsonlines flag and are never
    /// roots.
    fn child(&self, x: usize) -> Result<LazyValue<'a>> {
        let mut opts = self.opts;
        opts.jsonlines = false;
        LazyValue::at(self.buf, x, opts, false)
    }

    fn drive_object<T, F>(&self, mut f: F) -> Result<Applied<T>>
    where
        F: FnMut(PtrStr<'a>, LazyValue<'a>) -> Result<Step<T>>,
    {
        if self.kind != Kind::Object {
            return Err(Error::new(ErrorKind::ExpectedOpeningObjectChar, self.pos).ctx("object"));
        }
        let buf = self.buf;
        let mut x = scan::skip_ws(buf, self.pos + 1);
        if scan::byte_at(buf, x).map_err(|e| e.ctx("object"))? == b'}' {
            return Ok(Applied::Complete(x + 1));
        }
        loop {
            let (key, after_key) = scan::scan_string(buf, x)?;
            x = scan::skip_ws(buf, after_key);
            if scan::byte_at(buf, x).map_err(|e| e.ctx("object"))? != b':' {
                return Err(Error::new(ErrorKind::ExpectedColon, x).ctx("object"));
            }
            x = scan::skip_ws(buf, x + 1);
            let child = self.child(x)?;
            match f(key, child)? {
                Step::Halt(t) => return Ok(Applied::Halted(t)),
                Step::Continue(0) => x = child.skip()?,
                Step::Continue(n) => x = n,
            }
            x = scan::skip_ws(buf, x);
            match scan::byte_at(buf, x).map_err(|e| e.ctx("object"))? {
                // A '}' directly after the comma is not accepted: the next
                // iteration demands a key.
                b',' => x = scan::skip_ws(buf, x + 1),
                b'}' => return Ok(Applied::Complete(x + 1)),
                _ => return Err(Error::new(ErrorKind::ExpectedComma, x).ctx("object")),
            }
        }
    }

    fn drive_array<T, F>(&self, mut f: F) -> Result<Applied<T>>
    where
        F: FnMut(usize, LazyValue<'a>) -> Result<Step<T>>,
    {
        if self.kind != Kind::Array {
            return Err(Error::new(ErrorKind::ExpectedOpeningArrayChar, self.pos).ctx("array"));
        }
        if self.opts.jsonlines {
            return self.drive_lines(f);
        }
        let buf = self.buf;
        let mut x = scan::skip_ws(buf, self.pos + 1);
        if scan::byte_at(buf, x).map_err(|e| e.ctx("array"))? == b']' {
            return Ok(Applied::Complete(x + 1));
        }
        let mut index = 0usize;
        loop {
            let child = self.child(x)?;
            match f(index, child)? {
                Step::Halt(t) => return Ok(Applied::Halted(t)),
                Step::Continue(0) => x = child.skip()?,
                Step::Continue(n) => x = n,
            }
            index += 1;
            x = scan::skip_ws(buf, x);
            match scan::byte_at(buf, x).map_err(|e| e.ctx("array"))? {
                b',' => x = scan::skip_ws(buf, x + 1),
                b']' => return Ok(Applied::Complete(x + 1)),
                _ => return Err(Error::new(ErrorKind::ExpectedComma, x).ctx("array")),
            }
        }
    }

    /// JSON Lines mode: no brackets, one element per non-blank line,
    /// delimited by `\n`, `\r` or `\r\n`; EOF terminates cleanly.
    fn drive_lines<T, F>(&self, mut f: F) -> Result<Applied<T>>
    where
        F: FnMut(usize, LazyValue<'a>) -> Result<Step<T>>,
    {
        let buf = self.buf;
        let mut x = self.pos;
        let mut index = 0usize;
        loop {
            x = scan::skip_ws(buf, x);
            if x >= buf.len() {
                return Ok(Applied::Complete(x));
            }
            let child = self.child(x)?;
            match f(index, child)? {
                Step::Halt(t) => return Ok(Applied::Halted(t)),
                Step::Continue(0) => x = child.skip()?,
                Step::Continue(n) => x = n,
            }
            index += 1;
            x = scan::skip_blanks(buf, x);
            if x >= buf.len() {
                return Ok(Applied::Complete(x));
            }
            match buf[x] {
                b'\n' => x += 1,
                b'\r' => {
                    x += 1;
                    if x < buf.len() && buf[x] == b'\n' {
                        x += 1;
                    }
                }
                _ => return Err(Error::new(ErrorKind::ExpectedNewline, x).ctx("array")),
            }
        }
    }
}

impl<'a> View for LazyValue<'a> {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn opts(&self) -> Options {
        self.opts
    }

    fn apply_object<T, F>(&self, f: F) -> Result<Applied<T>>
    where
        F: FnMut(PtrStr<'_>, Self) -> Result<Step<T>>,
    {
        self.drive_object(f)
    }

    fn apply_array<T, F>(&self, f: F) -> Result<Applied<T>>
    where
        F: FnMut(usize, Self) -> Result<Step<T>>,
    {
        self.drive_array(f)
    }

    fn apply_string(&self) -> Result<PtrStr<'_>> {
        scan::scan_string(self.buf, self.pos).map(|(s, _)| s)
    }

    fn apply_number(&self) -> Result<Num> {
        if self.kind != Kind::Number {
            return Err(Error::mismatch("number", self.kind, self.pos).ctx("number"));
        }
        let end = scan::scan_number(self.buf, self.pos, self.opts)?;
        Num::parse(&self.buf[self.pos..end], self.pos, self.opts.float64)
    }

    fn skip(&self) -> Result<usize> {
        match self.kind {
            Kind::Null | Kind::True => Ok(self.pos + 4),
            Kind::False => Ok(self.pos + 5),
            Kind::String => scan::scan_string(self.buf, self.pos).map(|(_, end)| end),
            Kind::Number => scan::scan_number(self.buf, self.pos, self.opts),
            Kind::Object => {
                let applied =
                    self.drive_object::<Infallible, _>(|_, _| Ok(Step::Continue(0)))?;
                Ok(crate::view::must_complete(applied))
            }
            Kind::Array => {
                let applied =
                    self.drive_array::<Infallible, _>(|_, _| Ok(Step::Continue(0)))?;
                Ok(crate::view::must_complete(applied))
            }
            // Binary-only kinds never occur on a lazy view.
            Kind::Int | Kind::Float => Err(Error::new(ErrorKind::InvalidJson, self.pos)),
        }
    }

    fn check_root(&self, end: usize) -> Result<()> {
        if !self.root {
            return Ok(());
        }
        let x = scan::skip_ws(self.buf, end);
        if x < self.buf.len() {
            return Err(Error::new(ErrorKind::InvalidChar, x));
        }
        Ok(())
    }
}
