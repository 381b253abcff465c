//! Position-carrying parse and materialization errors.

use thiserror::Error;

use crate::Kind;

/// Error returned by every parsing, traversal and materialization routine.
///
/// `pos` is an absolute byte offset into the original input (or tape) and
/// `context` names what the parser was attempting when it failed ("object",
/// "array", "string", "number", "value", or a record field's JSON key).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {pos} while reading {context}")]
pub struct Error {
    pub kind: ErrorKind,
    pub pos: usize,
    pub context: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid json")]
    InvalidJson,
    #[error("expected '{{'")]
    ExpectedOpeningObjectChar,
    #[error("expected '['")]
    ExpectedOpeningArrayChar,
    #[error("expected '\"'")]
    ExpectedOpeningQuoteChar,
    #[error("expected ':'")]
    ExpectedColon,
    #[error("expected ','")]
    ExpectedComma,
    #[error("expected newline")]
    ExpectedNewline,
    #[error("invalid number")]
    InvalidNumber,
    #[error("invalid character")]
    InvalidChar,
    #[error("invalid binary tag")]
    InvalidBinaryTag,
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: Kind,
    },
    /// Reserved for a future strict-duplicates option; never raised.
    #[error("duplicate object key")]
    DuplicateKey,
    #[error("key not found")]
    KeyNotFound,
    #[error("index out of bounds")]
    IndexOutOfBounds,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, pos: usize) -> Self {
        Self {
            kind,
            pos,
            context: "value",
        }
    }

    pub(crate) fn ctx(mut self, context: &'static str) -> Self {
        self.context = context;
        self
    }

    pub(crate) fn eof(pos: usize) -> Self {
        Self::new(ErrorKind::UnexpectedEof, pos)
    }

    pub(crate) fn mismatch(expected: &'static str, found: Kind, pos: usize) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, found }, pos)
    }

    /// Stamps a record field's JSON key onto an error that still carries the
    /// generic "value" context. Deeper errors keep their own context.
    pub fn in_field(mut self, field: &'static str) -> Self {
        if self.context == "value" {
            self.context = field;
        }
        self
    }
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;
