//! Square numeric matrices, materialized with a two-pass traversal.

use core::convert::Infallible;

use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::record::Materialize;
use crate::view::{must_complete, Applied, Step, View};

/// A square, column-major matrix of `f64`.
///
/// Materialization runs two passes over an array of arrays: the first
/// measures the leading row by short-circuiting the outer traversal, the
/// second re-traverses and fills column by column. Non-array rows and
/// row/column count mismatches fail with a type mismatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    dim: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// The side length.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element at (row, col). Column-major storage.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[col * self.dim + row]
    }

    /// The column-major backing storage.
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

impl Materialize for Matrix {
    fn materialize<V: View>(v: V) -> Result<(Self, usize)> {
        if v.kind() != Kind::Array {
            return Err(Error::mismatch("matrix", v.kind(), v.pos()).ctx("matrix"));
        }
        // Pass one: the first row's length decides the dimension.
        let probe = v.apply_array(|_, row| Ok(Step::Halt(row.array()?.len()?)))?;
        let dim = match probe {
            Applied::Halted(n) => n,
            Applied::Complete(end) => {
                return Ok((
                    Matrix {
                        dim: 0,
                        data: Vec::new(),
                    },
                    end,
                ))
            }
        };
        // Pass two: re-traverse, filling column by column.
        let mut data = vec![0.0f64; dim * dim];
        let mut rows = 0usize;
        let applied = v.apply_array::<Infallible, _>(|i, row| {
            if i >= dim {
                return Err(Error::mismatch("square matrix", Kind::Array, row.pos()).ctx("matrix"));
            }
            let mut cols = 0usize;
            let inner = row.apply_array::<Infallible, _>(|j, cell| {
                if j >= dim {
                    return Err(
                        Error::mismatch("square matrix", Kind::Array, cell.pos()).ctx("matrix")
                    );
                }
                let (x, end) = f64::materialize(cell)?;
                data[j * dim + i] = x;
                cols = j + 1;
                Ok(Step::Continue(end))
            })?;
            let end = must_complete(inner);
            if cols != dim {
                return Err(Error::mismatch("square matrix", Kind::Array, row.pos()).ctx("matrix"));
            }
            rows += 1;
            Ok(Step::Continue(end))
        })?;
        let end = must_complete(applied);
        if rows != dim {
            return Err(Error::mismatch("square matrix", Kind::Array, v.pos()).ctx("matrix"));
        }
        Ok((Matrix { dim, data }, end))
    }

    fn accepts(kind: Kind) -> bool {
        kind == Kind::Array
    }
}
