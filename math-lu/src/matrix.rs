//! Dense square matrix storage
//!
//! [`MatrixStore`] owns a single contiguous `n * n` buffer of `f64` in
//! row-major order. Rows are views into that buffer; there is no per-row
//! allocation. Element access is unchecked in release builds and bounds
//! checked in debug builds.

use crate::error::{LuError, Result};
use ndarray::{Array2, ArrayView2};
use std::fmt::Write as FmtWrite;
use std::io;

/// Matrices larger than this are never dumped.
pub const DUMP_LIMIT: usize = 10;

/// Owned `n x n` matrix of `f64` in one row-major allocation
#[derive(Debug, Clone)]
pub struct MatrixStore {
    data: Vec<f64>,
    n: usize,
}

impl MatrixStore {
    /// Allocate a zero-initialised `n x n` matrix.
    ///
    /// Fails with [`LuError::AllocationError`] when `n * n` elements do not fit
    /// in the address space or the allocator refuses the request.
    pub fn new(n: usize) -> Result<Self> {
        let len = n
            .checked_mul(n)
            .filter(|len| {
                len.checked_mul(std::mem::size_of::<f64>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or(LuError::AllocationError { n })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| LuError::AllocationError { n })?;
        data.resize(len, 0.0);

        Ok(Self { data, n })
    }

    /// Build a matrix from a slice of rows; every row must have `rows.len()` entries.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        let mut m = Self::new(n)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(LuError::DimensionMismatch {
                    expected: n,
                    got: row.len(),
                });
            }
            m.row_mut(i).copy_from_slice(row);
        }
        Ok(m)
    }

    /// Copy a square ndarray matrix into a new store.
    pub fn from_array(a: &Array2<f64>) -> Result<Self> {
        let n = a.nrows();
        if n != a.ncols() {
            return Err(LuError::DimensionMismatch {
                expected: n,
                got: a.ncols(),
            });
        }
        let mut m = Self::new(n)?;
        for ((i, j), &v) in a.indexed_iter() {
            m.set(i, j, v);
        }
        Ok(m)
    }

    /// Copy the matrix into an ndarray `Array2`.
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.n, self.n), |(i, j)| self.get(i, j))
    }

    /// Borrow the buffer as an ndarray view without copying.
    pub fn as_array(&self) -> ArrayView2<'_, f64> {
        // SAFETY: data holds exactly n * n elements in row-major order and the
        // view borrows self, so the buffer outlives it and cannot be mutated.
        unsafe { ArrayView2::from_shape_ptr((self.n, self.n), self.data.as_ptr()) }
    }

    /// Matrix dimension `n`
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Returns `true` for the `0 x 0` matrix.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Read element `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(
            i < self.n && j < self.n,
            "index ({i}, {j}) out of range for {0}x{0} matrix",
            self.n
        );
        // SAFETY: i < n and j < n, so i * n + j < n * n == data.len().
        unsafe { *self.data.get_unchecked(i * self.n + j) }
    }

    /// Write element `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(
            i < self.n && j < self.n,
            "index ({i}, {j}) out of range for {0}x{0} matrix",
            self.n
        );
        // SAFETY: see `get`.
        unsafe { *self.data.get_unchecked_mut(i * self.n + j) = value }
    }

    /// Row `i` as a slice into the backing buffer
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Row `i` as a mutable slice into the backing buffer
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.n..(i + 1) * self.n]
    }

    /// Whole buffer in row-major order
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Exact element-wise equality on bit patterns.
    ///
    /// Unlike `==` on `f64`, a NaN compares equal to a NaN with the same bits,
    /// which is what is needed to check that two elimination runs agree.
    pub fn bitwise_eq(&self, other: &MatrixStore) -> bool {
        self.n == other.n
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    /// Largest absolute element-wise difference.
    pub fn max_abs_diff(&self, other: &MatrixStore) -> Result<f64> {
        if self.n != other.n {
            return Err(LuError::DimensionMismatch {
                expected: self.n,
                got: other.n,
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max))
    }

    /// Render the matrix for display.
    ///
    /// Matrices with more than [`DUMP_LIMIT`] rows render as an empty string.
    /// Otherwise every value is preceded by a tab, every row ends with a
    /// newline and the block ends with one blank line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if self.n > DUMP_LIMIT {
            return out;
        }
        for i in 0..self.n {
            for v in self.row(i) {
                let _ = write!(out, "\t{v}");
            }
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// Write [`MatrixStore::dump`] to `out`.
    pub fn write_dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.dump().as_bytes())
    }
}
