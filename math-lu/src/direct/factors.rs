//! Working with the combined L/U matrix
//!
//! - [`split_lu`]: separate `L` and `U` into two ndarray matrices
//! - [`reconstruct`]: multiply `L * U` back
//! - [`reconstruction_error`]: relative residual against the original matrix

use crate::error::{LuError, Result};
use crate::matrix::MatrixStore;
use crate::parallel::parallel_map_indexed;
use ndarray::Array2;

/// Split a factored matrix into `(L, U)`.
///
/// `L` gets a unit diagonal and the multipliers below it; `U` gets the
/// diagonal and everything above it.
pub fn split_lu(lu: &MatrixStore) -> (Array2<f64>, Array2<f64>) {
    let n = lu.size();
    let mut lower = Array2::zeros((n, n));
    let mut upper = Array2::zeros((n, n));

    for i in 0..n {
        lower[[i, i]] = 1.0;
        for j in 0..i {
            lower[[i, j]] = lu.get(i, j);
        }
        for j in i..n {
            upper[[i, j]] = lu.get(i, j);
        }
    }

    (lower, upper)
}

/// Compute `L * U` from a factored matrix.
///
/// Rows are computed in parallel when the `rayon` feature is enabled.
pub fn reconstruct(lu: &MatrixStore) -> Array2<f64> {
    let n = lu.size();
    let rows = parallel_map_indexed(n, |i| {
        let l_row = lu.row(i);
        (0..n)
            .map(|j| {
                // L[i][p] is zero for p > i and U[p][j] is zero for p > j.
                let upto = i.min(j);
                let mut sum = 0.0;
                for (p, &l_ip) in l_row.iter().enumerate().take(upto) {
                    sum += l_ip * lu.get(p, j);
                }
                // Unit diagonal of L.
                if i <= j {
                    sum += lu.get(i, j);
                } else {
                    sum += l_row[j] * lu.get(j, j);
                }
                sum
            })
            .collect::<Vec<f64>>()
    });

    let mut a = Array2::zeros((n, n));
    for (i, row) in rows.into_iter().enumerate() {
        for (j, v) in row.into_iter().enumerate() {
            a[[i, j]] = v;
        }
    }
    a
}

/// Largest entry of `|A - L * U|`, relative to the largest entry of `|A|`.
///
/// Falls back to the absolute residual when `A` is all zeros.
pub fn reconstruction_error(original: &MatrixStore, lu: &MatrixStore) -> Result<f64> {
    if original.size() != lu.size() {
        return Err(LuError::DimensionMismatch {
            expected: original.size(),
            got: lu.size(),
        });
    }

    let product = reconstruct(lu);
    let scale = original
        .as_slice()
        .iter()
        .map(|v| v.abs())
        .fold(0.0, f64::max);
    let residual = original
        .as_slice()
        .iter()
        .zip(product.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);

    Ok(if scale > 0.0 { residual / scale } else { residual })
}
