//! Random test matrices

use crate::error::Result;
use crate::matrix::MatrixStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => {
            let mut thread_rng = rand::rng();
            StdRng::from_rng(&mut thread_rng)
        }
    }
}

/// `n x n` matrix with entries drawn uniformly from `[min, max)`.
///
/// The same `seed` always produces the same matrix; `None` seeds from the
/// thread-local generator.
pub fn random_matrix(n: usize, min: f64, max: f64, seed: Option<u64>) -> Result<MatrixStore> {
    let mut m = MatrixStore::new(n)?;
    let mut rng = make_rng(seed);
    for i in 0..n {
        for v in m.row_mut(i) {
            *v = rng.random::<f64>() * (max - min) + min;
        }
    }
    Ok(m)
}

/// Random strictly diagonally dominant matrix.
///
/// Off-diagonal entries are uniform in `[-1, 1)` and each diagonal entry
/// exceeds the absolute sum of its row, so every leading principal minor is
/// non-zero and elimination without pivoting is well defined.
pub fn random_diagonally_dominant(n: usize, seed: Option<u64>) -> Result<MatrixStore> {
    let mut m = random_matrix(n, -1.0, 1.0, seed)?;
    for i in 0..n {
        let off_diagonal: f64 = m
            .row(i)
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, v)| v.abs())
            .sum();
        m.set(i, i, off_diagonal + 1.0);
    }
    Ok(m)
}
