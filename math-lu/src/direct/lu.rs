//! In-place unpivoted LU elimination
//!
//! After elimination the matrix holds both factors:
//!
//! ```text
//!         u u u u u
//!         l u u u u
//!   A  =  l l u u u
//!         l l l u u
//!         l l l l u
//! ```
//!
//! `L` is unit lower triangular (its diagonal is implied, not stored) and `U`
//! is upper triangular.
//!
//! # Zero pivots
//!
//! There is no pivoting and no singularity check. A zero pivot produces
//! `inf`/`NaN` multipliers and those propagate through every later round.
//! Matrices whose leading principal minors are all non-zero factor cleanly.

use super::striped;
use crate::error::{LuError, Result};
use crate::matrix::MatrixStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// How the rows of a pivot round are processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationMode {
    /// All rows on the calling thread, in index order
    Serial,
    /// Rows striped across a fixed pool of worker threads
    Parallel {
        /// Number of worker threads (must be >= 1)
        workers: usize,
    },
}

impl EliminationMode {
    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<()> {
        match *self {
            EliminationMode::Parallel { workers: 0 } => {
                Err(LuError::InvalidWorkerCount { workers: 0 })
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for EliminationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EliminationMode::Serial => write!(f, "serial"),
            EliminationMode::Parallel { workers } => write!(f, "parallel ({workers} workers)"),
        }
    }
}

/// Lifecycle of one elimination run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No run has started yet
    Idle,
    /// Pivot round `k` is in progress. A cancelled run stays here with `k`
    /// naming the round that was not run.
    RunningRound(usize),
    /// Every round completed
    Done,
}

/// Runs unpivoted Gaussian elimination over a [`MatrixStore`] in place.
#[derive(Debug)]
pub struct EliminationEngine {
    mode: EliminationMode,
    state: EngineState,
    cancel: Option<Arc<AtomicBool>>,
}

impl EliminationEngine {
    /// Create an engine for `mode`.
    pub fn new(mode: EliminationMode) -> Self {
        Self {
            mode,
            state: EngineState::Idle,
            cancel: None,
        }
    }

    /// Engine running on the calling thread
    pub fn serial() -> Self {
        Self::new(EliminationMode::Serial)
    }

    /// Engine running on `workers` threads.
    ///
    /// Fails with [`LuError::InvalidWorkerCount`] when `workers` is zero.
    pub fn parallel(workers: usize) -> Result<Self> {
        let mode = EliminationMode::Parallel { workers };
        mode.validate()?;
        Ok(Self::new(mode))
    }

    /// Check `flag` between pivot rounds and stop with
    /// [`LuError::Cancelled`] once it is raised.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn mode(&self) -> EliminationMode {
        self.mode
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Factor `m` in place.
    ///
    /// Configuration errors are reported before the matrix is touched. On
    /// cancellation, the rounds that already completed keep their updates.
    pub fn run(&mut self, m: &mut MatrixStore) -> Result<()> {
        self.mode.validate()?;

        let n = m.size();
        let cancel = self.cancel.as_deref();
        let start = Instant::now();
        log::debug!("LU elimination: n={n}, mode={}", self.mode);

        self.state = if n > 1 {
            EngineState::RunningRound(0)
        } else {
            EngineState::Idle
        };
        let state = &mut self.state;
        let result = match self.mode {
            EliminationMode::Serial => eliminate_serial_with(m, cancel, |k| {
                *state = EngineState::RunningRound(k + 1);
                log::trace!("round {k} done");
            }),
            EliminationMode::Parallel { workers } => {
                if workers > n.saturating_sub(1) && n > 1 {
                    log::warn!(
                        "{workers} workers for {} rows below the first pivot: some stay idle",
                        n - 1
                    );
                }
                striped::eliminate(m, workers, cancel, |k| {
                    *state = EngineState::RunningRound(k + 1);
                    log::trace!("round {k} done");
                })
            }
        };

        if let Err(err) = result {
            log::debug!("LU elimination stopped: {err}");
            return Err(err);
        }

        self.state = EngineState::Done;
        log::debug!(
            "LU elimination finished in {:.3} ms",
            start.elapsed().as_secs_f64() * 1e3
        );
        Ok(())
    }
}

/// Eliminate column `k` from `row` using `pivot_row`.
///
/// Both modes go through this function, so a row's arithmetic is the same
/// regardless of which thread runs it.
#[inline]
pub(crate) fn eliminate_row(pivot_row: &[f64], row: &mut [f64], k: usize) {
    let lik = row[k] / pivot_row[k];
    for (x, &p) in row[k + 1..].iter_mut().zip(&pivot_row[k + 1..]) {
        *x -= lik * p;
    }
    row[k] = lik;
}

fn eliminate_serial_with<F>(
    m: &mut MatrixStore,
    cancel: Option<&AtomicBool>,
    mut on_round: F,
) -> Result<()>
where
    F: FnMut(usize),
{
    for k in 0..m.size().saturating_sub(1) {
        if cancel.is_some_and(|flag| flag.load(Ordering::Acquire)) {
            return Err(LuError::Cancelled { round: k });
        }
        eliminate_round(m, k);
        on_round(k);
    }
    Ok(())
}

/// Eliminate column `k` from every row below the pivot row.
fn eliminate_round(m: &mut MatrixStore, k: usize) {
    let n = m.size();
    let (upper, lower) = m.as_mut_slice().split_at_mut((k + 1) * n);
    let pivot_row = &upper[k * n..];
    for row in lower.chunks_exact_mut(n) {
        eliminate_row(pivot_row, row, k);
    }
}

/// Factor `m` in place on the calling thread.
pub fn eliminate_serial(m: &mut MatrixStore) {
    for k in 0..m.size().saturating_sub(1) {
        eliminate_round(m, k);
    }
}

/// Factor `m` in place on `workers` threads.
///
/// Fails with [`LuError::InvalidWorkerCount`] when `workers` is zero, leaving
/// `m` untouched.
pub fn eliminate_parallel(m: &mut MatrixStore, workers: usize) -> Result<()> {
    EliminationEngine::parallel(workers)?.run(m)
}
