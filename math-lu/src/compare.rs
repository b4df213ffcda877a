//! Serial vs parallel comparison
//!
//! Runs both elimination modes on copies of the same matrix, times them, and
//! checks that they agree bit for bit.

use crate::direct::{EliminationEngine, EliminationMode, reconstruction_error};
use crate::error::Result;
use crate::matrix::MatrixStore;
use std::time::{Duration, Instant};

/// Outcome of one timed elimination
#[derive(Debug, Clone)]
pub struct ModeRun {
    /// Mode that produced `result`
    pub mode: EliminationMode,
    /// Factored matrix
    pub result: MatrixStore,
    /// Wall-clock time of the elimination alone
    pub elapsed: Duration,
}

/// Serial and parallel runs on the same input
#[derive(Debug, Clone)]
pub struct Comparison {
    pub serial: ModeRun,
    pub parallel: ModeRun,
}

impl Comparison {
    /// Serial time divided by parallel time
    pub fn speedup(&self) -> f64 {
        let parallel = self.parallel.elapsed.as_secs_f64();
        if parallel > 0.0 {
            self.serial.elapsed.as_secs_f64() / parallel
        } else {
            f64::INFINITY
        }
    }

    /// `true` when both modes produced the same bits
    pub fn identical(&self) -> bool {
        self.serial.result.bitwise_eq(&self.parallel.result)
    }
}

/// Factor a copy of `input` with `mode` and time it.
pub fn run_mode(input: &MatrixStore, mode: EliminationMode) -> Result<ModeRun> {
    let mut engine = EliminationEngine::new(mode);
    let mut result = input.clone();
    let start = Instant::now();
    engine.run(&mut result)?;
    let elapsed = start.elapsed();

    Ok(ModeRun {
        mode,
        result,
        elapsed,
    })
}

/// Run serial and parallel elimination on copies of `input`.
///
/// The worker count is validated before either mode runs.
pub fn compare_modes(input: &MatrixStore, workers: usize) -> Result<Comparison> {
    let parallel_mode = EliminationMode::Parallel { workers };
    parallel_mode.validate()?;

    let serial = run_mode(input, EliminationMode::Serial)?;
    let parallel = run_mode(input, parallel_mode)?;

    let comparison = Comparison { serial, parallel };
    if !comparison.identical() {
        log::warn!("serial and parallel results differ");
    }
    log::info!(
        "n={}: serial {:?}, parallel {:?}, speedup {:.2}x",
        input.size(),
        comparison.serial.elapsed,
        comparison.parallel.elapsed,
        comparison.speedup()
    );
    Ok(comparison)
}

/// Relative reconstruction residual of a finished run.
pub fn verify(input: &MatrixStore, run: &ModeRun) -> Result<f64> {
    reconstruction_error(input, &run.result)
}
