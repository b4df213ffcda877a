//! In-place LU decomposition by unpivoted Gaussian elimination
//!
//! This crate factors a dense square matrix into combined lower/upper factors
//! stored in the matrix itself, either on one thread or on a fixed pool of
//! worker threads synchronised by one barrier per pivot round.
//!
//! # Features
//!
//! - **Matrix storage**: one contiguous row-major `n x n` buffer ([`MatrixStore`])
//! - **Serial elimination**: [`eliminate_serial`]
//! - **Parallel elimination**: row striping across `T` workers ([`eliminate_parallel`]),
//!   bit-identical to the serial result
//! - **Factors**: split into `L`/`U`, reconstruct `L * U`, residual check
//! - **Input**: whitespace-separated text files and seeded random matrices
//!
//! No pivoting is performed. A zero pivot yields `inf`/`NaN` entries that
//! propagate through the rest of the factorization rather than an error.
//!
//! # Example
//!
//! ```
//! use math_audio_lu::{MatrixStore, eliminate_parallel};
//!
//! let mut m = MatrixStore::from_rows(&[[4.0, 3.0], [6.0, 3.0]]).unwrap();
//! eliminate_parallel(&mut m, 4).unwrap();
//! assert_eq!(m.as_slice(), &[4.0, 3.0, 1.5, -1.5]);
//! ```

pub mod barrier;
pub mod compare;
pub mod direct;
pub mod error;
pub mod generate;
pub mod loader;
pub mod matrix;
pub mod parallel;

// Re-export main types
pub use error::{LuError, Result};
pub use matrix::{DUMP_LIMIT, MatrixStore};

// Re-export elimination
pub use direct::{
    EliminationEngine, EliminationMode, EngineState, eliminate_parallel, eliminate_serial,
    reconstruct, reconstruction_error, split_lu,
};

pub use barrier::RoundBarrier;
pub use compare::{Comparison, ModeRun, compare_modes};
pub use generate::{random_diagonally_dominant, random_matrix};
pub use loader::{load_matrix, read_matrix};
