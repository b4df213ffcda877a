//! Error types for LU decomposition.
//!
//! Allocation and configuration problems are reported before any elimination
//! work starts. Numeric degeneracy (zero pivots) is never an error: it
//! propagates through the arithmetic as IEEE-754 infinities and NaNs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a matrix or running an elimination.
#[derive(Debug, Error)]
pub enum LuError {
    /// The `n * n` buffer could not be allocated.
    #[error("cannot allocate a {n}x{n} matrix")]
    AllocationError {
        /// Requested dimension
        n: usize,
    },

    /// Parallel elimination was asked to run with no workers.
    #[error("invalid worker count: {workers} (must be >= 1)")]
    InvalidWorkerCount {
        /// The rejected worker count
        workers: usize,
    },

    /// The cancellation flag was raised between two pivot rounds.
    #[error("elimination cancelled before round {round}")]
    Cancelled {
        /// First round that was not executed
        round: usize,
    },

    /// Two matrices that must share a dimension do not.
    #[error("matrix dimensions mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        got: usize,
    },

    /// The input file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A token in the input is not a floating point number.
    #[error("line {line}, column {column}: cannot parse {token:?} as a number")]
    Parse {
        /// 1-based line number
        line: usize,
        /// 1-based token position within the line
        column: usize,
        /// The offending token
        token: String,
    },

    /// A row has fewer tokens than the first line announced.
    #[error("line {line}: expected {expected} values, got {got}")]
    RaggedRow {
        /// 1-based line number
        line: usize,
        /// Dimension inferred from the first line
        expected: usize,
        /// Number of tokens found
        got: usize,
    },

    /// The input holds no data at all.
    #[error("input is empty")]
    EmptyInput,
}

/// A specialized `Result` type for LU operations.
pub type Result<T> = std::result::Result<T, LuError>;

impl LuError {
    /// Returns `true` for errors caused by the caller's configuration.
    ///
    /// This includes `AllocationError` and `InvalidWorkerCount`.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            LuError::AllocationError { .. } | LuError::InvalidWorkerCount { .. }
        )
    }

    /// Returns `true` for errors raised while reading matrix input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LuError::Io { .. }
                | LuError::Parse { .. }
                | LuError::RaggedRow { .. }
                | LuError::EmptyInput
        )
    }
}
