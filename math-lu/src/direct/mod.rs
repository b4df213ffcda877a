//! Unpivoted LU decomposition
//!
//! This module provides in-place Gaussian elimination without pivoting:
//! - [`eliminate_serial`]: every row on the calling thread
//! - [`eliminate_parallel`]: rows striped across a fixed worker pool, one
//!   barrier per pivot round
//! - [`EliminationEngine`]: the same two modes behind one configurable runner
//!   with state tracking and an optional cancellation flag
//!
//! Both modes produce bit-identical matrices for the same input.

mod factors;
mod lu;
mod striped;

pub use factors::{reconstruct, reconstruction_error, split_lu};
pub use lu::{
    EliminationEngine, EliminationMode, EngineState, eliminate_parallel, eliminate_serial,
};
