//! Error types for matrix-mul operations.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("matrix error: {0}")]
    Matrix(#[from] matrix_types::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("matrix dimension mismatch: A is {0}x{1}, B is {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    #[error("cannot square a {rows}x{cols} matrix")]
    NotSquare { rows: usize, cols: usize },

    #[error("round count must be at least 1")]
    InvalidRounds,

    #[error("failed to allocate working buffer: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("can't create worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
}
