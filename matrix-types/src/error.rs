//! Error types for matrix construction.

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("matrix dimensions must be non-zero, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },

    #[error("matrix of {rows}x{cols} cells does not fit in memory")]
    TooLarge { rows: usize, cols: usize },

    #[error("failed to allocate matrix storage: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("expected {expected} values for the matrix, got {actual}")]
    Shape { expected: usize, actual: usize },
}
