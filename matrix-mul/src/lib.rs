//! Threaded dense matrix multiplication and repeated squaring.
//!
//! `matrix-mul` computes C = A × B, or A^(2^t) by squaring A `t` times,
//! spreading the result cells over a fixed pool of OS threads created for
//! each request.
//!
//! # Work Division
//!
//! - The result's `rows * cols` cells are numbered in row-major order.
//! - Each worker owns `cells / workers` consecutive cells; the last worker
//!   also takes the remainder.
//! - More workers than cells are clamped to one worker per cell.
//!
//! # Repeated Squaring
//!
//! Power workers keep their partition for the whole request. After each
//! round they meet at a barrier; worker 0 counts the round down, and all
//! workers either swap their source and destination buffers and go again or
//! retire.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use matrix_mul::{MatrixMul, Request};
//! use matrix_types::Matrix;
//!
//! let mm = MatrixMul::new(NonZeroUsize::new(4).unwrap());
//! let a = Matrix::from_rows(vec![vec![1.0, 1.0], vec![0.0, 1.0]])?;
//!
//! // Three rounds: A^8.
//! let b = mm.run(Request::Power { a: &a, rounds: 3 })?;
//! assert_eq!(b.to_rows(), vec![vec![1.0, 8.0], vec![0.0, 1.0]]);
//! # Ok::<(), matrix_mul::Error>(())
//! ```

mod config;
mod error;
mod gate;
mod matrix_mul;
mod partition;
mod power;
mod product;
pub mod serial;
mod shared;
pub mod timing;

pub use config::{Config, ConfigError, Job, Plan};
pub use error::Error;
pub use matrix_mul::{DEFAULT_WORKERS, MatrixMul, Request};
pub use partition::{Partition, Partitioner};
pub use power::RoundObserver;
