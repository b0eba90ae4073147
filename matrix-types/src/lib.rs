//! Dense matrices for the matrix-mul engine.
//!
//! `matrix-types` provides [`Matrix`], a fixed-size row-major buffer of
//! `f64` values, together with the collaborators the benchmark needs
//! around it: data generation ([`Generator`]) and `printf`-style rendering
//! ([`Matrix`] implements `Display`).
//!
//! # Storage Layout
//!
//! Cell `(r, c)` of a `rows × cols` matrix lives at index `r * cols + c`
//! of the backing slice. The buffer is allocated once and never resized.
//!
//! # Example
//!
//! ```
//! use matrix_types::{FillMode, Generator, Matrix};
//!
//! let mut a = Matrix::zeros(2, 3)?;
//! Generator::new(FillMode::Deterministic).fill(&mut a);
//!
//! assert_eq!(a.get(1, 2), 1.0 + 1.0 / 100.0 + 2.0 / 1000.0);
//! # Ok::<(), matrix_types::Error>(())
//! ```

mod display;
mod error;
mod generate;
mod matrix;

pub use display::format_g;
pub use error::Error;
pub use generate::{FillMode, Generator};
pub use matrix::Matrix;
