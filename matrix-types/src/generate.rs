//! Input data generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Matrix;

/// Random cells are drawn from `0..RANDOM_SPAN` and scaled down by
/// `RANDOM_SCALE`, giving values in `[0.0, 0.1)`.
const RANDOM_SPAN: u32 = 200_000_000;
const RANDOM_SCALE: f64 = 2_000_000_000.0;

/// How generated matrices are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// `1 + row/100 + col/1000`; reproducible across runs.
    Deterministic,
    /// Pseudo-random values in `[0.0, 0.1)` from the given seed.
    Random { seed: u64 },
}

/// Fills matrices according to a [`FillMode`].
///
/// A single generator keeps its random stream between calls, so filling A
/// and then B with the same generator gives two different random matrices
/// while staying reproducible for a fixed seed.
pub struct Generator {
    rng: Option<StdRng>,
}

impl Generator {
    pub fn new(mode: FillMode) -> Self {
        let rng = match mode {
            FillMode::Deterministic => None,
            FillMode::Random { seed } => Some(StdRng::seed_from_u64(seed)),
        };
        Self { rng }
    }

    pub fn fill(&mut self, matrix: &mut Matrix) {
        match self.rng.as_mut() {
            None => matrix.fill_with(deterministic_cell),
            Some(rng) => {
                matrix.fill_with(|_, _| rng.gen_range(0..RANDOM_SPAN) as f64 / RANDOM_SCALE)
            }
        }
    }
}

fn deterministic_cell(row: usize, col: usize) -> f64 {
    1.0 + (row as f64 / 100.0) + (col as f64 / 1000.0)
}
