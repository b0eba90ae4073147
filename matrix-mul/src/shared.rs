//! Matrix cells shared between power workers.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::Error;

/// A fixed-size buffer of `f64` cells that many threads may read and write
/// through a shared reference.
///
/// Cells hold the value's bit pattern in an `AtomicU64`. Accesses are
/// relaxed: within a round every cell has a single writer and no readers,
/// and the round gate orders one round's writes before the next round's
/// reads.
pub(crate) struct SharedCells {
    cells: Box<[AtomicU64]>,
}

impl SharedCells {
    pub fn zeroed(len: usize) -> Result<Self, Error> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(len)?;
        cells.extend((0..len).map(|_| AtomicU64::new(0f64.to_bits())));
        Ok(Self {
            cells: cells.into_boxed_slice(),
        })
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, Error> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(values.len())?;
        cells.extend(values.iter().map(|v| AtomicU64::new(v.to_bits())));
        Ok(Self {
            cells: cells.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn load(&self, idx: usize) -> f64 {
        f64::from_bits(self.cells[idx].load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, idx: usize, value: f64) {
        self.cells[idx].store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.cells
            .into_vec()
            .into_iter()
            .map(|cell| f64::from_bits(cell.into_inner()))
            .collect()
    }
}
