//! Static division of result cells across workers.

use std::num::NonZeroUsize;
use std::ops::Range;

/// A contiguous range of linear result-cell indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub worker: usize,
    pub start: usize,
    pub len: usize,
}

impl Partition {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Yields `(linear, row, col)` for every owned cell of a matrix with
    /// `cols` columns.
    pub fn cells(&self, cols: usize) -> impl Iterator<Item = (usize, usize, usize)> {
        self.range().map(move |k| (k, k / cols, k % cols))
    }
}

/// Splits `total` cells into one contiguous partition per worker.
///
/// Every worker gets `total / workers` cells except the last, which also
/// takes the remainder. The worker count is clamped to `total` so no worker
/// is ever handed an empty range.
#[derive(Debug, Clone, Copy)]
pub struct Partitioner {
    total: usize,
    workers: usize,
    part: usize,
}

impl Partitioner {
    pub fn new(total: usize, requested: NonZeroUsize) -> Self {
        let workers = requested.get().min(total.max(1));
        Self {
            total,
            workers,
            part: total / workers,
        }
    }

    /// Effective worker count after clamping.
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// The partition owned by `worker`, which must be below [`workers`](Self::workers).
    pub fn partition(&self, worker: usize) -> Partition {
        debug_assert!(worker < self.workers);
        let start = worker * self.part;
        let len = if worker + 1 == self.workers {
            self.total - start
        } else {
            self.part
        };
        Partition { worker, start, len }
    }

    pub fn iter(&self) -> impl Iterator<Item = Partition> + '_ {
        (0..self.workers).map(|worker| self.partition(worker))
    }
}
