//! Repeated squaring: per-round kernel and the worker round loop.

use tracing::debug;

use crate::Error;
use crate::gate::{AbortOnUnwind, DISTINGUISHED_WORKER, Passage, RoundGate};
use crate::partition::Partition;
use crate::product::dot;
use crate::shared::SharedCells;

/// Hooks invoked by every power worker around each round.
///
/// Rounds are numbered from 1. Both methods default to no-ops, and `()`
/// implements the trait for callers that do not need instrumentation.
pub trait RoundObserver: Sync {
    fn round_started(&self, _worker: usize, _round: usize) {}

    fn round_finished(&self, _worker: usize, _round: usize) {}
}

impl RoundObserver for () {}

/// The two working buffers of a power request.
///
/// Round 1 reads `front` (a copy of the input) and writes `back`; each
/// later round swaps the roles, so round k+1 squares the result of round k.
pub(crate) struct BufferPair {
    front: SharedCells,
    back: SharedCells,
}

impl BufferPair {
    pub fn new(input: &[f64]) -> Result<Self, Error> {
        Ok(Self {
            front: SharedCells::from_slice(input)?,
            back: SharedCells::zeroed(input.len())?,
        })
    }

    /// Takes the buffer holding the result after `rounds` rounds.
    pub fn into_result(self, rounds: usize) -> Vec<f64> {
        if rounds % 2 == 0 {
            self.front.into_vec()
        } else {
            self.back.into_vec()
        }
    }
}

/// Computes the cells of `current × current` owned by `part` into `next`.
pub(crate) fn square_partition(
    n: usize,
    part: &Partition,
    current: &SharedCells,
    next: &SharedCells,
) {
    for (cell, row, col) in part.cells(n) {
        let value = dot(n, |k| current.load(row * n + k), |k| current.load(k * n + col));
        next.store(cell, value);
    }
}

/// Everything one power worker needs for the lifetime of a request.
pub(crate) struct PowerWorker<'a, O: RoundObserver> {
    pub part: Partition,
    pub n: usize,
    pub buffers: &'a BufferPair,
    pub gate: &'a RoundGate,
    pub observer: &'a O,
}

impl<O: RoundObserver> PowerWorker<'_, O> {
    /// Runs rounds until the gate reports none remain.
    ///
    /// If the worker unwinds (a panicking observer, say) the gate is aborted
    /// so every other worker retires and the panic reaches the caller.
    pub fn run(self) {
        let _guard = AbortOnUnwind(self.gate);
        let worker = self.part.worker;
        let mut current = &self.buffers.front;
        let mut next = &self.buffers.back;
        let mut round = 1;

        loop {
            self.observer.round_started(worker, round);
            square_partition(self.n, &self.part, current, next);
            self.observer.round_finished(worker, round);

            match self.gate.arrive(worker) {
                Passage::Continue => {
                    if worker == DISTINGUISHED_WORKER {
                        debug!(round, remaining = self.gate.remaining(), "round complete");
                    }
                    std::mem::swap(&mut current, &mut next);
                    round += 1;
                }
                Passage::Done => {
                    debug!(worker, rounds = round, "power worker done");
                    return;
                }
            }
        }
    }
}
