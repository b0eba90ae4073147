//! Round barrier for the power engine.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Worker responsible for decrementing the rounds-remaining counter.
pub(crate) const DISTINGUISHED_WORKER: usize = 0;

/// What a worker does after passing the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Passage {
    Continue,
    Done,
}

/// A reusable rendezvous barrier that also owns the rounds-remaining
/// counter.
///
/// The distinguished worker decrements the counter as it arrives. When the
/// last worker arrives the post-decrement value is published together with
/// the release, and every waiter decides from that snapshot. A fast worker
/// that races ahead into the next round therefore cannot change the value a
/// slow worker sees for the current one.
pub(crate) struct RoundGate {
    parties: usize,
    state: Mutex<GateState>,
    released: Condvar,
}

struct GateState {
    arrived: usize,
    generation: u64,
    remaining: usize,
    published: usize,
    aborted: bool,
}

impl RoundGate {
    pub fn new(parties: usize, rounds: usize) -> Self {
        Self {
            parties,
            state: Mutex::new(GateState {
                arrived: 0,
                generation: 0,
                remaining: rounds,
                published: rounds,
                aborted: false,
            }),
            released: Condvar::new(),
        }
    }

    /// Blocks until all parties have arrived for the current round.
    pub fn arrive(&self, worker: usize) -> Passage {
        let mut state = self.lock();
        if state.aborted {
            return Passage::Done;
        }

        if worker == DISTINGUISHED_WORKER {
            state.remaining = state.remaining.saturating_sub(1);
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation += 1;
            state.published = state.remaining;
            self.released.notify_all();
        } else {
            let generation = state.generation;
            state = self
                .released
                .wait_while(state, |s| s.generation == generation && !s.aborted)
                .unwrap_or_else(PoisonError::into_inner);
            if state.aborted {
                return Passage::Done;
            }
        }

        if state.published > 0 {
            Passage::Continue
        } else {
            Passage::Done
        }
    }

    /// Releases every waiter and makes all later arrivals retire.
    ///
    /// Used when the pool could not be fully spawned or a worker unwound, so
    /// the parties still running do not wait for an arrival that never comes.
    pub fn abort(&self) {
        self.lock().aborted = true;
        self.released.notify_all();
    }

    /// Rounds left as of the last release.
    pub fn remaining(&self) -> usize {
        self.lock().published
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Aborts the gate if the owning worker unwinds, so the other parties stop
/// waiting for an arrival that will never come.
pub(crate) struct AbortOnUnwind<'a>(pub &'a RoundGate);

impl Drop for AbortOnUnwind<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.abort();
        }
    }
}
