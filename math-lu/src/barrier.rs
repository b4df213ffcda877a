//! Reusable round barrier
//!
//! A [`RoundBarrier`] blocks each participant until all `parties` have
//! arrived, then releases them together and starts the next phase. The
//! mutex/condvar pair gives every write made before `wait` a happens-before
//! edge to every read made after it by any other participant, which is what
//! lets pivot round `k + 1` see all row updates of round `k`.
//!
//! One barrier is created per decomposition, so independent decompositions
//! never share synchronisation state.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Phase {
    arrived: usize,
    generation: usize,
}

/// Barrier for a fixed number of participants, reusable across rounds
#[derive(Debug)]
pub struct RoundBarrier {
    parties: usize,
    phase: Mutex<Phase>,
    released: Condvar,
}

impl RoundBarrier {
    /// Create a barrier for `parties` participants (at least one).
    pub fn new(parties: usize) -> Self {
        Self {
            parties: parties.max(1),
            phase: Mutex::new(Phase::default()),
            released: Condvar::new(),
        }
    }

    /// Number of participants that must arrive before a phase completes
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Number of phases that have completed so far
    pub fn completed_phases(&self) -> usize {
        self.lock().generation
    }

    /// Block until all participants of the current phase have arrived.
    ///
    /// Returns the index of the phase that just completed.
    pub fn wait(&self) -> usize {
        let mut phase = self.lock();
        let generation = phase.generation;
        phase.arrived += 1;

        if phase.arrived == self.parties {
            phase.arrived = 0;
            phase.generation += 1;
            self.released.notify_all();
        } else {
            while phase.generation == generation {
                phase = self
                    .released
                    .wait(phase)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }

        generation
    }

    // The phase counters stay consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
