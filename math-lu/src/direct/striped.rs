//! Row-striped parallel elimination
//!
//! A fixed pool of scoped threads is spawned once per decomposition. In pivot
//! round `k`, worker `t` updates rows `k + t + 1, k + t + 1 + workers, ...`.
//! Each row is written by exactly one worker and the pivot row `k` is only
//! read, so no locking is needed inside a round. A [`RoundBarrier`] shared
//! with the controlling thread separates consecutive rounds.
//!
//! Worker `t` owns no row in any round once `t >= n - 1`, so at most `n - 1`
//! threads are spawned. The striping step stays `workers`, which keeps the
//! row-to-worker mapping independent of the matrix size.

use super::lu::eliminate_row;
use crate::barrier::RoundBarrier;
use crate::error::{LuError, Result};
use crate::matrix::MatrixStore;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Row-partitioned view of the matrix buffer shared by all workers of a round
struct SharedRows<'a> {
    ptr: *mut f64,
    n: usize,
    _buffer: PhantomData<&'a mut [f64]>,
}

// Workers only touch disjoint rows, see the safety contracts below.
unsafe impl Send for SharedRows<'_> {}
unsafe impl Sync for SharedRows<'_> {}

impl<'a> SharedRows<'a> {
    fn new(m: &'a mut MatrixStore) -> Self {
        let n = m.size();
        Self {
            ptr: m.as_mut_slice().as_mut_ptr(),
            n,
            _buffer: PhantomData,
        }
    }

    /// # Safety
    /// `k < n`, and no thread may hold a mutable view of row `k` while the
    /// returned slice is alive.
    unsafe fn row(&self, k: usize) -> &[f64] {
        unsafe { std::slice::from_raw_parts(self.ptr.add(k * self.n), self.n) }
    }

    /// # Safety
    /// `i < n`, and no other view of row `i` may exist while the returned
    /// slice is alive.
    #[allow(clippy::mut_from_ref)]
    unsafe fn row_mut(&self, i: usize) -> &mut [f64] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.add(i * self.n), self.n) }
    }
}

/// Rows of round `k` owned by worker `t` out of `workers`
pub(crate) fn striped_rows(
    k: usize,
    t: usize,
    workers: usize,
    n: usize,
) -> impl Iterator<Item = usize> {
    (k + t + 1..n).step_by(workers)
}

/// Run all pivot rounds on a pool of `min(workers, n - 1)` threads.
///
/// `on_round` is called by the controlling thread after the barrier that
/// closes each round. When `cancel` is raised the controller stops the pool
/// at the next round boundary; rounds already finished keep their updates.
pub(crate) fn eliminate<F>(
    m: &mut MatrixStore,
    workers: usize,
    cancel: Option<&AtomicBool>,
    mut on_round: F,
) -> Result<()>
where
    F: FnMut(usize),
{
    if workers == 0 {
        return Err(LuError::InvalidWorkerCount { workers });
    }

    let rounds = m.size().saturating_sub(1);
    if rounds == 0 {
        return Ok(());
    }
    if is_cancelled(cancel) {
        return Err(LuError::Cancelled { round: 0 });
    }

    let n = m.size();
    let rows = SharedRows::new(m);
    let active = workers.min(rounds);
    let barrier = RoundBarrier::new(active + 1);
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        for t in 0..active {
            let rows = &rows;
            let barrier = &barrier;
            let stop = &stop;
            scope.spawn(move || {
                for k in 0..rounds {
                    // SAFETY: row k is never written during round k.
                    let pivot = unsafe { rows.row(k) };
                    for i in striped_rows(k, t, workers, n) {
                        // SAFETY: i > k and the striping gives row i to this worker only.
                        let row = unsafe { rows.row_mut(i) };
                        eliminate_row(pivot, row, k);
                    }
                    barrier.wait();
                    // Ordered by the barrier's mutex.
                    if stop.load(Ordering::Relaxed) {
                        return;
                    }
                }
            });
        }

        for k in 0..rounds {
            let last = k + 1 == rounds;
            let cancelled = !last && is_cancelled(cancel);
            if cancelled {
                stop.store(true, Ordering::Relaxed);
            }
            barrier.wait();
            on_round(k);
            if cancelled {
                return Err(LuError::Cancelled { round: k + 1 });
            }
        }
        Ok(())
    })
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Acquire))
}
