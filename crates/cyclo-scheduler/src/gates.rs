// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Gating primitives for the pooled scheduler.
//!
//! `EventGate` is a manually reset latch: while open, waiters pass
//! immediately; while closed, they block until reopened. `CycleBarrier`
//! aligns the used pool threads at the top of every cycle; its participant
//! count is set per state, because slots unused by the active state park
//! on the state epoch instead of arriving. `StateEpoch` is the one-shot
//! wake channel those parked threads (and shutdown) listen on.

use parking_lot::{Condvar, Mutex};

/// Manually reset open/closed latch.
pub struct EventGate {
    open: Mutex<bool>,
    condvar: Condvar,
}

impl EventGate {
    pub fn new(open: bool) -> Self {
        EventGate {
            open: Mutex::new(open),
            condvar: Condvar::new(),
        }
    }

    pub fn open(&self) {
        *self.open.lock() = true;
        self.condvar.notify_all();
    }

    pub fn close(&self) {
        *self.open.lock() = false;
    }

    /// Block until the gate is open. Passes immediately while open.
    pub fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.condvar.wait(&mut open);
        }
    }
}

struct BarrierState {
    arrived: usize,
    participants: usize,
    generation: u64,
    released: bool,
}

/// Reusable rendezvous with a per-state participant count.
pub struct CycleBarrier {
    state: Mutex<BarrierState>,
    condvar: Condvar,
}

impl CycleBarrier {
    pub fn new() -> Self {
        CycleBarrier {
            state: Mutex::new(BarrierState {
                arrived: 0,
                participants: 0,
                generation: 0,
                released: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Set how many threads rendezvous per cycle. Called between states;
    /// a stop can land while a fast thread is already waiting inside the
    /// rendezvous, so the generation advances to release any such waiter
    /// and the count restarts clean for the new state.
    pub fn set_participants(&self, participants: usize) {
        let mut state = self.state.lock();
        state.participants = participants;
        state.arrived = 0;
        state.generation = state.generation.wrapping_add(1);
        self.condvar.notify_all();
    }

    /// Wait until all participants of this generation have arrived.
    pub fn arrive_and_wait(&self) {
        let mut state = self.state.lock();
        if state.released {
            return;
        }
        state.arrived += 1;
        if state.arrived >= state.participants {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.condvar.notify_all();
        } else {
            let generation = state.generation;
            while state.generation == generation && !state.released {
                self.condvar.wait(&mut state);
            }
        }
    }

    /// Permanently release the barrier; all present and future arrivals
    /// pass straight through. Used at shutdown.
    pub fn release_all(&self) {
        let mut state = self.state.lock();
        state.released = true;
        state.arrived = 0;
        self.condvar.notify_all();
    }
}

/// Monotonic state-change counter with blocking waits.
pub struct StateEpoch {
    epoch: Mutex<u64>,
    condvar: Condvar,
}

impl StateEpoch {
    pub fn new() -> Self {
        StateEpoch {
            epoch: Mutex::new(0),
            condvar: Condvar::new(),
        }
    }

    pub fn current(&self) -> u64 {
        *self.epoch.lock()
    }

    pub fn bump(&self) {
        *self.epoch.lock() += 1;
        self.condvar.notify_all();
    }

    /// Block until the epoch moves past `seen`.
    pub fn wait_past(&self, seen: u64) {
        let mut epoch = self.epoch.lock();
        while *epoch <= seen {
            self.condvar.wait(&mut epoch);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn closed_gate_blocks_until_opened() {
        let gate = Arc::new(EventGate::new(false));
        let passed = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let passed = Arc::clone(&passed);
                std::thread::spawn(move || {
                    gate.wait();
                    passed.fetch_add(1, Ordering::Relaxed);
                })
            })
            .collect();

        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(passed.load(Ordering::Relaxed), 0);

        gate.open();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(passed.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn barrier_aligns_its_participants() {
        let barrier = Arc::new(CycleBarrier::new());
        barrier.set_participants(2);
        let b = Arc::clone(&barrier);
        let handle = std::thread::spawn(move || {
            for _ in 0..100 {
                b.arrive_and_wait();
            }
        });
        for _ in 0..100 {
            barrier.arrive_and_wait();
        }
        handle.join().unwrap();
    }

    #[test]
    fn released_barrier_never_blocks_again() {
        let barrier = Arc::new(CycleBarrier::new());
        barrier.set_participants(2);
        barrier.release_all();
        barrier.arrive_and_wait();
        barrier.arrive_and_wait();
    }

    #[test]
    fn epoch_wait_returns_once_bumped() {
        let epoch = Arc::new(StateEpoch::new());
        let seen = epoch.current();
        let e = Arc::clone(&epoch);
        let handle = std::thread::spawn(move || e.wait_past(seen));
        std::thread::sleep(Duration::from_millis(5));
        epoch.bump();
        handle.join().unwrap();
    }
}
