// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Pooled scheduler.
//!
//! OS threads are created once, sized for the worst state, and survive
//! every state change; a state change only rewrites which pool slot runs
//! which scheduled thread. Slots are grouped by CPU affinity mask so a
//! state change keeps each chain on the slot (and so the CPU group) that
//! already served that mask, and slots a state does not use park on the
//! state epoch until a later state claims them.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Mutex, RwLock};

use crate::core::SchedulerCore;
use crate::error::{Result, SchedulerError};
use crate::gates::{CycleBarrier, EventGate, StateEpoch};
use crate::state::{ScheduledState, ScheduledThread};

/// Sentinel for a pool slot no state has claimed yet.
const ALL_CPUS: u64 = u64::MAX;

/// How pool threads synchronize each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// No blocking synchronization: threads free-run and only check the
    /// stop flag. Pace must come from the chains themselves, typically a
    /// synchronised input broker.
    Free,
    /// Threads pass a start/stop gate every cycle; stopping closes it.
    StartStopGated,
    /// Gate plus a rendezvous of all used slots at the top of each cycle.
    CycleBarrier,
}

/// Pool size: each distinct affinity mask contributes the largest number
/// of simultaneous threads any single state runs on it.
pub(crate) fn compute_max_threads(states: &[Arc<ScheduledState>]) -> usize {
    let mut max_threads = 0usize;
    for (i, state) in states.iter().enumerate() {
        for (j, thread) in state.threads.iter().enumerate() {
            let cpu = thread.cpu_mask;
            let mut found = false;
            for (h, other) in states.iter().enumerate().take(i + 1) {
                let limit = if h == i { j } else { other.threads.len() };
                if other.threads[..limit].iter().any(|t| t.cpu_mask == cpu) {
                    found = true;
                    break;
                }
            }
            if !found {
                let widest = states[i..]
                    .iter()
                    .map(|s| s.threads.iter().filter(|t| t.cpu_mask == cpu).count())
                    .max()
                    .unwrap_or(0);
                max_threads += widest;
            }
        }
    }
    max_threads
}

/// Assign `(state, thread)` to a pool slot. Prefers a slot a prior state
/// already bound to the same mask; otherwise takes the first slot still
/// unclaimed by the immediately preceding state.
fn assign_slot(
    cpu: u64,
    state: usize,
    thread: usize,
    cpu_map: &mut [Vec<u64>],
    thread_map: &mut [Vec<usize>],
    max_threads: usize,
) -> Result<()> {
    let mut found = false;
    let mut first_invalid: Option<usize> = None;

    for h in 0..max_threads {
        if found {
            break;
        }
        if cpu_map[state][h] == ALL_CPUS {
            let mut all_invalids = false;
            let mut k = 0;
            while k < state && !found {
                found = cpu_map[k][h] == cpu;
                if found {
                    cpu_map[state][h] = cpu;
                    thread_map[state][thread] = h;
                }
                all_invalids = cpu_map[k][h] == ALL_CPUS;
                k += 1;
            }
            if (all_invalids || state == 0) && first_invalid.is_none() {
                first_invalid = Some(h);
            }
        }
    }
    if !found {
        let slot = first_invalid.ok_or(SchedulerError::PoolSlotUnavailable { state, thread })?;
        cpu_map[state][slot] = cpu;
        thread_map[state][thread] = slot;
    }
    Ok(())
}

pub(crate) struct PoolMaps {
    pub max_threads: usize,
    /// `thread_map[state][thread]` is the pool slot running that thread.
    pub thread_map: Vec<Vec<usize>>,
}

pub(crate) fn build_pool_maps(states: &[Arc<ScheduledState>]) -> Result<PoolMaps> {
    let max_threads = compute_max_threads(states);
    let mut cpu_map = vec![vec![ALL_CPUS; max_threads]; states.len()];
    let mut thread_map: Vec<Vec<usize>> =
        states.iter().map(|s| vec![0; s.threads.len()]).collect();
    for (i, state) in states.iter().enumerate() {
        for (j, thread) in state.threads.iter().enumerate() {
            assign_slot(
                thread.cpu_mask,
                i,
                j,
                &mut cpu_map,
                &mut thread_map,
                max_threads,
            )?;
        }
    }
    Ok(PoolMaps {
        max_threads,
        thread_map,
    })
}

struct PoolShared {
    gate: EventGate,
    barrier: CycleBarrier,
    epoch: StateEpoch,
    stop: AtomicBool,
    running: AtomicBool,
    /// Per buffer index: which scheduled thread each pool slot runs.
    /// Rewritten only for the inactive buffer during preparation.
    slots: [RwLock<Vec<Option<ScheduledThread>>>; 2],
    next_participants: AtomicUsize,
}

pub struct PooledScheduler {
    core: Arc<SchedulerCore>,
    shared: Arc<PoolShared>,
    sync_mode: SyncMode,
    maps: PoolMaps,
    handles: Mutex<Vec<JoinHandle<()>>>,
    started: AtomicBool,
}

impl PooledScheduler {
    pub fn new(core: SchedulerCore, sync_mode: SyncMode) -> Result<Self> {
        let maps = build_pool_maps(core.states())?;
        let empty = || RwLock::new(vec![None; maps.max_threads]);
        Ok(PooledScheduler {
            core: Arc::new(core),
            shared: Arc::new(PoolShared {
                gate: EventGate::new(false),
                barrier: CycleBarrier::new(),
                epoch: StateEpoch::new(),
                stop: AtomicBool::new(true),
                running: AtomicBool::new(true),
                slots: [empty(), empty()],
                next_participants: AtomicUsize::new(0),
            }),
            sync_mode,
            maps,
            handles: Mutex::new(Vec::new()),
            started: AtomicBool::new(false),
        })
    }

    pub fn core(&self) -> &SchedulerCore {
        &self.core
    }

    pub fn max_threads(&self) -> usize {
        self.maps.max_threads
    }

    /// Resolve the named state into the inactive schedule slot and
    /// rewrite the inactive pool-slot assignments accordingly.
    pub fn prepare_next_state(&self, next_name: &str) -> Result<()> {
        let next = self.core.prepare_next_state(next_name)?;
        let state_index = self.core.state_index(next_name)?;
        let state = &self.core.states()[state_index];

        let mut slots = self.shared.slots[next.as_usize()].write();
        slots.iter_mut().for_each(|slot| *slot = None);
        for (thread_index, thread) in state.threads.iter().enumerate() {
            slots[self.maps.thread_map[state_index][thread_index]] = Some(thread.clone());
        }
        self.shared
            .next_participants
            .store(state.threads.len(), Ordering::Release);
        Ok(())
    }

    /// Activate the prepared state and let the pool cycle on it. The
    /// first call spawns the pool threads; later calls reuse them.
    pub fn start_next_state_execution(&self) -> Result<()> {
        let active = self.core.activate_prepared();
        self.core
            .scheduled_state(active)
            .ok_or(SchedulerError::NoPreparedState)?;

        self.shared
            .barrier
            .set_participants(self.shared.next_participants.load(Ordering::Acquire));
        self.shared.stop.store(false, Ordering::Release);

        if !self.started.swap(true, Ordering::AcqRel) {
            self.spawn_pool()?;
        }

        // Wake slots parked by the previous state, then open the gate.
        self.shared.epoch.bump();
        self.shared.gate.open();
        Ok(())
    }

    /// Stop cycling after the in-flight cycle; the pool threads stay
    /// alive, parked for the next start.
    pub fn stop_current_state_execution(&self) {
        self.shared.stop.store(true, Ordering::Release);
        self.shared.gate.close();
    }

    fn spawn_pool(&self) -> Result<()> {
        let mut handles = self.handles.lock();
        for slot_index in 0..self.maps.max_threads {
            let core = Arc::clone(&self.core);
            let shared = Arc::clone(&self.shared);
            let mode = self.sync_mode;
            let spawned = std::thread::Builder::new()
                .name(format!("cyclo-pool-{slot_index}"))
                .spawn(move || worker_loop(core, shared, mode, slot_index));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(error) => {
                    drop(handles);
                    self.shutdown();
                    return Err(SchedulerError::ThreadSpawn(error));
                }
            }
        }
        Ok(())
    }

    fn shutdown(&self) {
        self.shared.running.store(false, Ordering::Release);
        self.shared.stop.store(true, Ordering::Release);
        self.shared.gate.open();
        self.shared.barrier.release_all();
        self.shared.epoch.bump();
        for handle in self.handles.lock().drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for PooledScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    core: Arc<SchedulerCore>,
    shared: Arc<PoolShared>,
    mode: SyncMode,
    slot_index: usize,
) {
    let mut last_cycle = None;
    loop {
        if !shared.running.load(Ordering::Acquire) {
            break;
        }
        // Captured before the gate and slot reads so a state change
        // between here and a park cannot be missed.
        let epoch_seen = shared.epoch.current();
        match mode {
            SyncMode::Free => {
                if shared.stop.load(Ordering::Acquire) {
                    shared.epoch.wait_past(epoch_seen);
                    last_cycle = None;
                    continue;
                }
            }
            SyncMode::StartStopGated | SyncMode::CycleBarrier => shared.gate.wait(),
        }
        if !shared.running.load(Ordering::Acquire) {
            break;
        }

        let buffer = core.buffer_index();
        let assigned = shared.slots[buffer.as_usize()].read()[slot_index].clone();
        match assigned {
            Some(thread) => {
                if mode == SyncMode::CycleBarrier {
                    shared.barrier.arrive_and_wait();
                }
                core.run_cycle(&thread, buffer, &mut last_cycle);
            }
            None => {
                // This slot is not used by the active state: park until
                // the next state change.
                shared.epoch.wait_past(epoch_seen);
                last_cycle = None;
            }
        }
    }
}
