// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! One-OS-thread-per-RT-thread scheduler.
//!
//! Starting a state spawns one named OS thread per declared real-time
//! thread of that state; stopping raises the flag and joins them. A state
//! change is stop, prepare, start: threads of the old state never see the
//! new table.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::core::SchedulerCore;
use crate::error::{Result, SchedulerError};

pub struct ThreadedScheduler {
    core: Arc<SchedulerCore>,
    stop: Arc<AtomicBool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl ThreadedScheduler {
    pub fn new(core: SchedulerCore) -> Self {
        ThreadedScheduler {
            core: Arc::new(core),
            stop: Arc::new(AtomicBool::new(false)),
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn core(&self) -> &SchedulerCore {
        &self.core
    }

    pub fn prepare_next_state(&self, next_name: &str) -> Result<()> {
        self.core.prepare_next_state(next_name)?;
        Ok(())
    }

    /// Activate the prepared state and spawn its threads. A spawn failure
    /// is fatal: already-spawned threads are stopped again before the
    /// error is returned.
    pub fn start_next_state_execution(&self) -> Result<()> {
        let active = self.core.activate_prepared();
        let state = self
            .core
            .scheduled_state(active)
            .ok_or(SchedulerError::NoPreparedState)?;

        self.stop.store(false, Ordering::Release);
        let mut handles = self.handles.lock();
        for index in 0..state.threads.len() {
            let core = Arc::clone(&self.core);
            let state = Arc::clone(&state);
            let stop = Arc::clone(&self.stop);
            let spawned = std::thread::Builder::new()
                .name(format!("{}.{}", state.name, state.threads[index].name))
                .spawn(move || {
                    let thread = &state.threads[index];
                    let mut last_cycle = None;
                    while !stop.load(Ordering::Acquire) {
                        let buffer = core.buffer_index();
                        core.run_cycle(thread, buffer, &mut last_cycle);
                    }
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(error) => {
                    self.stop.store(true, Ordering::Release);
                    for handle in handles.drain(..) {
                        let _ = handle.join();
                    }
                    return Err(SchedulerError::ThreadSpawn(error));
                }
            }
        }
        Ok(())
    }

    /// Raise the stop flag and wait for every thread of the current state
    /// to finish its cycle and exit.
    pub fn stop_current_state_execution(&self) {
        self.stop.store(true, Ordering::Release);
        for handle in self.handles.lock().drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for ThreadedScheduler {
    fn drop(&mut self) {
        self.stop_current_state_execution();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use parking_lot::Mutex;

    use cyclo_signal::{RtContext, TimingSource};

    use super::*;
    use crate::core::testutil::Recorder;
    use crate::state::{ExecutableRegistry, StateDeclaration, ThreadDeclaration};

    fn two_thread_scheduler() -> (ThreadedScheduler, Arc<Recorder>, Arc<Recorder>) {
        let mut registry = ExecutableRegistry::new();
        let a = Recorder::new("A", Arc::new(Mutex::new(Vec::new())));
        let b = Recorder::new("B", Arc::new(Mutex::new(Vec::new())));
        registry.register_bare("A", a.clone());
        registry.register_bare("B", b.clone());
        let declarations = vec![StateDeclaration {
            name: "Run".to_owned(),
            threads: vec![
                ThreadDeclaration {
                    name: "T1".to_owned(),
                    cpu_mask: 0x1,
                    functions: vec!["A".to_owned()],
                },
                ThreadDeclaration {
                    name: "T2".to_owned(),
                    cpu_mask: 0x2,
                    functions: vec!["B".to_owned()],
                },
            ],
        }];
        let core = SchedulerCore::configure(
            &declarations,
            &registry,
            Arc::new(RtContext::new()),
            Arc::new(TimingSource::new()),
            None,
        )
        .unwrap();
        (ThreadedScheduler::new(core), a, b)
    }

    #[test]
    fn threads_cycle_until_stopped_and_not_after() {
        let (scheduler, a, b) = two_thread_scheduler();
        scheduler.prepare_next_state("Run").unwrap();
        scheduler.start_next_state_execution().unwrap();

        std::thread::sleep(Duration::from_millis(20));
        scheduler.stop_current_state_execution();

        let (ran_a, ran_b) = (a.executions(), b.executions());
        assert!(ran_a > 0);
        assert!(ran_b > 0);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(a.executions(), ran_a);
        assert_eq!(b.executions(), ran_b);
    }

    #[test]
    fn restart_after_stop_resumes_cycling() {
        let (scheduler, a, _b) = two_thread_scheduler();
        scheduler.prepare_next_state("Run").unwrap();
        scheduler.start_next_state_execution().unwrap();
        std::thread::sleep(Duration::from_millis(10));
        scheduler.stop_current_state_execution();
        let first_run = a.executions();

        scheduler.prepare_next_state("Run").unwrap();
        scheduler.start_next_state_execution().unwrap();
        std::thread::sleep(Duration::from_millis(10));
        scheduler.stop_current_state_execution();
        assert!(a.executions() > first_run);
    }
}
