// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Single-threaded scheduler.
//!
//! Runs the active state's one thread in the caller's thread, free
//! running: no gating, no spawning. Meant for bare-metal style
//! deployments and tests; `max_cycles` bounds the loop, and the stop flag
//! is honored between cycles.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::SchedulerCore;
use crate::error::{Result, SchedulerError};

pub struct BareScheduler {
    core: SchedulerCore,
    stop: AtomicBool,
    max_cycles: Option<u64>,
}

impl BareScheduler {
    pub fn new(core: SchedulerCore, max_cycles: Option<u64>) -> Self {
        BareScheduler {
            core,
            stop: AtomicBool::new(false),
            max_cycles,
        }
    }

    pub fn core(&self) -> &SchedulerCore {
        &self.core
    }

    pub fn prepare_next_state(&self, next_name: &str) -> Result<()> {
        self.core.prepare_next_state(next_name)?;
        Ok(())
    }

    /// Activate the prepared state and cycle in the calling thread until
    /// the stop flag is raised or `max_cycles` is reached.
    pub fn start_next_state_execution(&self) -> Result<()> {
        let active = self.core.activate_prepared();
        let state = self
            .core
            .scheduled_state(active)
            .ok_or(SchedulerError::NoPreparedState)?;
        if state.threads.len() != 1 {
            return Err(SchedulerError::SingleThreadRequired {
                state: state.name.clone(),
                threads: state.threads.len(),
            });
        }
        let thread = &state.threads[0];

        self.stop.store(false, Ordering::Release);
        let mut cycles = 0u64;
        let mut last_cycle = None;
        while !self.stop.load(Ordering::Acquire) {
            if self.max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }
            let buffer = self.core.buffer_index();
            self.core.run_cycle(thread, buffer, &mut last_cycle);
            cycles += 1;
        }
        Ok(())
    }

    /// Raise the stop flag; the running loop exits after its current
    /// cycle. Callable from an executable or another thread.
    pub fn stop_current_state_execution(&self) {
        self.stop.store(true, Ordering::Release);
    }
}
