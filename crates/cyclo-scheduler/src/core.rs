// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Strategy-independent scheduler logic.
//!
//! `SchedulerCore` owns the resolved state tables, the buffer-index
//! context and the timing probes. The three execution strategies only add
//! threading and gating around `run_cycle`.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use cyclo_signal::{BufferIndex, RtContext, TimingSource};

use crate::error::{Result, SchedulerError};
use crate::state::{
    ExecutableRegistry, ExecutableSlot, ScheduledState, ScheduledThread, StateDeclaration,
};

/// One-way, fire-and-forget hook invoked at most once per failed cycle.
pub trait FailureNotifier: Send + Sync {
    fn cycle_failed(&self, thread: &str, executable: &str);
}

pub struct SchedulerCore {
    states: Vec<Arc<ScheduledState>>,
    /// Double-buffered schedule: slot `i` is what threads run while the
    /// buffer index is `i`. Preparation only ever touches the inactive
    /// slot.
    scheduled: Mutex<[Option<Arc<ScheduledState>>; 2]>,
    context: Arc<RtContext>,
    timing: Arc<TimingSource>,
    notifier: Option<Arc<dyn FailureNotifier>>,
}

impl SchedulerCore {
    /// Resolve the declared states against the registry, flattening each
    /// thread's chain as input brokers, function, output brokers per
    /// declared function.
    pub fn configure(
        declarations: &[StateDeclaration],
        registry: &ExecutableRegistry,
        context: Arc<RtContext>,
        timing: Arc<TimingSource>,
        notifier: Option<Arc<dyn FailureNotifier>>,
    ) -> Result<Self> {
        let mut states = Vec::with_capacity(declarations.len());
        for decl in declarations {
            let mut threads = Vec::with_capacity(decl.threads.len());
            for thread in &decl.threads {
                let mut slots = Vec::new();
                for function in &thread.functions {
                    let f = registry.get(function).ok_or_else(|| {
                        SchedulerError::UnknownFunction {
                            state: decl.name.clone(),
                            thread: thread.name.clone(),
                            function: function.clone(),
                        }
                    })?;
                    for broker in &f.input_brokers {
                        slots.push(ExecutableSlot {
                            probe: timing.exec_time_probe(broker.name()),
                            executable: Arc::clone(broker),
                        });
                    }
                    slots.push(ExecutableSlot {
                        probe: timing.exec_time_probe(f.function.name()),
                        executable: Arc::clone(&f.function),
                    });
                    for broker in &f.output_brokers {
                        slots.push(ExecutableSlot {
                            probe: timing.exec_time_probe(broker.name()),
                            executable: Arc::clone(broker),
                        });
                    }
                }
                threads.push(ScheduledThread {
                    cycle_probe: timing.thread_cycle_probe(&decl.name, &thread.name),
                    name: thread.name.clone(),
                    cpu_mask: thread.cpu_mask,
                    executables: slots.into(),
                });
            }
            states.push(Arc::new(ScheduledState {
                name: decl.name.clone(),
                threads,
            }));
        }
        Ok(SchedulerCore {
            states,
            scheduled: Mutex::new([None, None]),
            context,
            timing,
            notifier,
        })
    }

    pub fn states(&self) -> &[Arc<ScheduledState>] {
        &self.states
    }

    pub fn state_index(&self, name: &str) -> Result<usize> {
        self.states
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| SchedulerError::UnknownState(name.to_owned()))
    }

    pub fn context(&self) -> &Arc<RtContext> {
        &self.context
    }

    pub fn timing(&self) -> &Arc<TimingSource> {
        &self.timing
    }

    /// The buffer index the running cycle must use, snapshotted once per
    /// cycle by the caller.
    pub fn buffer_index(&self) -> BufferIndex {
        self.context.buffer_index()
    }

    /// Resolve `next_name` into the inactive schedule slot. The slot a
    /// running thread reads is never touched; the new table only becomes
    /// visible through [`activate_prepared`](Self::activate_prepared).
    pub fn prepare_next_state(&self, next_name: &str) -> Result<BufferIndex> {
        let index = self.state_index(next_name)?;
        let next = self.context.buffer_index().other();
        self.scheduled.lock()[next.as_usize()] = Some(Arc::clone(&self.states[index]));
        Ok(next)
    }

    /// Flip the buffer index, making the prepared schedule (and the
    /// prepared data-source buffer) the active one. Returns the new index.
    pub fn activate_prepared(&self) -> BufferIndex {
        self.context.flip()
    }

    pub fn scheduled_state(&self, buffer: BufferIndex) -> Option<Arc<ScheduledState>> {
        self.scheduled.lock()[buffer.as_usize()].clone()
    }

    /// Run one thread's chain once, in strict table order. A failure
    /// aborts the remaining executables of this cycle; cycling itself
    /// continues at the caller. Each successful executable's probe gets
    /// the cumulative microseconds since the cycle started.
    pub fn execute_single_cycle(&self, thread: &ScheduledThread, buffer: BufferIndex) -> bool {
        let start = Instant::now();
        for slot in thread.executables.iter() {
            let mut ok = true;
            if slot.executable.is_enabled() {
                ok = slot.executable.execute(buffer);
            }
            if !ok {
                tracing::warn!(
                    thread = %thread.name,
                    executable = slot.executable.name(),
                    "executable failed, aborting the remaining chain this cycle"
                );
                if let Some(notifier) = &self.notifier {
                    notifier.cycle_failed(&thread.name, slot.executable.name());
                }
                return false;
            }
            slot.probe.record_micros(start.elapsed().as_micros() as u32);
        }
        true
    }

    /// One full cycle for `thread`: execute the chain and record the
    /// cycle time (elapsed since the previous call) into the thread probe.
    pub fn run_cycle(
        &self,
        thread: &ScheduledThread,
        buffer: BufferIndex,
        last_cycle: &mut Option<Instant>,
    ) -> bool {
        let ok = self.execute_single_cycle(thread, buffer);
        let now = Instant::now();
        if let Some(previous) = last_cycle.replace(now) {
            thread
                .cycle_probe
                .record_micros(now.duration_since(previous).as_micros() as u32);
        }
        ok
    }
}
