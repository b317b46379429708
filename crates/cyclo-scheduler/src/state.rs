// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Scheduled-state tables.
//!
//! A state names the real-time threads that run while it is active; each
//! thread carries the flattened, ordered executable chain built from its
//! declared functions: input brokers, then the function, then output
//! brokers, in declaration order. Tables are immutable once built; state
//! changes swap whole tables, never edit them.

use std::collections::HashMap;
use std::sync::Arc;

use cyclo_signal::{Executable, TimingProbe};

/// Plain declaration of one real-time thread, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadDeclaration {
    pub name: String,
    /// Affinity mask the thread is grouped by. Pool schedulers use it to
    /// share slots between states; it is not applied to the OS.
    pub cpu_mask: u64,
    /// Function names, in execution order.
    pub functions: Vec<String>,
}

/// Plain declaration of one application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDeclaration {
    pub name: String,
    pub threads: Vec<ThreadDeclaration>,
}

/// The executables one function contributes to a thread's chain.
#[derive(Clone)]
pub struct FunctionExecutables {
    pub input_brokers: Vec<Arc<dyn Executable>>,
    pub function: Arc<dyn Executable>,
    pub output_brokers: Vec<Arc<dyn Executable>>,
}

/// Name-keyed registry the scheduler resolves declarations against.
#[derive(Default)]
pub struct ExecutableRegistry {
    functions: HashMap<String, FunctionExecutables>,
}

impl ExecutableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, executables: FunctionExecutables) {
        self.functions.insert(name.into(), executables);
    }

    /// Register a function with no brokers, common for pure computation.
    pub fn register_bare(&mut self, name: impl Into<String>, function: Arc<dyn Executable>) {
        self.register(
            name,
            FunctionExecutables {
                input_brokers: Vec::new(),
                function,
                output_brokers: Vec::new(),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&FunctionExecutables> {
        self.functions.get(name)
    }
}

/// One executable plus the probe its cumulative cycle time is written to.
#[derive(Clone)]
pub struct ExecutableSlot {
    pub executable: Arc<dyn Executable>,
    pub probe: TimingProbe,
}

/// One resolved real-time thread of a state.
#[derive(Clone)]
pub struct ScheduledThread {
    pub name: String,
    pub cpu_mask: u64,
    pub executables: Arc<[ExecutableSlot]>,
    pub cycle_probe: TimingProbe,
}

/// One resolved state: the table a scheduler runs from.
pub struct ScheduledState {
    pub name: String,
    pub threads: Vec<ScheduledThread>,
}
