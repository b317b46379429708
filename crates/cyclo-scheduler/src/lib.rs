// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Cyclic executors for real-time function chains.
//!
//! States are resolved once into immutable tables of
//! [`Executable`](cyclo_signal::Executable) chains; a strategy then cycles
//! them: [`BareScheduler`] in the caller's thread, [`ThreadedScheduler`]
//! with one OS thread per real-time thread, or [`PooledScheduler`] over a
//! fixed pool that survives state changes. State transitions follow the
//! prepare/activate discipline of the dual-buffer data sources: prepare
//! touches only inactive slots, activation is one atomic flip.

mod bare;
mod core;
mod error;
mod gates;
mod pooled;
mod state;
mod threaded;

pub use crate::core::{FailureNotifier, SchedulerCore};

pub use bare::BareScheduler;
pub use error::{Result, SchedulerError};
pub use gates::{CycleBarrier, EventGate};
pub use pooled::{PooledScheduler, SyncMode};
pub use state::{
    ExecutableRegistry, ExecutableSlot, FunctionExecutables, ScheduledState, ScheduledThread,
    StateDeclaration, ThreadDeclaration,
};
pub use threaded::ThreadedScheduler;
