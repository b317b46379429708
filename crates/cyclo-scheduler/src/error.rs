// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Scheduler errors.
//!
//! All of these are fatal: they arise while configuring or (re)starting a
//! state, never inside the cyclic loop. Runtime executable failures are
//! reported through logging and the failure notifier instead.

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("no state named '{0}' is configured")]
    UnknownState(String),

    #[error("state '{state}' thread '{thread}' references unknown function '{function}'")]
    UnknownFunction {
        state: String,
        thread: String,
        function: String,
    },

    #[error("no next state has been prepared")]
    NoPreparedState,

    #[error("state '{state}' declares {threads} threads; this scheduler runs exactly one")]
    SingleThreadRequired { state: String, threads: usize },

    #[error("failed to spawn execution thread")]
    ThreadSpawn(#[from] std::io::Error),

    #[error("no pool slot available for state {state} thread {thread}")]
    PoolSlotUnavailable { state: usize, thread: usize },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
