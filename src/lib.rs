// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! # cyclo
//!
//! Real-time cyclic execution core: deterministic schedulers, dual-buffer
//! signal brokering and a bit-exact conversion engine, distilled into a
//! small set of composable crates.
//!
//! This umbrella crate re-exports all components; each member crate is
//! also usable individually for selective use:
//!
//! - [`bitfield`]: bit-window conversions with saturation, plus the
//!   128-bit working register
//! - [`signal`]: signal descriptors, double-buffered data-source memory,
//!   the `Executable` contract and timing probes
//! - [`broker`]: copy-table brokers between function memory and data
//!   sources
//! - [`scheduler`]: scheduled-state tables and the three cyclic executors
//! - [`config`]: TOML configuration loading and validation
//! - [`observability`]: `tracing` subscriber setup
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cyclo::prelude::*;
//! use std::sync::Arc;
//!
//! let config = cyclo::config::load_config(None).expect("config");
//! cyclo::observability::init_logging(Some(&config.application.log_filter)).expect("logging");
//!
//! let mut registry = ExecutableRegistry::new();
//! // ... register functions and brokers ...
//!
//! let core = SchedulerCore::configure(
//!     &cyclo::declarations_from_config(&config),
//!     &registry,
//!     Arc::new(RtContext::new()),
//!     Arc::new(TimingSource::new()),
//!     None,
//! )
//! .expect("configure");
//! let scheduler = PooledScheduler::new(core, cyclo::sync_mode_from_config(&config))
//!     .expect("scheduler");
//! scheduler.prepare_next_state(&config.application.first_state).expect("prepare");
//! scheduler.start_next_state_execution().expect("start");
//! ```

pub use cyclo_bitfield as bitfield;
pub use cyclo_broker as broker;
pub use cyclo_config as config;
pub use cyclo_observability as observability;
pub use cyclo_scheduler as scheduler;
pub use cyclo_signal as signal;

use cyclo_config::{CycloConfig, SyncModeConfig};
use cyclo_scheduler::{StateDeclaration, SyncMode, ThreadDeclaration};

/// Map the configuration's state sections onto scheduler declarations.
pub fn declarations_from_config(config: &CycloConfig) -> Vec<StateDeclaration> {
    config
        .states
        .iter()
        .map(|state| StateDeclaration {
            name: state.name.clone(),
            threads: state
                .threads
                .iter()
                .map(|thread| ThreadDeclaration {
                    name: thread.name.clone(),
                    cpu_mask: thread.cpu_mask,
                    functions: thread.functions.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Map the configured sync mode onto the pooled scheduler's.
pub fn sync_mode_from_config(config: &CycloConfig) -> SyncMode {
    match config.scheduler.sync_mode {
        SyncModeConfig::Free => SyncMode::Free,
        SyncModeConfig::StartStopGated => SyncMode::StartStopGated,
        SyncModeConfig::CycleBarrier => SyncMode::CycleBarrier,
    }
}

pub mod prelude {
    //! The types most applications touch.

    pub use crate::bitfield::{BitCursor, DoubleInteger};
    pub use crate::broker::{
        BitRangeInputBroker, BitRangeOutputBroker, BrokerDataSource, StatefulInputBroker,
        StatefulOutputBroker, SynchronisedInputBroker,
    };
    pub use crate::config::{load_config, CycloConfig};
    pub use crate::scheduler::{
        BareScheduler, ExecutableRegistry, PooledScheduler, SchedulerCore, SyncMode,
        ThreadedScheduler,
    };
    pub use crate::signal::{
        BufferIndex, DualBufferMemory, DualBufferMemoryBuilder, Executable, RtContext,
        SignalDescriptor, SyncSource, TimingSource, TypeDescriptor,
    };
}
