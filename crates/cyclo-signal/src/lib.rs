// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Signal model and double-buffered real-time memory.
//!
//! This crate defines the types shared by the data brokers and the
//! schedulers: signal descriptors, the [`DualBufferMemory`] that backs a
//! data source across state changes, the [`RtContext`] holding the active
//! buffer index, the [`Executable`] trait implemented by functions and
//! brokers alike, and the timing probes the schedulers publish into.

mod context;
mod error;
mod executable;
mod memory;
mod timing;
mod types;

pub use context::RtContext;
pub use error::{Result, SignalError};
pub use executable::{Executable, SyncSource};
pub use memory::{DualBufferMemory, DualBufferMemoryBuilder};
pub use timing::{TimingProbe, TimingSource};
pub use types::{
    BasicType, BufferIndex, SignalDescriptor, SignalDirection, TypeDescriptor,
};
