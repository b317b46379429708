// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Signal brokers: the copy layer between function memory and a
//! double-buffered data source.
//!
//! A broker is an [`Executable`](cyclo_signal::Executable) scheduled
//! around its function: input brokers run before it, output brokers after
//! it. All address resolution happens once at init; per cycle a broker
//! only walks its copy table against the buffer index snapshotted by the
//! scheduler.

mod bit_range;
mod copy_table;
mod error;
mod resolve;
mod stateful;
mod sync_input;

pub use bit_range::{BitRangeInputBroker, BitRangeOutputBroker, BitRangeSpec};
pub use copy_table::{CopyTable, DualBufferCopyEntry};
pub use error::{BrokerError, Result};
pub use resolve::{BrokerDataSource, BrokerKind, ByteRange, FunctionSignal};
pub use stateful::{StatefulBrokerCore, StatefulInputBroker, StatefulOutputBroker};
pub use sync_input::SynchronisedInputBroker;
