// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Stateful byte brokers.
//!
//! A broker owns one direction of one function's byte-copyable signals.
//! Init walks the function's declared signals, resolves each backing
//! signal's address in both buffers, and appends one copy-table entry per
//! declared range. Ranges map to consecutive positions in the function's
//! memory block, so a function sees its ranged signal as one packed value.

use std::ptr::NonNull;

use cyclo_signal::{BufferIndex, Executable, SignalDirection};

use crate::copy_table::{CopyTable, DualBufferCopyEntry};
use crate::error::{BrokerError, Result};
use crate::resolve::{BrokerDataSource, BrokerKind};

/// Shared init and execute logic of the byte broker family.
#[derive(Debug)]
pub struct StatefulBrokerCore {
    name: String,
    table: CopyTable,
}

impl StatefulBrokerCore {
    /// Build the copy table for `function`'s signals in `direction` that
    /// are served by `kind`. Zero qualifying signals is legal and yields
    /// an empty table.
    pub fn init(
        name: impl Into<String>,
        direction: SignalDirection,
        kind: BrokerKind,
        ds: &dyn BrokerDataSource,
        function: &str,
        gam_base: NonNull<u8>,
    ) -> Result<Self> {
        let mut table = CopyTable::default();
        for fs in ds.function_signals(function, direction) {
            if fs.broker != kind {
                continue;
            }
            let ds_ptr = [
                ds.signal_address(fs.signal, BufferIndex::ZERO)?.as_ptr(),
                ds.signal_address(fs.signal, BufferIndex::ONE)?.as_ptr(),
            ];
            let signal_size = ds.signal_size(fs.signal)?;
            let mut gam_cursor = fs.gam_offset;
            for range in &fs.ranges {
                if range.offset + range.size > signal_size {
                    return Err(BrokerError::RangeBeyondSignal {
                        signal: fs.signal,
                        offset: range.offset,
                        size_of_range: range.size,
                        size: signal_size,
                    });
                }
                table.push(DualBufferCopyEntry {
                    // SAFETY: gam_cursor stays inside the function block,
                    // which the caller sized from the same declarations.
                    gam_ptr: unsafe { gam_base.as_ptr().add(gam_cursor) },
                    ds_ptr,
                    ds_offset: range.offset,
                    copy_size: range.size,
                });
                gam_cursor += range.size;
            }
        }
        Ok(StatefulBrokerCore {
            name: name.into(),
            table,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_count(&self) -> usize {
        self.table.len()
    }

    pub fn table(&self) -> &CopyTable {
        &self.table
    }
}

/// Copies data source → function memory at the start of a cycle.
#[derive(Debug)]
pub struct StatefulInputBroker {
    core: StatefulBrokerCore,
}

impl StatefulInputBroker {
    pub fn init(
        name: impl Into<String>,
        ds: &dyn BrokerDataSource,
        function: &str,
        gam_base: NonNull<u8>,
    ) -> Result<Self> {
        StatefulBrokerCore::init(
            name,
            SignalDirection::Input,
            BrokerKind::StatefulByte,
            ds,
            function,
            gam_base,
        )
        .map(|core| StatefulInputBroker { core })
    }

    pub fn entry_count(&self) -> usize {
        self.core.entry_count()
    }
}

impl Executable for StatefulInputBroker {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn execute(&self, buffer: BufferIndex) -> bool {
        self.core.table().copy_to_function(buffer)
    }
}

/// Copies function memory → data source at the end of a cycle.
#[derive(Debug)]
pub struct StatefulOutputBroker {
    core: StatefulBrokerCore,
}

impl StatefulOutputBroker {
    pub fn init(
        name: impl Into<String>,
        ds: &dyn BrokerDataSource,
        function: &str,
        gam_base: NonNull<u8>,
    ) -> Result<Self> {
        StatefulBrokerCore::init(
            name,
            SignalDirection::Output,
            BrokerKind::StatefulByte,
            ds,
            function,
            gam_base,
        )
        .map(|core| StatefulOutputBroker { core })
    }

    pub fn entry_count(&self) -> usize {
        self.core.entry_count()
    }
}

impl Executable for StatefulOutputBroker {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn execute(&self, buffer: BufferIndex) -> bool {
        self.core.table().copy_from_function(buffer)
    }
}
