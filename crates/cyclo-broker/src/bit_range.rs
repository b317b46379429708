// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Bit-range brokers.
//!
//! Serve signals whose data-source packing differs from the function-side
//! native layout: sub-byte fields, odd widths, mixed signedness. Each
//! element goes through the conversion engine instead of a flat memcpy,
//! walking both sides with bit cursors. These brokers never share a table
//! with the byte brokers.

use std::ptr::NonNull;
use std::slice;

use cyclo_bitfield::{bit_range_copy, BitCursor};
use cyclo_signal::{BufferIndex, Executable, SignalDirection};

use crate::error::{BrokerError, Result};
use crate::resolve::BrokerDataSource;

/// Description of one packed function signal, supplied alongside the
/// byte-level declarations because the resolution interface carries no
/// sub-byte layout.
#[derive(Debug, Clone, Copy)]
pub struct BitRangeSpec {
    /// Index of the backing data-source signal.
    pub signal: usize,
    /// First bit of the packed window, counted from the signal base.
    pub ds_bit_offset: u32,
    /// Width and signedness of each packed element in the data source.
    pub ds_bits: u32,
    pub ds_signed: bool,
    /// Width and signedness of each element on the function side.
    pub gam_bits: u32,
    pub gam_signed: bool,
    pub elements: u32,
    /// Byte offset of the first element inside the function's memory block.
    pub gam_offset: usize,
}

#[derive(Debug)]
struct BitCopyEntry {
    ds_ptr: [*mut u8; 2],
    ds_len: usize,
    gam_ptr: *mut u8,
    gam_len: usize,
    spec: BitRangeSpec,
}

// SAFETY: same handoff discipline as the byte copy tables; the pointers
// are stable for the application's lifetime.
unsafe impl Send for BitCopyEntry {}
unsafe impl Sync for BitCopyEntry {}

fn build_entries(
    ds: &dyn BrokerDataSource,
    specs: &[BitRangeSpec],
    gam_base: NonNull<u8>,
) -> Result<Vec<BitCopyEntry>> {
    let mut entries = Vec::with_capacity(specs.len());
    for spec in specs {
        if spec.ds_bits > 128 || spec.gam_bits > 128 {
            return Err(BrokerError::FieldTooWide {
                signal: spec.signal,
                bits: spec.ds_bits.max(spec.gam_bits),
            });
        }
        let ds_len = ds.signal_size(spec.signal)?;
        let window_bits =
            spec.ds_bit_offset as u64 + spec.ds_bits as u64 * spec.elements as u64;
        if window_bits > ds_len as u64 * 8 {
            return Err(BrokerError::BitWindowBeyondSignal {
                signal: spec.signal,
                bits: window_bits,
                size: ds_len,
            });
        }
        let gam_len = ((spec.gam_bits as u64 * spec.elements as u64 + 7) / 8) as usize;
        entries.push(BitCopyEntry {
            ds_ptr: [
                ds.signal_address(spec.signal, BufferIndex::ZERO)?.as_ptr(),
                ds.signal_address(spec.signal, BufferIndex::ONE)?.as_ptr(),
            ],
            ds_len,
            // SAFETY: gam_offset stays inside the function block, which
            // the caller sized from the same declarations.
            gam_ptr: unsafe { gam_base.as_ptr().add(spec.gam_offset) },
            gam_len,
            spec: *spec,
        });
    }
    Ok(entries)
}

fn convert_entry(entry: &BitCopyEntry, buffer: BufferIndex, direction: SignalDirection) -> bool {
    let spec = &entry.spec;
    let ds = entry.ds_ptr[buffer.as_usize()];
    let mut ds_cursor = BitCursor::new(0, spec.ds_bit_offset);
    let mut gam_cursor = BitCursor::start();

    // SAFETY: slices cover the signal's storage in the selected buffer and
    // the function's element block; the allocations are disjoint, and the
    // handoff discipline excludes concurrent writers.
    let result = match direction {
        SignalDirection::Input => {
            let src = unsafe { slice::from_raw_parts(ds as *const u8, entry.ds_len) };
            let dst = unsafe { slice::from_raw_parts_mut(entry.gam_ptr, entry.gam_len) };
            (0..spec.elements).try_for_each(|_| {
                bit_range_copy(
                    dst,
                    &mut gam_cursor,
                    spec.gam_bits,
                    spec.gam_signed,
                    src,
                    &mut ds_cursor,
                    spec.ds_bits,
                    spec.ds_signed,
                )
            })
        }
        SignalDirection::Output => {
            let src = unsafe { slice::from_raw_parts(entry.gam_ptr as *const u8, entry.gam_len) };
            let dst = unsafe { slice::from_raw_parts_mut(ds, entry.ds_len) };
            (0..spec.elements).try_for_each(|_| {
                bit_range_copy(
                    dst,
                    &mut ds_cursor,
                    spec.ds_bits,
                    spec.ds_signed,
                    src,
                    &mut gam_cursor,
                    spec.gam_bits,
                    spec.gam_signed,
                )
            })
        }
    };
    if let Err(error) = result {
        tracing::error!(signal = spec.signal, %error, "bit-range conversion failed");
        return false;
    }
    true
}

/// Converts packed data-source elements into function-side values.
#[derive(Debug)]
pub struct BitRangeInputBroker {
    name: String,
    entries: Vec<BitCopyEntry>,
}

impl BitRangeInputBroker {
    pub fn init(
        name: impl Into<String>,
        ds: &dyn BrokerDataSource,
        specs: &[BitRangeSpec],
        gam_base: NonNull<u8>,
    ) -> Result<Self> {
        Ok(BitRangeInputBroker {
            name: name.into(),
            entries: build_entries(ds, specs, gam_base)?,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Executable for BitRangeInputBroker {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, buffer: BufferIndex) -> bool {
        self.entries
            .iter()
            .all(|e| convert_entry(e, buffer, SignalDirection::Input))
    }
}

/// Converts function-side values into packed data-source elements.
#[derive(Debug)]
pub struct BitRangeOutputBroker {
    name: String,
    entries: Vec<BitCopyEntry>,
}

impl BitRangeOutputBroker {
    pub fn init(
        name: impl Into<String>,
        ds: &dyn BrokerDataSource,
        specs: &[BitRangeSpec],
        gam_base: NonNull<u8>,
    ) -> Result<Self> {
        Ok(BitRangeOutputBroker {
            name: name.into(),
            entries: build_entries(ds, specs, gam_base)?,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Executable for BitRangeOutputBroker {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, buffer: BufferIndex) -> bool {
        self.entries
            .iter()
            .all(|e| convert_entry(e, buffer, SignalDirection::Output))
    }
}
