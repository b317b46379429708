// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Double-buffered signal memory.
//!
//! Two full copies of all signal storage, indexed 0/1. While buffer `i` is
//! active (read by the execution threads, written by the running
//! functions' own output signals), buffer `1-i` may be written by the
//! serialized state-preparation logic. The buffer-index flip is the only
//! mutation of "which is active" and happens between cycles, never
//! mid-cycle. No per-signal locking exists; that handoff discipline is the
//! entire safety story, and the unsafe seam below documents it.
//!
//! Addresses are stable for the lifetime of the value: buffers are
//! allocated once at `build` time and never reallocated, which is what
//! lets brokers capture raw pointers at init and reuse them every cycle.

use std::cell::UnsafeCell;
use std::ptr::NonNull;

use crate::error::{Result, SignalError};
use crate::types::{BufferIndex, SignalDescriptor};

/// Builder: declare all signals, then seal into a [`DualBufferMemory`].
#[derive(Debug, Default)]
pub struct DualBufferMemoryBuilder {
    signals: Vec<SignalDescriptor>,
}

impl DualBufferMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signal; returns its index.
    pub fn add_signal(&mut self, descriptor: SignalDescriptor) -> usize {
        self.signals.push(descriptor);
        self.signals.len() - 1
    }

    pub fn build(self) -> DualBufferMemory {
        let mut offsets = Vec::with_capacity(self.signals.len());
        let mut total = 0usize;
        for s in &self.signals {
            offsets.push(total);
            total += s.byte_size();
        }
        let alloc = || -> Box<[UnsafeCell<u8>]> {
            (0..total).map(|_| UnsafeCell::new(0)).collect()
        };
        DualBufferMemory {
            buffers: [alloc(), alloc()],
            offsets,
            signals: self.signals,
        }
    }
}

/// The sealed buffer pair plus the signal offset table.
pub struct DualBufferMemory {
    buffers: [Box<[UnsafeCell<u8>]>; 2],
    offsets: Vec<usize>,
    signals: Vec<SignalDescriptor>,
}

// SAFETY: the cells are only ever accessed under the buffer-pair handoff
// discipline described in the module docs; concurrent writers never target
// the same (buffer, signal) region within a cycle.
unsafe impl Sync for DualBufferMemory {}
unsafe impl Send for DualBufferMemory {}

impl DualBufferMemory {
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn descriptor(&self, signal: usize) -> Result<&SignalDescriptor> {
        self.signals.get(signal).ok_or(SignalError::UnknownSignal {
            index: signal,
            count: self.signals.len(),
        })
    }

    pub fn signal_index(&self, name: &str) -> Result<usize> {
        self.signals
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| SignalError::UnknownSignalName(name.to_owned()))
    }

    pub fn signal_size(&self, signal: usize) -> Result<usize> {
        self.descriptor(signal).map(|d| d.byte_size())
    }

    /// Stable address of a signal's storage in the given buffer.
    ///
    /// The addresses for the two buffer indices never alias and remain
    /// valid until the `DualBufferMemory` is dropped.
    pub fn signal_address(&self, signal: usize, buffer: BufferIndex) -> Result<NonNull<u8>> {
        let offset = *self.offsets.get(signal).ok_or(SignalError::UnknownSignal {
            index: signal,
            count: self.signals.len(),
        })?;
        let cell = &self.buffers[buffer.as_usize()][offset];
        // SAFETY: offset is in range by construction of the offset table.
        Ok(unsafe { NonNull::new_unchecked(cell.get()) })
    }

    fn checked_range(&self, signal: usize, offset: usize, len: usize) -> Result<usize> {
        let desc = self.descriptor(signal)?;
        let size = desc.byte_size();
        if offset + len > size {
            return Err(SignalError::RangeOutOfBounds {
                name: desc.name.clone(),
                offset,
                len,
                size,
            });
        }
        Ok(self.offsets[signal] + offset)
    }

    /// Write bytes into a signal's storage in one buffer. Used by the
    /// state-preparation path, which by contract only touches the
    /// *inactive* buffer while threads may be running.
    pub fn write_signal(
        &self,
        buffer: BufferIndex,
        signal: usize,
        offset: usize,
        bytes: &[u8],
    ) -> Result<()> {
        let base = self.checked_range(signal, offset, bytes.len())?;
        let cells = &self.buffers[buffer.as_usize()];
        for (i, &b) in bytes.iter().enumerate() {
            // SAFETY: range checked above; handoff discipline guarantees no
            // concurrent access to this (buffer, signal) region.
            unsafe { *cells[base + i].get() = b };
        }
        Ok(())
    }

    /// Read bytes from a signal's storage in one buffer.
    pub fn read_signal(
        &self,
        buffer: BufferIndex,
        signal: usize,
        offset: usize,
        out: &mut [u8],
    ) -> Result<()> {
        let base = self.checked_range(signal, offset, out.len())?;
        let cells = &self.buffers[buffer.as_usize()];
        for (i, slot) in out.iter_mut().enumerate() {
            // SAFETY: as in write_signal.
            unsafe { *slot = *cells[base + i].get() };
        }
        Ok(())
    }
}
