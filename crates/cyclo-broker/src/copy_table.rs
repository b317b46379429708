// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! The per-entry copy table shared by the byte brokers.
//!
//! One entry per contiguous range per function signal, in declaration
//! order. The table is built once at init and read-only afterwards; the
//! buffer index chosen at cycle start selects which data-source pointer
//! each entry dereferences.

use std::ptr;

use cyclo_signal::BufferIndex;

/// One contiguous copy between function memory and both data-source
/// buffers.
#[derive(Debug, Clone, Copy)]
pub struct DualBufferCopyEntry {
    /// Function-side address for this range.
    pub gam_ptr: *mut u8,
    /// Base address of the backing signal in each buffer.
    pub ds_ptr: [*mut u8; 2],
    /// Byte offset of the range inside the signal.
    pub ds_offset: usize,
    pub copy_size: usize,
}

impl DualBufferCopyEntry {
    fn ds_range_ptr(&self, buffer: BufferIndex) -> *mut u8 {
        // SAFETY: offset verified against the signal size at init.
        unsafe { self.ds_ptr[buffer.as_usize()].add(self.ds_offset) }
    }

    fn is_null(&self) -> bool {
        self.gam_ptr.is_null() || self.ds_ptr[0].is_null() || self.ds_ptr[1].is_null()
    }
}

/// Ordered copy table over stable addresses.
#[derive(Debug, Default)]
pub struct CopyTable {
    entries: Vec<DualBufferCopyEntry>,
}

// SAFETY: the pointers target the function's private memory block and the
// dual-buffer data source; both outlive the brokers, and access follows
// the buffer-pair handoff discipline (no two executables touch the same
// region of the same buffer concurrently within a cycle).
unsafe impl Send for CopyTable {}
unsafe impl Sync for CopyTable {}

impl CopyTable {
    pub fn push(&mut self, entry: DualBufferCopyEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry from the selected data-source buffer into function
    /// memory. Returns false on a null-entry precondition violation.
    pub fn copy_to_function(&self, buffer: BufferIndex) -> bool {
        for entry in &self.entries {
            if entry.is_null() {
                return false;
            }
            // SAFETY: ranges validated at init; function memory and the
            // data source are disjoint allocations.
            unsafe {
                ptr::copy_nonoverlapping(entry.ds_range_ptr(buffer), entry.gam_ptr, entry.copy_size);
            }
        }
        true
    }

    /// Copy every entry from function memory into the selected data-source
    /// buffer.
    pub fn copy_from_function(&self, buffer: BufferIndex) -> bool {
        for entry in &self.entries {
            if entry.is_null() {
                return false;
            }
            // SAFETY: as in copy_to_function.
            unsafe {
                ptr::copy_nonoverlapping(entry.gam_ptr, entry.ds_range_ptr(buffer), entry.copy_size);
            }
        }
        true
    }
}
