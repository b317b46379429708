// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! The shared buffer-index cell.
//!
//! One `RtContext` is owned by the application object and injected into
//! schedulers and brokers; nothing reads the active buffer through any
//! other channel. Worker threads snapshot the index once at the top of
//! each cycle so that every access within that cycle observes the same
//! value.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::types::BufferIndex;

#[derive(Debug, Default)]
pub struct RtContext {
    buffer_index: AtomicU8,
}

impl RtContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the active buffer index.
    pub fn buffer_index(&self) -> BufferIndex {
        BufferIndex::new(self.buffer_index.load(Ordering::Acquire))
    }

    /// Flip the active buffer. Called on state transition only, between
    /// cycles, by the single serialized state-switch path.
    pub fn flip(&self) -> BufferIndex {
        let previous = self.buffer_index.fetch_xor(1, Ordering::AcqRel);
        BufferIndex::new(previous ^ 1)
    }
}
