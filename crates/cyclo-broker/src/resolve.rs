// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Broker-side view of a data source.
//!
//! Brokers resolve addresses exactly once, at init. This trait is the
//! whole surface they need for that: stable per-buffer signal addresses
//! plus the declared signal list of one function in one direction.

use std::ptr::NonNull;

use cyclo_signal::{BufferIndex, SignalDirection};

/// One contiguous byte range of a data-source signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: usize,
    pub size: usize,
}

impl ByteRange {
    pub const fn new(offset: usize, size: usize) -> Self {
        ByteRange { offset, size }
    }
}

/// Which broker family serves a signal. Byte brokers and bit brokers are
/// never mixed in one copy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerKind {
    StatefulByte,
    SynchronisedByte,
    BitRange,
}

/// One function signal as declared against the data source.
///
/// `ranges` is the declaration order and must be preserved: the copy
/// table built from it is ordered, and a synchronizing signal is required
/// to produce entry 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignal {
    /// Index of the backing data-source signal.
    pub signal: usize,
    pub ranges: Vec<ByteRange>,
    /// Byte offset of this signal inside the function's own memory block.
    pub gam_offset: usize,
    pub broker: BrokerKind,
}

/// What a broker asks of the data source during `init`.
pub trait BrokerDataSource {
    /// Stable address of a signal's storage in the given buffer, valid for
    /// the application's lifetime.
    fn signal_address(
        &self,
        signal: usize,
        buffer: BufferIndex,
    ) -> cyclo_signal::Result<NonNull<u8>>;

    fn signal_size(&self, signal: usize) -> cyclo_signal::Result<usize>;

    /// Signals the named function declared in the given direction,
    /// in declaration order.
    fn function_signals(&self, function: &str, direction: SignalDirection) -> &[FunctionSignal];
}
