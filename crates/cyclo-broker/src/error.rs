// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Broker configuration errors.
//!
//! These only arise during `init`; once a copy table is built, executing
//! it reports failure through the boolean `Executable` contract instead.

use cyclo_signal::SignalError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// The data source refused to resolve a signal or an address.
    #[error(transparent)]
    Resolution(#[from] SignalError),

    /// A declared byte range extends past the end of its signal.
    #[error("range {offset}..{} exceeds signal {signal} of {size} bytes", offset + size_of_range)]
    RangeBeyondSignal {
        signal: usize,
        offset: usize,
        size_of_range: usize,
        size: usize,
    },

    /// A packed bit window extends past the end of its signal.
    #[error("bit window of {bits} bits does not fit signal {signal} of {size} bytes")]
    BitWindowBeyondSignal { signal: usize, bits: u64, size: usize },

    /// A bit window wider than the conversion engine supports.
    #[error("bit field of {bits} bits on signal {signal} exceeds the 128-bit working register")]
    FieldTooWide { signal: usize, bits: u32 },
}

pub type Result<T> = std::result::Result<T, BrokerError>;
