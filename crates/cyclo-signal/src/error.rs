// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Error types for signal memory operations.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    #[error("signal index {index} out of range ({count} signals registered)")]
    UnknownSignal { index: usize, count: usize },

    #[error("range {offset}..{} exceeds signal '{name}' of {size} bytes", offset + len)]
    RangeOutOfBounds {
        name: String,
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("no signal named '{0}' registered")]
    UnknownSignalName(String),
}

pub type Result<T> = std::result::Result<T, SignalError>;
