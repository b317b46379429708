// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Error types for bit-field conversions.

/// Structural misuse of the conversion engine.
///
/// Out-of-range *values* are never errors: they saturate by design. These
/// variants cover malformed windows only, and callers are expected to treat
/// the affected signal as stale rather than abort.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitFieldError {
    /// The bit window extends past the end of the buffer.
    #[error("bit window needs {needed} bytes but the buffer holds {len}")]
    OutOfBounds { needed: usize, len: usize },

    /// The source and destination windows cannot both fit in the widest
    /// (128-bit) working word after normalization.
    #[error("bit windows of {source_bits} and {destination_bits} bits exceed the 128-bit working register")]
    WindowTooWide {
        source_bits: u64,
        destination_bits: u64,
    },
}

pub type Result<T> = std::result::Result<T, BitFieldError>;
