// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Signal and type descriptors.
//!
//! Signals are declared once at configuration time and immutable
//! thereafter; everything at runtime addresses them by index.

/// Fundamental kind of a signal element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicType {
    UnsignedInteger,
    SignedInteger,
    Float,
}

/// Element type: kind plus bit width. Integer widths need not be multiples
/// of eight; packed sub-byte signals are served by the bit-range brokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub basic_type: BasicType,
    pub bit_size: u32,
}

impl TypeDescriptor {
    pub const UINT8: TypeDescriptor = TypeDescriptor::unsigned(8);
    pub const UINT16: TypeDescriptor = TypeDescriptor::unsigned(16);
    pub const UINT32: TypeDescriptor = TypeDescriptor::unsigned(32);
    pub const UINT64: TypeDescriptor = TypeDescriptor::unsigned(64);
    pub const INT8: TypeDescriptor = TypeDescriptor::signed(8);
    pub const INT16: TypeDescriptor = TypeDescriptor::signed(16);
    pub const INT32: TypeDescriptor = TypeDescriptor::signed(32);
    pub const INT64: TypeDescriptor = TypeDescriptor::signed(64);
    pub const FLOAT32: TypeDescriptor = TypeDescriptor {
        basic_type: BasicType::Float,
        bit_size: 32,
    };
    pub const FLOAT64: TypeDescriptor = TypeDescriptor {
        basic_type: BasicType::Float,
        bit_size: 64,
    };

    pub const fn unsigned(bit_size: u32) -> Self {
        TypeDescriptor {
            basic_type: BasicType::UnsignedInteger,
            bit_size,
        }
    }

    pub const fn signed(bit_size: u32) -> Self {
        TypeDescriptor {
            basic_type: BasicType::SignedInteger,
            bit_size,
        }
    }

    pub const fn is_signed(&self) -> bool {
        matches!(self.basic_type, BasicType::SignedInteger)
    }

    /// Storage footprint of one element, rounded up to whole bytes.
    pub const fn byte_size(&self) -> usize {
        ((self.bit_size + 7) / 8) as usize
    }
}

/// Declared shape of a signal in the data source.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDescriptor {
    pub name: String,
    pub type_descriptor: TypeDescriptor,
    pub elements: u32,
    pub samples: u32,
    pub dimensions: u8,
}

impl SignalDescriptor {
    pub fn scalar(name: impl Into<String>, type_descriptor: TypeDescriptor) -> Self {
        SignalDescriptor {
            name: name.into(),
            type_descriptor,
            elements: 1,
            samples: 1,
            dimensions: 0,
        }
    }

    pub fn array(name: impl Into<String>, type_descriptor: TypeDescriptor, elements: u32) -> Self {
        SignalDescriptor {
            name: name.into(),
            type_descriptor,
            elements,
            samples: 1,
            dimensions: 1,
        }
    }

    /// Total storage footprint across all elements and samples.
    pub fn byte_size(&self) -> usize {
        self.type_descriptor.byte_size() * self.elements as usize * self.samples as usize
    }
}

/// Direction of a brokered copy, from the function's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDirection {
    Input,
    Output,
}

/// Which of the two data-source buffers a cycle addresses.
///
/// Snapshotted once per cycle: every access within one cycle must observe
/// the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferIndex(u8);

impl BufferIndex {
    pub const ZERO: BufferIndex = BufferIndex(0);
    pub const ONE: BufferIndex = BufferIndex(1);

    pub fn new(index: u8) -> Self {
        BufferIndex(index & 1)
    }

    /// The other buffer of the pair.
    pub const fn other(self) -> Self {
        BufferIndex(self.0 ^ 1)
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}
