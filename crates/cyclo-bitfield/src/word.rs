// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Working-word abstraction for the conversion engine.
//!
//! The engine runs the same mask/shift/saturate algorithm at 8, 16, 32, 64
//! or 128-bit granularity, picking the narrowest word that contains both
//! bit windows. `WorkWord` is the trait that algorithm is generic over.
//! Loads and stores are little-endian and clipped to the buffer: bytes past
//! the end of the slice read as zero and are never written back, which is
//! safe because the bounds check in the dispatcher guarantees the field
//! itself lies inside the slice.

use std::ops::{BitAnd, BitOr, Not, Shl, Shr};

use crate::double_integer::DoubleInteger;

pub(crate) trait WorkWord:
    Copy
    + PartialEq
    + PartialOrd
    + Not<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    const BITS: u32;
    const BYTES: usize;
    const ZERO: Self;
    const ONE: Self;

    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Load up to `BYTES` bytes little-endian starting at `at`, zero-padding
    /// past the end of the slice.
    fn load_le(buf: &[u8], at: usize) -> Self;

    /// Store little-endian at `at`, writing only the bytes that exist.
    fn store_le(self, buf: &mut [u8], at: usize);
}

macro_rules! impl_work_word {
    ($($t:ty),*) => {$(
        impl WorkWord for $t {
            const BITS: u32 = <$t>::BITS;
            const BYTES: usize = (<$t>::BITS / 8) as usize;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            fn wrapping_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }

            fn load_le(buf: &[u8], at: usize) -> Self {
                let mut bytes = [0u8; Self::BYTES];
                let tail = buf.get(at..).unwrap_or(&[]);
                let avail = tail.len().min(Self::BYTES);
                bytes[..avail].copy_from_slice(&tail[..avail]);
                <$t>::from_le_bytes(bytes)
            }

            fn store_le(self, buf: &mut [u8], at: usize) {
                let bytes = self.to_le_bytes();
                let tail = buf.get_mut(at..).unwrap_or(&mut []);
                let avail = tail.len().min(Self::BYTES);
                tail[..avail].copy_from_slice(&bytes[..avail]);
            }
        }
    )*};
}
impl_work_word!(u8, u16, u32, u64);

impl WorkWord for DoubleInteger {
    const BITS: u32 = 128;
    const BYTES: usize = 16;
    const ZERO: Self = DoubleInteger::ZERO;
    const ONE: Self = DoubleInteger::ONE;

    fn wrapping_sub(self, rhs: Self) -> Self {
        DoubleInteger::wrapping_sub(self, rhs)
    }

    fn load_le(buf: &[u8], at: usize) -> Self {
        let mut bytes = [0u8; 16];
        let tail = buf.get(at..).unwrap_or(&[]);
        let avail = tail.len().min(16);
        bytes[..avail].copy_from_slice(&tail[..avail]);
        let lower = u64::from_le_bytes(bytes[0..8].try_into().unwrap());
        let upper = u64::from_le_bytes(bytes[8..16].try_into().unwrap());
        DoubleInteger::from_parts(upper, lower)
    }

    fn store_le(self, buf: &mut [u8], at: usize) {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&self.lower().to_le_bytes());
        bytes[8..16].copy_from_slice(&self.upper().to_le_bytes());
        let tail = buf.get_mut(at..).unwrap_or(&mut []);
        let avail = tail.len().min(16);
        tail[..avail].copy_from_slice(&bytes[..avail]);
    }
}
