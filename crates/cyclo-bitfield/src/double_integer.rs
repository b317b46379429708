// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Software-emulated 128-bit unsigned integer built from two `u64` halves.
//!
//! The conversion engine needs a working register wide enough to hold a
//! 120-bit field plus a 7-bit in-byte shift. `DoubleInteger` is that
//! register: logical little-endian (`lower` holds the least-significant
//! bits), with shift, add, subtract, bitwise ops and unsigned ordering.
//! It intentionally mirrors native `u128` semantics so it can be verified
//! against it, but stays an explicit pair type because the engine addresses
//! the two halves separately when loading from and storing to byte memory.

use std::cmp::Ordering;
use std::ops::{Add, BitAnd, BitAndAssign, BitOr, BitOrAssign, Not, Shl, ShlAssign, Shr, ShrAssign, Sub};

/// A 2x64-bit unsigned integer: `lower` holds bits 0..64, `upper` bits 64..128.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoubleInteger {
    lower: u64,
    upper: u64,
}

impl DoubleInteger {
    pub const ZERO: DoubleInteger = DoubleInteger { lower: 0, upper: 0 };
    pub const ONE: DoubleInteger = DoubleInteger { lower: 1, upper: 0 };
    pub const MAX: DoubleInteger = DoubleInteger { lower: u64::MAX, upper: u64::MAX };

    /// Number of bits represented.
    pub const BITS: u32 = 128;

    pub const fn from_parts(upper: u64, lower: u64) -> Self {
        DoubleInteger { lower, upper }
    }

    pub const fn lower(self) -> u64 {
        self.lower
    }

    pub const fn upper(self) -> u64 {
        self.upper
    }

    pub fn from_u128(v: u128) -> Self {
        DoubleInteger {
            lower: v as u64,
            upper: (v >> 64) as u64,
        }
    }

    pub fn as_u128(self) -> u128 {
        (u128::from(self.upper) << 64) | u128::from(self.lower)
    }

    /// Wrapping subtraction with explicit borrow propagation.
    pub fn wrapping_sub(self, rhs: Self) -> Self {
        let (lower, borrow) = self.lower.overflowing_sub(rhs.lower);
        let upper = self.upper.wrapping_sub(rhs.upper).wrapping_sub(u64::from(borrow));
        DoubleInteger { lower, upper }
    }

    /// Wrapping addition with explicit carry propagation.
    pub fn wrapping_add(self, rhs: Self) -> Self {
        let (lower, carry) = self.lower.overflowing_add(rhs.lower);
        let upper = self.upper.wrapping_add(rhs.upper).wrapping_add(u64::from(carry));
        DoubleInteger { lower, upper }
    }
}

// Zero- and sign-extending constructors. The signed ones fill `upper`
// (and the high bits of `lower`) with the sign, matching what a native
// widening cast would produce.
macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for DoubleInteger {
            fn from(v: $t) -> Self {
                DoubleInteger { lower: u64::from(v), upper: 0 }
            }
        }
    )*};
}
from_unsigned!(u8, u16, u32, u64);

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for DoubleInteger {
            fn from(v: $t) -> Self {
                let lower = i64::from(v) as u64;
                let upper = if v < 0 { u64::MAX } else { 0 };
                DoubleInteger { lower, upper }
            }
        }
    )*};
}
from_signed!(i8, i16, i32, i64);

impl Shl<u32> for DoubleInteger {
    type Output = Self;

    fn shl(self, shift: u32) -> Self {
        // shift == 0 must be the identity and shift >= 64 must move bits
        // across the halves; a naive `lower >> (64 - shift)` would be
        // undefined for both, so each band is handled explicitly.
        if shift == 0 {
            self
        } else if shift < 64 {
            DoubleInteger {
                upper: (self.upper << shift) | (self.lower >> (64 - shift)),
                lower: self.lower << shift,
            }
        } else if shift < 128 {
            DoubleInteger {
                upper: self.lower << (shift - 64),
                lower: 0,
            }
        } else {
            DoubleInteger::ZERO
        }
    }
}

impl Shr<u32> for DoubleInteger {
    type Output = Self;

    /// Logical (unsigned) right shift.
    fn shr(self, shift: u32) -> Self {
        if shift == 0 {
            self
        } else if shift < 64 {
            DoubleInteger {
                lower: (self.lower >> shift) | (self.upper << (64 - shift)),
                upper: self.upper >> shift,
            }
        } else if shift < 128 {
            DoubleInteger {
                lower: self.upper >> (shift - 64),
                upper: 0,
            }
        } else {
            DoubleInteger::ZERO
        }
    }
}

impl ShlAssign<u32> for DoubleInteger {
    fn shl_assign(&mut self, shift: u32) {
        *self = *self << shift;
    }
}

impl ShrAssign<u32> for DoubleInteger {
    fn shr_assign(&mut self, shift: u32) {
        *self = *self >> shift;
    }
}

impl Not for DoubleInteger {
    type Output = Self;

    fn not(self) -> Self {
        DoubleInteger {
            lower: !self.lower,
            upper: !self.upper,
        }
    }
}

impl BitAnd for DoubleInteger {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        DoubleInteger {
            lower: self.lower & rhs.lower,
            upper: self.upper & rhs.upper,
        }
    }
}

impl BitOr for DoubleInteger {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        DoubleInteger {
            lower: self.lower | rhs.lower,
            upper: self.upper | rhs.upper,
        }
    }
}

impl BitAndAssign for DoubleInteger {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

impl BitOrAssign for DoubleInteger {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl Add for DoubleInteger {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
}

impl Sub for DoubleInteger {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
}

impl PartialOrd for DoubleInteger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DoubleInteger {
    /// Unsigned 128-bit ordering: upper word decides, lower word breaks ties.
    fn cmp(&self, other: &Self) -> Ordering {
        self.upper
            .cmp(&other.upper)
            .then_with(|| self.lower.cmp(&other.lower))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_zero_extends_unsigned() {
        let d = DoubleInteger::from(0xFFu8);
        assert_eq!(d.lower(), 0xFF);
        assert_eq!(d.upper(), 0);
        assert_eq!(DoubleInteger::from(u64::MAX).upper(), 0);
    }

    #[test]
    fn construction_sign_extends_signed() {
        let d = DoubleInteger::from(-1i32);
        assert_eq!(d.lower(), u64::MAX);
        assert_eq!(d.upper(), u64::MAX);
        assert_eq!(d.as_u128(), (-1i128) as u128);

        let d = DoubleInteger::from(-2i64);
        assert_eq!(d.as_u128(), (-2i128) as u128);

        let d = DoubleInteger::from(42i8);
        assert_eq!(d.as_u128(), 42);
    }

    #[test]
    fn shift_left_matches_u128_for_all_amounts() {
        let v: u128 = 0x0123_4567_89AB_CDEF_FEDC_BA98_7654_3210;
        let d = DoubleInteger::from_u128(v);
        for shift in 0..128u32 {
            assert_eq!((d << shift).as_u128(), v << shift, "shift {}", shift);
        }
        assert_eq!((d << 128).as_u128(), 0);
    }

    #[test]
    fn shift_right_matches_u128_for_all_amounts() {
        let v: u128 = 0x8000_0000_0000_0000_0000_0000_0000_0001;
        let d = DoubleInteger::from_u128(v);
        for shift in 0..128u32 {
            assert_eq!((d >> shift).as_u128(), v >> shift, "shift {}", shift);
        }
        assert_eq!((d >> 128).as_u128(), 0);
    }

    #[test]
    fn shift_boundary_cases() {
        let d = DoubleInteger::from_parts(0, u64::MAX);
        // Full-half shift moves lower into upper exactly.
        assert_eq!((d << 64), DoubleInteger::from_parts(u64::MAX, 0));
        assert_eq!((d << 0), d);
        let d = DoubleInteger::from_parts(u64::MAX, 0);
        assert_eq!((d >> 64), DoubleInteger::from_parts(0, u64::MAX));
        assert_eq!((d >> 127), DoubleInteger::ONE);
    }

    #[test]
    fn add_carries_across_halves() {
        let cases: &[(u128, u128)] = &[
            (0, 0),
            (u64::MAX as u128, 1),
            (u128::MAX, 1),
            (0xFFFF_FFFF_FFFF_FFFF_FFFF_FFFF, 0xFFFF),
            ((1u128 << 64) - 1, (1u128 << 64) - 1),
        ];
        for &(a, b) in cases {
            let got = DoubleInteger::from_u128(a) + DoubleInteger::from_u128(b);
            assert_eq!(got.as_u128(), a.wrapping_add(b), "{:#x} + {:#x}", a, b);
        }
    }

    #[test]
    fn sub_borrows_across_halves() {
        let cases: &[(u128, u128)] = &[
            (0, 1),
            (1u128 << 64, 1),
            (u128::MAX, u128::MAX),
            (1u128 << 127, 1),
            (0xABCD, 0x1234_0000_0000_0000_0000),
        ];
        for &(a, b) in cases {
            let got = DoubleInteger::from_u128(a) - DoubleInteger::from_u128(b);
            assert_eq!(got.as_u128(), a.wrapping_sub(b), "{:#x} - {:#x}", a, b);
        }
    }

    #[test]
    fn ordering_is_unsigned() {
        let hi = DoubleInteger::from_parts(1, 0);
        let lo = DoubleInteger::from_parts(0, u64::MAX);
        assert!(hi > lo);
        assert!(lo < hi);
        assert!(lo <= lo);
        assert!(hi >= hi);
        // A value with the top bit set is large, not negative.
        let top = DoubleInteger::from_parts(u64::MAX, 0);
        assert!(top > hi);
    }

    #[test]
    fn bitwise_ops() {
        let a = DoubleInteger::from_parts(0xF0F0, 0x0F0F);
        let b = DoubleInteger::from_parts(0xFF00, 0x00FF);
        assert_eq!(a & b, DoubleInteger::from_parts(0xF000, 0x000F));
        assert_eq!(a | b, DoubleInteger::from_parts(0xFFF0, 0x0FFF));
        assert_eq!((!DoubleInteger::ZERO), DoubleInteger::MAX);
    }
}
