// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! # Cyclo Bit-Field Conversion Engine
//!
//! Bit-exact conversion between arbitrary-width (1..=128 bit) integer
//! fields at arbitrary bit offsets in memory and native integer types.
//! This is the correctness-critical primitive the signal brokers rely on:
//! out-of-range values saturate (they never wrap and never fail), negative
//! values saturate to zero for unsigned destinations, and sign extension
//! is exact.
//!
//! ## Quick start
//!
//! ```
//! use cyclo_bitfield::{bit_range_to_integer, integer_to_bit_range, BitCursor};
//!
//! let mut packed = [0u8; 4];
//! let mut write = BitCursor::start();
//! integer_to_bit_range(&mut packed, &mut write, 5, true, -3i8).unwrap();
//! integer_to_bit_range(&mut packed, &mut write, 11, false, 1234u16).unwrap();
//!
//! let mut read = BitCursor::start();
//! let a: i8 = bit_range_to_integer(&packed, &mut read, 5, true).unwrap();
//! let b: u16 = bit_range_to_integer(&packed, &mut read, 11, false).unwrap();
//! assert_eq!((a, b), (-3, 1234));
//! ```

pub mod convert;
pub mod cursor;
pub mod double_integer;
pub mod error;

mod word;

pub use convert::{
    bit_range_copy, bit_range_copy_within, bit_range_to_integer, integer_to_bit_range, NativeInt,
};
pub use cursor::BitCursor;
pub use double_integer::DoubleInteger;
pub use error::{BitFieldError, Result};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
