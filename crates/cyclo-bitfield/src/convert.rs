// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! The saturating, sign-aware bit-window conversion engine.
//!
//! All conversions share one value-level core, [`bs_to_bs`], run at the
//! narrowest working-word granularity (8/16/32/64/128 bits) that contains
//! both the source and destination bit windows. The rules, in order:
//!
//! 1. the extracted field is masked to exactly its width;
//! 2. a negative source saturates to 0 for an unsigned destination,
//!    saturates to `1000...0` for a narrower signed destination unless the
//!    truncated high bits are all ones (value fits), and sign-extends into
//!    a wider signed destination;
//! 3. a non-negative value saturates to the destination's maximum
//!    (`FFF...` unsigned, `7FF...` signed);
//! 4. bits outside the destination window are preserved bit-for-bit.
//!
//! Saturation is the error channel for out-of-range values; `Err` is
//! returned only for structurally malformed windows.
//!
//! Cursors advance by the field width on success, so repeated calls walk
//! packed records sequentially.

use crate::cursor::BitCursor;
use crate::double_integer::DoubleInteger;
use crate::error::{BitFieldError, Result};
use crate::word::WorkWord;

/// Native integer types that can act as one side of a conversion.
///
/// The blanket rules treat a native integer as a bit window of its full
/// width at shift zero, little-endian.
pub trait NativeInt: Copy {
    const BITS: u32;
    const SIGNED: bool;

    /// Write the little-endian representation into `buf` (`BITS / 8` bytes).
    fn write_le(self, buf: &mut [u8]);

    /// Read the little-endian representation from `buf` (`BITS / 8` bytes).
    fn read_le(buf: &[u8]) -> Self;
}

macro_rules! impl_native_int {
    ($($t:ty => $signed:expr),*) => {$(
        impl NativeInt for $t {
            const BITS: u32 = <$t>::BITS;
            const SIGNED: bool = $signed;

            fn write_le(self, buf: &mut [u8]) {
                buf.copy_from_slice(&self.to_le_bytes());
            }

            fn read_le(buf: &[u8]) -> Self {
                <$t>::from_le_bytes(buf.try_into().expect("buffer sized to BITS / 8"))
            }
        }
    )*};
}
impl_native_int!(
    u8 => false, u16 => false, u32 => false, u64 => false,
    i8 => true, i16 => true, i32 => true, i64 => true
);

/// Value-level core: merge the field extracted from `src_word` into
/// `dst_word`, applying the saturation and extension rules.
///
/// Both sizes must be in `1..=W::BITS` and both windows must fit in `W`;
/// the dispatcher guarantees this.
fn bs_to_bs<W: WorkWord>(
    dst_word: W,
    dst_shift: u32,
    dst_size: u32,
    dst_signed: bool,
    src_word: W,
    src_shift: u32,
    src_size: u32,
    src_signed: bool,
) -> W {
    // Masks covering each window, anchored at bit 0.
    let source_mask = !W::ZERO >> (W::BITS - src_size);
    let destination_mask = !W::ZERO >> (W::BITS - dst_size);
    let source_sign_mask = W::ONE << (src_size - 1);
    let destination_sign_mask = W::ONE << (dst_size - 1);

    // Extract the field: drop the low bits, mask off the high ones.
    let mut value = (src_word >> src_shift) & source_mask;

    let negative = src_signed && (value & source_sign_mask) != W::ZERO;
    if negative {
        if !dst_signed {
            value = W::ZERO;
        } else if src_size > dst_size {
            // Mask of the bits by which the source exceeds the destination,
            // sign bit included. If they are all ones the value survives
            // truncation (e.g. 1101 fits in 3 bits, 1001 does not);
            // otherwise clamp to the destination minimum.
            let excess = source_mask.wrapping_sub(destination_mask >> 1);
            if (value & excess) != excess {
                value = destination_sign_mask;
            }
        } else {
            // Wider signed destination: extend the sign over the added bits.
            let extension = destination_mask.wrapping_sub(source_mask);
            value = value | extension;
        }
    } else {
        let max_positive = if dst_signed {
            destination_mask >> 1
        } else {
            destination_mask
        };
        if value > max_positive {
            value = max_positive;
        }
    }

    // A field that fits after truncation still carries its high source
    // bits; clip to the destination window so nothing outside it moves.
    value = value & destination_mask;

    // Read-modify-write: clear the destination window, merge the value in.
    let keep = !(destination_mask << dst_shift);
    (dst_word & keep) | (value << dst_shift)
}

/// Field span in whole bytes, for bounds checking. Widened arithmetic so
/// adversarial sizes near `u32::MAX` report instead of overflowing.
fn span_end(cursor: BitCursor, size: u32) -> usize {
    cursor.byte() + ((cursor.bit() as u64 + size as u64 + 7) / 8) as usize
}

fn check_span(len: usize, cursor: BitCursor, size: u32) -> Result<()> {
    let needed = span_end(cursor, size);
    if needed <= len {
        Ok(())
    } else {
        Err(BitFieldError::OutOfBounds { needed, len })
    }
}

/// Internal dispatcher over disjoint source/destination slices (which may
/// be the same slice: the source word is fully loaded before the
/// destination word is written, so aliasing windows are handled).
fn dispatch_copy(
    dst: &mut [u8],
    dst_cur: BitCursor,
    dst_size: u32,
    dst_signed: bool,
    src: &[u8],
    src_cur: BitCursor,
    src_size: u32,
    src_signed: bool,
) -> Result<()> {
    let src_end = src_cur.bit() as u64 + src_size as u64;
    let dst_end = dst_cur.bit() as u64 + dst_size as u64;

    macro_rules! run {
        ($w:ty) => {{
            let src_word = <$w>::load_le(src, src_cur.byte());
            let dst_word = <$w>::load_le(dst, dst_cur.byte());
            let merged = bs_to_bs::<$w>(
                dst_word,
                dst_cur.bit(),
                dst_size,
                dst_signed,
                src_word,
                src_cur.bit(),
                src_size,
                src_signed,
            );
            merged.store_le(dst, dst_cur.byte());
            Ok(())
        }};
    }

    if src_end <= 8 && dst_end <= 8 {
        run!(u8)
    } else if src_end <= 16 && dst_end <= 16 {
        run!(u16)
    } else if src_end <= 32 && dst_end <= 32 {
        run!(u32)
    } else if src_end <= 64 && dst_end <= 64 {
        run!(u64)
    } else if src_end <= 128 && dst_end <= 128 {
        run!(DoubleInteger)
    } else {
        Err(BitFieldError::WindowTooWide {
            source_bits: src_end,
            destination_bits: dst_end,
        })
    }
}

/// Copy a bit window between two buffers, converting per the saturation
/// rules. Both cursors are normalized, then advanced by their field width
/// on success. A zero-width field (either side) is a no-op that still
/// advances the cursors.
#[allow(clippy::too_many_arguments)]
pub fn bit_range_copy(
    dst: &mut [u8],
    dst_cursor: &mut BitCursor,
    dst_size: u32,
    dst_signed: bool,
    src: &[u8],
    src_cursor: &mut BitCursor,
    src_size: u32,
    src_signed: bool,
) -> Result<()> {
    dst_cursor.normalize();
    src_cursor.normalize();

    if dst_size > 0 && src_size > 0 {
        check_span(src.len(), *src_cursor, src_size)?;
        check_span(dst.len(), *dst_cursor, dst_size)?;
        dispatch_copy(
            dst,
            *dst_cursor,
            dst_size,
            dst_signed,
            src,
            *src_cursor,
            src_size,
            src_signed,
        )?;
    }

    dst_cursor.advance(dst_size);
    src_cursor.advance(src_size);
    Ok(())
}

/// In-place variant for source and destination windows inside one buffer.
/// The source field is fully read before the destination field is written,
/// so overlapping windows (e.g. widening a value at the same address) are
/// legitimate.
#[allow(clippy::too_many_arguments)]
pub fn bit_range_copy_within(
    buf: &mut [u8],
    dst_cursor: &mut BitCursor,
    dst_size: u32,
    dst_signed: bool,
    src_cursor: &mut BitCursor,
    src_size: u32,
    src_signed: bool,
) -> Result<()> {
    dst_cursor.normalize();
    src_cursor.normalize();

    if dst_size > 0 && src_size > 0 {
        check_span(buf.len(), *src_cursor, src_size)?;
        check_span(buf.len(), *dst_cursor, dst_size)?;
        // The snapshot below holds one working word at most; reject
        // windows past the 128-bit granule before taking it.
        let src_end = src_cursor.bit() as u64 + src_size as u64;
        let dst_end = dst_cursor.bit() as u64 + dst_size as u64;
        if src_end > 128 || dst_end > 128 {
            return Err(BitFieldError::WindowTooWide {
                source_bits: src_end,
                destination_bits: dst_end,
            });
        }
        // Read the source field fully before the destination write, so
        // overlapping windows cannot see a half-written value.
        let mut snapshot = [0u8; 16];
        let span = span_end(*src_cursor, src_size) - src_cursor.byte();
        snapshot[..span].copy_from_slice(&buf[src_cursor.byte()..src_cursor.byte() + span]);
        dispatch_copy(
            buf,
            *dst_cursor,
            dst_size,
            dst_signed,
            &snapshot[..span],
            BitCursor::new(0, src_cursor.bit()),
            src_size,
            src_signed,
        )?;
    }

    dst_cursor.advance(dst_size);
    src_cursor.advance(src_size);
    Ok(())
}

/// Extract a bit field into a native integer, saturating to the integer's
/// representable range. Advances the cursor by `size`.
pub fn bit_range_to_integer<T: NativeInt>(
    src: &[u8],
    cursor: &mut BitCursor,
    size: u32,
    signed: bool,
) -> Result<T> {
    let width = (T::BITS / 8) as usize;
    let mut scratch = [0u8; 8];
    let mut dst_cursor = BitCursor::start();
    bit_range_copy(
        &mut scratch[..width],
        &mut dst_cursor,
        T::BITS,
        T::SIGNED,
        src,
        cursor,
        size,
        signed,
    )?;
    Ok(T::read_le(&scratch[..width]))
}

/// Write a native integer into a bit field, saturating to the field's
/// representable range and leaving bits outside the window untouched.
/// Advances the cursor by `size`.
pub fn integer_to_bit_range<T: NativeInt>(
    dst: &mut [u8],
    cursor: &mut BitCursor,
    size: u32,
    signed: bool,
    value: T,
) -> Result<()> {
    let width = (T::BITS / 8) as usize;
    let mut scratch = [0u8; 8];
    value.write_le(&mut scratch[..width]);
    let mut src_cursor = BitCursor::start();
    bit_range_copy(
        dst,
        cursor,
        size,
        signed,
        &scratch[..width],
        &mut src_cursor,
        T::BITS,
        T::SIGNED,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // 128-bit little-endian source blob used across the extraction tests:
    // words [0xffffffb5, 0x00001111, 0x22223333, 0x0].
    fn source_blob() -> [u8; 16] {
        let mut buf = [0u8; 16];
        for (i, w) in [0xffffffb5u32, 0x00001111, 0x22223333, 0x0]
            .iter()
            .enumerate()
        {
            buf[i * 4..i * 4 + 4].copy_from_slice(&w.to_le_bytes());
        }
        buf
    }

    #[test]
    fn extract_signed_64_full_width() {
        let buf = source_blob();
        let mut cur = BitCursor::start();
        let v: i64 = bit_range_to_integer(&buf, &mut cur, 64, true).unwrap();
        assert_eq!(v as u64, 0x0000_1111_ffff_ffb5);
        assert_eq!(cur.absolute_bit(), 64);
    }

    #[test]
    fn negative_33_bit_field_saturates_unsigned_to_zero() {
        // Bits 0..33 of the blob have bit 32 set and hold a negative
        // 33-bit value when read signed.
        let buf = source_blob();
        let mut cur = BitCursor::start();
        let v: u64 = bit_range_to_integer(&buf, &mut cur, 33, true).unwrap();
        assert_eq!(v, 0);

        // Same bits read unsigned pass through.
        let mut cur = BitCursor::start();
        let v: u64 = bit_range_to_integer(&buf, &mut cur, 33, false).unwrap();
        assert_eq!(v, (1u64 << 32) | 0xffff_ffb5);
    }

    #[test]
    fn all_ones_33_bit_field_is_minus_one_signed_and_zero_unsigned() {
        // A 33-bit field of all ones is -1; into u32 it
        // saturates to 0, into i32 it passes through as -1.
        let mut buf = [0u8; 8];
        let mut cur = BitCursor::start();
        integer_to_bit_range(&mut buf, &mut cur, 33, true, -1i64).unwrap();

        let mut cur = BitCursor::start();
        let unsigned: u32 = bit_range_to_integer(&buf, &mut cur, 33, true).unwrap();
        assert_eq!(unsigned, 0);

        let mut cur = BitCursor::start();
        let signed: i32 = bit_range_to_integer(&buf, &mut cur, 33, true).unwrap();
        assert_eq!(signed, -1);
    }

    #[test]
    fn shifted_extraction_and_stateful_advance() {
        // Bits 16..48 of the blob read signed are 0x1111ffff; continuing on
        // the same cursor, the next 17 bits (48..65) are a negative 17-bit
        // field, sign-extended to -65536.
        let buf = source_blob();
        let mut cur = BitCursor::new(0, 16);
        let first: i64 = bit_range_to_integer(&buf, &mut cur, 32, true).unwrap();
        assert_eq!(first, 0x1111_ffff);
        assert_eq!(cur.absolute_bit(), 48);

        let second: i64 = bit_range_to_integer(&buf, &mut cur, 17, true).unwrap();
        assert_eq!(second, -65536);
        assert_eq!(cur.absolute_bit(), 65);
    }

    #[test]
    fn cursor_normalization_advances_base_byte() {
        // A shift past whole bytes must address the same bits as the
        // equivalent (byte, bit) pair.
        let buf = source_blob();
        let mut a = BitCursor::new(0, 65);
        let mut b = BitCursor::new(8, 1);
        let va: i16 = bit_range_to_integer(&buf, &mut a, 9, true).unwrap();
        let vb: i16 = bit_range_to_integer(&buf, &mut b, 9, true).unwrap();
        assert_eq!(va, vb);
    }

    #[test]
    fn positive_overflow_saturates_to_destination_max() {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&0x7fff_ffffu32.to_le_bytes());
        let mut cur = BitCursor::start();
        let v: i16 = bit_range_to_integer(&buf, &mut cur, 32, true).unwrap();
        assert_eq!(v, i16::MAX);

        let mut cur = BitCursor::start();
        let v: u8 = bit_range_to_integer(&buf, &mut cur, 31, false).unwrap();
        assert_eq!(v, u8::MAX);

        // Unsigned source into signed destination of the same width still
        // clamps at the signed maximum.
        let mut cur = BitCursor::start();
        let v: i32 = bit_range_to_integer(&buf, &mut cur, 32, false).unwrap();
        assert_eq!(v, i32::MAX);
    }

    #[test]
    fn negative_narrowing_saturates_to_minimum_unless_it_fits() {
        // -3 in 8 bits narrowed to 4 bits: high bits all ones, fits.
        let buf = [(-3i8) as u8];
        let mut cur = BitCursor::start();
        let v: i8 = {
            let mut scratch = [0u8; 1];
            let mut dcur = BitCursor::start();
            bit_range_copy(&mut scratch, &mut dcur, 4, true, &buf, &mut cur, 8, true).unwrap();
            // Read the 4-bit result back sign-extended.
            let mut rcur = BitCursor::start();
            bit_range_to_integer(&scratch, &mut rcur, 4, true).unwrap()
        };
        assert_eq!(v, -3);

        // -100 in 8 bits does not fit in 4: clamps to the minimum (-8).
        let buf = [(-100i8) as u8];
        let mut cur = BitCursor::start();
        let mut scratch = [0u8; 1];
        let mut dcur = BitCursor::start();
        bit_range_copy(&mut scratch, &mut dcur, 4, true, &buf, &mut cur, 8, true).unwrap();
        let mut rcur = BitCursor::start();
        let v: i8 = bit_range_to_integer(&scratch, &mut rcur, 4, true).unwrap();
        assert_eq!(v, -8);
    }

    #[test]
    fn negative_to_wider_signed_sign_extends() {
        let buf = [(-5i8) as u8];
        let mut cur = BitCursor::start();
        let v: i64 = bit_range_to_integer(&buf, &mut cur, 8, true).unwrap();
        assert_eq!(v, -5);

        // 5-bit -1 into i32.
        let buf = [0b0001_1111u8];
        let mut cur = BitCursor::start();
        let v: i32 = bit_range_to_integer(&buf, &mut cur, 5, true).unwrap();
        assert_eq!(v, -1);
    }

    #[test]
    fn write_preserves_bits_outside_the_window() {
        let mut buf = [0xFFu8; 4];
        let before = buf;
        let mut cur = BitCursor::new(0, 9);
        integer_to_bit_range(&mut buf, &mut cur, 7, false, 0u8).unwrap();
        // Bits 9..16 must now be zero, everything else untouched.
        assert_eq!(buf[0], before[0]);
        assert_eq!(buf[1], 0b0000_0001);
        assert_eq!(buf[2], before[2]);
        assert_eq!(buf[3], before[3]);
    }

    #[test]
    fn round_trip_arbitrary_widths() {
        // Write-then-read on the same window returns the original value for
        // every representable value of that width.
        for width in 1..=16u32 {
            let max = if width == 16 { u16::MAX } else { (1u16 << width) - 1 };
            for value in [0u16, 1, max / 2, max] {
                let mut buf = [0u8; 4];
                let mut wcur = BitCursor::new(0, 3);
                integer_to_bit_range(&mut buf, &mut wcur, width, false, value).unwrap();
                let mut rcur = BitCursor::new(0, 3);
                let got: u16 = bit_range_to_integer(&buf, &mut rcur, width, false).unwrap();
                assert_eq!(got, value, "width {} value {}", width, value);
            }
        }
    }

    #[test]
    fn signed_round_trip_arbitrary_widths() {
        for width in 2..=16u32 {
            let min = -(1i32 << (width - 1));
            let max = (1i32 << (width - 1)) - 1;
            for value in [min, -1, 0, 1, max] {
                let mut buf = [0u8; 4];
                let mut wcur = BitCursor::new(0, 5);
                integer_to_bit_range(&mut buf, &mut wcur, width, true, value).unwrap();
                let mut rcur = BitCursor::new(0, 5);
                let got: i32 = bit_range_to_integer(&buf, &mut rcur, width, true).unwrap();
                assert_eq!(got, value, "width {} value {}", width, value);
            }
        }
    }

    #[test]
    fn wide_fields_use_the_128_bit_path() {
        // A 100-bit window at bit 5 spans past 64 bits and must run on the
        // DoubleInteger granule.
        let mut buf = [0u8; 16];
        let mut wcur = BitCursor::new(0, 5);
        integer_to_bit_range(&mut buf, &mut wcur, 100, true, -1i64).unwrap();
        let mut rcur = BitCursor::new(0, 5);
        let got: i64 = bit_range_to_integer(&buf, &mut rcur, 100, true).unwrap();
        assert_eq!(got, -1);

        // And an unsigned value survives unchanged.
        let mut buf = [0u8; 16];
        let mut wcur = BitCursor::new(0, 7);
        integer_to_bit_range(&mut buf, &mut wcur, 90, false, 0xDEAD_BEEF_u64).unwrap();
        let mut rcur = BitCursor::new(0, 7);
        let got: u64 = bit_range_to_integer(&buf, &mut rcur, 90, false).unwrap();
        assert_eq!(got, 0xDEAD_BEEF);
    }

    #[test]
    fn zero_width_is_a_no_op_that_advances_nothing() {
        let mut buf = [0xABu8; 2];
        let before = buf;
        let mut cur = BitCursor::new(0, 3);
        let v: u8 = bit_range_to_integer(&buf, &mut cur, 0, false).unwrap();
        assert_eq!(v, 0);
        assert_eq!(cur.absolute_bit(), 3);

        let mut wcur = BitCursor::new(0, 3);
        integer_to_bit_range(&mut buf, &mut wcur, 0, false, 0xFFu8).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn out_of_bounds_window_is_reported() {
        let buf = [0u8; 2];
        let mut cur = BitCursor::new(0, 12);
        let err = bit_range_to_integer::<u8>(&buf, &mut cur, 8, false).unwrap_err();
        assert!(matches!(err, BitFieldError::OutOfBounds { needed: 3, len: 2 }));
        // The cursor is not advanced on failure.
        assert_eq!(cur.absolute_bit(), 12);
    }

    #[test]
    fn window_too_wide_is_reported() {
        let mut dst = [0u8; 32];
        let src = [0u8; 32];
        let mut dcur = BitCursor::new(0, 7);
        let mut scur = BitCursor::new(0, 0);
        let err = bit_range_copy(&mut dst, &mut dcur, 125, false, &src, &mut scur, 8, false)
            .unwrap_err();
        assert!(matches!(err, BitFieldError::WindowTooWide { .. }));
    }

    #[test]
    fn in_place_window_too_wide_is_reported() {
        // The window fits the buffer but not the 128-bit working word;
        // this must report, not panic while snapshotting the source.
        let mut buf = [0u8; 32];
        let mut dcur = BitCursor::start();
        let mut scur = BitCursor::new(0, 7);
        let err = bit_range_copy_within(&mut buf, &mut dcur, 1, false, &mut scur, 125, false)
            .unwrap_err();
        assert!(matches!(err, BitFieldError::WindowTooWide { .. }));
        assert_eq!(scur.absolute_bit(), 7);
    }

    #[test]
    fn near_max_field_size_reports_instead_of_overflowing() {
        let buf = [0u8; 4];
        let mut cur = BitCursor::new(0, 3);
        let err = bit_range_to_integer::<u8>(&buf, &mut cur, u32::MAX, false).unwrap_err();
        assert!(matches!(err, BitFieldError::OutOfBounds { .. }));
    }

    #[test]
    fn in_place_widening_over_aliasing_windows() {
        // Widen a signed 4-bit value at bit 0 into the 12-bit window at
        // bit 0 of the same buffer; the overlapping low bits must be read
        // before they are overwritten.
        let mut buf = [0b0000_1100u8, 0]; // 4-bit -4
        let mut dcur = BitCursor::start();
        let mut scur = BitCursor::start();
        bit_range_copy_within(&mut buf, &mut dcur, 12, true, &mut scur, 4, true).unwrap();
        let mut rcur = BitCursor::start();
        let v: i16 = bit_range_to_integer(&buf, &mut rcur, 12, true).unwrap();
        assert_eq!(v, -4);
    }

    #[test]
    fn sequential_packed_record_walk() {
        // Pack three fields back to back, then read them back with one
        // cursor per side.
        let mut buf = [0u8; 4];
        let mut w = BitCursor::start();
        integer_to_bit_range(&mut buf, &mut w, 3, false, 5u8).unwrap();
        integer_to_bit_range(&mut buf, &mut w, 7, true, -33i8).unwrap();
        integer_to_bit_range(&mut buf, &mut w, 12, false, 2000u16).unwrap();
        assert_eq!(w.absolute_bit(), 22);

        let mut r = BitCursor::start();
        let a: u8 = bit_range_to_integer(&buf, &mut r, 3, false).unwrap();
        let b: i8 = bit_range_to_integer(&buf, &mut r, 7, true).unwrap();
        let c: u16 = bit_range_to_integer(&buf, &mut r, 12, false).unwrap();
        assert_eq!((a, b, c), (5, -33, 2000));
    }
}
