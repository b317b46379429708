// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Bit-addressed cursor into a byte buffer.
//!
//! Every conversion call advances its cursor(s) by the converted field
//! width, so repeated calls on the same cursor walk a packed record field
//! by field. This stateful-iterator contract is deliberate: callers rely
//! on it for sequential extraction.

/// A position inside a byte buffer, expressed as a whole-byte index plus a
/// bit offset. The bit offset may temporarily exceed 7; [`BitCursor::normalize`]
/// folds whole bytes into the byte index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitCursor {
    byte: usize,
    bit: u32,
}

impl BitCursor {
    pub const fn new(byte: usize, bit: u32) -> Self {
        BitCursor { byte, bit }
    }

    /// Cursor at the start of a buffer.
    pub const fn start() -> Self {
        BitCursor { byte: 0, bit: 0 }
    }

    pub const fn byte(&self) -> usize {
        self.byte
    }

    pub const fn bit(&self) -> u32 {
        self.bit
    }

    /// Absolute position in bits from the start of the buffer.
    pub const fn absolute_bit(&self) -> usize {
        self.byte * 8 + self.bit as usize
    }

    /// Fold whole bytes out of the bit offset, leaving `bit < 8`.
    pub fn normalize(&mut self) {
        if self.bit >= 8 {
            self.byte += (self.bit / 8) as usize;
            self.bit %= 8;
        }
    }

    /// Advance by `bits`. The result is left unnormalized; conversion entry
    /// points normalize before addressing memory.
    pub fn advance(&mut self, bits: u32) {
        self.bit += bits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_whole_bytes() {
        let mut c = BitCursor::new(2, 19);
        c.normalize();
        assert_eq!(c.byte(), 4);
        assert_eq!(c.bit(), 3);
        assert_eq!(c.absolute_bit(), 35);
    }

    #[test]
    fn normalize_is_idempotent_below_eight() {
        let mut c = BitCursor::new(1, 7);
        c.normalize();
        assert_eq!(c, BitCursor::new(1, 7));
    }

    #[test]
    fn advance_accumulates_bits() {
        let mut c = BitCursor::start();
        c.advance(5);
        c.advance(13);
        assert_eq!(c.absolute_bit(), 18);
        c.normalize();
        assert_eq!((c.byte(), c.bit()), (2, 2));
    }
}
