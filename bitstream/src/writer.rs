//! Bounded bit-level writer over a caller-owned buffer.

use crate::error::{BitError, BitResult};

/// A bit-level writer over a caller-owned byte slice.
///
/// Bits are written MSB-first within each byte. The writer only touches the
/// bits it writes: bits before the starting offset and bits past the current
/// position keep whatever value the caller left there, so a partially filled
/// buffer can be continued across writers.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buf: &'a mut [u8],
    bit_pos: usize,
}

impl<'a> BitWriter<'a> {
    /// Creates a writer positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self::at(buf, 0)
    }

    /// Creates a writer positioned at `bit_offset` within `buf`.
    ///
    /// An offset past the end of the buffer is allowed; every write will then
    /// fail with [`BitError::BufferOverflow`].
    #[must_use]
    pub fn at(buf: &'a mut [u8], bit_offset: usize) -> Self {
        Self {
            buf,
            bit_pos: bit_offset,
        }
    }

    /// Returns the current bit position.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Returns the number of bits that can still be written.
    #[must_use]
    pub fn bits_remaining(&self) -> usize {
        self.buf
            .len()
            .saturating_mul(8)
            .saturating_sub(self.bit_pos)
    }

    /// Fails with [`BitError::BufferOverflow`] unless `bits` more bits fit.
    pub fn ensure_capacity(&self, bits: usize) -> BitResult<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(BitError::BufferOverflow {
                attempted: bits,
                available,
            });
        }
        Ok(())
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, value: bool) -> BitResult<()> {
        self.ensure_capacity(1)?;
        self.put_bit(value);
        Ok(())
    }

    /// Writes the low `bits` bits of `value`, most significant bit first.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 64`,
    /// [`BitError::ValueOutOfRange`] if `value` doesn't fit in `bits`, and
    /// [`BitError::BufferOverflow`] if the buffer is too small. Nothing is
    /// written on error.
    pub fn write_bits(&mut self, value: u64, bits: u8) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits == 0 {
            return Ok(());
        }
        if bits < 64 && value >> bits != 0 {
            return Err(BitError::ValueOutOfRange { value, bits });
        }
        self.ensure_capacity(usize::from(bits))?;

        for i in (0..bits).rev() {
            self.put_bit((value >> i) & 1 == 1);
        }
        Ok(())
    }

    /// Copies whole bytes starting at a byte boundary.
    ///
    /// Falls back to bit-by-bit writes when the writer is not aligned.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> BitResult<()> {
        self.ensure_capacity(bytes.len().saturating_mul(8))?;
        if self.bit_pos % 8 == 0 {
            let start = self.bit_pos / 8;
            self.buf[start..start + bytes.len()].copy_from_slice(bytes);
            self.bit_pos += bytes.len() * 8;
        } else {
            for &byte in bytes {
                for i in (0..8).rev() {
                    self.put_bit((byte >> i) & 1 == 1);
                }
            }
        }
        Ok(())
    }

    /// Finishes writing and returns the number of bytes touched from the
    /// start of the buffer (the final partial byte included).
    #[must_use]
    pub fn finish(self) -> usize {
        self.bit_pos.div_ceil(8)
    }

    fn put_bit(&mut self, value: bool) {
        let mask = 0x80u8 >> (self.bit_pos % 8);
        let byte = &mut self.buf[self.bit_pos / 8];
        if value {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        self.bit_pos += 1;
    }
}
