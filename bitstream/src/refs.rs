//! Fixed-width reference packing.
//!
//! References arrive as raw big-endian bytes. Each one is written into the
//! bitstream as an unsigned value of its width, MSB first.

use crate::error::{BitError, BitResult};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Bit width of a single reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefWidth {
    W8,
    W16,
    W32,
}

impl RefWidth {
    /// Returns the width in bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
        }
    }

    /// Returns the width in bytes of one raw reference.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W32 => 4,
        }
    }

    /// Parses a bit width (8, 16 or 32).
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::W8),
            16 => Some(Self::W16),
            32 => Some(Self::W32),
            _ => None,
        }
    }

    /// Returns how many references `len` raw bytes hold.
    pub const fn ref_count(self, len: usize) -> BitResult<usize> {
        let width_bytes = self.bytes();
        if len % width_bytes != 0 {
            return Err(BitError::MisalignedRefs { len, width_bytes });
        }
        Ok(len / width_bytes)
    }
}

/// Packs raw big-endian references into `out` starting at `bit_offset`.
///
/// Returns the bit offset just past the last packed reference. Bits of `out`
/// outside the written range are left untouched, and nothing is written when
/// an error is returned.
///
/// # Errors
///
/// [`BitError::MisalignedRefs`] if `refs` is not a whole number of
/// references, [`BitError::BufferOverflow`] if `out` is too small.
pub fn pack_refs(
    out: &mut [u8],
    bit_offset: usize,
    refs: &[u8],
    width: RefWidth,
) -> BitResult<usize> {
    width.ref_count(refs.len())?;
    let mut writer = BitWriter::at(out, bit_offset);
    writer.ensure_capacity(refs.len().saturating_mul(8))?;

    if bit_offset % 8 == 0 {
        // Aligned references are their own big-endian encoding.
        writer.write_bytes(refs)?;
    } else {
        for raw in refs.chunks_exact(width.bytes()) {
            writer.write_bits(be_value(raw), width.bits())?;
        }
    }
    Ok(writer.bit_position())
}

/// Unpacks `count` references starting at `bit_offset`, appending their raw
/// big-endian bytes to `out`.
///
/// Returns the bit offset just past the last unpacked reference. `out` is
/// left unchanged on error.
pub fn unpack_refs(
    data: &[u8],
    bit_offset: usize,
    count: usize,
    width: RefWidth,
    out: &mut Vec<u8>,
) -> BitResult<usize> {
    let mut reader = BitReader::at(data, bit_offset);
    reader.ensure_bits(count.saturating_mul(usize::from(width.bits())))?;

    let step = width.bytes();
    out.reserve(count * step);
    for _ in 0..count {
        let value = reader.read_bits(width.bits())?;
        out.extend_from_slice(&value.to_be_bytes()[8 - step..]);
    }
    Ok(reader.bit_position())
}

fn be_value(raw: &[u8]) -> u64 {
    raw.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}
