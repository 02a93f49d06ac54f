//! Bounded bit packing primitives for the PacketFS wire protocol.
//!
//! This crate provides [`BitWriter`] and [`BitReader`] for bit-level encoding
//! and decoding over caller-owned buffers, plus [`pack_refs`] and
//! [`unpack_refs`] for fixed-width reference streams.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads/writes are bounds-checked.
//! - **No protocol knowledge** - This crate knows nothing about windows or sync frames.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{pack_refs, unpack_refs, RefWidth};
//!
//! let mut buf = [0u8; 8];
//! let end = pack_refs(&mut buf, 4, &[0x12, 0x34], RefWidth::W16).unwrap();
//! assert_eq!(end, 20);
//!
//! let mut refs = Vec::new();
//! unpack_refs(&buf, 4, 1, RefWidth::W16, &mut refs).unwrap();
//! assert_eq!(refs, vec![0x12, 0x34]);
//! ```

mod error;
mod reader;
mod refs;
mod writer;

pub use error::{BitError, BitResult};
pub use reader::BitReader;
pub use refs::{pack_refs, unpack_refs, RefWidth};
pub use writer::BitWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bit_roundtrip() {
        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        writer.write_bit(true).unwrap();
        assert_eq!(writer.finish(), 1);

        let mut reader = BitReader::new(&buf);
        assert!(reader.read_bit().unwrap());
    }

    #[test]
    fn bits_roundtrip_various_sizes() {
        let test_cases = [
            (0b1010u64, 4),
            (0xFFu64, 8),
            (0xABCDu64, 16),
            (0x1234_5678u64, 32),
            (u64::MAX, 64),
        ];

        for (value, bits) in test_cases {
            let mut buf = [0u8; 8];
            let mut writer = BitWriter::new(&mut buf);
            writer.write_bits(value, bits).unwrap();
            let used = writer.finish();

            let mut reader = BitReader::new(&buf[..used]);
            let read_value = reader.read_bits(bits).unwrap();
            assert_eq!(
                read_value, value,
                "roundtrip failed for {bits}-bit value {value}"
            );
        }
    }

    #[test]
    fn doctest_example() {
        let mut buf = [0u8; 8];
        let end = pack_refs(&mut buf, 4, &[0x12, 0x34], RefWidth::W16).unwrap();
        assert_eq!(end, 20);

        let mut refs = Vec::new();
        unpack_refs(&buf, 4, 1, RefWidth::W16, &mut refs).unwrap();
        assert_eq!(refs, vec![0x12, 0x34]);
    }
}
