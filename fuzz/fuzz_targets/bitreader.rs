#![no_main]

use bitstream::{unpack_refs, BitReader, RefWidth};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 4;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bit();
            }
            1 => {
                let bits = (data[idx.saturating_sub(1)] % 64).saturating_add(1);
                let _ = reader.read_bits(bits);
            }
            2 => {
                let _ = reader.align_to_byte();
            }
            _ => {
                let width = match data[idx.saturating_sub(1)] % 3 {
                    0 => RefWidth::W8,
                    1 => RefWidth::W16,
                    _ => RefWidth::W32,
                };
                let count = usize::from(data[idx.saturating_sub(1)] >> 2);
                let mut out = Vec::new();
                let _ = unpack_refs(data, reader.bit_position(), count, width, &mut out);
            }
        }
    }
});
