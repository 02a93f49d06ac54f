use bitstream::{pack_refs, unpack_refs, BitError, BitReader, BitWriter, RefWidth};

#[test]
fn bounded_writer_roundtrip_bits() {
    let mut buf = [0u8; 8];
    let mut writer = BitWriter::new(&mut buf);
    writer.write_bits(0b1010, 4).unwrap();
    writer.write_bits(0xAB, 8).unwrap();
    let bytes_used = writer.finish();

    let mut reader = BitReader::new(&buf[..bytes_used]);
    assert_eq!(reader.read_bits(4).unwrap(), 0b1010);
    assert_eq!(reader.read_bits(8).unwrap(), 0xAB);
}

#[test]
fn mixed_width_stream() {
    // A 3-bit header followed by references of every width, none aligned.
    let mut buf = [0u8; 16];
    let mut writer = BitWriter::new(&mut buf);
    writer.write_bits(0b101, 3).unwrap();
    let mut offset = writer.bit_position();

    offset = pack_refs(&mut buf, offset, &[0x7F], RefWidth::W8).unwrap();
    offset = pack_refs(&mut buf, offset, &[0xBE, 0xEF], RefWidth::W16).unwrap();
    offset = pack_refs(&mut buf, offset, &[0x01, 0x02, 0x03, 0x04], RefWidth::W32).unwrap();
    assert_eq!(offset, 3 + 8 + 16 + 32);

    let mut reader = BitReader::new(&buf);
    assert_eq!(reader.read_bits(3).unwrap(), 0b101);

    let mut refs = Vec::new();
    let mut pos = unpack_refs(&buf, 3, 1, RefWidth::W8, &mut refs).unwrap();
    pos = unpack_refs(&buf, pos, 1, RefWidth::W16, &mut refs).unwrap();
    pos = unpack_refs(&buf, pos, 1, RefWidth::W32, &mut refs).unwrap();
    assert_eq!(pos, offset);
    assert_eq!(refs, vec![0x7F, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn pack_exact_capacity() {
    let mut buf = [0u8; 4];
    let end = pack_refs(&mut buf, 0, &[1, 2, 3, 4], RefWidth::W32).unwrap();
    assert_eq!(end, 32);

    let err = pack_refs(&mut buf, end, &[5], RefWidth::W8).unwrap_err();
    assert!(matches!(err, BitError::BufferOverflow { available: 0, .. }));
}
