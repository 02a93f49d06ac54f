#![no_main]

use libfuzzer_sys::fuzz_target;
use protocol::{ProtocolDecoder, ProtocolEncoder, RefWidth, SyncConfig};
use wire::SyncScanner;

fuzz_target!(|data: &[u8]| {
    let Some((&head, payload)) = data.split_first() else {
        return;
    };
    let Ok(config) = SyncConfig::new(head % 8, head & 0x80 != 0) else {
        return;
    };

    // Scanning arbitrary bytes must never panic, and the scanner's first
    // frame must agree with the decoder.
    let decoder = ProtocolDecoder::new(config);
    let first = decoder.find_sync(payload);
    assert_eq!(SyncScanner::new(payload, config).next(), first);

    // Every frame the encoder emits must scan back to itself.
    let mut encoder = ProtocolEncoder::new(config);
    let mut packed = vec![0u8; payload.len()];
    let mut offset = 0;
    for chunk in payload.chunks(usize::from(head % 5) + 1) {
        let Ok(next) = encoder.pack_refs(&mut packed, offset, chunk, RefWidth::W8) else {
            return;
        };
        offset = next;
        if let Some(frame) = encoder.maybe_sync() {
            let found = decoder.scan_for_sync(frame.as_bytes());
            assert_eq!(found, Some((frame.window_id(), frame.crc16().unwrap_or(0))));
        }
    }
});
