//! Stateless sync-frame decoder.

use bitstream::RefWidth;
use log::{debug, trace};
use wire::{crc16, SyncConfig, SyncMatch};

use crate::error::{ProtocolError, ProtocolResult};

/// Locates sync frames in received payloads.
///
/// Holds only the expected [`SyncConfig`]; every call is independent, so a
/// decoder can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProtocolDecoder {
    sync: SyncConfig,
}

impl ProtocolDecoder {
    /// Creates a decoder for streams produced with `sync`.
    #[must_use]
    pub const fn new(sync: SyncConfig) -> Self {
        Self { sync }
    }

    #[must_use]
    pub const fn sync(&self) -> SyncConfig {
        self.sync
    }

    /// Returns `(window_id, crc16)` of the first sync frame in `payload`.
    ///
    /// `None` when there is no sync mark or the first one is truncated. The
    /// CRC component is 0 when the config disables CRCs.
    #[must_use]
    pub fn scan_for_sync(&self, payload: &[u8]) -> Option<(u16, u16)> {
        self.find_sync(payload).map(|found| found.as_tuple())
    }

    /// Like [`scan_for_sync`](Self::scan_for_sync), also reporting the offset.
    #[must_use]
    pub fn find_sync(&self, payload: &[u8]) -> Option<SyncMatch> {
        let found = wire::find_sync(payload, &self.sync);
        trace!("scanned {} bytes: {found:?}", payload.len());
        found
    }

    /// Recovers `count` raw references from a packed bitstream.
    ///
    /// Returns the raw big-endian bytes and the bit offset after the last
    /// reference.
    pub fn unpack_refs(
        &self,
        data: &[u8],
        bit_offset: usize,
        count: usize,
        width: RefWidth,
    ) -> ProtocolResult<(Vec<u8>, usize)> {
        let mut refs = Vec::new();
        let end = bitstream::unpack_refs(data, bit_offset, count, width, &mut refs)?;
        Ok((refs, end))
    }

    /// Checks a scanned `(window_id, crc16)` against the expected window ID
    /// and the raw bytes received for that window.
    ///
    /// The CRC is only compared when the config enables it.
    pub fn verify_window(
        &self,
        found: (u16, u16),
        expected_window_id: u16,
        window_bytes: &[u8],
    ) -> ProtocolResult<()> {
        let (window_id, crc) = found;
        if window_id != expected_window_id {
            debug!("window id mismatch: expected {expected_window_id}, found {window_id}");
            return Err(ProtocolError::WindowIdMismatch {
                expected: expected_window_id,
                found: window_id,
            });
        }
        if self.sync.window_crc16() {
            let computed = crc16(window_bytes);
            if computed != crc {
                debug!("window {window_id} crc mismatch: 0x{computed:04X} != 0x{crc:04X}");
                return Err(ProtocolError::CrcMismatch {
                    expected: computed,
                    found: crc,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire::{SyncFrame, SYNC_MARK};

    fn decoder(crc: bool) -> ProtocolDecoder {
        ProtocolDecoder::new(SyncConfig::new(3, crc).unwrap())
    }

    #[test]
    fn default_decoder_uses_default_config() {
        assert_eq!(ProtocolDecoder::default().sync(), SyncConfig::default());
    }

    #[test]
    fn absent_without_mark() {
        assert_eq!(decoder(true).scan_for_sync(&[0x00; 16]), None);
    }

    #[test]
    fn truncated_mark_is_absent() {
        assert_eq!(decoder(true).scan_for_sync(&[SYNC_MARK, 0x01]), None);
        assert_eq!(decoder(false).scan_for_sync(&[SYNC_MARK, 0x01]), None);
    }

    #[test]
    fn scan_with_and_without_crc() {
        let payload = [0x01, SYNC_MARK, 0x00, 0x09, 0x12, 0x34];
        assert_eq!(decoder(true).scan_for_sync(&payload), Some((9, 0x1234)));
        assert_eq!(decoder(false).scan_for_sync(&payload), Some((9, 0)));
        assert_eq!(decoder(true).find_sync(&payload).unwrap().offset, 1);
    }

    #[test]
    fn verify_accepts_matching_window() {
        let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let frame = SyncFrame::new(4, Some(crc16(&bytes)));
        let found = decoder(true).scan_for_sync(frame.as_bytes()).unwrap();
        assert_eq!(decoder(true).verify_window(found, 4, &bytes), Ok(()));
    }

    #[test]
    fn verify_rejects_corrupted_window() {
        let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let found = (4, crc16(&bytes));
        let mut corrupted = bytes;
        corrupted[0] ^= 0x80;
        assert!(matches!(
            decoder(true).verify_window(found, 4, &corrupted),
            Err(ProtocolError::CrcMismatch { .. })
        ));
        assert_eq!(
            decoder(true).verify_window(found, 5, &bytes),
            Err(ProtocolError::WindowIdMismatch {
                expected: 5,
                found: 4
            })
        );
    }

    #[test]
    fn verify_ignores_crc_when_disabled() {
        assert_eq!(decoder(false).verify_window((2, 0), 2, &[0xFF; 8]), Ok(()));
    }

    #[test]
    fn unpack_truncated_stream_fails() {
        let err = decoder(true)
            .unpack_refs(&[0x00], 0, 2, RefWidth::W8)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Bitstream(_)));
    }
}
