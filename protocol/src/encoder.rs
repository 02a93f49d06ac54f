//! Windowed reference encoder.

use bitstream::RefWidth;
use log::{debug, trace};
use wire::{crc16, SyncConfig, SyncFrame};

use crate::error::ProtocolResult;

/// Packs references into a caller-owned bitstream and emits a sync frame at
/// every window boundary.
///
/// One encoder drives one logical stream and one window-ID sequence. It is a
/// single-writer state machine: share it across threads only behind external
/// synchronization.
#[derive(Debug, Clone)]
pub struct ProtocolEncoder {
    sync: SyncConfig,
    window_mask: u32,
    /// References packed since creation, modulo 2^32.
    ref_count: u32,
    window_id: u16,
    /// Raw reference bytes of the current window.
    win_crc_accum: Vec<u8>,
    tier: u8,
}

impl ProtocolEncoder {
    /// Creates an encoder whose first window has ID 0.
    #[must_use]
    pub fn new(sync: SyncConfig) -> Self {
        Self::with_window_id(sync, 0)
    }

    /// Creates an encoder whose first window has ID `window_id`.
    #[must_use]
    pub fn with_window_id(sync: SyncConfig, window_id: u16) -> Self {
        Self {
            sync,
            window_mask: sync.window_mask(),
            ref_count: 0,
            window_id,
            win_crc_accum: Vec::new(),
            tier: 0,
        }
    }

    #[must_use]
    pub const fn sync(&self) -> SyncConfig {
        self.sync
    }

    #[must_use]
    pub const fn window_mask(&self) -> u32 {
        self.window_mask
    }

    /// References packed since creation, modulo 2^32.
    #[must_use]
    pub const fn ref_count(&self) -> u32 {
        self.ref_count
    }

    /// ID the next sync frame will carry.
    #[must_use]
    pub const fn window_id(&self) -> u16 {
        self.window_id
    }

    /// Raw bytes accumulated toward the current window's CRC.
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.win_crc_accum.len()
    }

    /// References still needed to reach the next window boundary.
    #[must_use]
    pub const fn refs_until_boundary(&self) -> u32 {
        self.window_mask - (self.ref_count & self.window_mask) + 1
    }

    /// Opaque tier marker, reserved for future stream classes.
    #[must_use]
    pub const fn tier(&self) -> u8 {
        self.tier
    }

    /// Packs `refs` (raw big-endian references of `width`) into `out` starting
    /// at `bit_offset` and returns the new bit offset.
    ///
    /// A sync is only due when the cumulative count lands exactly on a window
    /// boundary, so a single call should not pack across one.
    ///
    /// # Errors
    ///
    /// Fails if `refs` is not a whole number of references or `out` is too
    /// small. The encoder state is unchanged on error.
    pub fn pack_refs(
        &mut self,
        out: &mut [u8],
        bit_offset: usize,
        refs: &[u8],
        width: RefWidth,
    ) -> ProtocolResult<usize> {
        let count = width.ref_count(refs.len())?;
        let end = bitstream::pack_refs(out, bit_offset, refs, width)?;

        self.win_crc_accum.extend_from_slice(refs);
        // The counter is defined modulo 2^32.
        #[allow(clippy::cast_possible_truncation)]
        let count_mod = count as u32;
        self.ref_count = self.ref_count.wrapping_add(count_mod);
        trace!(
            "packed {count} refs ({} bits) at bit {bit_offset}, ref_count={}",
            width.bits(),
            self.ref_count
        );
        Ok(end)
    }

    /// Emits the sync frame for the window just completed, if any.
    ///
    /// A frame is due when references were packed since the last frame and
    /// the cumulative count sits on a window boundary. Emitting clears the
    /// CRC accumulator and advances the window ID (wrapping at `u16::MAX`).
    pub fn maybe_sync(&mut self) -> Option<SyncFrame> {
        if self.win_crc_accum.is_empty() || self.ref_count & self.window_mask != 0 {
            return None;
        }

        let crc = self
            .sync
            .window_crc16()
            .then(|| crc16(&self.win_crc_accum));
        let frame = SyncFrame::new(self.window_id, crc);
        debug!(
            "sync window {} over {} bytes, crc {:?}",
            self.window_id,
            self.win_crc_accum.len(),
            crc
        );

        self.win_crc_accum.clear();
        self.window_id = self.window_id.wrapping_add(1);
        if self.window_id == 0 {
            debug!("window id rolled over");
        }
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProtocolError;
    use wire::SYNC_MARK;

    fn window8(crc: bool) -> SyncConfig {
        SyncConfig::new(3, crc).unwrap()
    }

    fn pack_window(encoder: &mut ProtocolEncoder, refs: &[u8]) -> SyncFrame {
        let mut out = vec![0u8; refs.len()];
        encoder.pack_refs(&mut out, 0, refs, RefWidth::W8).unwrap();
        encoder.maybe_sync().expect("window complete")
    }

    #[test]
    fn new_encoder_state() {
        let encoder = ProtocolEncoder::new(window8(true));
        assert_eq!(encoder.ref_count(), 0);
        assert_eq!(encoder.window_id(), 0);
        assert_eq!(encoder.window_mask(), 7);
        assert_eq!(encoder.pending_bytes(), 0);
        assert_eq!(encoder.refs_until_boundary(), 8);
        assert_eq!(encoder.tier(), 0);
    }

    #[test]
    fn no_sync_before_any_refs() {
        let mut encoder = ProtocolEncoder::new(window8(true));
        assert_eq!(encoder.maybe_sync(), None);
    }

    #[test]
    fn window_boundary_detection() {
        let mut encoder = ProtocolEncoder::new(window8(true));
        let mut out = [0u8; 8];
        let mut offset = 0;
        for i in 0..7u8 {
            offset = encoder
                .pack_refs(&mut out, offset, &[i], RefWidth::W8)
                .unwrap();
            assert_eq!(encoder.maybe_sync(), None, "no sync after {} refs", i + 1);
        }
        assert_eq!(encoder.refs_until_boundary(), 1);

        encoder
            .pack_refs(&mut out, offset, &[7], RefWidth::W8)
            .unwrap();
        let frame = encoder.maybe_sync().unwrap();
        assert_eq!(frame.encoded_len(), 5);
        assert_eq!(frame.as_bytes()[0], SYNC_MARK);
        assert_eq!(frame.window_id(), 0);
        assert_eq!(frame.crc16(), Some(crc16(&[0, 1, 2, 3, 4, 5, 6, 7])));
    }

    #[test]
    fn chunk_crossing_boundary_defers_sync() {
        let mut encoder = ProtocolEncoder::new(window8(true));
        let refs: Vec<u8> = (0..16).collect();
        let mut out = [0u8; 16];

        let offset = encoder
            .pack_refs(&mut out, 0, &refs[..10], RefWidth::W8)
            .unwrap();
        assert_eq!(encoder.ref_count(), 10);
        assert_eq!(encoder.maybe_sync(), None);
        assert_eq!(encoder.refs_until_boundary(), 6);

        encoder
            .pack_refs(&mut out, offset, &refs[10..], RefWidth::W8)
            .unwrap();
        let frame = encoder.maybe_sync().unwrap();
        assert_eq!(frame.window_id(), 0);
        assert_eq!(frame.crc16(), Some(crc16(&refs)));
        assert_eq!(encoder.window_id(), 1);
        assert_eq!(encoder.maybe_sync(), None);
    }

    #[test]
    fn repeated_maybe_sync_emits_once() {
        let mut encoder = ProtocolEncoder::new(window8(true));
        pack_window(&mut encoder, &[1; 8]);
        assert_eq!(encoder.maybe_sync(), None);
        assert_eq!(encoder.maybe_sync(), None);
        assert_eq!(encoder.window_id(), 1);
    }

    #[test]
    fn window_ids_increment() {
        let mut encoder = ProtocolEncoder::new(window8(true));
        let first = pack_window(&mut encoder, &[1; 8]);
        let second = pack_window(&mut encoder, &[2; 8]);
        assert_eq!(second.window_id(), first.window_id().wrapping_add(1));
    }

    #[test]
    fn window_id_rollover() {
        let mut encoder = ProtocolEncoder::with_window_id(window8(true), 0xFFFF);
        let last = pack_window(&mut encoder, &[1; 8]);
        let wrapped = pack_window(&mut encoder, &[1; 8]);
        assert_eq!(last.window_id(), 0xFFFF);
        assert_eq!(wrapped.window_id(), 0x0000);
        assert_eq!(&wrapped.as_bytes()[1..3], &[0x00, 0x00]);
    }

    #[test]
    fn accumulator_resets_after_sync() {
        let mut encoder = ProtocolEncoder::new(window8(true));
        pack_window(&mut encoder, &[0xAA; 8]);
        assert_eq!(encoder.pending_bytes(), 0);

        let second = pack_window(&mut encoder, &[0x55; 8]);
        assert_eq!(second.crc16(), Some(crc16(&[0x55; 8])));
    }

    #[test]
    fn no_crc_mode_emits_short_frames() {
        let mut encoder = ProtocolEncoder::new(window8(false));
        let frame = pack_window(&mut encoder, &[9; 8]);
        assert_eq!(frame.encoded_len(), 3);
        assert_eq!(frame.crc16(), None);
    }

    #[test]
    fn wide_refs_count_by_width() {
        let mut encoder = ProtocolEncoder::new(window8(true));
        let mut out = [0u8; 32];
        let end = encoder
            .pack_refs(&mut out, 0, &[0u8; 16], RefWidth::W16)
            .unwrap();
        assert_eq!(end, 128);
        assert_eq!(encoder.ref_count(), 8);
        assert_eq!(encoder.pending_bytes(), 16);
        assert!(encoder.maybe_sync().is_some());

        encoder
            .pack_refs(&mut out, end, &[0u8; 16], RefWidth::W32)
            .unwrap();
        assert_eq!(encoder.ref_count(), 12);
        assert_eq!(encoder.maybe_sync(), None);
    }

    #[test]
    fn failed_pack_leaves_state_untouched() {
        let mut encoder = ProtocolEncoder::new(window8(true));
        let mut out = [0u8; 2];
        let err = encoder
            .pack_refs(&mut out, 0, &[1, 2, 3], RefWidth::W8)
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Bitstream(bitstream::BitError::BufferOverflow { .. })
        ));
        let err = encoder
            .pack_refs(&mut out, 0, &[1, 2, 3], RefWidth::W16)
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Bitstream(bitstream::BitError::MisalignedRefs { .. })
        ));
        assert_eq!(encoder.ref_count(), 0);
        assert_eq!(encoder.pending_bytes(), 0);
    }

    #[test]
    fn ref_count_wraps_onto_boundary() {
        let mut encoder = ProtocolEncoder::new(window8(true));
        encoder.ref_count = u32::MAX - 3;
        let mut out = [0u8; 4];
        encoder
            .pack_refs(&mut out, 0, &[1, 2, 3, 4], RefWidth::W8)
            .unwrap();
        assert_eq!(encoder.ref_count(), 0);
        assert!(encoder.maybe_sync().is_some());
    }

    #[test]
    fn every_reference_syncs_with_unit_window() {
        let mut encoder = ProtocolEncoder::new(SyncConfig::new(0, true).unwrap());
        let a = pack_window(&mut encoder, &[0x31]);
        let b = pack_window(&mut encoder, &[0x32]);
        assert_eq!((a.window_id(), b.window_id()), (0, 1));
        assert_eq!(a.crc16(), Some(crc16(b"1")));
    }
}
