//! Sync frame layout.
//!
//! ```text
//! +------+-----------+-----------+
//! | 0xA5 | window id | crc16     |
//! | 1 B  | 2 B (BE)  | 2 B (BE)  |
//! +------+-----------+-----------+
//! ```
//!
//! The CRC16 field is present only when the stream's [`SyncConfig`] enables
//! it. There is no version byte; the frame length is implied by the config.

use crate::config::SyncConfig;
use crate::error::{DecodeError, EncodeError, WireResult};

/// Byte value that opens every sync frame.
pub const SYNC_MARK: u8 = 0xA5;

/// Frame length without a CRC: mark + window id.
pub const SYNC_FRAME_LEN: usize = 1 + 2;

/// Frame length with a CRC: mark + window id + crc16.
pub const SYNC_FRAME_LEN_CRC: usize = 1 + 2 + 2;

/// An encoded sync frame.
///
/// Holds its wire bytes inline, so emitting a frame never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncFrame {
    window_id: u16,
    crc16: Option<u16>,
    bytes: [u8; SYNC_FRAME_LEN_CRC],
}

impl SyncFrame {
    /// Builds the frame for `window_id`, with a CRC field if `crc16` is set.
    #[must_use]
    pub const fn new(window_id: u16, crc16: Option<u16>) -> Self {
        let id = window_id.to_be_bytes();
        let crc = match crc16 {
            Some(value) => value.to_be_bytes(),
            None => [0, 0],
        };
        Self {
            window_id,
            crc16,
            bytes: [SYNC_MARK, id[0], id[1], crc[0], crc[1]],
        }
    }

    /// Window identifier carried by this frame.
    #[must_use]
    pub const fn window_id(&self) -> u16 {
        self.window_id
    }

    /// CRC16 carried by this frame, if the stream enables CRCs.
    #[must_use]
    pub const fn crc16(&self) -> Option<u16> {
        self.crc16
    }

    /// Encoded length in bytes (3 or 5).
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        if self.crc16.is_some() {
            SYNC_FRAME_LEN_CRC
        } else {
            SYNC_FRAME_LEN
        }
    }

    /// Wire bytes of this frame.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.encoded_len()]
    }

    /// Copies the frame into `out`, returning the number of bytes written.
    pub fn encode_into(&self, out: &mut [u8]) -> Result<usize, EncodeError> {
        let len = self.encoded_len();
        if out.len() < len {
            return Err(EncodeError::BufferTooSmall {
                needed: len,
                available: out.len(),
            });
        }
        out[..len].copy_from_slice(self.as_bytes());
        Ok(len)
    }
}

/// Decodes a sync frame that starts at the first byte of `buf`.
///
/// Trailing bytes after the frame are ignored.
pub fn decode_sync_frame(buf: &[u8], config: &SyncConfig) -> WireResult<SyncFrame> {
    let needed = config.frame_len();
    if buf.len() < needed {
        return Err(DecodeError::Truncated {
            needed,
            available: buf.len(),
        });
    }
    if buf[0] != SYNC_MARK {
        return Err(DecodeError::InvalidSyncMark { found: buf[0] });
    }

    let window_id = u16::from_be_bytes([buf[1], buf[2]]);
    let crc16 = if config.window_crc16() {
        Some(u16::from_be_bytes([buf[3], buf[4]]))
    } else {
        None
    };
    Ok(SyncFrame::new(window_id, crc16))
}
