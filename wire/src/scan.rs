//! Locating sync frames inside arbitrary payloads.
//!
//! Only the leftmost sync mark is considered. A candidate without enough
//! trailing bytes means "no sync": any later candidate would be shorter
//! still, so scanning further cannot succeed.

use crate::config::SyncConfig;
use crate::frame::{decode_sync_frame, SYNC_MARK};

/// A sync frame located inside a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMatch {
    /// Byte offset of the sync mark.
    pub offset: usize,
    pub window_id: u16,
    /// Transmitted CRC16, or 0 when the config disables CRCs.
    pub crc16: u16,
}

impl SyncMatch {
    /// Returns `(window_id, crc16)`.
    #[must_use]
    pub const fn as_tuple(&self) -> (u16, u16) {
        (self.window_id, self.crc16)
    }
}

/// Finds the first complete sync frame in `payload`.
pub fn find_sync(payload: &[u8], config: &SyncConfig) -> Option<SyncMatch> {
    let offset = payload.iter().position(|&b| b == SYNC_MARK)?;
    read_candidate(payload, offset, config)
}

/// Returns `(window_id, crc16)` of the first sync frame in `payload`.
///
/// `crc16` is 0 when the config disables CRCs.
pub fn scan_for_sync(payload: &[u8], config: &SyncConfig) -> Option<(u16, u16)> {
    find_sync(payload, config).map(|found| found.as_tuple())
}

/// Iterator over every sync frame in a payload, left to right.
///
/// After a complete frame the scan resumes past its last byte. The first item
/// always equals [`find_sync`].
#[derive(Debug, Clone)]
pub struct SyncScanner<'a> {
    payload: &'a [u8],
    config: SyncConfig,
    pos: usize,
}

impl<'a> SyncScanner<'a> {
    #[must_use]
    pub const fn new(payload: &'a [u8], config: SyncConfig) -> Self {
        Self {
            payload,
            config,
            pos: 0,
        }
    }
}

impl Iterator for SyncScanner<'_> {
    type Item = SyncMatch;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.payload.get(self.pos..)?;
        let Some(rel) = rest.iter().position(|&b| b == SYNC_MARK) else {
            self.pos = self.payload.len();
            return None;
        };
        let offset = self.pos + rel;
        match read_candidate(self.payload, offset, &self.config) {
            Some(found) => {
                self.pos = offset + self.config.frame_len();
                Some(found)
            }
            None => {
                self.pos = self.payload.len();
                None
            }
        }
    }
}

fn read_candidate(payload: &[u8], offset: usize, config: &SyncConfig) -> Option<SyncMatch> {
    let frame = decode_sync_frame(&payload[offset..], config).ok()?;
    Some(SyncMatch {
        offset,
        window_id: frame.window_id(),
        crc16: frame.crc16().unwrap_or(0),
    })
}
