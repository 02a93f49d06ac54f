//! Window synchronization configuration.

use crate::crc::crc16;
use crate::error::ConfigError;
use crate::frame::{SYNC_FRAME_LEN, SYNC_FRAME_LEN_CRC};

/// Default window exponent (65 536 references per window).
pub const DEFAULT_WINDOW_POW2: u8 = 16;

/// Largest window exponent the 32-bit reference counter can mask.
pub const MAX_WINDOW_POW2: u8 = 31;

/// Sync configuration shared by an encoder and the decoders reading its
/// stream.
///
/// Both ends must agree on this value; nothing on the wire detects a
/// mismatch. [`fingerprint`](Self::fingerprint) can be compared out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SyncConfigRepr")
)]
pub struct SyncConfig {
    window_pow2: u8,
    window_crc16: bool,
}

impl SyncConfig {
    /// Creates a validated configuration.
    pub const fn new(window_pow2: u8, window_crc16: bool) -> Result<Self, ConfigError> {
        if window_pow2 > MAX_WINDOW_POW2 {
            return Err(ConfigError::WindowTooLarge {
                window_pow2,
                max: MAX_WINDOW_POW2,
            });
        }
        Ok(Self {
            window_pow2,
            window_crc16,
        })
    }

    /// Returns the window exponent.
    #[must_use]
    pub const fn window_pow2(self) -> u8 {
        self.window_pow2
    }

    /// Returns `true` if sync frames carry a CRC16.
    #[must_use]
    pub const fn window_crc16(self) -> bool {
        self.window_crc16
    }

    /// Number of references per window.
    #[must_use]
    pub const fn window_size(self) -> u32 {
        1 << self.window_pow2
    }

    /// Mask selecting the position within a window.
    #[must_use]
    pub const fn window_mask(self) -> u32 {
        self.window_size() - 1
    }

    /// Encoded sync frame length for this configuration.
    #[must_use]
    pub const fn frame_len(self) -> usize {
        if self.window_crc16 {
            SYNC_FRAME_LEN_CRC
        } else {
            SYNC_FRAME_LEN
        }
    }

    /// CRC16 over the canonical encoding `[window_pow2, window_crc16]`.
    #[must_use]
    pub fn fingerprint(self) -> u16 {
        crc16(&[self.window_pow2, u8::from(self.window_crc16)])
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window_pow2: DEFAULT_WINDOW_POW2,
            window_crc16: true,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SyncConfigRepr {
    window_pow2: u8,
    window_crc16: bool,
}

#[cfg(feature = "serde")]
impl Default for SyncConfigRepr {
    fn default() -> Self {
        let config = SyncConfig::default();
        Self {
            window_pow2: config.window_pow2,
            window_crc16: config.window_crc16,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<SyncConfigRepr> for SyncConfig {
    type Error = ConfigError;

    fn try_from(repr: SyncConfigRepr) -> Result<Self, Self::Error> {
        Self::new(repr.window_pow2, repr.window_crc16)
    }
}
