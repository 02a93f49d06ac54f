//! Error types for wire format operations.

use std::fmt;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Errors that can occur while decoding a sync frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Buffer is too small to hold a complete sync frame.
    Truncated { needed: usize, available: usize },

    /// First byte is not the sync mark.
    InvalidSyncMark { found: u8 },
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    BufferTooSmall { needed: usize, available: usize },
}

/// Invalid sync configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Window exponent does not fit the 32-bit reference counter.
    WindowTooLarge { window_pow2: u8, max: u8 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { needed, available } => {
                write!(
                    f,
                    "truncated sync frame: need {needed} bytes, have {available}"
                )
            }
            Self::InvalidSyncMark { found } => {
                write!(f, "invalid sync mark: 0x{found:02X}")
            }
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed}, have {available}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowTooLarge { window_pow2, max } => {
                write!(f, "window_pow2 {window_pow2} exceeds maximum {max}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}

impl std::error::Error for ConfigError {}
