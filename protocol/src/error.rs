//! Error types for protocol operations.

use std::fmt;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors surfaced by the encoder and decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Packing or unpacking references failed.
    Bitstream(bitstream::BitError),

    /// A sync frame carried an unexpected window ID.
    WindowIdMismatch { expected: u16, found: u16 },

    /// A sync frame's CRC does not match the received window bytes.
    CrcMismatch { expected: u16, found: u16 },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(err) => write!(f, "bitstream error: {err}"),
            Self::WindowIdMismatch { expected, found } => {
                write!(f, "window id mismatch: expected {expected}, found {found}")
            }
            Self::CrcMismatch { expected, found } => {
                write!(
                    f,
                    "window crc mismatch: computed 0x{expected:04X}, frame carries 0x{found:04X}"
                )
            }
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<bitstream::BitError> for ProtocolError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}
