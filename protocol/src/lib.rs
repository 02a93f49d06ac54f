//! Windowed reference encoder and sync-frame decoder for the PacketFS wire
//! protocol.
//!
//! [`ProtocolEncoder`] packs fixed-width references into a caller-owned
//! bitstream and, every `2^window_pow2` references, emits a [`SyncFrame`]
//! carrying the window ID and (optionally) a CRC16 over the window's raw
//! bytes. [`ProtocolDecoder`] finds that frame again in a received payload.
//!
//! Encoder and decoder must be built from the same [`SyncConfig`]; the wire
//! format has no way to detect a mismatch.
//!
//! # Example
//!
//! ```
//! use protocol::{ProtocolDecoder, ProtocolEncoder, RefWidth, SyncConfig};
//!
//! let config = SyncConfig::new(3, true).unwrap();
//! let mut encoder = ProtocolEncoder::new(config);
//! let decoder = ProtocolDecoder::new(config);
//!
//! let refs = [0x12, 0x34, 0x56, 0x78, 0xAB, 0xCD, 0xEF, 0x01];
//! let mut packed = [0u8; 8];
//! encoder.pack_refs(&mut packed, 0, &refs, RefWidth::W8).unwrap();
//!
//! let frame = encoder.maybe_sync().unwrap();
//! let found = decoder.scan_for_sync(frame.as_bytes()).unwrap();
//! decoder.verify_window(found, 0, &refs).unwrap();
//! ```

mod decoder;
mod encoder;
mod error;

pub use bitstream::RefWidth;
pub use decoder::ProtocolDecoder;
pub use encoder::ProtocolEncoder;
pub use error::{ProtocolError, ProtocolResult};
pub use wire::{crc16, SyncConfig, SyncFrame, SyncMatch};
