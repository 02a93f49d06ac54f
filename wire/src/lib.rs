//! Sync frame layout, CRC16 and sync scanning for the PacketFS wire protocol.
//!
//! This crate handles the binary side of window synchronization: the sync
//! frame format, the CRC16-CCITT used to protect window contents, and the
//! stateless scan that locates a sync frame in a received payload. It holds
//! no encoder state.
//!
//! # Design Principles
//!
//! - **Stable wire format** - Frame layout is fixed; length is implied by [`SyncConfig`].
//! - **Bounded decoding** - Scanning never panics on truncated or corrupted input.
//! - **No stream state** - Window accounting lives in the protocol crate.

mod config;
mod crc;
mod error;
mod frame;
mod scan;

pub use config::{SyncConfig, DEFAULT_WINDOW_POW2, MAX_WINDOW_POW2};
pub use crc::{crc16, crc16_with, Crc16, CRC16_INIT, CRC16_POLY};
pub use error::{ConfigError, DecodeError, EncodeError, WireResult};
pub use frame::{decode_sync_frame, SyncFrame, SYNC_FRAME_LEN, SYNC_FRAME_LEN_CRC, SYNC_MARK};
pub use scan::{find_sync, scan_for_sync, SyncMatch, SyncScanner};
