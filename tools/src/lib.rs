//! Encoding and inspection tools for the PacketFS wire protocol.
//!
//! This crate backs the `packetfs-tools` binary:
//!
//! - Encode a raw reference file into a packed bitstream plus sync frames
//! - Scan captured payloads for sync frames
//! - Resolve the effective sync configuration from a file and flags
//!
//! Reports serialize to JSON.

use anyhow::{Context, Result};
use log::debug;
use protocol::{ProtocolDecoder, ProtocolEncoder, RefWidth, SyncConfig, SyncFrame};
use serde::Serialize;
use wire::SyncScanner;

/// Sync frame emitted while encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub window_id: u16,
    pub crc16: Option<u16>,
    /// Number of references packed when the frame was emitted.
    pub after_refs: u64,
}

/// Summary of an encoding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeReport {
    pub width_bits: u8,
    pub config: SyncConfig,
    pub fingerprint: u16,
    pub ref_count: u64,
    pub packed_bits: usize,
    /// References after the last sync frame, not yet covered by one.
    pub pending_refs: u64,
    pub frames: Vec<FrameReport>,
}

/// Packed output of [`encode_refs`].
#[derive(Debug, Clone)]
pub struct EncodedStream {
    pub packed: Vec<u8>,
    pub frames: Vec<SyncFrame>,
    pub report: EncodeReport,
}

/// Packs `refs` window by window, collecting every sync frame.
///
/// Each pack call stops at the next window boundary so that every complete
/// window produces exactly one frame.
pub fn encode_refs(refs: &[u8], width: RefWidth, config: SyncConfig) -> Result<EncodedStream> {
    let total = width
        .ref_count(refs.len())
        .context("reference data length")?;
    let mut encoder = ProtocolEncoder::new(config);
    let mut packed = vec![0u8; refs.len()];
    let mut offset = 0;
    let mut packed_refs = 0u64;
    let mut frames = Vec::new();
    let mut reports = Vec::new();

    let mut rest = refs;
    while !rest.is_empty() {
        let until_boundary = usize::try_from(encoder.refs_until_boundary()).unwrap_or(usize::MAX);
        let take = until_boundary.saturating_mul(width.bytes()).min(rest.len());
        let (chunk, tail) = rest.split_at(take);
        offset = encoder
            .pack_refs(&mut packed, offset, chunk, width)
            .context("pack references")?;
        packed_refs += (take / width.bytes()) as u64;

        if let Some(frame) = encoder.maybe_sync() {
            debug!("window {} complete after {packed_refs} refs", frame.window_id());
            reports.push(FrameReport {
                window_id: frame.window_id(),
                crc16: frame.crc16(),
                after_refs: packed_refs,
            });
            frames.push(frame);
        }
        rest = tail;
    }

    let pending_refs = (encoder.pending_bytes() / width.bytes()) as u64;
    Ok(EncodedStream {
        packed,
        frames,
        report: EncodeReport {
            width_bits: width.bits(),
            config,
            fingerprint: config.fingerprint(),
            ref_count: total as u64,
            packed_bits: offset,
            pending_refs,
            frames: reports,
        },
    })
}

/// File name for the `index`-th frame of an encoded stream.
///
/// Window IDs repeat after a 16-bit rollover, so the stream index keeps names
/// unique.
#[must_use]
pub fn frame_file_name(index: usize, frame: &SyncFrame) -> String {
    format!("frame-{index:06}-w{:05}.bin", frame.window_id())
}

/// A sync frame found in a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoundFrame {
    pub offset: usize,
    pub window_id: u16,
    pub crc16: u16,
}

/// Result of scanning one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub payload_len: usize,
    pub frames: Vec<FoundFrame>,
}

/// Scans `payload` for the first sync frame, or every frame when `all`.
#[must_use]
pub fn scan_payload(payload: &[u8], config: SyncConfig, all: bool) -> ScanReport {
    let found = |m: wire::SyncMatch| FoundFrame {
        offset: m.offset,
        window_id: m.window_id,
        crc16: m.crc16,
    };
    let frames = if all {
        SyncScanner::new(payload, config).map(found).collect()
    } else {
        ProtocolDecoder::new(config)
            .find_sync(payload)
            .map(found)
            .into_iter()
            .collect()
    };
    ScanReport {
        payload_len: payload.len(),
        frames,
    }
}

/// Merges a config file with command-line overrides.
pub fn resolve_config(
    file: Option<SyncConfig>,
    window_pow2: Option<u8>,
    no_crc: bool,
) -> Result<SyncConfig> {
    let base = file.unwrap_or_default();
    let window_pow2 = window_pow2.unwrap_or_else(|| base.window_pow2());
    let window_crc16 = base.window_crc16() && !no_crc;
    SyncConfig::new(window_pow2, window_crc16).context("invalid sync configuration")
}

/// Parses a JSON sync configuration.
pub fn parse_config(json: &str) -> Result<SyncConfig> {
    serde_json::from_str(json).context("parse sync config json")
}
