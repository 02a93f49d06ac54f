use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::Pattern;
use packetfs_tools::{
    encode_refs, frame_file_name, parse_config, resolve_config, scan_payload, ScanReport,
};
use protocol::{RefWidth, SyncConfig};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "packetfs-tools",
    version,
    about = "PacketFS sync-frame encoding and inspection tools"
)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConfigArgs {
    /// JSON sync configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Window size exponent (overrides the config file).
    #[arg(long, global = true)]
    window_pow2: Option<u8>,
    /// Disable CRC16 fields in sync frames.
    #[arg(long, global = true)]
    no_crc: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Pack a raw reference file and emit sync frames.
    Encode {
        /// Path to the raw big-endian references.
        refs_path: PathBuf,
        /// Reference width in bits (8, 16 or 32).
        #[arg(long, default_value = "8", value_parser = parse_width)]
        width: RefWidth,
        /// Write the packed bitstream here.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write each sync frame to `<dir>/frame-<index>-w<window_id>.bin`.
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// Scan payloads for sync frames.
    Scan {
        /// Payload file, or a directory of payload files.
        path: PathBuf,
        /// Optional glob filter when scanning a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Report every frame instead of the first.
        #[arg(long)]
        all: bool,
    },
    /// Print the CRC16-CCITT of a file.
    Crc {
        /// File to checksum.
        path: PathBuf,
    },
    /// Print the effective sync configuration.
    Config,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Command::Encode {
            refs_path,
            width,
            out,
            frames,
        } => {
            let refs = fs::read(&refs_path)
                .with_context(|| format!("read references {}", refs_path.display()))?;
            let stream = encode_refs(&refs, width, config)?;
            if let Some(out) = out {
                let used = stream.report.packed_bits.div_ceil(8);
                fs::write(&out, &stream.packed[..used])
                    .with_context(|| format!("write packed stream {}", out.display()))?;
            }
            if let Some(dir) = frames {
                fs::create_dir_all(&dir)
                    .with_context(|| format!("create frame dir {}", dir.display()))?;
                for (index, frame) in stream.frames.iter().enumerate() {
                    let path = dir.join(frame_file_name(index, frame));
                    fs::write(&path, frame.as_bytes())
                        .with_context(|| format!("write frame {}", path.display()))?;
                }
            }
            print_json(&stream.report)?;
        }
        Command::Scan { path, glob, all } => {
            if path.is_dir() {
                for entry in collect_payload_entries(&path, glob.as_deref())? {
                    let bytes = fs::read(&entry)
                        .with_context(|| format!("read payload {}", entry.display()))?;
                    println!("== {} ({} bytes) ==", entry.display(), bytes.len());
                    print_scan_report(&scan_payload(&bytes, config, all));
                }
            } else {
                let bytes = fs::read(&path)
                    .with_context(|| format!("read payload {}", path.display()))?;
                print_scan_report(&scan_payload(&bytes, config, all));
            }
        }
        Command::Crc { path } => {
            let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
            println!("0x{:04x}", wire::crc16(&bytes));
        }
        Command::Config => {
            #[derive(Serialize)]
            struct Effective {
                config: SyncConfig,
                window_size: u32,
                frame_len: usize,
                fingerprint: u16,
            }
            print_json(&Effective {
                config,
                window_size: config.window_size(),
                frame_len: config.frame_len(),
                fingerprint: config.fingerprint(),
            })?;
        }
    }
    Ok(())
}

fn parse_width(value: &str) -> Result<RefWidth, String> {
    value
        .parse::<u32>()
        .ok()
        .and_then(RefWidth::from_bits)
        .ok_or_else(|| format!("unsupported width {value}, expected 8, 16 or 32"))
}

fn load_config(args: &ConfigArgs) -> Result<SyncConfig> {
    let file = args
        .config
        .as_ref()
        .map(|path| {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            parse_config(&contents)
        })
        .transpose()
        .context("load config")?;
    resolve_config(file, args.window_pow2, args.no_crc)
}

fn collect_payload_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        entries.push(path);
    }
    entries.sort();
    Ok(entries)
}

fn print_scan_report(report: &ScanReport) {
    if report.frames.is_empty() {
        println!("no sync frame in {} bytes", report.payload_len);
        return;
    }
    for frame in &report.frames {
        println!(
            "offset {}: window_id {} crc16 0x{:04x}",
            frame.offset, frame.window_id, frame.crc16
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{json}");
    Ok(())
}
