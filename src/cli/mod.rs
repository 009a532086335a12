use clap::Parser;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The input file to compute a signature of.
    #[arg(required = true)]
    pub input: PathBuf,

    /// The path for the output manifest file.
    #[arg(required = true)]
    pub output: PathBuf,

    /// Block size in bytes. Accepts a power-of-two suffix: k/K (KiB), m/M (MiB), g/G (GiB).
    #[arg(short, long, default_value = "1m", value_parser = parse_block_size)]
    pub block_size: u64,

    /// Number of parallel worker threads. [0 = auto-detect based on CPU cores]
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}

/// Parses a human-readable size such as `4096`, `64k` or `1M` into bytes.
///
/// Suffixes are binary powers of two (k = 2^10, m = 2^20, g = 2^30); a value
/// whose product overflows `u64` is rejected rather than wrapped.
pub fn parse_block_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let (digits, shift) = match s.as_bytes().last() {
        Some(b'k') | Some(b'K') => (&s[..s.len() - 1], 10),
        Some(b'm') | Some(b'M') => (&s[..s.len() - 1], 20),
        Some(b'g') | Some(b'G') => (&s[..s.len() - 1], 30),
        _ => (s, 0),
    };

    let number: u64 = digits
        .parse()
        .map_err(|_| format!("invalid size '{s}'"))?;

    number
        .checked_mul(1u64 << shift)
        .ok_or_else(|| format!("size '{s}' overflows"))
}

/// Opens the input file read-only.
pub fn open_input(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Opens (or creates) the output manifest read-write.
///
/// The file is deliberately not truncated here; the engine resizes it to the
/// exact manifest length before any worker writes.
pub fn open_output(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create(true).open(path)
}

/// Parses command-line arguments using `clap` and returns them to `main`.
///
/// Invalid arguments, `--help` and `--version` terminate the process here with
/// clap's own rendering and exit codes.
pub fn run() -> Args {
    Args::parse()
}
