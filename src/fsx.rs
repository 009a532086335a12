//! Positional filesystem wrapper.
//!
//! Every operation here takes an explicit byte offset and never touches the
//! file cursor, so a single `File` can be shared by all worker threads without
//! a descriptor-level lock. On Unix the implementation sits directly on
//! `pread`/`pwrite` via [`std::os::unix::fs::FileExt`]. On Windows the
//! `seek_read`/`seek_write` equivalents are used; they move the cursor as a
//! side effect, which is harmless because no caller in this crate ever reads
//! through the cursor.
//!
//! Interrupted syscalls are retried internally and short reads/writes are
//! resumed at the advanced offset, so callers see either the full requested
//! transfer (short reads only at end-of-file) or an error.

use std::fs::File;
use std::io;

#[cfg(unix)]
use std::os::unix::fs::FileExt;
#[cfg(windows)]
use std::os::windows::fs::FileExt;

#[cfg(unix)]
fn read_at_once(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    file.read_at(buf, offset)
}

#[cfg(unix)]
fn write_at_once(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    file.write_at(buf, offset)
}

#[cfg(windows)]
fn read_at_once(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    file.seek_read(buf, offset)
}

#[cfg(windows)]
fn write_at_once(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    file.seek_write(buf, offset)
}

/// Reads up to `buf.len()` bytes starting at `offset`.
///
/// Retries on interruption and resumes short reads, so the returned count is
/// less than `buf.len()` only when end-of-file was reached.
pub fn read_at(file: &File, buf: &mut [u8], mut offset: u64) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match read_at_once(file, &mut buf[filled..], offset) {
            Ok(0) => break,
            Ok(n) => {
                filled += n;
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

/// Writes all of `buf` starting at `offset`, advancing past partial writes and
/// retrying on interruption.
pub fn write_at(file: &File, mut buf: &[u8], mut offset: u64) -> io::Result<()> {
    while !buf.is_empty() {
        match write_at_once(file, buf, offset) {
            Ok(0) => return Err(io::Error::new(io::ErrorKind::WriteZero, "pwrite returned 0")),
            Ok(n) => {
                buf = &buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

/// Sets the file to exactly `len` bytes, truncating or zero-extending.
pub fn resize_file(file: &File, len: u64) -> io::Result<()> {
    file.set_len(len)
}

/// Queries the current length of the file.
pub fn file_len(file: &File) -> io::Result<u64> {
    Ok(file.metadata()?.len())
}
