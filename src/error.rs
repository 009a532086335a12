use std::io;

use thiserror::Error;

/// The primary error type for all signature operations in the `blocksig` crate.
///
/// Transient conditions (interrupted syscalls, partial reads and writes) are
/// retried inside [`crate::fsx`] and never surface here.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// A caller-supplied parameter was rejected before any I/O took place.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An I/O operation failed for a reason other than interruption.
    /// Carries the name of the failing operation and the underlying OS error.
    #[error("{op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

impl SignatureError {
    /// Wraps an OS error with the name of the operation that raised it.
    pub fn io(op: &'static str, source: io::Error) -> Self {
        SignatureError::Io { op, source }
    }
}
