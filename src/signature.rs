//! Streaming block-checksum accumulator.
//!
//! [`BlockChecksums`] consumes a byte stream in arbitrarily sized pushes and
//! emits one CRC-32 per completed `block_size` boundary. The caller never has
//! to align its pushes to block boundaries, which lets the I/O layer read in
//! large buffer-capacity chunks (far cheaper than one read per block) while the
//! manifest still gets exactly one checksum per logical block.
//!
//! Blocks are not chained: each checksum depends only on that block's own
//! bytes, so a manifest entry can be recomputed from the block in isolation.

use crc32fast::Hasher as Crc32Hasher;

/// Width of one serialized checksum in the manifest, in bytes.
pub const CHECKSUM_SIZE: u64 = 4;

/// Accumulates per-block CRC-32 checksums from a stream of byte chunks.
///
/// Owned by exactly one worker at a time; [`reset`](Self::reset) prepares an
/// instance for reuse on the next batch.
pub struct BlockChecksums {
    block_size: u64,
    block_remaining: u64,
    hasher: Crc32Hasher,
    // Completed checksums, serialized little-endian in block order.
    output: Vec<u8>,
}

impl BlockChecksums {
    /// Creates an empty accumulator for blocks of `block_size` bytes.
    ///
    /// `block_size` must be positive; the engine validates this before any
    /// accumulator is constructed.
    pub fn new(block_size: u64) -> Self {
        debug_assert!(block_size > 0);
        BlockChecksums {
            block_size,
            block_remaining: block_size,
            hasher: Crc32Hasher::new(),
            output: Vec::new(),
        }
    }

    /// Feeds `data` into the current block, finalizing a checksum every time a
    /// block boundary is crossed. A single call may complete several blocks.
    pub fn push(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let take = self.block_remaining.min(data.len() as u64) as usize;
            self.hasher.update(&data[..take]);
            self.block_remaining -= take as u64;
            data = &data[take..];

            if self.block_remaining == 0 {
                self.complete_block();
            }
        }
    }

    /// Finalizes the trailing block if it received any bytes.
    ///
    /// A partial final block (the file's last, possibly short, block) still
    /// gets a checksum; an untouched block emits nothing, so inputs that are an
    /// exact multiple of the block size produce no spurious empty-block entry.
    pub fn finish_partial(&mut self) {
        if self.block_remaining < self.block_size {
            self.complete_block();
        }
    }

    /// Clears accumulated output and block state for reuse by a new batch.
    pub fn reset(&mut self) {
        self.output.clear();
        self.reset_block();
    }

    /// Serialized checksums produced since the last reset, in block order.
    pub fn bytes(&self) -> &[u8] {
        &self.output
    }

    /// Number of completed checksums since the last reset.
    pub fn count(&self) -> u64 {
        self.output.len() as u64 / CHECKSUM_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    fn complete_block(&mut self) {
        let hasher = std::mem::replace(&mut self.hasher, Crc32Hasher::new());
        self.output.extend_from_slice(&hasher.finalize().to_le_bytes());
        self.block_remaining = self.block_size;
    }

    fn reset_block(&mut self) {
        self.hasher = Crc32Hasher::new();
        self.block_remaining = self.block_size;
    }
}
