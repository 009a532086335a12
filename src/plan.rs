//! Block-plan arithmetic.
//!
//! A [`BlockPlan`] is derived once from the input length and the configured
//! block size, before any worker starts, and is treated as immutable for the
//! rest of the run. It fixes the block count, the exact output-file length,
//! and the claim granularity handed to the work distributor.

use crate::signature::CHECKSUM_SIZE;

/// Immutable description of how an input file maps onto manifest blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlan {
    pub block_size: u64,
    pub block_count: u64,
}

impl BlockPlan {
    /// Builds the plan for an input of `input_len` bytes.
    ///
    /// `block_count` is `ceil(input_len / block_size)`; it is zero exactly
    /// when the input is empty.
    pub fn new(input_len: u64, block_size: u64) -> Self {
        debug_assert!(block_size > 0);
        BlockPlan {
            block_size,
            block_count: input_len.div_ceil(block_size),
        }
    }

    /// Exact length of the manifest file, established before workers start.
    pub fn output_len(&self) -> u64 {
        self.block_count * CHECKSUM_SIZE
    }

    /// Number of workers actually worth spawning for `requested` concurrency.
    ///
    /// More workers than blocks could never all claim even a one-block batch.
    pub fn workers_for(&self, requested: u64) -> u64 {
        requested.min(self.block_count)
    }

    /// Blocks handed out per claim.
    ///
    /// Large enough that one batch read approaches `buffer_capacity` (reads
    /// stay buffer-sized rather than block-sized), but no larger than
    /// `block_count / workers` so every worker gets at least one batch. The
    /// quotient can be zero when blocks are scarce; the floor of 1 keeps the
    /// distributor progressing.
    pub fn claim_step(&self, workers: u64, buffer_capacity: u64) -> u64 {
        let per_read = buffer_capacity / self.block_size;
        let per_worker = self.block_count / workers.max(1);
        per_read.min(per_worker).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_count_rounds_up() {
        assert_eq!(BlockPlan::new(10, 4).block_count, 3);
        assert_eq!(BlockPlan::new(8, 4).block_count, 2);
        assert_eq!(BlockPlan::new(9, 4).block_count, 3);
        assert_eq!(BlockPlan::new(1, 1024).block_count, 1);
    }

    #[test]
    fn empty_input_has_no_blocks() {
        let plan = BlockPlan::new(0, 4096);
        assert_eq!(plan.block_count, 0);
        assert_eq!(plan.output_len(), 0);
    }

    #[test]
    fn output_len_is_four_bytes_per_block() {
        assert_eq!(BlockPlan::new(10, 4).output_len(), 12);
        assert_eq!(BlockPlan::new(1 << 20, 1024).output_len(), 4096);
    }

    #[test]
    fn workers_clamp_to_block_count() {
        let plan = BlockPlan::new(12, 4); // 3 blocks
        assert_eq!(plan.workers_for(8), 3);
        assert_eq!(plan.workers_for(2), 2);
        assert_eq!(plan.workers_for(1), 1);
    }

    #[test]
    fn step_tracks_buffer_capacity() {
        // 1 KiB blocks, 1 MiB buffer: up to 1024 blocks per read, but spread
        // across workers first.
        let plan = BlockPlan::new(8 << 20, 1024); // 8192 blocks
        assert_eq!(plan.claim_step(4, 1 << 20), 1024);
        assert_eq!(plan.claim_step(16, 1 << 20), 512);
    }

    #[test]
    fn step_is_at_least_one() {
        // Block larger than the read buffer.
        let plan = BlockPlan::new(64 << 20, 8 << 20);
        assert_eq!(plan.claim_step(2, 1 << 20), 1);

        // Fewer blocks than workers divides to 0; the floor keeps claims alive.
        let scarce = BlockPlan::new(12, 4); // 3 blocks
        assert_eq!(scarce.claim_step(4, 1 << 20), 1);
        assert_eq!(scarce.claim_step(3, 1 << 20), 1);
    }
}
