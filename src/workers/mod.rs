//! Parallel signature engine.
//!
//! Work is pulled, not pushed: a shared [`BatchCounter`] hands out disjoint,
//! contiguous runs of block indices to whichever worker asks next, with a
//! single atomic fetch-and-add as the only synchronization point between
//! threads. Every worker owns a private accumulator and read buffer, streams
//! its claimed input region through [`BlockChecksums`], and performs exactly
//! one positional manifest write per batch. Output regions never overlap
//! because batch ranges are disjoint by construction, so the manifest needs no
//! locking regardless of completion order.

use std::fs::File;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::bounded;
use tracing::{debug, trace};

use crate::error::SignatureError;
use crate::fsx;
use crate::plan::BlockPlan;
use crate::signature::{BlockChecksums, CHECKSUM_SIZE};

/// Capacity of each worker's read buffer.
pub const READ_BUF_SIZE: usize = 1 << 20; // 1 MiB

/// A contiguous run of block indices owned exclusively by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub start: u64,
    pub len: u64,
}

/// Work distributor: hands out batches of `step` blocks until `block_count`
/// is exhausted.
///
/// The counter only transfers index values between threads, never data, so
/// relaxed ordering suffices.
pub struct BatchCounter {
    next: AtomicU64,
    block_count: u64,
    step: u64,
}

impl BatchCounter {
    pub fn new(block_count: u64, step: u64) -> Self {
        debug_assert!(step > 0);
        BatchCounter {
            next: AtomicU64::new(0),
            block_count,
            step,
        }
    }

    /// Claims the next unprocessed batch, or `None` once all blocks are taken.
    ///
    /// Claims never block and never retry; each returns a strictly increasing
    /// start index, so two claims can never overlap.
    pub fn claim(&self) -> Option<Batch> {
        let start = self.next.fetch_add(self.step, Ordering::Relaxed);
        if start >= self.block_count {
            return None;
        }
        Some(Batch {
            start,
            len: self.step.min(self.block_count - start),
        })
    }
}

/// One worker: drain the distributor, producing manifest output for every
/// claimed batch. Runs to completion or until the first error.
fn run_worker(
    input: &File,
    output: &File,
    plan: &BlockPlan,
    counter: &BatchCounter,
) -> Result<(), SignatureError> {
    let mut acc = BlockChecksums::new(plan.block_size);
    let mut buf = vec![0u8; READ_BUF_SIZE];

    while let Some(batch) = counter.claim() {
        trace!(start = batch.start, len = batch.len, "claimed batch");
        acc.reset();

        let mut offset = batch.start * plan.block_size;
        let mut remaining = batch.len * plan.block_size;

        while remaining > 0 {
            let want = remaining.min(buf.len() as u64) as usize;
            let n = fsx::read_at(input, &mut buf[..want], offset)
                .map_err(|e| SignatureError::io("read input", e))?;
            if n == 0 {
                // End of file; the final block of this batch may be short.
                break;
            }
            acc.push(&buf[..n]);
            offset += n as u64;
            remaining -= n as u64;
        }

        acc.finish_partial();

        // Zero checksums can only mean the input shrank below the length
        // observed at planning time; the manifest region keeps the bytes
        // resize_file initialized it to.
        if !acc.is_empty() {
            fsx::write_at(output, acc.bytes(), batch.start * CHECKSUM_SIZE)
                .map_err(|e| SignatureError::io("write manifest", e))?;
        }
    }

    Ok(())
}

/// Generates the block-checksum manifest of `input` into `output`.
///
/// Partitions the input into `block_size`-byte blocks, resizes `output` to
/// exactly `block_count * 4` bytes, then computes one little-endian CRC-32 per
/// block across up to `jobs` worker threads. Byte range `[i*4, i*4+4)` of the
/// manifest holds the checksum of input bytes
/// `[i*block_size, min((i+1)*block_size, input_len))`.
///
/// All spawned workers are joined before this returns, even when one of them
/// has already failed; the first error in worker-start order is the one
/// reported. On failure the manifest is not authoritative: it may mix valid
/// checksums with regions no worker reached.
pub fn generate_signature(
    input: &File,
    output: &File,
    block_size: u64,
    jobs: usize,
) -> Result<(), SignatureError> {
    if block_size == 0 {
        return Err(SignatureError::InvalidArgument("block size must be positive"));
    }
    if jobs == 0 {
        return Err(SignatureError::InvalidArgument("jobs must be positive"));
    }

    let input_len = fsx::file_len(input).map_err(|e| SignatureError::io("query input length", e))?;
    let plan = BlockPlan::new(input_len, block_size);

    fsx::resize_file(output, plan.output_len())
        .map_err(|e| SignatureError::io("resize output", e))?;

    if plan.block_count == 0 {
        return Ok(());
    }

    let workers = plan.workers_for(jobs as u64) as usize;
    let step = plan.claim_step(workers as u64, READ_BUF_SIZE as u64);
    let counter = BatchCounter::new(plan.block_count, step);

    debug!(
        input_len,
        block_count = plan.block_count,
        step,
        workers,
        "starting signature run"
    );

    // Each worker reports exactly one result, tagged with its spawn index;
    // the channel can therefore never block a sender.
    let (tx, rx) = bounded::<(usize, Result<(), SignatureError>)>(workers);

    thread::scope(|s| {
        for worker_id in 0..workers {
            let tx = tx.clone();
            let counter = &counter;
            let plan = &plan;
            s.spawn(move || {
                let result = run_worker(input, output, plan, counter);
                let _ = tx.send((worker_id, result));
            });
        }
        // The scope joins every worker before returning, failed siblings
        // included.
    });
    drop(tx);

    let mut results: Vec<Option<Result<(), SignatureError>>> =
        (0..workers).map(|_| None).collect();
    for (worker_id, result) in rx.try_iter() {
        results[worker_id] = Some(result);
    }

    for result in results.into_iter().flatten() {
        result?;
    }

    Ok(())
}
