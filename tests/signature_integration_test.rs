use blocksig::workers::generate_signature;
use rand::{thread_rng, RngCore};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use tempfile::tempdir;

// ---------- helpers ----------

fn write_input(path: &Path, data: &[u8]) -> File {
    fs::write(path, data).unwrap();
    File::open(path).unwrap()
}

fn open_manifest(path: &Path) -> File {
    OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .unwrap()
}

/// Reference manifest: checksum each block independently, concatenate.
fn expected_manifest(data: &[u8], block_size: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for block in data.chunks(block_size) {
        out.extend_from_slice(&crc32fast::hash(block).to_le_bytes());
    }
    out
}

fn run(data: &[u8], block_size: u64, jobs: usize) -> Vec<u8> {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("input.bin");
    let output_path = dir.path().join("output.sig");

    let input = write_input(&input_path, data);
    let output = open_manifest(&output_path);

    generate_signature(&input, &output, block_size, jobs).unwrap();
    fs::read(&output_path).unwrap()
}

// ---------- tests ----------

#[test]
fn ten_zero_bytes_with_block_size_four() {
    // 3 blocks of 4, 4 and 2 bytes; the manifest is 12 bytes.
    let manifest = run(&[0u8; 10], 4, 1);
    assert_eq!(manifest.len(), 12);
    assert_eq!(&manifest[0..4], &crc32fast::hash(&[0u8; 4]).to_le_bytes());
    assert_eq!(&manifest[4..8], &crc32fast::hash(&[0u8; 4]).to_le_bytes());
    assert_eq!(&manifest[8..12], &crc32fast::hash(&[0u8; 2]).to_le_bytes());
}

#[test]
fn empty_input_produces_empty_manifest() {
    let manifest = run(&[], 4096, 4);
    assert!(manifest.is_empty());
}

#[test]
fn manifest_matches_per_block_reference() {
    let mut rng = thread_rng();
    let mut data = vec![0u8; 123_457];
    rng.fill_bytes(&mut data);

    for block_size in [1usize, 4, 100, 4096, 65536] {
        let manifest = run(&data, block_size as u64, 4);
        assert_eq!(
            manifest,
            expected_manifest(&data, block_size),
            "block_size={block_size}"
        );
    }
}

#[test]
fn manifest_is_identical_across_concurrency_degrees() {
    let mut rng = thread_rng();
    let mut data = vec![0u8; 300_000];
    rng.fill_bytes(&mut data);

    let baseline = run(&data, 1024, 1);
    for jobs in [2usize, 3, 8, 64] {
        assert_eq!(run(&data, 1024, jobs), baseline, "jobs={jobs}");
    }
}

#[test]
fn more_workers_than_blocks_clamps_cleanly() {
    // 3 blocks, 8 requested workers.
    let data = [0xABu8; 12];
    let manifest = run(&data, 4, 8);
    assert_eq!(manifest, expected_manifest(&data, 4));
}

#[test]
fn block_larger_than_read_buffer() {
    // 3 MiB blocks force several 1 MiB reads per block, and a short tail.
    let mut rng = thread_rng();
    let mut data = vec![0u8; (5 << 20) + 123];
    rng.fill_bytes(&mut data);

    let manifest = run(&data, 3 << 20, 2);
    assert_eq!(manifest, expected_manifest(&data, 3 << 20));
}

#[test]
fn rerun_is_idempotent() {
    let mut rng = thread_rng();
    let mut data = vec![0u8; 50_000];
    rng.fill_bytes(&mut data);

    assert_eq!(run(&data, 512, 4), run(&data, 512, 4));
}

#[test]
fn zero_block_size_is_rejected_before_any_io() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("input.bin");
    let output_path = dir.path().join("output.sig");
    let input = write_input(&input_path, b"data");
    let output = open_manifest(&output_path);

    // Pre-existing output content must survive the failed call.
    fs::write(&output_path, b"untouched").unwrap();

    let err = generate_signature(&input, &output, 0, 4).unwrap_err();
    assert!(err.to_string().contains("block size"));
    assert_eq!(fs::read(&output_path).unwrap(), b"untouched");
}

#[test]
fn zero_jobs_is_rejected() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir.path().join("input.bin"), b"data");
    let output = open_manifest(&dir.path().join("output.sig"));

    let err = generate_signature(&input, &output, 4, 0).unwrap_err();
    assert!(err.to_string().contains("jobs"));
}
