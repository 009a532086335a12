//! # blocksig Core Library
//!
//! This crate provides the core functionality for the `blocksig` signature
//! generator.
//!
//! It is designed to be used by the `blocksig` command-line application, but its
//! public API can also be used to programmatically produce block-checksum
//! manifests: flat binary files holding one 4-byte CRC-32 per fixed-size block
//! of an input file, in block order. Such manifests are the signature side of
//! block-level diffing/sync protocols.
//!
//! ## Key Modules
//!
//! - [`signature`]: The streaming accumulator that turns an arbitrarily chunked
//!   byte stream into per-block checksums.
//! - [`plan`]: Block-plan arithmetic (block count, output size, claim step).
//! - [`workers`]: The parallel engine: work distribution across OS threads and
//!   the [`workers::generate_signature`] entry point.
//! - [`fsx`]: Retrying positional file I/O shared by all workers.

pub mod cli;
pub mod error;
pub use error::SignatureError;

pub mod workers;

pub mod plan;
pub mod signature;

// Positional filesystem wrapper
pub mod fsx;
