//! huffbits-core: static Huffman coding over flat word buffers
//!
//! This library provides:
//! - Static Huffman models compiled once from a fixed frequency table
//! - One-bit-at-a-time decode/encode cursors over those models
//! - Bit cursors that pack codes and raw fixed-width integers LSB-first into
//!   caller-owned word buffers
//!
//! # Architecture
//!
//! - `word`: unsigned integer types addressable bit by bit
//! - `huffman`: model builder, flattened model tables, reader/writer cursors
//! - `bitio`: `BitReader`/`BitWriter` over `&[W]` / `&mut [W]`
//! - `metrics`: observable numbers for one encode/decode pass
//! - `error`: structured errors for model compilation and checked cursor ops
//!
//! # Design Principles
//!
//! - **Build once, share freely**: a compiled `HuffmanModel` is immutable;
//!   all mutable state lives in short-lived cursors
//! - **No allocation while coding**: the caller sizes the buffer up front
//!   and reads the consumed extent back from the cursor
//! - **Assertions on the hot path**: protocol misuse and overruns panic;
//!   the `try_*` cursor operations return errors instead
//! - **Deterministic**: the same frequency table always yields the same model

pub mod bitio;
pub mod error;
pub mod huffman;
pub mod metrics;
pub mod word;

// Re-export commonly used types
pub use bitio::{BitPosition, BitReader, BitWriter};
pub use error::{Error, Result};
pub use huffman::{HuffmanModel, HuffmanModelBuilder, HuffmanReader, HuffmanWriter};
pub use word::BitWord;
