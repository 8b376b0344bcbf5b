//! Error types for huffbits.
//!
//! The encode/decode hot path is assertion-only: protocol misuse and buffer
//! overruns panic. The types here cover the places where a host wants a
//! structured error instead: model compilation and the `try_*` cursor
//! operations.

use thiserror::Error;

/// Top-level error type.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to a word buffer
/// - Huffman: model construction
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman model error (e.g., duplicate symbol, code too long)
    #[error("huffman model error: {0}")]
    Huffman(#[from] HuffmanError),
}

/// Bit-level I/O errors reported by the checked cursor operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read or write past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Requested more bits than the buffer has left
    #[error("insufficient bits: requested {requested}, available {available}")]
    InsufficientBits { requested: usize, available: usize },

    /// Bit count wider than the destination integer type
    #[error("invalid bit count {bits} for a {width}-bit integer")]
    InvalidBitCount { bits: u32, width: u32 },
}

/// Huffman model construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    /// Alphabet has no symbols (cannot build a tree)
    #[error("empty alphabet: cannot build a model with zero outputs")]
    EmptyAlphabet,

    /// Alphabet is too large for the signed decode table entries
    #[error("alphabet of {outputs} symbols exceeds maximum {max}")]
    AlphabetTooLarge { outputs: usize, max: usize },

    /// Symbol id is not in `[0, outputs)`
    #[error("symbol {symbol} out of range for alphabet of {outputs}")]
    SymbolOutOfRange { symbol: u32, outputs: usize },

    /// Symbol id registered more than once
    #[error("duplicate symbol {symbol}")]
    DuplicateSymbol { symbol: u32 },

    /// `compile` called before every symbol was registered
    #[error("expected {expected} outputs, got {actual}")]
    OutputCountMismatch { expected: usize, actual: usize },

    /// Code length does not fit in a path word next to its sentinel bit
    #[error("code length {length} for symbol {symbol} exceeds maximum {max}")]
    CodeLengthTooLong { symbol: u32, length: u32, max: u32 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
