//! Static Huffman models compiled from a fixed frequency table.
//!
//! A [`HuffmanModel`] is two flat tables built once by
//! [`HuffmanModelBuilder`]:
//!
//! - The decode table holds the code tree in pre-order (first child first),
//!   `2N - 1` entries long. A positive entry is an internal node whose value
//!   is the distance to its second child; its first child is the next entry.
//!   A non-positive entry is a leaf holding the negated symbol.
//! - The encode table holds one path word per symbol: the code bits from the
//!   root, least significant bit first, followed by a single sentinel bit. A
//!   path word of `1` is an exhausted (or empty) code.
//!
//! [`HuffmanReader`] and [`HuffmanWriter`] walk those tables one bit at a
//! time. The model itself is immutable after compilation and can be shared
//! between any number of readers and writers.
//!
//! # Example
//! ```
//! use huffbits_core::huffman::HuffmanModel;
//!
//! let model = HuffmanModel::from_frequencies(&[5, 2, 1, 1]).unwrap();
//! assert_eq!(model.code_length(0), 1);
//! assert_eq!(model.code_length(1), 2);
//! assert_eq!(model.code_length(2), 3);
//! assert_eq!(model.weighted_cost(&[5, 2, 1, 1]), 12);
//!
//! let mut writer = model.writer(2);
//! let mut reader = model.reader();
//! while writer.has_bit() {
//!     reader.recv_bit(writer.get_bit());
//!     writer.next_bit();
//! }
//! assert!(!reader.needs_bit());
//! assert_eq!(reader.get_result(), 2);
//! ```

mod builder;
mod cursor;

pub use builder::HuffmanModelBuilder;
pub use cursor::{HuffmanReader, HuffmanWriter};

use crate::error::Result;

/// Integer type holding a sentinel-terminated code path.
pub type PathWord = u32;

/// Longest representable code: the sentinel needs one bit above the code.
pub const MAX_CODE_LENGTH: u32 = PathWord::BITS - 1;

/// Largest alphabet whose skip distances and symbols fit in `i32` entries.
pub const MAX_OUTPUTS: usize = 1 << 30;

/// A compiled static Huffman model for an alphabet of `outputs()` symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanModel {
    decode_table: Box<[i32]>,
    encode_table: Box<[PathWord]>,
}

impl HuffmanModel {
    /// Start building a model for symbols `0..outputs`.
    pub fn builder(outputs: usize) -> HuffmanModelBuilder {
        HuffmanModelBuilder::new(outputs)
    }

    /// Compile a model where symbol `i` has frequency `freqs[i]`.
    pub fn from_frequencies(freqs: &[u64]) -> Result<Self> {
        let mut builder = HuffmanModelBuilder::new(freqs.len());
        for (symbol, &freq) in freqs.iter().enumerate() {
            builder.add_output(symbol as u32, freq)?;
        }
        builder.compile()
    }

    pub(crate) fn from_tables(decode_table: Vec<i32>, encode_table: Vec<PathWord>) -> Self {
        debug_assert_eq!(decode_table.len(), 2 * encode_table.len() - 1);
        Self {
            decode_table: decode_table.into_boxed_slice(),
            encode_table: encode_table.into_boxed_slice(),
        }
    }

    /// Number of symbols in the alphabet.
    pub fn outputs(&self) -> usize {
        self.encode_table.len()
    }

    /// Flattened pre-order code tree (`2N - 1` entries).
    pub fn decode_table(&self) -> &[i32] {
        &self.decode_table
    }

    /// Sentinel-terminated path word per symbol.
    pub fn encode_table(&self) -> &[PathWord] {
        &self.encode_table
    }

    /// Decode cursor positioned at the root.
    pub fn reader(&self) -> HuffmanReader<'_> {
        HuffmanReader::new(self)
    }

    /// Encode cursor holding the code for `symbol`.
    ///
    /// # Panics
    /// If `symbol >= outputs()`.
    pub fn writer(&self, symbol: u32) -> HuffmanWriter {
        HuffmanWriter::new(self, symbol)
    }

    /// Code length of `symbol` in bits.
    ///
    /// # Panics
    /// If `symbol >= outputs()`.
    pub fn code_length(&self, symbol: u32) -> u32 {
        path_length(self.encode_table[symbol as usize])
    }

    /// Length of the longest code in the model.
    pub fn max_code_length(&self) -> u32 {
        self.encode_table
            .iter()
            .map(|&path| path_length(path))
            .max()
            .unwrap_or(0)
    }

    /// Total bits needed to encode every symbol `freqs[s]` times.
    ///
    /// Frequencies beyond the alphabet are ignored. Saturates at `u64::MAX`.
    pub fn weighted_cost(&self, freqs: &[u64]) -> u64 {
        freqs
            .iter()
            .zip(self.encode_table.iter())
            .map(|(&freq, &path)| freq.saturating_mul(u64::from(path_length(path))))
            .fold(0u64, u64::saturating_add)
    }
}

/// Number of code bits below the sentinel.
#[inline]
pub(crate) fn path_length(path: PathWord) -> u32 {
    debug_assert!(path != 0, "path word is missing its sentinel");
    PathWord::BITS - 1 - path.leading_zeros()
}
