//! One-bit-at-a-time decode and encode cursors over a compiled model.
//!
//! Both cursors follow a strict protocol; calling out of order is a bug in
//! the caller and trips a debug assertion.
//!
//! Decoding:
//! ```text
//! while reader.needs_bit() { reader.recv_bit(next_bit) }
//! reader.get_result()
//! ```
//!
//! Encoding:
//! ```text
//! while writer.has_bit() { emit(writer.get_bit()); writer.next_bit() }
//! ```

use super::{path_length, HuffmanModel, PathWord};

/// Walks the decode table from the root towards a leaf.
#[derive(Debug, Clone)]
pub struct HuffmanReader<'m> {
    table: &'m [i32],
    index: usize,
}

impl<'m> HuffmanReader<'m> {
    /// Reader positioned at the root of `model`.
    pub fn new(model: &'m HuffmanModel) -> Self {
        Self {
            table: model.decode_table(),
            index: 0,
        }
    }

    /// True while the current node is internal.
    #[inline]
    pub fn needs_bit(&self) -> bool {
        self.table[self.index] > 0
    }

    /// Descend into the first (`false`) or second (`true`) child.
    #[inline]
    pub fn recv_bit(&mut self, bit: bool) {
        debug_assert!(self.needs_bit(), "recv_bit called on a resolved reader");
        self.index += if bit {
            self.table[self.index] as usize
        } else {
            1
        };
    }

    /// Decoded symbol. Only meaningful once `needs_bit()` is false.
    #[inline]
    pub fn get_result(&self) -> u32 {
        debug_assert!(!self.needs_bit(), "get_result called before reaching a leaf");
        self.table[self.index].unsigned_abs()
    }
}

/// Shifts out the code bits of one symbol, root first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanWriter {
    path: PathWord,
}

impl HuffmanWriter {
    /// Writer holding the code for `symbol`.
    ///
    /// # Panics
    /// If `symbol >= model.outputs()`.
    pub fn new(model: &HuffmanModel, symbol: u32) -> Self {
        Self {
            path: model.encode_table()[symbol as usize],
        }
    }

    /// True until only the sentinel is left.
    #[inline]
    pub fn has_bit(&self) -> bool {
        debug_assert!(self.path >= 1, "path word lost its sentinel");
        self.path != 1
    }

    /// The next code bit.
    #[inline]
    pub fn get_bit(&self) -> bool {
        debug_assert!(self.has_bit(), "get_bit called on an exhausted writer");
        self.path & 1 == 1
    }

    #[inline]
    pub fn next_bit(&mut self) {
        debug_assert!(self.has_bit(), "next_bit called on an exhausted writer");
        self.path >>= 1;
    }

    /// Code bits not yet shifted out.
    #[inline]
    pub fn bits_left(&self) -> u32 {
        path_length(self.path)
    }

    /// The remaining path word, sentinel included.
    #[inline]
    pub fn remaining_path(&self) -> PathWord {
        self.path
    }
}
