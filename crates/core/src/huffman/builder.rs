//! Greedy merge and tree flattening.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use super::{HuffmanModel, PathWord, MAX_CODE_LENGTH, MAX_OUTPUTS};
use crate::error::{HuffmanError, Result};

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Leaf { symbol: u32 },
    Branch { children: [usize; 2] },
}

/// Node of the transient merge tree, addressed by its index in the arena.
#[derive(Debug, Clone, Copy)]
struct MergeNode {
    freq: u64,
    /// Leaves in this subtree; a subtree of `n` leaves spans `2n - 1`
    /// decode table entries.
    leaves: usize,
    kind: NodeKind,
}

/// Accumulates `(symbol, frequency)` pairs and compiles a [`HuffmanModel`].
///
/// Every symbol in `0..outputs` must be registered exactly once before
/// [`compile`](Self::compile).
///
/// # Tie-breaking
/// The merge always takes the two lowest frequencies. Among equal
/// frequencies the node created first wins: leaves in registration order,
/// then merged nodes in the order they were created. The first node taken
/// becomes the 0 branch. Rebuilding from the same registrations therefore
/// yields the same model.
#[derive(Debug, Clone)]
pub struct HuffmanModelBuilder {
    outputs: usize,
    nodes: Vec<MergeNode>,
    registered: Vec<bool>,
}

impl HuffmanModelBuilder {
    /// Create a builder for an alphabet of `outputs` symbols.
    ///
    /// Nothing is reserved for an alphabet above `MAX_OUTPUTS`; such a
    /// builder rejects every registration and fails to compile.
    pub fn new(outputs: usize) -> Self {
        let reserved = if outputs <= MAX_OUTPUTS { outputs } else { 0 };
        Self {
            outputs,
            nodes: Vec::with_capacity((2 * reserved).saturating_sub(1)),
            registered: vec![false; reserved],
        }
    }

    /// Register `symbol` with weight `freq`.
    ///
    /// # Errors
    /// - `HuffmanError::SymbolOutOfRange` if `symbol >= outputs`
    /// - `HuffmanError::DuplicateSymbol` if `symbol` was already registered
    /// - `HuffmanError::AlphabetTooLarge` if `outputs > MAX_OUTPUTS`
    pub fn add_output(&mut self, symbol: u32, freq: u64) -> Result<()> {
        if symbol as usize >= self.outputs {
            return Err(HuffmanError::SymbolOutOfRange {
                symbol,
                outputs: self.outputs,
            }
            .into());
        }
        let Some(slot) = self.registered.get_mut(symbol as usize) else {
            return Err(HuffmanError::AlphabetTooLarge {
                outputs: self.outputs,
                max: MAX_OUTPUTS,
            }
            .into());
        };

        if *slot {
            return Err(HuffmanError::DuplicateSymbol { symbol }.into());
        }
        *slot = true;

        self.nodes.push(MergeNode {
            freq,
            leaves: 1,
            kind: NodeKind::Leaf { symbol },
        });
        Ok(())
    }

    /// Number of symbols registered so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Alphabet size this builder was created for.
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Merge the registered symbols into a code tree and flatten it.
    ///
    /// # Errors
    /// - `HuffmanError::EmptyAlphabet` if the alphabet has no symbols
    /// - `HuffmanError::AlphabetTooLarge` if `outputs > MAX_OUTPUTS`
    /// - `HuffmanError::OutputCountMismatch` if not every symbol was registered
    /// - `HuffmanError::CodeLengthTooLong` if a code exceeds `MAX_CODE_LENGTH`
    pub fn compile(mut self) -> Result<HuffmanModel> {
        if self.outputs == 0 {
            return Err(HuffmanError::EmptyAlphabet.into());
        }
        if self.outputs > MAX_OUTPUTS {
            return Err(HuffmanError::AlphabetTooLarge {
                outputs: self.outputs,
                max: MAX_OUTPUTS,
            }
            .into());
        }
        if self.nodes.len() != self.outputs {
            return Err(HuffmanError::OutputCountMismatch {
                expected: self.outputs,
                actual: self.nodes.len(),
            }
            .into());
        }

        let root = self.merge().ok_or(HuffmanError::EmptyAlphabet)?;
        debug_assert_eq!(self.nodes.len(), 2 * self.outputs - 1);

        let model = self.flatten(root)?;
        debug!(
            outputs = model.outputs(),
            max_code_length = model.max_code_length(),
            "compiled huffman model"
        );
        Ok(model)
    }

    /// Repeatedly merge the two lightest nodes. Returns the root index.
    fn merge(&mut self) -> Option<usize> {
        let mut queue: BinaryHeap<Reverse<(u64, usize)>> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| Reverse((node.freq, index)))
            .collect();

        while let Some(Reverse((first_freq, first))) = queue.pop() {
            let Some(Reverse((second_freq, second))) = queue.pop() else {
                return Some(first);
            };

            let freq = first_freq.saturating_add(second_freq);
            let index = self.nodes.len();
            let leaves = self.nodes[first].leaves + self.nodes[second].leaves;
            trace!(first, second, freq, index, "merged nodes");

            self.nodes.push(MergeNode {
                freq,
                leaves,
                kind: NodeKind::Branch {
                    children: [first, second],
                },
            });
            queue.push(Reverse((freq, index)));
        }

        None
    }

    /// Walk the tree in pre-order, filling both tables.
    fn flatten(&self, root: usize) -> Result<HuffmanModel> {
        let mut decode_table = vec![0i32; 2 * self.outputs - 1];
        let mut encode_table: Vec<PathWord> = vec![0; self.outputs];

        // (node, path bits so far, depth). Second children are pushed first
        // so the first child is visited immediately after its parent.
        let mut stack: Vec<(usize, PathWord, u32)> = vec![(root, 0, 0)];
        let mut position = 0usize;

        while let Some((index, path, depth)) = stack.pop() {
            let node = &self.nodes[index];
            match node.kind {
                NodeKind::Branch {
                    children: [first, second],
                } => {
                    // The first child's subtree sits between this entry and
                    // the second child.
                    let skip = 2 * self.nodes[first].leaves;
                    decode_table[position] =
                        i32::try_from(skip).map_err(|_| HuffmanError::AlphabetTooLarge {
                            outputs: self.outputs,
                            max: MAX_OUTPUTS,
                        })?;

                    stack.push((second, set_path_bit(path, depth), depth + 1));
                    stack.push((first, path, depth + 1));
                }
                NodeKind::Leaf { symbol } => {
                    if depth > MAX_CODE_LENGTH {
                        return Err(HuffmanError::CodeLengthTooLong {
                            symbol,
                            length: depth,
                            max: MAX_CODE_LENGTH,
                        }
                        .into());
                    }
                    // symbol < MAX_OUTPUTS, so the negation fits
                    decode_table[position] = -(symbol as i32);
                    encode_table[symbol as usize] = path | (1 << depth);
                }
            }
            position += 1;
        }

        debug_assert_eq!(position, decode_table.len());
        Ok(HuffmanModel::from_tables(decode_table, encode_table))
    }
}

/// Set the code bit at `depth`; bits past the path word are dropped and the
/// leaf underneath is rejected as too long.
#[inline]
fn set_path_bit(path: PathWord, depth: u32) -> PathWord {
    if depth < PathWord::BITS {
        path | (1 << depth)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_add_output_any_order() {
        let mut builder = HuffmanModelBuilder::new(4);
        builder.add_output(3, 1).unwrap();
        builder.add_output(0, 5).unwrap();
        builder.add_output(2, 1).unwrap();
        builder.add_output(1, 2).unwrap();
        assert_eq!(builder.len(), 4);

        let model = builder.compile().unwrap();
        assert_eq!(model.code_length(0), 1);
        assert_eq!(model.code_length(1), 2);
        assert_eq!(model.code_length(2), 3);
        assert_eq!(model.code_length(3), 3);
    }

    #[test]
    fn test_duplicate_symbol() {
        let mut builder = HuffmanModelBuilder::new(3);
        builder.add_output(1, 10).unwrap();
        let result = builder.add_output(1, 4);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::DuplicateSymbol { symbol: 1 }))
        ));
    }

    #[test]
    fn test_symbol_out_of_range() {
        let mut builder = HuffmanModelBuilder::new(3);
        let result = builder.add_output(3, 1);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::SymbolOutOfRange {
                symbol: 3,
                outputs: 3
            }))
        ));
    }

    #[test]
    fn test_missing_outputs() {
        let mut builder = HuffmanModelBuilder::new(3);
        builder.add_output(0, 1).unwrap();
        builder.add_output(2, 1).unwrap();
        let result = builder.compile();
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::OutputCountMismatch {
                expected: 3,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_empty_alphabet() {
        let builder = HuffmanModelBuilder::new(0);
        assert!(builder.is_empty());
        assert!(matches!(
            builder.compile(),
            Err(Error::Huffman(HuffmanError::EmptyAlphabet))
        ));
    }

    #[test]
    fn test_alphabet_too_large() {
        let mut builder = HuffmanModelBuilder::new(MAX_OUTPUTS + 1);
        assert!(matches!(
            builder.add_output(0, 1),
            Err(Error::Huffman(HuffmanError::AlphabetTooLarge { .. }))
        ));
        assert!(builder.is_empty());

        let result = HuffmanModelBuilder::new(MAX_OUTPUTS + 1).compile();
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::AlphabetTooLarge {
                outputs,
                max: MAX_OUTPUTS,
            })) if outputs == MAX_OUTPUTS + 1
        ));
    }

    #[test]
    fn test_zero_frequencies() {
        let model = HuffmanModel::from_frequencies(&[0, 0, 0, 0]).unwrap();
        for symbol in 0..4 {
            assert_eq!(model.code_length(symbol), 2);
        }
    }

    #[test]
    fn test_fibonacci_depth() {
        // Fibonacci weights produce the deepest possible tree: one new level
        // per symbol.
        let mut freqs = vec![1u64, 1];
        while freqs.len() < 32 {
            let n = freqs.len();
            freqs.push(freqs[n - 1] + freqs[n - 2]);
        }
        let model = HuffmanModel::from_frequencies(&freqs).unwrap();
        assert_eq!(model.max_code_length(), MAX_CODE_LENGTH);

        freqs.push(freqs[31] + freqs[30]);
        let result = HuffmanModel::from_frequencies(&freqs);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::CodeLengthTooLong {
                length: 32,
                max: 31,
                ..
            }))
        ));
    }

    #[test]
    fn test_merge_order_scenario() {
        let mut builder = HuffmanModelBuilder::new(4);
        for (symbol, freq) in [(0, 5), (1, 2), (2, 1), (3, 1)] {
            builder.add_output(symbol, freq).unwrap();
        }

        let root = builder.merge().unwrap();
        let freqs: Vec<u64> = builder.nodes[4..].iter().map(|n| n.freq).collect();
        assert_eq!(freqs, vec![2, 4, 9]);
        assert_eq!(root, 6);

        // C+D, then B with {C,D}, then {B,C,D} with A
        assert!(matches!(
            builder.nodes[4].kind,
            NodeKind::Branch { children: [2, 3] }
        ));
        assert!(matches!(
            builder.nodes[5].kind,
            NodeKind::Branch { children: [1, 4] }
        ));
        assert!(matches!(
            builder.nodes[6].kind,
            NodeKind::Branch { children: [5, 0] }
        ));
    }
}
