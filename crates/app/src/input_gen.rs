//! Symbol stream generation.
//!
//! The stream is drawn from a skewed distribution so the Huffman model has
//! something to exploit: symbol `i` has weight `skew^i`. Every so often a
//! block switches to uniform draws, which keeps rare symbols present.
//!
//! # Design
//!
//! Generated data has:
//! - Mostly skewed blocks (geometric weights, sampled by inverse CDF)
//! - Some uniform blocks (every symbol equally likely)
//!
//! All randomness comes from a seeded `ChaCha8Rng`, so a seed fully
//! determines the stream.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Symbols per generation block.
const BLOCK_LEN: usize = 4096;

/// Generate `count` symbols in `0..alphabet_size`.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `alphabet_size`: number of distinct symbols (must be non-zero)
/// - `count`: stream length
/// - `skew`: weight ratio between neighbouring symbols, in `(0, 1]`
pub fn generate_symbols(seed: u64, alphabet_size: usize, count: usize, skew: f64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cumulative = cumulative_weights(alphabet_size, skew);
    let mut symbols = Vec::with_capacity(count);

    let mut remaining = count;
    while remaining > 0 {
        let block = remaining.min(BLOCK_LEN);

        // 10% uniform blocks, the rest skewed
        if rng.gen_range(0..10) == 0 {
            for _ in 0..block {
                symbols.push(rng.gen_range(0..alphabet_size) as u32);
            }
        } else {
            for _ in 0..block {
                let r: f64 = rng.gen();
                let index = cumulative.partition_point(|&c| c <= r);
                symbols.push(index.min(alphabet_size - 1) as u32);
            }
        }

        remaining -= block;
    }

    symbols
}

/// Normalized cumulative weights of `skew^i`, last entry 1.0.
fn cumulative_weights(alphabet_size: usize, skew: f64) -> Vec<f64> {
    let mut weight = 1.0;
    let mut total = 0.0;
    let mut cumulative = Vec::with_capacity(alphabet_size);
    for _ in 0..alphabet_size {
        total += weight;
        cumulative.push(total);
        weight *= skew;
    }
    for c in &mut cumulative {
        *c /= total;
    }
    cumulative
}

/// Count occurrences of every symbol, adding one to each count.
///
/// The extra count keeps every symbol of the alphabet codable and bounds
/// how deep rare symbols can sink in the tree.
pub fn smoothed_frequencies(symbols: &[u32], alphabet_size: usize) -> Vec<u64> {
    let mut freqs = vec![1u64; alphabet_size];
    for &s in symbols {
        freqs[s as usize] += 1;
    }
    freqs
}
