//! Metrics for one encode/decode pass.
//!
//! Tracks what went into the buffer, how much of it was used, and how close
//! the model came to the entropy of the frequency table it was built from.
//!
//! # Thread Safety
//!
//! `CodecMetrics` is a plain struct filled in by the single thread driving
//! a pass. Merge per-thread instances at the end if passes run in parallel.

use std::time::{Duration, Instant};

/// Counters and sizes for a single pass over one buffer.
#[derive(Debug, Clone)]
pub struct CodecMetrics {
    // === Timing ===
    /// When the pass started
    pub start_time: Instant,

    /// When the pass ended (set on completion)
    pub end_time: Option<Instant>,

    // === Model ===
    /// Symbols in the alphabet
    pub alphabet_size: usize,

    /// Longest code in the model
    pub max_code_length: u32,

    /// Shannon entropy of the frequency table, in bits per symbol
    pub entropy_bits: f64,

    // === Encoding ===
    /// Huffman-coded symbols written
    pub symbols_encoded: u64,

    /// Bits spent on Huffman codes
    pub symbol_bits: u64,

    /// Raw fixed-width fields written
    pub raw_fields: u64,

    /// Bits spent on raw fields
    pub raw_bits: u64,

    // === Buffer ===
    /// Width of one buffer word
    pub word_bits: u32,

    /// Words allocated up front
    pub words_allocated: u64,

    /// Words actually touched
    pub words_used: u64,

    // === Decoding ===
    /// Symbols read back
    pub symbols_decoded: u64,

    /// Decoded symbols that did not match the input
    pub mismatches: u64,
}

impl CodecMetrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            alphabet_size: 0,
            max_code_length: 0,
            entropy_bits: 0.0,
            symbols_encoded: 0,
            symbol_bits: 0,
            raw_fields: 0,
            raw_bits: 0,
            word_bits: 0,
            words_allocated: 0,
            words_used: 0,
            symbols_decoded: 0,
            mismatches: 0,
        }
    }

    /// Mark the pass as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Total payload bits (codes plus raw fields).
    pub fn total_bits(&self) -> u64 {
        self.symbol_bits + self.raw_bits
    }

    /// Average code length in bits per symbol.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols_encoded == 0 {
            0.0
        } else {
            self.symbol_bits as f64 / self.symbols_encoded as f64
        }
    }

    /// Bits of a fixed-width code that can represent every symbol.
    pub fn fixed_width_bits(&self) -> u32 {
        match self.alphabet_size {
            0 | 1 => 0,
            n => usize::BITS - (n - 1).leading_zeros(),
        }
    }

    /// Huffman bits relative to a fixed-width encoding of the same symbols.
    ///
    /// Returns 0.0 if nothing was encoded or the alphabet needs no bits.
    pub fn compression_ratio(&self) -> f64 {
        let fixed = self.symbols_encoded * u64::from(self.fixed_width_bits());
        if fixed == 0 {
            0.0
        } else {
            self.symbol_bits as f64 / fixed as f64
        }
    }

    /// Entropy divided by the average code length (1.0 is optimal).
    pub fn coding_efficiency(&self) -> f64 {
        let average = self.bits_per_symbol();
        if average == 0.0 {
            1.0
        } else {
            self.entropy_bits / average
        }
    }

    /// Fraction of the allocated buffer that was touched.
    pub fn buffer_utilization(&self) -> f64 {
        if self.words_allocated == 0 {
            0.0
        } else {
            self.words_used as f64 / self.words_allocated as f64
        }
    }

    /// Symbols per second over the whole pass.
    pub fn throughput_sps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            (self.symbols_encoded + self.symbols_decoded) as f64 / duration_secs
        }
    }

    /// True when everything written was read back unchanged.
    pub fn verified(&self) -> bool {
        self.mismatches == 0 && self.symbols_decoded == self.symbols_encoded
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Pass Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Model ===");
        println!("Alphabet: {} symbols", self.alphabet_size);
        println!("Longest code: {} bits", self.max_code_length);
        println!("Entropy: {:.4} bits/symbol", self.entropy_bits);
        println!();

        println!("=== Encoding ===");
        println!("Symbols: {}", self.symbols_encoded);
        println!("Code bits: {} ({:.4} bits/symbol)", self.symbol_bits, self.bits_per_symbol());
        println!("Raw fields: {} ({} bits)", self.raw_fields, self.raw_bits);
        println!(
            "Ratio vs {}-bit fixed width: {:.1}%",
            self.fixed_width_bits(),
            self.compression_ratio() * 100.0
        );
        println!("Efficiency: {:.2}%", self.coding_efficiency() * 100.0);
        println!();

        println!("=== Buffer ===");
        println!("Word size: {} bits", self.word_bits);
        println!("Allocated: {} words", self.words_allocated);
        println!(
            "Used: {} words ({:.1}%)",
            self.words_used,
            self.buffer_utilization() * 100.0
        );
        println!();

        println!("=== Decoding ===");
        println!("Symbols: {}", self.symbols_decoded);
        println!("Mismatches: {}", self.mismatches);
        println!();

        println!("=== Performance ===");
        println!("Throughput: {:.2} Msym/s", self.throughput_sps() / 1_000_000.0);
        println!();
    }

    /// Print just the final result (pass/fail).
    pub fn print_result(&self) {
        if self.verified() {
            println!("✓ Round trip verified");
            println!(
                "  {} symbols in {} bits ({} words) in {} ms",
                self.symbols_encoded,
                self.total_bits(),
                self.words_used,
                self.duration().as_millis()
            );
        } else if self.mismatches > 0 {
            println!("✗ Round trip failed: {} symbols differ", self.mismatches);
        } else {
            println!(
                "✗ Round trip failed: decoded {} of {} symbols",
                self.symbols_decoded, self.symbols_encoded
            );
        }
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             alphabet_size={}\n\
             max_code_length={}\n\
             entropy_bits={:.4}\n\
             symbols_encoded={}\n\
             symbol_bits={}\n\
             raw_bits={}\n\
             bits_per_symbol={:.4}\n\
             compression_ratio={:.4}\n\
             words_allocated={}\n\
             words_used={}\n\
             symbols_decoded={}\n\
             mismatches={}\n",
            self.duration().as_millis(),
            self.alphabet_size,
            self.max_code_length,
            self.entropy_bits,
            self.symbols_encoded,
            self.symbol_bits,
            self.raw_bits,
            self.bits_per_symbol(),
            self.compression_ratio(),
            self.words_allocated,
            self.words_used,
            self.symbols_decoded,
            self.mismatches,
        )
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shannon entropy of a frequency table, in bits per symbol.
///
/// Zero-frequency symbols contribute nothing; an all-zero table has entropy 0.
pub fn shannon_entropy(freqs: &[u64]) -> f64 {
    let total: u64 = freqs.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    freqs
        .iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / total;
            -p * p.log2()
        })
        .sum()
}
