//! Configuration for the huffbits application.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including randomized defaults that are reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments, using intelligent defaults.
//! All defaults can be printed so runs are reproducible.

use huffbits_core::huffman::MAX_OUTPUTS;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Buffer word widths the tool can run with.
pub const WORD_BITS: [u32; 4] = [8, 16, 32, 64];

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // === Input ===
    /// Symbols in the alphabet
    pub alphabet_size: usize,

    /// Length of the generated symbol stream
    pub symbol_count: usize,

    /// Ratio between the weights of consecutive symbols (0 < skew <= 1)
    pub skew: f64,

    /// Seed for every random choice
    pub seed: u64,

    // === Buffer ===
    /// Width of one buffer word
    pub word_bits: u32,

    // === Behavior ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If no arguments provided, generates randomized defaults using a time-based seed.
    /// If --seed is provided, uses that seed for all randomness (fully deterministic).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut alphabet_size: Option<usize> = None;
        let mut symbol_count: Option<usize> = None;
        let mut skew: Option<f64> = None;
        let mut seed: Option<u64> = None;
        let mut word_bits: Option<u32> = None;
        let mut print_config = false;
        let mut print_metrics = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--symbols" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--symbols requires a number".to_string());
                    }
                    alphabet_size = Some(args[i].parse().map_err(|_| "invalid symbols")?);
                }
                "--count" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--count requires a number".to_string());
                    }
                    symbol_count = Some(args[i].parse().map_err(|_| "invalid count")?);
                }
                "--skew" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--skew requires a number".to_string());
                    }
                    skew = Some(args[i].parse().map_err(|_| "invalid skew")?);
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--word-bits" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--word-bits requires a number".to_string());
                    }
                    word_bits = Some(args[i].parse().map_err(|_| "invalid word-bits")?);
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        // Generate defaults using seed
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let config = Config {
            alphabet_size: alphabet_size.unwrap_or_else(|| rng.gen_range(2..=256)),
            symbol_count: symbol_count.unwrap_or(100_000),
            skew: skew.unwrap_or_else(|| rng.gen_range(0.6..0.98)),
            seed,
            word_bits: word_bits.unwrap_or(32),
            print_config,
            print_metrics,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the run cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.alphabet_size == 0 {
            return Err("--symbols must be at least 1".to_string());
        }
        if self.alphabet_size > MAX_OUTPUTS {
            return Err(format!(
                "--symbols {} is too large (max {})",
                self.alphabet_size, MAX_OUTPUTS
            ));
        }
        if self.symbol_count > u32::MAX as usize {
            return Err(format!("--count {} does not fit the 32-bit header", self.symbol_count));
        }
        if !(self.skew > 0.0 && self.skew <= 1.0) {
            return Err(format!("--skew must be in (0, 1], got {}", self.skew));
        }
        if !WORD_BITS.contains(&self.word_bits) {
            return Err(format!(
                "--word-bits must be one of {:?}, got {}",
                WORD_BITS, self.word_bits
            ));
        }
        Ok(())
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Seed: {}", self.seed);
        println!();
        println!("=== Input ===");
        println!("Alphabet: {} symbols", self.alphabet_size);
        println!("Stream length: {} symbols", self.symbol_count);
        println!("Skew: {:.3}", self.skew);
        println!();
        println!("=== Buffer ===");
        println!("Word size: {} bits", self.word_bits);
        println!();
    }
}

fn print_help() {
    println!("huffbits: Encode and verify a symbol stream with a static Huffman model");
    println!();
    println!("USAGE:");
    println!("    huffbits [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --symbols <N>           Alphabet size (default: random 2-256)");
    println!("    --count <N>             Symbols to generate (default: 100000)");
    println!("    --skew <F>              Weight ratio of neighbouring symbols, 0-1 (default: random 0.6-0.98)");
    println!("    --seed <N>              Random seed for determinism");
    println!();
    println!("    --word-bits <N>         Buffer word width: 8, 16, 32 or 64 (default: 32)");
    println!();
    println!("    --print-config          Print resolved configuration");
    println!("    --no-metrics            Don't print metrics summary");
    println!("    --help, -h              Print this help");
    println!();
    println!("LOGGING:");
    println!("    RUST_LOG=huffbits=debug,huffbits_core=debug   Show model compilation details");
    println!();
    println!("EXAMPLES:");
    println!("    huffbits                                  # Run with random defaults");
    println!("    huffbits --seed 42                        # Deterministic run");
    println!("    huffbits --symbols 16 --skew 0.5          # Small, heavily skewed alphabet");
    println!("    huffbits --word-bits 8 --count 1000000    # Byte buffer, long stream");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seeded_defaults_are_reproducible() {
        let a = Config::from_args(&args(&["--seed", "42"])).unwrap();
        let b = Config::from_args(&args(&["--seed", "42"])).unwrap();
        assert_eq!(a, b);
        assert!((2..=256).contains(&a.alphabet_size));
        assert!(a.skew >= 0.6 && a.skew < 0.98);
        assert_eq!(a.word_bits, 32);
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_args(&args(&[
            "--symbols",
            "16",
            "--count",
            "500",
            "--skew",
            "0.5",
            "--seed",
            "1",
            "--word-bits",
            "8",
            "--print-config",
            "--no-metrics",
        ]))
        .unwrap();

        assert_eq!(config.alphabet_size, 16);
        assert_eq!(config.symbol_count, 500);
        assert_eq!(config.skew, 0.5);
        assert_eq!(config.word_bits, 8);
        assert!(config.print_config);
        assert!(!config.print_metrics);
    }

    #[test]
    fn test_missing_value() {
        let err = Config::from_args(&args(&["--count"])).unwrap_err();
        assert!(err.contains("--count requires"));
    }

    #[test]
    fn test_unknown_argument() {
        let err = Config::from_args(&args(&["--mtu", "1200"])).unwrap_err();
        assert!(err.contains("unknown argument"));
    }

    #[test]
    fn test_validation() {
        assert!(Config::from_args(&args(&["--seed", "1", "--symbols", "0"])).is_err());
        assert!(Config::from_args(&args(&["--seed", "1", "--skew", "0"])).is_err());
        assert!(Config::from_args(&args(&["--seed", "1", "--skew", "1.5"])).is_err());
        assert!(Config::from_args(&args(&["--seed", "1", "--word-bits", "12"])).is_err());
        assert!(Config::from_args(&args(&["--seed", "1", "--symbols", "1"])).is_ok());
    }

    #[test]
    fn test_alphabet_limit() {
        let over = (MAX_OUTPUTS + 1).to_string();
        let err = Config::from_args(&args(&["--seed", "1", "--symbols", &over])).unwrap_err();
        assert!(err.contains("too large"));
        assert!(Config::from_args(&args(&["--seed", "1", "--symbols", "4000000000"])).is_err());
    }
}
