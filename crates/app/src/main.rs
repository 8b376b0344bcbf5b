//! huffbits: build a static Huffman model for a generated symbol stream,
//! pack the stream into a word buffer, read it back and report.
//!
//! # Record layout
//!
//! ```text
//! +----------------------+
//! | symbol count (32)    |  raw, LSB-first
//! +----------------------+
//! | alphabet size (32)   |  raw, LSB-first
//! +----------------------+
//! | symbols (variable)   |  Huffman codes, root bit first
//! +----------------------+
//! ```
//!
//! The frequency table is not stored: both sides rebuild the model from it.

mod config;
mod input_gen;

use config::Config;
use huffbits_core::{
    metrics::{shannon_entropy, CodecMetrics},
    BitReader, BitWord, BitWriter, HuffmanModel, Result,
};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Bits of the fixed record header.
const HEADER_BITS: usize = 64;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("run with --help for usage");
            std::process::exit(2);
        }
    };

    if config.print_config {
        config.print();
    }

    let metrics = match run(&config) {
        Ok(metrics) => metrics,
        Err(e) => {
            error!(error = %e, "run failed");
            std::process::exit(1);
        }
    };

    if config.print_metrics {
        metrics.print_summary();
    }
    metrics.print_result();

    if !metrics.verified() {
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("huffbits=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Generate the stream, build the model and dispatch on word width.
fn run(config: &Config) -> Result<CodecMetrics> {
    info!(
        seed = config.seed,
        alphabet_size = config.alphabet_size,
        symbol_count = config.symbol_count,
        word_bits = config.word_bits,
        "starting run"
    );

    let symbols = input_gen::generate_symbols(
        config.seed,
        config.alphabet_size,
        config.symbol_count,
        config.skew,
    );
    let freqs = input_gen::smoothed_frequencies(&symbols, config.alphabet_size);
    let model = HuffmanModel::from_frequencies(&freqs)?;
    debug!(
        max_code_length = model.max_code_length(),
        weighted_cost = model.weighted_cost(&freqs),
        "model ready"
    );

    let mut metrics = CodecMetrics::new();
    metrics.alphabet_size = model.outputs();
    metrics.max_code_length = model.max_code_length();
    metrics.entropy_bits = shannon_entropy(&freqs);

    match config.word_bits {
        8 => round_trip::<u8>(&model, &symbols, &mut metrics)?,
        16 => round_trip::<u16>(&model, &symbols, &mut metrics)?,
        64 => round_trip::<u64>(&model, &symbols, &mut metrics)?,
        _ => round_trip::<u32>(&model, &symbols, &mut metrics)?,
    }

    metrics.complete();
    info!(
        bits = metrics.total_bits(),
        words = metrics.words_used,
        verified = metrics.verified(),
        "run complete"
    );
    Ok(metrics)
}

/// Encode `symbols` into a worst-case buffer of `W`, then decode and compare.
fn round_trip<W: BitWord>(
    model: &HuffmanModel,
    symbols: &[u32],
    metrics: &mut CodecMetrics,
) -> Result<()> {
    let worst_bits = HEADER_BITS + symbols.len() * model.max_code_length() as usize;
    let words = worst_bits.div_ceil(W::BITS as usize);
    let mut buf = vec![W::ZERO; words];

    metrics.word_bits = W::BITS;
    metrics.words_allocated = words as u64;

    let mut writer = BitWriter::new(&mut buf);
    writer.try_write_number_raw(symbols.len() as u32, 32)?;
    writer.try_write_number_raw(model.outputs() as u32, 32)?;
    metrics.raw_fields += 2;
    metrics.raw_bits += HEADER_BITS as u64;

    for &symbol in symbols {
        writer.write_number_huffman(model, symbol);
    }
    let bits = writer.get_bit_size(0);
    let used = writer.get_element_size(0);

    metrics.symbols_encoded = symbols.len() as u64;
    metrics.symbol_bits = (bits - HEADER_BITS) as u64;
    metrics.words_used = used as u64;
    debug!(bits, used, allocated = words, "encoded stream");

    // Decode only what was written.
    let mut reader = BitReader::new(&buf[..used]);
    let count = reader.try_read_number_raw::<u32>(32)? as usize;
    let outputs = reader.try_read_number_raw::<u32>(32)? as usize;
    if outputs != model.outputs() {
        error!(header = outputs, model = model.outputs(), "alphabet size mismatch");
        metrics.mismatches += 1;
    }

    for &expected in symbols.iter().take(count) {
        let symbol = reader.try_read_number_huffman(model)?;
        metrics.symbols_decoded += 1;
        if symbol != expected {
            metrics.mismatches += 1;
        }
    }

    Ok(())
}
