use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use huffman_compression::{
    config::DEFAULT_BUFFER_BITS,
    encode_decode::{compress_file, decompress_file, encode_and_decode, encoded_path},
    CodecConfig, Terminator,
};

/// Output name the decoder falls back to.
const DEFAULT_DECODED_FILE: &str = "decoded.txt";

#[derive(Parser, Debug)]
#[command(version, about = "Static Huffman compression")]
struct Args {
    /// Use this byte as the end-of-message marker instead of a 257th symbol.
    /// Inputs containing the byte are rejected.
    #[arg(long, global = true, value_name = "BYTE")]
    in_band: Option<u8>,

    /// Bits buffered before touching the file (multiple of 8).
    #[arg(long, global = true, default_value_t = DEFAULT_BUFFER_BITS)]
    buffer_bits: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT, into INPUT.huff unless OUTPUT is given.
    Encode {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    /// Decompress INPUT, into decoded.txt unless OUTPUT is given.
    Decode {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    /// Compress INPUT next to itself, then decompress it into OUTPUT.
    Roundtrip { input: PathBuf, output: PathBuf },
}

impl Args {
    fn config(&self) -> CodecConfig {
        let terminator = self
            .in_band
            .map(Terminator::InBand)
            .unwrap_or(Terminator::OutOfBand);
        CodecConfig::default()
            .with_terminator(terminator)
            .with_buffer_bits(self.buffer_bits)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config();

    match args.command {
        Command::Encode { input, output } => {
            let output = output.unwrap_or_else(|| encoded_path(&input));
            let summary = compress_file(&input, &output, config)
                .with_context(|| format!("failed to compress {}", input.display()))?;
            println!(
                "{} -> {}: {} -> {} bytes ({:.1}%)",
                input.display(),
                output.display(),
                summary.source_bytes,
                summary.encoded_bytes,
                summary.ratio() * 100.0
            );
        }
        Command::Decode { input, output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_DECODED_FILE));
            let summary = decompress_file(&input, &output, config)
                .with_context(|| format!("failed to decompress {}", input.display()))?;
            println!(
                "{} -> {}: {} bytes",
                input.display(),
                output.display(),
                summary.decoded_bytes
            );
        }
        Command::Roundtrip { input, output } => {
            let encoded = encode_and_decode(&input, &output, config)
                .with_context(|| format!("failed to round-trip {}", input.display()))?;
            println!(
                "{} -> {} -> {}",
                input.display(),
                encoded.display(),
                output.display()
            );
        }
    }

    Ok(())
}
