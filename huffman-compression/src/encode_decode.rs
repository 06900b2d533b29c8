use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    config::CodecConfig,
    decode::{DecodeSummary, Decoder},
    encode::{EncodeSummary, Encoder},
    error::Result,
};

const ENCODED_EXTENSION: &str = "huff";

/// Where `encode_and_decode` parks the compressed form of `input_file`.
pub fn encoded_path(input_file: impl AsRef<Path>) -> PathBuf {
    let input_file = input_file.as_ref();
    let mut name = input_file.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(ENCODED_EXTENSION);
    input_file.with_file_name(name)
}

/// Compresses `input_file` into `output_file`, reading the input twice.
pub fn compress_file(
    input_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
    config: CodecConfig,
) -> Result<EncodeSummary> {
    let reader = BufReader::new(File::open(input_file.as_ref())?);
    let writer = BufWriter::new(File::create(output_file.as_ref())?);
    let summary = Encoder::new(config).encode_seekable(reader, writer)?;
    info!(
        "compressed {} -> {} ({} -> {} bytes)",
        input_file.as_ref().display(),
        output_file.as_ref().display(),
        summary.source_bytes,
        summary.encoded_bytes
    );
    Ok(summary)
}

pub fn decompress_file(
    input_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
    config: CodecConfig,
) -> Result<DecodeSummary> {
    let reader = BufReader::new(File::open(input_file.as_ref())?);
    let writer = BufWriter::new(File::create(output_file.as_ref())?);
    let summary = Decoder::new(config).decode_to(reader, writer)?;
    info!(
        "decompressed {} -> {} ({} bytes)",
        input_file.as_ref().display(),
        output_file.as_ref().display(),
        summary.decoded_bytes
    );
    Ok(summary)
}

/// Compresses `input_file` next to itself, then decompresses that into
/// `output_file`. Returns the path of the compressed file.
pub fn encode_and_decode(
    input_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
    config: CodecConfig,
) -> Result<PathBuf> {
    let encoded_file = encoded_path(&input_file);
    compress_file(&input_file, &encoded_file, config)?;
    decompress_file(&encoded_file, output_file, config)?;
    Ok(encoded_file)
}
