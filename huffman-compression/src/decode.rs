use std::io::{Read, Write};

use log::debug;

use crate::{
    bit_buffer::BitBuffer,
    config::CodecConfig,
    error::Result,
    symbol::Symbol,
    tree::{HuffmanTree, Node},
    tree_codec::read_tree,
};

/// What a decode pass produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    pub decoded_bytes: u64,
    pub tree_bits: u64,
    pub payload_bits: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    pub fn new(config: CodecConfig) -> Self {
        Decoder { config }
    }

    pub fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        let mut decoded = Vec::new();
        self.decode_to(encoded, &mut decoded)?;
        Ok(decoded)
    }

    /// Decodes `source` into `sink` until the terminator leaf is reached.
    ///
    /// Every decoded byte goes straight to `sink`, which is flushed once at the
    /// end. Wrap file sinks in a `BufWriter`.
    ///
    /// Running out of input first is an [`HuffmanError::EndOfStream`]: the
    /// stream was truncated or corrupted. Bytes decoded up to that point may
    /// already be in `sink`.
    ///
    /// [`HuffmanError::EndOfStream`]: crate::error::HuffmanError::EndOfStream
    pub fn decode_to<R: Read, W: Write>(&self, source: R, mut sink: W) -> Result<DecodeSummary> {
        self.config.validate()?;
        let mut buffer = BitBuffer::for_reading(source, self.config.buffer_bits);

        let tree = read_tree(&mut buffer, self.config.terminator)?;
        tree.ensure_decodable()?;
        let tree_bits = buffer.bits_processed();

        let mut decoded_bytes = 0u64;
        loop {
            match next_symbol(&tree, &mut buffer)? {
                Symbol::Byte(byte) => {
                    sink.write_all(&[byte])?;
                    decoded_bytes += 1;
                }
                Symbol::EndOfMessage => break,
            }
        }
        sink.flush()?;

        let summary = DecodeSummary {
            decoded_bytes,
            tree_bits,
            payload_bits: buffer.bits_processed() - tree_bits,
        };
        buffer.close()?;
        debug!("decoded {summary:?}");
        Ok(summary)
    }
}

/// Walks from the root to a leaf, one bit per edge. A lone leaf root has the
/// one-bit code `0`, so a bit is still consumed for it.
fn next_symbol(tree: &HuffmanTree, buffer: &mut BitBuffer<'_>) -> Result<Symbol> {
    let mut node = tree.root();
    if let Node::Leaf { symbol, .. } = node {
        buffer.read_bit()?;
        return Ok(*symbol);
    }
    loop {
        match node {
            Node::Leaf { symbol, .. } => return Ok(*symbol),
            Node::Internal { left, right, .. } => {
                node = if buffer.read_bit()? { right } else { left };
            }
        }
    }
}
