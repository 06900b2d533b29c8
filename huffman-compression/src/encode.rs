use std::io::{Read, Seek, SeekFrom, Write};

use log::debug;

use crate::{
    bit_buffer::BitBuffer,
    config::CodecConfig,
    error::{HuffmanError, Result},
    frequency::{read_chunks, FrequencyMap},
    prefix_code_table::CodeTable,
    symbol::Symbol,
    tree::HuffmanTree,
    tree_codec::write_tree,
};

/// What an encode pass produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    pub source_bytes: u64,
    pub encoded_bytes: u64,
    pub distinct_symbols: usize,
    pub tree_bits: u64,
    pub payload_bits: u64,
}

impl EncodeSummary {
    /// Encoded size over source size.
    pub fn ratio(&self) -> f64 {
        if self.source_bytes == 0 {
            return 0.0;
        }
        self.encoded_bytes as f64 / self.source_bytes as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    pub fn new(config: CodecConfig) -> Self {
        Encoder { config }
    }

    pub fn encode(&self, source: &[u8]) -> Result<Vec<u8>> {
        let mut encoded = Vec::new();
        self.encode_to(source, &mut encoded)?;
        Ok(encoded)
    }

    /// Encodes an in-memory source into `sink`.
    pub fn encode_to<W: Write>(&self, source: &[u8], sink: W) -> Result<EncodeSummary> {
        let frequencies = self.count(source)?;
        self.emit(&frequencies, source, sink)
    }

    /// Encodes a source that is read twice: once to count symbols, once to
    /// emit their codes. The source is rewound between the passes.
    ///
    /// A byte that shows up only in the second pass is an
    /// [`HuffmanError::UnknownSymbol`].
    pub fn encode_seekable<R, W>(&self, mut source: R, sink: W) -> Result<EncodeSummary>
    where
        R: Read + Seek,
        W: Write,
    {
        let start = source.stream_position()?;
        let frequencies = self.count(&mut source)?;
        source.seek(SeekFrom::Start(start))?;
        self.emit(&frequencies, source, sink)
    }

    fn count<R: Read>(&self, source: R) -> Result<FrequencyMap> {
        self.config.validate()?;
        let mut frequencies = FrequencyMap::count(source, self.config.terminator.reserved_byte())?;
        if frequencies.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }
        frequencies.record(Symbol::EndOfMessage);
        Ok(frequencies)
    }

    fn emit<R: Read, W: Write>(
        &self,
        frequencies: &FrequencyMap,
        source: R,
        sink: W,
    ) -> Result<EncodeSummary> {
        let tree = HuffmanTree::from_frequencies(frequencies)?;
        let codes = CodeTable::from(&tree);

        let mut buffer = BitBuffer::for_writing(sink, self.config.buffer_bits);
        let tree_bits = write_tree(&tree, &mut buffer, self.config.terminator)?;

        let mut source_bytes = 0u64;
        read_chunks(source, |chunk| {
            for &byte in chunk {
                write_code(&mut buffer, &codes, Symbol::Byte(byte))?;
            }
            source_bytes += chunk.len() as u64;
            Ok(())
        })?;
        write_code(&mut buffer, &codes, Symbol::EndOfMessage)?;

        let payload_bits = buffer.bits_processed() - tree_bits;
        buffer.close()?;

        let summary = EncodeSummary {
            source_bytes,
            encoded_bytes: (tree_bits + payload_bits).div_ceil(8),
            distinct_symbols: codes.len(),
            tree_bits,
            payload_bits,
        };
        debug!("encoded {summary:?}");
        Ok(summary)
    }
}

fn write_code(buffer: &mut BitBuffer<'_>, codes: &CodeTable, symbol: Symbol) -> Result<()> {
    for bit in codes.code(symbol)?.iter() {
        buffer.write_bit(bit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Seek, SeekFrom};

    use rstest::rstest;

    use super::Encoder;
    use crate::{
        config::CodecConfig,
        error::HuffmanError,
        symbol::{Symbol, Terminator},
    };

    #[test]
    fn test_skewed_layout() {
        // a and the (b, eom) subtree both weigh 2; a was queued first so it goes left
        let encoded = Encoder::default().encode(b"aab").unwrap();
        // 0 1 001100001 0 1 001100010 1 100000000 | 0 0 10 11 | pad
        assert_eq!(
            encoded,
            vec![
                0b0100_1100,
                0b0010_1001,
                0b1000_1011,
                0b0000_0000,
                0b0010_1100,
            ]
        );
    }

    #[test]
    fn test_summary() {
        let mut out = Vec::new();
        let summary = Encoder::default().encode_to(b"aab", &mut out).unwrap();
        assert_eq!(summary.source_bytes, 3);
        assert_eq!(summary.distinct_symbols, 3);
        assert_eq!(summary.tree_bits, 32);
        assert_eq!(summary.payload_bits, 6);
        assert_eq!(summary.encoded_bytes, out.len() as u64);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            Encoder::default().encode(b""),
            Err(HuffmanError::EmptyInput)
        ));
    }

    #[test]
    fn test_output_is_deterministic() {
        let source = b"the quick brown fox jumps over the lazy dog";
        let encoder = Encoder::default();
        assert_eq!(
            encoder.encode(source).unwrap(),
            encoder.encode(source).unwrap()
        );
    }

    #[rstest]
    #[case(b"abc\x03".as_slice(), 3)]
    #[case(b"\x03".as_slice(), 0)]
    fn test_in_band_collision(#[case] source: &[u8], #[case] expected_offset: u64) {
        let encoder = Encoder::new(CodecConfig::default().with_terminator(Terminator::LEGACY));
        match encoder.encode(source) {
            Err(HuffmanError::SentinelCollision { offset, byte }) => {
                assert_eq!(offset, Some(expected_offset));
                assert_eq!(byte, 3);
            }
            other => panic!("expected a collision, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let encoder = Encoder::new(CodecConfig::default().with_buffer_bits(7));
        assert!(matches!(
            encoder.encode(b"abc"),
            Err(HuffmanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_seekable_matches_in_memory() {
        let source = b"mississippi river".to_vec();
        let encoder = Encoder::default();

        let mut out = Vec::new();
        let summary = encoder
            .encode_seekable(Cursor::new(source.clone()), &mut out)
            .unwrap();
        assert_eq!(out, encoder.encode(&source).unwrap());
        assert_eq!(summary.source_bytes, source.len() as u64);
    }

    /// Hands out different bytes once it has been rewound.
    struct ChangingSource {
        inner: Cursor<Vec<u8>>,
        rewound: bool,
    }

    impl Read for ChangingSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.inner.read(buf)?;
            if self.rewound {
                buf[..n].fill(b'z');
            }
            Ok(n)
        }
    }

    impl Seek for ChangingSource {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.rewound = true;
            self.inner.seek(pos)
        }

        fn stream_position(&mut self) -> std::io::Result<u64> {
            self.inner.stream_position()
        }
    }

    #[test]
    fn test_source_changing_between_passes() {
        let source = ChangingSource {
            inner: Cursor::new(b"aaaa".to_vec()),
            rewound: false,
        };
        let mut out = Vec::new();
        assert!(matches!(
            Encoder::default().encode_seekable(source, &mut out),
            Err(HuffmanError::UnknownSymbol {
                symbol: Symbol::Byte(b'z')
            })
        ));
    }
}
