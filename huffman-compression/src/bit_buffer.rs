use std::io::{self, Read, Write};

use log::trace;

use crate::error::{HuffmanError, Result};

const BITS_PER_BYTE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Read => "read mode",
            Mode::Write => "write mode",
        }
    }
}

enum Stream<'a> {
    Source(Box<dyn Read + 'a>),
    Sink(Box<dyn Write + 'a>),
}

/// A one-directional channel of single bits over a byte stream.
///
/// Bits are packed most significant first: the first bit written becomes the
/// top bit of the first byte. The direction is fixed when the buffer is
/// created; calling an operation of the other direction is an
/// [`HuffmanError::InvalidMode`].
pub struct BitBuffer<'a> {
    stream: Stream<'a>,
    bytes: Vec<u8>,
    capacity_bits: usize,
    // next bit to write or read inside `bytes`
    position: usize,
    // valid bits in `bytes`, only meaningful when reading
    filled: usize,
    processed: u64,
}

impl<'a> BitBuffer<'a> {
    pub fn for_writing(sink: impl Write + 'a, capacity_bits: usize) -> Self {
        Self::new(Stream::Sink(Box::new(sink)), capacity_bits)
    }

    pub fn for_reading(source: impl Read + 'a, capacity_bits: usize) -> Self {
        Self::new(Stream::Source(Box::new(source)), capacity_bits)
    }

    fn new(stream: Stream<'a>, capacity_bits: usize) -> Self {
        // whole bytes only; a zero or ragged capacity is rounded up
        let capacity_bytes = capacity_bits.div_ceil(BITS_PER_BYTE).max(1);
        BitBuffer {
            stream,
            bytes: vec![0; capacity_bytes],
            capacity_bits: capacity_bytes * BITS_PER_BYTE,
            position: 0,
            filled: 0,
            processed: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.stream {
            Stream::Source(_) => Mode::Read,
            Stream::Sink(_) => Mode::Write,
        }
    }

    /// Bits written or read so far.
    pub fn bits_processed(&self) -> u64 {
        self.processed
    }

    fn ensure_mode(&self, expected: Mode) -> Result<()> {
        let actual = self.mode();
        if actual != expected {
            return Err(HuffmanError::InvalidMode {
                expected: expected.name(),
                actual: actual.name(),
            });
        }
        Ok(())
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.ensure_mode(Mode::Write)?;
        if bit {
            self.bytes[self.position / BITS_PER_BYTE] |=
                1 << (BITS_PER_BYTE - 1 - self.position % BITS_PER_BYTE);
        }
        self.position += 1;
        self.processed += 1;
        if self.position == self.capacity_bits {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Writes the low `width` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u16, width: u32) -> Result<()> {
        for shift in (0..width).rev() {
            self.write_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    /// Writes all eight bits of `value`, leading zeros included.
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.write_bits(value as u16, BITS_PER_BYTE as u32)
    }

    // Emits every started byte; the unused low bits of the last one are zero.
    fn flush_buffer(&mut self) -> Result<()> {
        let used = self.position.div_ceil(BITS_PER_BYTE);
        if used == 0 {
            return Ok(());
        }
        let Stream::Sink(sink) = &mut self.stream else {
            return Err(HuffmanError::InvalidMode {
                expected: Mode::Write.name(),
                actual: Mode::Read.name(),
            });
        };
        sink.write_all(&self.bytes[..used])?;
        trace!("flushed {used} bytes ({} bits)", self.position);
        self.bytes[..used].fill(0);
        self.position = 0;
        Ok(())
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        self.ensure_mode(Mode::Read)?;
        if self.position == self.filled {
            self.refill()?;
            if self.filled == 0 {
                return Err(HuffmanError::EndOfStream {
                    bits_read: self.processed,
                });
            }
        }
        let byte = self.bytes[self.position / BITS_PER_BYTE];
        let bit = (byte >> (BITS_PER_BYTE - 1 - self.position % BITS_PER_BYTE)) & 1 == 1;
        self.position += 1;
        self.processed += 1;
        Ok(bit)
    }

    pub fn read_bits(&mut self, width: u32) -> Result<u16> {
        let mut value = 0u16;
        for _ in 0..width {
            value = (value << 1) | self.read_bit()? as u16;
        }
        Ok(value)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        // eight bits always fit
        Ok(self.read_bits(BITS_PER_BYTE as u32)? as u8)
    }

    fn refill(&mut self) -> Result<()> {
        let Stream::Source(source) = &mut self.stream else {
            return Err(HuffmanError::InvalidMode {
                expected: Mode::Read.name(),
                actual: Mode::Write.name(),
            });
        };
        let mut read = 0;
        while read < self.bytes.len() {
            match source.read(&mut self.bytes[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        trace!("refilled {read} bytes");
        self.filled = read * BITS_PER_BYTE;
        self.position = 0;
        Ok(())
    }

    /// Releases the stream. In write mode any partial byte is padded with
    /// zero bits and the sink is flushed first.
    pub fn close(mut self) -> Result<()> {
        if self.mode() == Mode::Write {
            self.flush_buffer()?;
            if let Stream::Sink(sink) = &mut self.stream {
                sink.flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{BitBuffer, Mode};
    use crate::error::HuffmanError;

    fn bits_of(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '1').collect()
    }

    fn write_all(bits: &[bool], capacity_bits: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buffer = BitBuffer::for_writing(&mut out, capacity_bits);
        for &bit in bits {
            buffer.write_bit(bit).unwrap();
        }
        buffer.close().unwrap();
        out
    }

    #[rstest]
    #[case("10000000", vec![0x80])]
    #[case("1", vec![0x80])]
    #[case("0000000101", vec![0x01, 0x40])]
    #[case("", vec![])]
    fn test_first_bit_is_most_significant(#[case] pattern: &str, #[case] expected: Vec<u8>) {
        assert_eq!(write_all(&bits_of(pattern), 128), expected);
    }

    #[rstest]
    #[case(8)]
    #[case(16)]
    #[case(128)]
    fn test_bits_survive_buffer_boundaries(#[case] capacity_bits: usize) {
        let bits = (0..301)
            .map(|i| i % 3 == 0 || i % 7 == 0)
            .collect::<Vec<_>>();
        let bytes = write_all(&bits, capacity_bits);
        assert_eq!(bytes.len(), 38);

        let mut reader = BitBuffer::for_reading(bytes.as_slice(), capacity_bits);
        for (index, &expected) in bits.iter().enumerate() {
            assert_eq!(reader.read_bit().unwrap(), expected, "bit {index}");
        }
    }

    #[test]
    fn test_zero_byte_keeps_all_eight_bits() {
        let mut out = Vec::new();
        let mut buffer = BitBuffer::for_writing(&mut out, 128);
        buffer.write_bit(true).unwrap();
        buffer.write_byte(0x00).unwrap();
        buffer.write_byte(0x05).unwrap();
        buffer.close().unwrap();
        assert_eq!(out, vec![0x80, 0x02, 0x80]);

        let mut reader = BitBuffer::for_reading(out.as_slice(), 128);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_byte().unwrap(), 0x00);
        assert_eq!(reader.read_byte().unwrap(), 0x05);
    }

    #[test]
    fn test_nine_bit_fields() {
        let mut out = Vec::new();
        let mut buffer = BitBuffer::for_writing(&mut out, 128);
        buffer.write_bits(256, 9).unwrap();
        buffer.write_bits(0x1ff, 9).unwrap();
        buffer.close().unwrap();

        let mut reader = BitBuffer::for_reading(out.as_slice(), 128);
        assert_eq!(reader.read_bits(9).unwrap(), 256);
        assert_eq!(reader.read_bits(9).unwrap(), 0x1ff);
    }

    #[test]
    fn test_reading_past_the_end_fails() {
        let data = [0xa5u8];
        let mut reader = BitBuffer::for_reading(&data[..], 128);
        for _ in 0..8 {
            reader.read_bit().unwrap();
        }
        match reader.read_bit() {
            Err(HuffmanError::EndOfStream { bits_read }) => assert_eq!(bits_read, 8),
            other => panic!("expected end of stream, got {other:?}"),
        }
    }

    #[test]
    fn test_operations_are_bound_to_mode() {
        let data = [0u8; 2];
        let mut reader = BitBuffer::for_reading(&data[..], 128);
        assert_eq!(reader.mode(), Mode::Read);
        assert!(matches!(
            reader.write_bit(true),
            Err(HuffmanError::InvalidMode { .. })
        ));

        let mut out = Vec::new();
        let mut writer = BitBuffer::for_writing(&mut out, 128);
        assert!(matches!(
            writer.read_bit(),
            Err(HuffmanError::InvalidMode { .. })
        ));
        writer.close().unwrap();
        assert!(out.is_empty());
    }
}
