use crate::{
    error::{HuffmanError, Result},
    symbol::Terminator,
};

/// Bits held by a `BitBuffer` before it touches the underlying stream.
pub const DEFAULT_BUFFER_BITS: usize = 128;

/// Settings shared by the encoder and the decoder. Both sides must agree on
/// them since the compressed format carries no header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub terminator: Terminator,
    pub buffer_bits: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            terminator: Terminator::default(),
            buffer_bits: DEFAULT_BUFFER_BITS,
        }
    }
}

impl CodecConfig {
    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_buffer_bits(mut self, buffer_bits: usize) -> Self {
        self.buffer_bits = buffer_bits;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_bits == 0 || self.buffer_bits % 8 != 0 {
            return Err(HuffmanError::InvalidConfig(format!(
                "buffer_bits must be a non-zero multiple of 8, got {}",
                self.buffer_bits
            )));
        }
        Ok(())
    }
}
