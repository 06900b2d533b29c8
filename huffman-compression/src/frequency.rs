use std::io::{self, Read};

use itertools::Itertools;

use crate::{
    error::{HuffmanError, Result},
    symbol::{Symbol, ALPHABET_SIZE},
};

const CHUNK_SIZE: usize = 8 * 1024;

/// Feeds `reader` to `on_chunk` until end of stream.
pub(crate) fn read_chunks<R: Read>(
    mut reader: R,
    mut on_chunk: impl FnMut(&[u8]) -> Result<()>,
) -> Result<()> {
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(()),
            Ok(n) => on_chunk(&chunk[..n])?,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

/// Occurrence counts for every symbol, including the terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: [u64; ALPHABET_SIZE],
}

impl Default for FrequencyMap {
    fn default() -> Self {
        FrequencyMap {
            counts: [0; ALPHABET_SIZE],
        }
    }
}

impl FrequencyMap {
    /// Counts every byte of `reader` in a single pass.
    ///
    /// When `reserved` is set, the first occurrence of that byte aborts the
    /// scan with [`HuffmanError::SentinelCollision`].
    pub fn count<R: Read>(reader: R, reserved: Option<u8>) -> Result<Self> {
        let mut frequencies = FrequencyMap::default();
        let mut offset = 0u64;
        read_chunks(reader, |chunk| {
            if let Some(byte) = reserved {
                if let Some(position) = chunk.iter().position(|&b| b == byte) {
                    return Err(HuffmanError::SentinelCollision {
                        offset: Some(offset + position as u64),
                        byte,
                    });
                }
            }
            for &byte in chunk {
                frequencies.counts[byte as usize] += 1;
            }
            offset += chunk.len() as u64;
            Ok(())
        })?;
        Ok(frequencies)
    }

    pub fn record(&mut self, symbol: Symbol) {
        self.counts[symbol.index()] += 1;
    }

    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts[symbol.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Symbols that occurred at least once, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .positions(|&count| count > 0)
            .filter_map(Symbol::from_index)
            .map(|symbol| (symbol, self.counts[symbol.index()]))
    }
}

impl FromIterator<(Symbol, u64)> for FrequencyMap {
    fn from_iter<T: IntoIterator<Item = (Symbol, u64)>>(iter: T) -> Self {
        let mut frequencies = FrequencyMap::default();
        for (symbol, count) in iter {
            frequencies.counts[symbol.index()] += count;
        }
        frequencies
    }
}
