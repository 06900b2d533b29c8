use thiserror::Error;

use crate::symbol::Symbol;

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// The source had no bytes, so there is nothing to build a tree from.
    #[error("cannot encode an empty input")]
    EmptyInput,

    /// A write was attempted on a read-mode buffer, or the other way round.
    #[error("invalid bit buffer mode: operation needs {expected}, buffer is {actual}")]
    InvalidMode {
        expected: &'static str,
        actual: &'static str,
    },

    /// The compressed stream ran out before the terminator leaf was reached.
    #[error("unexpected end of stream after {bits_read} bits")]
    EndOfStream { bits_read: u64 },

    #[error("symbol {symbol} has no code in the code table")]
    UnknownSymbol { symbol: Symbol },

    /// A byte equals the in-band terminator. `offset` is its position in the
    /// source, `None` when it is a leaf of a tree built by hand.
    #[error("byte {byte:#04x}{} collides with the in-band terminator", at_offset(.offset))]
    SentinelCollision { offset: Option<u64>, byte: u8 },

    #[error("corrupt tree section: {0}")]
    CorruptTree(String),

    #[error("invalid codec configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    pub fn corrupt_tree(message: impl Into<String>) -> Self {
        HuffmanError::CorruptTree(message.into())
    }
}

fn at_offset(offset: &Option<u64>) -> String {
    offset
        .map(|offset| format!(" at offset {offset}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::HuffmanError;

    #[test]
    fn test_sentinel_collision_message() {
        let in_source = HuffmanError::SentinelCollision {
            offset: Some(2),
            byte: 3,
        };
        assert_eq!(
            in_source.to_string(),
            "byte 0x03 at offset 2 collides with the in-band terminator"
        );

        let in_tree = HuffmanError::SentinelCollision {
            offset: None,
            byte: 3,
        };
        assert_eq!(
            in_tree.to_string(),
            "byte 0x03 collides with the in-band terminator"
        );
    }
}
