//! Tree section of the compressed format.
//!
//! Nodes are written in preorder. Each node starts with a tag bit: `1` for a
//! leaf, followed by its symbol field, or `0` for an internal node, followed by
//! its left and then its right subtree. The symbol field is 8 bits wide with an
//! in-band terminator and 9 bits wide with the out-of-band one.

use crate::{
    bit_buffer::BitBuffer,
    error::{HuffmanError, Result},
    symbol::{Symbol, Terminator, ALPHABET_SIZE},
    tree::{HuffmanTree, Node},
};

const LEAF: bool = true;
const INTERNAL: bool = false;

/// Writes `tree` and returns the number of bits it took.
///
/// A byte leaf equal to an in-band terminator could not be told apart from
/// the terminator on the way back, so it is refused with
/// [`HuffmanError::SentinelCollision`].
pub fn write_tree(
    tree: &HuffmanTree,
    buffer: &mut BitBuffer<'_>,
    terminator: Terminator,
) -> Result<u64> {
    let start = buffer.bits_processed();
    let width = terminator.symbol_width();
    let reserved = terminator.reserved_byte();
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        match node {
            Node::Leaf {
                symbol: Symbol::Byte(byte),
                ..
            } if Some(*byte) == reserved => {
                return Err(HuffmanError::SentinelCollision {
                    offset: None,
                    byte: *byte,
                });
            }
            Node::Leaf { symbol, .. } => {
                buffer.write_bit(LEAF)?;
                buffer.write_bits(terminator.wire_value(*symbol), width)?;
            }
            Node::Internal { left, right, .. } => {
                buffer.write_bit(INTERNAL)?;
                stack.push(right);
                stack.push(left);
            }
        }
    }
    Ok(buffer.bits_processed() - start)
}

/// Reads a tree written by [`write_tree`].
///
/// Leaf symbols must be distinct, which bounds the section to
/// `ALPHABET_SIZE` leaves; anything else is a [`HuffmanError::CorruptTree`].
pub fn read_tree(buffer: &mut BitBuffer<'_>, terminator: Terminator) -> Result<HuffmanTree> {
    let width = terminator.symbol_width();
    let mut seen = [false; ALPHABET_SIZE];
    // internal nodes still waiting for children, holding the left one once read
    let mut pending: Vec<Option<Node>> = Vec::new();
    let mut internal_nodes = 0;

    loop {
        if buffer.read_bit()? == INTERNAL {
            internal_nodes += 1;
            if internal_nodes >= ALPHABET_SIZE {
                return Err(HuffmanError::corrupt_tree(format!(
                    "more than {} internal nodes",
                    ALPHABET_SIZE - 1
                )));
            }
            pending.push(None);
            continue;
        }

        let value = buffer.read_bits(width)?;
        let symbol = terminator.symbol_for(value).ok_or_else(|| {
            HuffmanError::corrupt_tree(format!("leaf value {value} is out of range"))
        })?;
        if std::mem::replace(&mut seen[symbol.index()], true) {
            return Err(HuffmanError::corrupt_tree(format!(
                "symbol {symbol} appears more than once"
            )));
        }

        let mut node = Node::leaf(symbol);
        loop {
            match pending.pop() {
                None => return Ok(HuffmanTree::new(node)),
                Some(None) => {
                    pending.push(Some(node));
                    break;
                }
                Some(Some(left)) => node = Node::join(left, node),
            }
        }
    }
}
