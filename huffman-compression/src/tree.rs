use itertools::Itertools;

use crate::{
    error::{HuffmanError, Result},
    frequency::FrequencyMap,
    min_heap::MinHeap,
    symbol::{Symbol, ALPHABET_SIZE},
};

/// A node of a Huffman tree. Weights are `None` for trees rebuilt from the
/// tree section of a compressed stream, where counts are not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        weight: Option<u64>,
    },
    Internal {
        weight: Option<u64>,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl From<(Symbol, u64)> for Node {
    fn from((symbol, count): (Symbol, u64)) -> Self {
        Node::Leaf {
            symbol,
            weight: Some(count),
        }
    }
}

impl Node {
    pub fn leaf(symbol: Symbol) -> Self {
        Node::Leaf {
            symbol,
            weight: None,
        }
    }

    /// Joins two subtrees; the weight is their sum when both are known.
    pub fn join(left: Node, right: Node) -> Self {
        let weight = left
            .weight()
            .zip(right.weight())
            .map(|(left, right)| left + right);
        Node::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> Option<u64> {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    pub fn new(root: Node) -> Self {
        HuffmanTree { root }
    }

    /// Builds the optimal prefix tree for `frequencies`.
    ///
    /// Leaves enter the queue in ascending symbol order and equal weights are
    /// extracted first-in first-out. The first node extracted becomes the left
    /// child. A map with a single symbol yields a lone leaf as root.
    pub fn from_frequencies(frequencies: &FrequencyMap) -> Result<Self> {
        let trees = Trees::from_iter(frequencies.iter().map_into());
        trees
            .merge()
            .map(HuffmanTree::new)
            .ok_or(HuffmanError::EmptyInput)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn weight(&self) -> Option<u64> {
        self.root.weight()
    }

    /// Leaf symbols in preorder (left before right).
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => symbols.push(*symbol),
                Node::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        symbols
    }

    /// Checks that every symbol appears at most once and that the
    /// terminator is present, so payload decoding can end.
    pub fn ensure_decodable(&self) -> Result<()> {
        let symbols = self.symbols();
        if symbols.len() > ALPHABET_SIZE {
            return Err(HuffmanError::corrupt_tree(format!(
                "{} leaves exceed the alphabet",
                symbols.len()
            )));
        }
        if let Some(duplicate) = symbols.iter().duplicates().next() {
            return Err(HuffmanError::corrupt_tree(format!(
                "symbol {duplicate} appears more than once"
            )));
        }
        if !symbols.contains(&Symbol::EndOfMessage) {
            return Err(HuffmanError::corrupt_tree("no terminator leaf"));
        }
        Ok(())
    }
}

struct Trees(MinHeap<Node>);

impl FromIterator<Node> for Trees {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        let mut heap = MinHeap::new();
        for node in iter {
            heap.insert(node.weight().unwrap_or_default(), node);
        }
        Self(heap)
    }
}

impl Trees {
    fn merge(mut self) -> Option<Node> {
        loop {
            match self.pop_lowest()? {
                PopResult::TreesToMerge { left, right } => {
                    let merged = Node::join(left, right);
                    self.insert(merged);
                }
                PopResult::Single(tree) => return Some(tree),
            }
        }
    }

    fn pop_lowest(&mut self) -> Option<PopResult> {
        let (_, left) = self.0.extract_min()?;

        let result = match self.0.extract_min() {
            Some((_, right)) => PopResult::TreesToMerge { left, right },
            None => PopResult::Single(left),
        };

        Some(result)
    }

    fn insert(&mut self, tree: Node) {
        self.0.insert(tree.weight().unwrap_or_default(), tree);
    }
}

enum PopResult {
    TreesToMerge { left: Node, right: Node },
    Single(Node),
}
