use std::collections::BTreeMap;

use bit_vec::BitVec;

use crate::{
    error::{HuffmanError, Result},
    symbol::Symbol,
    tree::{HuffmanTree, Node},
};

/// Symbol to code mapping. Left edges are `false`, right edges `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable(BTreeMap<Symbol, BitVec>);

impl CodeTable {
    pub fn code(&self, symbol: Symbol) -> Result<&BitVec> {
        self.0
            .get(&symbol)
            .ok_or(HuffmanError::UnknownSymbol { symbol })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BitVec)> + Clone + '_ {
        self.0.iter().map(|(symbol, code)| (*symbol, code))
    }
}

impl From<&HuffmanTree> for CodeTable {
    /// A tree made of a single leaf gets the one-bit code `0`.
    fn from(tree: &HuffmanTree) -> Self {
        let mut result = BTreeMap::new();
        let mut code = BitVec::new();
        if let Node::Leaf { symbol, .. } = tree.root() {
            code.push(false);
            result.insert(*symbol, code);
        } else {
            generate_codes_inner(tree.root(), &mut code, &mut result);
        }
        CodeTable(result)
    }
}

fn generate_codes_inner(
    node: &Node,
    current_code: &mut BitVec,
    result: &mut BTreeMap<Symbol, BitVec>,
) {
    match node {
        Node::Leaf { symbol, .. } => {
            result.insert(*symbol, current_code.clone());
        }
        Node::Internal { left, right, .. } => {
            current_code.push(false);
            generate_codes_inner(left, current_code, result);
            current_code.pop();

            current_code.push(true);
            generate_codes_inner(right, current_code, result);
            current_code.pop();
        }
    }
}
