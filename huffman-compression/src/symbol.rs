use std::fmt;

/// Number of distinct symbols: every byte value plus the terminator.
pub const ALPHABET_SIZE: usize = 257;

/// One unit of the source alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Byte(u8),
    EndOfMessage,
}

impl Symbol {
    /// Position of the symbol in a dense `ALPHABET_SIZE` table.
    pub fn index(self) -> usize {
        match self {
            Symbol::Byte(byte) => byte as usize,
            Symbol::EndOfMessage => ALPHABET_SIZE - 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=255 => Some(Symbol::Byte(index as u8)),
            256 => Some(Symbol::EndOfMessage),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Byte(byte) => write!(f, "{byte:#04x}"),
            Symbol::EndOfMessage => write!(f, "<eom>"),
        }
    }
}

/// How the end-of-message marker is laid out in the tree section.
///
/// `OutOfBand` widens every leaf's symbol field to 9 bits so the terminator is
/// a genuine 257th value. `InBand` keeps 8-bit leaves and reuses one byte value
/// as the terminator, which means sources containing that byte are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Terminator {
    #[default]
    OutOfBand,
    InBand(u8),
}

impl Terminator {
    /// End-of-text, the byte the legacy format reserves.
    pub const LEGACY: Terminator = Terminator::InBand(3);

    /// Width in bits of a leaf's symbol field.
    pub fn symbol_width(self) -> u32 {
        match self {
            Terminator::OutOfBand => 9,
            Terminator::InBand(_) => 8,
        }
    }

    /// Value written into a leaf's symbol field.
    pub fn wire_value(self, symbol: Symbol) -> u16 {
        match (self, symbol) {
            (_, Symbol::Byte(byte)) => byte as u16,
            (Terminator::OutOfBand, Symbol::EndOfMessage) => 256,
            (Terminator::InBand(sentinel), Symbol::EndOfMessage) => sentinel as u16,
        }
    }

    /// Maps a leaf's symbol field back to a symbol, `None` if out of range.
    pub fn symbol_for(self, value: u16) -> Option<Symbol> {
        match self {
            Terminator::OutOfBand => Symbol::from_index(value as usize),
            Terminator::InBand(sentinel) if value == sentinel as u16 => Some(Symbol::EndOfMessage),
            Terminator::InBand(_) => u8::try_from(value).ok().map(Symbol::Byte),
        }
    }

    /// The reserved byte, if this terminator occupies one.
    pub fn reserved_byte(self) -> Option<u8> {
        match self {
            Terminator::OutOfBand => None,
            Terminator::InBand(sentinel) => Some(sentinel),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Symbol, Terminator};

    #[rstest]
    #[case(Terminator::OutOfBand, Symbol::Byte(3), 3)]
    #[case(Terminator::OutOfBand, Symbol::EndOfMessage, 256)]
    #[case(Terminator::LEGACY, Symbol::EndOfMessage, 3)]
    #[case(Terminator::InBand(0xff), Symbol::Byte(0), 0)]
    fn test_wire_value_maps_back(
        #[case] terminator: Terminator,
        #[case] symbol: Symbol,
        #[case] expected: u16,
    ) {
        let value = terminator.wire_value(symbol);
        assert_eq!(value, expected);
        assert_eq!(terminator.symbol_for(value), Some(symbol));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert_eq!(Terminator::OutOfBand.symbol_for(257), None);
        assert_eq!(Terminator::LEGACY.symbol_for(256), None);
    }

    #[test]
    fn test_terminator_sorts_after_every_byte() {
        assert!(Symbol::Byte(u8::MAX) < Symbol::EndOfMessage);
        assert_eq!(
            Symbol::from_index(Symbol::EndOfMessage.index()),
            Some(Symbol::EndOfMessage)
        );
    }
}
