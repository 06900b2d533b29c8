//! Static Huffman compression of arbitrary byte streams.
//!
//! The compressed form is self-describing: a preorder dump of the code tree
//! followed by the code of every source byte and a final terminator symbol,
//! packed most significant bit first.
//!
//! ```
//! use huffman_compression::{Decoder, Encoder};
//!
//! let encoded = Encoder::default().encode(b"abracadabra")?;
//! let decoded = Decoder::default().decode(&encoded)?;
//! assert_eq!(decoded, b"abracadabra");
//! # Ok::<(), huffman_compression::HuffmanError>(())
//! ```

pub mod bit_buffer;
pub mod config;
pub mod decode;
pub mod encode;
pub mod encode_decode;
pub mod error;
pub mod frequency;
pub mod min_heap;
pub mod prefix_code_table;
pub mod symbol;
pub mod tree;
pub mod tree_codec;

pub use config::CodecConfig;
pub use decode::{DecodeSummary, Decoder};
pub use encode::{EncodeSummary, Encoder};
pub use error::{HuffmanError, Result};
pub use symbol::{Symbol, Terminator};
