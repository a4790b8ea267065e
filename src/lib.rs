/*!
# `jsontok` Library

Table-driven JSON tokenizer. A scan walks the input once without allocating
and reports the byte spans of the top-level value's children; the [`tree`]
module builds a borrowed, navigable tree by scanning one level at a time.
*/

pub mod commands;
pub mod number;
pub mod tokenizer;
pub mod tree;
pub mod utils;

// Re-exports
pub use tokenizer::{Scan, ScanError, Tables, Token, TokenKind};
pub use tree::{Node, TreeError};
