//! # Tokenizer/ Lexer
//!
//! Scans an input sequence of bytes from a JSON document into the spans of
//! the top-level value's children, driven by the transition tables in
//! [`table`].
pub mod lexer;
pub mod table;
pub mod token;

// Re-exports
pub use lexer::{Scan, ScanError, scan, scan_legacy, tokenize};
pub use table::{Tables, init};
pub use token::{Token, TokenKind};
