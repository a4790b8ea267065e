//! # JSON Token
//!
//! Defines the tokens produced by scanning a JSON document byte sequence.
use serde::Serialize;
use std::fmt::Display;
use std::ops::Range;

/// The kind of value a token spans.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Number, `true`, `false` or `null`
    #[default]
    Literal,

    /// String value, quotes excluded from the span
    String,

    /// Object value, braces excluded from the span
    Object,

    /// Array value, brackets excluded from the span
    Array,
}

impl TokenKind {
    /// Whether the span of this kind sits between a pair of delimiters.
    #[must_use]
    pub const fn is_delimited(self) -> bool {
        !matches!(self, Self::Literal)
    }

    /// Whether this kind is an object or an array.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal => write!(f, "literal"),
            Self::String => write!(f, "string"),
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
        }
    }
}

/// One child value found by a scan.
///
/// A token only holds offsets into the buffer it was scanned from; it is
/// meaningless against any other buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    /// The kind of value
    pub kind: TokenKind,
    /// Offset of the first content byte
    pub start: usize,
    /// Number of content bytes
    pub length: usize,
}

impl Token {
    /// Creates a token spanning `length` bytes from `start`.
    #[must_use]
    pub const fn new(kind: TokenKind, start: usize, length: usize) -> Self {
        Self {
            kind,
            start,
            length,
        }
    }

    /// Offset one past the last content byte.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// The content span: `start..start + length`.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The span of the whole value, delimiters included.
    ///
    /// For strings this adds the quotes and for containers the brackets;
    /// literals have no delimiters, so this equals [`Token::range`].
    #[must_use]
    pub const fn outer_range(&self) -> Range<usize> {
        if self.kind.is_delimited() {
            self.start - 1..self.end() + 1
        } else {
            self.range()
        }
    }

    /// Borrows the content bytes from the buffer the token was scanned from.
    ///
    /// # Panics
    ///
    /// Panics if `input` is shorter than the token's span, which can only
    /// happen when it is not the buffer the token came from.
    #[must_use]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.range()]
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}..{}]", self.kind, self.start, self.end())
    }
}
