//! # JSON Lexer
//!
//! Scans a JSON byte sequence once, left to right, and records a [`Token`]
//! for every immediate child of the top-level value. Nested values are
//! walked but not recorded; scan a child's [`Token::outer_range`] to get its
//! own children.
//!
//! The scan never allocates. Callers either pass an empty token buffer to
//! count the children, or a buffer to fill:
//!
//! ```rust
//! use jsontok::tokenizer::{self, Scan, Token, TokenKind};
//!
//! let tables = tokenizer::init();
//! let input = br#"{"a":1,"b":[true]}"#;
//!
//! let Scan::Complete(count) = tokenizer::scan(tables, input, &mut [])? else {
//!     unreachable!("count mode never truncates");
//! };
//! let mut tokens = vec![Token::default(); count];
//! tokenizer::scan(tables, input, &mut tokens)?;
//!
//! assert_eq!(tokens[3].kind, TokenKind::Array);
//! assert_eq!(tokens[3].slice(input), b"true");
//! # Ok::<(), tokenizer::ScanError>(())
//! ```
use std::error::Error;
use std::fmt;

use crate::tokenizer::table::{Op, State, Tables};
use crate::tokenizer::{Token, TokenKind};

/// Successful outcome of [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Every token was counted or written; holds the token count.
    Complete(usize),
    /// The output buffer filled up before the end of the input; holds the
    /// buffer's capacity. Rescan with a larger buffer to get every token.
    Truncated(usize),
}

impl Scan {
    /// The number of tokens now in the output buffer (or counted, for a
    /// count-mode scan).
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Complete(n) | Self::Truncated(n) => n,
        }
    }

    /// Whether no tokens were produced.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether the output buffer was too small.
    #[must_use]
    pub const fn is_truncated(self) -> bool {
        matches!(self, Self::Truncated(_))
    }
}

/// Represents the ways a byte sequence can fail to scan as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// A byte that is not valid in the current lexer state.
    UnexpectedByte {
        /// Offset of the byte
        offset: usize,
        /// The rejected byte
        byte: u8,
    },
    /// A `]` or `}` with nothing open.
    UnbalancedClose {
        /// Offset of the closing bracket
        offset: usize,
    },
    /// The input ended inside a string, an escape, a multi-byte character or
    /// an open container.
    UnexpectedEnd {
        /// Nesting depth at the end of the input
        depth: usize,
    },
    /// A second value after the top-level value was complete.
    TrailingValue {
        /// Offset of the first byte of the extra value
        offset: usize,
    },
}

impl ScanError {
    /// Shifts the reported offset by `base`, for errors found while scanning
    /// a sub-span of a larger buffer.
    #[must_use]
    pub const fn offset_by(self, base: usize) -> Self {
        match self {
            Self::UnexpectedByte { offset, byte } => Self::UnexpectedByte {
                offset: offset + base,
                byte,
            },
            Self::UnbalancedClose { offset } => Self::UnbalancedClose {
                offset: offset + base,
            },
            Self::TrailingValue { offset } => Self::TrailingValue {
                offset: offset + base,
            },
            Self::UnexpectedEnd { .. } => self,
        }
    }
}

impl Error for ScanError {}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedByte { offset, byte } => {
                write!(f, "Unexpected byte {byte:#04x} at offset {offset}")
            }
            Self::UnbalancedClose { offset } => {
                write!(f, "Unbalanced closing bracket at offset {offset}")
            }
            Self::UnexpectedEnd { depth } => {
                write!(f, "Unexpected end of input at depth {depth}")
            }
            Self::TrailingValue { offset } => {
                write!(f, "Trailing value at offset {offset}")
            }
        }
    }
}

/// Where tokens go: the caller's buffer, or nowhere when only counting.
struct Sink<'o> {
    out: &'o mut [Token],
    total: usize,
}

impl<'o> Sink<'o> {
    const fn new(out: &'o mut [Token]) -> Self {
        Self { out, total: 0 }
    }

    fn push(&mut self, token: Token) {
        if let Some(slot) = self.out.get_mut(self.total) {
            *slot = token;
        }
        self.total += 1;
    }

    const fn finish(self) -> Scan {
        if !self.out.is_empty() && self.total > self.out.len() {
            Scan::Truncated(self.out.len())
        } else {
            Scan::Complete(self.total)
        }
    }
}

/// The scan loop's state between bytes.
struct Lexer<'t> {
    tables: &'t Tables,
    state: State,
    /// `[`/`{` nesting relative to the start of the input
    depth: usize,
    /// Continuation bytes still owed by the current UTF-8 character
    utf8_remaining: u8,
    /// Depth-1 token whose end has not been seen yet
    pending: Token,
    /// Whether the top-level value has been completed
    closed: bool,
}

impl<'t> Lexer<'t> {
    const fn new(tables: &'t Tables) -> Self {
        Self {
            tables,
            state: State::Structural,
            depth: 0,
            utf8_remaining: 0,
            pending: Token::new(TokenKind::Literal, 0, 0),
            closed: false,
        }
    }

    /// A value begins at `offset`. Records it if it is a child of the
    /// top-level value.
    const fn open(
        &mut self,
        kind: TokenKind,
        offset: usize,
        content: usize,
    ) -> Result<(), ScanError> {
        if self.depth == 0 && self.closed {
            return Err(ScanError::TrailingValue { offset });
        }
        if self.depth == 1 {
            self.pending = Token::new(kind, content, 0);
        }
        Ok(())
    }

    /// The value opened last ends just before `end`.
    fn close(&mut self, end: usize, sink: &mut Sink<'_>) {
        match self.depth {
            0 => self.closed = true,
            1 => {
                self.pending.length = end - self.pending.start;
                sink.push(self.pending);
            }
            _ => {}
        }
    }

    fn run(
        &mut self,
        input: &[u8],
        sink: &mut Sink<'_>,
    ) -> Result<(), ScanError> {
        let mut pos = 0;
        while let Some(&byte) = input.get(pos) {
            match self.tables.op(self.state, byte) {
                Op::Bad => {
                    return Err(ScanError::UnexpectedByte { offset: pos, byte });
                }
                Op::Loop => {}
                Op::Up => {
                    let kind = if byte == b'[' {
                        TokenKind::Array
                    } else {
                        TokenKind::Object
                    };
                    self.open(kind, pos, pos + 1)?;
                    self.depth += 1;
                }
                Op::Down => {
                    self.depth = self
                        .depth
                        .checked_sub(1)
                        .ok_or(ScanError::UnbalancedClose { offset: pos })?;
                    self.close(pos, sink);
                }
                Op::QuoteUp => {
                    self.open(TokenKind::String, pos, pos + 1)?;
                    self.state = State::String;
                }
                Op::QuoteDown => {
                    self.state = State::Structural;
                    self.close(pos, sink);
                }
                Op::Escape => self.state = State::Escape,
                Op::Unescape => self.state = State::String,
                Op::Bare => {
                    self.open(TokenKind::Literal, pos, pos)?;
                    self.state = State::Bare;
                }
                Op::Unbare => {
                    self.close(pos, sink);
                    self.state = State::Structural;
                    // the terminator still needs its structural meaning
                    continue;
                }
                Op::Utf8Lead2 => self.expect_continuation(1),
                Op::Utf8Lead3 => self.expect_continuation(2),
                Op::Utf8Lead4 => self.expect_continuation(3),
                Op::Utf8Continue => {
                    self.utf8_remaining -= 1;
                    if self.utf8_remaining == 0 {
                        self.state = State::String;
                    }
                }
            }
            pos += 1;
        }

        match self.state {
            State::Structural if self.depth == 0 => Ok(()),
            // a top-level literal is terminated by the end of the input
            State::Bare if self.depth == 0 => {
                self.close(input.len(), sink);
                Ok(())
            }
            _ => Err(ScanError::UnexpectedEnd { depth: self.depth }),
        }
    }

    const fn expect_continuation(&mut self, count: u8) {
        self.utf8_remaining = count;
        self.state = State::Utf8Continuation;
    }
}

/// Scans `input` and records the immediate children of its top-level value.
///
/// With an empty `out`, the scan only counts tokens and returns
/// [`Scan::Complete`] with the count, which can be used to size a buffer for
/// a second call. Otherwise up to `out.len()` tokens are written; if there
/// are more, [`Scan::Truncated`] reports the capacity and the remaining
/// tokens are dropped. Token offsets are relative to `input`.
///
/// # Errors
///
/// Returns a [`ScanError`] if `input` is not a single well-formed JSON value
/// (as far as the transition tables check). Tokens already written to `out`
/// must then be ignored.
pub fn scan(
    tables: &Tables,
    input: &[u8],
    out: &mut [Token],
) -> Result<Scan, ScanError> {
    let mut sink = Sink::new(out);
    let mut lexer = Lexer::new(tables);
    if let Err(err) = lexer.run(input, &mut sink) {
        log::debug!("scan of {} bytes failed: {err}", input.len());
        return Err(err);
    }
    Ok(sink.finish())
}

/// Collapsing form of [`scan`], returning a bare count.
///
/// Returns the token count, the capacity of `out` when the output was
/// truncated, and `0` for malformed input. Malformed input is therefore
/// indistinguishable from a value with no children; use [`scan`] to tell
/// them apart.
#[must_use]
pub fn scan_legacy(tables: &Tables, input: &[u8], out: &mut [Token]) -> usize {
    scan(tables, input, out).map_or(0, Scan::len)
}

/// Scans `input` twice, once to count and once to fill, and returns every
/// token.
///
/// # Errors
///
/// Returns a [`ScanError`] if `input` is malformed.
pub fn tokenize(tables: &Tables, input: &[u8]) -> Result<Vec<Token>, ScanError> {
    let count = scan(tables, input, &mut [])?.len();
    let mut tokens = vec![Token::default(); count];
    if count > 0 {
        scan(tables, input, &mut tokens)?;
    }
    Ok(tokens)
}
