/*!
# Borrowed JSON Tree

Builds a navigable tree on top of the tokenizer by scanning each container
once it is reached: the root's scan yields its children, and every child
object or array is scanned again over its own span.

A [`Node`] owns no text. Keys, strings and literals are slices of the input
buffer, so a tree cannot outlive the bytes it was built from. Strings are
exposed raw: escape sequences are not decoded. Containers nested deeper than
[`MAX_DEPTH`] are refused.

[`select`] finds a single value without building the tree: it only scans the
containers along the path.

```rust
use jsontok::tokenizer;
use jsontok::tree::Node;

let input = br#"{"name": "jt", "sizes": [8, 16, 32], "debug": false}"#;
let root = Node::parse(tokenizer::init(), input)?;

assert_eq!(root.get("name").and_then(Node::as_str), Some("jt"));
assert_eq!(root.lookup(["sizes", "2"]).and_then(Node::as_i32), Some(32));
assert_eq!(root.get("debug").and_then(Node::as_bool), Some(false));
# Ok::<(), jsontok::tree::TreeError>(())
```
*/
use std::error::Error;
use std::fmt;

use crate::number::{extract_float, extract_integer, extract_integer_wide};
use crate::tokenizer::{ScanError, Tables, Token, TokenKind, tokenize};

/// A JSON value borrowed from its source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    /// Number, `true`, `false` or `null`
    Literal(&'a [u8]),
    /// String content, without the quotes and with escapes left in place
    String(&'a [u8]),
    /// Array and its items, in order
    Array {
        /// The array's bytes, brackets included
        source: &'a [u8],
        /// The array's items
        items: Vec<Node<'a>>,
    },
    /// Object and its members, in input order
    Object {
        /// The object's bytes, braces included
        source: &'a [u8],
        /// `(key, value)` pairs; keys are raw string content
        members: Vec<(&'a [u8], Node<'a>)>,
    },
}

/// Represents errors that can occur while building a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The input is not well-formed.
    Scan(ScanError),
    /// The top-level value is not an object or an array.
    NotAContainer {
        /// Offset of the first non-whitespace byte
        offset: usize,
    },
    /// An object ends with a key that has no value.
    DanglingKey {
        /// Offset of the key's opening quote
        offset: usize,
    },
    /// An object key that is not a string.
    NonStringKey {
        /// Offset of the key
        offset: usize,
    },
    /// Containers nest deeper than [`MAX_DEPTH`].
    TooDeep {
        /// Offset of the first container past the limit
        offset: usize,
    },
}

/// Deepest container nesting [`Node::parse`] accepts; the root is level 1.
pub const MAX_DEPTH: usize = 128;

impl From<ScanError> for TreeError {
    fn from(err: ScanError) -> Self {
        Self::Scan(err)
    }
}

impl Error for TreeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Scan(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan(_) => write!(f, "Malformed JSON"),
            Self::NotAContainer { offset } => {
                write!(f, "Expected an object or array at offset {offset}")
            }
            Self::DanglingKey { offset } => {
                write!(f, "Object key without a value at offset {offset}")
            }
            Self::NonStringKey { offset } => {
                write!(f, "Object key is not a string at offset {offset}")
            }
            Self::TooDeep { offset } => write!(
                f,
                "Nesting deeper than {MAX_DEPTH} levels at offset {offset}"
            ),
        }
    }
}

const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Whether `bytes` is an optionally negative run of decimal digits.
fn is_integer(bytes: &[u8]) -> bool {
    let digits = bytes.strip_prefix(b"-").unwrap_or(bytes);
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}

impl<'a> Node<'a> {
    /// Builds the tree for the object or array held in `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] if `input` is malformed, if its top-level
    /// value is not a container, if an object has a non-string key or a key
    /// without a value, or if containers nest deeper than [`MAX_DEPTH`].
    pub fn parse(tables: &Tables, input: &'a [u8]) -> Result<Self, TreeError> {
        let (kind, start, source) = root(input)?;
        let root = match kind {
            TokenKind::Object => object(tables, source, start, 1)?,
            _ => array(tables, source, start, 1)?,
        };
        log::debug!("built {} with {} children", root.kind(), root.len());
        Ok(root)
    }

    /// The kind of token this node was built from.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Literal(_) => TokenKind::Literal,
            Self::String(_) => TokenKind::String,
            Self::Array { .. } => TokenKind::Array,
            Self::Object { .. } => TokenKind::Object,
        }
    }

    /// The bytes of this value: the literal, the string content, or the
    /// whole container including its brackets.
    #[must_use]
    pub const fn source(&self) -> &'a [u8] {
        match self {
            Self::Literal(bytes) | Self::String(bytes) => *bytes,
            Self::Array { source, .. } | Self::Object { source, .. } => *source,
        }
    }

    /// Whether this is an object.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object { .. })
    }

    /// Whether this is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Whether this is the `null` literal.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Literal(b"null"))
    }

    /// The raw content of a string.
    #[must_use]
    pub const fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            Self::String(bytes) => Some(*bytes),
            _ => None,
        }
    }

    /// The raw content of a string, escapes not decoded.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.as_bytes()?).ok()
    }

    /// The value of a `true` or `false` literal.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Literal(b"true") => Some(true),
            Self::Literal(b"false") => Some(false),
            _ => None,
        }
    }

    fn integer_literal(&self) -> Option<(&'a [u8], Token)> {
        match self {
            Self::Literal(bytes) if is_integer(bytes) => {
                Some((*bytes, Token::new(TokenKind::Literal, 0, bytes.len())))
            }
            _ => None,
        }
    }

    /// The value of an integer literal, wrapping if it does not fit.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        let (bytes, token) = self.integer_literal()?;
        Some(extract_integer(bytes, &token))
    }

    /// The value of an integer literal, wrapping if it does not fit.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        let (bytes, token) = self.integer_literal()?;
        Some(extract_integer_wide(bytes, &token))
    }

    /// The value of a numeric literal.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Literal(bytes) => extract_float(
                bytes,
                &Token::new(TokenKind::Literal, 0, bytes.len()),
            ),
            _ => None,
        }
    }

    /// Number of items or members; `0` for strings and literals.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Array { items, .. } => items.len(),
            Self::Object { members, .. } => members.len(),
            _ => 0,
        }
    }

    /// Whether this node has no items or members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The members of an object, in input order; empty for anything else.
    #[must_use]
    pub fn members(&self) -> &[(&'a [u8], Self)] {
        match self {
            Self::Object { members, .. } => members,
            _ => &[],
        }
    }

    /// The items of an array; empty for anything else.
    #[must_use]
    pub fn items(&self) -> &[Self] {
        match self {
            Self::Array { items, .. } => items,
            _ => &[],
        }
    }

    /// The value of `key` in an object. With duplicate keys the last one
    /// wins.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.members()
            .iter()
            .rev()
            .find(|(k, _)| *k == key.as_bytes())
            .map(|(_, value)| value)
    }

    /// The item at `index` in an array.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Self> {
        self.items().get(index)
    }

    /// Follows `path` down the tree. Each segment is an object key, or an
    /// array index when the current node is an array.
    #[must_use]
    pub fn lookup<'p, I>(&self, path: I) -> Option<&Self>
    where
        I: IntoIterator<Item = &'p str>,
    {
        path.into_iter().try_fold(self, |node, segment| match node {
            Self::Object { .. } => node.get(segment),
            Self::Array { .. } => node.get_index(segment.parse().ok()?),
            _ => None,
        })
    }
}

/// Finds the value at `path` below the top-level container of `input`, and
/// returns its kind and bytes as [`Node::source`] would. Only the containers
/// along the path are scanned, so nesting depth is not limited.
///
/// Returns `Ok(None)` when a segment names a missing key, an index out of
/// range, or steps into a string or literal.
///
/// ```rust
/// use jsontok::tokenizer::{self, TokenKind};
/// use jsontok::tree::select;
///
/// let input = br#"{"a": [1, {"b": "c"}]}"#;
/// let found = select(tokenizer::init(), input, ["a", "1"])?;
/// assert_eq!(found, Some((TokenKind::Object, &br#"{"b": "c"}"#[..])));
/// # Ok::<(), jsontok::tree::TreeError>(())
/// ```
///
/// # Errors
///
/// Returns a [`TreeError`] if `input` has no top-level container, or if a
/// container on the path is malformed.
pub fn select<'a, 'p, I>(
    tables: &Tables,
    input: &'a [u8],
    path: I,
) -> Result<Option<(TokenKind, &'a [u8])>, TreeError>
where
    I: IntoIterator<Item = &'p str>,
{
    let (mut kind, mut base, mut source) = root(input)?;
    for segment in path {
        let tokens = children(tables, source, base)?;
        let found = match kind {
            TokenKind::Object => {
                check_members(&tokens, base)?;
                tokens
                    .chunks_exact(2)
                    .rev()
                    .find(|pair| pair[0].slice(source) == segment.as_bytes())
                    .map(|pair| &pair[1])
            }
            TokenKind::Array => segment.parse::<usize>().ok().and_then(|i| tokens.get(i)),
            _ => None,
        };
        let Some(token) = found else {
            return Ok(None);
        };
        let range = match token.kind {
            TokenKind::Object | TokenKind::Array => token.outer_range(),
            _ => token.range(),
        };
        kind = token.kind;
        base += range.start;
        source = &source[range];
    }
    Ok(Some((kind, source)))
}

/// Trims `input` down to its top-level container and returns the
/// container's kind, offset and bytes.
fn root(input: &[u8]) -> Result<(TokenKind, usize, &[u8]), TreeError> {
    let start = input
        .iter()
        .position(|&b| !is_whitespace(b))
        .ok_or(TreeError::NotAContainer { offset: 0 })?;
    let end = input
        .iter()
        .rposition(|&b| !is_whitespace(b))
        .map_or(input.len(), |last| last + 1);
    let source = &input[start..end];
    match source[0] {
        b'{' => Ok((TokenKind::Object, start, source)),
        b'[' => Ok((TokenKind::Array, start, source)),
        _ => Err(TreeError::NotAContainer { offset: start }),
    }
}

/// Builds the node for the child `token` of `parent`, which starts at
/// `base` in the original input and sits at nesting level `depth`. The
/// child itself is one level deeper.
fn child<'a>(
    tables: &Tables,
    parent: &'a [u8],
    token: &Token,
    base: usize,
    depth: usize,
) -> Result<Node<'a>, TreeError> {
    let outer = token.outer_range();
    let offset = base + outer.start;
    if token.kind.is_container() && depth >= MAX_DEPTH {
        return Err(TreeError::TooDeep { offset });
    }
    match token.kind {
        TokenKind::Literal => Ok(Node::Literal(token.slice(parent))),
        TokenKind::String => Ok(Node::String(token.slice(parent))),
        TokenKind::Object => object(tables, &parent[outer], offset, depth + 1),
        TokenKind::Array => array(tables, &parent[outer], offset, depth + 1),
    }
}

fn children(
    tables: &Tables,
    source: &[u8],
    base: usize,
) -> Result<Vec<Token>, TreeError> {
    let tokens = tokenize(tables, source).map_err(|err| err.offset_by(base))?;
    log::trace!("{} children at offset {base}", tokens.len());
    Ok(tokens)
}

/// Checks that object tokens pair up as string keys and values.
fn check_members(tokens: &[Token], base: usize) -> Result<(), TreeError> {
    let mut pairs = tokens.chunks_exact(2);
    let mut keys = pairs.by_ref().map(|pair| &pair[0]);
    if let Some(key) = keys.find(|key| key.kind != TokenKind::String) {
        return Err(TreeError::NonStringKey {
            offset: base + key.outer_range().start,
        });
    }
    if let [key] = pairs.remainder() {
        return Err(TreeError::DanglingKey {
            offset: base + key.outer_range().start,
        });
    }
    Ok(())
}

fn object<'a>(
    tables: &Tables,
    source: &'a [u8],
    base: usize,
    depth: usize,
) -> Result<Node<'a>, TreeError> {
    let tokens = children(tables, source, base)?;
    check_members(&tokens, base)?;
    let members = tokens
        .chunks_exact(2)
        .map(|pair| {
            child(tables, source, &pair[1], base, depth)
                .map(|value| (pair[0].slice(source), value))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::Object { source, members })
}

fn array<'a>(
    tables: &Tables,
    source: &'a [u8],
    base: usize,
    depth: usize,
) -> Result<Node<'a>, TreeError> {
    let items = children(tables, source, base)?
        .iter()
        .map(|token| child(tables, source, token, base, depth))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::Array { source, items })
}
