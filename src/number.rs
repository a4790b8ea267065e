/*!
# Numeric Literals

Reads the value of a [`TokenKind::Literal`](crate::tokenizer::TokenKind)
token straight from the buffer it was scanned from.

The integer readers accumulate decimal digits left to right and negate at the
end when the literal starts with `-`. They do not validate digits or detect
overflow: arithmetic wraps, and a span that is not an integer yields an
unspecified value.

```rust
use jsontok::number::{extract_integer, extract_integer_wide};
use jsontok::tokenizer;

let input = br#"[-123, 9000000000]"#;
let tokens = tokenizer::tokenize(tokenizer::init(), input)?;
assert_eq!(extract_integer(input, &tokens[0]), -123);
assert_eq!(extract_integer_wide(input, &tokens[1]), 9_000_000_000);
# Ok::<(), tokenizer::ScanError>(())
```
*/
use crate::tokenizer::Token;

macro_rules! decimal {
    ($name:ident, $int:ty) => {
        fn $name(digits: &[u8]) -> $int {
            let (negative, digits) = match digits.split_first() {
                Some((b'-', rest)) => (true, rest),
                _ => (false, digits),
            };
            let magnitude = digits.iter().fold(0 as $int, |acc, &b| {
                acc.wrapping_mul(10)
                    .wrapping_add(<$int>::from(b.wrapping_sub(b'0')))
            });
            if negative {
                magnitude.wrapping_neg()
            } else {
                magnitude
            }
        }
    };
}

decimal!(decimal_i32, i32);
decimal!(decimal_i64, i64);

/// Reads the integer spanned by `token` as an `i32`.
///
/// # Panics
///
/// Panics if `token` lies outside `input`.
#[must_use]
pub fn extract_integer(input: &[u8], token: &Token) -> i32 {
    decimal_i32(token.slice(input))
}

/// Reads the integer spanned by `token` as an `i64`.
///
/// # Panics
///
/// Panics if `token` lies outside `input`.
#[must_use]
pub fn extract_integer_wide(input: &[u8], token: &Token) -> i64 {
    decimal_i64(token.slice(input))
}

/// Parses the number spanned by `token` as a float, or `None` if the span is
/// not a number. Spans must start with a digit after an optional `-`, so
/// `nan`, `inf` and `-infinity` are rejected even though the standard library
/// parser takes them.
///
/// # Panics
///
/// Panics if `token` lies outside `input`.
#[must_use]
pub fn extract_float(input: &[u8], token: &Token) -> Option<f64> {
    let span = token.slice(input);
    let digits = span.strip_prefix(b"-").unwrap_or(span);
    if !digits.first().is_some_and(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(span).ok()?.parse().ok()
}
