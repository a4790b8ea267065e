//! Miscellaneous utility functions.

use anyhow::Context as _;
use colored::{ColoredString, Colorize};
use std::io::Write;
use std::io::{self, ErrorKind};

use crate::tokenizer::{Token, TokenKind};

/// Longest token text shown in a listing before it is elided.
const PREVIEW_LEN: usize = 60;

/// Returns the token's value as it appears in `input`, delimiters included,
/// cut down to [`PREVIEW_LEN`] characters.
#[must_use]
pub fn preview(input: &[u8], token: &Token) -> String {
    let text = String::from_utf8_lossy(&input[token.outer_range()]);
    let mut chars = text.chars();
    let mut shown: String = chars.by_ref().take(PREVIEW_LEN).collect();
    if chars.next().is_some() {
        shown.push('…');
    }
    shown
}

fn paint(kind: TokenKind, text: &str) -> ColoredString {
    match kind {
        TokenKind::Literal => text.yellow(),
        TokenKind::String => text.green(),
        TokenKind::Object => text.cyan(),
        TokenKind::Array => text.magenta(),
    }
}

/// Write one line per token to `writer`: index, kind, byte range and a
/// preview of the text. Silently returns `Ok(())` on broken pipe so that
/// piping to tools like `less` or `head` exits cleanly.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_token_listing<W: Write>(
    writer: &mut W,
    input: &[u8],
    tokens: &[Token],
) -> anyhow::Result<()> {
    let result = (|| -> io::Result<()> {
        for (i, token) in tokens.iter().enumerate() {
            let kind = format!("{:<7}", token.kind);
            writeln!(
                writer,
                "{:>4}  {}  {:>6}..{:<6}  {}",
                i.to_string().dimmed(),
                paint(token.kind, &kind).bold(),
                token.start,
                token.end(),
                paint(token.kind, &preview(input, token)),
            )?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("write token listing to stdout"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_includes_delimiters() {
        let input = br#"{"key":[1,2]}"#;
        let key = Token::new(TokenKind::String, 2, 3);
        let list = Token::new(TokenKind::Array, 8, 3);
        assert_eq!(preview(input, &key), "\"key\"");
        assert_eq!(preview(input, &list), "[1,2]");
    }

    #[test]
    fn preview_elides_long_values() {
        let body = "x".repeat(100);
        let input = format!("[\"{body}\"]");
        let token = Token::new(TokenKind::String, 2, 100);
        let shown = preview(input.as_bytes(), &token);
        assert_eq!(shown.chars().count(), PREVIEW_LEN + 1);
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn listing_has_one_line_per_token() {
        colored::control::set_override(false);
        let input = br#"{"a":true}"#;
        let tokens = [
            Token::new(TokenKind::String, 2, 1),
            Token::new(TokenKind::Literal, 5, 4),
        ];
        let mut out = Vec::new();
        write_token_listing(&mut out, input, &tokens).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("string"));
        assert!(lines[0].ends_with("\"a\""));
        assert!(lines[1].contains("5..9"));
        assert!(lines[1].ends_with("true"));
    }
}
