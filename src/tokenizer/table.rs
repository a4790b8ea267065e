//! # Transition Tables
//!
//! One 256-entry opcode table per lexer state. Every entry defaults to
//! [`Op::Bad`]; each table then whitelists the bytes that are valid while the
//! lexer is in that state.
//!
//! The tables are built by `const fn`s, so the shared copy returned by
//! [`init`] lives in read-only static memory and can be used from any number
//! of threads at once.

/// The action the scan loop performs for a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Reject the byte: the input is malformed at this position.
    Bad,
    /// Consume the byte without changing state.
    Loop,
    /// `[` or `{`: one level deeper.
    Up,
    /// `]` or `}`: one level shallower.
    Down,
    /// Opening quote of a string.
    QuoteUp,
    /// Closing quote of a string.
    QuoteDown,
    /// Backslash inside a string.
    Escape,
    /// The byte following a backslash.
    Unescape,
    /// First byte of a number, `true`, `false` or `null`.
    Bare,
    /// Byte terminating a bare literal. The byte is examined again by the
    /// structural table.
    Unbare,
    /// Lead byte of a 2-byte UTF-8 sequence.
    Utf8Lead2,
    /// Lead byte of a 3-byte UTF-8 sequence.
    Utf8Lead3,
    /// Lead byte of a 4-byte UTF-8 sequence.
    Utf8Lead4,
    /// UTF-8 continuation byte.
    Utf8Continue,
}

/// Lexer states, one per transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Outside strings and literals: punctuation and value starts.
    Structural,
    /// Inside a number, `true`, `false` or `null`.
    Bare,
    /// Inside a string body.
    String,
    /// Waiting on the continuation bytes of a multi-byte UTF-8 character.
    Utf8Continuation,
    /// Right after a backslash inside a string.
    Escape,
}

type Table = [Op; 256];

/// The five transition tables of the lexer.
///
/// Construct one with [`Tables::new`] or borrow the process-wide copy from
/// [`init`]. A `Tables` is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    structural: Table,
    bare: Table,
    string: Table,
    utf8_continuation: Table,
    escape: Table,
}

static TABLES: Tables = Tables::new();

/// Returns the shared, read-only transition tables.
///
/// Calling this any number of times, from any thread, always returns the same
/// tables.
#[must_use]
pub fn init() -> &'static Tables {
    &TABLES
}

impl Tables {
    /// Builds a fresh set of transition tables.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            structural: structural(),
            bare: bare(),
            string: string(),
            utf8_continuation: utf8_continuation(),
            escape: escape(),
        }
    }

    /// Looks up the opcode for `byte` in the table of `state`.
    #[inline]
    #[must_use]
    pub const fn op(&self, state: State, byte: u8) -> Op {
        let table = match state {
            State::Structural => &self.structural,
            State::Bare => &self.bare,
            State::String => &self.string,
            State::Utf8Continuation => &self.utf8_continuation,
            State::Escape => &self.escape,
        };
        table[byte as usize]
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

const fn set(mut table: Table, bytes: &[u8], op: Op) -> Table {
    let mut i = 0;
    while i < bytes.len() {
        table[bytes[i] as usize] = op;
        i += 1;
    }
    table
}

/// Sets every entry in `lo..=hi`.
const fn fill(mut table: Table, lo: u8, hi: u8, op: Op) -> Table {
    let mut b = lo as usize;
    while b <= hi as usize {
        table[b] = op;
        b += 1;
    }
    table
}

const WHITESPACE: &[u8] = b"\t\r\n ";

const fn structural() -> Table {
    let mut t = [Op::Bad; 256];
    t = set(t, WHITESPACE, Op::Loop);
    t = set(t, b":,", Op::Loop);
    t = set(t, b"\"", Op::QuoteUp);
    t = set(t, b"[{", Op::Up);
    t = set(t, b"]}", Op::Down);
    t = set(t, b"-", Op::Bare);
    t = fill(t, b'0', b'9', Op::Bare);
    // true, false, null
    set(t, b"tfn", Op::Bare)
}

const fn bare() -> Table {
    // Any printable byte continues a literal; number grammar is not checked.
    let mut t = fill([Op::Bad; 256], 0x20, 0x7E, Op::Loop);
    t = set(t, WHITESPACE, Op::Unbare);
    set(t, b",]}", Op::Unbare)
}

const fn string() -> Table {
    let mut t = fill([Op::Bad; 256], 0x20, 0x7E, Op::Loop);
    t = set(t, b"\\", Op::Escape);
    t = set(t, b"\"", Op::QuoteDown);
    t = fill(t, 0xC0, 0xDF, Op::Utf8Lead2);
    t = fill(t, 0xE0, 0xEF, Op::Utf8Lead3);
    fill(t, 0xF0, 0xF7, Op::Utf8Lead4)
}

const fn utf8_continuation() -> Table {
    fill([Op::Bad; 256], 0x80, 0xBF, Op::Utf8Continue)
}

const fn escape() -> Table {
    set([Op::Bad; 256], b"\"\\bfnrtu", Op::Unescape)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(tables: &Tables, state: State, op: Op) -> usize {
        (0..=u8::MAX).filter(|&b| tables.op(state, b) == op).count()
    }

    #[test]
    fn init_is_idempotent() {
        assert!(std::ptr::eq(init(), init()));
        assert_eq!(*init(), Tables::new());
    }

    #[test]
    fn structural_table() {
        let t = init();
        for b in *b" \t\r\n:," {
            assert_eq!(t.op(State::Structural, b), Op::Loop, "{b:#x}");
        }
        assert_eq!(t.op(State::Structural, b'"'), Op::QuoteUp);
        assert_eq!(t.op(State::Structural, b'['), Op::Up);
        assert_eq!(t.op(State::Structural, b'{'), Op::Up);
        assert_eq!(t.op(State::Structural, b']'), Op::Down);
        assert_eq!(t.op(State::Structural, b'}'), Op::Down);
        for b in *b"-0123456789tfn" {
            assert_eq!(t.op(State::Structural, b), Op::Bare, "{b:#x}");
        }
        for b in *b"aTx+.'/" {
            assert_eq!(t.op(State::Structural, b), Op::Bad, "{b:#x}");
        }
        // 6 loop + 1 quote + 2 up + 2 down + 14 bare
        assert_eq!(count(t, State::Structural, Op::Bad), 256 - 25);
    }

    #[test]
    fn bare_table() {
        let t = init();
        for b in *b"0.e+E-truefalsnul" {
            assert_eq!(t.op(State::Bare, b), Op::Loop, "{b:#x}");
        }
        for b in *b" \t\r\n,]}" {
            assert_eq!(t.op(State::Bare, b), Op::Unbare, "{b:#x}");
        }
        assert_eq!(t.op(State::Bare, 0x7F), Op::Bad);
        assert_eq!(t.op(State::Bare, 0x1F), Op::Bad);
        assert_eq!(t.op(State::Bare, 0xC3), Op::Bad);
    }

    #[test]
    fn string_table() {
        let t = init();
        assert_eq!(t.op(State::String, b'a'), Op::Loop);
        assert_eq!(t.op(State::String, b' '), Op::Loop);
        assert_eq!(t.op(State::String, b'\\'), Op::Escape);
        assert_eq!(t.op(State::String, b'"'), Op::QuoteDown);
        assert_eq!(t.op(State::String, b'\n'), Op::Bad);
        assert_eq!(t.op(State::String, 0x80), Op::Bad);
        assert_eq!(count(t, State::String, Op::Utf8Lead2), 32);
        assert_eq!(count(t, State::String, Op::Utf8Lead3), 16);
        assert_eq!(count(t, State::String, Op::Utf8Lead4), 8);
        assert_eq!(t.op(State::String, 0xF8), Op::Bad);
        assert_eq!(t.op(State::String, 0xFF), Op::Bad);
    }

    #[test]
    fn continuation_and_escape_tables() {
        let t = init();
        assert_eq!(count(t, State::Utf8Continuation, Op::Utf8Continue), 64);
        assert_eq!(t.op(State::Utf8Continuation, 0x7F), Op::Bad);
        assert_eq!(t.op(State::Utf8Continuation, 0xC0), Op::Bad);

        assert_eq!(count(t, State::Escape, Op::Unescape), 8);
        assert_eq!(t.op(State::Escape, b'u'), Op::Unescape);
        assert_eq!(t.op(State::Escape, b'/'), Op::Bad);
        assert_eq!(t.op(State::Escape, b'x'), Op::Bad);
    }
}
