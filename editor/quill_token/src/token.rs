//! The token value produced by the line lexer.

use std::fmt;
use std::ops::Range;

use crate::{TokenFlags, TokenKind};

/// One token within a single line of text.
///
/// `begin` and `len` are byte offsets into the owning line; the covered
/// range is half-open. Tokens are immutable values -- re-lexing a line
/// produces a fresh sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub begin: u32,
    pub len: u32,
    pub flags: TokenFlags,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, begin: u32, len: u32, flags: TokenFlags) -> Self {
        Token {
            kind,
            begin,
            len,
            flags,
        }
    }

    /// End-of-input sentinel at a given offset.
    #[inline]
    pub const fn eof(begin: u32) -> Self {
        Token::new(TokenKind::Eof, begin, 0, TokenFlags::EMPTY)
    }

    /// One past the last byte of the token.
    #[inline]
    pub const fn end(&self) -> u32 {
        self.begin + self.len
    }

    /// Byte range within the owning line, usable for slicing.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.begin as usize..self.end() as usize
    }

    /// Shorthand for `self.kind == kind`.
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}+{}", self.kind, self.begin, self.len)
    }
}
