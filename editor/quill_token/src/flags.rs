//! Per-token metadata flags packed into a single byte.

/// Layout metadata attached to each token by the line lexer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TokenFlags(u8);

impl TokenFlags {
    /// Token is the first token on its line.
    pub const LINE_START: u8 = 1 << 0;
    /// Token belongs to a line that continues the previous one via a
    /// trailing backslash (preprocessor or literal continuation).
    pub const JOINED: u8 = 1 << 1;
    /// Whitespace immediately preceded this token.
    pub const SPACE_BEFORE: u8 = 1 << 2;

    /// Empty flags (no bits set).
    pub const EMPTY: Self = TokenFlags(0);

    /// Create flags from raw bits.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        TokenFlags(bits)
    }

    /// Get the raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if a specific flag is set.
    #[inline]
    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Set a flag.
    #[inline]
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Check if this token starts its line.
    #[inline]
    pub const fn is_line_start(self) -> bool {
        self.contains(Self::LINE_START)
    }

    /// Check if this token sits on a backslash-continued line.
    #[inline]
    pub const fn is_joined(self) -> bool {
        self.contains(Self::JOINED)
    }

    /// Check if whitespace preceded this token.
    #[inline]
    pub const fn has_space_before(self) -> bool {
        self.contains(Self::SPACE_BEFORE)
    }
}

// Compile-time assertion: TokenFlags is exactly 1 byte.
const _: () = assert!(std::mem::size_of::<TokenFlags>() == 1);

#[cfg(test)]
mod tests {
    use super::TokenFlags;

    #[test]
    fn set_and_query() {
        let mut flags = TokenFlags::EMPTY;
        assert!(!flags.is_line_start());
        flags.set(TokenFlags::LINE_START);
        flags.set(TokenFlags::SPACE_BEFORE);
        assert!(flags.is_line_start());
        assert!(flags.has_space_before());
        assert!(!flags.is_joined());
    }

    #[test]
    fn bits_round_trip() {
        let flags = TokenFlags::from_bits(TokenFlags::JOINED | TokenFlags::SPACE_BEFORE);
        assert_eq!(
            TokenFlags::from_bits(flags.bits()),
            flags
        );
    }
}
