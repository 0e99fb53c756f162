//! Per-line lexer carry state.
//!
//! Lexing line N produces a `LexState` that the document model stores as a
//! plain integer annotation on the line; lexing line N+1 consumes it. State
//! zero means "not inside any construct that spans lines" -- the common case
//! and the safe degradation whenever a stored state is missing.

use thiserror::Error;

/// Which multi-line construct the lexer was inside at the end of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LexMode {
    /// Not inside anything spanning lines.
    #[default]
    Default = 0,
    /// Inside `/* ... */`.
    BlockComment = 1,
    /// Inside `/** ... */` or `/*! ... */`.
    DocComment = 2,
    /// Inside a `"..."` continued by a trailing backslash.
    String = 3,
    /// Inside a `'...'` continued by a trailing backslash.
    Char = 4,
    /// Inside `R"delim( ... )delim"`; the payload summarizes the delimiter.
    RawString = 5,
    /// Inside a preprocessor directive continued by a trailing backslash.
    Preproc = 6,
}

/// Compact per-line lexer state: mode in bits 0–7, auxiliary payload above.
///
/// For [`LexMode::RawString`] the payload packs the delimiter length
/// (5 bits) and a 16-bit FNV-1a fold of the delimiter text -- enough to
/// resume the `)delim"` search on subsequent lines without storing the
/// delimiter itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct LexState(u32);

const MODE_MASK: u32 = 0xFF;
const DELIM_LEN_SHIFT: u32 = 8;
const DELIM_LEN_MASK: u32 = 0x1F;
const DELIM_HASH_SHIFT: u32 = 13;
const DELIM_HASH_MASK: u32 = 0xFFFF;

/// Maximum raw-string delimiter length the state can describe (the C++
/// grammar limit is 16 characters).
pub const MAX_RAW_DELIMITER_LEN: usize = 16;

/// A persisted state integer that does not decode to a valid `LexState`.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InvalidLexState {
    #[error("unknown lexer mode {0}")]
    UnknownMode(u8),
    #[error("state payload {payload:#x} is not valid for mode {mode:?}")]
    BadPayload { mode: LexMode, payload: u32 },
}

impl LexState {
    /// State for a mode that carries no payload.
    #[inline]
    pub const fn new(mode: LexMode) -> Self {
        LexState(mode as u32)
    }

    /// State for an unterminated raw string with the given delimiter.
    ///
    /// Delimiters longer than [`MAX_RAW_DELIMITER_LEN`] are already a lex
    /// error on the opening line; the length saturates so the state stays
    /// decodable.
    pub fn raw_string(delimiter: &str) -> Self {
        let len = delimiter.len().min(MAX_RAW_DELIMITER_LEN) as u32;
        let hash = u32::from(Self::delimiter_hash(delimiter.as_bytes()));
        LexState(
            LexMode::RawString as u32 | (len << DELIM_LEN_SHIFT) | (hash << DELIM_HASH_SHIFT),
        )
    }

    /// Raw-string state from an already-computed delimiter summary, used
    /// when the delimiter text itself is no longer available (continuation
    /// lines only carry the summary).
    pub fn raw_string_parts(len: usize, hash: u16) -> Self {
        let len = len.min(MAX_RAW_DELIMITER_LEN) as u32;
        LexState(
            LexMode::RawString as u32
                | (len << DELIM_LEN_SHIFT)
                | (u32::from(hash) << DELIM_HASH_SHIFT),
        )
    }

    /// 16-bit FNV-1a fold of a raw-string delimiter.
    pub fn delimiter_hash(delimiter: &[u8]) -> u16 {
        let mut hash: u32 = 0x811c_9dc5;
        for &byte in delimiter {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(0x0100_0193);
        }
        ((hash >> 16) ^ (hash & 0xFFFF)) as u16
    }

    #[inline]
    pub fn mode(self) -> LexMode {
        match self.0 & MODE_MASK {
            1 => LexMode::BlockComment,
            2 => LexMode::DocComment,
            3 => LexMode::String,
            4 => LexMode::Char,
            5 => LexMode::RawString,
            6 => LexMode::Preproc,
            _ => LexMode::Default,
        }
    }

    /// Stored delimiter length; zero outside `RawString` mode.
    #[inline]
    pub fn raw_delimiter_len(self) -> usize {
        ((self.0 >> DELIM_LEN_SHIFT) & DELIM_LEN_MASK) as usize
    }

    /// Stored delimiter hash; zero outside `RawString` mode.
    #[inline]
    pub fn raw_delimiter_hash(self) -> u16 {
        ((self.0 >> DELIM_HASH_SHIFT) & DELIM_HASH_MASK) as u16
    }

    #[inline]
    pub fn is_default(self) -> bool {
        self.0 == 0
    }

    /// Inside a block or doc comment.
    #[inline]
    pub fn in_comment(self) -> bool {
        matches!(self.mode(), LexMode::BlockComment | LexMode::DocComment)
    }

    /// Inside a literal that spans lines (string, char, raw string).
    #[inline]
    pub fn in_literal(self) -> bool {
        matches!(
            self.mode(),
            LexMode::String | LexMode::Char | LexMode::RawString
        )
    }

    /// The next line is a backslash-joined continuation of this one.
    #[inline]
    pub fn is_continuation(self) -> bool {
        matches!(
            self.mode(),
            LexMode::String | LexMode::Char | LexMode::Preproc
        )
    }

    /// The raw integer the document model persists.
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Decode a persisted state integer.
    ///
    /// This is the one place malformed data can reach the core from a
    /// collaborator; anything undecodable is rejected rather than guessed
    /// at, and callers degrade to [`LexState::default`].
    pub fn from_raw(raw: u32) -> Result<Self, InvalidLexState> {
        let mode_bits = (raw & MODE_MASK) as u8;
        if mode_bits > LexMode::Preproc as u8 {
            return Err(InvalidLexState::UnknownMode(mode_bits));
        }
        let state = LexState(raw);
        let payload = raw >> DELIM_LEN_SHIFT;
        match state.mode() {
            LexMode::RawString => {
                if state.raw_delimiter_len() > MAX_RAW_DELIMITER_LEN {
                    return Err(InvalidLexState::BadPayload {
                        mode: LexMode::RawString,
                        payload,
                    });
                }
            }
            mode => {
                if payload != 0 {
                    return Err(InvalidLexState::BadPayload { mode, payload });
                }
            }
        }
        Ok(state)
    }
}
