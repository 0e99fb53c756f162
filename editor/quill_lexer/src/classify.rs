//! Lightweight table-driven classifier for syntax highlighting.
//!
//! A finite-state machine over per-byte input classes; the transition table
//! is data, so adding a state or class never restructures control flow. The
//! classifier is deliberately coarser than the full lexer -- it exists to
//! paint characters, not to answer structural questions -- but it speaks the
//! same [`LexState`] currency so the two can share per-line state storage.
//! Modes it cannot represent degrade: a raw-string carry is painted like an
//! ordinary string and passed through unchanged while unclosed.

use smallvec::SmallVec;

use quill_token::{LanguageConfig, LexMode, LexState};

use crate::keywords;

/// Style category for one contiguous range of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Keyword,
    Type,
    String,
    Comment,
    Number,
    Preproc,
    ParenOpen,
    ParenClose,
    Plain,
}

/// A classified range; spans of one line tile it completely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleSpan {
    pub begin: u32,
    pub len: u32,
    pub category: Category,
}

pub type StyleSpans = SmallVec<[StyleSpan; 16]>;

/// Per-byte input classes.
#[derive(Clone, Copy, Debug)]
#[repr(usize)]
enum Class {
    Letter = 0,
    Digit = 1,
    Slash = 2,
    Star = 3,
    Quote = 4,
    Apos = 5,
    Hash = 6,
    Space = 7,
    Backslash = 8,
    POpen = 9,
    PClose = 10,
    Other = 11,
}

const N_CLASSES: usize = 12;

fn class_of(byte: u8) -> Class {
    match byte {
        b'a'..=b'z' | b'A'..=b'Z' | b'_' => Class::Letter,
        b'0'..=b'9' => Class::Digit,
        b'/' => Class::Slash,
        b'*' => Class::Star,
        b'"' => Class::Quote,
        b'\'' => Class::Apos,
        b'#' => Class::Hash,
        b' ' | b'\t' => Class::Space,
        b'\\' => Class::Backslash,
        b'(' | b'[' | b'{' => Class::POpen,
        b')' | b']' | b'}' => Class::PClose,
        _ => Class::Other,
    }
}

/// Machine states. `*End` states are the last byte of a construct; their
/// outgoing row equals `Start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
enum State {
    Start = 0,
    Ident = 1,
    Number = 2,
    SlashSeen = 3,
    LineComment = 4,
    Block = 5,
    BlockStar = 6,
    BlockEnd = 7,
    Str = 8,
    StrEsc = 9,
    StrEnd = 10,
    Chr = 11,
    ChrEsc = 12,
    ChrEnd = 13,
    Pp = 14,
}

const N_STATES: usize = 15;

/// State entered after consuming one byte of a given class.
///
/// Columns: Letter, Digit, Slash, Star, Quote, Apos, Hash, Space,
/// Backslash, POpen, PClose, Other.
#[rustfmt::skip]
const NEXT: [[State; N_CLASSES]; N_STATES] = {
    use State::{
        Block, BlockEnd, BlockStar, Chr, ChrEnd, ChrEsc, Ident, LineComment, Number, Pp,
        SlashSeen, Start, Str, StrEnd, StrEsc,
    };
    const START_ROW: [State; N_CLASSES] = [
        Ident, Number, SlashSeen, Start, Str, Chr, Pp, Start, Start, Start, Start, Start,
    ];
    [
        /* Start       */ START_ROW,
        /* Ident       */ [Ident, Ident, SlashSeen, Start, Str, Chr, Pp, Start, Start, Start, Start, Start],
        /* Number      */ [Number, Number, SlashSeen, Start, Str, Chr, Pp, Start, Start, Start, Start, Start],
        /* SlashSeen   */ [Ident, Number, LineComment, Block, Str, Chr, Pp, Start, Start, Start, Start, Start],
        /* LineComment */ [LineComment; N_CLASSES],
        /* Block       */ [Block, Block, Block, BlockStar, Block, Block, Block, Block, Block, Block, Block, Block],
        /* BlockStar   */ [Block, Block, BlockEnd, BlockStar, Block, Block, Block, Block, Block, Block, Block, Block],
        /* BlockEnd    */ START_ROW,
        /* Str         */ [Str, Str, Str, Str, StrEnd, Str, Str, Str, StrEsc, Str, Str, Str],
        /* StrEsc      */ [Str; N_CLASSES],
        /* StrEnd      */ START_ROW,
        /* Chr         */ [Chr, Chr, Chr, Chr, Chr, ChrEnd, Chr, Chr, ChrEsc, Chr, Chr, Chr],
        /* ChrEsc      */ [Chr; N_CLASSES],
        /* ChrEnd      */ START_ROW,
        /* Pp          */ [Pp; N_CLASSES],
    ]
};

/// Paint category for a byte consumed into `state`; `Start` bytes take
/// their category from the input class (parens), everything else from the
/// state.
fn category_of(state: State, class: Class) -> Category {
    match state {
        State::Start => match class {
            Class::POpen => Category::ParenOpen,
            Class::PClose => Category::ParenClose,
            _ => Category::Plain,
        },
        State::Ident => Category::Plain, // upgraded per-span below
        State::Number => Category::Number,
        State::SlashSeen => Category::Plain, // patched if a comment follows
        State::LineComment | State::Block | State::BlockStar | State::BlockEnd => {
            Category::Comment
        }
        State::Str | State::StrEsc | State::StrEnd | State::Chr | State::ChrEsc
        | State::ChrEnd => Category::String,
        State::Pp => Category::Preproc,
    }
}

fn start_state(carry: LexState) -> State {
    match carry.mode() {
        LexMode::Default => State::Start,
        LexMode::BlockComment | LexMode::DocComment => State::Block,
        LexMode::String | LexMode::RawString => State::Str,
        LexMode::Char => State::Chr,
        LexMode::Preproc => State::Pp,
    }
}

/// Classify one line for highlighting.
///
/// Returns spans tiling the whole line plus the carry-out state for the
/// next line. Identifier spans are post-classified against the keyword and
/// builtin-type tables of `config`.
pub fn classify_line(
    text: &str,
    carry: LexState,
    config: &LanguageConfig,
) -> (StyleSpans, LexState) {
    let bytes = text.as_bytes();
    let mut state = start_state(carry);

    // Pass 1: per-byte categories, remembering identifier-run states.
    let mut cats: SmallVec<[Category; 64]> = SmallVec::with_capacity(bytes.len());
    let mut idents: SmallVec<[(usize, usize); 8]> = SmallVec::new();
    let mut ident_start: Option<usize> = None;
    for (i, &b) in bytes.iter().enumerate() {
        let class = class_of(b);
        let prev = state;
        state = NEXT[prev as usize][class as usize];
        if prev == State::SlashSeen && matches!(state, State::LineComment | State::Block) {
            cats[i - 1] = Category::Comment;
        }
        cats.push(category_of(state, class));
        match (ident_start, state) {
            (None, State::Ident) => ident_start = Some(i),
            (Some(start), s) if s != State::Ident => {
                idents.push((start, i));
                ident_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = ident_start {
        idents.push((start, bytes.len()));
    }

    // Identifier upgrade: keywords and builtin types get their own paint.
    for (start, end) in idents {
        let word = &text[start..end];
        let category = if keywords::is_builtin_type(word) {
            Category::Type
        } else if keywords::lookup(word, config).is_some() {
            Category::Keyword
        } else {
            continue;
        };
        for cat in &mut cats[start..end] {
            *cat = category;
        }
    }

    // Pass 2: merge byte categories into spans. Paren spans stay single
    // bytes so nesting levels remain addressable.
    let mut spans = StyleSpans::new();
    let mut begin = 0usize;
    for i in 1..=cats.len() {
        let split = i == cats.len()
            || cats[i] != cats[begin]
            || matches!(cats[begin], Category::ParenOpen | Category::ParenClose);
        if split {
            spans.push(StyleSpan {
                begin: begin as u32,
                len: (i - begin) as u32,
                category: cats[begin],
            });
            begin = i;
        }
    }

    let out = carry_out(state, carry, bytes);
    (spans, out)
}

/// Map the final machine state back into the shared state currency.
fn carry_out(state: State, carry: LexState, bytes: &[u8]) -> LexState {
    match state {
        State::Block | State::BlockStar => {
            // Preserve the doc/plain distinction the full lexer recorded.
            if carry.mode() == LexMode::DocComment {
                carry
            } else {
                LexState::new(LexMode::BlockComment)
            }
        }
        State::StrEsc => LexState::new(LexMode::String),
        State::ChrEsc => LexState::new(LexMode::Char),
        State::Str if carry.mode() == LexMode::RawString => carry,
        State::Pp if bytes.last() == Some(&b'\\') => LexState::new(LexMode::Preproc),
        _ => LexState::default(),
    }
}
