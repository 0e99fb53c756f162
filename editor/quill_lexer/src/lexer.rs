//! The stateful line lexer.
//!
//! `tokenize` is a pure function of `(line text, carry-in state, language
//! config)`. Multi-line constructs -- block comments, backslash-continued
//! strings and preprocessor directives, raw strings -- are resumed from the
//! carry-in state and recorded into the carry-out state when they reach the
//! end of the line unterminated.

use smallvec::SmallVec;

use quill_token::{
    BufferDocument, Document, LanguageConfig, LanguageFeatures, LexMode, LexState, Token,
    TokenFlags, TokenKind,
};

use crate::cursor::Cursor;
use crate::keywords;

/// Token sequence for one line. Inline capacity covers typical lines.
pub type Tokens = SmallVec<[Token; 16]>;

#[inline]
pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
pub(crate) fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Tokenize one line of text.
///
/// Returns the line's tokens -- always terminated by an
/// [`Eof`](TokenKind::Eof) sentinel -- and the carry-out state for the next
/// line. Degenerate input (unterminated literal, stray byte) never fails;
/// it produces best-effort tokens and a valid state.
pub fn tokenize(text: &str, start: LexState, config: &LanguageConfig) -> (Tokens, LexState) {
    let mut lexer = Lexer::new(text, start, config);
    lexer.resume_carry(start);
    lexer.run();
    lexer.finish()
}

/// Lex every line of a buffer top to bottom and store the end states, the
/// way a host editor's highlight pass does after loading a file.
pub fn lex_document(doc: &mut BufferDocument, config: &LanguageConfig) {
    let mut states = Vec::with_capacity(doc.line_count() as usize);
    let mut state = LexState::default();
    for line in 0..doc.line_count() {
        let (_, end) = tokenize(doc.line_text(line), state, config);
        states.push(end);
        state = end;
    }
    doc.set_end_states(states);
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    config: &'a LanguageConfig,
    tokens: Tokens,
    /// Carry-out state; stays default unless a construct spans the line end.
    state: LexState,
    /// Carry-in was a continuation: the first token is joined, not a line start.
    joined: bool,
    space_before: bool,
    /// Currently inside a line-initial `#` directive.
    in_preproc: bool,
    /// Directly after `#include`/`#include_next`/`#import`: the next `<`
    /// opens a header name, not a less-than chain.
    angle_include: bool,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str, start: LexState, config: &'a LanguageConfig) -> Self {
        Lexer {
            cursor: Cursor::new(text),
            config,
            tokens: Tokens::new(),
            state: LexState::default(),
            joined: start.is_continuation(),
            space_before: false,
            in_preproc: false,
            angle_include: false,
        }
    }

    /// Consume whatever multi-line construct the previous line left open.
    fn resume_carry(&mut self, start: LexState) {
        match start.mode() {
            LexMode::Default => {}
            LexMode::BlockComment => self.block_comment_body(0, false),
            LexMode::DocComment => self.block_comment_body(0, true),
            LexMode::String => self.string_body(0, b'"'),
            LexMode::Char => self.string_body(0, b'\''),
            LexMode::RawString => {
                self.raw_string_body(0, start.raw_delimiter_len(), start.raw_delimiter_hash());
            }
            LexMode::Preproc => self.in_preproc = true,
        }
    }

    fn run(&mut self) {
        loop {
            let b = self.cursor.current();
            match b {
                0 if self.cursor.at_end() => break,
                b' ' | b'\t' => {
                    self.cursor.eat_whitespace();
                    self.space_before = true;
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),
                b'0'..=b'9' => self.number(),
                b'.' if self.cursor.peek().is_ascii_digit() => self.number(),
                b'"' => {
                    let start = self.cursor.pos();
                    self.cursor.advance();
                    self.string_body(start, b'"');
                }
                b'\'' => {
                    let start = self.cursor.pos();
                    self.cursor.advance();
                    self.string_body(start, b'\'');
                }
                b'/' => self.slash(),
                b'#' => self.hash(),
                b'\\' => self.backslash(),
                b'<' => self.less(),
                b'>' => self.greater(),
                b'(' => self.single(TokenKind::LParen),
                b')' => self.single(TokenKind::RParen),
                b'[' => self.single(TokenKind::LBracket),
                b']' => self.single(TokenKind::RBracket),
                b'{' => self.single(TokenKind::LBrace),
                b'}' => self.single(TokenKind::RBrace),
                b';' => self.single(TokenKind::Semicolon),
                b',' => self.single(TokenKind::Comma),
                b'?' => self.single(TokenKind::Question),
                b'~' => self.single(TokenKind::Tilde),
                b':' => self.one_or_two(b':', TokenKind::Colon, TokenKind::ColonColon),
                b'.' => self.dot(),
                b'=' => self.one_or_two(b'=', TokenKind::Eq, TokenKind::EqEq),
                b'!' => self.one_or_two(b'=', TokenKind::Not, TokenKind::NotEq),
                b'*' => self.one_or_two(b'=', TokenKind::Star, TokenKind::StarEq),
                b'%' => self.one_or_two(b'=', TokenKind::Percent, TokenKind::PercentEq),
                b'^' => self.one_or_two(b'=', TokenKind::Caret, TokenKind::CaretEq),
                b'+' => self.plus(),
                b'-' => self.minus(),
                b'&' => self.amp(),
                b'|' => self.pipe(),
                b'@' => self.at_sign(),
                _ => self.error_token(),
            }
        }
    }

    fn finish(mut self) -> (Tokens, LexState) {
        self.tokens.push(Token::eof(self.cursor.len()));
        (self.tokens, self.state)
    }

    /// Emit a token from `start` to the current position.
    fn push(&mut self, kind: TokenKind, start: u32) {
        let mut flags = TokenFlags::EMPTY;
        if self.tokens.is_empty() {
            flags.set(if self.joined {
                TokenFlags::JOINED
            } else {
                TokenFlags::LINE_START
            });
        }
        if self.space_before {
            flags.set(TokenFlags::SPACE_BEFORE);
        }
        self.space_before = false;
        let len = self.cursor.pos() - start;
        self.tokens.push(Token::new(kind, start, len, flags));
    }

    // ─── Identifiers & keywords ──────────────────────────────────────────

    fn identifier(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.cursor.eat_ident_continue();
        let text = self.cursor.slice_from(start);

        // Encoding prefix fused with a following quote: L"...", u8'...',
        // R"(...)" and combinations.
        let quote = self.cursor.current();
        if (quote == b'"' || quote == b'\'') && keywords::is_literal_prefix(text) {
            let raw = quote == b'"'
                && text.ends_with('R')
                && self.config.features.contains(LanguageFeatures::CXX11);
            self.cursor.advance();
            if raw {
                self.raw_string_open(start);
            } else {
                self.string_body(start, quote);
            }
            return;
        }

        if self.in_preproc
            && self.tokens.last().is_some_and(|t| t.is(TokenKind::Hash))
            && matches!(text, "include" | "include_next" | "import")
        {
            self.angle_include = true;
        }

        let kind = keywords::lookup(text, self.config).unwrap_or(TokenKind::Identifier);
        self.push(kind, start);
    }

    // ─── Numbers ─────────────────────────────────────────────────────────

    /// Preprocessing-number scan: one greedy token covering digits, letters,
    /// dots, digit separators, and signed exponents. Classification into
    /// int/float happens on the final text.
    fn number(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        let separators = self.config.features.contains(LanguageFeatures::CXX11);
        loop {
            let b = self.cursor.current();
            let hex = {
                let text = self.cursor.slice(start, (start + 2).min(self.cursor.pos()));
                text.eq_ignore_ascii_case("0x")
            };
            if matches!(b, b'e' | b'E') && !hex && matches!(self.cursor.peek(), b'+' | b'-') {
                self.cursor.advance_n(2);
            } else if matches!(b, b'p' | b'P') && hex && matches!(self.cursor.peek(), b'+' | b'-')
            {
                self.cursor.advance_n(2);
            } else if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.cursor.advance();
            } else if b == b'\'' && separators && self.cursor.peek().is_ascii_alphanumeric() {
                self.cursor.advance();
            } else {
                break;
            }
        }
        let text = self.cursor.slice_from(start);
        let hex = text[..2.min(text.len())].eq_ignore_ascii_case("0x");
        let float = text.contains('.')
            || (!hex && (text.contains('e') || text.contains('E')))
            || (hex && (text.contains('p') || text.contains('P')));
        self.push(
            if float {
                TokenKind::FloatLiteral
            } else {
                TokenKind::IntLiteral
            },
            start,
        );
    }

    // ─── Strings & chars ─────────────────────────────────────────────────

    /// Body of a quoted literal, starting after the opening quote (or at
    /// column 0 when resuming a backslash-continued literal).
    fn string_body(&mut self, start: u32, quote: u8) {
        let (kind, mode) = if quote == b'"' {
            (TokenKind::StringLiteral, LexMode::String)
        } else {
            (TokenKind::CharLiteral, LexMode::Char)
        };
        loop {
            let b = self.cursor.current();
            if b == 0 && self.cursor.at_end() {
                // Unterminated without a continuation backslash: the
                // literal ends with the line.
                break;
            }
            if b == quote {
                self.cursor.advance();
                break;
            }
            if b == b'\\' {
                if self.cursor.pos() + 1 == self.cursor.len() {
                    // Trailing backslash: the literal continues on the
                    // next line.
                    self.cursor.seek_end();
                    self.state = LexState::new(mode);
                    break;
                }
                self.cursor.advance_n(2);
                continue;
            }
            self.cursor.advance();
        }
        if self.cursor.pos() > start {
            self.push(kind, start);
        }
    }

    /// After `R"`: parse the delimiter up to `(`, then scan the body.
    fn raw_string_open(&mut self, start: u32) {
        let delim_start = self.cursor.pos();
        let mut ok = false;
        while self.cursor.pos() - delim_start <= 16 {
            match self.cursor.current() {
                b'(' => {
                    ok = true;
                    break;
                }
                0 | b' ' | b'\t' | b'\\' | b'"' => break,
                _ => self.cursor.advance(),
            }
        }
        if !ok {
            // Malformed opener; consume the rest of the line as the literal.
            self.cursor.seek_end();
            self.push(TokenKind::RawStringLiteral, start);
            return;
        }
        let delimiter = self.cursor.byte_slice(delim_start, self.cursor.pos());
        let len = delimiter.len();
        let hash = LexState::delimiter_hash(delimiter);
        self.cursor.advance(); // consume '('
        self.raw_string_body(start, len, hash);
    }

    /// Scan for `)delim"` matching the stored delimiter summary.
    fn raw_string_body(&mut self, start: u32, delim_len: usize, delim_hash: u16) {
        loop {
            let Some(close) = self.cursor.find(b')') else {
                self.cursor.seek_end();
                self.state = LexState::raw_string_parts(delim_len, delim_hash);
                self.push(TokenKind::RawStringLiteral, start);
                return;
            };
            let cand_start = close + 1;
            let cand_end = cand_start + delim_len as u32;
            if cand_end < self.cursor.len()
                && self.cursor.at(cand_end) == b'"'
                && LexState::delimiter_hash(self.cursor.byte_slice(cand_start, cand_end))
                    == delim_hash
            {
                self.cursor.advance_n(cand_end + 1 - self.cursor.pos());
                self.push(TokenKind::RawStringLiteral, start);
                return;
            }
            self.cursor.advance_n(close + 1 - self.cursor.pos());
        }
    }

    // ─── Comments ────────────────────────────────────────────────────────

    fn slash(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        match self.cursor.current() {
            b'/' => {
                self.cursor.advance();
                let doc = matches!(self.cursor.current(), b'/' | b'!');
                self.cursor.seek_end();
                self.push(
                    if doc {
                        TokenKind::DocComment
                    } else {
                        TokenKind::Comment
                    },
                    start,
                );
            }
            b'*' => {
                self.cursor.advance();
                // `/**/` is an empty plain comment, not a doc comment.
                let doc = matches!(self.cursor.current(), b'*' | b'!')
                    && !(self.cursor.current() == b'*' && self.cursor.peek() == b'/');
                self.block_comment_body(start, doc);
            }
            b'=' => {
                self.cursor.advance();
                self.push(TokenKind::SlashEq, start);
            }
            _ => self.push(TokenKind::Slash, start),
        }
    }

    /// Body of a block comment, from the current position to `*/` or the
    /// end of the line.
    fn block_comment_body(&mut self, start: u32, doc: bool) {
        let kind = if doc {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        };
        loop {
            let Some(star) = self.cursor.find(b'*') else {
                self.cursor.seek_end();
                self.state = LexState::new(if doc {
                    LexMode::DocComment
                } else {
                    LexMode::BlockComment
                });
                break;
            };
            self.cursor.advance_n(star - self.cursor.pos());
            if self.cursor.peek() == b'/' {
                self.cursor.advance_n(2);
                break;
            }
            self.cursor.advance();
        }
        if self.cursor.pos() > start {
            self.push(kind, start);
        }
    }

    // ─── Preprocessor ────────────────────────────────────────────────────

    fn hash(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        if self.cursor.current() == b'#' {
            self.cursor.advance();
            self.push(TokenKind::HashHash, start);
            return;
        }
        if self.tokens.is_empty() && !self.joined {
            self.in_preproc = true;
        }
        self.push(TokenKind::Hash, start);
    }

    fn backslash(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        if self.cursor.at_end() {
            // Line splice. Inside a directive the directive continues; in
            // ordinary code the next line simply starts fresh.
            if self.in_preproc {
                self.state = LexState::new(LexMode::Preproc);
            }
            return;
        }
        self.push(TokenKind::Error, start);
    }

    // ─── Operators ───────────────────────────────────────────────────────

    fn single(&mut self, kind: TokenKind) {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.push(kind, start);
    }

    /// `x` or `xy` where `y` is a fixed second byte.
    fn one_or_two(&mut self, second: u8, one: TokenKind, two: TokenKind) {
        let start = self.cursor.pos();
        self.cursor.advance();
        if self.cursor.current() == second {
            self.cursor.advance();
            self.push(two, start);
        } else {
            self.push(one, start);
        }
    }

    fn dot(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        if self.cursor.current() == b'.' && self.cursor.peek() == b'.' {
            self.cursor.advance_n(2);
            self.push(TokenKind::Ellipsis, start);
        } else if self.cursor.current() == b'*' {
            self.cursor.advance();
            self.push(TokenKind::DotStar, start);
        } else {
            self.push(TokenKind::Dot, start);
        }
    }

    fn plus(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        match self.cursor.current() {
            b'+' => {
                self.cursor.advance();
                self.push(TokenKind::PlusPlus, start);
            }
            b'=' => {
                self.cursor.advance();
                self.push(TokenKind::PlusEq, start);
            }
            _ => self.push(TokenKind::Plus, start),
        }
    }

    fn minus(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        match self.cursor.current() {
            b'-' => {
                self.cursor.advance();
                self.push(TokenKind::MinusMinus, start);
            }
            b'=' => {
                self.cursor.advance();
                self.push(TokenKind::MinusEq, start);
            }
            b'>' => {
                self.cursor.advance();
                if self.cursor.current() == b'*' {
                    self.cursor.advance();
                    self.push(TokenKind::ArrowStar, start);
                } else {
                    self.push(TokenKind::Arrow, start);
                }
            }
            _ => self.push(TokenKind::Minus, start),
        }
    }

    fn amp(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        match self.cursor.current() {
            b'&' => {
                self.cursor.advance();
                self.push(TokenKind::AmpAmp, start);
            }
            b'=' => {
                self.cursor.advance();
                self.push(TokenKind::AmpEq, start);
            }
            _ => self.push(TokenKind::Amp, start),
        }
    }

    fn pipe(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        match self.cursor.current() {
            b'|' => {
                self.cursor.advance();
                self.push(TokenKind::PipePipe, start);
            }
            b'=' => {
                self.cursor.advance();
                self.push(TokenKind::PipeEq, start);
            }
            _ => self.push(TokenKind::Pipe, start),
        }
    }

    fn less(&mut self) {
        let start = self.cursor.pos();
        if self.angle_include {
            // `#include <header>`: the whole bracketed payload is one
            // string-like token.
            self.angle_include = false;
            self.cursor.advance();
            match self.cursor.find(b'>') {
                Some(close) => self.cursor.advance_n(close + 1 - self.cursor.pos()),
                None => self.cursor.seek_end(),
            }
            self.push(TokenKind::AngleStringLiteral, start);
            return;
        }
        self.cursor.advance();
        match self.cursor.current() {
            b'<' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    self.push(TokenKind::ShlEq, start);
                } else {
                    self.push(TokenKind::Shl, start);
                }
            }
            b'=' => {
                self.cursor.advance();
                self.push(TokenKind::LtEq, start);
            }
            _ => self.push(TokenKind::Lt, start),
        }
    }

    fn greater(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        match self.cursor.current() {
            b'>' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    self.push(TokenKind::ShrEq, start);
                } else {
                    self.push(TokenKind::Shr, start);
                }
            }
            b'=' => {
                self.cursor.advance();
                self.push(TokenKind::GtEq, start);
            }
            _ => self.push(TokenKind::Gt, start),
        }
    }

    fn at_sign(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        if self.config.features.contains(LanguageFeatures::OBJC)
            && is_ident_start(self.cursor.current())
        {
            // `@interface`, `@end`, ... -- one keyword token.
            self.cursor.advance();
            self.cursor.eat_ident_continue();
            self.push(TokenKind::Keyword, start);
        } else {
            self.push(TokenKind::At, start);
        }
    }

    fn error_token(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance_char();
        self.push(TokenKind::Error, start);
    }
}

#[cfg(test)]
mod tests;
