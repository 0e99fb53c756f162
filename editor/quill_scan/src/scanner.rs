//! The backward token scanner.
//!
//! The window is a deque of per-line chunks, each holding one line's text
//! and tokens with line-relative offsets. Pulling an earlier line pushes a
//! chunk at the front and grows the index-translation offset -- no cached
//! token is ever rewritten. When the lookback bound or the document start
//! is reached, a sentinel chunk holding a single `Eof` token is prepended
//! permanently; queries past it resolve to the sentinel.

use std::collections::VecDeque;

use tracing::trace;

use quill_token::{previous_line_state, Document, LanguageConfig, Position, Token, TokenKind};

/// Default lookback bound in lines. Small on purpose: it caps worst-case
/// latency on pathological input at the cost of occasionally under-scanning.
pub const DEFAULT_MAX_LINES: u32 = 10;

/// Construction options for a [`BackwardScanner`].
#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Maximum number of preceding lines to pull before giving up.
    pub max_lines: u32,
    /// Text to append after the cursor for what-if queries (e.g. a closing
    /// brace that is about to be inserted).
    pub suffix: Option<String>,
    /// Drop comment tokens from the stream.
    pub skip_comments: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            max_lines: DEFAULT_MAX_LINES,
            suffix: None,
            skip_comments: true,
        }
    }
}

/// One buffered line. `line` is `None` only for the sentinel chunk.
#[derive(Debug)]
struct Chunk {
    line: Option<u32>,
    text: String,
    tokens: Vec<Token>,
}

impl Chunk {
    fn sentinel() -> Self {
        Chunk {
            line: None,
            text: String::new(),
            tokens: vec![Token::eof(0)],
        }
    }
}

/// Lazy backward view of the tokens before a cursor.
///
/// Indices are global and signed: `0..start_token()` are the tokens of the
/// anchor line's prefix (plus the optional suffix), indices below zero
/// reach into preceding lines and are fetched on demand. Queries are
/// idempotent -- once a line is buffered it is never re-lexed.
pub struct BackwardScanner<'a, D: Document + ?Sized> {
    doc: &'a D,
    config: &'a LanguageConfig,
    options: ScanOptions,
    chunks: VecDeque<Chunk>,
    /// Translation from global index to buffer position.
    offset: i32,
    start_token: i32,
    anchor: Position,
    anchor_prefix_len: u32,
    /// Document line of the earliest real chunk pulled so far.
    top_line: u32,
    lines_pulled: u32,
    exhausted: bool,
}

impl<'a, D: Document + ?Sized> BackwardScanner<'a, D> {
    /// Anchor a scanner at `pos`, tokenizing the line prefix up to the
    /// cursor (plus `options.suffix`, if any) with the stored carry state.
    pub fn new(doc: &'a D, pos: Position, config: &'a LanguageConfig, options: ScanOptions) -> Self {
        let line_text = doc.line_text(pos.line);
        let mut cut = (pos.column as usize).min(line_text.len());
        while !line_text.is_char_boundary(cut) {
            cut -= 1;
        }
        let mut text = line_text[..cut].to_string();
        let anchor_prefix_len = text.len() as u32;
        if let Some(suffix) = &options.suffix {
            text.push_str(suffix);
        }

        let (tokens, _) = quill_lexer::tokenize(&text, previous_line_state(doc, pos.line), config);
        let tokens = strip(tokens, options.skip_comments);
        let start_token = tokens.len() as i32;

        let mut chunks = VecDeque::new();
        chunks.push_back(Chunk {
            line: Some(pos.line),
            text,
            tokens,
        });

        BackwardScanner {
            doc,
            config,
            options,
            chunks,
            offset: 0,
            start_token,
            anchor: pos,
            anchor_prefix_len,
            top_line: pos.line,
            lines_pulled: 0,
            exhausted: false,
        }
    }

    /// Index anchored just past the last token before the cursor:
    /// `token_at(start_token() - 1)` is the token immediately left of it.
    #[inline]
    pub fn start_token(&self) -> i32 {
        self.start_token
    }

    /// Token `n` places before the cursor; `la(1)` is the nearest.
    pub fn la(&mut self, n: i32) -> Token {
        self.token_at(self.start_token - n)
    }

    /// Token at a global index, extending the window backward as needed.
    pub fn token_at(&mut self, index: i32) -> Token {
        while self.offset + index < 0 && !self.exhausted {
            self.pull_previous_line();
        }
        let total = self.total();
        if total == 0 {
            // Empty anchor prefix and nothing pulled: the stream before
            // the cursor is empty.
            return Token::eof(0);
        }
        // Past the sentinel (or past the cursor): resolve to the nearest
        // end-of-input token rather than failing.
        let buffer_index = (self.offset + index).clamp(0, total - 1);
        debug_assert!(
            self.offset + index < total,
            "token index {index} past the scanner anchor"
        );
        let (chunk, within) = self.locate(buffer_index);
        chunk.tokens[within]
    }

    /// Buffered token count across all chunks.
    fn total(&self) -> i32 {
        self.chunks.iter().map(|c| c.tokens.len() as i32).sum()
    }

    fn locate(&self, buffer_index: i32) -> (&Chunk, usize) {
        let mut remaining = buffer_index as usize;
        for chunk in &self.chunks {
            if remaining < chunk.tokens.len() {
                return (chunk, remaining);
            }
            remaining -= chunk.tokens.len();
        }
        // Unreachable by construction; degrade to the front chunk's first
        // token (the sentinel) rather than panicking in release builds.
        debug_assert!(false, "buffer index {buffer_index} out of range");
        (&self.chunks[0], 0)
    }

    fn pull_previous_line(&mut self) {
        if self.lines_pulled >= self.options.max_lines || self.top_line == 0 {
            trace!(
                lines_pulled = self.lines_pulled,
                top_line = self.top_line,
                "lookback exhausted, inserting sentinel"
            );
            self.chunks.push_front(Chunk::sentinel());
            self.offset += 1;
            self.exhausted = true;
            return;
        }
        let line = self.top_line - 1;
        let text = self.doc.line_text(line).to_string();
        let (tokens, _) =
            quill_lexer::tokenize(&text, previous_line_state(self.doc, line), self.config);
        let tokens = strip(tokens, self.options.skip_comments);
        trace!(line, count = tokens.len(), "pulled preceding line");
        self.offset += tokens.len() as i32;
        self.chunks.push_front(Chunk { line: Some(line), text, tokens });
        self.top_line = line;
        self.lines_pulled += 1;
    }

    // ─── Structural queries ──────────────────────────────────────────────

    /// Index of the opener matching the closer just before `index`, or
    /// `index` unchanged when no match lies within the lookback bound.
    ///
    /// Handles all four bracket families; `>` pairs with `<` for template
    /// lookback when the caller decides the context warrants it.
    pub fn start_of_matching_brace(&mut self, index: i32) -> i32 {
        let closer = self.token_at(index - 1);
        let opener = match closer.kind {
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::Gt => {
                match closer.kind.matching_bracket() {
                    Some(opener) => opener,
                    None => return index,
                }
            }
            _ => {
                debug_assert!(false, "matching-brace query on {:?}", closer.kind);
                return index;
            }
        };

        let mut depth = 0i32;
        let mut i = index;
        loop {
            let tok = self.token_at(i - 1);
            if tok.is(TokenKind::Eof) {
                trace!(index, "no matching brace within lookback");
                return index;
            }
            if tok.kind == closer.kind {
                depth += 1;
            } else if tok.kind == opener {
                depth -= 1;
                if depth == 0 {
                    return i - 1;
                }
            }
            i -= 1;
        }
    }

    /// Index of the first token on the (logical) line containing `index`,
    /// skipping matched bracket pairs on the way back.
    pub fn start_of_line(&mut self, index: i32) -> i32 {
        let mut i = index;
        loop {
            let tok = self.token_at(i - 1);
            if tok.is(TokenKind::Eof) {
                return i;
            }
            if tok.flags.is_line_start() {
                return i - 1;
            }
            if tok.kind.is_closing_bracket() {
                let matching = self.start_of_matching_brace(i);
                if matching != i {
                    if self.token_at(matching).flags.is_line_start() {
                        return matching;
                    }
                    i = matching;
                    continue;
                }
            }
            i -= 1;
        }
    }

    /// Index of the nearest unmatched opening delimiter before `index`, or
    /// `index` unchanged when none is found within the lookback bound.
    pub fn start_of_block(&mut self, index: i32) -> i32 {
        let start = index;
        let mut i = index;
        loop {
            let tok = self.token_at(i - 1);
            match tok.kind {
                TokenKind::Eof => return start,
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => return i - 1,
                kind if kind.is_closing_bracket() => {
                    let matching = self.start_of_matching_brace(i);
                    if matching == i {
                        return start;
                    }
                    i = matching;
                }
                _ => i -= 1,
            }
        }
    }

    /// Literal leading whitespace of the line containing
    /// `start_of_line(index)` -- what a freshly opened line below it should
    /// copy to stay aligned.
    pub fn indentation_string(&mut self, index: i32) -> String {
        let sol = self.start_of_line(index);
        if self.total() == 0 {
            return String::new();
        }
        let buffer_index = (self.offset + sol).clamp(0, self.total() - 1);
        let (chunk, _) = self.locate(buffer_index);
        let text = &chunk.text;
        let end = text
            .bytes()
            .position(|b| b != b' ' && b != b'\t')
            .unwrap_or(text.len());
        text[..end].to_string()
    }

    /// Document position of a buffered token. `None` for the sentinel and
    /// for tokens that only exist in the what-if suffix.
    pub fn position_of(&mut self, index: i32) -> Option<Position> {
        let total = self.total();
        let buffer_index = self.offset + index;
        if buffer_index < 0 || buffer_index >= total {
            return None;
        }
        let is_anchor = buffer_index as usize >= (total as usize - self.anchor_chunk_len());
        let (chunk, within) = self.locate(buffer_index);
        let token = chunk.tokens[within];
        let line = chunk.line?;
        if is_anchor && self.options.suffix.is_some() && token.begin >= self.anchor_prefix_len {
            return None;
        }
        Some(Position::new(line, token.begin))
    }

    fn anchor_chunk_len(&self) -> usize {
        self.chunks.back().map_or(0, |c| c.tokens.len())
    }

    /// Source text of one token.
    pub fn text_of(&mut self, index: i32) -> String {
        let total = self.total();
        let buffer_index = self.offset + index;
        if buffer_index < 0 || buffer_index >= total {
            return String::new();
        }
        let (chunk, within) = self.locate(buffer_index);
        let token = chunk.tokens[within];
        chunk
            .text
            .get(token.range())
            .unwrap_or_default()
            .to_string()
    }

    /// Source text from the start of token `from` to the start of token
    /// `to`, with buffered lines joined by `\n`.
    pub fn text(&mut self, from: i32, to: i32) -> String {
        if from < self.start_token {
            self.token_at(from); // force the window to cover `from`
        }
        let window: Vec<&str> = self.chunks.iter().map(|c| c.text.as_str()).collect();
        let window = window.join("\n");
        let begin = self.virtual_offset(from).min(window.len());
        let end = self.virtual_offset(to).min(window.len());
        window[begin..end.max(begin)].to_string()
    }

    /// Offset of a token's first byte within the joined window text;
    /// indices at or past the anchor map to the window end.
    fn virtual_offset(&self, index: i32) -> usize {
        let total = self.total();
        let buffer_index = self.offset + index;
        if buffer_index < 0 {
            return 0;
        }
        let mut remaining = buffer_index;
        let mut acc = 0usize;
        for chunk in &self.chunks {
            let count = chunk.tokens.len() as i32;
            if remaining < count {
                return acc + chunk.tokens[remaining as usize].begin as usize;
            }
            remaining -= count;
            acc += chunk.text.len() + 1;
        }
        debug_assert!(buffer_index >= total, "virtual offset out of sync");
        acc.saturating_sub(1)
    }

    /// The anchor position this scanner was rooted at.
    #[inline]
    pub fn anchor(&self) -> Position {
        self.anchor
    }
}

/// Drop the trailing `Eof` the lexer appends (the scanner has its own
/// sentinel discipline) and, optionally, comment tokens.
fn strip(tokens: quill_lexer::Tokens, skip_comments: bool) -> Vec<Token> {
    let mut tokens: Vec<Token> = tokens.into_vec();
    if tokens.last().is_some_and(|t| t.is(TokenKind::Eof)) {
        tokens.pop();
    }
    if skip_comments {
        tokens.retain(|t| !t.kind.is_comment());
    }
    tokens
}
