//! The indent computation.
//!
//! Line classification, in priority order: inside a multi-line comment;
//! preprocessor directive; continuation of an unfinished statement;
//! standalone. Character-level walks operate on *masked* line text --
//! comment bytes blanked, literal bytes replaced by `X` -- so delimiters
//! inside strings and comments never participate.

use tracing::trace;

use quill_scan::{BackwardScanner, ScanOptions};
use quill_token::{
    previous_line_state, Document, LanguageConfig, LexMode, Position, Token, TokenKind,
};

use crate::IndentConfig;

/// Bound for line-oriented walks (alignment anchors, code-line searches).
const SMALL_ROOF: u32 = 40;
/// Bound, in lines of lookback, for matching-brace searches.
const BIG_ROOF: u32 = 400;

/// Per-document indent calculator. Cheap to construct; owns no state
/// beyond its three inputs.
pub struct IndentEngine<'a, D: Document + ?Sized> {
    doc: &'a D,
    config: IndentConfig,
    language: &'a LanguageConfig,
}

impl<'a, D: Document + ?Sized> IndentEngine<'a, D> {
    pub fn new(doc: &'a D, config: IndentConfig, language: &'a LanguageConfig) -> Self {
        IndentEngine {
            doc,
            config,
            language,
        }
    }

    /// Recommended indent column for `line`. `typed` is the character
    /// whose insertion triggered the request, when there is one.
    pub fn indent_for_line(&self, line: u32, typed: Option<char>) -> u32 {
        let text = self.doc.line_text(line);
        let carry = previous_line_state(self.doc, line);

        let indent = if carry.in_comment() {
            self.indent_in_comment(line, text)
        } else if carry.in_literal() {
            // Never reformat the interior of a multi-line literal.
            self.indent_of_text(text)
        } else if carry.mode() == LexMode::Preproc {
            self.indent_for_directive_continuation(line)
        } else if typed == Some('#') && text.trim_start().starts_with('#') {
            // Directives go flush left, overriding everything else.
            0
        } else if self.is_continuation_line(line) {
            self.indent_for_continuation(line, text)
        } else {
            self.indent_for_standalone(line, text, typed)
        };
        trace!(line, ?typed, indent, "indent computed");
        indent
    }

    // ─── Comment and directive continuations ─────────────────────────────

    fn indent_in_comment(&self, line: u32, text: &str) -> u32 {
        if !only_whitespace(text) {
            // The user already wrote on this line; keep their indent.
            return self.indent_of_text(text);
        }
        let mut l = line;
        for _ in 0..SMALL_ROOF {
            if l == 0 {
                break;
            }
            l -= 1;
            let above = self.doc.line_text(l);
            if only_whitespace(above) {
                continue;
            }
            return if previous_line_state(self.doc, l).in_comment() {
                // Continuation lines copy the alignment already chosen.
                self.indent_of_text(above)
            } else {
                // The line that opened the comment: indent to its text.
                self.indent_of_text(above) + self.config.comment_offset
            };
        }
        0
    }

    fn indent_for_directive_continuation(&self, line: u32) -> u32 {
        if line == 0 {
            return self.config.indent_size;
        }
        let above = self.doc.line_text(line - 1);
        if previous_line_state(self.doc, line - 1).mode() == LexMode::Preproc {
            // Deeper continuation: keep the alignment of the previous one.
            self.indent_of_text(above)
        } else {
            self.indent_of_text(above) + self.config.indent_size
        }
    }

    // ─── Continuation lines ──────────────────────────────────────────────

    /// The target is a continuation when the statement begun above it has
    /// not been finished.
    fn is_continuation_line(&self, line: u32) -> bool {
        match self.previous_code_line(line) {
            Some(above) => self.is_unfinished_line(above),
            None => false,
        }
    }

    fn is_unfinished_line(&self, line: u32) -> bool {
        let masked = self.masked_line(line);
        let code = masked.trim_end();
        let Some(last) = code.chars().last() else {
            return false;
        };
        match last {
            '{' | '}' => false,
            // `for (i = 0;` -- a semicolon inside an unclosed paren.
            ';' => has_unclosed_delimiter(code),
            // Labels finish a line; a ternary `:` does not.
            ':' => !self.is_label_line(line),
            // `if (x)` and friends are complete; anything else trailing
            // (`,`, `=`, an operator, a bare `)` call) is unfinished.
            _ => !self.match_braceless_control(line),
        }
    }

    fn indent_for_continuation(&self, line: u32, text: &str) -> u32 {
        // A `{` opening the body aligns with the statement head instead of
        // being pushed right like ordinary continuation text.
        if text.trim_start().starts_with('{') {
            if let Some(above) = self.previous_code_line(line) {
                return self.indent_of_line(self.statement_head(above));
            }
            return 0;
        }

        let Some(mut l) = self.previous_code_line(line) else {
            return 0;
        };
        let mut delim_depth = 0i32;
        let mut brace_depth = 0i32;
        for _ in 0..SMALL_ROOF {
            let masked = self.masked_line(l);
            let bytes = masked.as_bytes();
            let mut hook: Option<usize> = None;
            let mut eq_hook: Option<usize> = None;
            let mut comma_at_top = false;
            for j in (0..bytes.len()).rev() {
                match bytes[j] {
                    b')' | b']' => delim_depth += 1,
                    b'}' => brace_depth += 1,
                    b'(' | b'[' => {
                        if delim_depth == 0 {
                            hook = Some(j);
                            break;
                        }
                        delim_depth -= 1;
                    }
                    b'{' => {
                        brace_depth -= 1;
                        if brace_depth < 0 {
                            break;
                        }
                    }
                    b',' if delim_depth == 0 && brace_depth == 0 => comma_at_top = true,
                    // `=` is a preferred anchor (RHS alignment) unless the
                    // line looks like default arguments: an `=` with a
                    // top-depth comma to its right.
                    b'=' if delim_depth == 0
                        && brace_depth == 0
                        && eq_hook.is_none()
                        && !comma_at_top
                        && is_plain_assign(bytes, j) =>
                    {
                        eq_hook = Some(j);
                    }
                    _ => {}
                }
            }

            if let Some(h) = hook.or(eq_hook) {
                // Align under the token following the anchor, when the
                // opening line carries one.
                if let Some(next) = next_non_whitespace(bytes, h + 1) {
                    return self.column_at(&masked, next);
                }
                return self.indent_of_line(l) + self.config.continuation_indent_size;
            }

            // No anchor on this line; climb while it is itself a
            // continuation of something higher up.
            if self.is_continuation_line(l) {
                if let Some(above) = self.previous_code_line(l) {
                    l = above;
                    continue;
                }
            }
            return self.indent_of_line(l) + self.config.continuation_indent_size;
        }
        self.indent_of_line(l) + self.config.continuation_indent_size
    }

    // ─── Standalone lines ────────────────────────────────────────────────

    fn indent_for_standalone(&self, line: u32, text: &str, typed: Option<char>) -> u32 {
        let left_brace = text.trim_start().starts_with('{');
        let Some(above) = self.previous_code_line(line) else {
            return 0;
        };
        let head = self.statement_head(above);
        let masked = self.masked_line(above);
        let code = masked.trim_end();

        let mut indent;
        if code.ends_with('{') {
            indent = self.indent_of_line(head) + self.config.indent_size;
        } else if code.ends_with(':') && self.is_label_line(above) {
            indent = self.indent_of_line(above) + self.config.indent_size;
        } else if self.match_braceless_control(above) {
            // The first statement under an `if (x)` gets one unit; a `{`
            // opening its body stays level with the control statement.
            indent = self.indent_of_line(head);
            if !left_brace {
                indent += self.config.indent_size;
            }
        } else {
            // A finished statement: align with it, walking through the
            // block or statement it closes and unwinding any braceless
            // control statements it satisfied.
            let mut base = head;
            if code.ends_with('}') {
                if let Some(open_line) = self.line_of_matching_open_brace(above) {
                    base = self.statement_head(open_line);
                }
            }
            indent = self.indent_of_line(base);
            let mut cur = base;
            for _ in 0..SMALL_ROOF {
                let Some(gov) = self.previous_code_line(cur) else {
                    break;
                };
                if !self.match_braceless_control(gov) {
                    break;
                }
                let gov_head = self.statement_head(gov);
                indent = self.indent_of_line(gov_head);
                cur = gov_head;
            }
        }

        // Adjustments owned by the target line itself.
        let trimmed = text.trim_start();
        if trimmed.starts_with('}') {
            indent = indent.saturating_sub(self.config.indent_size);
        } else if self.is_label_line(line) {
            // Labels, `case`, access specifiers, and initializer colons
            // step one unit back out -- but only while the line sits at an
            // untouched position (never fight deliberate user formatting).
            let label_indent = indent.saturating_sub(self.config.indent_size);
            let current = self.indent_of_text(text);
            indent = if typed == Some(':') || current == indent || current == label_indent {
                label_indent
            } else {
                current
            };
        }
        indent
    }

    // ─── Structure helpers ───────────────────────────────────────────────

    /// Last line, at or above `line - 1`, that carries actual code.
    /// Blank, comment-only, and preprocessor lines are skipped.
    fn previous_code_line(&self, line: u32) -> Option<u32> {
        let mut l = line;
        for _ in 0..SMALL_ROOF {
            if l == 0 {
                return None;
            }
            l -= 1;
            if previous_line_state(self.doc, l).mode() == LexMode::Preproc {
                continue;
            }
            let masked = self.masked_line(l);
            if only_whitespace(&masked) {
                continue;
            }
            if masked.trim_start().starts_with('#') {
                continue;
            }
            return Some(l);
        }
        None
    }

    /// First line of the (possibly multi-line) statement that `line`
    /// belongs to.
    fn statement_head(&self, line: u32) -> u32 {
        let mut l = line;
        for _ in 0..SMALL_ROOF {
            if !self.is_continuation_line(l) {
                break;
            }
            match self.previous_code_line(l) {
                Some(above) => l = above,
                None => break,
            }
        }
        l
    }

    /// Does `line` end with a braceless control statement head:
    /// `if (...)`, `while (...)`, `for (...)`, a trailing `else` (or
    /// `foreach (...)` with Qt extensions)?
    fn match_braceless_control(&self, line: u32) -> bool {
        let masked = self.masked_line(line);
        let code = masked.trim_end();
        if ends_with_word(code, "else") {
            return true;
        }
        if !code.ends_with(')') {
            return false;
        }
        let mut scanner = self.scanner_at_eol(line, SMALL_ROOF);
        if !scanner.la(1).is(TokenKind::RParen) {
            return false;
        }
        let start = scanner.start_token();
        let opener = scanner.start_of_matching_brace(start);
        if opener == start {
            return false;
        }
        matches!(
            scanner.token_at(opener - 1).kind,
            TokenKind::KwIf | TokenKind::KwFor | TokenKind::KwWhile | TokenKind::KwForeach
        )
    }

    /// Line holding the `{` that matches the `}` closing `line`.
    fn line_of_matching_open_brace(&self, line: u32) -> Option<u32> {
        let mut scanner = self.scanner_at_eol(line, BIG_ROOF);
        if !scanner.la(1).is(TokenKind::RBrace) {
            return None;
        }
        let start = scanner.start_token();
        let opener = scanner.start_of_matching_brace(start);
        if opener == start {
            return None;
        }
        scanner.position_of(opener).map(|pos| pos.line)
    }

    fn scanner_at_eol(&self, line: u32, max_lines: u32) -> BackwardScanner<'a, D> {
        let column = self.doc.line_text(line).len() as u32;
        BackwardScanner::new(
            self.doc,
            Position::new(line, column),
            self.language,
            ScanOptions {
                max_lines,
                ..ScanOptions::default()
            },
        )
    }

    /// Label-shaped lines: `case`/`default`, access specifiers (including
    /// Qt section keywords), `name:`, or a leading constructor-initializer
    /// colon.
    fn is_label_line(&self, line: u32) -> bool {
        let tokens = self.line_tokens(line);
        let Some(first) = tokens.first() else {
            return false;
        };
        match first.kind {
            TokenKind::KwCase | TokenKind::KwDefault | TokenKind::Colon => true,
            kind if kind.is_access_specifier() => true,
            TokenKind::Identifier => tokens.len() == 2 && tokens[1].is(TokenKind::Colon),
            _ => false,
        }
    }

    // ─── Text helpers ────────────────────────────────────────────────────

    fn line_tokens(&self, line: u32) -> Vec<Token> {
        let carry = previous_line_state(self.doc, line);
        let (tokens, _) = quill_lexer::tokenize(self.doc.line_text(line), carry, self.language);
        tokens
            .into_iter()
            .filter(|t| !t.kind.is_comment() && !t.is(TokenKind::Eof))
            .collect()
    }

    /// Line text with comment bytes blanked and literal bytes replaced by
    /// `X`, so delimiter walks never see quoted or commented characters.
    fn masked_line(&self, line: u32) -> String {
        let text = self.doc.line_text(line);
        let carry = previous_line_state(self.doc, line);
        let (tokens, _) = quill_lexer::tokenize(text, carry, self.language);
        let mut bytes = text.as_bytes().to_vec();
        for token in &tokens {
            let fill = if token.kind.is_comment() {
                b' '
            } else if token.kind.is_literal() {
                b'X'
            } else {
                continue;
            };
            for b in &mut bytes[token.range()] {
                *b = fill;
            }
        }
        String::from_utf8(bytes).unwrap_or_default()
    }

    fn indent_of_line(&self, line: u32) -> u32 {
        self.indent_of_text(self.doc.line_text(line))
    }

    /// Column of the first non-whitespace character, tabs expanded.
    fn indent_of_text(&self, text: &str) -> u32 {
        let end = text
            .bytes()
            .position(|b| b != b' ' && b != b'\t')
            .unwrap_or(text.len());
        self.column_at(text, end)
    }

    /// Display column of a byte index, expanding hard tabs.
    fn column_at(&self, text: &str, index: usize) -> u32 {
        let tab = self.config.hardware_tab_size.max(1);
        let mut column = 0u32;
        for (i, ch) in text.char_indices() {
            if i >= index {
                break;
            }
            if ch == '\t' {
                column = (column / tab + 1) * tab;
            } else {
                column += 1;
            }
        }
        column
    }
}

fn only_whitespace(text: &str) -> bool {
    text.trim().is_empty()
}

/// `(`/`[` opened on this line and never closed on it.
fn has_unclosed_delimiter(code: &str) -> bool {
    let mut depth = 0i32;
    for b in code.bytes() {
        match b {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            _ => {}
        }
    }
    depth > 0
}

fn ends_with_word(code: &str, word: &str) -> bool {
    if !code.ends_with(word) {
        return false;
    }
    let before = code.len() - word.len();
    before == 0
        || !code.as_bytes()[before - 1].is_ascii_alphanumeric()
            && code.as_bytes()[before - 1] != b'_'
}

/// An `=` that is assignment, not part of `==`, `<=`, `+=`, ...
fn is_plain_assign(bytes: &[u8], j: usize) -> bool {
    let compound = b"=!<>+-*/%&|^";
    if j > 0 && compound.contains(&bytes[j - 1]) {
        return false;
    }
    if j + 1 < bytes.len() && bytes[j + 1] == b'=' {
        return false;
    }
    true
}

fn next_non_whitespace(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| bytes[i] != b' ' && bytes[i] != b'\t')
}
