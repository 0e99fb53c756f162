//! Auto-closing decisions for the Quill editor core.
//!
//! Pure decision functions, one call per keystroke: whether a just-typed
//! opener should get its closer inserted, whether a quote should be
//! paired, and what closes a `{` when Enter is pressed right after it.
//! Positions name the cursor location *before* the editor inserts the
//! typed character; the functions only read the document.

use tracing::trace;

use quill_lexer::{classify_line, Category};
use quill_scan::{BackwardScanner, ScanOptions};
use quill_token::{previous_line_state, Document, LanguageConfig, Position, TokenKind};

/// Auto-closing is only offered where it cannot collide with meaningful
/// text: end of line, whitespace, or a closing/separating character.
pub fn should_insert_matching_text(lookahead: Option<char>) -> bool {
    match lookahead {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '{' | '}' | ']' | ')' | ';' | ','),
    }
}

/// Auto-parentheses are suppressed inside comments.
pub fn context_allows_auto_parentheses<D: Document + ?Sized>(
    doc: &D,
    pos: Position,
    config: &LanguageConfig,
) -> bool {
    !in_comment(doc, pos, config)
}

/// Auto-quotes are suppressed inside comments (string interiors are
/// handled by the quote rules themselves).
pub fn context_allows_auto_quotes<D: Document + ?Sized>(
    doc: &D,
    pos: Position,
    config: &LanguageConfig,
) -> bool {
    !in_comment(doc, pos, config)
}

/// The closer to insert after `typed`, if any.
pub fn matching_closer_for<D: Document + ?Sized>(
    doc: &D,
    pos: Position,
    typed: char,
    config: &LanguageConfig,
) -> Option<String> {
    let line = doc.line_text(pos.line);
    let lookahead = line
        .get(pos.column as usize..)
        .and_then(|rest| rest.chars().next());
    if !should_insert_matching_text(lookahead) {
        return None;
    }
    match typed {
        '(' if context_allows_auto_parentheses(doc, pos, config) => Some(")".to_string()),
        '[' if context_allows_auto_parentheses(doc, pos, config) => Some("]".to_string()),
        '"' | '\'' if context_allows_auto_quotes(doc, pos, config) => {
            matching_quote_for(doc, pos, typed, config)
        }
        _ => None,
    }
}

/// Whether a just-typed quote should be paired.
///
/// Pairing happens on an empty line, after a *complete* literal of the
/// same kind (opening an adjacent literal), after an operator, after the
/// `operator` keyword, or after an encoding prefix (`L`, `U`, `u`, `u8`,
/// `R`). Anything else -- most importantly a plain identifier, as in
/// `it's` typed inside a word -- gets no auto-quote.
pub fn matching_quote_for<D: Document + ?Sized>(
    doc: &D,
    pos: Position,
    quote: char,
    config: &LanguageConfig,
) -> Option<String> {
    let line = doc.line_text(pos.line);
    let cut = (pos.column as usize).min(line.len());
    if line.get(..cut).is_some_and(|prefix| prefix.trim().is_empty()) {
        return Some(quote.to_string());
    }

    let mut scanner = BackwardScanner::new(doc, pos, config, ScanOptions::default());
    let prev = scanner.la(1);
    let prev_index = scanner.start_token() - 1;
    let insert = match prev.kind {
        TokenKind::StringLiteral | TokenKind::RawStringLiteral if quote == '"' => {
            let text = scanner.text_of(prev_index);
            text.len() >= 2 && text.ends_with('"')
        }
        TokenKind::CharLiteral if quote == '\'' => {
            let text = scanner.text_of(prev_index);
            text.len() >= 2 && text.ends_with('\'')
        }
        TokenKind::KwOperator => true,
        TokenKind::Identifier => {
            matches!(scanner.text_of(prev_index).as_str(), "L" | "U" | "u" | "u8" | "R")
        }
        TokenKind::Eof => true,
        kind => kind.is_operator(),
    };
    insert.then(|| quote.to_string())
}

/// Completion text for Enter pressed right after an opening `{`: `}` or
/// `};`, possibly with a trailing newline. `None` when the cursor is not
/// directly after a `{` or non-blank text follows it.
///
/// A small closed decision table keyed on the construct owning the brace:
/// class keys get `};`, `namespace` and `typedef struct` a bare `}`,
/// control-statement and `extern "C"` blocks a bare `}`, and function
/// bodies `}` plus a newline when there is room below.
pub fn paragraph_separator_on_enter<D: Document + ?Sized>(
    doc: &D,
    pos: Position,
    config: &LanguageConfig,
) -> Option<String> {
    let line = doc.line_text(pos.line);
    if line
        .get(pos.column as usize..)
        .is_some_and(|rest| !rest.trim().is_empty())
    {
        return None;
    }

    let mut scanner = BackwardScanner::new(doc, pos, config, ScanOptions::default());
    let mut index = scanner.start_token();
    if !scanner.token_at(index - 1).is(TokenKind::LBrace) {
        return None;
    }
    index -= 1; // consume the `{`

    let with_newline = |base: &str| {
        if should_append_newline(doc, pos.line) {
            format!("{base}\n")
        } else {
            base.to_string()
        }
    };

    let owner = scanner.token_at(index - 1);
    let result = match owner.kind {
        // extern "C" {
        TokenKind::StringLiteral if scanner.token_at(index - 2).is(TokenKind::KwExtern) => {
            "}".to_string()
        }
        TokenKind::Identifier => {
            // Search left for the construct keyword, stopping at sync
            // tokens (statement or bracket boundaries).
            let mut i = index - 1;
            loop {
                let current = scanner.token_at(i - 1);
                match current.kind {
                    TokenKind::KwClass
                    | TokenKind::KwStruct
                    | TokenKind::KwUnion
                    | TokenKind::KwEnum => {
                        if scanner.token_at(i - 2).is(TokenKind::KwTypedef) {
                            // typedef struct Foo { -- the name follows the brace
                            break "}".to_string();
                        }
                        break with_newline("};");
                    }
                    TokenKind::KwNamespace => break "}".to_string(),
                    TokenKind::Eof
                    | TokenKind::Semicolon
                    | TokenKind::LBrace
                    | TokenKind::RBrace
                    | TokenKind::LParen
                    | TokenKind::RParen
                    | TokenKind::LBracket
                    | TokenKind::RBracket => break with_newline("}"),
                    _ => i -= 1,
                }
            }
        }
        TokenKind::KwClass | TokenKind::KwStruct | TokenKind::KwUnion | TokenKind::KwEnum => {
            if scanner.token_at(index - 2).is(TokenKind::KwTypedef) {
                "}".to_string()
            } else {
                with_newline("};")
            }
        }
        TokenKind::KwNamespace => "}".to_string(),
        TokenKind::RParen => {
            // `...) {` -- a control statement or a function body.
            let opener = scanner.start_of_matching_brace(index);
            let mut control = false;
            if opener != index {
                control = matches!(
                    scanner.token_at(opener - 1).kind,
                    TokenKind::KwIf
                        | TokenKind::KwFor
                        | TokenKind::KwWhile
                        | TokenKind::KwSwitch
                        | TokenKind::KwForeach
                );
            }
            if control {
                "}".to_string()
            } else {
                with_newline("}")
            }
        }
        _ => with_newline("}"),
    };
    trace!(owner = owner.kind.display_name(), result = %result, "paragraph separator");
    Some(result)
}

/// Room below for the inserted closer's newline: the next two lines are
/// blank (or past the end), and the code after them does not already
/// close the block.
fn should_append_newline<D: Document + ?Sized>(doc: &D, line: u32) -> bool {
    let count = doc.line_count();
    let blank = |l: u32| l >= count || doc.line_text(l).trim().is_empty();
    if !(blank(line + 1) && blank(line + 2)) {
        return false;
    }
    let mut l = line + 1;
    let mut steps = 0;
    while l < count && steps < 64 {
        let text = doc.line_text(l);
        if !text.trim().is_empty() {
            return !text.trim_start().starts_with('}');
        }
        l += 1;
        steps += 1;
    }
    true
}

/// Is the character just left of the cursor painted as comment?
fn in_comment<D: Document + ?Sized>(doc: &D, pos: Position, config: &LanguageConfig) -> bool {
    let carry = previous_line_state(doc, pos.line);
    if pos.column == 0 {
        return carry.in_comment();
    }
    let line = doc.line_text(pos.line);
    let probe = (pos.column - 1).min(line.len().saturating_sub(1) as u32);
    let (spans, _) = classify_line(line, carry, config);
    spans
        .iter()
        .find(|s| s.begin <= probe && probe < s.begin + s.len)
        .map_or(carry.in_comment(), |s| s.category == Category::Comment)
}

#[cfg(test)]
mod tests;
