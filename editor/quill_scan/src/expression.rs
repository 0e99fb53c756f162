//! Expression-under-cursor resolution.
//!
//! Walks backward from a cursor to the start of the smallest enclosing
//! expression (qualified names, member chains, calls, casts), for
//! signature help and hover. The walk never fails: hitting the lookback
//! sentinel terminates with the best index found so far.

use tracing::trace;

use quill_token::{Document, LanguageConfig, Position, TokenKind};

use crate::{BackwardScanner, ScanOptions};

/// Connectors that keep a postfix chain going: `::`, `.`, `->`, `.*`, `->*`.
fn is_connector(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::ColonColon
            | TokenKind::Dot
            | TokenKind::Arrow
            | TokenKind::DotStar
            | TokenKind::ArrowStar
    )
}

/// Cap on the recursive walk depth; one pathological line packed with
/// member chains must degrade, not exhaust the stack.
const WALK_ROOF: u32 = 256;

/// Backward expression walk.
///
/// The `jumped_comma` flag records that the walk crossed an argument
/// comma (the `connect(sender, SIGNAL(x), ...)` shape); once set, a
/// trailing unary/binary operator is absorbed into the expression instead
/// of stopping the walk.
#[derive(Debug, Default)]
pub struct ExpressionUnderCursor {
    jumped_comma: bool,
    depth: u32,
}

impl ExpressionUnderCursor {
    pub fn new() -> Self {
        ExpressionUnderCursor::default()
    }

    /// The expression text ending at `pos`, trimmed. Empty when nothing
    /// expression-like precedes the cursor.
    pub fn expression_at<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        pos: Position,
        config: &LanguageConfig,
    ) -> String {
        let mut scanner = BackwardScanner::new(doc, pos, config, ScanOptions::default());
        let anchor = scanner.start_token();
        let start = self.start_of_expression(&mut scanner, anchor);
        let text = scanner.text(start, anchor);
        text.trim().to_string()
    }

    /// Index of the first token of the expression ending just before
    /// `index`.
    pub fn start_of_expression<D: Document + ?Sized>(
        &mut self,
        scanner: &mut BackwardScanner<'_, D>,
        index: i32,
    ) -> i32 {
        self.jumped_comma = false;
        self.depth = 0;
        let start = self.scan(scanner, index);
        trace!(index, start, jumped_comma = self.jumped_comma, "expression walk");
        start
    }

    fn scan<D: Document + ?Sized>(
        &mut self,
        scanner: &mut BackwardScanner<'_, D>,
        index: i32,
    ) -> i32 {
        if self.depth >= WALK_ROOF {
            return index;
        }
        self.depth += 1;
        let start = self.scan_step(scanner, index);
        let result = if !self.jumped_comma || start == index {
            start
        } else {
            // After crossing an argument comma, an operator before the
            // expression belongs to it (`SIGNAL(x), y` semantics).
            let prev = scanner.token_at(start - 1);
            match prev.kind {
                TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Colon
                | TokenKind::Question
                | TokenKind::Eof => start,
                kind if kind.is_opening_bracket() => start,
                kind if kind.is_operator() => self.scan(scanner, start - 1),
                _ => start,
            }
        };
        self.depth -= 1;
        result
    }

    fn scan_step<D: Document + ?Sized>(
        &mut self,
        scanner: &mut BackwardScanner<'_, D>,
        index: i32,
    ) -> i32 {
        let tok = scanner.token_at(index - 1);

        if tok.kind.is_literal() {
            return index - 1;
        }
        match tok.kind {
            TokenKind::Eof => index,
            TokenKind::KwThis | TokenKind::KwTypeid => index - 1,
            TokenKind::Identifier => {
                if is_connector(scanner.token_at(index - 2).kind) {
                    self.scan(scanner, index - 2)
                } else {
                    index - 1
                }
            }
            kind if is_connector(kind) => {
                // Cursor directly after `::`/`.`/`->`: the chain continues
                // to the left (also covers a leading global `::`).
                let start = self.scan(scanner, index - 1);
                if start == index - 1 {
                    // Nothing before the connector: the connector itself
                    // starts the expression (global qualification).
                    index - 1
                } else {
                    start
                }
            }
            TokenKind::RParen | TokenKind::RBracket => {
                let opener = scanner.start_of_matching_brace(index);
                if opener == index {
                    return index;
                }
                if tok.is(TokenKind::RParen) {
                    if let Some(cast) = cast_before(scanner, opener) {
                        return cast;
                    }
                }
                self.scan(scanner, opener)
            }
            TokenKind::Gt => {
                // Possible template-id: `name<...>`. Only treat `>` as a
                // bracket when a matched `<` is preceded by a plausible
                // template name.
                let opener = scanner.start_of_matching_brace(index);
                if opener == index {
                    return index;
                }
                let before = scanner.token_at(opener - 1);
                if before.is(TokenKind::Identifier) || before.kind.is_cast_keyword() {
                    self.scan(scanner, opener)
                } else {
                    index
                }
            }
            TokenKind::Comma => {
                if self.jumped_comma {
                    index
                } else {
                    self.jumped_comma = true;
                    self.scan(scanner, index - 1)
                }
            }
            _ => index,
        }
    }
}

/// A cast keyword owning a matched `<...>` directly before the call
/// parenthesis at `opener`: `static_cast<T>(expr)`.
fn cast_before<D: Document + ?Sized>(
    scanner: &mut BackwardScanner<'_, D>,
    opener: i32,
) -> Option<i32> {
    if !scanner.token_at(opener - 1).is(TokenKind::Gt) {
        return None;
    }
    let angle = scanner.start_of_matching_brace(opener);
    if angle == opener {
        return None;
    }
    let keyword = scanner.token_at(angle - 1);
    keyword.kind.is_cast_keyword().then_some(angle - 1)
}

/// Position of the open parenthesis of the innermost function call
/// containing `pos`, or `None` when the cursor is not inside a call (or
/// the lookback bound was reached first).
pub fn start_of_function_call<D: Document + ?Sized>(
    doc: &D,
    pos: Position,
    config: &LanguageConfig,
) -> Option<Position> {
    let mut scanner = BackwardScanner::new(doc, pos, config, ScanOptions::default());
    let mut index = scanner.start_token();
    loop {
        let tok = scanner.token_at(index - 1);
        match tok.kind {
            // Statement boundaries and the sentinel mean "not in a call".
            TokenKind::Eof | TokenKind::Semicolon | TokenKind::LBrace => return None,
            TokenKind::LParen => return scanner.position_of(index - 1),
            TokenKind::RParen => {
                let matching = scanner.start_of_matching_brace(index);
                if matching == index {
                    return None;
                }
                index = matching;
            }
            _ => index -= 1,
        }
    }
}
