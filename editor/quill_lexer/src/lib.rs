//! Stateful per-line lexer for the Quill editor core.
//!
//! The central contract is [`tokenize`]: a pure function of one line of
//! text and the carry-in [`LexState`](quill_token::LexState), producing the
//! line's tokens and the carry-out state. Because the function has no other
//! inputs, re-lexing after an edit only ever touches the edited line -- the
//! stored end state of the line above is all the context needed.
//!
//! Invalid and in-progress code is the normal case here, not an error case:
//! unterminated strings and comments produce best-effort tokens plus a
//! state that says "still inside".
//!
//! [`classify_line`] is the lighter table-driven variant used for syntax
//! highlighting; it shares the same state currency but only produces
//! per-range style categories.

mod classify;
mod cursor;
mod keywords;
mod lexer;

pub use classify::{classify_line, Category, StyleSpan, StyleSpans};
pub use lexer::{lex_document, tokenize, Tokens};
