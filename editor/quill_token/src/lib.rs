//! Shared leaf types for the Quill editor core.
//!
//! Everything in here is plain data: tokens and their kinds/flags, the
//! per-line lexer carry state, language feature configuration, cursor
//! positions, and the `Document` trait through which the engines read the
//! host editor's buffer. No module in this crate performs any scanning
//! itself -- that lives in `quill_lexer` and above.

mod document;
mod features;
mod flags;
mod kind;
mod state;
mod token;

pub use document::{previous_line_state, BufferDocument, Document, Position};
pub use features::{LanguageConfig, LanguageFeatures};
pub use flags::TokenFlags;
pub use kind::TokenKind;
pub use state::{InvalidLexState, LexMode, LexState};
pub use token::Token;
