//! Backward token scanning for the Quill editor core.
//!
//! [`BackwardScanner`] presents the tokens before a cursor as a virtually
//! infinite stream addressable by signed index, pulling and caching
//! preceding lines lazily up to a configurable lookback bound. On top of it
//! sit the structural queries every editing aid needs: matching-delimiter
//! search, start of line/block, indentation lookup, and the
//! expression-under-cursor walk used by signature help.
//!
//! Exhausting the lookback bound is not an error: a permanent end-of-input
//! sentinel terminates the stream and every query degrades to a "no answer"
//! value.

mod expression;
mod scanner;

pub use expression::{start_of_function_call, ExpressionUnderCursor};
pub use scanner::{BackwardScanner, ScanOptions};
