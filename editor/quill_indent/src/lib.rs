//! Indentation engine for the Quill editor core.
//!
//! Given a document and a target line, [`IndentEngine::indent_for_line`]
//! recommends an indent column. The engine only ever looks *upward* --
//! classification of the target line (inside a comment, preprocessor
//! directive, continuation of an unfinished statement, or standalone) is
//! decided entirely from the lines above it, and every backward walk is
//! bounded so adversarial input degrades to an imperfect guess instead of
//! a stall.

mod config;
mod engine;

pub use config::IndentConfig;
pub use engine::IndentEngine;
