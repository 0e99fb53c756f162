//! The document-model collaborator interface.
//!
//! The host editor owns line storage and the per-line end-state cache; this
//! core only reads them. [`BufferDocument`] is the in-memory implementation
//! used by tests and the CLI.

use crate::LexState;

/// A cursor position: line index and byte column within that line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Read-only view of the host editor's buffer.
///
/// `end_state` returns the *stored* lexer end state of a line, or `None`
/// when the line was never lexed. Callers must treat `None` as "unknown,
/// assume nothing spans lines" -- see [`previous_line_state`].
pub trait Document {
    fn line_text(&self, line: u32) -> &str;
    fn line_count(&self) -> u32;
    fn end_state(&self, line: u32) -> Option<LexState>;
}

/// The carry-in state for lexing `line`: the stored end state of the line
/// above, degrading to the default state at the document start or when no
/// state was stored.
pub fn previous_line_state<D: Document + ?Sized>(doc: &D, line: u32) -> LexState {
    if line == 0 {
        return LexState::default();
    }
    doc.end_state(line - 1).unwrap_or_default()
}

/// Simple line-vector document for tests and tooling.
///
/// End states start out unknown; `quill_lexer::lex_document` fills them in
/// the way a real editor does after a highlight pass. Edits invalidate the
/// stored states of the edited line and everything below it.
#[derive(Clone, Debug, Default)]
pub struct BufferDocument {
    lines: Vec<String>,
    states: Vec<Option<LexState>>,
}

impl BufferDocument {
    pub fn from_lines(lines: Vec<String>) -> Self {
        let states = vec![None; lines.len()];
        BufferDocument { lines, states }
    }

    /// Split `text` on `\n` into lines. A trailing newline does not create
    /// an extra empty line.
    pub fn from_text(text: &str) -> Self {
        let stripped = text.strip_suffix('\n').unwrap_or(text);
        Self::from_lines(stripped.split('\n').map(str::to_string).collect())
    }

    /// Replace one line's text, invalidating stored states from that line on.
    pub fn replace_line(&mut self, line: u32, text: impl Into<String>) {
        let line = line as usize;
        self.lines[line] = text.into();
        for state in &mut self.states[line..] {
            *state = None;
        }
    }

    /// Store the lexer end state for a line.
    pub fn set_end_state(&mut self, line: u32, state: LexState) {
        self.states[line as usize] = Some(state);
    }

    /// Replace all stored end states at once (one entry per line).
    pub fn set_end_states(&mut self, states: Vec<LexState>) {
        debug_assert_eq!(states.len(), self.lines.len());
        self.states = states.into_iter().map(Some).collect();
    }
}

impl Document for BufferDocument {
    fn line_text(&self, line: u32) -> &str {
        self.lines
            .get(line as usize)
            .map_or("", String::as_str)
    }

    fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    fn end_state(&self, line: u32) -> Option<LexState> {
        self.states.get(line as usize).copied().flatten()
    }
}
