//! Indentation configuration.

/// Tunables for the indent engine. Pure input; nothing here mutates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndentConfig {
    /// Display width of a hard tab character.
    pub hardware_tab_size: u32,
    /// One indentation unit.
    pub indent_size: u32,
    /// Extra indent for continuation lines with no alignment anchor.
    pub continuation_indent_size: u32,
    /// Offset of comment text relative to the line that opened the comment.
    pub comment_offset: u32,
}

impl Default for IndentConfig {
    fn default() -> Self {
        IndentConfig {
            hardware_tab_size: 8,
            indent_size: 4,
            continuation_indent_size: 8,
            comment_offset: 2,
        }
    }
}
