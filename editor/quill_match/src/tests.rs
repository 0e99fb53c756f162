use pretty_assertions::assert_eq;

use quill_lexer::lex_document;
use quill_token::{BufferDocument, Document, LanguageConfig, Position};

use super::{
    context_allows_auto_parentheses, matching_closer_for, paragraph_separator_on_enter,
    should_insert_matching_text,
};

fn doc(text: &str) -> BufferDocument {
    let mut doc = BufferDocument::from_text(text);
    lex_document(&mut doc, &LanguageConfig::cpp());
    doc
}

fn end_of(doc: &BufferDocument, line: u32) -> Position {
    Position::new(line, doc.line_text(line).len() as u32)
}

#[test]
fn lookahead_gate() {
    assert!(should_insert_matching_text(None));
    assert!(should_insert_matching_text(Some(' ')));
    assert!(should_insert_matching_text(Some(')')));
    assert!(should_insert_matching_text(Some(';')));
    assert!(should_insert_matching_text(Some(',')));
    assert!(should_insert_matching_text(Some('}')));
    assert!(!should_insert_matching_text(Some('x')));
    assert!(!should_insert_matching_text(Some('"')));
    assert!(!should_insert_matching_text(Some('(')));
}

// === Parens and brackets ===

#[test]
fn paren_after_identifier_is_closed() {
    let d = doc("foo");
    let config = LanguageConfig::cpp();
    assert_eq!(
        matching_closer_for(&d, end_of(&d, 0), '(', &config),
        Some(")".to_string())
    );
}

#[test]
fn bracket_gets_its_closer() {
    let d = doc("arr");
    let config = LanguageConfig::cpp();
    assert_eq!(
        matching_closer_for(&d, end_of(&d, 0), '[', &config),
        Some("]".to_string())
    );
}

#[test]
fn no_closer_when_text_follows() {
    let d = doc("foo bar");
    let config = LanguageConfig::cpp();
    // Cursor between "foo" and " bar" is fine (whitespace follows) …
    assert_eq!(
        matching_closer_for(&d, Position::new(0, 3), '(', &config),
        Some(")".to_string())
    );
    // … but not directly before "bar".
    assert_eq!(
        matching_closer_for(&d, Position::new(0, 4), '(', &config),
        None
    );
}

#[test]
fn no_closer_inside_a_comment() {
    let d = doc("// note");
    let config = LanguageConfig::cpp();
    assert!(!context_allows_auto_parentheses(&d, end_of(&d, 0), &config));
    assert_eq!(matching_closer_for(&d, end_of(&d, 0), '(', &config), None);
}

#[test]
fn comment_state_from_the_previous_line_blocks_closers() {
    let d = doc("/* open\nstill inside");
    let config = LanguageConfig::cpp();
    assert_eq!(matching_closer_for(&d, Position::new(1, 0), '(', &config), None);
    assert_eq!(matching_closer_for(&d, end_of(&d, 1), '(', &config), None);
}

// === Quotes ===

#[test]
fn quote_on_an_empty_line_is_paired() {
    let d = doc("");
    let config = LanguageConfig::cpp();
    assert_eq!(
        matching_closer_for(&d, Position::new(0, 0), '"', &config),
        Some("\"".to_string())
    );
    let d = doc("    ");
    assert_eq!(
        matching_closer_for(&d, Position::new(0, 4), '"', &config),
        Some("\"".to_string())
    );
}

#[test]
fn quote_after_an_identifier_is_not_paired() {
    // `it` + `'` must not become `it''`.
    let d = doc("it");
    let config = LanguageConfig::cpp();
    assert_eq!(matching_closer_for(&d, end_of(&d, 0), '\'', &config), None);
}

#[test]
fn quote_after_an_operator_is_paired() {
    let d = doc("s = ");
    let config = LanguageConfig::cpp();
    assert_eq!(
        matching_closer_for(&d, Position::new(0, 4), '"', &config),
        Some("\"".to_string())
    );
}

#[test]
fn quote_after_the_operator_keyword_is_paired() {
    let d = doc("String operator");
    let config = LanguageConfig::cpp();
    assert_eq!(
        matching_closer_for(&d, end_of(&d, 0), '"', &config),
        Some("\"".to_string())
    );
}

#[test]
fn quote_after_an_encoding_prefix_is_paired() {
    let config = LanguageConfig::cpp();
    for prefix in ["x = L", "x = u8", "x = R"] {
        let d = doc(prefix);
        assert_eq!(
            matching_closer_for(&d, end_of(&d, 0), '"', &config),
            Some("\"".to_string()),
            "{prefix}"
        );
    }
}

#[test]
fn quote_after_a_complete_string_opens_an_adjacent_one() {
    let d = doc("s = \"abc\"");
    let config = LanguageConfig::cpp();
    assert_eq!(
        matching_closer_for(&d, end_of(&d, 0), '"', &config),
        Some("\"".to_string())
    );
}

#[test]
fn quote_after_an_unterminated_string_is_not_paired() {
    // The typed quote closes the literal; pairing would corrupt it.
    let d = doc("s = \"abc");
    let config = LanguageConfig::cpp();
    assert_eq!(matching_closer_for(&d, end_of(&d, 0), '"', &config), None);
}

#[test]
fn char_quote_after_a_complete_char_literal_is_paired() {
    let d = doc("c = 'a'");
    let config = LanguageConfig::cpp();
    assert_eq!(
        matching_closer_for(&d, end_of(&d, 0), '\'', &config),
        Some("'".to_string())
    );
}

// === Paragraph separator (Enter after `{`) ===

fn separator(text: &str, line: u32) -> Option<String> {
    let d = doc(text);
    let config = LanguageConfig::cpp();
    paragraph_separator_on_enter(&d, end_of(&d, line), &config)
}

#[test]
fn function_body_closes_with_a_brace_and_newline() {
    assert_eq!(separator("int main() {", 0), Some("}\n".to_string()));
}

#[test]
fn class_closes_with_brace_semicolon() {
    assert_eq!(separator("class Foo {", 0), Some("};\n".to_string()));
    assert_eq!(separator("struct Point {", 0), Some("};\n".to_string()));
    assert_eq!(separator("enum Color {", 0), Some("};\n".to_string()));
}

#[test]
fn base_clauses_do_not_hide_the_class_key() {
    assert_eq!(
        separator("class Foo : public Bar, private Baz {", 0),
        Some("};\n".to_string())
    );
}

#[test]
fn namespace_closes_with_a_bare_brace() {
    assert_eq!(separator("namespace foo {", 0), Some("}".to_string()));
    assert_eq!(separator("namespace {", 0), Some("}".to_string()));
}

#[test]
fn typedef_struct_leaves_room_for_the_name() {
    assert_eq!(separator("typedef struct {", 0), Some("}".to_string()));
    assert_eq!(separator("typedef struct Foo {", 0), Some("}".to_string()));
}

#[test]
fn control_statement_blocks_close_bare() {
    assert_eq!(separator("if (x) {", 0), Some("}".to_string()));
    assert_eq!(separator("while (x) {", 0), Some("}".to_string()));
    assert_eq!(separator("for (;;) {", 0), Some("}".to_string()));
    assert_eq!(separator("switch (x) {", 0), Some("}".to_string()));
}

#[test]
fn extern_c_closes_bare() {
    assert_eq!(separator("extern \"C\" {", 0), Some("}".to_string()));
}

#[test]
fn no_completion_when_not_after_a_brace() {
    assert_eq!(separator("int x = 1;", 0), None);
}

#[test]
fn no_completion_when_text_follows_the_brace() {
    let d = doc("int main() { return 0; }");
    let config = LanguageConfig::cpp();
    assert_eq!(
        paragraph_separator_on_enter(&d, Position::new(0, 12), &config),
        None
    );
}

#[test]
fn newline_is_omitted_when_code_follows_immediately() {
    // The very next line already has code: no extra newline.
    assert_eq!(
        separator("class Foo {\nint x;", 0),
        Some("};".to_string())
    );
}

#[test]
fn newline_is_omitted_when_the_block_is_already_closed() {
    assert_eq!(
        separator("int f() {\n\n\n}", 0),
        Some("}".to_string())
    );
}

#[test]
fn multiline_signature_still_reads_as_a_function() {
    let text = "static int compute(int a,\n                   int b) {";
    assert_eq!(separator(text, 1), Some("}\n".to_string()));
}
