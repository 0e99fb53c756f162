use pretty_assertions::assert_eq;

use quill_token::{
    previous_line_state, BufferDocument, Document, LanguageConfig, LanguageFeatures, LexMode,
    LexState, TokenKind,
};

use super::{lex_document, tokenize, Tokens};

fn cpp() -> LanguageConfig {
    LanguageConfig::cpp()
}

fn lex(text: &str) -> Tokens {
    tokenize(text, LexState::default(), &cpp()).0
}

fn kinds(text: &str) -> Vec<TokenKind> {
    lex(text).iter().map(|t| t.kind).collect()
}

fn end_state(text: &str, start: LexState) -> LexState {
    tokenize(text, start, &cpp()).1
}

#[test]
fn empty_line_is_just_eof() {
    let tokens = lex("");
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is(TokenKind::Eof));
    assert_eq!(tokens[0].begin, 0);
}

#[test]
fn simple_declaration() {
    assert_eq!(
        kinds("int x = 42;"),
        vec![
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Eq,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn token_offsets_are_line_relative() {
    let tokens = lex("  foo(bar);");
    assert_eq!(tokens[0].begin, 2);
    assert_eq!(tokens[0].len, 3);
    assert_eq!(&"  foo(bar);"[tokens[2].range()], "bar");
}

#[test]
fn first_token_is_flagged_line_start() {
    let tokens = lex("   x + y");
    assert!(tokens[0].flags.is_line_start());
    assert!(tokens[0].flags.has_space_before());
    assert!(!tokens[1].flags.is_line_start());
    assert!(tokens[1].flags.has_space_before());
}

#[test]
fn structural_keywords_are_distinguished() {
    assert_eq!(
        kinds("if (x) return; else while (y) break;"),
        vec![
            TokenKind::KwIf,
            TokenKind::LParen,
            TokenKind::Identifier,
            TokenKind::RParen,
            TokenKind::KwReturn,
            TokenKind::Semicolon,
            TokenKind::KwElse,
            TokenKind::KwWhile,
            TokenKind::LParen,
            TokenKind::Identifier,
            TokenKind::RParen,
            TokenKind::KwBreak,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn qt_keywords_only_with_feature() {
    let plain = tokenize("signals:", LexState::default(), &cpp()).0;
    assert!(plain[0].is(TokenKind::Identifier));
    let qt = tokenize("signals:", LexState::default(), &LanguageConfig::qt_cpp()).0;
    assert!(qt[0].is(TokenKind::KwSignals));
}

// === Operators ===

#[test]
fn maximal_munch_operators() {
    assert_eq!(
        kinds("a->b ->* x <<= 1 >>= 2"),
        vec![
            TokenKind::Identifier,
            TokenKind::Arrow,
            TokenKind::Identifier,
            TokenKind::ArrowStar,
            TokenKind::Identifier,
            TokenKind::ShlEq,
            TokenKind::IntLiteral,
            TokenKind::ShrEq,
            TokenKind::IntLiteral,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn scope_member_and_ellipsis() {
    assert_eq!(
        kinds("std::x.y ... .* ::"),
        vec![
            TokenKind::Identifier,
            TokenKind::ColonColon,
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::Ellipsis,
            TokenKind::DotStar,
            TokenKind::ColonColon,
            TokenKind::Eof,
        ]
    );
}

// === Numbers ===

#[test]
fn numeric_literals() {
    assert_eq!(kinds("42")[0], TokenKind::IntLiteral);
    assert_eq!(kinds("0xFF")[0], TokenKind::IntLiteral);
    assert_eq!(kinds("3.14")[0], TokenKind::FloatLiteral);
    assert_eq!(kinds("1e-5")[0], TokenKind::FloatLiteral);
    assert_eq!(kinds("1.5e+10f")[0], TokenKind::FloatLiteral);
    assert_eq!(kinds("0x1p-3")[0], TokenKind::FloatLiteral);
    assert_eq!(kinds("42ull")[0], TokenKind::IntLiteral);
}

#[test]
fn digit_separators_are_one_token() {
    let tokens = lex("1'000'000");
    assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
    assert_eq!(tokens[0].len, 9);
}

#[test]
fn leading_dot_float() {
    let tokens = lex(".5f");
    assert_eq!(tokens[0].kind, TokenKind::FloatLiteral);
    assert_eq!(tokens[0].len, 3);
}

// === Strings, chars, raw strings ===

#[test]
fn terminated_string_resets_state() {
    let (tokens, state) = tokenize(r#"x = "hi";"#, LexState::default(), &cpp());
    assert_eq!(tokens[2].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[2].len, 4);
    assert!(state.is_default());
}

#[test]
fn escaped_quote_does_not_terminate() {
    let tokens = lex(r#""a\"b""#);
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].len, 6);
}

#[test]
fn unterminated_string_without_backslash_ends_with_line() {
    let (tokens, state) = tokenize(r#""oops"#, LexState::default(), &cpp());
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert!(state.is_default());
}

#[test]
fn backslash_continued_string_carries_state() {
    let state = end_state("s = \"abc \\", LexState::default());
    assert_eq!(state.mode(), LexMode::String);

    // Continuation line: the remainder is a joined string token.
    let (tokens, state) = tokenize("def\"; y;", state, &cpp());
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert!(tokens[0].flags.is_joined());
    assert!(!tokens[0].flags.is_line_start());
    assert_eq!(tokens[1].kind, TokenKind::Semicolon);
    assert!(state.is_default());
}

#[test]
fn char_literal_and_continuation() {
    assert_eq!(kinds("'a'")[0], TokenKind::CharLiteral);
    let state = end_state("c = '\\", LexState::default());
    assert_eq!(state.mode(), LexMode::Char);
}

#[test]
fn encoding_prefixes_fuse_with_the_literal() {
    let tokens = lex(r#"L"wide" u8"utf""#);
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].begin, 0);
    assert_eq!(tokens[0].len, 7);
    assert_eq!(tokens[1].kind, TokenKind::StringLiteral);
}

#[test]
fn raw_string_single_line() {
    let tokens = lex(r#"R"(a "quoted" \ thing)""#);
    assert_eq!(tokens[0].kind, TokenKind::RawStringLiteral);
    assert_eq!(tokens[0].len, 23);
}

#[test]
fn raw_string_with_delimiter_ignores_false_closers() {
    let tokens = lex(r#"R"xy(text )zz" more)xy" done"#);
    assert_eq!(tokens[0].kind, TokenKind::RawStringLiteral);
    assert_eq!(tokens[0].len, 23);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn raw_string_spans_lines_via_delimiter_summary() {
    let state = end_state(r#"auto s = R"key(first"#, LexState::default());
    assert_eq!(state.mode(), LexMode::RawString);
    assert_eq!(state.raw_delimiter_len(), 3);

    // Wrong delimiter on the next line keeps the state.
    let state = end_state("still )nope\" inside", state);
    assert_eq!(state.mode(), LexMode::RawString);

    // Matching delimiter closes it.
    let (tokens, state) = tokenize("last)key\"; x;", state, &cpp());
    assert_eq!(tokens[0].kind, TokenKind::RawStringLiteral);
    assert_eq!(tokens[0].len, 9);
    assert_eq!(tokens[1].kind, TokenKind::Semicolon);
    assert!(state.is_default());
}

// === Comments ===

#[test]
fn line_comments_and_doc_comments() {
    assert_eq!(kinds("x; // trailing")[2], TokenKind::Comment);
    assert_eq!(kinds("/// docs")[0], TokenKind::DocComment);
    assert_eq!(kinds("//! docs")[0], TokenKind::DocComment);
}

#[test]
fn block_comment_on_one_line() {
    let (tokens, state) = tokenize("a /* mid */ b", LexState::default(), &cpp());
    assert_eq!(tokens[1].kind, TokenKind::Comment);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert!(state.is_default());
}

#[test]
fn empty_block_comment_is_not_doc() {
    assert_eq!(kinds("/**/")[0], TokenKind::Comment);
    assert_eq!(kinds("/** doc */")[0], TokenKind::DocComment);
    assert_eq!(kinds("/*! doc */")[0], TokenKind::DocComment);
}

#[test]
fn block_comment_spans_lines() {
    let state = end_state("before /* open", LexState::default());
    assert_eq!(state.mode(), LexMode::BlockComment);

    // Whole middle line is one comment token, still open.
    let (tokens, state) = tokenize("middle * not closed", state, &cpp());
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert!(tokens[0].flags.is_line_start());
    assert_eq!(state.mode(), LexMode::BlockComment);

    // Closing line: comment token then code.
    let (tokens, state) = tokenize("end */ x;", state, &cpp());
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert!(state.is_default());
}

#[test]
fn doc_comment_mode_survives_continuation() {
    let state = end_state("/** api", LexState::default());
    assert_eq!(state.mode(), LexMode::DocComment);
    let (tokens, _) = tokenize(" * more */", state, &cpp());
    assert_eq!(tokens[0].kind, TokenKind::DocComment);
}

#[test]
fn empty_line_inside_comment_keeps_state() {
    let state = end_state("/* open", LexState::default());
    let (tokens, state) = tokenize("", state, &cpp());
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is(TokenKind::Eof));
    assert_eq!(state.mode(), LexMode::BlockComment);
}

// === Preprocessor ===

#[test]
fn include_angle_payload_is_one_token() {
    assert_eq!(
        kinds("#include <vector>"),
        vec![
            TokenKind::Hash,
            TokenKind::Identifier,
            TokenKind::AngleStringLiteral,
            TokenKind::Eof,
        ]
    );
    let tokens = lex("#include <vector>");
    assert_eq!(tokens[2].len, 8);
}

#[test]
fn import_and_include_next_get_the_same_treatment() {
    assert_eq!(kinds("#import <Foundation/Foundation.h>")[2], TokenKind::AngleStringLiteral);
    assert_eq!(kinds("#include_next <stdio.h>")[2], TokenKind::AngleStringLiteral);
}

#[test]
fn quoted_include_stays_a_string() {
    assert_eq!(kinds("#include \"local.h\"")[2], TokenKind::StringLiteral);
}

#[test]
fn angle_exception_does_not_apply_to_ordinary_less_than() {
    assert_eq!(
        kinds("a < b > c"),
        vec![
            TokenKind::Identifier,
            TokenKind::Lt,
            TokenKind::Identifier,
            TokenKind::Gt,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
    // `#define` is a directive, but not an include: `<` is an operator.
    assert_eq!(kinds("#define LT <")[3], TokenKind::Lt);
}

#[test]
fn continued_directive_carries_preproc_state() {
    let state = end_state("#define LIST(x) \\", LexState::default());
    assert_eq!(state.mode(), LexMode::Preproc);

    // Tokens on the continuation line are joined, not line starts.
    let (tokens, state) = tokenize("    x(1) x(2)", state, &cpp());
    assert!(tokens[0].flags.is_joined());
    assert!(!tokens[0].flags.is_line_start());
    assert!(state.is_default());

    // A continued line that itself ends in a backslash stays open.
    let state = end_state("#define A \\", LexState::default());
    let state = end_state("    b \\", state);
    assert_eq!(state.mode(), LexMode::Preproc);
}

#[test]
fn stray_backslash_mid_line_is_an_error_token() {
    assert_eq!(kinds("a \\ b")[1], TokenKind::Error);
}

#[test]
fn hash_hash_token() {
    assert_eq!(kinds("#define CAT(a, b) a ## b")[9], TokenKind::HashHash);
}

// === Dialects ===

#[test]
fn objc_at_keywords_fuse() {
    let objc = LanguageConfig::with_features(
        LanguageFeatures::CXX11 | LanguageFeatures::OBJC,
    );
    let (tokens, _) = tokenize("@interface Foo", LexState::default(), &objc);
    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens[0].len, 10);

    // Without the feature `@` stays a lone token.
    let (tokens, _) = tokenize("@interface", LexState::default(), &cpp());
    assert_eq!(tokens[0].kind, TokenKind::At);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn stray_bytes_become_error_tokens() {
    let tokens = lex("a $ b");
    assert_eq!(tokens[1].kind, TokenKind::Error);
    let tokens = lex("é");
    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[0].len, 2);
}

// === Document-level state threading ===

#[test]
fn lex_document_stores_composable_states() {
    let mut doc = BufferDocument::from_text("int a; /* start\nstill inside\nend */ int b;\n");
    lex_document(&mut doc, &cpp());

    // Replaying any line from its stored previous state matches the
    // full-document pass.
    for line in 0..doc.line_count() {
        let carry = previous_line_state(&doc, line);
        let (_, end) = tokenize(doc.line_text(line), carry, &cpp());
        assert_eq!(Some(end), doc.end_state(line), "line {line}");
    }
    assert_eq!(
        doc.end_state(0).map(LexState::mode),
        Some(LexMode::BlockComment)
    );
    assert_eq!(doc.end_state(2), Some(LexState::default()));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tokenize_is_deterministic(text in "[ -~]{0,60}", raw in any::<u32>()) {
            let state = LexState::from_raw(raw).unwrap_or_default();
            let config = cpp();
            let first = tokenize(&text, state, &config);
            let second = tokenize(&text, state, &config);
            prop_assert_eq!(first.0.as_slice(), second.0.as_slice());
            prop_assert_eq!(first.1, second.1);
        }

        #[test]
        fn every_result_ends_with_eof(text in "[ -~]{0,60}") {
            let (tokens, _) = tokenize(&text, LexState::default(), &cpp());
            let last = tokens[tokens.len() - 1];
            prop_assert_eq!(last.kind, TokenKind::Eof);
            prop_assert_eq!(last.begin as usize, text.len());
        }

        #[test]
        fn tokens_are_ordered_and_in_bounds(text in "[ -~]{0,60}") {
            let (tokens, _) = tokenize(&text, LexState::default(), &cpp());
            let mut last_end = 0u32;
            for tok in &tokens {
                prop_assert!(tok.begin >= last_end);
                prop_assert!(tok.end() as usize <= text.len());
                last_end = tok.end();
            }
        }

        #[test]
        fn state_composition_matches_full_replay(
            lines in proptest::collection::vec("[ -~]{0,40}", 1..8)
        ) {
            let config = cpp();
            let mut doc = BufferDocument::from_lines(lines.clone());
            lex_document(&mut doc, &config);

            // Replay from scratch, line by line.
            let mut state = LexState::default();
            for (i, line) in lines.iter().enumerate() {
                prop_assert_eq!(previous_line_state(&doc, i as u32), state);
                let (_, end) = tokenize(line, state, &config);
                state = end;
            }
        }
    }
}
