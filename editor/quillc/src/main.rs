//! Quill inspection CLI.
//!
//! Dumps what the editor core computes for a file: tokens, highlight
//! classifications, indent recommendations, and the expression ending at
//! a position. Useful for eyeballing lexer behavior on real sources.

use std::process::ExitCode;
use std::sync::Once;

use quill_indent::{IndentConfig, IndentEngine};
use quill_lexer::{classify_line, tokenize};
use quill_scan::ExpressionUnderCursor;
use quill_token::{
    previous_line_state, BufferDocument, Document, LanguageConfig, Position,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Enable with `RUST_LOG=quill_scan=trace` (or any crate of the core).
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        print_usage();
        return ExitCode::FAILURE;
    }

    let command = args[1].as_str();
    let path = args[2].as_str();
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let config = LanguageConfig::qt_cpp();
    let mut doc = BufferDocument::from_text(&source);
    quill_lexer::lex_document(&mut doc, &config);

    match command {
        "tokens" => dump_tokens(&doc, &config),
        "classify" => dump_classifications(&doc, &config),
        "indent" => dump_indents(&doc, &config),
        "expr" => {
            let Some(pos) = parse_position(&args[3..]) else {
                eprintln!("Usage: quill expr <file> <line> <column>");
                return ExitCode::FAILURE;
            };
            dump_expression(&doc, pos, &config);
        }
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn print_usage() {
    eprintln!("Usage: quill <command> <file> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  tokens <file>                Dump the token stream per line");
    eprintln!("  classify <file>              Dump highlight classifications per line");
    eprintln!("  indent <file>                Dump computed indent columns");
    eprintln!("  expr <file> <line> <column>  Expression ending at a position");
}

fn parse_position(args: &[String]) -> Option<Position> {
    let line = args.first()?.parse().ok()?;
    let column = args.get(1)?.parse().ok()?;
    Some(Position::new(line, column))
}

fn dump_tokens(doc: &BufferDocument, config: &LanguageConfig) {
    for line in 0..doc.line_count() {
        let text = doc.line_text(line);
        let (tokens, state) = tokenize(text, previous_line_state(doc, line), config);
        print!("{line:4}:");
        for token in tokens.iter().filter(|t| t.len > 0) {
            print!(" {}[{}]", token.kind.display_name(), &text[token.range()]);
        }
        if !state.is_default() {
            print!("  (state {:#x})", state.to_raw());
        }
        println!();
    }
}

fn dump_classifications(doc: &BufferDocument, config: &LanguageConfig) {
    for line in 0..doc.line_count() {
        let text = doc.line_text(line);
        let (spans, _) = classify_line(text, previous_line_state(doc, line), config);
        print!("{line:4}:");
        for span in &spans {
            let slice = &text[span.begin as usize..(span.begin + span.len) as usize];
            if !slice.trim().is_empty() {
                print!(" {:?}[{}]", span.category, slice.trim_end());
            }
        }
        println!();
    }
}

fn dump_indents(doc: &BufferDocument, config: &LanguageConfig) {
    let engine = IndentEngine::new(doc, IndentConfig::default(), config);
    for line in 0..doc.line_count() {
        let indent = engine.indent_for_line(line, None);
        let current = doc.line_text(line);
        println!("{line:4}: {indent:3}  |{current}");
    }
}

fn dump_expression(doc: &BufferDocument, pos: Position, config: &LanguageConfig) {
    let expr = ExpressionUnderCursor::new().expression_at(doc, pos, config);
    if expr.is_empty() {
        println!("no expression at {}:{}", pos.line, pos.column);
    } else {
        println!("{expr}");
    }
}
