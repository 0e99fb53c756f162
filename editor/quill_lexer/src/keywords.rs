//! Keyword resolution for identifier tokens.
//!
//! Length-bucketed lookup: the identifier's length filters first, then the
//! bucket matches exact text. Words the structural layer distinguishes map
//! to their own [`TokenKind`] variant; every other reserved word collapses
//! into [`TokenKind::Keyword`]. Dialect words (C++11, Qt, Objective-C, C99)
//! are only recognized when the corresponding feature flag is set, and the
//! host can extend the set through `LanguageConfig::extra_keywords`.

use quill_token::{LanguageConfig, LanguageFeatures, TokenKind};

/// Look up an identifier's keyword classification, if any.
pub(crate) fn lookup(text: &str, config: &LanguageConfig) -> Option<TokenKind> {
    let features = config.features;
    let cxx11 = features.contains(LanguageFeatures::CXX11);
    let qt = features.contains(LanguageFeatures::QT);
    let c99 = features.contains(LanguageFeatures::C99);

    let kind = match text.len() {
        2 => match text {
            "do" => Some(TokenKind::KwDo),
            "if" => Some(TokenKind::KwIf),
            _ => None,
        },
        3 => match text {
            "for" => Some(TokenKind::KwFor),
            "new" => Some(TokenKind::KwNew),
            "asm" | "int" | "try" => Some(TokenKind::Keyword),
            _ => None,
        },
        4 => match text {
            "case" => Some(TokenKind::KwCase),
            "else" => Some(TokenKind::KwElse),
            "enum" => Some(TokenKind::KwEnum),
            "goto" => Some(TokenKind::KwGoto),
            "this" => Some(TokenKind::KwThis),
            "emit" if qt => Some(TokenKind::KwEmit),
            "auto" | "bool" | "char" | "long" | "true" | "void" => Some(TokenKind::Keyword),
            _ => None,
        },
        5 => match text {
            "break" => Some(TokenKind::KwBreak),
            "class" => Some(TokenKind::KwClass),
            "union" => Some(TokenKind::KwUnion),
            "using" => Some(TokenKind::KwUsing),
            "while" => Some(TokenKind::KwWhile),
            "slots" if qt => Some(TokenKind::KwSlots),
            "_Bool" if c99 => Some(TokenKind::Keyword),
            "catch" | "const" | "false" | "float" | "short" | "throw" => Some(TokenKind::Keyword),
            _ => None,
        },
        6 => match text {
            "delete" => Some(TokenKind::KwDelete),
            "extern" => Some(TokenKind::KwExtern),
            "public" => Some(TokenKind::KwPublic),
            "return" => Some(TokenKind::KwReturn),
            "sizeof" => Some(TokenKind::KwSizeof),
            "struct" => Some(TokenKind::KwStruct),
            "switch" => Some(TokenKind::KwSwitch),
            "typeid" => Some(TokenKind::KwTypeid),
            "Q_EMIT" if qt => Some(TokenKind::KwEmit),
            "double" | "export" | "friend" | "inline" | "signed" | "static" => {
                Some(TokenKind::Keyword)
            }
            _ => None,
        },
        7 => match text {
            "default" => Some(TokenKind::KwDefault),
            "private" => Some(TokenKind::KwPrivate),
            "typedef" => Some(TokenKind::KwTypedef),
            "foreach" if qt => Some(TokenKind::KwForeach),
            "signals" if qt => Some(TokenKind::KwSignals),
            "Q_SLOTS" if qt => Some(TokenKind::KwSlots),
            "alignas" | "alignof" | "nullptr" if cxx11 => Some(TokenKind::Keyword),
            "mutable" | "virtual" | "wchar_t" => Some(TokenKind::Keyword),
            _ => None,
        },
        8 => match text {
            "continue" => Some(TokenKind::KwContinue),
            "operator" => Some(TokenKind::KwOperator),
            "template" => Some(TokenKind::KwTemplate),
            "char16_t" | "char32_t" | "decltype" | "noexcept" if cxx11 => {
                Some(TokenKind::Keyword)
            }
            "restrict" | "_Complex" if c99 => Some(TokenKind::Keyword),
            "explicit" | "register" | "typename" | "unsigned" | "volatile" => {
                Some(TokenKind::Keyword)
            }
            _ => None,
        },
        9 => match text {
            "namespace" => Some(TokenKind::KwNamespace),
            "protected" => Some(TokenKind::KwProtected),
            "Q_FOREACH" if qt => Some(TokenKind::KwForeach),
            "Q_SIGNALS" if qt => Some(TokenKind::KwSignals),
            "constexpr" if cxx11 => Some(TokenKind::Keyword),
            _ => None,
        },
        10 => match text {
            "const_cast" => Some(TokenKind::KwConstCast),
            "_Imaginary" if c99 => Some(TokenKind::Keyword),
            _ => None,
        },
        11 => match text {
            "static_cast" => Some(TokenKind::KwStaticCast),
            _ => None,
        },
        12 => match text {
            "dynamic_cast" => Some(TokenKind::KwDynamicCast),
            "thread_local" if cxx11 => Some(TokenKind::Keyword),
            _ => None,
        },
        13 => match text {
            "static_assert" if cxx11 => Some(TokenKind::Keyword),
            _ => None,
        },
        16 => match text {
            "reinterpret_cast" => Some(TokenKind::KwReinterpretCast),
            _ => None,
        },
        _ => None,
    };

    kind.or_else(|| config.is_extra_keyword(text).then_some(TokenKind::Keyword))
}

/// Built-in type names, for the highlight classifier's identifier pass.
pub(crate) fn is_builtin_type(text: &str) -> bool {
    matches!(
        text,
        "auto"
            | "bool"
            | "char"
            | "char16_t"
            | "char32_t"
            | "double"
            | "float"
            | "int"
            | "long"
            | "short"
            | "signed"
            | "unsigned"
            | "void"
            | "wchar_t"
    )
}

/// Identifier prefixes that turn a following quote into a wide/raw literal.
pub(crate) fn is_literal_prefix(text: &str) -> bool {
    matches!(text, "L" | "U" | "u" | "u8" | "R" | "LR" | "UR" | "uR" | "u8R")
}
