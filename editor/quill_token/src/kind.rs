//! Token kinds for the line lexer.
//!
//! The enum is flat: keywords the structural layer cares about (control
//! statements, class keys, casts, access specifiers) get their own variants;
//! every other reserved word collapses into [`TokenKind::Keyword`]. Which
//! words are recognized at all is decided by the keyword tables in
//! `quill_lexer`, parameterized by the active language configuration.

/// Kind of a single token within one line.
///
/// Discriminants are grouped into contiguous ranges (literals, keywords,
/// punctuation, operators) so the category predicates below compile to
/// range checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // === Literals ===
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    RawStringLiteral,
    /// `<header>` payload of an `#include`/`#import` directive.
    AngleStringLiteral,

    // === Comments ===
    Comment,
    DocComment,

    Identifier,

    // === Keywords the structural layer distinguishes ===
    KwIf,
    KwElse,
    KwFor,
    KwWhile,
    KwDo,
    KwSwitch,
    KwCase,
    KwDefault,
    KwBreak,
    KwContinue,
    KwReturn,
    KwGoto,
    KwClass,
    KwStruct,
    KwUnion,
    KwEnum,
    KwNamespace,
    KwTypedef,
    KwTemplate,
    KwUsing,
    KwOperator,
    KwExtern,
    KwPublic,
    KwProtected,
    KwPrivate,
    KwNew,
    KwDelete,
    KwThis,
    KwTypeid,
    KwSizeof,
    KwStaticCast,
    KwDynamicCast,
    KwReinterpretCast,
    KwConstCast,
    // Qt extensions
    KwSignals,
    KwSlots,
    KwEmit,
    KwForeach,
    /// Any other reserved word (`int`, `const`, `virtual`, ...).
    Keyword,

    // === Punctuation ===
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }
    Semicolon,
    Colon,
    ColonColon,
    Comma,
    Dot,
    DotStar,
    Ellipsis,
    Arrow,
    ArrowStar,
    Question,
    Hash,
    HashHash,
    At,

    // === Operators ===
    Eq,       // =
    EqEq,     // ==
    NotEq,    // !=
    Lt,       // < (also the open angle bracket, contextually)
    LtEq,     // <=
    Gt,       // > (also the close angle bracket, contextually)
    GtEq,     // >=
    Shl,      // <<
    Shr,      // >>
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Percent,  // %
    Amp,      // &
    AmpAmp,   // &&
    Pipe,     // |
    PipePipe, // ||
    Caret,    // ^
    Tilde,    // ~
    Not,      // !
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,

    // === Special ===
    /// Unrecognized byte sequence.
    Error,
    /// End-of-input sentinel; also the permanent lookback-exhausted marker.
    Eof,
}

impl TokenKind {
    /// String, char, numeric, raw-string, and angle-string literals.
    #[inline]
    pub const fn is_literal(self) -> bool {
        (self as u8) <= (TokenKind::AngleStringLiteral as u8)
    }

    #[inline]
    pub const fn is_comment(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::DocComment)
    }

    /// Any keyword variant, specific or the catch-all.
    #[inline]
    pub const fn is_keyword(self) -> bool {
        let d = self as u8;
        d >= TokenKind::KwIf as u8 && d <= TokenKind::Keyword as u8
    }

    /// Operators in the expression sense: everything from `=` through the
    /// compound assignments. Punctuation (`,`, `;`, brackets) is excluded.
    #[inline]
    pub const fn is_operator(self) -> bool {
        let d = self as u8;
        d >= TokenKind::Eq as u8 && d <= TokenKind::ShrEq as u8
    }

    #[inline]
    pub const fn is_opening_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
        )
    }

    #[inline]
    pub const fn is_closing_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }

    /// The partner of a bracket token, in either direction.
    ///
    /// Angle brackets pair too; callers opt into treating `<`/`>` as
    /// brackets (template argument lists) rather than comparisons.
    pub const fn matching_bracket(self) -> Option<TokenKind> {
        match self {
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::RParen => Some(TokenKind::LParen),
            TokenKind::LBracket => Some(TokenKind::RBracket),
            TokenKind::RBracket => Some(TokenKind::LBracket),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            TokenKind::RBrace => Some(TokenKind::LBrace),
            TokenKind::Lt => Some(TokenKind::Gt),
            TokenKind::Gt => Some(TokenKind::Lt),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_cast_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::KwStaticCast
                | TokenKind::KwDynamicCast
                | TokenKind::KwReinterpretCast
                | TokenKind::KwConstCast
        )
    }

    /// Access specifiers (`public`, `protected`, `private`) and the Qt
    /// section keywords that behave like them before a `:`.
    #[inline]
    pub const fn is_access_specifier(self) -> bool {
        matches!(
            self,
            TokenKind::KwPublic
                | TokenKind::KwProtected
                | TokenKind::KwPrivate
                | TokenKind::KwSignals
                | TokenKind::KwSlots
        )
    }

    /// Human-readable name used by trace output and the CLI dumps.
    pub const fn display_name(self) -> &'static str {
        match self {
            TokenKind::IntLiteral => "int-literal",
            TokenKind::FloatLiteral => "float-literal",
            TokenKind::CharLiteral => "char-literal",
            TokenKind::StringLiteral => "string-literal",
            TokenKind::RawStringLiteral => "raw-string-literal",
            TokenKind::AngleStringLiteral => "angle-string-literal",
            TokenKind::Comment => "comment",
            TokenKind::DocComment => "doc-comment",
            TokenKind::Identifier => "identifier",
            TokenKind::KwIf => "if",
            TokenKind::KwElse => "else",
            TokenKind::KwFor => "for",
            TokenKind::KwWhile => "while",
            TokenKind::KwDo => "do",
            TokenKind::KwSwitch => "switch",
            TokenKind::KwCase => "case",
            TokenKind::KwDefault => "default",
            TokenKind::KwBreak => "break",
            TokenKind::KwContinue => "continue",
            TokenKind::KwReturn => "return",
            TokenKind::KwGoto => "goto",
            TokenKind::KwClass => "class",
            TokenKind::KwStruct => "struct",
            TokenKind::KwUnion => "union",
            TokenKind::KwEnum => "enum",
            TokenKind::KwNamespace => "namespace",
            TokenKind::KwTypedef => "typedef",
            TokenKind::KwTemplate => "template",
            TokenKind::KwUsing => "using",
            TokenKind::KwOperator => "operator",
            TokenKind::KwExtern => "extern",
            TokenKind::KwPublic => "public",
            TokenKind::KwProtected => "protected",
            TokenKind::KwPrivate => "private",
            TokenKind::KwNew => "new",
            TokenKind::KwDelete => "delete",
            TokenKind::KwThis => "this",
            TokenKind::KwTypeid => "typeid",
            TokenKind::KwSizeof => "sizeof",
            TokenKind::KwStaticCast => "static_cast",
            TokenKind::KwDynamicCast => "dynamic_cast",
            TokenKind::KwReinterpretCast => "reinterpret_cast",
            TokenKind::KwConstCast => "const_cast",
            TokenKind::KwSignals => "signals",
            TokenKind::KwSlots => "slots",
            TokenKind::KwEmit => "emit",
            TokenKind::KwForeach => "foreach",
            TokenKind::Keyword => "keyword",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::DotStar => ".*",
            TokenKind::Ellipsis => "...",
            TokenKind::Arrow => "->",
            TokenKind::ArrowStar => "->*",
            TokenKind::Question => "?",
            TokenKind::Hash => "#",
            TokenKind::HashHash => "##",
            TokenKind::At => "@",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Not => "!",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::ShlEq => "<<=",
            TokenKind::ShrEq => ">>=",
            TokenKind::Error => "error",
            TokenKind::Eof => "eof",
        }
    }
}
