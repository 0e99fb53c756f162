//! Language dialect configuration threaded through every lexer call.
//!
//! Never a global: each engine call receives the configuration explicitly,
//! so two documents with different dialects can be scanned back to back.

use bitflags::bitflags;
use rustc_hash::FxHashSet;

bitflags! {
    /// Dialect switches that change what the lexer recognizes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LanguageFeatures: u8 {
        /// C++11 lexing: raw strings, digit separators, `u8`/`char16_t`
        /// style prefixes and keywords.
        const CXX11 = 1 << 0;
        /// Qt keyword extensions: `signals`, `slots`, `emit`, `foreach`.
        const QT = 1 << 1;
        /// Objective-C: `@` fused with a following identifier.
        const OBJC = 1 << 2;
        /// C99 keywords (`restrict`, `_Bool`, ...).
        const C99 = 1 << 3;
    }
}

impl Default for LanguageFeatures {
    fn default() -> Self {
        LanguageFeatures::CXX11
    }
}

/// Full lexer parameterization: feature flags plus an optional set of extra
/// words the host wants classified as keywords (project macros and the like).
#[derive(Clone, Debug, Default)]
pub struct LanguageConfig {
    pub features: LanguageFeatures,
    pub extra_keywords: FxHashSet<String>,
}

impl LanguageConfig {
    /// Plain C++ with C++11 lexing, no extensions.
    pub fn cpp() -> Self {
        LanguageConfig::default()
    }

    /// C++ with Qt keyword extensions.
    pub fn qt_cpp() -> Self {
        LanguageConfig {
            features: LanguageFeatures::CXX11 | LanguageFeatures::QT,
            extra_keywords: FxHashSet::default(),
        }
    }

    pub fn with_features(features: LanguageFeatures) -> Self {
        LanguageConfig {
            features,
            extra_keywords: FxHashSet::default(),
        }
    }

    /// Whether the host registered `word` as an additional keyword.
    #[inline]
    pub fn is_extra_keyword(&self, word: &str) -> bool {
        !self.extra_keywords.is_empty() && self.extra_keywords.contains(word)
    }
}
