//! Tokens and the token-kind registry.
//!
//! `TokenKind` is a nominal identity: two kinds declared under different
//! names never compare equal, even if their debug names collide, because
//! identity is the `&'static str`'s pointer plus its text. Kinds are meant to
//! be declared once, in a single static table, via [`token_kind`].

use crate::source::SourceRange;

/// Nominal identity for a kind of token. Declare these once via
/// [`token_kind`]; comparing two `TokenKind`s compares their names.
#[derive(Debug, Clone, Copy)]
pub struct TokenKind(pub &'static str);

impl PartialEq for TokenKind {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0) || self.0 == other.0
    }
}
impl Eq for TokenKind {}

impl std::hash::Hash for TokenKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Declares a `pub const` [`TokenKind`] constant. Keeping declarations in one
/// macro call site per language keeps the kind set closed and greppable.
#[macro_export]
macro_rules! token_kind {
    ($name:ident, $text:literal) => {
        pub const $name: $crate::token::TokenKind = $crate::token::TokenKind($text);
    };
}

/// A lexed token: its kind, its source range, and the literal text it was
/// matched from.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub range: SourceRange,
    pub value: String,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    token_kind!(PLUS, "+");
    token_kind!(MINUS, "-");

    #[test]
    fn kinds_compare_by_name() {
        assert_eq!(PLUS, PLUS);
        assert_ne!(PLUS, MINUS);
    }
}
