//! Logos-based lexer for the query language
//!
//! Operators are fixed tokens. Identifiers are context sensitive: the active
//! [`Dialect`] (carried in the lexer extras) decides which punctuation ends an
//! identifier and which is part of it.

use logos::{Lexer, Logos};

/// How identifier characters are classified while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Set names and symbol paths. Balanced `(...)` and `<...>` stay inside
    /// the identifier so `p/A.<init>.(I)V` is one token.
    #[default]
    Expression,
    /// File arguments. `+ ^ - # =` are ordinary characters.
    FileName,
    /// Annotation type names. Every operator character ends the identifier.
    TypeName,
}

/// Logos token enum, one variant per operator plus identifiers.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(extras = Dialect)]
#[logos(skip r"\s+")]
pub(crate) enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("@")]
    At,
    #[token(",")]
    Comma,

    // =========================================================================
    // BINARY AND ASSIGNMENT OPERATORS
    // =========================================================================
    #[token("+")]
    Union,
    #[token("^")]
    Intersect,
    #[token("-")]
    Minus,
    #[token("=")]
    Assign,
    #[token("+=")]
    UnionAssign,
    #[token("^=")]
    IntersectAssign,
    #[token("-=")]
    MinusAssign,

    // =========================================================================
    // UNARY OPERATORS
    // =========================================================================
    #[token("<")]
    From,
    #[token("<*")]
    TransitiveFrom,
    #[token(">")]
    To,
    #[token(">*")]
    TransitiveTo,
    #[token("[")]
    Overrides,
    #[token("[*")]
    TransitiveOverrides,
    #[token("]")]
    Overridden,
    #[token("]*")]
    TransitiveOverridden,
    #[token("!")]
    Expand,
    #[token("!*")]
    #[token("*")]
    TransitiveExpand,

    // =========================================================================
    // IDENTIFIERS
    // =========================================================================
    #[regex(r#""[^"]*""#)]
    Quoted,

    #[regex(r#""[^"]*"#)]
    UnterminatedQuoted,

    #[regex(r##"[^\s()@,+^=<>\[\]!*"#-]"##, identifier)]
    Identifier,
}

/// Extends an identifier over the rest of its characters according to the
/// active dialect.
fn identifier(lex: &mut Lexer<'_, LogosToken>) {
    let dialect = lex.extras;
    let length = identifier_length(lex.remainder(), dialect);
    lex.bump(length);
}

/// Length in bytes of the identifier continuation at the start of `rest`.
pub(crate) fn identifier_length(rest: &str, dialect: Dialect) -> usize {
    let mut paren_depth = 0usize;
    let mut angle_depth = 0usize;
    let mut length = 0;
    for ch in rest.chars() {
        if ch.is_whitespace() {
            break;
        }
        let continues = match ch {
            '(' if dialect == Dialect::Expression => {
                paren_depth += 1;
                true
            }
            '<' if dialect == Dialect::Expression => {
                angle_depth += 1;
                true
            }
            ')' if dialect == Dialect::Expression && paren_depth > 0 => {
                paren_depth -= 1;
                true
            }
            '>' if dialect == Dialect::Expression && angle_depth > 0 => {
                angle_depth -= 1;
                true
            }
            '(' | ')' | '<' | '>' => false,
            '+' | '^' | '-' | '#' | '=' => dialect == Dialect::FileName,
            _ => true,
        };
        if !continues {
            break;
        }
        length += ch.len_utf8();
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<LogosToken> {
        LogosToken::lexer(input).map(|t| t.unwrap()).collect()
    }

    #[rstest]
    #[case("+=", LogosToken::UnionAssign)]
    #[case("<*", LogosToken::TransitiveFrom)]
    #[case("]*", LogosToken::TransitiveOverridden)]
    #[case("*", LogosToken::TransitiveExpand)]
    #[case("!*", LogosToken::TransitiveExpand)]
    #[case("!", LogosToken::Expand)]
    fn test_operators(#[case] input: &str, #[case] expected: LogosToken) {
        assert_eq!(kinds(input), vec![expected]);
    }

    #[rstest]
    #[case("p/A.<init>.(I)V", Dialect::Expression, 15)]
    #[case("value=x", Dialect::Expression, 5)]
    #[case("x)", Dialect::Expression, 1)]
    #[case("a-b.jar rest", Dialect::FileName, 7)]
    #[case("dir/(x).jar", Dialect::FileName, 4)]
    #[case("p/Ann(value)", Dialect::TypeName, 5)]
    #[case("p/Ann=x", Dialect::TypeName, 5)]
    #[case("a,b[]", Dialect::TypeName, 5)]
    fn test_identifier_length(
        #[case] input: &str,
        #[case] dialect: Dialect,
        #[case] length: usize,
    ) {
        assert_eq!(identifier_length(input, dialect), length);
    }

    #[test]
    fn test_comment_is_skipped() {
        assert_eq!(kinds("A # + B"), vec![LogosToken::Identifier]);
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(kinds(r#""a b""#), vec![LogosToken::Quoted]);
        assert_eq!(kinds(r#""a b"#), vec![LogosToken::UnterminatedQuoted]);
    }
}
