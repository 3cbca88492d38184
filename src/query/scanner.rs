//! Token scanner with lookahead for the query and command language.
//!
//! Tokens are produced lazily from a single line of text. Lookahead always
//! uses the [`Dialect::Expression`] rules; file and type names are scanned on
//! demand with their own dialect.

use std::collections::VecDeque;
use std::fmt;

use logos::Logos;
use smol_str::SmolStr;

use crate::base::{TextRange, TextSize};

use super::errors::QueryError;
use super::lexer::{Dialect, LogosToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EndOfLine,
    Error,
    Id,
    OpenParen,
    CloseParen,
    At,
    Comma,
    Union,
    Intersect,
    Minus,
    Assign,
    UnionAssign,
    IntersectAssign,
    MinusAssign,
    From,
    To,
    TransitiveFrom,
    TransitiveTo,
    Overrides,
    Overridden,
    TransitiveOverrides,
    TransitiveOverridden,
    Expand,
    TransitiveExpand,
}

impl TokenKind {
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::UnionAssign
                | TokenKind::IntersectAssign
                | TokenKind::MinusAssign
        )
    }

    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Union | TokenKind::Intersect | TokenKind::Minus
        )
    }

    pub fn is_unary_operator(self) -> bool {
        matches!(
            self,
            TokenKind::From
                | TokenKind::To
                | TokenKind::TransitiveFrom
                | TokenKind::TransitiveTo
                | TokenKind::Overrides
                | TokenKind::Overridden
                | TokenKind::TransitiveOverrides
                | TokenKind::TransitiveOverridden
                | TokenKind::Expand
                | TokenKind::TransitiveExpand
        )
    }

    /// Source text of operator tokens.
    pub fn text(self) -> Option<&'static str> {
        Some(match self {
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::At => "@",
            TokenKind::Comma => ",",
            TokenKind::Union => "+",
            TokenKind::Intersect => "^",
            TokenKind::Minus => "-",
            TokenKind::Assign => "=",
            TokenKind::UnionAssign => "+=",
            TokenKind::IntersectAssign => "^=",
            TokenKind::MinusAssign => "-=",
            TokenKind::From => "<",
            TokenKind::To => ">",
            TokenKind::TransitiveFrom => "<*",
            TokenKind::TransitiveTo => ">*",
            TokenKind::Overrides => "[",
            TokenKind::Overridden => "]",
            TokenKind::TransitiveOverrides => "[*",
            TokenKind::TransitiveOverridden => "]*",
            TokenKind::Expand => "!",
            TokenKind::TransitiveExpand => "!*",
            TokenKind::EndOfLine | TokenKind::Error | TokenKind::Id => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => f.write_str(text),
            None => match self {
                TokenKind::EndOfLine => f.write_str("end of line"),
                TokenKind::Id => f.write_str("identifier"),
                _ => f.write_str("error"),
            },
        }
    }
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::OpenParen => TokenKind::OpenParen,
            LogosToken::CloseParen => TokenKind::CloseParen,
            LogosToken::At => TokenKind::At,
            LogosToken::Comma => TokenKind::Comma,
            LogosToken::Union => TokenKind::Union,
            LogosToken::Intersect => TokenKind::Intersect,
            LogosToken::Minus => TokenKind::Minus,
            LogosToken::Assign => TokenKind::Assign,
            LogosToken::UnionAssign => TokenKind::UnionAssign,
            LogosToken::IntersectAssign => TokenKind::IntersectAssign,
            LogosToken::MinusAssign => TokenKind::MinusAssign,
            LogosToken::From => TokenKind::From,
            LogosToken::TransitiveFrom => TokenKind::TransitiveFrom,
            LogosToken::To => TokenKind::To,
            LogosToken::TransitiveTo => TokenKind::TransitiveTo,
            LogosToken::Overrides => TokenKind::Overrides,
            LogosToken::TransitiveOverrides => TokenKind::TransitiveOverrides,
            LogosToken::Overridden => TokenKind::Overridden,
            LogosToken::TransitiveOverridden => TokenKind::TransitiveOverridden,
            LogosToken::Expand => TokenKind::Expand,
            LogosToken::TransitiveExpand => TokenKind::TransitiveExpand,
            LogosToken::Quoted | LogosToken::UnterminatedQuoted | LogosToken::Identifier => {
                TokenKind::Id
            }
            LogosToken::Comment => TokenKind::EndOfLine,
        }
    }
}

/// A token with its kind, position and, for identifiers, its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
    /// Identifier text with any quotes removed.
    pub value: Option<SmolStr>,
}

impl Token {
    pub fn is_id(&self) -> bool {
        self.kind == TokenKind::Id
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.write_str(value),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Scanner over one line of input.
///
/// Scan errors (an unterminated quote) and errors reported by parsers built
/// on top of the scanner are collected in [`errors`](Self::errors).
pub struct Scanner<'a> {
    source: &'a str,
    position: usize,
    queue: VecDeque<Token>,
    errors: Vec<QueryError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            queue: VecDeque::new(),
            errors: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Byte offset of the next unscanned character.
    pub fn position(&self) -> usize {
        self.position
    }

    // =========================================================================
    // Lookahead
    // =========================================================================

    pub fn next_token(&mut self) -> Token {
        self.fill(0);
        match self.queue.pop_front() {
            Some(token) => token,
            None => self.scan(Dialect::Expression),
        }
    }

    pub fn peek_token(&mut self, index: usize) -> &Token {
        self.fill(index);
        &self.queue[index]
    }

    pub fn peek_kind(&mut self, index: usize) -> TokenKind {
        self.peek_token(index).kind
    }

    pub fn is_at_end(&mut self) -> bool {
        self.peek_kind(0) == TokenKind::EndOfLine
    }

    fn fill(&mut self, index: usize) {
        while self.queue.len() <= index {
            let token = self.scan(Dialect::Expression);
            self.queue.push_back(token);
        }
    }

    // =========================================================================
    // Dialect scans
    // =========================================================================

    pub fn scan_file_name(&mut self) -> Token {
        self.scan_with(Dialect::FileName)
    }

    pub fn scan_type_name(&mut self) -> Token {
        self.scan_with(Dialect::TypeName)
    }

    /// Discards any lookahead and rescans from the first queued token.
    fn scan_with(&mut self, dialect: Dialect) -> Token {
        if let Some(first) = self.queue.front() {
            self.position = usize::from(first.range.start());
            self.queue.clear();
        }
        self.scan(dialect)
    }

    fn scan(&mut self, dialect: Dialect) -> Token {
        let rest = &self.source[self.position..];
        let mut lexer = LogosToken::lexer_with_extras(rest, dialect);
        let Some(result) = lexer.next() else {
            self.position = self.source.len();
            let end = TextSize::of(self.source);
            return Token {
                kind: TokenKind::EndOfLine,
                range: TextRange::empty(end),
                value: None,
            };
        };

        let span = lexer.span();
        let start = self.position + span.start;
        let end = self.position + span.end;
        self.position = end;
        let range = TextRange::new(offset(start), offset(end));
        let text = &self.source[start..end];

        match result {
            Ok(LogosToken::Quoted) => Token {
                kind: TokenKind::Id,
                range,
                value: Some(text[1..text.len() - 1].into()),
            },
            Ok(LogosToken::UnterminatedQuoted) => {
                self.errors.push(QueryError::scan(
                    "Unterminated quoted string",
                    TextRange::at(offset(start), TextSize::from(1)),
                ));
                Token {
                    kind: TokenKind::Id,
                    range,
                    value: Some(text[1..].into()),
                }
            }
            Ok(LogosToken::Identifier) => Token {
                kind: TokenKind::Id,
                range,
                value: Some(text.into()),
            },
            Ok(token) => Token {
                kind: token.into(),
                range,
                value: None,
            },
            Err(()) => Token {
                kind: TokenKind::Error,
                range,
                value: Some(text.into()),
            },
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub fn report(&mut self, error: QueryError) {
        self.errors.push(error);
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[QueryError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<QueryError> {
        std::mem::take(&mut self.errors)
    }
}

fn offset(position: usize) -> TextSize {
    TextSize::try_from(position).unwrap_or(TextSize::from(u32::MAX))
}
