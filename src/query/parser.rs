//! Recursive descent parser for set expressions
//!
//! ```text
//! statement  := Id ('=' | '+=' | '-=' | '^=') expression | expression
//! expression := unary (('+' | '-' | '^') unary)*
//! unary      := ('<' | '>' | '<*' | '>*' | '[' | ']' | '[*' | ']*' | '!' | '!*') unary
//!             | primary
//! primary    := '(' expression ')' | annotation | Id
//! annotation := '@' TypeName [ '(' [ Id | Id '=' Id (',' Id '=' Id)* ] ')' ]
//! ```
//!
//! All binary operators share one precedence level and associate left. The
//! parser stops at the first error and reports it on the scanner.

use super::ast::{AnnotationQuery, AssignOp, BinaryOp, Expression, Name, Statement, UnaryOp};
use super::errors::QueryError;
use super::scanner::{Scanner, Token, TokenKind};

/// Parse result holding the value, when parsing succeeded, and every error.
#[derive(Debug, Clone)]
pub struct Parse<T> {
    pub value: Option<T>,
    pub errors: Vec<QueryError>,
}

impl<T> Parse<T> {
    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty() && self.value.is_some()
    }
}

/// Parses a whole line as an expression.
pub fn parse_expression(input: &str) -> Parse<Expression> {
    parse_line(input, |parser| parser.parse_expression())
}

/// Parses a whole line as a statement or expression.
pub fn parse_statement(input: &str) -> Parse<Statement> {
    parse_line(input, |parser| parser.parse_statement())
}

fn parse_line<T>(input: &str, rule: impl FnOnce(&mut Parser<'_, '_>) -> Option<T>) -> Parse<T> {
    let mut scanner = Scanner::new(input);
    let mut parser = Parser::new(&mut scanner);
    let value = rule(&mut parser).filter(|_| parser.expect_end_of_line());
    let errors = scanner.take_errors();
    Parse {
        value: value.filter(|_| errors.is_empty()),
        errors,
    }
}

/// Parser over a shared [`Scanner`], so commands can mix word arguments and
/// expressions on one line.
pub struct Parser<'s, 'a> {
    scanner: &'s mut Scanner<'a>,
}

impl<'s, 'a> Parser<'s, 'a> {
    pub fn new(scanner: &'s mut Scanner<'a>) -> Self {
        Self { scanner }
    }

    // =========================================================================
    // Rules
    // =========================================================================

    pub fn parse_statement(&mut self) -> Option<Statement> {
        if self.scanner.peek_kind(0) == TokenKind::Id {
            if let Some(op) = AssignOp::from_token(self.scanner.peek_kind(1)) {
                let target = Name::from_token(&self.scanner.next_token());
                self.scanner.next_token();
                let value = self.parse_expression()?;
                return Some(Statement::Assignment { target, op, value });
            }
        }
        self.parse_expression().map(Statement::Expression)
    }

    pub fn parse_expression(&mut self) -> Option<Expression> {
        let mut result = self.parse_unary()?;
        while let Some(op) = BinaryOp::from_token(self.scanner.peek_kind(0)) {
            self.scanner.next_token();
            let right = self.parse_unary()?;
            result = Expression::binary(result, op, right);
        }
        Some(result)
    }

    fn parse_unary(&mut self) -> Option<Expression> {
        match UnaryOp::from_token(self.scanner.peek_kind(0)) {
            Some(op) => {
                self.scanner.next_token();
                let operand = self.parse_unary()?;
                Some(Expression::unary(op, operand))
            }
            None => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Option<Expression> {
        match self.scanner.peek_kind(0) {
            TokenKind::OpenParen => {
                self.scanner.next_token();
                let result = self.parse_expression()?;
                self.eat(TokenKind::CloseParen)?;
                Some(result)
            }
            TokenKind::At => self.parse_annotation().map(Expression::Annotation),
            _ => self.eat_id().map(Expression::Name),
        }
    }

    fn parse_annotation(&mut self) -> Option<AnnotationQuery> {
        self.eat(TokenKind::At)?;
        let type_name = self.type_name()?;
        let mut elements = Vec::new();
        if self.scanner.peek_kind(0) != TokenKind::OpenParen {
            return Some(AnnotationQuery {
                type_name,
                elements,
            });
        }
        self.scanner.next_token();
        if self.scanner.peek_kind(0) == TokenKind::CloseParen {
            self.scanner.next_token();
            return Some(AnnotationQuery {
                type_name,
                elements,
            });
        }

        let element = self.eat_id()?;
        if self.scanner.peek_kind(0) != TokenKind::Assign {
            self.eat(TokenKind::CloseParen)?;
            let name = Name::new("value", element.range);
            elements.push((name, element));
            return Some(AnnotationQuery {
                type_name,
                elements,
            });
        }

        self.eat(TokenKind::Assign)?;
        elements.push((element, self.eat_id()?));
        while self.scanner.peek_kind(0) == TokenKind::Comma {
            self.scanner.next_token();
            let element = self.eat_id()?;
            self.eat(TokenKind::Assign)?;
            elements.push((element, self.eat_id()?));
        }
        self.eat(TokenKind::CloseParen)?;
        Some(AnnotationQuery {
            type_name,
            elements,
        })
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        let token = self.scanner.next_token();
        if token.kind == kind {
            Some(token)
        } else {
            self.expected(&token, kind);
            None
        }
    }

    fn eat_id(&mut self) -> Option<Name> {
        self.eat(TokenKind::Id)
            .map(|token| Name::from_token(&token))
    }

    fn type_name(&mut self) -> Option<Name> {
        let token = self.scanner.scan_type_name();
        if token.is_id() {
            Some(Name::from_token(&token))
        } else {
            self.error(&token, "'type name' expected");
            None
        }
    }

    /// Reports anything left on the line. Returns whether the line was empty.
    pub fn expect_end_of_line(&mut self) -> bool {
        if self.scanner.is_at_end() {
            return true;
        }
        let token = self.scanner.peek_token(0).clone();
        self.error(&token, "Expected end of line.");
        false
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn expected(&mut self, token: &Token, kind: TokenKind) {
        self.error(token, format!("'{}' expected", kind));
    }

    fn error(&mut self, token: &Token, message: impl Into<String>) {
        self.scanner.report(QueryError::parse(message, token.range));
    }
}
