//! # Query Language
//!
//! A small expression language over named sets of identifiers.
//!
//! ```text
//! text ──Scanner──► tokens ──Parser──► Statement ──Evaluator──► SymbolSet
//!         (logos)                                   (Session)
//! ```
//!
//! - [`scanner`] - contextual tokens over the logos lexer
//! - [`parser`] - recursive descent into the [`ast`]
//! - [`eval`] - name resolution and set operators

pub mod ast;
pub mod errors;
pub mod eval;
mod lexer;
pub mod parser;
pub mod scanner;

pub use ast::{AnnotationQuery, AssignOp, BinaryOp, Expression, Name, Statement, UnaryOp};
pub use errors::{QueryError, QueryErrorKind};
pub use eval::{Evaluator, Outcome, execute_statement};
pub use lexer::Dialect;
pub use parser::{Parse, Parser, parse_expression, parse_statement};
pub use scanner::{Scanner, Token, TokenKind};

use crate::semantic::SymbolSet;
use crate::session::Session;

/// Parses and evaluates one expression line.
pub fn evaluate(session: &Session, text: &str) -> Result<SymbolSet, Vec<QueryError>> {
    let Parse { value, errors } = parse_expression(text);
    let Some(expression) = value else {
        return Err(errors);
    };
    Evaluator::new(session)
        .evaluate(&expression)
        .map_err(|error| vec![error])
}

/// Parses and runs one statement line, assigning when it is an assignment.
pub fn execute(session: &mut Session, text: &str) -> Result<Outcome, Vec<QueryError>> {
    let Parse { value, errors } = parse_statement(text);
    let Some(statement) = value else {
        return Err(errors);
    };
    execute_statement(session, statement).map_err(|error| vec![error])
}

#[cfg(test)]
mod tests;
