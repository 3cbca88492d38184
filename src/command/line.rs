//! Argument reading for one command line.

use crate::base::TextRange;
use crate::query::{Evaluator, Expression, Name, Parser, QueryError, Scanner, Statement, Token};
use crate::semantic::SymbolSet;
use crate::session::Session;

use super::kind::CommandKind;

/// A command line being consumed argument by argument.
///
/// Every getter reports its own error and returns `None`; callers check
/// [`had_error`](Self::had_error) once all arguments are read.
pub(super) struct CommandLine<'a> {
    scanner: Scanner<'a>,
}

impl<'a> CommandLine<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        Self {
            scanner: Scanner::new(text),
        }
    }

    pub(super) fn is_at_end(&mut self) -> bool {
        self.scanner.is_at_end()
    }

    /// The command named by the first word, if it is one.
    pub(super) fn peek_command(&mut self) -> Option<CommandKind> {
        let token = self.scanner.peek_token(0);
        if !token.is_id() {
            return None;
        }
        CommandKind::from_name(token.value())
    }

    pub(super) fn skip(&mut self) {
        self.scanner.next_token();
    }

    // =========================================================================
    // Arguments
    // =========================================================================

    pub(super) fn file_name(&mut self) -> Option<Name> {
        let token = self.scanner.scan_file_name();
        self.id_or(&token, "Expected File Name.")
    }

    /// A plain word, such as a set name. `what` names it in the error.
    pub(super) fn word(&mut self, what: &str) -> Option<Name> {
        let token = self.scanner.next_token();
        self.id_or(&token, &format!("Expected {}.", what))
    }

    /// The name of an existing user set.
    pub(super) fn mutable_set(&mut self, session: &Session) -> Option<Name> {
        let name = self.word("set")?;
        match session.check_mutable(&name.value) {
            Ok(()) => Some(name),
            Err(err) => {
                self.error(name.range, err.to_string());
                None
            }
        }
    }

    pub(super) fn expression(&mut self) -> Option<Expression> {
        Parser::new(&mut self.scanner).parse_expression()
    }

    pub(super) fn statement(&mut self) -> Option<Statement> {
        Parser::new(&mut self.scanner).parse_statement()
    }

    /// Parses and evaluates an expression argument.
    pub(super) fn value(&mut self, session: &Session) -> Option<SymbolSet> {
        let expression = self.expression()?;
        if self.had_error() {
            return None;
        }
        match Evaluator::new(session).evaluate(&expression) {
            Ok(set) => Some(set),
            Err(err) => {
                self.scanner.report(err);
                None
            }
        }
    }

    pub(super) fn ensure_empty(&mut self) {
        if !self.scanner.is_at_end() {
            let range = self.scanner.peek_token(0).range;
            self.error(range, "Expected end of line.");
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(super) fn error(&mut self, range: TextRange, message: impl Into<String>) {
        self.scanner.report(QueryError::semantic(message, range));
    }

    pub(super) fn report(&mut self, error: QueryError) {
        self.scanner.report(error);
    }

    pub(super) fn had_error(&self) -> bool {
        self.scanner.had_error()
    }

    pub(super) fn take_errors(&mut self) -> Vec<QueryError> {
        self.scanner.take_errors()
    }

    fn id_or(&mut self, token: &Token, message: &str) -> Option<Name> {
        if token.is_id() {
            Some(Name::from_token(token))
        } else {
            self.scanner
                .report(QueryError::parse(message.to_string(), token.range));
            None
        }
    }
}
