//! Evaluation of parsed expressions and statements against a [`Session`].
//!
//! Evaluation stops at the first error so a statement never assigns a set
//! computed from partially resolved input.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::{TextRange, TextSize};
use crate::semantic::SymbolSet;
use crate::semantic::symbol_table::SymbolId;
use crate::session::Session;

use super::ast::{AnnotationQuery, AssignOp, BinaryOp, Expression, Name, Statement, UnaryOp};
use super::errors::QueryError;

/// What executing one statement produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A bare expression and its value.
    Set(SymbolSet),
    /// An assignment and the size of the stored set.
    Assigned { name: SmolStr, size: usize },
}

/// Read-only evaluator over one session.
pub struct Evaluator<'a> {
    session: &'a Session,
}

impl<'a> Evaluator<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn evaluate(&self, expression: &Expression) -> Result<SymbolSet, QueryError> {
        match expression {
            Expression::Name(name) => self.resolve(name),
            Expression::Annotation(query) => self.annotation(query),
            Expression::Unary { op, operand } => {
                let operand = self.evaluate(operand)?;
                Ok(self.unary(*op, &operand))
            }
            Expression::Binary { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(match op {
                    BinaryOp::Union => self.session.union(&left, &right),
                    BinaryOp::Intersect => self.session.intersect(&left, &right),
                    BinaryOp::Minus => self.session.minus(&left, &right),
                })
            }
        }
    }

    fn unary(&self, op: UnaryOp, operand: &SymbolSet) -> SymbolSet {
        let session = self.session;
        match op {
            UnaryOp::From => session.from(operand),
            UnaryOp::To => session.to(operand),
            UnaryOp::TransitiveFrom => session.transitive_from(operand),
            UnaryOp::TransitiveTo => session.transitive_to(operand),
            UnaryOp::Overrides => session.overrides(operand),
            UnaryOp::Overridden => session.overridden(operand),
            UnaryOp::TransitiveOverrides => session.transitive_overrides(operand),
            UnaryOp::TransitiveOverridden => session.transitive_overridden(operand),
            UnaryOp::Expand => session.expand(operand),
            UnaryOp::TransitiveExpand => session.transitive_expand(operand),
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// A named set, or the singleton of an identifier path.
    fn resolve(&self, name: &Name) -> Result<SymbolSet, QueryError> {
        if let Some(set) = self.session.set(&name.value) {
            return Ok(set.clone());
        }
        let id = self.resolve_id(name)?;
        Ok([id].into_iter().collect())
    }

    /// Resolves `pkg`, `pkg/Type` or `pkg/Type.member.descriptor` to an
    /// existing identifier.
    pub fn resolve_id(&self, name: &Name) -> Result<SymbolId, QueryError> {
        let symbols = self.session.symbols();
        let text = name.value.as_str();
        let parts: Vec<&str> = text.split('.').collect();
        let found = match parts.as_slice() {
            [single] => symbols
                .existing_package(single)
                .or_else(|| symbols.existing_type(single)),
            [owner, member, descriptor] => {
                let Some(owner_id) = symbols.existing_type(owner) else {
                    let range = TextRange::at(name.range.start(), TextSize::of(*owner));
                    return Err(QueryError::semantic(
                        format!("'{}' is not a valid type id", owner),
                        range,
                    ));
                };
                if descriptor.starts_with('(') {
                    symbols.existing_method(owner_id, member, descriptor)
                } else {
                    symbols.existing_field(owner_id, member, descriptor)
                }
            }
            _ => {
                return Err(QueryError::semantic(
                    format!("'{}' is not a valid id", text),
                    name.range,
                ));
            }
        };
        found.ok_or_else(|| QueryError::semantic(format!("No existing id '{}'.", text), name.range))
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    fn annotation(&self, query: &AnnotationQuery) -> Result<SymbolSet, QueryError> {
        let type_name = &query.type_name;
        let Some(type_id) = self.session.symbols().existing_type(&type_name.value) else {
            return Err(QueryError::semantic(
                format!("'{}' is not a valid type id", type_name.value),
                type_name.range,
            ));
        };

        let mut seen = FxHashSet::default();
        let mut elements = Vec::with_capacity(query.elements.len());
        for (element, value) in &query.elements {
            if !seen.insert(element.value.clone()) {
                return Err(QueryError::semantic(
                    format!(
                        "Duplicate element name '{}' in attribute expression.",
                        element.value
                    ),
                    element.range,
                ));
            }
            elements.push((element.value.clone(), value.value.clone()));
        }
        Ok(self.session.annotation_set(type_id, &elements))
    }
}

// =============================================================================
// Statements
// =============================================================================

/// Runs one statement. Compound assignments are desugared first and the
/// target name is checked before the value is evaluated.
pub fn execute_statement(
    session: &mut Session,
    statement: Statement,
) -> Result<Outcome, QueryError> {
    match statement.desugar() {
        Statement::Expression(expression) => {
            Evaluator::new(session)
                .evaluate(&expression)
                .map(Outcome::Set)
        }
        Statement::Assignment { target, op, value } => {
            debug_assert_eq!(op, AssignOp::Assign);
            if !session.is_valid_mutable_set_name(&target.value) {
                return Err(QueryError::semantic(
                    format!("'{}' is not a valid set name", target.value),
                    target.range,
                ));
            }
            let set = Evaluator::new(session).evaluate(&value)?;
            let size = set.len();
            session
                .assign_set(&target.value, set)
                .map_err(|error| QueryError::semantic(error.to_string(), target.range))?;
            Ok(Outcome::Assigned {
                name: target.value,
                size,
            })
        }
    }
}
