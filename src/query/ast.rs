//! Parsed query expressions and statements.

use smol_str::SmolStr;

use crate::base::TextRange;

use super::scanner::{Token, TokenKind};

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `<` direct dependencies.
    From,
    /// `>` direct dependents.
    To,
    /// `<*`
    TransitiveFrom,
    /// `>*`
    TransitiveTo,
    /// `[` direct supertypes and overridden methods.
    Overrides,
    /// `]` direct subtypes and overriding methods.
    Overridden,
    /// `[*`
    TransitiveOverrides,
    /// `]*`
    TransitiveOverridden,
    /// `!` container children.
    Expand,
    /// `!*` or `*`
    TransitiveExpand,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::From => UnaryOp::From,
            TokenKind::To => UnaryOp::To,
            TokenKind::TransitiveFrom => UnaryOp::TransitiveFrom,
            TokenKind::TransitiveTo => UnaryOp::TransitiveTo,
            TokenKind::Overrides => UnaryOp::Overrides,
            TokenKind::Overridden => UnaryOp::Overridden,
            TokenKind::TransitiveOverrides => UnaryOp::TransitiveOverrides,
            TokenKind::TransitiveOverridden => UnaryOp::TransitiveOverridden,
            TokenKind::Expand => UnaryOp::Expand,
            TokenKind::TransitiveExpand => UnaryOp::TransitiveExpand,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Union,
    Intersect,
    Minus,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Union => Some(BinaryOp::Union),
            TokenKind::Intersect => Some(BinaryOp::Intersect),
            TokenKind::Minus => Some(BinaryOp::Minus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    UnionAssign,
    IntersectAssign,
    MinusAssign,
}

impl AssignOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Assign => Some(AssignOp::Assign),
            TokenKind::UnionAssign => Some(AssignOp::UnionAssign),
            TokenKind::IntersectAssign => Some(AssignOp::IntersectAssign),
            TokenKind::MinusAssign => Some(AssignOp::MinusAssign),
            _ => None,
        }
    }

    /// The binary operator a compound assignment applies.
    pub fn underlying(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::UnionAssign => Some(BinaryOp::Union),
            AssignOp::IntersectAssign => Some(BinaryOp::Intersect),
            AssignOp::MinusAssign => Some(BinaryOp::Minus),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

/// An identifier as written, with its source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub value: SmolStr,
    pub range: TextRange,
}

impl Name {
    pub fn new(value: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            value: value.into(),
            range,
        }
    }

    pub(crate) fn from_token(token: &Token) -> Self {
        Self::new(token.value(), token.range)
    }
}

/// `@Type`, `@Type(value)` or `@Type(name=value, ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationQuery {
    pub type_name: Name,
    /// Element name/value pairs. The single value form uses the element name
    /// `value`.
    pub elements: Vec<(Name, Name)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Name(Name),
    Annotation(AnnotationQuery),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Expression(Expression),
    Assignment {
        target: Name,
        op: AssignOp,
        value: Expression,
    },
}

impl Statement {
    /// Rewrites `x op= e` as `x = x op e`; other statements are unchanged.
    pub fn desugar(self) -> Self {
        match self {
            Statement::Assignment { target, op, value } => match op.underlying() {
                Some(binary) => Statement::Assignment {
                    value: Expression::binary(Expression::Name(target.clone()), binary, value),
                    target,
                    op: AssignOp::Assign,
                },
                None => Statement::Assignment { target, op, value },
            },
            statement => statement,
        }
    }
}
