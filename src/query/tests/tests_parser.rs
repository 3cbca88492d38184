use rstest::rstest;

use crate::base::{TextRange, TextSize};
use crate::query::{
    AssignOp, BinaryOp, Expression, Name, Parser, QueryErrorKind, Scanner, Statement, UnaryOp,
    parse_expression, parse_statement,
};

fn name(value: &str) -> Expression {
    Expression::Name(Name::new(value, TextRange::default()))
}

/// Drops ranges so trees compare by shape.
fn shape(expression: &Expression) -> String {
    match expression {
        Expression::Name(name) => name.value.to_string(),
        Expression::Annotation(query) => {
            let elements: Vec<String> = query
                .elements
                .iter()
                .map(|(n, v)| format!("{}={}", n.value, v.value))
                .collect();
            format!("@{}({})", query.type_name.value, elements.join(","))
        }
        Expression::Unary { op, operand } => format!("{:?}({})", op, shape(operand)),
        Expression::Binary { left, op, right } => {
            format!("{:?}({}, {})", op, shape(left), shape(right))
        }
    }
}

fn parse(input: &str) -> String {
    let parse = parse_expression(input);
    assert!(parse.ok(), "{input}: {:?}", parse.errors);
    shape(&parse.value.unwrap())
}

fn first_error(input: &str) -> (String, TextRange) {
    let parse = parse_statement(input);
    assert!(parse.value.is_none());
    let error = parse.errors.into_iter().next().unwrap();
    (error.message, error.range)
}

// ============================================================================
// Expressions
// ============================================================================

#[rstest]
#[case("A", "A")]
#[case("A + B - C", "Minus(Union(A, B), C)")]
#[case("A ^ (B + C)", "Intersect(A, Union(B, C))")]
#[case("<A", "From(A)")]
#[case("<*>*A", "TransitiveFrom(TransitiveTo(A))")]
#[case("[A + ]*B", "Union(Overrides(A), TransitiveOverridden(B))")]
#[case("!p", "Expand(p)")]
#[case("*p", "TransitiveExpand(p)")]
#[case("!* p", "TransitiveExpand(p)")]
#[case("p/A.<init>.()V", "p/A.<init>.()V")]
#[case(r#""p/A.f.I""#, "p/A.f.I")]
fn test_expressions(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(parse(input), expected);
}

#[rstest]
#[case("@p/Ann", "@p/Ann()")]
#[case("@p/Ann()", "@p/Ann()")]
#[case("@p/Ann(x)", "@p/Ann(value=x)")]
#[case("@p/Ann(value=x)", "@p/Ann(value=x)")]
#[case(r#"@p/Ann(a="1", b="2")"#, "@p/Ann(a=1,b=2)")]
#[case("@p/Ann(x) + A", "Union(@p/Ann(value=x), A)")]
fn test_annotations(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(parse(input), expected);
}

#[test]
fn test_binary_tree() {
    let parse = parse_expression("A + B");
    let expected = Expression::binary(name("A"), BinaryOp::Union, name("B"));
    assert_eq!(shape(&parse.value.unwrap()), shape(&expected));
}

// ============================================================================
// Statements
// ============================================================================

#[rstest]
#[case("X = A", AssignOp::Assign)]
#[case("X += A", AssignOp::UnionAssign)]
#[case("X ^= A", AssignOp::IntersectAssign)]
#[case("X -= A", AssignOp::MinusAssign)]
fn test_assignments(#[case] input: &str, #[case] expected: AssignOp) {
    let parse = parse_statement(input);
    match parse.value.unwrap() {
        Statement::Assignment { target, op, .. } => {
            assert_eq!(target.value, "X");
            assert_eq!(op, expected);
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_expression_statement() {
    let parse = parse_statement("X + A");
    assert!(matches!(parse.value, Some(Statement::Expression(_))));
}

#[test]
fn test_desugar_compound_assignment() {
    let statement = parse_statement("X -= <A").value.unwrap().desugar();
    let Statement::Assignment { target, op, value } = statement else {
        panic!("expected assignment");
    };
    assert_eq!(target.value, "X");
    assert_eq!(op, AssignOp::Assign);
    assert_eq!(shape(&value), "Minus(X, From(A))");
}

#[test]
fn test_unary_operators_nest() {
    let parse = parse_expression("<[A");
    let Some(Expression::Unary { op, operand }) = parse.value else {
        panic!("expected unary");
    };
    assert_eq!(op, UnaryOp::From);
    assert!(matches!(
        *operand,
        Expression::Unary {
            op: UnaryOp::Overrides,
            ..
        }
    ));
}

// ============================================================================
// Errors
// ============================================================================

fn at(start: u32, len: u32) -> TextRange {
    TextRange::at(TextSize::from(start), TextSize::from(len))
}

#[rstest]
#[case("(A", "')' expected", at(2, 0))]
#[case("A +", "'identifier' expected", at(3, 0))]
#[case("A B", "Expected end of line.", at(2, 1))]
#[case("@(x)", "'type name' expected", at(1, 1))]
#[case("@p/Ann(a=)", "'identifier' expected", at(9, 1))]
#[case("= A", "'identifier' expected", at(0, 1))]
fn test_parse_errors(#[case] input: &str, #[case] message: &str, #[case] range: TextRange) {
    assert_eq!(first_error(input), (message.to_string(), range));
}

#[test]
fn test_parser_stops_at_first_error() {
    let parse = parse_expression("(A + ) + (");
    assert_eq!(parse.errors.len(), 1);
    assert_eq!(parse.errors[0].kind, QueryErrorKind::Parse);
}

#[test]
fn test_shared_scanner() {
    let mut scanner = Scanner::new("list A + B");
    assert_eq!(scanner.next_token().value(), "list");
    let mut parser = Parser::new(&mut scanner);
    let expression = parser.parse_expression().unwrap();
    assert!(parser.expect_end_of_line());
    assert_eq!(shape(&expression), "Union(A, B)");
}
