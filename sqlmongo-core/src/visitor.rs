//! Classification of SQL expressions and a visitor over the result.
//!
//! The parser's expression tree has far more shapes than the translator
//! understands. [`Node::classify`] folds every [`Expr`] into a closed set of
//! node kinds: the ones that translate, and named rejections for everything
//! else. [`ExprVisitor`] dispatches over that set, so a visitor must handle
//! every kind explicitly.
//!
//! # Example
//!
//! ```ignore
//! use sqlmongo_core::visitor::{Node, Construct};
//!
//! match Node::classify(&expr) {
//!     Node::Unsupported(Construct::Case) => println!("CASE is not supported"),
//!     _ => {}
//! }
//! ```

use std::fmt;

use sqlparser::ast::{BinaryOperator, Expr, Ident, UnaryOperator, Value};

use crate::value::Literal;

/// SQL constructs that are recognized but never translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construct {
    /// `EXISTS (SELECT ...)`.
    Exists,
    /// A subquery in an expression, including `IN (SELECT ...)`.
    Subquery,
    /// A bound parameter such as `?`.
    BoundParameter(String),
    /// Arithmetic, bitwise or string concatenation operator.
    BinaryArithmetic(String),
    /// Unary operator other than `NOT` applied to something other than a number.
    UnaryArithmetic(String),
    /// A function call, by name.
    FunctionCall(String),
    /// `CASE ... END`.
    Case,
    /// Any other expression, rendered as SQL.
    Expression(String),
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::Exists => write!(f, "EXISTS"),
            Construct::Subquery => write!(f, "subquery"),
            Construct::BoundParameter(name) => write!(f, "bound parameter `{name}`"),
            Construct::BinaryArithmetic(op) => write!(f, "binary expression with operator `{op}`"),
            Construct::UnaryArithmetic(op) => write!(f, "unary expression with operator `{op}`"),
            Construct::FunctionCall(name) => write!(f, "function call `{name}`"),
            Construct::Case => write!(f, "CASE expression"),
            Construct::Expression(sql) => write!(f, "expression `{sql}`"),
        }
    }
}

/// The node kinds the translator distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    And(&'a Expr, &'a Expr),
    Or(&'a Expr, &'a Expr),
    Not(&'a Expr),
    /// Parenthesized expression.
    Nested(&'a Expr),
    /// Binary comparison; `op` is the lowercased SQL operator (`=`, `<>`, `like`, ...).
    Comparison {
        left: &'a Expr,
        op: String,
        right: &'a Expr,
    },
    InList {
        expr: &'a Expr,
        list: &'a [Expr],
        negated: bool,
    },
    Between {
        expr: &'a Expr,
        low: &'a Expr,
        high: &'a Expr,
        negated: bool,
    },
    /// `IS NULL`, or `IS NOT NULL` when negated.
    NullCheck {
        expr: &'a Expr,
        negated: bool,
    },
    /// Column reference, split into its qualifier parts.
    Column(&'a [Ident]),
    Literal(Literal<'a>),
    Tuple(&'a [Expr]),
    /// A literal the translator has no value for (hex, national strings, ...).
    UnsupportedLiteral(String),
    Unsupported(Construct),
}

impl<'a> Node<'a> {
    /// Classifies a parsed expression.
    pub fn classify(expr: &'a Expr) -> Self {
        if let Some(number) = Literal::signed_number(expr) {
            return Node::Literal(number);
        }

        match expr {
            Expr::BinaryOp { left, op, right } => match op {
                BinaryOperator::And => Node::And(left, right),
                BinaryOperator::Or => Node::Or(left, right),
                BinaryOperator::Plus
                | BinaryOperator::Minus
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
                | BinaryOperator::MyIntegerDivide
                | BinaryOperator::DuckIntegerDivide
                | BinaryOperator::StringConcat
                | BinaryOperator::BitwiseAnd
                | BinaryOperator::BitwiseOr
                | BinaryOperator::BitwiseXor
                | BinaryOperator::PGBitwiseShiftLeft
                | BinaryOperator::PGBitwiseShiftRight => {
                    Node::Unsupported(Construct::BinaryArithmetic(op.to_string()))
                }
                _ => Node::Comparison {
                    left,
                    op: op.to_string().to_lowercase(),
                    right,
                },
            },
            Expr::UnaryOp { op: UnaryOperator::Not, expr } => Node::Not(expr),
            Expr::UnaryOp { op, .. } => Node::Unsupported(Construct::UnaryArithmetic(op.to_string())),
            Expr::Nested(inner) => Node::Nested(inner),
            Expr::Like { negated, expr, pattern, .. } => Node::Comparison {
                left: expr,
                op: negatable("like", *negated),
                right: pattern,
            },
            Expr::ILike { negated, expr, pattern, .. } => Node::Comparison {
                left: expr,
                op: negatable("ilike", *negated),
                right: pattern,
            },
            Expr::SimilarTo { negated, expr, pattern, .. } => Node::Comparison {
                left: expr,
                op: negatable("similar to", *negated),
                right: pattern,
            },
            Expr::RLike { negated, expr, pattern, .. } => Node::Comparison {
                left: expr,
                op: negatable("regexp", *negated),
                right: pattern,
            },
            Expr::InList { expr, list, negated } => Node::InList {
                expr,
                list,
                negated: *negated,
            },
            Expr::Between { expr, negated, low, high } => Node::Between {
                expr,
                low,
                high,
                negated: *negated,
            },
            Expr::IsNull(expr) => Node::NullCheck { expr, negated: false },
            Expr::IsNotNull(expr) => Node::NullCheck { expr, negated: true },
            Expr::Identifier(ident) => Node::Column(std::slice::from_ref(ident)),
            Expr::CompoundIdentifier(parts) => Node::Column(parts),
            Expr::Value(value) => match &value.value {
                Value::SingleQuotedString(text) | Value::DoubleQuotedString(text) => {
                    Node::Literal(Literal::String(text))
                }
                Value::Boolean(value) => Node::Literal(Literal::Boolean(*value)),
                Value::Null => Node::Literal(Literal::Null),
                Value::Placeholder(name) => {
                    Node::Unsupported(Construct::BoundParameter(name.clone()))
                }
                other => Node::UnsupportedLiteral(other.to_string()),
            },
            Expr::Tuple(items) => Node::Tuple(items),
            Expr::Exists { .. } => Node::Unsupported(Construct::Exists),
            Expr::Subquery(_) | Expr::InSubquery { .. } => Node::Unsupported(Construct::Subquery),
            Expr::Function(function) => {
                Node::Unsupported(Construct::FunctionCall(function.name.to_string()))
            }
            Expr::Case { .. } => Node::Unsupported(Construct::Case),
            other => Node::Unsupported(Construct::Expression(other.to_string())),
        }
    }

    /// Whether the node evaluates to a boolean predicate rather than a value.
    pub fn is_predicate(&self) -> bool {
        match self {
            Node::And(..)
            | Node::Or(..)
            | Node::Not(_)
            | Node::Comparison { .. }
            | Node::InList { .. }
            | Node::Between { .. }
            | Node::NullCheck { .. } => true,
            Node::Nested(inner) => Node::classify(inner).is_predicate(),
            _ => false,
        }
    }
}

fn negatable(op: &'static str, negated: bool) -> String {
    if negated {
        format!("not {op}")
    } else {
        op.to_string()
    }
}

/// Visitor over classified SQL expressions.
///
/// Implementors provide one method per node kind; [`ExprVisitor::visit_expr`]
/// classifies an expression and dispatches to the matching method.
pub trait ExprVisitor {
    type Output;
    type Error;

    fn visit_and(&mut self, left: &Expr, right: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, left: &Expr, right: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_comparison(
        &mut self,
        left: &Expr,
        op: &str,
        right: &Expr,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_in_list(
        &mut self,
        expr: &Expr,
        list: &[Expr],
        negated: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_between(
        &mut self,
        expr: &Expr,
        low: &Expr,
        high: &Expr,
        negated: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_null_check(&mut self, expr: &Expr, negated: bool) -> Result<Self::Output, Self::Error>;
    fn visit_column(&mut self, parts: &[Ident]) -> Result<Self::Output, Self::Error>;
    fn visit_literal(&mut self, literal: &Literal<'_>) -> Result<Self::Output, Self::Error>;
    fn visit_tuple(&mut self, items: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_unsupported_literal(&mut self, literal: &str) -> Result<Self::Output, Self::Error>;
    fn visit_unsupported(&mut self, construct: Construct) -> Result<Self::Output, Self::Error>;

    fn visit_node(&mut self, node: Node<'_>) -> Result<Self::Output, Self::Error> {
        match node {
            Node::And(left, right) => self.visit_and(left, right),
            Node::Or(left, right) => self.visit_or(left, right),
            Node::Not(expr) => self.visit_not(expr),
            Node::Nested(expr) => self.visit_expr(expr),
            Node::Comparison { left, op, right } => self.visit_comparison(left, &op, right),
            Node::InList { expr, list, negated } => self.visit_in_list(expr, list, negated),
            Node::Between { expr, low, high, negated } => self.visit_between(expr, low, high, negated),
            Node::NullCheck { expr, negated } => self.visit_null_check(expr, negated),
            Node::Column(parts) => self.visit_column(parts),
            Node::Literal(literal) => self.visit_literal(&literal),
            Node::Tuple(items) => self.visit_tuple(items),
            Node::UnsupportedLiteral(literal) => self.visit_unsupported_literal(&literal),
            Node::Unsupported(construct) => self.visit_unsupported(construct),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        self.visit_node(Node::classify(expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use sqlparser::{dialect::MySqlDialect, parser::Parser};

    fn expr(sql: &str) -> Expr {
        Parser::new(&MySqlDialect {})
            .try_with_sql(sql)
            .unwrap()
            .parse_expr()
            .unwrap()
    }

    #[test]
    fn comparison_operators_keep_their_sql_spelling() {
        let parsed = expr("a <> 1");
        let Node::Comparison { op, .. } = Node::classify(&parsed) else {
            panic!("expected a comparison");
        };
        assert_eq!(op, "<>");

        let parsed = expr("a NOT LIKE 'x%'");
        let Node::Comparison { op, .. } = Node::classify(&parsed) else {
            panic!("expected a comparison");
        };
        assert_eq!(op, "not like");
    }

    #[test]
    fn arithmetic_is_a_named_rejection() {
        let parsed = expr("a + 1");
        assert_eq!(
            Node::classify(&parsed),
            Node::Unsupported(Construct::BinaryArithmetic("+".to_string())),
        );
    }

    #[test]
    fn negative_numbers_are_literals() {
        let parsed = expr("-12");
        assert_eq!(
            Node::classify(&parsed),
            Node::Literal(Literal::Number(Cow::Owned("-12".to_string()))),
        );
    }

    #[test]
    fn unary_minus_on_a_column_is_rejected() {
        let parsed = expr("-a");
        assert!(matches!(
            Node::classify(&parsed),
            Node::Unsupported(Construct::UnaryArithmetic(_)),
        ));
    }

    #[test]
    fn rejections_name_their_construct() {
        let parsed = expr("EXISTS (SELECT 1 FROM t)");
        assert_eq!(Node::classify(&parsed), Node::Unsupported(Construct::Exists));

        let parsed = expr("upper(name)");
        assert_eq!(
            Node::classify(&parsed),
            Node::Unsupported(Construct::FunctionCall("upper".to_string())),
        );

        let parsed = expr("?");
        assert_eq!(
            Node::classify(&parsed),
            Node::Unsupported(Construct::BoundParameter("?".to_string())),
        );

        let parsed = expr("CASE WHEN a THEN 1 END");
        assert_eq!(Node::classify(&parsed), Node::Unsupported(Construct::Case));
    }

    #[test]
    fn predicates_are_recognized_through_parentheses() {
        assert!(Node::classify(&expr("(a = 1)")).is_predicate());
        assert!(Node::classify(&expr("a IS NULL")).is_predicate());
        assert!(!Node::classify(&expr("(a)")).is_predicate());
        assert!(!Node::classify(&expr("(1, 2)")).is_predicate());
    }
}
