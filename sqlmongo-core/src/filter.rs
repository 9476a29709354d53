//! Translation of SQL `WHERE` expressions into MongoDB filter documents.
//!
//! Comparisons become single-key documents of the form
//! `{ field: { operator: value } }`. `AND` and `OR` wrap exactly two
//! translated operands and keep the parser's left-nested shape, and `NOT`
//! wraps one. Parentheses leave no trace in the output.

use bson::{Bson, Document, doc};
use sqlparser::ast::{Expr, Ident};
use tracing::trace;

use crate::{
    error::{TranslateError, TranslateResult},
    options::TranslateOptions,
    sanitizer::IdentifierSanitizer,
    value::Literal,
    visitor::{Construct, ExprVisitor, Node},
};

/// SQL comparison operators and their MongoDB query operators.
const COMPARISON_OPERATORS: [(&str, &str); 9] = [
    ("=", "$eq"),
    ("<", "$lt"),
    (">", "$gt"),
    ("<=", "$lte"),
    (">=", "$gte"),
    ("<>", "$ne"),
    ("!=", "$ne"),
    ("in", "$in"),
    ("not in", "$nin"),
];

/// Looks up the MongoDB operator for a lowercased SQL comparison operator.
pub fn mongo_operator(sql_operator: &str) -> TranslateResult<&'static str> {
    COMPARISON_OPERATORS
        .iter()
        .find(|(sql, _)| *sql == sql_operator)
        .map(|(_, mongo)| *mongo)
        .ok_or_else(|| TranslateError::UnsupportedOperator(sql_operator.to_string()))
}

/// Joins column parts into a field path and restores sanitized dots.
///
/// `t.a__b` and `t.a.b` both resolve to `t.a.b`.
pub fn field_path(parts: &[Ident]) -> String {
    IdentifierSanitizer::restore(
        &parts
            .iter()
            .map(|part| part.value.as_str())
            .collect::<Vec<_>>()
            .join("."),
    )
}

/// Returns the field path of a plain column reference.
pub fn column_field(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(field_path(std::slice::from_ref(ident))),
        Expr::CompoundIdentifier(parts) => Some(field_path(parts)),
        _ => None,
    }
}

/// Translates SQL expressions into MongoDB filter values.
///
/// Predicates translate to documents. Columns translate to their field path
/// string and literals to their coerced value, which is what they become on
/// the right-hand side of a comparison.
pub struct FilterTranslator<'a> {
    options: &'a TranslateOptions,
}

impl<'a> FilterTranslator<'a> {
    pub fn new(options: &'a TranslateOptions) -> Self {
        Self { options }
    }

    /// Translates any supported expression.
    pub fn translate(&mut self, expr: &Expr) -> TranslateResult<Bson> {
        self.visit_expr(expr)
    }

    /// Translates an optional `WHERE` clause. A missing clause yields an
    /// empty document.
    pub fn translate_filter(&mut self, selection: Option<&Expr>) -> TranslateResult<Document> {
        let Some(selection) = selection else {
            return Ok(Document::new());
        };

        self.predicate(selection)
    }

    /// Translates an expression that must produce a filter document.
    ///
    /// Columns and literals are values, not predicates, and fail with
    /// [`TranslateError::UnsupportedConstruct`].
    fn predicate(&mut self, expr: &Expr) -> TranslateResult<Document> {
        match self.visit_expr(expr)? {
            Bson::Document(filter) => Ok(filter),
            _ => Err(TranslateError::unsupported(format!(
                "`{expr}` is not a predicate"
            ))),
        }
    }

    /// Coerces an operand into a value. A missing operand is `null`.
    ///
    /// Literals, columns and tuples are accepted. Predicates are not values
    /// and fail with [`TranslateError::UnsupportedLiteralKind`].
    pub fn coerce(&mut self, operand: Option<&Expr>) -> TranslateResult<Bson> {
        let Some(operand) = operand else {
            return Ok(Bson::Null);
        };

        let node = Node::classify(operand);
        if node.is_predicate() {
            return Err(TranslateError::UnsupportedLiteralKind(format!(
                "predicate `{operand}` used as a value"
            )));
        }

        self.visit_node(node)
    }

    /// Resolves the column on the left-hand side of a comparison.
    fn column_path(&self, expr: &Expr) -> TranslateResult<String> {
        match Node::classify(expr) {
            Node::Column(parts) => Ok(field_path(parts)),
            Node::Nested(inner) => self.column_path(inner),
            _ => Err(TranslateError::InternalInconsistency(format!(
                "expected a column on the left of a comparison, found `{expr}`"
            ))),
        }
    }

    fn coerce_all(&mut self, items: &[Expr]) -> TranslateResult<Vec<Bson>> {
        items
            .iter()
            .map(|item| self.coerce(Some(item)))
            .collect::<TranslateResult<Vec<_>>>()
    }
}

fn condition(field: String, operator: &str, value: Bson) -> Bson {
    Bson::Document(doc! {
        field: { operator: value },
    })
}

impl<'a> ExprVisitor for FilterTranslator<'a> {
    type Output = Bson;
    type Error = TranslateError;

    fn visit_and(&mut self, left: &Expr, right: &Expr) -> Result<Self::Output, Self::Error> {
        let operands = vec![self.predicate(left)?, self.predicate(right)?];

        Ok(Bson::Document(doc! {
            "$and": operands,
        }))
    }

    fn visit_or(&mut self, left: &Expr, right: &Expr) -> Result<Self::Output, Self::Error> {
        let operands = vec![self.predicate(left)?, self.predicate(right)?];

        Ok(Bson::Document(doc! {
            "$or": operands,
        }))
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(Bson::Document(doc! {
            "$not": self.predicate(expr)?,
        }))
    }

    fn visit_comparison(&mut self, left: &Expr, op: &str, right: &Expr) -> Result<Self::Output, Self::Error> {
        let operator = mongo_operator(op)?;
        let field = self.column_path(left)?;
        let value = self.coerce(Some(right))?;
        trace!(%field, operator, "translated comparison");

        Ok(condition(field, operator, value))
    }

    fn visit_in_list(&mut self, expr: &Expr, list: &[Expr], negated: bool) -> Result<Self::Output, Self::Error> {
        let operator = mongo_operator(if negated { "not in" } else { "in" })?;
        let field = self.column_path(expr)?;
        let values = self.coerce_all(list)?;

        Ok(condition(field, operator, Bson::Array(values)))
    }

    fn visit_between(
        &mut self,
        expr: &Expr,
        low: &Expr,
        high: &Expr,
        negated: bool,
    ) -> Result<Self::Output, Self::Error> {
        let field = self.column_path(expr)?;
        let low = self.coerce(Some(low))?;
        let high = self.coerce(Some(high))?;

        let range = doc! {
            "$and": [
                condition(field.clone(), "$gte", low),
                condition(field, "$lte", high),
            ],
        };

        Ok(Bson::Document(if negated {
            doc! { "$not": range }
        } else {
            range
        }))
    }

    fn visit_null_check(&mut self, expr: &Expr, negated: bool) -> Result<Self::Output, Self::Error> {
        let field = self.column_path(expr)?;
        let operator = if negated {
            self.options.not_null_operator.keyword()
        } else {
            "$eq"
        };

        Ok(condition(field, operator, Bson::Null))
    }

    fn visit_column(&mut self, parts: &[Ident]) -> Result<Self::Output, Self::Error> {
        Ok(Bson::String(field_path(parts)))
    }

    fn visit_literal(&mut self, literal: &Literal<'_>) -> Result<Self::Output, Self::Error> {
        literal.coerce()
    }

    fn visit_tuple(&mut self, items: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(Bson::Array(self.coerce_all(items)?))
    }

    fn visit_unsupported_literal(&mut self, literal: &str) -> Result<Self::Output, Self::Error> {
        Err(TranslateError::UnsupportedLiteralKind(literal.to_string()))
    }

    fn visit_unsupported(&mut self, construct: Construct) -> Result<Self::Output, Self::Error> {
        Err(TranslateError::UnsupportedConstruct(construct.to_string()))
    }
}
