//! Coercion of SQL literals into BSON values.
//!
//! SQL numeric literals arrive as untyped text. They are read as a 64-bit
//! integer when the whole text is an integer and as a double otherwise, so
//! `42` becomes `Int64(42)` and `3.14` becomes `Double(3.14)`. Integers that
//! overflow `i64` fall back to a double.

use std::borrow::Cow;

use bson::Bson;
use sqlparser::ast::{Expr, UnaryOperator, Value};

use crate::error::{TranslateError, TranslateResult};

/// A literal leaf of a SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal<'a> {
    /// Numeric text, with any sign folded in.
    Number(Cow<'a, str>),
    /// Single or double quoted string, as unescaped by the parser.
    String(&'a str),
    /// `TRUE` or `FALSE`.
    Boolean(bool),
    /// `NULL`.
    Null,
}

impl<'a> Literal<'a> {
    /// Reads a numeric literal, folding a leading `-` or `+` into its text.
    ///
    /// Returns `None` for anything that is not a (possibly signed) number.
    pub fn signed_number(expr: &'a Expr) -> Option<Self> {
        match expr {
            Expr::Value(value) => match &value.value {
                Value::Number(text, _) => Some(Literal::Number(Cow::Borrowed(text))),
                _ => None,
            },
            Expr::UnaryOp { op: UnaryOperator::Minus, expr } => {
                match Literal::signed_number(expr)? {
                    Literal::Number(text) => Some(Literal::Number(Cow::Owned(negate(&text)))),
                    _ => None,
                }
            }
            Expr::UnaryOp { op: UnaryOperator::Plus, expr } => Literal::signed_number(expr),
            _ => None,
        }
    }

    /// Converts the literal into its BSON value.
    pub fn coerce(&self) -> TranslateResult<Bson> {
        match self {
            Literal::Number(text) => coerce_number(text),
            Literal::String(text) => Ok(Bson::String(text.to_string())),
            Literal::Boolean(value) => Ok(Bson::Boolean(*value)),
            Literal::Null => Ok(Bson::Null),
        }
    }
}

/// Parses numeric text as an `i64`, falling back to `f64`.
///
/// Text outside the finite `f64` range is rejected.
pub fn coerce_number(text: &str) -> TranslateResult<Bson> {
    if let Ok(value) = text.parse::<i64>() {
        return Ok(Bson::Int64(value));
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Bson::Double(value)),
        _ => Err(TranslateError::InvalidLiteral(text.to_string())),
    }
}

fn negate(text: &str) -> String {
    match text.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None => format!("-{text}"),
    }
}
