//! Resolution of the select list into a query method and projection.
//!
//! - `SELECT *` runs `find` with no projection.
//! - `SELECT a, b` runs `find` with the projection `{ a: true, b: true }`.
//! - `SELECT count(*)` runs `count`.
//! - `SELECT count(a)` runs `count` and only counts documents where `a`
//!   exists.

use std::fmt;

use bson::{Document, doc};
use serde::Serialize;
use sqlparser::ast::{
    DuplicateTreatment, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, SelectItem,
};
use tracing::debug;

use crate::{
    error::{TranslateError, TranslateResult},
    filter::column_field,
};

/// The collection method a statement runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Find,
    Count,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Find => write!(f, "find"),
            Method::Count => write!(f, "count"),
        }
    }
}

/// The method, projection and filter requirement derived from a select list.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub method: Method,
    /// Inclusion projection, empty when every field is returned.
    pub fields: Document,
    /// Field that must exist for a document to be counted by `count(field)`.
    pub required_field: Option<String>,
}

impl Projection {
    fn find(fields: Document) -> Self {
        Self { method: Method::Find, fields, required_field: None }
    }

    fn count(required_field: Option<String>) -> Self {
        Self { method: Method::Count, fields: Document::new(), required_field }
    }

    /// Folds the existence requirement of `count(field)` into a filter.
    ///
    /// The given filter is kept as the second `$and` operand even when it
    /// is empty.
    pub fn apply_to_filter(&self, filter: Document) -> Document {
        match &self.required_field {
            Some(field) => doc! {
                "$and": [
                    { field: { "$exists": true } },
                    filter,
                ],
            },
            None => filter,
        }
    }
}

/// Resolves a select list into a [`Projection`].
///
/// # Errors
///
/// Returns [`TranslateError::UnsupportedConstruct`] for wildcards mixed with
/// other targets, qualified wildcards, aliases, functions other than a lone
/// `count`, and select targets that are not plain columns.
pub fn resolve_projection(items: &[SelectItem]) -> TranslateResult<Projection> {
    let has_wildcard = items.iter().any(|item| {
        matches!(item, SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..))
    });
    if has_wildcard {
        return match items {
            [SelectItem::Wildcard(_)] => Ok(Projection::find(Document::new())),
            [item @ SelectItem::QualifiedWildcard(..)] => Err(TranslateError::unsupported(
                format!("qualified wildcard `{item}`"),
            )),
            _ => Err(TranslateError::unsupported(
                "a wildcard must be the only select target",
            )),
        };
    }

    let functions = items.iter().filter(|item| is_function(item)).count();
    match (functions, items) {
        (0, []) => Err(TranslateError::unsupported("empty select list")),
        (0, _) => resolve_columns(items),
        (1, [item]) => resolve_count(item),
        (1, _) => Err(TranslateError::unsupported(
            "mixing functions and columns in the select list",
        )),
        (n, _) => Err(TranslateError::unsupported(format!(
            "{n} functions in the select list"
        ))),
    }
}

fn is_function(item: &SelectItem) -> bool {
    matches!(
        item,
        SelectItem::UnnamedExpr(Expr::Function(_))
            | SelectItem::ExprWithAlias { expr: Expr::Function(_), .. }
    )
}

fn resolve_columns(items: &[SelectItem]) -> TranslateResult<Projection> {
    let mut fields = Document::new();

    for item in items {
        let field = match item {
            SelectItem::UnnamedExpr(expr) => column_field(expr).ok_or_else(|| {
                TranslateError::unsupported(format!("select target `{expr}`"))
            })?,
            SelectItem::ExprWithAlias { alias, .. } => {
                return Err(TranslateError::unsupported(format!("alias `{alias}`")));
            }
            other => {
                return Err(TranslateError::unsupported(format!("select target `{other}`")));
            }
        };
        fields.insert(field, true);
    }

    debug!(fields = fields.len(), "resolved find projection");
    Ok(Projection::find(fields))
}

fn resolve_count(item: &SelectItem) -> TranslateResult<Projection> {
    let function = match item {
        SelectItem::UnnamedExpr(Expr::Function(function)) => function,
        SelectItem::ExprWithAlias { alias, .. } => {
            return Err(TranslateError::unsupported(format!("alias `{alias}`")));
        }
        other => {
            return Err(TranslateError::InternalInconsistency(format!(
                "expected a function call, found `{other}`"
            )));
        }
    };

    let name = function.name.to_string();
    if !name.eq_ignore_ascii_case("count") {
        return Err(TranslateError::unsupported(format!("function `{name}`")));
    }
    if function.over.is_some() {
        return Err(TranslateError::unsupported(format!("window function `{name}`")));
    }

    let arguments = match &function.args {
        FunctionArguments::List(arguments) => arguments,
        FunctionArguments::Subquery(_) => {
            return Err(TranslateError::unsupported("subquery"));
        }
        FunctionArguments::None => {
            return Err(TranslateError::unsupported(format!("`{name}` without arguments")));
        }
    };
    if matches!(arguments.duplicate_treatment, Some(DuplicateTreatment::Distinct)) {
        return Err(TranslateError::unsupported(format!("DISTINCT in `{name}`")));
    }

    let argument = match arguments.args.as_slice() {
        [argument] => argument,
        args => {
            return Err(TranslateError::unsupported(format!(
                "`{name}` with {} arguments",
                args.len()
            )));
        }
    };

    let projection = match argument {
        FunctionArg::Unnamed(FunctionArgExpr::Wildcard) => Projection::count(None),
        FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => match column_field(expr) {
            Some(field) => Projection::count(Some(field)),
            None => {
                return Err(TranslateError::unsupported(format!(
                    "`{name}` argument `{expr}`"
                )));
            }
        },
        other => {
            return Err(TranslateError::unsupported(format!("`{name}` argument `{other}`")));
        }
    };

    debug!(required_field = ?projection.required_field, "resolved count");
    Ok(projection)
}
