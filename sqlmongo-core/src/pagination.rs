//! Limit and skip modifiers.
//!
//! Both values are coerced like any other literal. Only positive integers
//! make it into the statement: `LIMIT 0`, `OFFSET 0` and values that are not
//! integers are dropped without an error.

use bson::Bson;
use serde::Serialize;
use sqlparser::ast::{Expr, LimitClause};
use tracing::debug;

use crate::{
    error::{TranslateError, TranslateResult},
    filter::FilterTranslator,
    options::TranslateOptions,
};

/// Row window applied after the query method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
}

impl Pagination {
    /// Reads the limit and offset of a query.
    ///
    /// Handles both `LIMIT n OFFSET m` and the MySQL `LIMIT m, n` form.
    pub fn from_clause(
        clause: Option<&LimitClause>,
        options: &TranslateOptions,
    ) -> TranslateResult<Self> {
        let (limit, offset) = match clause {
            None => return Ok(Self::default()),
            Some(LimitClause::LimitOffset { limit_by, .. }) if !limit_by.is_empty() => {
                return Err(TranslateError::unsupported("LIMIT BY"));
            }
            Some(LimitClause::LimitOffset { limit, offset, .. }) => {
                (limit.as_ref(), offset.as_ref().map(|offset| &offset.value))
            }
            Some(LimitClause::OffsetCommaLimit { offset, limit }) => (Some(limit), Some(offset)),
        };

        Ok(Self {
            limit: positive("limit", limit, options)?,
            skip: positive("skip", offset, options)?,
        })
    }
}

fn positive(
    modifier: &str,
    expr: Option<&Expr>,
    options: &TranslateOptions,
) -> TranslateResult<Option<i64>> {
    let Some(expr) = expr else {
        return Ok(None);
    };

    match FilterTranslator::new(options).coerce(Some(expr))? {
        Bson::Int64(value) if value > 0 => Ok(Some(value)),
        value => {
            debug!(modifier, %value, "dropping modifier");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sqlparser::{ast::Statement, dialect::MySqlDialect, parser::Parser};

    fn paginate(sql: &str) -> TranslateResult<Pagination> {
        let mut statements = Parser::parse_sql(&MySqlDialect {}, sql).unwrap();
        let Some(Statement::Query(query)) = statements.pop() else {
            panic!("expected a query");
        };
        Pagination::from_clause(query.limit_clause.as_ref(), &TranslateOptions::default())
    }

    #[rstest]
    #[case("SELECT * FROM t", None, None)]
    #[case("SELECT * FROM t LIMIT 10", Some(10), None)]
    #[case("SELECT * FROM t LIMIT 10 OFFSET 3", Some(10), Some(3))]
    #[case("SELECT * FROM t LIMIT 3, 10", Some(10), Some(3))]
    #[case("SELECT * FROM t LIMIT 0", None, None)]
    #[case("SELECT * FROM t LIMIT 5 OFFSET 0", Some(5), None)]
    #[case("SELECT * FROM t LIMIT 2.5", None, None)]
    #[case("SELECT * FROM t LIMIT 'ten'", None, None)]
    fn reads_modifiers(
        #[case] sql: &str,
        #[case] limit: Option<i64>,
        #[case] skip: Option<i64>,
    ) {
        assert_eq!(paginate(sql).unwrap(), Pagination { limit, skip });
    }

    #[test]
    fn placeholders_are_rejected() {
        assert!(matches!(
            paginate("SELECT * FROM t LIMIT ?"),
            Err(TranslateError::UnsupportedConstruct(_)),
        ));
    }
}
