//! Assembly of a parsed `SELECT` into a MongoDB shell statement.
//!
//! A statement renders as a call chain on a collection handle:
//!
//! ```text
//! db.<collection>.<method>(<filter>[, <projection>])[.sort(<sort>)][.limit(<n>)][.skip(<n>)]
//! ```

use bson::Document;
use serde::Serialize;
use sqlparser::ast::{
    GroupByExpr, ObjectName, ObjectNamePart, OrderBy, OrderByKind, Query, SetExpr, Statement,
    TableFactor,
};
use tracing::debug;

use crate::{
    error::{TranslateError, TranslateResult},
    filter::{FilterTranslator, column_field},
    options::TranslateOptions,
    pagination::Pagination,
    projection::{Method, resolve_projection},
    sanitizer::IdentifierSanitizer,
};

/// A translated query, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MongoStatement {
    pub collection: String,
    pub method: Method,
    pub filter: Document,
    #[serde(skip_serializing_if = "Document::is_empty")]
    pub projection: Document,
    #[serde(skip_serializing_if = "Document::is_empty")]
    pub sort: Document,
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl MongoStatement {
    /// Translates a parsed statement. Only queries are accepted.
    pub fn from_statement(
        statement: &Statement,
        options: &TranslateOptions,
    ) -> TranslateResult<Self> {
        match statement {
            Statement::Query(query) => Self::from_query(query, options),
            other => Err(TranslateError::unsupported(format!(
                "statement `{other}`, only SELECT is supported"
            ))),
        }
    }

    /// Translates a single-table `SELECT` query.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::UnsupportedConstruct`] for set operations,
    /// `WITH`, `FETCH`, `DISTINCT`, `GROUP BY`, `HAVING`, joins, derived
    /// tables and any number of source tables other than one, plus whatever
    /// the filter, projection and pagination translation reject.
    pub fn from_query(query: &Query, options: &TranslateOptions) -> TranslateResult<Self> {
        if query.with.is_some() {
            return Err(TranslateError::unsupported("WITH clause"));
        }
        if query.fetch.is_some() {
            return Err(TranslateError::unsupported("FETCH clause"));
        }
        if !query.locks.is_empty() {
            return Err(TranslateError::unsupported("locking clause"));
        }

        let select = match query.body.as_ref() {
            SetExpr::Select(select) => select,
            SetExpr::SetOperation { op, .. } => {
                return Err(TranslateError::unsupported(format!("set operation `{op}`")));
            }
            SetExpr::Query(_) => return Err(TranslateError::unsupported("subquery")),
            other => {
                return Err(TranslateError::unsupported(format!("query body `{other}`")));
            }
        };

        if select.distinct.is_some() {
            return Err(TranslateError::unsupported("DISTINCT"));
        }
        match &select.group_by {
            GroupByExpr::Expressions(columns, modifiers)
                if columns.is_empty() && modifiers.is_empty() => {}
            _ => return Err(TranslateError::unsupported("GROUP BY")),
        }
        if select.having.is_some() {
            return Err(TranslateError::unsupported("HAVING"));
        }

        let table = match select.from.as_slice() {
            [table] => table,
            tables => {
                return Err(TranslateError::unsupported(format!(
                    "expected exactly one table, got {}",
                    tables.len()
                )));
            }
        };
        if !table.joins.is_empty() {
            return Err(TranslateError::unsupported("JOIN"));
        }
        let collection = match &table.relation {
            TableFactor::Table { name, args: None, .. } => collection_name(name)?,
            TableFactor::Table { name, .. } => {
                return Err(TranslateError::unsupported(format!("table function `{name}`")));
            }
            TableFactor::Derived { .. } => {
                return Err(TranslateError::unsupported("derived table"));
            }
            other => {
                return Err(TranslateError::unsupported(format!("table source `{other}`")));
            }
        };

        let projection = resolve_projection(&select.projection)?;
        let filter = FilterTranslator::new(options).translate_filter(select.selection.as_ref())?;
        let filter = projection.apply_to_filter(filter);
        let sort = sort_document(query.order_by.as_ref(), projection.method)?;
        let pagination = Pagination::from_clause(query.limit_clause.as_ref(), options)?;

        debug!(
            %collection,
            method = %projection.method,
            projected = projection.fields.len(),
            sorted = sort.len(),
            "assembled statement"
        );

        Ok(Self {
            collection,
            method: projection.method,
            filter,
            projection: projection.fields,
            sort,
            pagination,
        })
    }

    /// Renders the statement as a MongoDB shell call chain.
    pub fn render(&self) -> TranslateResult<String> {
        let mut rendered = format!(
            "db.{}.{}({}",
            self.collection,
            self.method,
            serde_json::to_string(&self.filter)?
        );
        if !self.projection.is_empty() {
            rendered.push_str(", ");
            rendered.push_str(&serde_json::to_string(&self.projection)?);
        }
        rendered.push(')');

        if !self.sort.is_empty() {
            rendered.push_str(&format!(".sort({})", serde_json::to_string(&self.sort)?));
        }
        if let Some(limit) = self.pagination.limit {
            rendered.push_str(&format!(".limit({limit})"));
        }
        if let Some(skip) = self.pagination.skip {
            rendered.push_str(&format!(".skip({skip})"));
        }

        Ok(rendered)
    }

    /// Serializes the statement as a JSON object.
    pub fn to_json(&self) -> TranslateResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn collection_name(name: &ObjectName) -> TranslateResult<String> {
    let mut parts = Vec::with_capacity(name.0.len());
    for part in &name.0 {
        match part {
            ObjectNamePart::Identifier(ident) => parts.push(ident.value.as_str()),
            #[allow(unreachable_patterns)]
            _ => return Err(TranslateError::unsupported(format!("table name `{name}`"))),
        }
    }

    Ok(IdentifierSanitizer::restore(&parts.join(".")))
}

fn sort_document(order_by: Option<&OrderBy>, method: Method) -> TranslateResult<Document> {
    let mut sort = Document::new();
    let Some(order_by) = order_by else {
        return Ok(sort);
    };

    if method == Method::Count {
        return Err(TranslateError::unsupported("ORDER BY on count"));
    }
    let keys = match &order_by.kind {
        OrderByKind::Expressions(keys) => keys,
        OrderByKind::All(_) => return Err(TranslateError::unsupported("ORDER BY ALL")),
    };

    for key in keys {
        let field = column_field(&key.expr).ok_or_else(|| {
            TranslateError::unsupported(format!("ORDER BY key `{}`", key.expr))
        })?;
        let direction = match key.options.asc {
            Some(false) => -1,
            _ => 1,
        };
        sort.insert(field, direction);
    }

    Ok(sort)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use sqlparser::{dialect::MySqlDialect, parser::Parser};

    fn assemble(sql: &str) -> TranslateResult<MongoStatement> {
        let mut statements = Parser::parse_sql(&MySqlDialect {}, sql).unwrap();
        MongoStatement::from_statement(&statements.remove(0), &TranslateOptions::default())
    }

    fn render(sql: &str) -> String {
        assemble(sql).unwrap().render().unwrap()
    }

    fn rejection(sql: &str) -> String {
        match assemble(sql) {
            Err(TranslateError::UnsupportedConstruct(construct)) => construct,
            other => panic!("expected {sql} to be rejected, got {other:?}"),
        }
    }

    #[test]
    fn find_everything() {
        assert_eq!(render("SELECT * FROM users"), "db.users.find({})");
    }

    #[test]
    fn find_with_filter_projection_and_pagination() {
        assert_eq!(
            render("SELECT a, b FROM t WHERE x > 5 LIMIT 10 OFFSET 3"),
            r#"db.t.find({"x":{"$gt":5}}, {"a":true,"b":true}).limit(10).skip(3)"#,
        );
    }

    #[test]
    fn count_star_with_filter() {
        assert_eq!(
            render("SELECT count(*) FROM users WHERE x = 1"),
            r#"db.users.count({"x":{"$eq":1}})"#,
        );
    }

    #[test]
    fn count_column_without_filter() {
        assert_eq!(
            render("SELECT count(email) FROM users"),
            r#"db.users.count({"$and":[{"email":{"$exists":true}},{}]})"#,
        );
    }

    #[test]
    fn zero_modifiers_are_omitted() {
        assert_eq!(render("SELECT * FROM t LIMIT 0"), "db.t.find({})");
        assert_eq!(render("SELECT * FROM t LIMIT 4 OFFSET 0"), "db.t.find({}).limit(4)");
    }

    #[test]
    fn sort_precedes_pagination() {
        assert_eq!(
            render("SELECT * FROM t ORDER BY a, b DESC, c ASC LIMIT 2"),
            r#"db.t.find({}).sort({"a":1,"b":-1,"c":1}).limit(2)"#,
        );
    }

    #[test]
    fn qualified_collection_names_keep_their_dots() {
        let statement = assemble("SELECT * FROM shop.orders__archive").unwrap();

        assert_eq!(statement.collection, "shop.orders.archive");
    }

    #[test]
    fn statement_fields() {
        let statement = assemble("SELECT name FROM users WHERE age >= 18 LIMIT 5").unwrap();

        assert_eq!(
            statement,
            MongoStatement {
                collection: "users".to_string(),
                method: Method::Find,
                filter: doc! { "age": { "$gte": 18_i64 } },
                projection: doc! { "name": true },
                sort: Document::new(),
                pagination: Pagination { limit: Some(5), skip: None },
            },
        );
    }

    #[test]
    fn json_skips_empty_parts() {
        assert_eq!(
            assemble("SELECT * FROM users LIMIT 5").unwrap().to_json().unwrap(),
            r#"{"collection":"users","method":"find","filter":{},"limit":5}"#,
        );
    }

    #[test]
    fn table_count_is_named() {
        assert_eq!(rejection("SELECT * FROM a, b"), "expected exactly one table, got 2");
    }

    #[test]
    fn rejected_queries() {
        let rejected = [
            "SELECT * FROM a JOIN b ON a.id = b.id",
            "SELECT * FROM (SELECT * FROM t) AS d",
            "SELECT DISTINCT a FROM t",
            "SELECT a FROM t GROUP BY a",
            "SELECT * FROM t HAVING a > 1",
            "SELECT * FROM a UNION SELECT * FROM b",
            "WITH c AS (SELECT * FROM t) SELECT * FROM c",
            "SELECT count(*) FROM t ORDER BY a",
            "SELECT * FROM t ORDER BY a + 1",
            "SELECT * FROM t WHERE EXISTS (SELECT * FROM u)",
            "SELECT * FROM t WHERE a = ?",
            "SELECT * FROM t WHERE 1",
        ];

        for sql in rejected {
            rejection(sql);
        }
    }

    #[test]
    fn only_queries_are_accepted() {
        rejection("DELETE FROM t WHERE a = 1");
    }
}
