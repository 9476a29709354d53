//! Entry point turning SQL text into a [`MongoStatement`].

use std::borrow::Cow;

use sqlparser::{
    ast::Statement,
    dialect::MySqlDialect,
    parser::Parser,
};
use tracing::debug;

use crate::{
    error::{TranslateError, TranslateResult},
    options::TranslateOptions,
    sanitizer::IdentifierSanitizer,
    statement::MongoStatement,
};

/// Translates SQL `SELECT` statements into MongoDB shell statements.
///
/// # Example
///
/// ```
/// use sqlmongo_core::Translator;
///
/// let statement = Translator::default()
///     .translate("SELECT name FROM users WHERE age > 30 LIMIT 5")
///     .unwrap();
///
/// assert_eq!(
///     statement.render().unwrap(),
///     r#"db.users.find({"age":{"$gt":30}}, {"name":true}).limit(5)"#,
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Translator {
    options: TranslateOptions,
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Parses SQL text into exactly one statement.
    ///
    /// Dotted identifiers are sanitized first unless disabled in the options.
    pub fn parse(&self, sql: &str) -> TranslateResult<Statement> {
        let sql = if self.options.sanitize_identifiers {
            Cow::Owned(IdentifierSanitizer::sanitize(sql))
        } else {
            Cow::Borrowed(sql)
        };
        debug!(sql = %sql, "parsing");

        let mut statements = Parser::parse_sql(&MySqlDialect {}, &sql)?;
        match statements.len() {
            1 => Ok(statements.remove(0)),
            n => Err(TranslateError::unsupported(format!(
                "expected exactly one statement, got {n}"
            ))),
        }
    }

    /// Parses and translates SQL text.
    pub fn translate(&self, sql: &str) -> TranslateResult<MongoStatement> {
        let statement = self.parse(sql)?;
        MongoStatement::from_statement(&statement, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NotNullOperator;

    fn render(translator: &Translator, sql: &str) -> String {
        translator.translate(sql).unwrap().render().unwrap()
    }

    #[test]
    fn dotted_fields_survive_parsing() {
        assert_eq!(
            render(&Translator::default(), "SELECT address.city FROM users WHERE address.zip = '12345'"),
            r#"db.users.find({"address.zip":{"$eq":"12345"}}, {"address.city":true})"#,
        );
    }

    #[test]
    fn sanitizing_can_be_disabled() {
        let translator = Translator::new(
            TranslateOptions::builder().sanitize_identifiers(false).build(),
        );

        assert!(!translator.options().sanitize_identifiers);
        assert_eq!(
            render(&translator, "SELECT * FROM t WHERE a__b = 1"),
            r#"db.t.find({"a.b":{"$eq":1}})"#,
        );
    }

    #[test]
    fn not_null_operator_follows_options() {
        let sql = "SELECT * FROM t WHERE a IS NOT NULL";

        assert_eq!(render(&Translator::default(), sql), r#"db.t.find({"a":{"$ne":null}})"#);

        let legacy = Translator::new(TranslateOptions::builder().legacy_not_null(true).build());
        assert_eq!(legacy.options().not_null_operator, NotNullOperator::Neq);
        assert_eq!(render(&legacy, sql), r#"db.t.find({"a":{"$neq":null}})"#);
    }

    #[test]
    fn multiple_statements_are_rejected() {
        assert_eq!(
            Translator::default().translate("SELECT * FROM a; SELECT * FROM b").unwrap_err(),
            TranslateError::UnsupportedConstruct("expected exactly one statement, got 2".into()),
        );
    }

    #[test]
    fn parse_errors_are_reported() {
        assert!(matches!(
            Translator::default().translate("SELEC * FROM t"),
            Err(TranslateError::Parse(_)),
        ));
    }
}
