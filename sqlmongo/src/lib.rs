//! Main sqlmongo crate for translating SQL queries into MongoDB shell statements.
//!
//! This crate is the primary entry point for users of sqlmongo. It re-exports
//! the core types from `sqlmongo-core` and ships the `sql2mongo` command line
//! tool (behind the default `cli` feature).
//!
//! # Supported SQL
//!
//! - **Single-table `SELECT`** - `*`, plain columns, `count(*)` or `count(column)`
//! - **Filtering** - comparisons, `IN`, `BETWEEN`, `IS [NOT] NULL`, `AND`, `OR` and `NOT`
//! - **Ordering** - `ORDER BY` on columns, ascending or descending
//! - **Pagination** - `LIMIT n OFFSET m` and `LIMIT m, n`
//!
//! Dotted column names such as `address.city` address nested fields.
//!
//! # Quick Start
//!
//! ```
//! let shell = sqlmongo::translate(
//!     "SELECT name, address.city FROM users WHERE age > 30 ORDER BY name LIMIT 10",
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     shell,
//!     r#"db.users.find({"age":{"$gt":30}}, {"name":true,"address.city":true}).sort({"name":1}).limit(10)"#,
//! );
//! ```
//!
//! # Options
//!
//! ```
//! use sqlmongo::prelude::*;
//!
//! let translator = Translator::new(TranslateOptions::builder().legacy_not_null(true).build());
//! let statement = translator.translate("SELECT * FROM users WHERE email IS NOT NULL").unwrap();
//!
//! assert_eq!(statement.render().unwrap(), r#"db.users.find({"email":{"$neq":null}})"#);
//! ```

pub mod prelude;

pub use sqlmongo_core::{
    error, filter, options, pagination, projection, sanitizer, statement, translator, value,
    visitor,
};
pub use sqlmongo_core::{MongoStatement, TranslateError, TranslateOptions, TranslateResult, Translator};

// Re-export BSON types for convenience
pub use bson;

/// Translates a SQL query with the default options and renders the result.
pub fn translate(sql: &str) -> TranslateResult<String> {
    Translator::default().translate(sql)?.render()
}
