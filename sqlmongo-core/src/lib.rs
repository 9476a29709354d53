//! Translation of SQL `SELECT` statements into MongoDB shell statements.
//!
//! This crate is the core of the sqlmongo project and provides:
//!
//! - **Identifier sanitization** ([`sanitizer`]) - Dotted field paths that survive SQL parsing
//! - **Value coercion** ([`value`]) - SQL literals to BSON values
//! - **Expression visitor** ([`visitor`]) - Closed classification of SQL expressions
//! - **Filter translation** ([`filter`]) - `WHERE` clauses to filter documents
//! - **Projection resolution** ([`projection`]) - Select lists to `find`/`count` and projections
//! - **Pagination** ([`pagination`]) - `LIMIT` and `OFFSET` to `limit` and `skip`
//! - **Statement assembly** ([`statement`]) - The rendered call chain
//! - **Translator** ([`translator`]) - SQL text in, statement out
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```
//! use sqlmongo_core::{TranslateOptions, Translator};
//!
//! let translator = Translator::new(TranslateOptions::default());
//! let statement = translator
//!     .translate("SELECT count(*) FROM users WHERE age BETWEEN 18 AND 65")
//!     .unwrap();
//!
//! assert_eq!(
//!     statement.render().unwrap(),
//!     r#"db.users.count({"$and":[{"age":{"$gte":18}},{"age":{"$lte":65}}]})"#,
//! );
//! ```

#[allow(unused_extern_crates)]
extern crate self as sqlmongo_core;

pub mod error;
pub mod filter;
pub mod options;
pub mod pagination;
pub mod projection;
pub mod sanitizer;
pub mod statement;
pub mod translator;
pub mod value;
pub mod visitor;

pub use error::{TranslateError, TranslateResult};
pub use options::{NotNullOperator, TranslateOptions, TranslateOptionsBuilder};
pub use statement::MongoStatement;
pub use translator::Translator;
