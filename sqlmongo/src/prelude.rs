//! Convenient re-exports of commonly used types from sqlmongo.
//!
//! ```
//! use sqlmongo::prelude::*;
//! ```

pub use sqlmongo_core::{
    error::{TranslateError, TranslateResult},
    filter::FilterTranslator,
    options::{NotNullOperator, TranslateOptions, TranslateOptionsBuilder},
    pagination::Pagination,
    projection::{Method, Projection, resolve_projection},
    statement::MongoStatement,
    translator::Translator,
    visitor::{ExprVisitor, Node},
};
