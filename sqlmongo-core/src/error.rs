//! Error types and result types for SQL to MongoDB translation.
//!
//! Every error is fatal: translation stops at the first node that cannot be
//! translated and the error is handed back to the caller unchanged.
//! Use [`TranslateResult<T>`] as the return type for fallible operations.

use serde_json::Error as SerdeJsonError;
use sqlparser::parser::ParserError;
use thiserror::Error;

/// Represents all possible errors that can occur while translating a query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// The SQL text could not be parsed.
    #[error("Could not parse sql: {0}")]
    Parse(String),
    /// A numeric literal is neither a valid integer nor a valid float.
    #[error("Invalid numeric literal: {0}")]
    InvalidLiteral(String),
    /// A literal or value shape that cannot be coerced into a document value.
    #[error("Unsupported literal kind: {0}")]
    UnsupportedLiteralKind(String),
    /// A comparison operator with no MongoDB counterpart.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// A SQL construct the translator does not handle.
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),
    /// The syntax tree violates an assumption about its shape.
    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),
    /// A document could not be rendered to text.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A specialized `Result` type for translation operations.
pub type TranslateResult<T> = Result<T, TranslateError>;

impl From<ParserError> for TranslateError {
    fn from(err: ParserError) -> Self {
        TranslateError::Parse(err.to_string())
    }
}

impl From<SerdeJsonError> for TranslateError {
    fn from(err: SerdeJsonError) -> Self {
        TranslateError::Serialization(err.to_string())
    }
}

impl TranslateError {
    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        TranslateError::UnsupportedConstruct(construct.into())
    }
}
