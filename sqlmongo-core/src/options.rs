//! Translation settings.
//!
//! ```
//! use sqlmongo_core::options::{NotNullOperator, TranslateOptions};
//!
//! let options = TranslateOptions::builder()
//!     .sanitize_identifiers(false)
//!     .legacy_not_null(true)
//!     .build();
//!
//! assert!(!options.sanitize_identifiers);
//! assert_eq!(options.not_null_operator, NotNullOperator::Neq);
//! ```

/// Operator emitted for `IS NOT NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotNullOperator {
    /// `$ne`, the MongoDB not-equal operator.
    #[default]
    Ne,
    /// `$neq`, kept for output compatibility with the old sql2mongo tool.
    /// MongoDB rejects it at query time.
    Neq,
}

impl NotNullOperator {
    /// Returns the operator keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            NotNullOperator::Ne => "$ne",
            NotNullOperator::Neq => "$neq",
        }
    }
}

/// Settings that change how a query is translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Rewrite dotted identifiers (`address.city`) into nested field paths
    /// before parsing.
    pub sanitize_identifiers: bool,
    /// Operator used for `IS NOT NULL`.
    pub not_null_operator: NotNullOperator,
}

impl TranslateOptions {
    /// Creates a new builder for fluent construction.
    pub fn builder() -> TranslateOptionsBuilder {
        TranslateOptionsBuilder::new()
    }
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            sanitize_identifiers: true,
            not_null_operator: NotNullOperator::Ne,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranslateOptionsBuilder {
    options: TranslateOptions,
}

impl TranslateOptionsBuilder {
    /// Creates a new builder starting from the default options.
    pub fn new() -> Self {
        TranslateOptionsBuilder { options: TranslateOptions::default() }
    }

    /// Enables or disables identifier sanitization.
    pub fn sanitize_identifiers(mut self, enabled: bool) -> Self {
        self.options.sanitize_identifiers = enabled;
        self
    }

    /// Selects `$neq` instead of `$ne` for `IS NOT NULL`.
    pub fn legacy_not_null(mut self, enabled: bool) -> Self {
        self.options.not_null_operator = if enabled {
            NotNullOperator::Neq
        } else {
            NotNullOperator::Ne
        };
        self
    }

    /// Builds and returns the final options.
    pub fn build(self) -> TranslateOptions {
        self.options
    }
}

impl Default for TranslateOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sanitize_and_use_ne() {
        let options = TranslateOptions::default();

        assert!(options.sanitize_identifiers);
        assert_eq!(options.not_null_operator.keyword(), "$ne");
    }

    #[test]
    fn builder_overrides_defaults() {
        let options = TranslateOptions::builder()
            .sanitize_identifiers(false)
            .legacy_not_null(true)
            .build();

        assert!(!options.sanitize_identifiers);
        assert_eq!(options.not_null_operator, NotNullOperator::Neq);
        assert_eq!(options.not_null_operator.keyword(), "$neq");
    }
}
