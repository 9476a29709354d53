//! Identifier sanitization for dotted field names.
//!
//! MySQL reads `address.city` as a table-qualified column, so nested document
//! paths cannot pass through the parser as written. Dots between identifier
//! words are rewritten into a `__` delimiter before parsing and restored when
//! field paths and collection names are emitted.

/// Rewrites dotted identifiers into the `__` delimiter and back.
pub struct IdentifierSanitizer;

impl IdentifierSanitizer {
    /// Delimiter standing in for a dot inside an identifier.
    pub const DELIMITER: &'static str = "__";

    /// Replaces every dot that joins two identifier words with [`Self::DELIMITER`].
    ///
    /// String literals, backquoted identifiers, numeric literals (`3.14`) and
    /// qualified wildcards (`t.*`) are copied unchanged. Dots next to a
    /// backquoted identifier stay dots, since the parser already splits those
    /// into compound identifiers.
    pub fn sanitize(sql: &str) -> String {
        let mut sanitized = String::with_capacity(sql.len());
        let mut chars = sql.chars().peekable();
        // Whether the last token copied was an identifier word.
        let mut after_identifier = false;

        while let Some(c) = chars.next() {
            match c {
                '\'' | '"' | '`' => {
                    sanitized.push(c);
                    while let Some(inner) = chars.next() {
                        sanitized.push(inner);
                        if inner == '\\' && c != '`' {
                            if let Some(escaped) = chars.next() {
                                sanitized.push(escaped);
                            }
                        } else if inner == c {
                            // A doubled quote is an escaped quote.
                            if chars.peek() == Some(&c) {
                                sanitized.push(c);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                    }
                    after_identifier = false;
                }
                '.' => {
                    let joins_identifiers = after_identifier
                        && chars
                            .peek()
                            .is_some_and(|next| Self::is_identifier_start(*next));
                    if joins_identifiers {
                        sanitized.push_str(Self::DELIMITER);
                    } else {
                        sanitized.push('.');
                    }
                    after_identifier = false;
                }
                c if Self::is_word_char(c) => {
                    sanitized.push(c);
                    while let Some(next) = chars.peek().copied().filter(|n| Self::is_word_char(*n)) {
                        sanitized.push(next);
                        chars.next();
                    }
                    after_identifier = !c.is_ascii_digit();
                }
                _ => {
                    sanitized.push(c);
                    after_identifier = false;
                }
            }
        }

        sanitized
    }

    /// Turns every [`Self::DELIMITER`] back into a dot.
    pub fn restore(path: &str) -> String {
        path.replace(Self::DELIMITER, ".")
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '$'
    }

    fn is_identifier_start(c: char) -> bool {
        c.is_alphabetic() || c == '_'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_dotted_identifiers() {
        assert_eq!(
            IdentifierSanitizer::sanitize("SELECT a.b FROM db.users WHERE t.x.y = 1"),
            "SELECT a__b FROM db__users WHERE t__x__y = 1",
        );
    }

    #[test]
    fn leaves_numbers_and_strings_alone() {
        assert_eq!(
            IdentifierSanitizer::sanitize("SELECT * FROM t WHERE a = 3.14 AND b = 'x.y' AND c = \"p.q\""),
            "SELECT * FROM t WHERE a = 3.14 AND b = 'x.y' AND c = \"p.q\"",
        );
    }

    #[test]
    fn handles_escaped_quotes() {
        assert_eq!(
            IdentifierSanitizer::sanitize("SELECT * FROM t WHERE a = 'it''s a.b' AND b.c = 'x\\'y.z'"),
            "SELECT * FROM t WHERE a = 'it''s a.b' AND b__c = 'x\\'y.z'",
        );
    }

    #[test]
    fn keeps_dots_next_to_backquoted_identifiers() {
        assert_eq!(
            IdentifierSanitizer::sanitize("SELECT `a`.`b.c`, d.`e` FROM t"),
            "SELECT `a`.`b.c`, d.`e` FROM t",
        );
    }

    #[test]
    fn keeps_qualified_wildcard() {
        assert_eq!(IdentifierSanitizer::sanitize("SELECT t.* FROM t"), "SELECT t.* FROM t");
    }

    #[test]
    fn restores_delimiters() {
        assert_eq!(IdentifierSanitizer::restore("t.a__b"), "t.a.b");
        assert_eq!(IdentifierSanitizer::restore("plain"), "plain");
    }
}
