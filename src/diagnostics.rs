//! Diagnostics shared by every analysis stage
//!
//! Each stage accumulates the errors and warnings it can detect and bundles
//! them into its result; a stage's success flag is strictly "no errors".
//! Diagnostics carry a stable short code, a templated human-readable
//! message, a severity, and a 1-based (line, column) position.

use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable diagnostic codes. One constant per error/warning kind; messages
/// may change, codes may not.
pub mod codes {
    // Lexical
    pub const INTERNAL_COMPILE_ERROR: &str = "internal-compile-error";
    pub const INVALID_MACRO: &str = "invalid-macro";
    pub const INVALID_VALUE_PLACEMENT: &str = "invalid-value-placement";
    pub const UNKNOWN_TOKEN_DEFINITION: &str = "unknown-token-definition";
    pub const MISSING_SECTION: &str = "missing-section";
    pub const MULTIPLE_MACRO: &str = "multiple-macro";

    // Parse
    pub const UNBALANCED_PARENTHESIS: &str = "unbalanced-parenthesis";
    pub const EMPTY_PARENTHESIS: &str = "empty-parenthesis";
    pub const UNEXPECTED_TOKEN: &str = "unexpected-token";
    pub const EXPECTED_OPEN_PAREN: &str = "expected-open-paren";
    pub const EXPECTED_COMMA: &str = "expected-comma";
    pub const EXPECTED_CLOSE_PAREN: &str = "expected-close-paren";
    pub const DUPLICATE_COMMA: &str = "duplicate-comma";
    pub const MISSING_CLOSING_BRACE: &str = "missing-closing-brace";
    pub const EMPTY_LIST_ELEMENT: &str = "empty-list-element";
    pub const MULTIPLE_LIST_SPECIFIERS: &str = "multiple-list-specifiers";
    pub const UNEXPECTED_TOKEN_IN_TYPE: &str = "unexpected-token-in-type";

    // Semantic
    pub const INVALID_IDENTIFIER_NAME: &str = "invalid-identifier-name";
    pub const DUPLICATE_SYMBOL: &str = "duplicate-symbol";
    pub const UNDECLARED_SYMBOL: &str = "undeclared-symbol";
    pub const TYPE_MISMATCH: &str = "type-mismatch";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// A single error or warning produced by an analysis stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn error(code: &str, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: Severity::Error,
            line,
            column,
        }
    }

    pub fn warning(code: &str, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: Severity::Warning,
            line,
            column,
        }
    }

    /// Positioned error at a token, the dominant reporting idiom in the
    /// parser: the message carries the actual value and what was expected.
    pub fn unexpected_token(token: &Token, expected: &str) -> Self {
        Self::error(
            codes::UNEXPECTED_TOKEN,
            format!(
                "unexpected token '{}' at {}:{}, expected {}",
                token.text.escape_default(),
                token.line,
                token.column,
                expected
            ),
            token.line,
            token.column,
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{}[{}] at {}:{}: {}",
            tag, self.code, self.line, self.column, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TokenCategory, TokenKind};

    #[test]
    fn test_display_format() {
        let d = Diagnostic::error(codes::MISSING_SECTION, "section 'Input' is missing", 0, 0);
        assert_eq!(
            d.to_string(),
            "error[missing-section] at 0:0: section 'Input' is missing"
        );
    }

    #[test]
    fn test_unexpected_token_position() {
        let token = Token::new(TokenKind::OpenParen, TokenCategory::Punctuator, "(", 3, 7);
        let d = Diagnostic::unexpected_token(&token, "an operator");
        assert_eq!(d.code, codes::UNEXPECTED_TOKEN);
        assert_eq!((d.line, d.column), (3, 7));
        assert!(d.message.contains("expected an operator"));
        assert!(d.is_error());
    }

    #[test]
    fn test_warning_severity() {
        let d = Diagnostic::warning(codes::DUPLICATE_COMMA, "repeated comma", 1, 4);
        assert!(!d.is_error());
    }
}
