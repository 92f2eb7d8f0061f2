//! Token definitions for the StateSpec language
//!
//! This module defines the tokens produced by the tokenizer, plus the two
//! closed classifications every token carries: its precise lexeme role
//! ([`TokenKind`]) and its coarse grouping ([`TokenCategory`]).
//!
//! Tokens are immutable once produced, with one exception: the tokenizer
//! retags the trailing whitespace of each non-empty line into a `Newline`
//! marker, which is how line boundaries travel downstream without a
//! dedicated pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse token grouping used for validation across all stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    Literal,
    Operator,
    Punctuator,
    Special,
}

/// The precise lexeme role of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    // Type keywords
    /// `N` - natural numbers
    Natural,
    /// `Z` - integers
    Integer,
    /// `R` - reals
    Real,
    /// `C` - characters
    Character,
    /// `$` - text
    Text,
    /// `B` - booleans
    Boolean,

    // Built-in call keywords
    /// `Opt` - optional/choice form
    Optional,
    /// `Min`
    Minimum,
    /// `Max`
    Maximum,
    /// `Length` - list length access
    Length,

    // Identifiers
    Identifier,

    // Literals
    /// Floating-point literal, optionally signed (`-0.23`)
    Double,
    /// Signed integer literal (`-5`)
    SignedNumber,
    /// Unsigned integer literal (`5`)
    UnsignedNumber,
    /// `true` / `false`
    BooleanValue,
    /// Character literal with quotes stripped (`'a'`)
    CharacterValue,
    /// String literal with quotes stripped (`"abc"`)
    TextValue,

    // Operators
    /// `=` - assignment in initializations, equality in conditions
    Assign,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    LessThan,
    GreaterThan,
    /// `≠`
    NotEqual,
    /// `≥`
    GreaterOrEqual,
    /// `≤`
    LessOrEqual,
    /// `∧`
    And,
    /// `∨`
    Or,
    /// `┐`
    Negation,
    /// `→`
    Implication,
    /// `∀`
    ForAll,
    /// `∃`
    Exists,
    /// `∏`
    Product,
    /// `∑`
    Summation,

    // Punctuators
    Semicolon,
    Colon,
    Comma,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    /// `[]` - list type specifier
    ListSpecifier,
    Period,

    // Special
    Whitespace,
    Newline,
    Comment,
    /// Bare macro section header (`#StateSpace`)
    Macro,
    /// Inline macro definition (`#Name value`); text keeps everything after `#`
    MacroValue,
    /// Any character no grammar rule matched
    Unknown,
}

impl TokenKind {
    /// Check if this kind is one of the six type keywords.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Natural
                | TokenKind::Integer
                | TokenKind::Real
                | TokenKind::Character
                | TokenKind::Text
                | TokenKind::Boolean
        )
    }

    /// Check if this kind is a macro marker (bare header or inline definition).
    pub fn is_macro(&self) -> bool {
        matches!(self, TokenKind::Macro | TokenKind::MacroValue)
    }
}

/// A single token with its classification and 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub category: TokenCategory,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        category: TokenCategory,
        text: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            category,
            text: text.into(),
            line,
            column,
        }
    }

    /// Check if this token is insignificant for statement parsing.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Check if this token can stand as an operand leaf.
    pub fn is_operand(&self) -> bool {
        matches!(
            self.category,
            TokenCategory::Literal | TokenCategory::Identifier
        )
    }

    /// Check if this token is a binary operator.
    pub fn is_operator(&self) -> bool {
        self.category == TokenCategory::Operator
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({:?}) '{}' at {}:{}",
            self.kind,
            self.category,
            self.text.escape_default(),
            self.line,
            self.column
        )
    }
}
