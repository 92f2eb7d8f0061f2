//! Grammar table for the StateSpec tokenizer
//!
//! An ordered list of (kind, category, pattern) rules. The tokenizer tries
//! the rules in table order at each scan position and takes the first rule
//! that matches; among the characters that rule can consume, the longest
//! match wins. Table order therefore encodes rule priority and is a
//! correctness-critical constant: reordering it changes the language.
//!
//! Keyword rules that collide with identifier prefixes (`N`, `Z`, `R`, `C`,
//! `B`, `true`, `false`, `Opt`, `Min`, `Max`, `Length`) carry an
//! identifier-boundary guard so that `Natural` or `Num` fall through to the
//! identifier rule instead of being cut at the keyword prefix.

use crate::token::{TokenCategory, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// One tokenization rule: a kind, its category, and an anchored pattern.
pub struct GrammarRule {
    pub kind: TokenKind,
    pub category: TokenCategory,
    regex: Regex,
    /// When set, the rule only matches if the following character cannot
    /// continue an identifier.
    ident_boundary: bool,
}

impl GrammarRule {
    fn new(kind: TokenKind, category: TokenCategory, pattern: &str) -> Self {
        Self {
            kind,
            category,
            // Patterns are compile-time constants; a bad one is a bug in
            // this table, not a runtime condition.
            regex: Regex::new(pattern).unwrap_or_else(|e| {
                panic!("invalid grammar pattern {:?} for {:?}: {}", pattern, kind, e)
            }),
            ident_boundary: false,
        }
    }

    fn with_boundary(mut self) -> Self {
        self.ident_boundary = true;
        self
    }

    /// Try this rule at the start of `input`. Returns the matched length in
    /// bytes, or `None` when the rule does not apply here.
    pub fn try_match(&self, input: &str) -> Option<usize> {
        let m = self.regex.find(input)?;
        debug_assert_eq!(m.start(), 0, "grammar patterns must be anchored");
        if self.ident_boundary {
            match input[m.end()..].chars().next() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => return None,
                _ => {}
            }
        }
        Some(m.end())
    }
}

/// The grammar table, in priority order.
pub static GRAMMAR: Lazy<Vec<GrammarRule>> = Lazy::new(|| {
    use TokenCategory::*;
    use TokenKind::*;

    vec![
        // Comments and macro markers consume to end of line and must win
        // over the division and identifier rules.
        GrammarRule::new(Comment, Special, r"^//[^\n]*"),
        GrammarRule::new(Macro, Special, r"^#[^\n]*"),
        GrammarRule::new(Whitespace, Special, r"^[ \t\r]+"),
        // `[]` before `[`.
        GrammarRule::new(ListSpecifier, Punctuator, r"^\[\]"),
        // Numeric literals: the fraction form first, then signed before
        // unsigned, all ahead of the subtraction operator so a leading `-`
        // binds to the literal.
        GrammarRule::new(Double, Literal, r"^-?[0-9]+\.[0-9]+"),
        GrammarRule::new(SignedNumber, Literal, r"^-[0-9]+"),
        GrammarRule::new(UnsignedNumber, Literal, r"^[0-9]+"),
        GrammarRule::new(TextValue, Literal, r#"^"[^"\n]*""#),
        GrammarRule::new(CharacterValue, Literal, r"^'[^'\n]'"),
        GrammarRule::new(BooleanValue, Literal, r"^(true|false)").with_boundary(),
        // Keywords ahead of the identifier rule, each boundary-guarded so
        // identifier prefixes survive (`Natural`, `Num`, `Zero`, ...).
        GrammarRule::new(Natural, Keyword, r"^N").with_boundary(),
        GrammarRule::new(Integer, Keyword, r"^Z").with_boundary(),
        GrammarRule::new(Real, Keyword, r"^R").with_boundary(),
        GrammarRule::new(Character, Keyword, r"^C").with_boundary(),
        GrammarRule::new(Boolean, Keyword, r"^B").with_boundary(),
        GrammarRule::new(Text, Keyword, r"^\$"),
        GrammarRule::new(Optional, Keyword, r"^Opt").with_boundary(),
        GrammarRule::new(Minimum, Keyword, r"^Min").with_boundary(),
        GrammarRule::new(Maximum, Keyword, r"^Max").with_boundary(),
        GrammarRule::new(Length, Keyword, r"^Length").with_boundary(),
        GrammarRule::new(
            TokenKind::Identifier,
            TokenCategory::Identifier,
            r"^[A-Za-z_][A-Za-z0-9_]*",
        ),
        // Operators.
        GrammarRule::new(Assign, Operator, r"^="),
        GrammarRule::new(Addition, Operator, r"^\+"),
        GrammarRule::new(Subtraction, Operator, r"^-"),
        GrammarRule::new(Multiplication, Operator, r"^\*"),
        GrammarRule::new(Division, Operator, r"^/"),
        GrammarRule::new(Modulo, Operator, r"^%"),
        GrammarRule::new(NotEqual, Operator, r"^≠"),
        GrammarRule::new(GreaterOrEqual, Operator, r"^≥"),
        GrammarRule::new(LessOrEqual, Operator, r"^≤"),
        GrammarRule::new(LessThan, Operator, r"^<"),
        GrammarRule::new(GreaterThan, Operator, r"^>"),
        GrammarRule::new(And, Operator, r"^∧"),
        GrammarRule::new(Or, Operator, r"^∨"),
        GrammarRule::new(Negation, Operator, r"^┐"),
        GrammarRule::new(Implication, Operator, r"^→"),
        GrammarRule::new(ForAll, Operator, r"^∀"),
        GrammarRule::new(Exists, Operator, r"^∃"),
        GrammarRule::new(Product, Operator, r"^∏"),
        GrammarRule::new(TokenKind::Summation, Operator, r"^∑"),
        // Punctuators.
        GrammarRule::new(Semicolon, Punctuator, r"^;"),
        GrammarRule::new(Colon, Punctuator, r"^:"),
        GrammarRule::new(Comma, Punctuator, r"^,"),
        GrammarRule::new(OpenParen, Punctuator, r"^\("),
        GrammarRule::new(CloseParen, Punctuator, r"^\)"),
        GrammarRule::new(OpenBrace, Punctuator, r"^\{"),
        GrammarRule::new(CloseBrace, Punctuator, r"^\}"),
        GrammarRule::new(OpenBracket, Punctuator, r"^\["),
        GrammarRule::new(CloseBracket, Punctuator, r"^\]"),
        GrammarRule::new(Period, Punctuator, r"^\."),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match(input: &str) -> Option<(TokenKind, usize)> {
        GRAMMAR
            .iter()
            .find_map(|rule| rule.try_match(input).map(|len| (rule.kind, len)))
    }

    #[test]
    fn test_all_patterns_compile() {
        // Forces the Lazy table; a bad pattern panics here.
        assert!(!GRAMMAR.is_empty());
    }

    #[test]
    fn test_keyword_boundary_guard() {
        assert_eq!(first_match("N"), Some((TokenKind::Natural, 1)));
        assert_eq!(first_match("N;"), Some((TokenKind::Natural, 1)));
        assert_eq!(first_match("N[]"), Some((TokenKind::Natural, 1)));
        // Identifier prefixes fall through to the identifier rule.
        assert_eq!(first_match("Natural"), Some((TokenKind::Identifier, 7)));
        assert_eq!(first_match("Num"), Some((TokenKind::Identifier, 3)));
        assert_eq!(first_match("Zero"), Some((TokenKind::Identifier, 4)));
    }

    #[test]
    fn test_builtin_keyword_boundaries() {
        assert_eq!(first_match("Opt("), Some((TokenKind::Optional, 3)));
        assert_eq!(first_match("Option"), Some((TokenKind::Identifier, 6)));
        assert_eq!(first_match("Length"), Some((TokenKind::Length, 6)));
        assert_eq!(first_match("Lengths"), Some((TokenKind::Identifier, 7)));
        assert_eq!(first_match("Max("), Some((TokenKind::Maximum, 3)));
    }

    #[test]
    fn test_numeric_priority() {
        assert_eq!(first_match("-0.23"), Some((TokenKind::Double, 5)));
        assert_eq!(first_match("-5"), Some((TokenKind::SignedNumber, 2)));
        assert_eq!(first_match("5"), Some((TokenKind::UnsignedNumber, 1)));
        // A lone range period stops the unsigned rule, not the double rule.
        assert_eq!(first_match("1..n"), Some((TokenKind::UnsignedNumber, 1)));
    }

    #[test]
    fn test_list_specifier_before_bracket() {
        assert_eq!(first_match("[]"), Some((TokenKind::ListSpecifier, 2)));
        assert_eq!(first_match("[i]"), Some((TokenKind::OpenBracket, 1)));
    }

    #[test]
    fn test_comment_before_division() {
        assert_eq!(first_match("// note"), Some((TokenKind::Comment, 7)));
        assert_eq!(first_match("/ 2"), Some((TokenKind::Division, 1)));
    }

    #[test]
    fn test_non_ascii_operators() {
        for (text, kind) in [
            ("≠", TokenKind::NotEqual),
            ("≥", TokenKind::GreaterOrEqual),
            ("≤", TokenKind::LessOrEqual),
            ("∧", TokenKind::And),
            ("∨", TokenKind::Or),
            ("┐", TokenKind::Negation),
            ("→", TokenKind::Implication),
            ("∀", TokenKind::ForAll),
            ("∃", TokenKind::Exists),
            ("∏", TokenKind::Product),
            ("∑", TokenKind::Summation),
        ] {
            assert_eq!(first_match(text), Some((kind, text.len())), "{}", text);
        }
    }
}
