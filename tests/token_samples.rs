//! Table-driven tokenizer samples
//!
//! One case per grammar rule family, checking the kind and text of the
//! first token the rule produces.

use rstest::rstest;
use statespec::token::{TokenCategory, TokenKind};
use statespec::tokenizer::tokenize;

#[rstest]
#[case("N", TokenKind::Natural, "N")]
#[case("Z", TokenKind::Integer, "Z")]
#[case("R", TokenKind::Real, "R")]
#[case("C", TokenKind::Character, "C")]
#[case("B", TokenKind::Boolean, "B")]
#[case("Opt", TokenKind::Optional, "Opt")]
#[case("Min", TokenKind::Minimum, "Min")]
#[case("Max", TokenKind::Maximum, "Max")]
#[case("Length", TokenKind::Length, "Length")]
#[case("true", TokenKind::BooleanValue, "true")]
#[case("false", TokenKind::BooleanValue, "false")]
#[case("42", TokenKind::UnsignedNumber, "42")]
#[case("-42", TokenKind::SignedNumber, "-42")]
#[case("-4.2", TokenKind::Double, "-4.2")]
#[case("4.2", TokenKind::Double, "4.2")]
#[case("counter", TokenKind::Identifier, "counter")]
#[case("_x1", TokenKind::Identifier, "_x1")]
#[case("=", TokenKind::Assign, "=")]
#[case("+", TokenKind::Addition, "+")]
#[case("%", TokenKind::Modulo, "%")]
#[case("≠", TokenKind::NotEqual, "≠")]
#[case("≥", TokenKind::GreaterOrEqual, "≥")]
#[case("≤", TokenKind::LessOrEqual, "≤")]
#[case("∧", TokenKind::And, "∧")]
#[case("∨", TokenKind::Or, "∨")]
#[case("┐", TokenKind::Negation, "┐")]
#[case("→", TokenKind::Implication, "→")]
#[case("∀", TokenKind::ForAll, "∀")]
#[case("∃", TokenKind::Exists, "∃")]
#[case("∏", TokenKind::Product, "∏")]
#[case("∑", TokenKind::Summation, "∑")]
#[case(";", TokenKind::Semicolon, ";")]
#[case("[]", TokenKind::ListSpecifier, "[]")]
#[case("[", TokenKind::OpenBracket, "[")]
#[case("{", TokenKind::OpenBrace, "{")]
#[case(".", TokenKind::Period, ".")]
fn test_first_token(#[case] source: &str, #[case] kind: TokenKind, #[case] text: &str) {
    let tokens = tokenize(source);
    assert!(!tokens.is_empty());
    assert_eq!(tokens[0].kind, kind, "source {:?}", source);
    assert_eq!(tokens[0].text, text, "source {:?}", source);
}

// Keyword rules only apply on a word boundary; a longer word is one
// identifier, never a keyword plus a tail.
#[rstest]
#[case("Nat")]
#[case("Zero")]
#[case("Ruler")]
#[case("Optimal")]
#[case("Minute")]
#[case("Maximal")]
#[case("Lengthy")]
#[case("truely")]
#[case("falsehood")]
fn test_keyword_boundary(#[case] source: &str) {
    let tokens = tokenize(source);
    assert_eq!(tokens[0].kind, TokenKind::Identifier, "source {:?}", source);
    assert_eq!(tokens[0].text, source);
}

#[rstest]
#[case("/", TokenKind::Division, TokenCategory::Operator)]
#[case("// note", TokenKind::Comment, TokenCategory::Special)]
fn test_slash_disambiguation(
    #[case] source: &str,
    #[case] kind: TokenKind,
    #[case] category: TokenCategory,
) {
    let tokens = tokenize(source);
    assert_eq!(tokens[0].kind, kind);
    assert_eq!(tokens[0].category, category);
}

#[test]
fn test_range_is_two_periods() {
    let tokens = tokenize("1..5");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::UnsignedNumber,
            TokenKind::Period,
            TokenKind::Period,
            TokenKind::UnsignedNumber,
            TokenKind::Newline,
        ]
    );
}
