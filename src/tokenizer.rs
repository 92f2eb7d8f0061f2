//! Tokenizer for StateSpec source text
//!
//! Consumes raw text one physical line at a time and applies the grammar
//! table at each scan position: the first rule in table order that matches
//! wins, taking that rule's longest match. Characters no rule matches become
//! `Unknown` tokens so the scan always advances; deciding whether an unknown
//! character is fatal is the lexical analyzer's job.
//!
//! Positions are 1-based. Columns count characters, not bytes, so the
//! non-ASCII operators (`∑`, `→`, ...) occupy a single column.
//!
//! End-of-line handling: the last token of every non-empty line becomes a
//! `Newline` token with text `"\n"`. Trailing whitespace is retagged in
//! place; a line that ends in any other token gets a `Newline` appended.

use crate::grammar::GRAMMAR;
use crate::token::{Token, TokenCategory, TokenKind};

/// Tokenize a complete source text into a flat token stream.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (index, line) in source.split('\n').enumerate() {
        tokenize_line(line, index + 1, &mut tokens);
    }
    tokens
}

/// Scan one physical line, appending its tokens (newline marker included).
fn tokenize_line(line: &str, line_number: usize, tokens: &mut Vec<Token>) {
    let start = tokens.len();
    let mut offset = 0usize; // bytes into `line`
    let mut column = 1usize; // 1-based chars into `line`

    while offset < line.len() {
        let rest = &line[offset..];
        let matched = GRAMMAR
            .iter()
            .find_map(|rule| rule.try_match(rest).map(|len| (rule, len)));

        match matched {
            Some((rule, len)) => {
                let raw = &rest[..len];
                tokens.push(normalize(rule.kind, rule.category, raw, line_number, column));
                offset += len;
                column += raw.chars().count();
            }
            None => {
                // No rule matched: consume exactly one character as Unknown.
                let c = rest.chars().next().expect("offset < line.len()");
                tokens.push(Token::new(
                    TokenKind::Unknown,
                    TokenCategory::Special,
                    c.to_string(),
                    line_number,
                    column,
                ));
                offset += c.len_utf8();
                column += 1;
            }
        }
    }

    // Communicate the line boundary downstream: retag trailing whitespace,
    // otherwise append a fresh marker. Empty lines produce no tokens.
    if tokens.len() > start {
        let last = tokens.last_mut().expect("non-empty line");
        if last.kind == TokenKind::Whitespace {
            last.kind = TokenKind::Newline;
            last.text = "\n".to_string();
        } else {
            tokens.push(Token::new(
                TokenKind::Newline,
                TokenCategory::Special,
                "\n",
                line_number,
                column,
            ));
        }
    }
}

/// Post-match normalization: strip comment and macro markers, strip literal
/// quotes, and decide bare macro header vs inline macro definition.
fn normalize(
    kind: TokenKind,
    category: TokenCategory,
    raw: &str,
    line: usize,
    column: usize,
) -> Token {
    match kind {
        TokenKind::Comment => {
            let body = raw.trim_start_matches("//").trim_end_matches(['\r', '\n']);
            Token::new(kind, category, body, line, column)
        }
        TokenKind::Macro => {
            let rest = raw.trim_start_matches('#').trim_end_matches(['\r', '\n']);
            let rest = rest.trim_end();
            if rest.split_whitespace().nth(1).is_some() {
                Token::new(TokenKind::MacroValue, category, rest, line, column)
            } else {
                Token::new(TokenKind::Macro, category, rest, line, column)
            }
        }
        TokenKind::TextValue => {
            Token::new(kind, category, raw.trim_matches('"'), line, column)
        }
        TokenKind::CharacterValue => {
            Token::new(kind, category, raw.trim_matches('\''), line, column)
        }
        _ => Token::new(kind, category, raw, line, column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn significant(tokens: &[Token]) -> Vec<&Token> {
        tokens
            .iter()
            .filter(|t| {
                !matches!(t.kind, TokenKind::Whitespace | TokenKind::Newline)
            })
            .collect()
    }

    #[test]
    fn test_declaration_line() {
        let tokens = tokenize("_variable:N = -0.23");
        let sig = significant(&tokens);
        let expected = [
            (TokenKind::Identifier, "_variable", 1, 1),
            (TokenKind::Colon, ":", 1, 10),
            (TokenKind::Natural, "N", 1, 11),
            (TokenKind::Assign, "=", 1, 13),
            (TokenKind::Double, "-0.23", 1, 15),
        ];
        assert_eq!(sig.len(), expected.len());
        for (token, (kind, text, line, column)) in sig.iter().zip(expected) {
            assert_eq!(token.kind, kind);
            assert_eq!(token.text, text);
            assert_eq!((token.line, token.column), (line, column));
        }
    }

    #[test]
    fn test_unknown_character_recovery() {
        let tokens = tokenize("@N;R[]");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Unknown,
                TokenKind::Natural,
                TokenKind::Semicolon,
                TokenKind::Real,
                TokenKind::ListSpecifier,
                TokenKind::Newline,
            ]
        );
        let unknowns: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Unknown)
            .collect();
        assert_eq!(unknowns.len(), 1);
        assert_eq!(unknowns[0].text, "@");
    }

    #[test]
    fn test_every_nonempty_line_ends_with_newline() {
        let tokens = tokenize("a:N;\nb:Z;");
        let newlines: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Newline)
            .collect();
        assert_eq!(newlines.len(), 2);
        assert!(newlines.iter().all(|t| t.text == "\n"));
    }

    #[test]
    fn test_trailing_whitespace_is_retagged() {
        let tokens = tokenize("a:N;   ");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Newline);
        assert_eq!(last.text, "\n");
        // Retagged in place, not appended.
        assert_eq!(
            tokens
                .iter()
                .filter(|t| t.kind == TokenKind::Newline)
                .count(),
            1
        );
    }

    #[test]
    fn test_empty_lines_produce_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\n").is_empty());
    }

    #[test]
    fn test_macro_marker_normalization() {
        let tokens = tokenize("#StateSpace");
        assert_eq!(tokens[0].kind, TokenKind::Macro);
        assert_eq!(tokens[0].text, "StateSpace");
    }

    #[test]
    fn test_inline_macro_definition() {
        let tokens = tokenize("#Limit 100");
        assert_eq!(tokens[0].kind, TokenKind::MacroValue);
        assert_eq!(tokens[0].text, "Limit 100");
    }

    #[test]
    fn test_comment_strips_marker() {
        let tokens = tokenize("// a note\r");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, " a note");
    }

    #[test]
    fn test_literal_quotes_stripped() {
        let tokens = tokenize(r#"s = "abc""#);
        let text = tokens
            .iter()
            .find(|t| t.kind == TokenKind::TextValue)
            .unwrap();
        assert_eq!(text.text, "abc");

        let tokens = tokenize("c = 'x'");
        let ch = tokens
            .iter()
            .find(|t| t.kind == TokenKind::CharacterValue)
            .unwrap();
        assert_eq!(ch.text, "x");
    }

    #[test]
    fn test_non_ascii_operator_columns() {
        let tokens = tokenize("a∧b");
        let sig = significant(&tokens);
        assert_eq!(sig[0].column, 1);
        assert_eq!(sig[1].kind, TokenKind::And);
        assert_eq!(sig[1].column, 2);
        assert_eq!(sig[2].column, 3);
    }

    #[test]
    fn test_summation_range_tokens() {
        let tokens = tokenize("∑(i=1..n, i)");
        let kinds: Vec<TokenKind> = significant(&tokens).iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Summation,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::UnsignedNumber,
                TokenKind::Period,
                TokenKind::Period,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::CloseParen,
            ]
        );
    }
}
