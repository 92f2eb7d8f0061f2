//! Syntax analyzer: per-section statement parsing
//!
//! Drives the expression engine over each section's token group. A section
//! is first segmented into newline-delimited rows (trivia dropped), rows are
//! split on top-level semicolons, and each segment is parsed into the
//! statement form its section allows:
//!
//!     StateSpace      name : Type;   /  name : Type[];
//!     Input           name = value;
//!     Precondition    condition
//!     Postcondition   condition → name = value, name = value
//!
//! A shape violation aborts that segment's parse (its token indices are
//! meaningless once an assumption fails), the diagnostic is recorded, and
//! parsing continues with the next segment.

pub mod engine;
pub mod expression;

pub use engine::{parse_expression, parse_list, parse_type};
pub use expression::{Expression, Statement};

use crate::diagnostics::Diagnostic;
use crate::lexing::Section;
use crate::token::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of syntax analysis: per-section statement lists plus diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserResult {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub sections: BTreeMap<Section, Vec<Statement>>,
    pub success: bool,
}

/// The per-compilation syntax analyzer. Owns its diagnostics; `analyze`
/// consumes it.
pub struct SyntaxAnalyzer {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl SyntaxAnalyzer {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Parse every section's token group into statements.
    pub fn analyze(mut self, sections: &BTreeMap<Section, Vec<Token>>) -> ParserResult {
        let mut parsed = BTreeMap::new();
        for (&section, tokens) in sections {
            let statements = self.parse_section(section, tokens);
            parsed.insert(section, statements);
        }
        let success = self.errors.is_empty();
        ParserResult {
            errors: self.errors,
            warnings: self.warnings,
            sections: parsed,
            success,
        }
    }

    fn parse_section(&mut self, section: Section, tokens: &[Token]) -> Vec<Statement> {
        let mut statements = Vec::new();
        for row in rows(tokens) {
            match section {
                Section::StateSpace | Section::Input => {
                    for segment in split_statements(&row) {
                        let result = match section {
                            Section::StateSpace => self.parse_declaration(segment),
                            _ => self.parse_initialization(segment).map(
                                |(identifier, value)| Statement::VariableInitialization {
                                    identifier,
                                    value,
                                },
                            ),
                        };
                        match result {
                            Ok(statement) => statements.push(statement),
                            Err(diagnostic) => self.errors.push(diagnostic),
                        }
                    }
                }
                Section::Precondition => match self.parse_precondition(&row) {
                    Ok(statement) => statements.push(statement),
                    Err(diagnostic) => self.errors.push(diagnostic),
                },
                Section::Postcondition => match self.parse_postcondition(&row) {
                    Ok(statement) => statements.push(statement),
                    Err(diagnostic) => self.errors.push(diagnostic),
                },
            }
        }
        statements
    }

    /// `name : Type;` — the row splitter has already consumed the semicolon.
    fn parse_declaration(&mut self, tokens: &[Token]) -> Result<Statement, Diagnostic> {
        let identifier = expect_kind(tokens, 0, TokenKind::Identifier, "an identifier")?;
        let colon = expect_kind(tokens, 1, TokenKind::Colon, "':'")?;
        if tokens.len() < 3 {
            return Err(Diagnostic::unexpected_token(&colon, "a type"));
        }
        let (declared_type, is_list) = parse_type(&tokens[2..])?;
        Ok(Statement::VariableDeclaration {
            identifier,
            declared_type,
            is_list,
        })
    }

    /// `name = value;` — the value is a list literal or an expression.
    fn parse_initialization(
        &mut self,
        tokens: &[Token],
    ) -> Result<(Token, Expression), Diagnostic> {
        let identifier = expect_kind(tokens, 0, TokenKind::Identifier, "an identifier")?;
        let assign = expect_kind(tokens, 1, TokenKind::Assign, "'='")?;
        let value = &tokens[2..];
        if value.is_empty() {
            return Err(Diagnostic::unexpected_token(
                &assign,
                "a value after '='",
            ));
        }
        let value = if value[0].kind == TokenKind::OpenBrace {
            parse_list(value, &mut self.warnings)?
        } else {
            parse_expression(value)?
        };
        Ok((identifier, value))
    }

    fn parse_precondition(&mut self, row: &[Token]) -> Result<Statement, Diagnostic> {
        let condition = strip_terminator(row);
        if condition.is_empty() {
            return Err(Diagnostic::unexpected_token(&row[0], "a condition"));
        }
        Ok(Statement::PreconditionDeclaration {
            condition: parse_expression(condition)?,
        })
    }

    /// `condition → init, init, ...`; a row without the arrow is a bare
    /// condition with no initializations.
    fn parse_postcondition(&mut self, row: &[Token]) -> Result<Statement, Diagnostic> {
        let row = strip_terminator(row);
        if row.is_empty() {
            return Err(Diagnostic::error(
                crate::diagnostics::codes::INTERNAL_COMPILE_ERROR,
                "empty postcondition row",
                0,
                0,
            ));
        }
        let arrow = find_top_level_kind(row, TokenKind::Implication);
        let Some(arrow) = arrow else {
            return Ok(Statement::PostconditionImplication {
                condition: parse_expression(row)?,
                initializations: Vec::new(),
            });
        };

        let condition_span = &row[..arrow];
        if condition_span.is_empty() {
            return Err(Diagnostic::unexpected_token(&row[arrow], "a condition"));
        }
        let body = &row[arrow + 1..];
        if body.is_empty() {
            return Err(Diagnostic::unexpected_token(
                &row[arrow],
                "initializations after '→'",
            ));
        }

        let condition = parse_expression(condition_span)?;
        let mut initializations = Vec::new();
        for segment in split_on_top_level(body, TokenKind::Comma) {
            if segment.is_empty() {
                return Err(Diagnostic::unexpected_token(
                    &row[arrow],
                    "an initialization between commas",
                ));
            }
            let (identifier, value) = self.parse_initialization(segment)?;
            initializations.push(Statement::VariableInitialization { identifier, value });
        }
        Ok(Statement::PostconditionImplication {
            condition,
            initializations,
        })
    }
}

impl Default for SyntaxAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Segment a section's tokens into newline-delimited rows, dropping trivia.
/// Empty rows disappear.
fn rows(tokens: &[Token]) -> Vec<Vec<Token>> {
    let mut rows = Vec::new();
    let mut current = Vec::new();
    for token in tokens {
        if token.kind == TokenKind::Newline {
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
        } else if !token.is_trivia() {
            current.push(token.clone());
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

/// Split a row into `;`-terminated statement segments. Every segment must
/// be terminated; the terminator itself is consumed.
fn split_statements(row: &[Token]) -> Vec<&[Token]> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    for (i, token) in row.iter().enumerate() {
        if token.kind == TokenKind::Semicolon {
            segments.push(&row[start..i]);
            start = i + 1;
        }
    }
    if start < row.len() {
        // Unterminated tail: keep it so the segment parser positions the
        // diagnostic on its tokens.
        segments.push(&row[start..]);
    }
    segments.retain(|s| !s.is_empty());
    segments
}

/// Drop one trailing semicolon from a condition row, when present.
fn strip_terminator(row: &[Token]) -> &[Token] {
    match row.last() {
        Some(t) if t.kind == TokenKind::Semicolon => &row[..row.len() - 1],
        _ => row,
    }
}

fn split_on_top_level(tokens: &[Token], kind: TokenKind) -> Vec<&[Token]> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::OpenParen | TokenKind::OpenBrace | TokenKind::OpenBracket => depth += 1,
            TokenKind::CloseParen | TokenKind::CloseBrace | TokenKind::CloseBracket => {
                depth = depth.saturating_sub(1)
            }
            k if k == kind && depth == 0 => {
                segments.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&tokens[start..]);
    segments
}

fn find_top_level_kind(tokens: &[Token], kind: TokenKind) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::OpenParen | TokenKind::OpenBrace | TokenKind::OpenBracket => depth += 1,
            TokenKind::CloseParen | TokenKind::CloseBrace | TokenKind::CloseBracket => {
                depth = depth.saturating_sub(1)
            }
            k if k == kind && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Fetch `tokens[index]` and require its kind, with a positioned diagnostic
/// naming what was expected.
fn expect_kind(
    tokens: &[Token],
    index: usize,
    kind: TokenKind,
    expected: &str,
) -> Result<Token, Diagnostic> {
    match tokens.get(index) {
        Some(token) if token.kind == kind => Ok(token.clone()),
        Some(token) => Err(Diagnostic::unexpected_token(token, expected)),
        None => {
            let at = tokens.last().or_else(|| tokens.first());
            match at {
                Some(token) => Err(Diagnostic::unexpected_token(token, expected)),
                None => Err(Diagnostic::error(
                    crate::diagnostics::codes::UNEXPECTED_TOKEN,
                    format!("expected {}", expected),
                    0,
                    0,
                )),
            }
        }
    }
}
