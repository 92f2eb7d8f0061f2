//! Recursive-descent expression engine
//!
//! `parse_expression` dispatches structurally on the leading tokens of a
//! span, trying the special forms in a fixed order before the generic
//! operand-operator-remainder fallback:
//!
//!     1. `( ... )`            parenthesized sub-expression
//!     2. single token         operand leaf
//!     3. `xs[ ... ]`          indexed list access
//!     4. `∑( ... , ... )`     bounded summation
//!     5. `Opt( ... , ... )`   optional/choice form
//!     6. `xs.Length`          list length
//!     7. `Min( ... )` / `Max( ... )`
//!     8. operand operator rest
//!
//! The right-hand side of a binary expression re-enters a restricted subset
//! of this dispatch (1-3, 7, 8): summation, `Opt` and `.Length` are only
//! recognized at the left-most position of a span. That asymmetry is part of
//! the grammar, not an implementation accident.
//!
//! Every function returns `Result`; the first shape violation aborts the
//! span's parse, because token indices downstream of a failed shape
//! assumption are meaningless.

use crate::diagnostics::{codes, Diagnostic};
use crate::parsing::expression::Expression;
use crate::token::{Token, TokenKind};

/// Parse a non-empty token span as an expression, full dispatch.
pub fn parse_expression(tokens: &[Token]) -> Result<Expression, Diagnostic> {
    parse_span(tokens, true)
}

fn parse_span(tokens: &[Token], leftmost: bool) -> Result<Expression, Diagnostic> {
    let Some(first) = tokens.first() else {
        // Callers are contracted to pass a non-empty span.
        return Err(Diagnostic::error(
            codes::INTERNAL_COMPILE_ERROR,
            "empty expression span",
            0,
            0,
        ));
    };

    // 1. Parenthesized sub-expression.
    if first.kind == TokenKind::OpenParen {
        let close = find_matching(tokens, 0, TokenKind::OpenParen, TokenKind::CloseParen)
            .ok_or_else(|| {
                Diagnostic::error(
                    codes::UNBALANCED_PARENTHESIS,
                    format!(
                        "parenthesis opened at {}:{} is never closed",
                        first.line, first.column
                    ),
                    first.line,
                    first.column,
                )
            })?;
        let interior = &tokens[1..close];
        if interior.is_empty() {
            return Err(Diagnostic::error(
                codes::EMPTY_PARENTHESIS,
                format!("empty parentheses at {}:{}", first.line, first.column),
                first.line,
                first.column,
            ));
        }
        let inner = parse_span(interior, true)?;
        let node = Expression::Parenthesis(Box::new(inner));
        return continue_binary(node, &tokens[close + 1..]);
    }

    // 2. Single remaining token: an operand leaf.
    if tokens.len() == 1 {
        return if first.is_operand() {
            Ok(Expression::Operand(first.clone()))
        } else {
            Err(Diagnostic::unexpected_token(first, "a literal or identifier"))
        };
    }

    // 3. Indexed list access.
    if first.kind == TokenKind::Identifier && tokens[1].kind == TokenKind::OpenBracket {
        let close = find_matching(tokens, 1, TokenKind::OpenBracket, TokenKind::CloseBracket)
            .ok_or_else(|| Diagnostic::unexpected_token(&tokens[1], "a closing ']'"))?;
        let interior = &tokens[2..close];
        if interior.is_empty() {
            return Err(Diagnostic::unexpected_token(
                &tokens[close],
                "an index expression",
            ));
        }
        let index = parse_span(interior, true)?;
        let node = Expression::ListIndex {
            identifier: first.clone(),
            index: Box::new(index),
        };
        return continue_binary(node, &tokens[close + 1..]);
    }

    if leftmost {
        // 4. Bounded summation.
        if first.kind == TokenKind::Summation {
            let (left, right, close) = parse_call_shape(tokens)?;
            let (init, bound) = parse_loop_clause(left)?;
            let body = parse_span(right, true)?;
            let node = Expression::Summation {
                init: Box::new(init),
                bound: Box::new(bound),
                body: Box::new(body),
            };
            return continue_binary(node, &tokens[close + 1..]);
        }

        // 5. Optional/choice form: must close the remaining span.
        if first.kind == TokenKind::Optional {
            let (left, right, close) = parse_call_shape(tokens)?;
            if close + 1 != tokens.len() {
                return Err(Diagnostic::unexpected_token(
                    &tokens[close + 1],
                    "end of the Opt(...) form",
                ));
            }
            let condition = parse_span(left, true)?;
            let counter = parse_span(right, true)?;
            return Ok(Expression::Optional {
                condition: Box::new(condition),
                counter: Box::new(counter),
            });
        }

        // 6. List length access.
        if tokens.len() >= 3
            && first.kind == TokenKind::Identifier
            && tokens[1].kind == TokenKind::Period
            && tokens[2].kind == TokenKind::Length
        {
            let node = Expression::Length {
                identifier: first.clone(),
            };
            return continue_binary(node, &tokens[3..]);
        }
    }

    // 7. Min / Max.
    if matches!(first.kind, TokenKind::Minimum | TokenKind::Maximum) {
        let (left, right, close) = parse_call_shape(tokens)?;
        let left = parse_span(left, true)?;
        let right = parse_span(right, true)?;
        let node = if first.kind == TokenKind::Minimum {
            Expression::Min {
                left: Box::new(left),
                right: Box::new(right),
            }
        } else {
            Expression::Max {
                left: Box::new(left),
                right: Box::new(right),
            }
        };
        return continue_binary(node, &tokens[close + 1..]);
    }

    // 8. Fallback: operand, operator, remainder.
    if !first.is_operand() {
        return Err(Diagnostic::unexpected_token(first, "a literal or identifier"));
    }
    if !tokens[1].is_operator() {
        return Err(Diagnostic::unexpected_token(&tokens[1], "an operator"));
    }
    let rest = &tokens[2..];
    if rest.is_empty() {
        return Err(Diagnostic::unexpected_token(
            &tokens[1],
            "an expression after the operator",
        ));
    }
    Ok(Expression::Binary {
        left: Box::new(Expression::Operand(first.clone())),
        op: tokens[1].clone(),
        right: Box::new(parse_span(rest, false)?),
    })
}

/// Attach a binary continuation when an operator follows a completed node.
fn continue_binary(node: Expression, rest: &[Token]) -> Result<Expression, Diagnostic> {
    let Some(next) = rest.first() else {
        return Ok(node);
    };
    if !next.is_operator() {
        return Err(Diagnostic::unexpected_token(next, "an operator"));
    }
    let remainder = &rest[1..];
    if remainder.is_empty() {
        return Err(Diagnostic::unexpected_token(
            next,
            "an expression after the operator",
        ));
    }
    Ok(Expression::Binary {
        left: Box::new(node),
        op: next.clone(),
        right: Box::new(parse_span(remainder, false)?),
    })
}

/// Parse the `Kw(left, right)` call shape shared by summation, `Opt`, `Min`
/// and `Max`. Returns the two argument spans and the index of the closing
/// parenthesis. `tokens[0]` is the keyword.
fn parse_call_shape(tokens: &[Token]) -> Result<(&[Token], &[Token], usize), Diagnostic> {
    let keyword = &tokens[0];
    match tokens.get(1) {
        Some(t) if t.kind == TokenKind::OpenParen => {}
        Some(t) => {
            return Err(Diagnostic::error(
                codes::EXPECTED_OPEN_PAREN,
                format!(
                    "expected '(' after '{}' at {}:{}, found '{}'",
                    keyword.text, t.line, t.column, t.text
                ),
                t.line,
                t.column,
            ))
        }
        None => {
            return Err(Diagnostic::error(
                codes::EXPECTED_OPEN_PAREN,
                format!(
                    "expected '(' after '{}' at {}:{}",
                    keyword.text, keyword.line, keyword.column
                ),
                keyword.line,
                keyword.column,
            ))
        }
    }

    let close = find_matching(tokens, 1, TokenKind::OpenParen, TokenKind::CloseParen)
        .ok_or_else(|| {
            Diagnostic::error(
                codes::EXPECTED_CLOSE_PAREN,
                format!(
                    "call to '{}' at {}:{} is never closed",
                    keyword.text, keyword.line, keyword.column
                ),
                keyword.line,
                keyword.column,
            )
        })?;

    let interior = &tokens[2..close];
    let comma = find_top_level(interior, TokenKind::Comma).ok_or_else(|| {
        Diagnostic::error(
            codes::EXPECTED_COMMA,
            format!(
                "expected ',' between the arguments of '{}' at {}:{}",
                keyword.text, keyword.line, keyword.column
            ),
            keyword.line,
            keyword.column,
        )
    })?;

    let left = &interior[..comma];
    let right = &interior[comma + 1..];
    if left.is_empty() {
        return Err(Diagnostic::unexpected_token(
            &interior[comma],
            "a first argument",
        ));
    }
    if right.is_empty() {
        return Err(Diagnostic::unexpected_token(
            &tokens[close],
            "a second argument",
        ));
    }
    Ok((left, right, close))
}

/// Parse a summation loop clause `var = start..bound` into the loop-variable
/// initialization and the bound expression.
fn parse_loop_clause(tokens: &[Token]) -> Result<(Expression, Expression), Diagnostic> {
    let first = &tokens[0];
    if first.kind != TokenKind::Identifier {
        return Err(Diagnostic::unexpected_token(first, "a loop variable"));
    }
    match tokens.get(1) {
        Some(t) if t.kind == TokenKind::Assign => {}
        Some(t) => return Err(Diagnostic::unexpected_token(t, "'='")),
        None => return Err(Diagnostic::unexpected_token(first, "'=' after the loop variable")),
    }

    let body = &tokens[2..];
    // The range is written with two consecutive periods: `1..n`.
    let dots = (0..body.len().saturating_sub(1)).find(|&i| {
        body[i].kind == TokenKind::Period && body[i + 1].kind == TokenKind::Period
    });
    let Some(dots) = dots else {
        let at = body.last().unwrap_or(first);
        return Err(Diagnostic::unexpected_token(at, "'..' in the loop range"));
    };

    let start = &body[..dots];
    let bound = &body[dots + 2..];
    if start.is_empty() {
        return Err(Diagnostic::unexpected_token(&body[dots], "a range start"));
    }
    if bound.is_empty() {
        return Err(Diagnostic::unexpected_token(
            &body[dots + 1],
            "a range bound",
        ));
    }

    let init = Expression::VariableInit {
        identifier: first.clone(),
        value: Box::new(parse_span(start, true)?),
    };
    let bound = parse_span(bound, true)?;
    Ok((init, bound))
}

/// Parse a list literal `{ e1, e2, ... }` spanning the whole token slice.
/// Repeated commas are recoverable (warning); an empty leading or trailing
/// element and a missing closing brace are not.
pub fn parse_list(
    tokens: &[Token],
    warnings: &mut Vec<Diagnostic>,
) -> Result<Expression, Diagnostic> {
    let first = &tokens[0];
    debug_assert_eq!(first.kind, TokenKind::OpenBrace);

    let close = find_matching(tokens, 0, TokenKind::OpenBrace, TokenKind::CloseBrace)
        .ok_or_else(|| {
            Diagnostic::error(
                codes::MISSING_CLOSING_BRACE,
                format!(
                    "list opened at {}:{} is never closed",
                    first.line, first.column
                ),
                first.line,
                first.column,
            )
        })?;
    if close + 1 != tokens.len() {
        return Err(Diagnostic::unexpected_token(
            &tokens[close + 1],
            "end of the list literal",
        ));
    }

    let interior = &tokens[1..close];
    if interior.is_empty() {
        return Ok(Expression::List(Vec::new()));
    }

    let mut elements = Vec::new();
    let mut span_start = 0usize;
    let mut depth = 0usize;
    let mut span_index = 0usize;
    let mut cursor = 0usize;
    while cursor <= interior.len() {
        let at_comma = cursor < interior.len()
            && depth == 0
            && interior[cursor].kind == TokenKind::Comma;
        let at_end = cursor == interior.len();
        if at_comma || at_end {
            let span = &interior[span_start..cursor];
            if span.is_empty() {
                let position = interior.get(cursor).unwrap_or(&tokens[close]);
                if span_index > 0 && at_comma {
                    // `{1,,2}`: repeated separator, recoverable.
                    warnings.push(Diagnostic::warning(
                        codes::DUPLICATE_COMMA,
                        format!(
                            "repeated ',' at {}:{} in list literal",
                            position.line, position.column
                        ),
                        position.line,
                        position.column,
                    ));
                } else {
                    // `{,1}` or `{1,}`: a missing element.
                    return Err(Diagnostic::error(
                        codes::EMPTY_LIST_ELEMENT,
                        format!(
                            "empty list element at {}:{}",
                            position.line, position.column
                        ),
                        position.line,
                        position.column,
                    ));
                }
            } else {
                elements.push(parse_span(span, true)?);
            }
            span_start = cursor + 1;
            span_index += 1;
            if at_end {
                break;
            }
        } else {
            match interior[cursor].kind {
                TokenKind::OpenParen | TokenKind::OpenBrace | TokenKind::OpenBracket => {
                    depth += 1
                }
                TokenKind::CloseParen | TokenKind::CloseBrace | TokenKind::CloseBracket => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
        }
        cursor += 1;
    }

    Ok(Expression::List(elements))
}

/// Parse a type specifier: a type keyword with at most one `[]` suffix.
/// Returns the type token and the list flag.
pub fn parse_type(tokens: &[Token]) -> Result<(Token, bool), Diagnostic> {
    let Some(first) = tokens.first() else {
        return Err(Diagnostic::error(
            codes::INTERNAL_COMPILE_ERROR,
            "empty type specifier span",
            0,
            0,
        ));
    };
    if !first.kind.is_type_keyword() {
        return Err(Diagnostic::error(
            codes::UNEXPECTED_TOKEN_IN_TYPE,
            format!(
                "expected a type keyword at {}:{}, found '{}'",
                first.line,
                first.column,
                first.text.escape_default()
            ),
            first.line,
            first.column,
        ));
    }
    let mut is_list = false;
    for token in &tokens[1..] {
        if token.kind == TokenKind::ListSpecifier {
            if is_list {
                return Err(Diagnostic::error(
                    codes::MULTIPLE_LIST_SPECIFIERS,
                    format!(
                        "second list specifier at {}:{}",
                        token.line, token.column
                    ),
                    token.line,
                    token.column,
                ));
            }
            is_list = true;
        } else {
            return Err(Diagnostic::error(
                codes::UNEXPECTED_TOKEN_IN_TYPE,
                format!(
                    "unexpected '{}' at {}:{} in type specifier",
                    token.text.escape_default(),
                    token.line,
                    token.column
                ),
                token.line,
                token.column,
            ));
        }
    }
    Ok((first.clone(), is_list))
}

/// Index of the token matching the opener at `open`, scanning by depth.
fn find_matching(
    tokens: &[Token],
    open: usize,
    open_kind: TokenKind,
    close_kind: TokenKind,
) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.kind == open_kind {
            depth += 1;
        } else if token.kind == close_kind {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Index of the first `kind` token at delimiter depth zero.
fn find_top_level(tokens: &[Token], kind: TokenKind) -> Option<usize> {
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
