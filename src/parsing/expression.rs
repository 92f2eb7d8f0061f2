//! Expression and statement trees
//!
//! A closed sum type over every expression shape the language recognizes,
//! plus the four top-level statement forms. Each node owns its children
//! exclusively (a tree, never a graph) and every node keeps the originating
//! token(s) so diagnostics stay positioned. Children are fully built before
//! their parent is constructed; there is no partially-initialized node
//! state.
//!
//! Rendering back to source-like text is a single exhaustive match in the
//! `Display` impls, so adding a node shape fails to compile until every
//! consumer handles it.

use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An expression tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// A literal or identifier leaf.
    Operand(Token),
    /// Left and right sub-expressions joined by a binary operator token.
    Binary {
        left: Box<Expression>,
        op: Token,
        right: Box<Expression>,
    },
    /// A parenthesized sub-expression.
    Parenthesis(Box<Expression>),
    /// Indexed list access: `xs[i]`.
    ListIndex {
        identifier: Token,
        index: Box<Expression>,
    },
    /// List length access: `xs.Length`.
    Length { identifier: Token },
    /// `Min(a, b)`.
    Min {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `Max(a, b)`.
    Max {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Bounded summation `∑(i=start..bound, body)`: the loop-variable
    /// initialization, the bound, and the body.
    Summation {
        init: Box<Expression>,
        bound: Box<Expression>,
        body: Box<Expression>,
    },
    /// `Opt(condition, counter)`.
    Optional {
        condition: Box<Expression>,
        counter: Box<Expression>,
    },
    /// A loop-variable or value initialization `name = value`.
    VariableInit {
        identifier: Token,
        value: Box<Expression>,
    },
    /// A list literal `{ e1, e2, ... }`.
    List(Vec<Expression>),
}

impl Expression {
    /// The source position of this node, taken from its leftmost token.
    pub fn position(&self) -> (usize, usize) {
        match self {
            Expression::Operand(t) => (t.line, t.column),
            Expression::Binary { left, .. } => left.position(),
            Expression::Parenthesis(inner) => inner.position(),
            Expression::ListIndex { identifier, .. } => (identifier.line, identifier.column),
            Expression::Length { identifier } => (identifier.line, identifier.column),
            Expression::Min { left, .. } => left.position(),
            Expression::Max { left, .. } => left.position(),
            Expression::Summation { init, .. } => init.position(),
            Expression::Optional { condition, .. } => condition.position(),
            Expression::VariableInit { identifier, .. } => (identifier.line, identifier.column),
            Expression::List(elements) => elements
                .first()
                .map(|e| e.position())
                .unwrap_or((0, 0)),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Operand(t) => f.write_str(&t.text),
            Expression::Binary { left, op, right } => {
                write!(f, "{} {} {}", left, op.text, right)
            }
            Expression::Parenthesis(inner) => write!(f, "({})", inner),
            Expression::ListIndex { identifier, index } => {
                write!(f, "{}[{}]", identifier.text, index)
            }
            Expression::Length { identifier } => write!(f, "{}.Length", identifier.text),
            Expression::Min { left, right } => write!(f, "Min({}, {})", left, right),
            Expression::Max { left, right } => write!(f, "Max({}, {})", left, right),
            Expression::Summation { init, bound, body } => {
                write!(f, "∑({}..{}, {})", init, bound, body)
            }
            Expression::Optional { condition, counter } => {
                write!(f, "Opt({}, {})", condition, counter)
            }
            Expression::VariableInit { identifier, value } => {
                write!(f, "{} = {}", identifier.text, value)
            }
            Expression::List(elements) => {
                f.write_str("{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A top-level statement of one of the four sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// StateSpace: `name : Type;` or `name : Type[];`
    VariableDeclaration {
        identifier: Token,
        declared_type: Token,
        is_list: bool,
    },
    /// Input: `name = value;`
    VariableInitialization {
        identifier: Token,
        value: Expression,
    },
    /// Precondition: a bare condition row.
    PreconditionDeclaration { condition: Expression },
    /// Postcondition: `condition → init, init, ...`
    PostconditionImplication {
        condition: Expression,
        initializations: Vec<Statement>,
    },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::VariableDeclaration {
                identifier,
                declared_type,
                is_list,
            } => {
                let suffix = if *is_list { "[]" } else { "" };
                write!(f, "{}:{}{};", identifier.text, declared_type.text, suffix)
            }
            Statement::VariableInitialization { identifier, value } => {
                write!(f, "{} = {};", identifier.text, value)
            }
            Statement::PreconditionDeclaration { condition } => write!(f, "{}", condition),
            Statement::PostconditionImplication {
                condition,
                initializations,
            } => {
                write!(f, "{}", condition)?;
                if !initializations.is_empty() {
                    f.write_str(" → ")?;
                    for (i, init) in initializations.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        match init {
                            Statement::VariableInitialization { identifier, value } => {
                                write!(f, "{} = {}", identifier.text, value)?;
                            }
                            other => write!(f, "{}", other)?,
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TokenCategory, TokenKind};

    fn ident(text: &str) -> Token {
        Token::new(TokenKind::Identifier, TokenCategory::Identifier, text, 1, 1)
    }

    fn number(text: &str) -> Token {
        Token::new(TokenKind::UnsignedNumber, TokenCategory::Literal, text, 1, 1)
    }

    #[test]
    fn test_display_round_trip_shapes() {
        let expr = Expression::Binary {
            left: Box::new(Expression::Operand(ident("n"))),
            op: Token::new(TokenKind::Addition, TokenCategory::Operator, "+", 1, 2),
            right: Box::new(Expression::Parenthesis(Box::new(Expression::Operand(
                number("2"),
            )))),
        };
        assert_eq!(expr.to_string(), "n + (2)");
    }

    #[test]
    fn test_display_list() {
        let list = Expression::List(vec![
            Expression::Operand(number("1")),
            Expression::Operand(number("2")),
        ]);
        assert_eq!(list.to_string(), "{1, 2}");
    }

    #[test]
    fn test_position_comes_from_leftmost_token() {
        let token = Token::new(
            TokenKind::Identifier,
            TokenCategory::Identifier,
            "xs",
            4,
            9,
        );
        let expr = Expression::Length { identifier: token };
        assert_eq!(expr.position(), (4, 9));
    }

    #[test]
    fn test_statement_display() {
        let declaration = Statement::VariableDeclaration {
            identifier: ident("xs"),
            declared_type: Token::new(TokenKind::Real, TokenCategory::Keyword, "R", 1, 4),
            is_list: true,
        };
        assert_eq!(declaration.to_string(), "xs:R[];");
    }
}
