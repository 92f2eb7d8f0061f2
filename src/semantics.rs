//! Semantic analyzer: symbol table construction and validation
//!
//! Consumes the per-section statement lists and builds the symbol table:
//!
//! - StateSpace declarations create symbols, after the identifier naming
//!   rule is checked; the table rejects duplicate names.
//! - Input initializations look the target symbol up, check each literal
//!   value against the declared type, and record the values on the symbol
//!   for code generation.
//! - Precondition and Postcondition statements are parsed but not yet
//!   semantically validated; their passes are deliberate no-ops until the
//!   validation rules for conditions are settled.
//!
//! Unlike the parser, this stage accumulates every diagnostic it can find
//! in one pass instead of stopping at the first.

use crate::diagnostics::{codes, Diagnostic};
use crate::lexing::Section;
use crate::parsing::{Expression, Statement};
use crate::symbol::{Symbol, SymbolTable};
use crate::token::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest identifier the language accepts.
const MAX_IDENTIFIER_LENGTH: usize = 511;

/// Result of semantic analysis: diagnostics plus the finished symbol table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticResult {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub symbol_table: SymbolTable,
    pub success: bool,
}

/// The per-compilation semantic analyzer; `analyze` consumes it.
pub struct SemanticAnalyzer {
    symbol_table: SymbolTable,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            symbol_table: SymbolTable::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn analyze(mut self, sections: &BTreeMap<Section, Vec<Statement>>) -> SemanticResult {
        if let Some(statements) = sections.get(&Section::StateSpace) {
            self.declare_state_space(statements);
        }
        if let Some(statements) = sections.get(&Section::Input) {
            self.record_inputs(statements);
        }
        // Precondition and Postcondition are intentionally not validated.

        let success = self.errors.is_empty();
        SemanticResult {
            errors: self.errors,
            warnings: self.warnings,
            symbol_table: self.symbol_table,
            success,
        }
    }

    fn declare_state_space(&mut self, statements: &[Statement]) {
        for statement in statements {
            let Statement::VariableDeclaration {
                identifier,
                declared_type,
                is_list,
            } = statement
            else {
                continue;
            };
            if !is_valid_identifier(&identifier.text) {
                self.errors.push(Diagnostic::error(
                    codes::INVALID_IDENTIFIER_NAME,
                    format!(
                        "invalid identifier '{}' at {}:{}: identifiers start with a lowercase \
                         letter or '_' and use letters, digits and '_'",
                        identifier.text.escape_default(),
                        identifier.line,
                        identifier.column
                    ),
                    identifier.line,
                    identifier.column,
                ));
                continue;
            }
            let symbol = Symbol::from_declaration(identifier, declared_type, *is_list);
            if let Err(diagnostic) = self.symbol_table.insert(symbol) {
                self.errors.push(diagnostic);
            }
        }
    }

    fn record_inputs(&mut self, statements: &[Statement]) {
        for statement in statements {
            let Statement::VariableInitialization { identifier, value } = statement else {
                continue;
            };
            let declared_type = self
                .symbol_table
                .get(&identifier.text)
                .map(|s| s.declared_type);
            let Some(declared_type) = declared_type else {
                self.errors.push(Diagnostic::error(
                    codes::UNDECLARED_SYMBOL,
                    format!(
                        "symbol '{}' at {}:{} is initialized but never declared",
                        identifier.text, identifier.line, identifier.column
                    ),
                    identifier.line,
                    identifier.column,
                ));
                continue;
            };

            let literals = literal_values(value);
            let mut compatible = Vec::new();
            for literal in literals {
                if type_matches(declared_type, literal.kind) {
                    compatible.push(literal.clone());
                } else {
                    self.errors.push(Diagnostic::error(
                        codes::TYPE_MISMATCH,
                        format!(
                            "value '{}' at {}:{} is not assignable to '{}' of type {:?}",
                            literal.text.escape_default(),
                            literal.line,
                            literal.column,
                            identifier.text,
                            declared_type
                        ),
                        literal.line,
                        literal.column,
                    ));
                }
            }
            if let Some(symbol) = self.symbol_table.get_mut(&identifier.text) {
                symbol.values.extend(compatible);
                symbol.initialized = true;
            }
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// The identifier naming rule: a lowercase letter or underscore, then
/// letters, digits and underscores, at most 511 characters total.
pub fn is_valid_identifier(name: &str) -> bool {
    if name.is_empty() || name.chars().count() > MAX_IDENTIFIER_LENGTH {
        return false;
    }
    let mut chars = name.chars();
    let first = chars.next().expect("non-empty");
    if !(first.is_ascii_lowercase() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Type-compatibility predicate: which literal token kind satisfies which
/// declared semantic type. Pure, no side effects; also used by future
/// section passes.
pub fn type_matches(declared: TokenKind, literal: TokenKind) -> bool {
    matches!(
        (declared, literal),
        (TokenKind::Natural, TokenKind::UnsignedNumber)
            | (TokenKind::Integer, TokenKind::SignedNumber)
            | (TokenKind::Real, TokenKind::Double)
            | (TokenKind::Boolean, TokenKind::BooleanValue)
            | (TokenKind::Character, TokenKind::CharacterValue)
            | (TokenKind::Text, TokenKind::TextValue)
    )
}

/// The literal tokens an initializer value assigns: a literal operand, or
/// the literal elements of a list literal. Computed expressions carry no
/// recordable values.
fn literal_values(value: &Expression) -> Vec<&Token> {
    match value {
        Expression::Operand(token) if token.category == crate::token::TokenCategory::Literal => {
            vec![token]
        }
        Expression::List(elements) => elements
            .iter()
            .flat_map(literal_values)
            .collect(),
        _ => Vec::new(),
    }
}
