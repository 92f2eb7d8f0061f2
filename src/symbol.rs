//! Symbol table built during semantic analysis
//!
//! A symbol records one declared identifier: its declared type, list-ness,
//! declaration position, and the literal values assigned to it by the Input
//! section. The table enforces the one-name-one-symbol invariant; insertion
//! order is irrelevant for lookup and only matters for display.

use crate::diagnostics::{codes, Diagnostic};
use crate::token::{Token, TokenCategory, TokenKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A semantic record of one declared identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub declared_type: TokenKind,
    pub category: TokenCategory,
    pub is_list: bool,
    pub values: Vec<Token>,
    pub line: usize,
    pub column: usize,
    pub initialized: bool,
}

impl Symbol {
    /// Build a symbol from a parsed declaration.
    pub fn from_declaration(identifier: &Token, declared_type: &Token, is_list: bool) -> Self {
        Self {
            name: identifier.text.clone(),
            declared_type: declared_type.kind,
            category: declared_type.category,
            is_list,
            values: Vec::new(),
            line: identifier.line,
            column: identifier.column,
            initialized: false,
        }
    }
}

/// Name → symbol mapping with a single writer (the semantic analyzer).
/// Kept in insertion order for display and code generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new symbol. A duplicate name is rejected with a
    /// `duplicate-symbol` error, regardless of the duplicate's type.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), Diagnostic> {
        if let Some(existing) = self.get(&symbol.name) {
            return Err(Diagnostic::error(
                codes::DUPLICATE_SYMBOL,
                format!(
                    "symbol '{}' at {}:{} is already declared at {}:{}",
                    symbol.name, symbol.line, symbol.column, existing.line, existing.column
                ),
                symbol.line,
                symbol.column,
            ));
        }
        self.symbols.push(symbol);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.iter_mut().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            let list = if symbol.is_list { "[]" } else { "" };
            let values: Vec<&str> = symbol.values.iter().map(|t| t.text.as_str()).collect();
            writeln!(
                f,
                "{}: {:?}{} = [{}] (declared at {}:{})",
                symbol.name,
                symbol.declared_type,
                list,
                values.join(", "),
                symbol.line,
                symbol.column
            )?;
        }
        Ok(())
    }
}
