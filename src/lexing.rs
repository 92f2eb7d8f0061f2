//! Lexical analyzer: macro-section partitioning
//!
//! Consumes the flat token stream and partitions it into the four macro
//! sections of a StateSpec program:
//!
//!     #StateSpace
//!         n:N;
//!     #Input
//!         n = 5;
//!     #Precondition
//!         n > 0
//!     #Postcondition
//!         n > 0 → n = n
//!
//! The analyzer is a small state machine: a current section, a content
//! buffer that is flushed into the section map on every section switch, and
//! a per-section definition count. Repeated `#Name` headers merge their
//! content (additive, never overwriting) and are reported as a warning, not
//! an error. All state is local to one `analyze` call, so independent
//! compilations can never interleave.

use crate::diagnostics::{codes, Diagnostic};
use crate::token::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The four macro sections of a StateSpec program.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Section {
    StateSpace,
    Input,
    Precondition,
    Postcondition,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::StateSpace,
        Section::Input,
        Section::Precondition,
        Section::Postcondition,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::StateSpace => "StateSpace",
            Section::Input => "Input",
            Section::Precondition => "Precondition",
            Section::Postcondition => "Postcondition",
        }
    }

    pub fn from_name(name: &str) -> Option<Section> {
        Section::ALL.iter().copied().find(|s| s.name() == name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of lexical analysis: per-section token groups plus diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalResult {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub sections: BTreeMap<Section, Vec<Token>>,
    pub success: bool,
}

/// The section state machine. One instance per analysis; `analyze` consumes
/// it so no state can leak into a later compilation.
pub struct LexicalAnalyzer {
    current: Option<Section>,
    buffer: Vec<Token>,
    sections: BTreeMap<Section, Vec<Token>>,
    definition_counts: BTreeMap<Section, usize>,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self {
            current: None,
            buffer: Vec::new(),
            sections: BTreeMap::new(),
            definition_counts: BTreeMap::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Partition a token stream into sections.
    pub fn analyze(mut self, tokens: &[Token]) -> LexicalResult {
        // A stream with no macro marker at all (empty input, whitespace,
        // comments only, or bare values) cannot be sectioned; report exactly
        // one fatal error and stop.
        if !tokens.iter().any(|t| t.kind.is_macro()) {
            self.errors.push(Diagnostic::error(
                codes::INTERNAL_COMPILE_ERROR,
                "source contains no macro sections",
                0,
                0,
            ));
            return self.finish_failed();
        }

        for token in tokens {
            self.step(token);
        }
        self.flush();

        for section in Section::ALL {
            if !self.sections.contains_key(&section) {
                self.errors.push(Diagnostic::error(
                    codes::MISSING_SECTION,
                    format!("section '{}' is missing", section),
                    0,
                    0,
                ));
            }
        }
        for (section, count) in &self.definition_counts {
            if *count > 1 {
                let (line, column) = self
                    .sections
                    .get(section)
                    .and_then(|tokens| tokens.first())
                    .map(|t| (t.line, t.column))
                    .unwrap_or((0, 0));
                self.warnings.push(Diagnostic::warning(
                    codes::MULTIPLE_MACRO,
                    format!("section '{}' is defined {} times; contents were merged", section, count),
                    line,
                    column,
                ));
            }
        }

        let success = self.errors.is_empty();
        LexicalResult {
            errors: self.errors,
            warnings: self.warnings,
            sections: self.sections,
            success,
        }
    }

    fn step(&mut self, token: &Token) {
        if token.kind.is_macro() {
            self.switch_section(token);
            return;
        }
        if self.current.is_none() {
            // Values before any section header are dropped; trivia and
            // newlines outside a section are simply ignored.
            if !token.is_trivia() && token.kind != TokenKind::Newline {
                self.errors.push(Diagnostic::error(
                    codes::INVALID_VALUE_PLACEMENT,
                    format!(
                        "value '{}' at {}:{} appears outside of any section",
                        token.text.escape_default(),
                        token.line,
                        token.column
                    ),
                    token.line,
                    token.column,
                ));
            }
            return;
        }
        if token.kind == TokenKind::Unknown {
            self.errors.push(Diagnostic::error(
                codes::UNKNOWN_TOKEN_DEFINITION,
                format!(
                    "unknown character '{}' at {}:{}",
                    token.text.escape_default(),
                    token.line,
                    token.column
                ),
                token.line,
                token.column,
            ));
            return;
        }
        self.buffer.push(token.clone());
    }

    /// Handle a macro marker. Only recognized names switch the section;
    /// an unknown name is reported and the current section stays active.
    fn switch_section(&mut self, token: &Token) {
        // Inline macro definitions carry "Name value"; the name is the
        // first word.
        let name = token.text.split_whitespace().next().unwrap_or("");
        match Section::from_name(name) {
            Some(section) => {
                self.flush();
                self.current = Some(section);
                *self.definition_counts.entry(section).or_insert(0) += 1;
                // Make the section visible even when its body is empty.
                self.sections.entry(section).or_default();
            }
            None => {
                self.errors.push(Diagnostic::error(
                    codes::INVALID_MACRO,
                    format!(
                        "unknown macro section '{}' at {}:{}",
                        name, token.line, token.column
                    ),
                    token.line,
                    token.column,
                ));
            }
        }
    }

    /// Flush the content buffer into the current section, appending to any
    /// earlier definition of the same section.
    fn flush(&mut self) {
        if let Some(section) = self.current {
            let buffered = std::mem::take(&mut self.buffer);
            self.sections.entry(section).or_default().extend(buffered);
        } else {
            self.buffer.clear();
        }
    }

    fn finish_failed(self) -> LexicalResult {
        LexicalResult {
            errors: self.errors,
            warnings: self.warnings,
            sections: BTreeMap::new(),
            success: false,
        }
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
