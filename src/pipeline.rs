//! The compilation pipeline
//!
//! Chains the four analysis stages over one source text:
//!
//!     tokenize -> lexical analysis -> parsing -> semantic analysis
//!
//! Each stage fully consumes its input before the next starts, and each
//! invocation owns fresh analyzer state, so independent compilations can
//! run concurrently without sharing anything. The pipeline stops after the
//! first failed stage; the symbol table is only exposed when every stage
//! through semantic analysis succeeded. Wall-clock timing is recorded per
//! stage so a failed stage can be reported together with its cost.

use crate::diagnostics::Diagnostic;
use crate::lexing::{LexicalAnalyzer, LexicalResult};
use crate::parsing::{ParserResult, SyntaxAnalyzer};
use crate::semantics::{SemanticAnalyzer, SemanticResult};
use crate::symbol::SymbolTable;
use crate::token::Token;
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Wall-clock cost of each executed stage. Stages after a failure never
/// run and stay `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTimings {
    pub tokenizer: Duration,
    pub lexical: Duration,
    pub parser: Option<Duration>,
    pub semantic: Option<Duration>,
}

/// Everything one compilation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationResult {
    pub tokens: Vec<Token>,
    pub lexical: LexicalResult,
    pub parser: Option<ParserResult>,
    pub semantic: Option<SemanticResult>,
    pub timings: StageTimings,
}

impl CompilationResult {
    /// True when every stage ran and none reported an error.
    pub fn success(&self) -> bool {
        self.lexical.success
            && self.parser.as_ref().is_some_and(|r| r.success)
            && self.semantic.as_ref().is_some_and(|r| r.success)
    }

    /// The finished symbol table, only when the whole pipeline succeeded.
    /// Code generation must never see a partial result.
    pub fn symbol_table(&self) -> Option<&SymbolTable> {
        if !self.success() {
            return None;
        }
        self.semantic.as_ref().map(|r| &r.symbol_table)
    }

    /// All errors of every executed stage, in stage order.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        let mut all: Vec<&Diagnostic> = self.lexical.errors.iter().collect();
        if let Some(parser) = &self.parser {
            all.extend(parser.errors.iter());
        }
        if let Some(semantic) = &self.semantic {
            all.extend(semantic.errors.iter());
        }
        all
    }

    /// All warnings of every executed stage, in stage order.
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        let mut all: Vec<&Diagnostic> = self.lexical.warnings.iter().collect();
        if let Some(parser) = &self.parser {
            all.extend(parser.warnings.iter());
        }
        if let Some(semantic) = &self.semantic {
            all.extend(semantic.warnings.iter());
        }
        all
    }
}

/// The compilation pipeline. Stateless; every `run` builds fresh analyzers.
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    /// Compile one source text through every stage that still has valid
    /// input.
    pub fn run(&self, source: &str) -> CompilationResult {
        let started = Instant::now();
        let tokens = tokenize(source);
        let tokenizer_time = started.elapsed();

        let started = Instant::now();
        let lexical = LexicalAnalyzer::new().analyze(&tokens);
        let lexical_time = started.elapsed();

        let mut timings = StageTimings {
            tokenizer: tokenizer_time,
            lexical: lexical_time,
            parser: None,
            semantic: None,
        };

        if !lexical.success {
            return CompilationResult {
                tokens,
                lexical,
                parser: None,
                semantic: None,
                timings,
            };
        }

        let started = Instant::now();
        let parser = SyntaxAnalyzer::new().analyze(&lexical.sections);
        timings.parser = Some(started.elapsed());

        if !parser.success {
            return CompilationResult {
                tokens,
                lexical,
                parser: Some(parser),
                semantic: None,
                timings,
            };
        }

        let started = Instant::now();
        let semantic = SemanticAnalyzer::new().analyze(&parser.sections);
        timings.semantic = Some(started.elapsed());

        CompilationResult {
            tokens,
            lexical,
            parser: Some(parser),
            semantic: Some(semantic),
            timings,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
