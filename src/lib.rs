//! # statespec
//!
//! Compiler front end for the StateSpec specification language: programs
//! made of four macro-delimited sections (`#StateSpace`, `#Input`,
//! `#Precondition`, `#Postcondition`) that declare typed state variables,
//! assign them input values, and constrain them with logical conditions.
//!
//! The crate is organized as a pipeline of four stages, each a module:
//!
//! 1. [`tokenizer`]: grammar-table driven scan of raw text into
//!    position-annotated tokens.
//! 2. [`lexing`]: section recognition; groups the token stream by macro.
//! 3. [`parsing`]: recursive-descent statement and expression parser.
//! 4. [`semantics`]: identifier validation and symbol table construction.
//!
//! [`pipeline::Pipeline`] chains the four stages:
//!
//! ```ignore
//! use statespec::pipeline::Pipeline;
//!
//! let source = "#StateSpace\nn:N;\n#Input\nn = 5;\n#Precondition\nn > 0\n#Postcondition\nn > 0\n";
//! let result = Pipeline::new().run(source);
//! assert!(result.success());
//! ```

pub mod diagnostics;
pub mod grammar;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod semantics;
pub mod symbol;
pub mod token;
pub mod tokenizer;

pub use diagnostics::{Diagnostic, Severity};
pub use pipeline::{CompilationResult, Pipeline};
pub use token::{Token, TokenCategory, TokenKind};
