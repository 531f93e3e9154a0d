// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Front-end for the ML language.
//!
//! This crate contains the whole front-end pipeline:
//!
//! - Lexical analysis ([`source_analysis::lex`])
//! - Parsing ([`source_analysis::parse`])
//! - Semantic analysis ([`semantic_analysis::Analyzer`])
//! - Diagnostics with caret rendering ([`diagnostic`])
//! - The compilation driver ([`compiler`])
//!
//! Data flows strictly forward — source string → tokens → AST → analyzed
//! AST plus diagnostics — and every stage recovers from malformed input so
//! one run reports as many problems as possible. The pipeline is
//! single-threaded, synchronous, and deterministic.
//!
//! ```
//! use mylang_core::compiler::{compile_source, Config};
//!
//! let exit_code = compile_source("let x: i32 = 5;", "<input>", &Config::default());
//! assert_eq!(exit_code, 0);
//! ```

pub mod ast;
pub mod ast_printer;
pub mod compiler;
pub mod diagnostic;
pub mod modifier;
pub mod semantic_analysis;
pub mod source_analysis;

/// Re-export of the most commonly used types.
pub mod prelude {
    pub use crate::ast::{Declaration, Expression, Program, Statement};
    pub use crate::compiler::{compile_file, compile_source, Config};
    pub use crate::diagnostic::{Diagnostic, Level};
    pub use crate::semantic_analysis::Analyzer;
    pub use crate::source_analysis::{lex, parse, Position, Span, Token, TokenKind};
}
