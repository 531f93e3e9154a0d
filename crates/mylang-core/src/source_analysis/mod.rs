// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source analysis: lexing and parsing.
//!
//! The [`Lexer`] turns a source string into a [`Token`] stream; [`parse`]
//! turns the tokens into a [`Program`](crate::ast::Program). Both stages
//! recover from malformed input and accumulate
//! [`Diagnostic`](crate::diagnostic::Diagnostic)s instead of aborting, so a
//! single run reports every problem it can find.
//!
//! ```
//! use mylang_core::source_analysis::{lex, parse};
//!
//! let source = "let x: i32 = 5;";
//! let (tokens, lex_diagnostics) = lex(source, "<input>");
//! let (program, parse_diagnostics) = parse(tokens, source, "<input>");
//!
//! assert!(lex_diagnostics.is_empty());
//! assert!(parse_diagnostics.is_empty());
//! assert_eq!(program.statements.len(), 1);
//! ```

mod lexer;
mod parser;
mod span;
pub mod syntax;
mod token;

#[cfg(test)]
mod lexer_property_tests;

pub use lexer::{lex, Lexer};
pub use parser::parse;
pub use span::{Position, Span};
pub use token::{Token, TokenKind};
