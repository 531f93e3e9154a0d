// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The compilation driver.
//!
//! Runs the full front-end pipeline — lex, parse, analyze — over a source
//! string, emits every stage's diagnostics to stderr in discovery order, and
//! reports success as a process exit code: `0` when no Error-level
//! diagnostic was produced, `1` otherwise.

use tracing::debug;

use crate::ast_printer;
use crate::semantic_analysis::Analyzer;
use crate::source_analysis::{lex, parse};

/// Compiler configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Print the syntax tree after parsing.
    pub debug: bool,
}

/// Errors from the file-reading boundary of the driver.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CompileError {
    /// The source file could not be read.
    #[error("failed to read source file '{path}'")]
    ReadFile {
        /// The path that failed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Compiles a source string, printing diagnostics to stderr.
///
/// Returns `0` when the program parsed and analyzed without errors, `1`
/// otherwise. Deterministic: the same source yields the same tokens, AST,
/// and diagnostics on every run.
#[must_use]
pub fn compile_source(source: &str, file: &str, config: &Config) -> i32 {
    debug!(file, bytes = source.len(), "compiling");

    let (tokens, lex_diagnostics) = lex(source, file);
    debug!(tokens = tokens.len(), "lexed");

    let (program, parse_diagnostics) = parse(tokens, source, file);
    debug!(statements = program.statements.len(), "parsed");

    let mut analyzer = Analyzer::new(file, source);
    analyzer.analyze(&program);

    let mut failed = false;
    for diagnostic in lex_diagnostics
        .iter()
        .chain(&parse_diagnostics)
        .chain(analyzer.diagnostics())
    {
        failed |= diagnostic.is_error();
        diagnostic.emit();
    }

    if config.debug {
        println!("Compilation finished.");
        print!("{}", ast_printer::print_program(&program));
    }

    i32::from(failed)
}

/// Reads a source file and compiles it via [`compile_source`].
///
/// # Errors
///
/// Returns [`CompileError::ReadFile`] when the file cannot be read.
pub fn compile_file(path: &str, config: &Config) -> Result<i32, CompileError> {
    let source = std::fs::read_to_string(path).map_err(|source| CompileError::ReadFile {
        path: path.to_string(),
        source,
    })?;
    Ok(compile_source(&source, path, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn valid_source_exits_zero() {
        let config = Config::default();
        assert_eq!(compile_source("let x: i32 = 5;", "<test>", &config), 0);
        assert_eq!(
            compile_source("fn add(a: i32, b: i32): i32 { return a + b; }", "<test>", &config),
            0
        );
    }

    #[test]
    fn empty_source_exits_zero() {
        assert_eq!(compile_source("", "<test>", &Config::default()), 0);
    }

    #[test]
    fn semantic_error_exits_nonzero() {
        assert_eq!(compile_source("return 1;", "<test>", &Config::default()), 1);
    }

    #[test]
    fn lexical_error_exits_nonzero() {
        assert_eq!(
            compile_source("\"unterminated", "<test>", &Config::default()),
            1
        );
    }

    #[test]
    fn syntax_error_exits_nonzero() {
        assert_eq!(
            compile_source("let x: i32 = ;", "<test>", &Config::default()),
            1
        );
    }

    #[test]
    fn parser_warning_alone_still_succeeds() {
        // A missing type-annotation colon is recoverable.
        assert_eq!(
            compile_source("let x i32 = 5;", "<test>", &Config::default()),
            0
        );
    }

    #[test]
    fn debug_config_prints_tree_without_failing() {
        let config = Config { debug: true };
        assert_eq!(compile_source("let x: i32 = 5;", "<test>", &config), 0);
    }

    #[test]
    fn compile_file_reads_and_delegates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.ml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "let x: i32 = 5;").unwrap();

        let code = compile_file(path.to_str().unwrap(), &Config::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn compile_file_propagates_errors_in_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ml");
        std::fs::write(&path, "return 1;").unwrap();

        let code = compile_file(path.to_str().unwrap(), &Config::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn compile_file_missing_path_is_an_error() {
        let result = compile_file("/nonexistent/path/main.ml", &Config::default());
        let error = result.expect_err("expected a read error");
        assert!(error.to_string().contains("failed to read source file"));
    }

    #[test]
    fn compilation_is_deterministic() {
        let source = "fn f(a: i32) { }\nf(\"wrong\");";
        let first = compile_source(source, "<test>", &Config::default());
        let second = compile_source(source, "<test>", &Config::default());
        assert_eq!(first, second);
        assert_eq!(first, 1);
    }
}
