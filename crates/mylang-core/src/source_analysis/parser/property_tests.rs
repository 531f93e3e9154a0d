// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the parser.
//!
//! Verified invariants over generated inputs:
//!
//! 1. **Parser never panics** — arbitrary input always produces a program
//! 2. **Statement spans contain child spans** — for every node, the parent
//!    span covers each child span
//! 3. **Parser is deterministic** — same input, same program and diagnostics
//! 4. **Valid fragments parse cleanly** — known-good statements produce no
//!    diagnostics

use std::cell::Cell;

use proptest::prelude::*;

use crate::ast::walk_statement;
use crate::source_analysis::{lex, parse};

/// Known-valid statements that must parse without diagnostics.
const VALID_STATEMENTS: &[&str] = &[
    "let x: i32 = 5;",
    "let s: str = \"hi\";",
    "let xs: i32[4];",
    "x = x + 1;",
    "f(1, 2);",
    "xs[0];",
    "p.x;",
    "fn add(a: i32, b: i32): i32 { return a + b; }",
    "rec Point { x: f32; y: f32; }",
    "cls Counter { pub value: i32; pub fn bump() { } }",
    "if a { } elif b { } else { }",
    "while true { break; continue; }",
    "for (let i: i32 = 0; i < 10; i = i + 1) { }",
    "for (item: i32 in items) { }",
    "for (0..10) { }",
    "switch x { case 1 { } default { } }",
];

fn valid_statement() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_STATEMENTS).prop_map(str::to_string)
}

proptest! {
    /// Property 1: the parser never panics on arbitrary input.
    #[test]
    fn parser_never_panics(input in "\\PC{0,200}") {
        let (tokens, _) = lex(&input, "<fuzz>");
        let _ = parse(tokens, &input, "<fuzz>");
    }

    /// Property 2: every statement's span contains its children's spans.
    #[test]
    fn statement_spans_contain_children(input in valid_statement()) {
        let (tokens, _) = lex(&input, "<fuzz>");
        let (program, _) = parse(tokens, &input, "<fuzz>");
        for statement in &program.statements {
            let outer = statement.span();
            let contained = Cell::new(true);
            walk_statement(
                statement,
                &mut |inner| contained.set(contained.get() & outer.contains(inner.span())),
                &mut |expr| contained.set(contained.get() & outer.contains(expr.span())),
            );
            prop_assert!(contained.get(), "span not contained in {}", input);
        }
    }

    /// Property 3: parsing is deterministic.
    #[test]
    fn parser_is_deterministic(input in "\\PC{0,200}") {
        let (tokens_a, _) = lex(&input, "<fuzz>");
        let (tokens_b, _) = lex(&input, "<fuzz>");
        let (program_a, diagnostics_a) = parse(tokens_a, &input, "<fuzz>");
        let (program_b, diagnostics_b) = parse(tokens_b, &input, "<fuzz>");
        prop_assert_eq!(program_a, program_b);
        prop_assert_eq!(diagnostics_a, diagnostics_b);
    }

    /// Property 4: valid statements produce no diagnostics.
    #[test]
    fn valid_statements_parse_cleanly(input in valid_statement()) {
        let (tokens, lex_diagnostics) = lex(&input, "<fuzz>");
        prop_assert!(lex_diagnostics.is_empty());
        let (program, diagnostics) = parse(tokens, &input, "<fuzz>");
        prop_assert!(diagnostics.is_empty(), "diagnostics: {:?}", diagnostics);
        prop_assert!(!program.statements.is_empty());
    }
}
