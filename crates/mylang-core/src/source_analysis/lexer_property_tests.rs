// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the lexer.
//!
//! Verified invariants over generated inputs:
//!
//! 1. **Lexer never panics** — arbitrary string input always produces tokens
//! 2. **Eof is always last** — every stream ends with exactly one `Eof`
//! 3. **Lexemes match source** — each token's text equals the source slice
//!    its span covers
//! 4. **Spans are ordered and in bounds** — tokens appear in source order
//!    and never point past the input
//! 5. **Lexer is deterministic** — same input, same tokens and diagnostics
//! 6. **Valid fragments lex cleanly** — known-good inputs produce no
//!    diagnostics

use proptest::prelude::*;

use super::lexer::lex;
use super::TokenKind;

/// Known-valid fragments that must lex without diagnostics.
const VALID_FRAGMENTS: &[&str] = &[
    "42",
    "3.14",
    "1..10",
    "\"hello\"",
    "'a'",
    r"'\n'",
    "true",
    "false",
    "null",
    "x",
    "my_var123",
    "let x: i32 = 5;",
    "fn add(a: i32, b: i32): i32 { return a + b; }",
    "a + b * c - d / e;",
    "x += 1; y ++; z ??  w;",
    "while true { break; }",
];

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_FRAGMENTS).prop_map(str::to_string)
}

proptest! {
    /// Property 1: the lexer never panics on arbitrary input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _ = lex(&input, "<fuzz>");
    }

    /// Property 2: the stream ends with exactly one Eof token.
    #[test]
    fn eof_terminates_every_stream(input in "\\PC{0,500}") {
        let (tokens, _) = lex(&input, "<fuzz>");
        prop_assert!(!tokens.is_empty());
        prop_assert_eq!(tokens.last().unwrap().kind(), TokenKind::Eof);
        let eof_count = tokens.iter().filter(|t| t.kind().is_eof()).count();
        prop_assert_eq!(eof_count, 1);
    }

    /// Property 3: concatenating lexemes reproduces each token's
    /// contribution to the source byte-for-byte.
    #[test]
    fn lexemes_match_source_slices(input in "\\PC{0,500}") {
        let (tokens, _) = lex(&input, "<fuzz>");
        for token in &tokens {
            let slice = input.get(token.span().as_range()).unwrap_or("");
            prop_assert_eq!(token.text(), slice);
        }
    }

    /// Property 4: spans are ordered and within the input.
    #[test]
    fn spans_are_ordered_and_in_bounds(input in "\\PC{0,500}") {
        let (tokens, _) = lex(&input, "<fuzz>");
        let len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        let mut previous_end = 0;
        for token in &tokens {
            let span = token.span();
            prop_assert!(span.start.offset <= span.end.offset);
            prop_assert!(span.end.offset <= len);
            prop_assert!(span.start.offset >= previous_end);
            previous_end = span.end.offset;
        }
    }

    /// Property 5: lexing is deterministic.
    #[test]
    fn lexer_is_deterministic(input in "\\PC{0,500}") {
        let (tokens_a, diagnostics_a) = lex(&input, "<fuzz>");
        let (tokens_b, diagnostics_b) = lex(&input, "<fuzz>");
        prop_assert_eq!(tokens_a, tokens_b);
        prop_assert_eq!(diagnostics_a, diagnostics_b);
    }

    /// Property 6: valid fragments lex without diagnostics.
    #[test]
    fn valid_fragments_lex_cleanly(input in valid_fragment()) {
        let (tokens, diagnostics) = lex(&input, "<fuzz>");
        prop_assert!(diagnostics.is_empty(), "diagnostics: {:?}", diagnostics);
        prop_assert!(tokens.len() > 1);
    }
}
