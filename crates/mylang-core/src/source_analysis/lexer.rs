// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis.
//!
//! The lexer is a single pass over the source bytes. At each step it skips
//! whitespace and then tries, in order: alphabetic, numeric, character,
//! string, operator, delimiter. At end of input it emits a final `Eof` token.
//!
//! # Error recovery
//!
//! The lexer never fails. Malformed literals (unterminated strings and
//! characters, empty character literals) produce a diagnostic and a best-
//! effort token; an unrecognized character produces a `None` token plus a
//! diagnostic, and lexing continues to a true `Eof`, so downstream stages
//! always see a terminated stream.
//!
//! Columns count bytes, not characters — multi-byte code points are not
//! supported in identifiers.

use ecow::EcoString;

use crate::diagnostic::{Diagnostic, Level};

use super::syntax;
use super::{Position, Span, Token, TokenKind};

/// A lexer over a single source string.
#[derive(Debug)]
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Label for the source file, used in diagnostics.
    file: EcoString,
    /// Owned copy of the source, shared into each diagnostic.
    source_copy: EcoString,
    /// Start of the lexeme currently being scanned.
    start: Position,
    /// Cursor just past the last consumed byte.
    current: Position,
    /// Diagnostics produced so far.
    diagnostics: Vec<Diagnostic>,
}

/// Lexes `source` into a token stream ending with `Eof`.
///
/// # Examples
///
/// ```
/// use mylang_core::source_analysis::{lex, TokenKind};
///
/// let (tokens, diagnostics) = lex("let x = 1;", "<input>");
/// assert!(diagnostics.is_empty());
/// assert_eq!(tokens.last().unwrap().kind(), TokenKind::Eof);
/// ```
#[must_use]
pub fn lex(source: &str, file: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(source, file).lex()
}

impl<'src> Lexer<'src> {
    /// Creates a lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str, file: impl Into<EcoString>) -> Self {
        Self {
            source,
            file: file.into(),
            source_copy: EcoString::from(source),
            start: Position::default(),
            current: Position::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Lexes the entire source, returning the tokens and any diagnostics.
    ///
    /// The token list always ends with exactly one `Eof` token; an empty
    /// source yields just that.
    #[must_use]
    pub fn lex(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind().is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn is_eof(&self) -> bool {
        self.current.offset as usize >= self.source.len()
    }

    fn peek(&self) -> Option<u8> {
        self.source
            .as_bytes()
            .get(self.current.offset as usize)
            .copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.source
            .as_bytes()
            .get(self.current.offset as usize + n)
            .copied()
    }

    /// Consumes one byte, keeping line and column bookkeeping.
    fn advance(&mut self) {
        if let Some(byte) = self.peek() {
            self.current.offset += 1;
            if byte == b'\n' {
                self.current.line += 1;
                self.current.column = 1;
            } else {
                self.current.column += 1;
            }
        }
    }

    /// Consumes a full UTF-8 code point. Used only for unrecognized input,
    /// so lexeme slices stay on character boundaries.
    fn advance_code_point(&mut self) {
        let len = match self.peek() {
            Some(byte) if byte >= 0xF0 => 4,
            Some(byte) if byte >= 0xE0 => 3,
            Some(byte) if byte >= 0xC0 => 2,
            Some(_) => 1,
            None => 0,
        };
        for _ in 0..len {
            self.advance();
        }
    }

    /// Consumes bytes while the predicate holds.
    fn take_while(&mut self, predicate: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Discards the pending lexeme, restarting it at the cursor.
    fn ignore(&mut self) {
        self.start = self.current;
    }

    /// The pending lexeme text.
    fn text(&self) -> &'src str {
        &self.source[self.start.offset as usize..self.current.offset as usize]
    }

    /// Finishes the pending lexeme as a token of the given kind.
    fn make_token(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, self.text(), Span::new(self.start, self.current));
        self.ignore();
        token
    }

    fn error(&mut self, message: &str, help: &str, span: Span) {
        self.diagnostics.push(Diagnostic::new(
            Level::Error,
            message,
            help,
            span,
            self.file.clone(),
            self.source_copy.clone(),
        ));
    }

    /// Produces the next token.
    fn next_token(&mut self) -> Token {
        self.take_while(syntax::is_whitespace);
        self.ignore();

        if self.is_eof() {
            return Token::new(TokenKind::Eof, "", Span::new(self.current, self.current));
        }
        if let Some(token) = self.lex_alpha() {
            return token;
        }
        if let Some(token) = self.lex_numeric() {
            return token;
        }
        if let Some(token) = self.lex_character() {
            return token;
        }
        if let Some(token) = self.lex_string() {
            return token;
        }
        if let Some(token) = self.lex_operator() {
            return token;
        }
        if let Some(token) = self.lex_delimiter() {
            return token;
        }

        // Unrecognized input: consume one code point, report it, and keep
        // going so the stream still ends in a true Eof.
        self.advance_code_point();
        let span = Span::new(self.start, self.current);
        self.error(
            "Unrecognized character",
            "Ensure the source contains only valid syntax characters.",
            span,
        );
        self.make_token(TokenKind::None)
    }

    /// Lexes an identifier or keyword: `[A-Za-z_][A-Za-z0-9_]*`.
    fn lex_alpha(&mut self) -> Option<Token> {
        let first = self.peek()?;
        if !first.is_ascii_alphabetic() && first != b'_' {
            return None;
        }
        self.take_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let kind = if syntax::is_keyword(self.text()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Some(self.make_token(kind))
    }

    /// Lexes an integer or float literal.
    fn lex_numeric(&mut self) -> Option<Token> {
        if !self.peek()?.is_ascii_digit() {
            return None;
        }
        self.take_while(|b| b.is_ascii_digit());

        if self.peek() == Some(b'.') {
            // `1..10` is an integer followed by the range operator, not a
            // float missing its fraction.
            if self.peek_at(1) == Some(b'.') {
                return Some(self.make_token(TokenKind::Integer));
            }
            self.advance();
            self.take_while(|b| b.is_ascii_digit());
            return Some(self.make_token(TokenKind::Float));
        }
        Some(self.make_token(TokenKind::Integer))
    }

    /// Lexes a character literal: `'a'`, `'\n'`.
    fn lex_character(&mut self) -> Option<Token> {
        if self.peek()? != b'\'' {
            return None;
        }
        self.advance(); // opening quote

        if self.peek() == Some(b'\\') {
            self.advance(); // escape marker
            self.advance_code_point(); // escaped character
        } else if self.peek() != Some(b'\'') {
            // A full code point, so the lexeme slice stays on a character
            // boundary even for content the language does not support.
            self.advance_code_point();
        } else {
            let span = Span::new(self.start, self.start);
            self.error(
                "Empty character literal",
                "Add a character between the single quotes (').",
                span,
            );
        }

        if self.peek() == Some(b'\'') {
            self.advance(); // closing quote
        } else {
            let span = Span::new(self.start, self.start);
            self.error(
                "Unterminated character literal",
                "Add a closing single quote (') to terminate the character literal.",
                span,
            );
        }
        Some(self.make_token(TokenKind::Character))
    }

    /// Lexes a string literal: `"..."`.
    fn lex_string(&mut self) -> Option<Token> {
        if self.peek()? != b'"' {
            return None;
        }
        self.advance(); // opening quote

        loop {
            match self.peek() {
                None => {
                    let span = Span::new(self.start, self.start);
                    self.error(
                        "Unterminated string literal",
                        "Add a closing double quote (\") to terminate the string literal.",
                        span,
                    );
                    break;
                }
                Some(b'"') => {
                    self.advance(); // closing quote
                    break;
                }
                Some(_) => self.advance(),
            }
        }
        Some(self.make_token(TokenKind::String))
    }

    /// Lexes a one- or two-character operator.
    fn lex_operator(&mut self) -> Option<Token> {
        let first = self.peek()?;
        if !syntax::is_operator_char(first) {
            return None;
        }
        self.advance();
        if let Some(second) = self.peek() {
            if syntax::is_operator_pair(first, second) {
                self.advance();
            }
        }
        Some(self.make_token(TokenKind::Operator))
    }

    /// Lexes a single delimiter character.
    fn lex_delimiter(&mut self) -> Option<Token> {
        if !syntax::is_delimiter(self.peek()?) {
            return None;
        }
        self.advance();
        Some(self.make_token(TokenKind::Delimiter))
    }
}
