// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types produced by the lexer.
//!
//! Each token carries its kind, the raw lexeme text (including the quotes of
//! string and character literals), and a [`Span`]. Tokens are cheap to clone:
//! lexeme text is an [`EcoString`].

use std::fmt;

use ecow::EcoString;

use super::Span;

/// The kind of a token.
///
/// `None` marks an unrecognized character (error recovery); `Eof` terminates
/// every token stream. `Boolean` is reserved — `true` and `false` currently
/// lex as keywords and are classified at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unrecognized input, preserved for error reporting.
    None,
    /// An integer literal: `42`.
    Integer,
    /// A floating-point literal: `3.14`.
    Float,
    /// A boolean literal (reserved, see above).
    Boolean,
    /// A character literal with quotes: `'a'`, `'\n'`.
    Character,
    /// A string literal with quotes: `"hello"`.
    String,
    /// An identifier: `foo`, `_tmp`.
    Identifier,
    /// A reserved keyword: `let`, `fn`, `while`.
    Keyword,
    /// An operator: `+`, `==`, `..`.
    Operator,
    /// A delimiter: `(`, `;`, `,`.
    Delimiter,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns the display name of this kind, as used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::Character => "Character",
            Self::String => "String",
            Self::Identifier => "Identifier",
            Self::Keyword => "Keyword",
            Self::Operator => "Operator",
            Self::Delimiter => "Delimiter",
            Self::Eof => "Eof",
        }
    }

    /// Returns true if this token is a literal value.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Float | Self::Boolean | Self::Character | Self::String
        )
    }

    /// Returns true if this is the end-of-input marker.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::Eof)
    }
}

/// A lexeme with its kind and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: EcoString,
    span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<EcoString>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the raw lexeme text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the source span of this token.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}-{}] {} {}",
            self.span.start,
            self.span.end,
            self.kind.name(),
            self.text
        )
    }
}
