// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Levelled diagnostics with caret rendering.
//!
//! Every stage of the pipeline (lexer, parser, analyzer) accumulates
//! [`Diagnostic`]s instead of aborting. A diagnostic owns everything it needs
//! to render itself — including a copy of the source text — so rendering is a
//! pure function that can be called repeatedly, long after the stage that
//! produced it is gone.
//!
//! The rendered form is:
//!
//! ```text
//! Error[0042]: Unexpected token: 'Keyword'
//!    --> main.ml:3:8
//!   |
//! 3 | let x = return;
//!   |        ^^
//!   |
//!   | help: Expected primary expression
//! ```
//!
//! Color escape sequences are applied iff stderr is a terminal and `NO_COLOR`
//! is unset.

use std::io::IsTerminal;

use ecow::EcoString;

use crate::source_analysis::Span;

// ANSI escape sequences, matching the usual terminal palette.

/// Resets all text attributes.
pub const RESET: &str = "\x1b[0m";
/// Bold text.
pub const BOLD: &str = "\x1b[1m";
/// Dim (faint) text.
pub const DIM: &str = "\x1b[2m";
/// Bright red foreground.
pub const RED: &str = "\x1b[91m";
/// Bright yellow foreground.
pub const YELLOW: &str = "\x1b[93m";
/// Bright blue foreground.
pub const BLUE: &str = "\x1b[94m";
/// Bright cyan foreground.
pub const CYAN: &str = "\x1b[96m";
/// Bright white foreground.
pub const WHITE: &str = "\x1b[97m";

/// Severity of a diagnostic.
///
/// `Info` is reserved; `Fatal` is reserved for conditions that prevent
/// continuing (no stage currently emits it — every stage recovers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Purely informational.
    Info,
    /// Questionable input accepted by guessing intent.
    Warning,
    /// Malformed input; the stage recovered.
    Error,
    /// The stage cannot continue.
    Fatal,
}

impl Level {
    /// Returns the display name of this level.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Fatal => "Fatal",
        }
    }

    /// Returns the ANSI color used when rendering this level.
    const fn color(self) -> &'static str {
        match self {
            Self::Info => CYAN,
            Self::Warning => YELLOW,
            Self::Error => RED,
            Self::Fatal => WHITE,
        }
    }
}

/// A message anchored to a span of source code.
///
/// Immutable after construction. Code `0` means "no code" and is omitted from
/// the rendered form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the diagnostic.
    pub level: Level,
    /// Short description of the problem.
    pub message: EcoString,
    /// Hint on how to fix the problem.
    pub help: EcoString,
    /// The offending region of source.
    pub span: Span,
    /// Label for the source file, e.g. a path or `<input>`.
    pub file: EcoString,
    /// Owning copy of the source text, for rendering.
    pub source: EcoString,
    /// Optional numeric code; `0` means none.
    pub code: u64,
}

impl Diagnostic {
    /// Creates a diagnostic with no numeric code.
    #[must_use]
    pub fn new(
        level: Level,
        message: impl Into<EcoString>,
        help: impl Into<EcoString>,
        span: Span,
        file: impl Into<EcoString>,
        source: impl Into<EcoString>,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            help: help.into(),
            span,
            file: file.into(),
            source: source.into(),
            code: 0,
        }
    }

    /// Creates a diagnostic carrying a numeric code.
    #[must_use]
    pub fn with_code(
        level: Level,
        message: impl Into<EcoString>,
        help: impl Into<EcoString>,
        span: Span,
        file: impl Into<EcoString>,
        source: impl Into<EcoString>,
        code: u64,
    ) -> Self {
        Self {
            code,
            ..Self::new(level, message, help, span, file, source)
        }
    }

    /// Returns true if this diagnostic fails a compilation.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level >= Level::Error
    }

    /// Returns the slice of source covered by the span.
    #[must_use]
    pub fn snippet(&self) -> &str {
        let range = self.span.as_range();
        self.source.get(range).unwrap_or("")
    }

    /// Returns the full line of source containing the start of the span.
    fn source_line(&self) -> &str {
        self.source
            .lines()
            .nth(self.span.start.line.saturating_sub(1) as usize)
            .unwrap_or("")
    }

    /// Renders the diagnostic into its multi-line display form.
    ///
    /// Pure: may be called repeatedly. Color escapes are included iff
    /// `use_color` is true.
    #[must_use]
    pub fn render(&self, use_color: bool) -> String {
        let (color, reset, bold, dim, blue) = if use_color {
            (self.level.color(), RESET, BOLD, DIM, BLUE)
        } else {
            ("", "", "", "", "")
        };

        let mut out = String::new();

        // Header: `<Level>[<code>]: <message>` with the code zero-padded to
        // four digits and omitted entirely when zero.
        out.push_str(&format!("{color}{bold}{}{reset}", self.level.name()));
        if self.code != 0 {
            out.push_str(&format!("{dim}[{:04}]{reset}", self.code));
        }
        out.push_str(&format!(": {bold}{}{reset}\n", self.message));

        let start = self.span.start;
        if start.line == 0 {
            return out;
        }

        // The reported column backs up by one so the arrow points at the
        // character the cursor had just passed when the problem was noticed.
        let display_column = if start.column > 1 {
            start.column - 1
        } else {
            start.column
        };
        out.push_str(&format!(
            "{dim}   --> {}:{}:{display_column}{reset}\n",
            self.file, start.line
        ));
        out.push_str(&format!("{dim}  |{reset}\n"));

        let line_width = digit_width(start.line.max(self.span.end.line));
        let gutter = " ".repeat(line_width);

        out.push_str(&format!(
            "{dim}{:>line_width$} | {reset}{}\n",
            start.line,
            self.source_line()
        ));

        let caret_offset = start.column.saturating_sub(1) as usize;
        let caret_count = if self.span.end.column > start.column {
            (self.span.end.column - start.column) as usize
        } else {
            2
        };
        out.push_str(&format!(
            "{dim}{gutter} | {reset}{}{color}{bold}{}{reset}\n",
            " ".repeat(caret_offset),
            "^".repeat(caret_count)
        ));

        out.push_str(&format!("{dim}{gutter} | {reset}\n"));
        out.push_str(&format!(
            "{dim}{gutter} | {reset}{blue}help: {reset}{}\n",
            self.help
        ));

        out
    }

    /// Writes the rendered diagnostic to stderr.
    ///
    /// Color is applied iff stderr is a terminal and `NO_COLOR` is unset.
    pub fn emit(&self) {
        eprintln!("{}", self.render(stderr_supports_color()));
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

/// Returns whether stderr accepts color escapes.
fn stderr_supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

/// Number of decimal digits in `n`, minimum 1.
fn digit_width(n: u32) -> usize {
    n.max(1).ilog10() as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::Position;

    fn sample() -> Diagnostic {
        Diagnostic::new(
            Level::Error,
            "Test error",
            "Test help",
            Span::new(Position::new(1, 7, 6), Position::new(1, 12, 11)),
            "test.ml",
            "hello world test",
        )
    }

    #[test]
    fn snippet_extracts_span() {
        assert_eq!(sample().snippet(), "world");
    }

    #[test]
    fn snippet_of_empty_source() {
        let diag = Diagnostic::new(
            Level::Error,
            "Test error",
            "Test help",
            Span::default(),
            "test.ml",
            "",
        );
        assert_eq!(diag.snippet(), "");
    }

    #[test]
    fn render_header_without_code() {
        let rendered = sample().render(false);
        let first = rendered.lines().next().unwrap();
        assert_eq!(first, "Error: Test error");
    }

    #[test]
    fn render_header_pads_code_to_four_digits() {
        let diag = Diagnostic::with_code(
            Level::Warning,
            "Odd input",
            "Fix it",
            Span::new(Position::new(1, 1, 0), Position::new(1, 4, 3)),
            "test.ml",
            "abc",
            7,
        );
        let rendered = diag.render(false);
        assert!(rendered.starts_with("Warning[0007]: Odd input\n"));
    }

    #[test]
    fn render_location_backs_up_one_column() {
        let rendered = sample().render(false);
        assert!(rendered.contains("   --> test.ml:1:6"));
    }

    #[test]
    fn render_column_one_is_not_backed_up() {
        let diag = Diagnostic::new(
            Level::Error,
            "Test error",
            "Test help",
            Span::new(Position::new(1, 1, 0), Position::new(1, 3, 2)),
            "test.ml",
            "hello",
        );
        assert!(diag.render(false).contains("   --> test.ml:1:1"));
    }

    #[test]
    fn render_shows_source_line_and_carets() {
        let rendered = sample().render(false);
        assert!(rendered.contains("1 | hello world test\n"));
        assert!(rendered.contains("  |       ^^^^^\n"));
    }

    #[test]
    fn render_caret_minimum_is_two() {
        let diag = Diagnostic::new(
            Level::Error,
            "Test error",
            "Test help",
            Span::new(Position::new(1, 3, 2), Position::new(1, 3, 2)),
            "test.ml",
            "hello",
        );
        assert!(diag.render(false).contains("  |   ^^\n"));
    }

    #[test]
    fn render_ends_with_help() {
        let rendered = sample().render(false);
        assert!(rendered.ends_with("  | help: Test help\n"));
    }

    #[test]
    fn render_multiline_source_picks_right_line() {
        let diag = Diagnostic::new(
            Level::Error,
            "Test error",
            "Test help",
            Span::new(Position::new(2, 1, 6), Position::new(2, 6, 11)),
            "test.ml",
            "first\nsecond\nthird",
        );
        let rendered = diag.render(false);
        assert!(rendered.contains("2 | second\n"));
    }

    #[test]
    fn render_with_color_wraps_level() {
        let rendered = sample().render(true);
        assert!(rendered.starts_with(&format!("{RED}{BOLD}Error{RESET}")));
        assert!(rendered.contains(RESET));
    }

    #[test]
    fn render_is_repeatable() {
        let diag = sample();
        assert_eq!(diag.render(false), diag.render(false));
    }

    #[test]
    fn level_ordering() {
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn is_error_threshold() {
        let mut diag = sample();
        assert!(diag.is_error());
        diag.level = Level::Warning;
        assert!(!diag.is_error());
        diag.level = Level::Fatal;
        assert!(diag.is_error());
    }

    #[test]
    fn digit_widths() {
        assert_eq!(digit_width(0), 1);
        assert_eq!(digit_width(9), 1);
        assert_eq!(digit_width(10), 2);
        assert_eq!(digit_width(999), 3);
    }
}
