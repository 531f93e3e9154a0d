// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser.
//!
//! The parser consumes the lexer's token stream and produces a [`Program`],
//! accumulating diagnostics as it goes. It never aborts: on any expectation
//! failure it emits a diagnostic and either advances to keep the stream
//! progressing or drops the malformed fragment, and the top-level loop
//! retries at the next token.
//!
//! # Expression precedence
//!
//! Expressions use an explicit recursive ladder (precedence climbing), from
//! loosest to tightest binding:
//!
//! | Level | Rule        | Operators                         | Associativity |
//! |-------|-------------|-----------------------------------|---------------|
//! | 0     | assignment  | `=`                               | right         |
//! | 1     | logical or  | `\|\|`                            | left          |
//! | 2     | logical and | `&&`                              | left          |
//! | 3     | equality    | `==` `!=`                         | left          |
//! | 4     | comparison  | `<` `>` `<=` `>=` `..` `...`      | left          |
//! | 5     | term        | `+` `-`                           | left          |
//! | 6     | factor      | `*` `/` `%`                       | left          |
//! | 7     | unary       | prefix `!` `-`                    | —             |
//! | 8     | postfix     | call, `++` `--`, `.attr`, `[i]`   | left          |
//! | 9     | primary     | literals, `this`, names, `(`, `[` | —             |
//!
//! See [`expressions`] for the ladder and [`declarations`] for declaration
//! parsing.

use ecow::EcoString;

use crate::ast::{
    Block, Conditional, Declaration, ForConditional, IfConditional, ModifierStatement, Program,
    Statement, SwitchCase, SwitchConditional, WhileConditional,
};
use crate::diagnostic::{Diagnostic, Level};
use crate::modifier::{Accessor, Modifiers};

use super::{syntax, Position, Span, Token, TokenKind};

mod declarations;
mod expressions;

#[cfg(test)]
mod property_tests;

/// Parses a token stream into a program.
///
/// Always returns a [`Program`], even for malformed input; check the
/// returned diagnostics for errors. `source` and `file` are captured into
/// each diagnostic so it can render itself with carets.
///
/// # Examples
///
/// ```
/// use mylang_core::source_analysis::{lex, parse};
///
/// let (tokens, _) = lex("let x: i32 = 5;", "<input>");
/// let (program, diagnostics) = parse(tokens, "let x: i32 = 5;", "<input>");
/// assert!(diagnostics.is_empty());
/// assert_eq!(program.statements.len(), 1);
/// ```
#[must_use]
pub fn parse(tokens: Vec<Token>, source: &str, file: &str) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens, source, file);
    let program = parser.parse_program();
    (program, parser.diagnostics)
}

/// The parser state.
pub(super) struct Parser {
    /// The tokens being parsed.
    tokens: Vec<Token>,
    /// Current token index.
    index: usize,
    /// Copy of the last consumed token, for spans of "just past" errors.
    last_token: Token,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diagnostic>,
    /// Label for the source file.
    file: EcoString,
    /// Owned copy of the source, shared into each diagnostic.
    source: EcoString,
}

impl Parser {
    fn new(tokens: Vec<Token>, source: &str, file: &str) -> Self {
        Self {
            tokens,
            index: 0,
            last_token: Token::new(TokenKind::None, "", Span::default()),
            diagnostics: Vec::new(),
            file: file.into(),
            source: source.into(),
        }
    }

    // ── Token primitives ─────────────────────────────────────────────────

    /// Returns the current token, or `None` at end of input.
    pub(super) fn peek(&self) -> Option<&Token> {
        if self.is_eof() {
            None
        } else {
            self.tokens.get(self.index)
        }
    }

    /// Returns the token `offset` positions ahead without consuming.
    pub(super) fn look(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    /// Consumes and returns the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let token = self.tokens[self.index].clone();
        self.last_token = token.clone();
        self.index += 1;
        Some(token)
    }

    /// Returns true at the end of input: an index past the last token, or a
    /// terminal empty-lexeme token.
    pub(super) fn is_eof(&self) -> bool {
        if self.index >= self.tokens.len() {
            return true;
        }
        self.index == self.tokens.len() - 1 && self.tokens[self.index].text().is_empty()
    }

    /// Returns true if the current token has the given kind.
    pub(super) fn check_token(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind() == kind)
    }

    /// Returns true if the current token's lexeme is `value`.
    pub(super) fn check_value(&self, value: &str) -> bool {
        self.peek().is_some_and(|token| token.text() == value)
    }

    /// Consumes the current token if it has the given kind.
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check_token(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if its lexeme is `value`.
    pub(super) fn match_value(&mut self, value: &str) -> bool {
        if self.check_value(value) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the first matching lexeme out of `values`, if any.
    pub(super) fn match_any(&mut self, values: &[&str]) -> bool {
        values.iter().any(|value| self.match_value(value))
    }

    /// Expects a token of the given kind; emits a diagnostic on mismatch but
    /// still advances to keep the stream progressing.
    pub(super) fn expect_token(&mut self, kind: TokenKind, message: &str) -> Token {
        let Some(token) = self.peek().cloned() else {
            self.error(
                "Unexpected end of input",
                format!("Expected token of kind: '{}' {message}", kind.name()),
                Span::new(Position::default(), Position::default()),
            );
            return self.last_token.clone();
        };
        if token.kind() != kind {
            self.error(
                format!("Unexpected token: '{}'", token.kind().name()),
                format!("Expected token of kind: '{}' {message}", kind.name()),
                token.span(),
            );
        }
        self.advance().unwrap_or_else(|| self.last_token.clone())
    }

    /// Expects a token with the given lexeme; emits a diagnostic on mismatch
    /// but still advances to keep the stream progressing.
    pub(super) fn expect_value(&mut self, value: &str, message: &str) -> Token {
        let Some(token) = self.peek().cloned() else {
            self.error(
                "Unexpected end of input",
                format!("Expected value: '{value}' {message}"),
                Span::new(Position::default(), Position::default()),
            );
            return self.last_token.clone();
        };
        if token.text() != value {
            self.error(
                format!("Unexpected value: '{}'", token.text()),
                format!("Expected value: '{value}' {message}"),
                token.span(),
            );
        }
        self.advance().unwrap_or_else(|| self.last_token.clone())
    }

    // ── Diagnostics ──────────────────────────────────────────────────────

    pub(super) fn error(
        &mut self,
        message: impl Into<EcoString>,
        help: impl Into<EcoString>,
        span: Span,
    ) {
        self.diagnostics.push(Diagnostic::new(
            Level::Error,
            message,
            help,
            span,
            self.file.clone(),
            self.source.clone(),
        ));
    }

    pub(super) fn warning(
        &mut self,
        message: impl Into<EcoString>,
        help: impl Into<EcoString>,
        span: Span,
    ) {
        self.diagnostics.push(Diagnostic::new(
            Level::Warning,
            message,
            help,
            span,
            self.file.clone(),
            self.source.clone(),
        ));
    }

    // ── Program and statements ───────────────────────────────────────────

    /// Parses the whole token stream. On a statement that fails to parse,
    /// advances one token and retries.
    fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.is_eof() {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            } else {
                self.advance();
            }
        }
        let span = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::default(),
        };
        Program { statements, span }
    }

    /// Dispatches on the current token's lexeme to the statement parsers.
    pub(super) fn parse_statement(&mut self) -> Option<Statement> {
        if self.check_value("return") {
            self.parse_return()
        } else if self.check_value("break") {
            Some(self.parse_break())
        } else if self.check_value("continue") {
            Some(self.parse_continue())
        } else if self.check_value("{") {
            Some(Statement::Block(self.parse_block()))
        } else if self.check_value("let") {
            Some(Statement::Declaration(Declaration::Variable(
                self.parse_variable(true, true),
            )))
        } else if self.is_at_function() {
            Some(Statement::Declaration(Declaration::Function(
                self.parse_function(),
            )))
        } else if self.check_value("rec") {
            Some(Statement::Declaration(Declaration::Record(
                self.parse_record(),
            )))
        } else if self.check_value("cls") {
            Some(Statement::Declaration(Declaration::Class(
                self.parse_class(),
            )))
        } else if self.check_value("if") {
            self.parse_if()
                .map(|cond| Statement::Conditional(Conditional::If(cond)))
        } else if self.check_value("switch") {
            self.parse_switch()
                .map(|cond| Statement::Conditional(Conditional::Switch(cond)))
        } else if self.check_value("while") {
            self.parse_while()
                .map(|cond| Statement::Conditional(Conditional::While(cond)))
        } else if self.check_value("for") {
            self.parse_for()
                .map(|cond| Statement::Conditional(Conditional::For(cond)))
        } else {
            self.parse_expression_statement()
        }
    }

    /// Returns true if the tokens ahead look like a function declaration:
    /// `fn`, possibly preceded by a run of accessors and modifiers.
    fn is_at_function(&self) -> bool {
        if self.check_value("fn") {
            return true;
        }
        if !self
            .peek()
            .is_some_and(|token| syntax::is_accessor(token.text()))
        {
            return false;
        }
        let mut offset = 0;
        while self.look(offset).is_some_and(|token| {
            syntax::is_accessor(token.text()) || syntax::is_modifier(token.text())
        }) {
            offset += 1;
        }
        self.look(offset).is_some_and(|token| token.text() == "fn")
    }

    fn parse_return(&mut self) -> Option<Statement> {
        let return_token = self.expect_value("return", "to start return statement");
        if self.match_value(";") {
            return Some(Statement::Return {
                expression: None,
                span: return_token.span(),
            });
        }
        let expression = self.parse_expression()?;
        self.expect_value(";", "after return expression");
        let span = Span::new(return_token.span().start, expression.span().end);
        Some(Statement::Return {
            expression: Some(expression),
            span,
        })
    }

    fn parse_break(&mut self) -> Statement {
        let break_token = self.expect_value("break", "");
        let semicolon = self.expect_value(";", "after break statement");
        Statement::Break {
            span: Span::new(break_token.span().start, semicolon.span().end),
        }
    }

    fn parse_continue(&mut self) -> Statement {
        let continue_token = self.expect_value("continue", "");
        let semicolon = self.expect_value(";", "after continue statement");
        Statement::Continue {
            span: Span::new(continue_token.span().start, semicolon.span().end),
        }
    }

    /// Parses a `{ ... }` block, recovering statement-by-statement.
    pub(super) fn parse_block(&mut self) -> Block {
        let left_brace = self.expect_value("{", "to start a block statement");
        let mut statements = Vec::new();
        while !self.is_eof() && !self.check_value("}") {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            } else {
                self.advance();
            }
        }
        let right_brace = self.expect_value("}", "to end a block statement");
        Block {
            statements,
            span: Span::new(left_brace.span().start, right_brace.span().end),
        }
    }

    /// Parses an optional accessor followed by zero or more modifiers.
    pub(super) fn parse_modifier(&mut self) -> ModifierStatement {
        let start = self
            .peek()
            .map_or(self.last_token.span(), Token::span)
            .start;
        let mut accessor = Accessor::default();
        if self
            .peek()
            .is_some_and(|token| syntax::is_accessor(token.text()))
        {
            if let Some(token) = self.advance() {
                accessor = Accessor::from_keyword(token.text()).unwrap_or_default();
            }
        }
        let mut modifiers = Modifiers::NONE;
        let mut end = start;
        while self
            .peek()
            .is_some_and(|token| syntax::is_modifier(token.text()))
        {
            if let Some(token) = self.advance() {
                modifiers.insert(Modifiers::from_keyword(token.text()).unwrap_or(Modifiers::NONE));
                end = token.span().end;
            }
        }
        ModifierStatement {
            accessor,
            modifiers,
            span: Span::new(start, end),
        }
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression()?;
        let semicolon = self.expect_value(";", "after expression statement");
        let span = Span::new(expression.span().start, semicolon.span().end);
        Some(Statement::Expression { expression, span })
    }

    // ── Control flow ─────────────────────────────────────────────────────

    /// Parses `if cond { } elif cond { } ... else { }`.
    ///
    /// `elif` arms are accepted only before `else`; a later `elif` starts a
    /// fresh statement and surfaces its own diagnostic.
    fn parse_if(&mut self) -> Option<IfConditional> {
        self.expect_value("if", "to start if conditional");
        let condition = self.parse_expression()?;
        let then_branch = self.parse_block();

        let mut elif_branches = Vec::new();
        while self.match_value("elif") {
            let elif_condition = self.parse_expression()?;
            let elif_then = self.parse_block();
            let span = Span::new(elif_condition.span().start, elif_then.span.end);
            elif_branches.push(IfConditional {
                condition: elif_condition,
                then_branch: elif_then,
                elif_branches: Vec::new(),
                else_branch: None,
                span,
            });
        }

        let else_branch = if self.match_value("else") {
            Some(self.parse_block())
        } else {
            None
        };

        let end = else_branch.as_ref().map_or_else(
            || {
                elif_branches
                    .last()
                    .map_or(then_branch.span.end, |elif| elif.span.end)
            },
            |block| block.span.end,
        );
        let span = Span::new(condition.span().start, end);
        Some(IfConditional {
            condition,
            then_branch,
            elif_branches,
            else_branch,
            span,
        })
    }

    /// Parses `switch expr { case expr { } ... default { } }`.
    fn parse_switch(&mut self) -> Option<SwitchConditional> {
        self.expect_value("switch", "to start switch conditional");
        let scrutinee = self.parse_expression()?;
        self.expect_value("{", "after switch expression in switch conditional");

        let mut cases = Vec::new();
        while !self.is_eof() && !self.check_value("}") {
            if self.match_value("default") {
                let block = self.parse_block();
                cases.push(SwitchCase {
                    expression: None,
                    span: block.span,
                    block,
                });
                continue;
            }
            self.expect_value("case", "to start switch case");
            let Some(case_expression) = self.parse_expression() else {
                break;
            };
            let block = self.parse_block();
            cases.push(SwitchCase {
                span: Span::new(case_expression.span().start, block.span.end),
                expression: Some(case_expression),
                block,
            });
        }
        self.expect_value("}", "to end switch conditional");

        let end = cases.last().map_or(scrutinee.span().end, |case| case.span.end);
        Some(SwitchConditional {
            span: Span::new(scrutinee.span().start, end),
            scrutinee,
            cases,
        })
    }

    fn parse_while(&mut self) -> Option<WhileConditional> {
        self.expect_value("while", "to start while conditional");
        let condition = self.parse_expression()?;
        let body = self.parse_block();
        let span = Span::new(condition.span().start, body.span.end);
        Some(WhileConditional {
            condition,
            body,
            span,
        })
    }

    /// Parses the three `for` shapes: C-style, for-each, and range.
    fn parse_for(&mut self) -> Option<ForConditional> {
        self.expect_value("for", "to start for conditional");
        self.expect_value("(", "after 'for' in for conditional");

        if self.check_value("let") {
            // C-style: for (let i: T = ...; cond; increment) { }
            let initializer = self.parse_variable(true, true);
            let condition = self.parse_expression()?;
            self.expect_value(";", "after for loop condition");
            let mut increment = None;
            if !self.match_value(")") {
                increment = self.parse_expression();
                self.expect_value(")", "after for loop increment");
            }
            let body = self.parse_block();
            let span = Span::new(initializer.span.start, body.span.end);
            return Some(ForConditional {
                initializer: Some(initializer),
                condition: Some(condition),
                increment,
                body,
                span,
            });
        }

        if self.check_token(TokenKind::Identifier)
            && self.look(1).is_some_and(|token| token.text() == ":")
        {
            // For-each: for (name: T in iterable) { }
            // The iterable rides in the increment slot.
            let initializer = self.parse_variable(false, false);
            self.expect_value("in", "after for-each variable declaration");
            let iterable = self.parse_expression()?;
            self.expect_value(")", "after for-each iterable expression");
            let body = self.parse_block();
            let span = Span::new(initializer.span.start, body.span.end);
            return Some(ForConditional {
                initializer: Some(initializer),
                condition: None,
                increment: Some(iterable),
                body,
                span,
            });
        }

        // Range: for (range-expr) { }
        let condition = self.parse_expression()?;
        self.expect_value(")", "after for-range condition");
        let body = self.parse_block();
        let span = Span::new(condition.span().start, body.span.end);
        Some(ForConditional {
            initializer: None,
            condition: Some(condition),
            increment: None,
            body,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use crate::source_analysis::lex;

    pub(super) fn parse_ok(source: &str) -> Program {
        let (tokens, lex_diagnostics) = lex(source, "<test>");
        assert!(lex_diagnostics.is_empty(), "lexer: {lex_diagnostics:?}");
        let (program, diagnostics) = parse(tokens, source, "<test>");
        assert!(
            diagnostics.is_empty(),
            "expected no diagnostics, got: {diagnostics:?}"
        );
        program
    }

    pub(super) fn parse_err(source: &str) -> (Program, Vec<Diagnostic>) {
        let (tokens, _) = lex(source, "<test>");
        parse(tokens, source, "<test>")
    }

    #[test]
    fn empty_program() {
        let program = parse_ok("");
        assert!(program.statements.is_empty());
    }

    #[test]
    fn bare_return() {
        let program = parse_ok("fn f() { return; }");
        let Statement::Declaration(Declaration::Function(func)) = &program.statements[0] else {
            panic!("expected function");
        };
        assert!(matches!(
            func.body.statements[0],
            Statement::Return {
                expression: None,
                ..
            }
        ));
    }

    #[test]
    fn while_loop_with_break_and_continue() {
        let program = parse_ok("while true { break; continue; }");
        let Statement::Conditional(Conditional::While(while_cond)) = &program.statements[0] else {
            panic!("expected while");
        };
        assert!(matches!(
            while_cond.condition,
            Expression::Literal {
                kind: crate::ast::LiteralKind::Boolean,
                ..
            }
        ));
        assert_eq!(while_cond.body.statements.len(), 2);
        assert!(matches!(
            while_cond.body.statements[0],
            Statement::Break { .. }
        ));
        assert!(matches!(
            while_cond.body.statements[1],
            Statement::Continue { .. }
        ));
    }

    #[test]
    fn if_with_elif_and_else() {
        let program = parse_ok("if a { } elif b { } elif c { } else { }");
        let Statement::Conditional(Conditional::If(if_cond)) = &program.statements[0] else {
            panic!("expected if");
        };
        assert_eq!(if_cond.elif_branches.len(), 2);
        assert!(if_cond.else_branch.is_some());
    }

    #[test]
    fn elif_after_else_is_not_absorbed() {
        let (program, diagnostics) = parse_err("if a { } else { } elif b { }");
        let Statement::Conditional(Conditional::If(if_cond)) = &program.statements[0] else {
            panic!("expected if");
        };
        assert!(if_cond.elif_branches.is_empty());
        assert!(if_cond.else_branch.is_some());
        // The stray `elif` starts a fresh (failing) statement.
        assert!(!diagnostics.is_empty());
    }

    #[test]
    fn switch_with_cases_and_default() {
        let program = parse_ok("switch x { case 1 { } case 2 { } default { } }");
        let Statement::Conditional(Conditional::Switch(switch_cond)) = &program.statements[0]
        else {
            panic!("expected switch");
        };
        assert_eq!(switch_cond.cases.len(), 3);
        assert!(switch_cond.cases[0].expression.is_some());
        assert!(switch_cond.cases[2].expression.is_none());
    }

    #[test]
    fn c_style_for() {
        let program = parse_ok("for (let i: i32 = 0; i < 10; i = i + 1) { }");
        let Statement::Conditional(Conditional::For(for_cond)) = &program.statements[0] else {
            panic!("expected for");
        };
        assert!(for_cond.initializer.is_some());
        assert!(for_cond.condition.is_some());
        assert!(for_cond.increment.is_some());
        assert!(for_cond.body.statements.is_empty());
    }

    #[test]
    fn for_each_stores_iterable_in_increment_slot() {
        let program = parse_ok("for (item: i32 in items) { }");
        let Statement::Conditional(Conditional::For(for_cond)) = &program.statements[0] else {
            panic!("expected for");
        };
        let initializer = for_cond.initializer.as_ref().unwrap();
        assert_eq!(initializer.identifier.name, "item");
        assert!(for_cond.condition.is_none());
        assert!(matches!(
            for_cond.increment,
            Some(Expression::Identifier(ref id)) if id.name == "items"
        ));
    }

    #[test]
    fn range_for() {
        let program = parse_ok("for (0..10) { }");
        let Statement::Conditional(Conditional::For(for_cond)) = &program.statements[0] else {
            panic!("expected for");
        };
        assert!(for_cond.initializer.is_none());
        assert!(for_cond.increment.is_none());
        assert!(matches!(
            for_cond.condition,
            Some(Expression::Binary { ref op, .. }) if op == ".."
        ));
    }

    #[test]
    fn recovery_produces_diagnostic_and_continues() {
        // The failing primary consumes one `]` and the top-level loop skips
        // the other before retrying at `let`.
        let (program, diagnostics) = parse_err("] ] let x: i32 = 1;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Unexpected token");
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(
            program.statements[0],
            Statement::Declaration(Declaration::Variable(_))
        ));
    }

    #[test]
    fn missing_semicolon_is_reported_but_parsing_continues() {
        let (program, diagnostics) = parse_err("let x: i32 = 1 let y: i32 = 2;");
        assert!(diagnostics.iter().any(|d| d.level == Level::Error));
        assert!(!program.statements.is_empty());
    }

    #[test]
    fn statement_spans_cover_children() {
        let program = parse_ok("while true { break; }");
        let statement = &program.statements[0];
        let outer = statement.span();
        crate::ast::walk_statement(
            statement,
            &mut |inner| assert!(outer.contains(inner.span())),
            &mut |expr| assert!(outer.contains(expr.span())),
        );
    }

    #[test]
    fn program_span_covers_all_statements() {
        let program = parse_ok("let a: i32 = 1;\nlet b: i32 = 2;");
        assert_eq!(program.statements.len(), 2);
        for statement in &program.statements {
            assert!(program.span.contains(statement.span()));
        }
    }
}
