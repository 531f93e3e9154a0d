// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing: variables, functions, records, classes.

use crate::ast::{
    ClassDeclaration, Expression, FunctionDeclaration, Identifier, LiteralKind, RecordDeclaration,
    VariableDeclaration,
};
use crate::modifier::Modifiers;

use super::{syntax, Parser, Span, Token, TokenKind};

impl Parser {
    /// Parses a type annotation after its leading identifier token:
    /// either a plain type name, or `name[size]` / `name[]` where empty
    /// brackets record the size as the literal `-1` ("unsized").
    fn parse_type_suffix(&mut self, type_token: &Token) -> Expression {
        if self.match_value("[") {
            let size = if self.check_value("]") {
                Expression::Literal {
                    value: "-1".into(),
                    kind: LiteralKind::Integer,
                    span: type_token.span(),
                }
            } else {
                self.parse_expression().unwrap_or(Expression::Literal {
                    value: "-1".into(),
                    kind: LiteralKind::Integer,
                    span: type_token.span(),
                })
            };
            self.expect_value("]", "after array size in variable declaration");
            Expression::ArrayIdentifier {
                name: type_token.text().into(),
                size: Box::new(size),
                span: type_token.span(),
            }
        } else {
            Expression::Identifier(Identifier::new(type_token.text(), type_token.span()))
        }
    }

    /// Parses a variable declaration.
    ///
    /// `verbose` expects a leading `let`; `semicolon` expects a trailing `;`.
    /// Parameters and for-each bindings are parsed with both off.
    ///
    /// A missing `:` before an identifier-looking type annotation is a
    /// recoverable warning: the colon is assumed to have been intended.
    pub(super) fn parse_variable(&mut self, verbose: bool, semicolon: bool) -> VariableDeclaration {
        if verbose {
            self.expect_value("let", "");
        }

        let mut modifier = self.parse_modifier();

        let identifier_token =
            self.expect_token(TokenKind::Identifier, "after 'let' in variable declaration");
        let identifier = Identifier::new(identifier_token.text(), identifier_token.span());

        let ty;
        let fallback_end;
        if self.match_value(":") {
            let type_token =
                self.expect_token(TokenKind::Identifier, "after ':' in variable declaration");
            ty = self.parse_type_suffix(&type_token);
            fallback_end = ty.span().end;
            if self.match_value("?") {
                modifier.modifiers.insert(Modifiers::NULLABLE);
            }
        } else if self.check_token(TokenKind::Identifier) {
            let span = self.peek().map_or(Span::default(), Token::span);
            self.warning(
                "Type annotation missing ':' in variable declaration",
                "Assuming type annotation is present before type name",
                span,
            );
            let type_token = self
                .advance()
                .unwrap_or_else(|| self.last_token.clone());
            ty = self.parse_type_suffix(&type_token);
            fallback_end = ty.span().end;
        } else {
            if self.match_value("?") {
                modifier.modifiers.insert(Modifiers::NULLABLE);
            }
            // No annotation: synthesize `void`, anchored (empty) at the
            // identifier so the node stays inside the declaration's span.
            let anchor = identifier_token.span().end;
            ty = Expression::Identifier(Identifier::new("void", Span::new(anchor, anchor)));
            fallback_end = identifier_token.span().end;
        }

        let initializer = if self.match_value("=") {
            self.parse_expression()
        } else {
            None
        };
        if semicolon {
            self.expect_value(";", "after variable declaration");
        }

        let end = initializer
            .as_ref()
            .map_or(fallback_end, |init| init.span().end);
        VariableDeclaration {
            span: Span::new(identifier_token.span().start, end),
            identifier,
            ty,
            modifier,
            initializer,
        }
    }

    /// Parses a function declaration, including its modifier prefix.
    pub(super) fn parse_function(&mut self) -> FunctionDeclaration {
        let mut modifier = self.parse_modifier();
        self.expect_value("fn", "to start function declaration");

        if self
            .peek()
            .is_some_and(|token| syntax::is_accessor(token.text()))
        {
            let span = self.peek().map_or(Span::default(), Token::span);
            self.error(
                "Invalid accessor position for function",
                "Function accessors are positioned before the 'fn' keyword",
                span,
            );
        }

        // Constructors may omit the name: `init fn (...) { }`.
        let identifier = if modifier.modifiers.contains(Modifiers::INIT)
            && !self.check_token(TokenKind::Identifier)
        {
            let anchor = self.last_token.span().end;
            Identifier::new("init", Span::new(anchor, anchor))
        } else {
            let token =
                self.expect_token(TokenKind::Identifier, "after 'fn' in function declaration");
            Identifier::new(token.text(), token.span())
        };

        if self.match_value("?") {
            modifier.modifiers.insert(Modifiers::NULLABLE);
        }

        self.expect_value("(", "after function name in function declaration");
        let mut parameters = Vec::new();
        if !self.match_value(")") {
            loop {
                parameters.push(self.parse_variable(false, false));
                if !self.match_value(",") {
                    break;
                }
            }
            self.expect_value(")", "after function parameters in function declaration");
        }

        let anchor = self.last_token.span().end;
        let mut ty = Expression::Identifier(Identifier::new("void", Span::new(anchor, anchor)));
        if self.match_value(":") {
            let type_token =
                self.expect_token(TokenKind::Identifier, "after ':' in function declaration");
            ty = self.parse_type_suffix(&type_token);
        } else if self.check_token(TokenKind::Identifier) {
            let span = Span::new(
                self.last_token.span().end,
                self.peek().map_or(self.last_token.span(), Token::span).end,
            );
            self.warning(
                "Type annotation missing ':' in function declaration",
                "Assuming type annotation is present before type name",
                span,
            );
            let type_token =
                self.expect_token(TokenKind::Identifier, "after ':' in function declaration");
            ty = self.parse_type_suffix(&type_token);
        }

        let body = self.parse_block();
        let span = Span::new(identifier.span.start, body.span.end);
        FunctionDeclaration {
            identifier,
            ty,
            modifier,
            parameters,
            body,
            span,
        }
    }

    /// Parses a record declaration: fields only.
    pub(super) fn parse_record(&mut self) -> RecordDeclaration {
        self.expect_value("rec", "");
        let modifier = self.parse_modifier();
        let identifier_token =
            self.expect_token(TokenKind::Identifier, "after 'rec' in record declaration");
        let identifier = Identifier::new(identifier_token.text(), identifier_token.span());

        self.expect_value("{", "after record name in record declaration");
        let mut fields = Vec::new();
        while !self.is_eof() && !self.check_value("}") {
            fields.push(self.parse_variable(false, true));
        }
        self.expect_value("}", "after record fields in record declaration");

        let ty = Expression::Identifier(Identifier::new(
            identifier_token.text(),
            identifier_token.span(),
        ));
        let span = Span::new(identifier_token.span().start, self.last_token.span().end);
        RecordDeclaration {
            identifier,
            ty,
            modifier,
            fields,
            span,
        }
    }

    /// Parses a class declaration: fields and methods.
    ///
    /// Members are disambiguated by scanning ahead over a run of accessors
    /// and modifiers; if the next significant token is `fn` the member is a
    /// method, otherwise a field.
    pub(super) fn parse_class(&mut self) -> ClassDeclaration {
        self.expect_value("cls", "");
        let modifier = self.parse_modifier();
        let identifier_token =
            self.expect_token(TokenKind::Identifier, "after 'class' in class declaration");
        let identifier = Identifier::new(identifier_token.text(), identifier_token.span());

        self.expect_value("{", "after class name in class declaration");
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.is_eof() && !self.check_value("}") {
            let mut offset = 0;
            while self.look(offset).is_some_and(|token| {
                syntax::is_accessor(token.text()) || syntax::is_modifier(token.text())
            }) {
                offset += 1;
            }
            if self
                .look(offset)
                .is_some_and(|token| token.text() == "fn")
            {
                methods.push(self.parse_function());
            } else {
                fields.push(self.parse_variable(false, true));
            }
        }
        self.expect_value("}", "after class fields and methods in class declaration");

        let ty = Expression::Identifier(Identifier::new(
            identifier_token.text(),
            identifier_token.span(),
        ));
        let span = Span::new(identifier_token.span().start, self.last_token.span().end);
        ClassDeclaration {
            identifier,
            ty,
            modifier,
            fields,
            methods,
            span,
        }
    }
}
