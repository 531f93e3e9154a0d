// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing: an explicit precedence-climbing ladder.
//!
//! Each level parses its operands at the next-tighter level and loops on its
//! own operators, so associativity falls out of the loop direction:
//! left-associative levels iterate, the right-associative assignment level
//! recurses. A failed primary returns `None`; the failure propagates up the
//! ladder and the statement layer drops the fragment.

use crate::ast::{Expression, Identifier, LiteralKind};

use super::{Parser, Span, TokenKind};

impl Parser {
    /// Parses any expression. Returns `None` when no expression could be
    /// formed; a diagnostic has already been emitted in that case.
    pub(super) fn parse_expression(&mut self) -> Option<Expression> {
        self.parse_assignment()
    }

    /// Level 0: assignment, right-associative.
    fn parse_assignment(&mut self) -> Option<Expression> {
        let expr = self.parse_logical_or()?;
        if self.match_value("=") {
            let right = self.parse_expression()?;
            let span = Span::new(expr.span().start, right.span().end);
            return Some(Expression::Binary {
                left: Box::new(expr),
                op: "=".into(),
                right: Box::new(right),
                span,
            });
        }
        Some(expr)
    }

    /// Builds a left-associative binary node.
    fn binary(left: Expression, op: ecow::EcoString, right: Expression) -> Expression {
        let span = Span::new(left.span().start, right.span().end);
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span,
        }
    }

    /// Level 1: logical or.
    fn parse_logical_or(&mut self) -> Option<Expression> {
        let mut expr = self.parse_logical_and()?;
        while self.match_value("||") {
            let op = self.last_token_text();
            let right = self.parse_logical_and()?;
            expr = Self::binary(expr, op, right);
        }
        Some(expr)
    }

    /// Level 2: logical and.
    fn parse_logical_and(&mut self) -> Option<Expression> {
        let mut expr = self.parse_equality()?;
        while self.match_value("&&") {
            let op = self.last_token_text();
            let right = self.parse_equality()?;
            expr = Self::binary(expr, op, right);
        }
        Some(expr)
    }

    /// Level 3: equality.
    fn parse_equality(&mut self) -> Option<Expression> {
        let mut expr = self.parse_comparison()?;
        while self.match_any(&["==", "!="]) {
            let op = self.last_token_text();
            let right = self.parse_comparison()?;
            expr = Self::binary(expr, op, right);
        }
        Some(expr)
    }

    /// Level 4: comparison, including the range operators.
    fn parse_comparison(&mut self) -> Option<Expression> {
        let mut expr = self.parse_term()?;
        while self.match_any(&["<", ">", "<=", ">=", "..", "..."]) {
            let op = self.last_token_text();
            let right = self.parse_term()?;
            expr = Self::binary(expr, op, right);
        }
        Some(expr)
    }

    /// Level 5: additive.
    fn parse_term(&mut self) -> Option<Expression> {
        let mut expr = self.parse_factor()?;
        while self.match_any(&["+", "-"]) {
            let op = self.last_token_text();
            let right = self.parse_factor()?;
            expr = Self::binary(expr, op, right);
        }
        Some(expr)
    }

    /// Level 6: multiplicative.
    fn parse_factor(&mut self) -> Option<Expression> {
        let mut expr = self.parse_unary()?;
        while self.match_any(&["*", "/", "%"]) {
            let op = self.last_token_text();
            let right = self.parse_unary()?;
            expr = Self::binary(expr, op, right);
        }
        Some(expr)
    }

    /// Level 7: prefix unary.
    fn parse_unary(&mut self) -> Option<Expression> {
        if self.match_any(&["!", "-"]) {
            let op = self.last_token_text();
            let op_start = self.last_token_span().start;
            let operand = self.parse_unary()?;
            let span = Span::new(op_start, operand.span().end);
            return Some(Expression::Unary {
                op,
                operand: Box::new(operand),
                prefix: true,
                span,
            });
        }
        self.parse_postfix()
    }

    /// Level 8: postfix — calls, `++`/`--`, attribute access, indexing —
    /// applied repeatedly, left-associatively.
    fn parse_postfix(&mut self) -> Option<Expression> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_value("(") {
                let mut arguments = Vec::new();
                if !self.check_value(")") {
                    loop {
                        arguments.push(self.parse_expression()?);
                        if !self.match_value(",") {
                            break;
                        }
                    }
                }
                let right_paren = self.expect_value(")", "after function call arguments");
                let span = Span::new(expr.span().start, right_paren.span().end);
                expr = Expression::Call {
                    callee: Box::new(expr),
                    arguments,
                    span,
                };
            } else if self.match_any(&["++", "--"]) {
                let span = Span::new(expr.span().start, self.last_token_span().end);
                expr = Expression::Unary {
                    op: self.last_token_text(),
                    operand: Box::new(expr),
                    prefix: false,
                    span,
                };
            } else if self.match_value(".") {
                let attribute = self.parse_expression()?;
                let span = Span::new(expr.span().start, attribute.span().end);
                expr = Expression::Attribute {
                    object: Box::new(expr),
                    attribute: Box::new(attribute),
                    span,
                };
            } else if self.match_value("[") {
                let index = self.parse_expression()?;
                self.expect_value("]", "after index expression");
                let span = Span::new(expr.span().start, index.span().end);
                expr = Expression::Index {
                    array: Box::new(expr),
                    index: Box::new(index),
                    span,
                };
            } else {
                break;
            }
        }
        Some(expr)
    }

    /// Level 9: primary — literals, `this`, identifiers, parenthesized
    /// expressions, and array literals.
    ///
    /// On failure: emits "Unexpected token", advances one token, and returns
    /// `None` so the statement layer can drop the fragment.
    fn parse_primary(&mut self) -> Option<Expression> {
        if self.match_value("true") || self.match_value("false") {
            return Some(self.literal_from_last(LiteralKind::Boolean));
        }
        if self.match_value("null") {
            return Some(self.literal_from_last(LiteralKind::Null));
        }
        if self.match_value("this") {
            return Some(Expression::Identifier(Identifier::new(
                self.last_token_text(),
                self.last_token_span(),
            )));
        }
        if self.match_token(TokenKind::Integer) {
            return Some(self.literal_from_last(LiteralKind::Integer));
        }
        if self.match_token(TokenKind::Float) {
            return Some(self.literal_from_last(LiteralKind::Float));
        }
        if self.match_token(TokenKind::String) {
            return Some(self.literal_from_last(LiteralKind::String));
        }
        if self.match_token(TokenKind::Character) {
            return Some(self.literal_from_last(LiteralKind::Character));
        }
        if self.match_token(TokenKind::Identifier) {
            return Some(Expression::Identifier(Identifier::new(
                self.last_token_text(),
                self.last_token_span(),
            )));
        }
        if self.match_value("(") {
            let expr = self.parse_expression()?;
            self.expect_value(")", "after expression");
            return Some(expr);
        }
        if self.match_value("[") {
            let start = self.last_token_span().start;
            let mut elements = Vec::new();
            if !self.check_value("]") {
                loop {
                    elements.push(self.parse_expression()?);
                    if !self.match_value(",") {
                        break;
                    }
                }
            }
            let right_bracket = self.expect_value("]", "after array elements");
            return Some(Expression::Array {
                elements,
                span: Span::new(start, right_bracket.span().end),
            });
        }

        if self.is_eof() {
            return None;
        }
        let span = self.peek().map_or(Span::default(), |token| token.span());
        self.error("Unexpected token", "Expected primary expression", span);
        self.advance();
        None
    }

    fn literal_from_last(&self, kind: LiteralKind) -> Expression {
        Expression::Literal {
            value: self.last_token_text(),
            kind,
            span: self.last_token_span(),
        }
    }

    fn last_token_text(&self) -> ecow::EcoString {
        self.last_token.text().into()
    }

    fn last_token_span(&self) -> Span {
        self.last_token.span()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_ok};
    use crate::ast::{Expression, LiteralKind, Statement};

    fn expression(source: &str) -> Expression {
        let program = parse_ok(source);
        match program.statements.into_iter().next() {
            Some(Statement::Expression { expression, .. }) => expression,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn identifier_name(expr: &Expression) -> &str {
        match expr {
            Expression::Identifier(id) => &id.name,
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn literal_kinds() {
        assert!(matches!(
            expression("42;"),
            Expression::Literal {
                kind: LiteralKind::Integer,
                ..
            }
        ));
        assert!(matches!(
            expression("2.5;"),
            Expression::Literal {
                kind: LiteralKind::Float,
                ..
            }
        ));
        assert!(matches!(
            expression("\"hi\";"),
            Expression::Literal {
                kind: LiteralKind::String,
                ..
            }
        ));
        assert!(matches!(
            expression("'c';"),
            Expression::Literal {
                kind: LiteralKind::Character,
                ..
            }
        ));
        assert!(matches!(
            expression("true;"),
            Expression::Literal {
                kind: LiteralKind::Boolean,
                ..
            }
        ));
        assert!(matches!(
            expression("null;"),
            Expression::Literal {
                kind: LiteralKind::Null,
                ..
            }
        ));
    }

    #[test]
    fn this_is_an_identifier() {
        let expr = expression("this;");
        assert_eq!(identifier_name(&expr), "this");
    }

    #[test]
    fn precedence_climbing_shapes_the_tree() {
        // a + b * c - d / e  parses as  (a + (b * c)) - (d / e)
        let expr = expression("a + b * c - d / e;");
        let Expression::Binary {
            left, op, right, ..
        } = &expr
        else {
            panic!("expected binary root");
        };
        assert_eq!(op, "-");

        let Expression::Binary {
            left: a,
            op: plus,
            right: b_times_c,
            ..
        } = left.as_ref()
        else {
            panic!("expected + on the left");
        };
        assert_eq!(plus, "+");
        assert_eq!(identifier_name(a), "a");
        assert!(matches!(
            b_times_c.as_ref(),
            Expression::Binary { op, .. } if op == "*"
        ));

        assert!(matches!(
            right.as_ref(),
            Expression::Binary { op, .. } if op == "/"
        ));
    }

    #[test]
    fn left_associative_subtraction() {
        // a - b - c  parses as  (a - b) - c
        let expr = expression("a - b - c;");
        let Expression::Binary { left, right, .. } = &expr else {
            panic!("expected binary root");
        };
        assert!(matches!(left.as_ref(), Expression::Binary { .. }));
        assert_eq!(identifier_name(right), "c");
    }

    #[test]
    fn assignment_is_right_associative() {
        // a = b = c  parses as  a = (b = c)
        let expr = expression("a = b = c;");
        let Expression::Binary { left, op, right, .. } = &expr else {
            panic!("expected binary root");
        };
        assert_eq!(op, "=");
        assert_eq!(identifier_name(left), "a");
        assert!(matches!(
            right.as_ref(),
            Expression::Binary { op, .. } if op == "="
        ));
    }

    #[test]
    fn logical_operators_bind_loosest() {
        // a == b && c < d  parses as  (a == b) && (c < d)
        let expr = expression("a == b && c < d;");
        let Expression::Binary { left, op, right, .. } = &expr else {
            panic!("expected binary root");
        };
        assert_eq!(op, "&&");
        assert!(matches!(
            left.as_ref(),
            Expression::Binary { op, .. } if op == "=="
        ));
        assert!(matches!(
            right.as_ref(),
            Expression::Binary { op, .. } if op == "<"
        ));
    }

    #[test]
    fn range_operator_at_comparison_level() {
        let expr = expression("0..n + 1;");
        let Expression::Binary { op, right, .. } = &expr else {
            panic!("expected binary root");
        };
        assert_eq!(op, "..");
        assert!(matches!(
            right.as_ref(),
            Expression::Binary { op, .. } if op == "+"
        ));
    }

    #[test]
    fn prefix_unary_nests() {
        let expr = expression("!-x;");
        let Expression::Unary {
            op,
            operand,
            prefix: true,
            ..
        } = &expr
        else {
            panic!("expected prefix unary");
        };
        assert_eq!(op, "!");
        assert!(matches!(
            operand.as_ref(),
            Expression::Unary { prefix: true, op, .. } if op == "-"
        ));
    }

    #[test]
    fn postfix_increment() {
        let expr = expression("x++;");
        assert!(matches!(
            expr,
            Expression::Unary {
                prefix: false,
                ref op,
                ..
            } if op == "++"
        ));
    }

    #[test]
    fn call_with_arguments() {
        let expr = expression("f(1, x);");
        let Expression::Call {
            callee, arguments, ..
        } = &expr
        else {
            panic!("expected call");
        };
        assert_eq!(identifier_name(callee), "f");
        assert_eq!(arguments.len(), 2);
    }

    #[test]
    fn chained_postfix_is_left_associative() {
        let expr = expression("f(1)(2);");
        let Expression::Call { callee, .. } = &expr else {
            panic!("expected call");
        };
        assert!(matches!(callee.as_ref(), Expression::Call { .. }));
    }

    #[test]
    fn attribute_access() {
        let expr = expression("p.x;");
        let Expression::Attribute {
            object, attribute, ..
        } = &expr
        else {
            panic!("expected attribute");
        };
        assert_eq!(identifier_name(object), "p");
        assert_eq!(identifier_name(attribute), "x");
    }

    #[test]
    fn method_call_attribute() {
        let expr = expression("obj.method(1);");
        let Expression::Attribute { attribute, .. } = &expr else {
            panic!("expected attribute");
        };
        assert!(matches!(attribute.as_ref(), Expression::Call { .. }));
    }

    #[test]
    fn index_expression() {
        let expr = expression("xs[0];");
        let Expression::Index { array, index, .. } = &expr else {
            panic!("expected index");
        };
        assert_eq!(identifier_name(array), "xs");
        assert!(matches!(
            index.as_ref(),
            Expression::Literal {
                kind: LiteralKind::Integer,
                ..
            }
        ));
    }

    #[test]
    fn array_literal() {
        let expr = expression("[1, 2, 3];");
        let Expression::Array { elements, .. } = &expr else {
            panic!("expected array literal");
        };
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn empty_array_literal() {
        let expr = expression("[];");
        assert!(matches!(
            expr,
            Expression::Array { ref elements, .. } if elements.is_empty()
        ));
    }

    #[test]
    fn parenthesized_grouping() {
        // (a + b) * c  keeps + below *
        let expr = expression("(a + b) * c;");
        let Expression::Binary { left, op, .. } = &expr else {
            panic!("expected binary root");
        };
        assert_eq!(op, "*");
        assert!(matches!(
            left.as_ref(),
            Expression::Binary { op, .. } if op == "+"
        ));
    }

    #[test]
    fn unexpected_token_emits_diagnostic() {
        let (_, diagnostics) = parse_err("};");
        assert!(diagnostics
            .iter()
            .any(|d| d.message == "Unexpected token" && d.help == "Expected primary expression"));
    }

    #[test]
    fn expression_spans_cover_operands() {
        let expr = expression("a + b * c;");
        let outer = expr.span();
        crate::ast::walk_expression(&expr, &mut |child| {
            assert!(outer.contains(child.span()));
        });
    }
}
