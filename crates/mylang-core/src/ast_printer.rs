// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Indented tree dump of the AST.
//!
//! A debugging aid: renders every node as a labelled line, two spaces of
//! indentation per level. The driver prints this under `--debug`.

use crate::ast::{
    Block, Conditional, Declaration, Expression, FunctionDeclaration, IfConditional,
    ModifierStatement, Program, Statement, VariableDeclaration,
};
use crate::modifier::Modifiers;

/// Renders the program as an indented tree.
#[must_use]
pub fn print_program(program: &Program) -> String {
    let mut printer = TreePrinter::default();
    printer.line("Program");
    printer.nest(|p| {
        for statement in &program.statements {
            p.statement(statement);
        }
    });
    printer.out
}

#[derive(Default)]
struct TreePrinter {
    out: String,
    indent: usize,
}

impl TreePrinter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nest(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn labelled(&mut self, label: &str, f: impl FnOnce(&mut Self)) {
        self.line(label);
        self.nest(f);
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Return { expression, span: _ } => {
                self.labelled("ReturnStatement", |p| match expression {
                    Some(expression) => p.expression(expression),
                    None => p.line("(empty)"),
                });
            }
            Statement::Break { .. } => self.line("BreakStatement"),
            Statement::Continue { .. } => self.line("ContinueStatement"),
            Statement::Expression { expression, .. } => {
                self.labelled("ExpressionStatement", |p| p.expression(expression));
            }
            Statement::Block(block) => self.block("BlockStatement", block),
            Statement::Modifier(modifier) => self.modifier(modifier),
            Statement::Declaration(declaration) => self.declaration(declaration),
            Statement::Conditional(conditional) => self.conditional(conditional),
        }
    }

    fn block(&mut self, label: &str, block: &Block) {
        self.labelled(label, |p| {
            if block.statements.is_empty() {
                p.line("(empty)");
            } else {
                for statement in &block.statements {
                    p.statement(statement);
                }
            }
        });
    }

    fn modifier(&mut self, modifier: &ModifierStatement) {
        let mut text = format!("Modifier: {}", modifier.accessor.as_str());
        for (flag, name) in [
            (Modifiers::STATIC, "static"),
            (Modifiers::CONSTANT, "const"),
            (Modifiers::ARRAY, "array"),
            (Modifiers::INIT, "init"),
            (Modifiers::NULLABLE, "nullable"),
        ] {
            if modifier.modifiers.contains(flag) {
                text.push(' ');
                text.push_str(name);
            }
        }
        self.line(&text);
    }

    fn variable(&mut self, decl: &VariableDeclaration) {
        self.labelled("VariableDeclaration", |p| {
            p.line(&format!("Identifier: {}", decl.identifier.name));
            p.modifier(&decl.modifier);
            p.labelled("Type:", |p| p.expression(&decl.ty));
            if let Some(initializer) = &decl.initializer {
                p.labelled("Initializer:", |p| p.expression(initializer));
            }
        });
    }

    fn function(&mut self, decl: &FunctionDeclaration) {
        self.labelled("FunctionDeclaration", |p| {
            p.line(&format!("Identifier: {}", decl.identifier.name));
            p.modifier(&decl.modifier);
            p.labelled("ReturnType:", |p| p.expression(&decl.ty));
            p.labelled("Parameters:", |p| {
                if decl.parameters.is_empty() {
                    p.line("(empty)");
                } else {
                    for parameter in &decl.parameters {
                        p.variable(parameter);
                    }
                }
            });
            p.block("Body:", &decl.body);
        });
    }

    fn declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Variable(decl) => self.variable(decl),
            Declaration::Function(decl) => self.function(decl),
            Declaration::Record(decl) => {
                self.labelled("RecordDeclaration", |p| {
                    p.line(&format!("Identifier: {}", decl.identifier.name));
                    p.labelled("Fields:", |p| {
                        if decl.fields.is_empty() {
                            p.line("(empty)");
                        } else {
                            for field in &decl.fields {
                                p.variable(field);
                            }
                        }
                    });
                });
            }
            Declaration::Class(decl) => {
                self.labelled("ClassDeclaration", |p| {
                    p.line(&format!("Identifier: {}", decl.identifier.name));
                    p.labelled("Fields:", |p| {
                        if decl.fields.is_empty() {
                            p.line("(empty)");
                        } else {
                            for field in &decl.fields {
                                p.variable(field);
                            }
                        }
                    });
                    p.labelled("Methods:", |p| {
                        if decl.methods.is_empty() {
                            p.line("(empty)");
                        } else {
                            for method in &decl.methods {
                                p.function(method);
                            }
                        }
                    });
                });
            }
        }
    }

    fn if_conditional(&mut self, cond: &IfConditional) {
        self.labelled("IfConditional", |p| {
            p.labelled("Condition:", |p| p.expression(&cond.condition));
            p.block("Then:", &cond.then_branch);
            for elif in &cond.elif_branches {
                p.labelled("Elif:", |p| p.if_conditional(elif));
            }
            if let Some(else_branch) = &cond.else_branch {
                p.block("Else:", else_branch);
            }
        });
    }

    fn conditional(&mut self, conditional: &Conditional) {
        match conditional {
            Conditional::If(cond) => self.if_conditional(cond),
            Conditional::Switch(cond) => {
                self.labelled("SwitchConditional", |p| {
                    p.labelled("Scrutinee:", |p| p.expression(&cond.scrutinee));
                    for case in &cond.cases {
                        p.labelled("Case:", |p| {
                            match &case.expression {
                                Some(expression) => {
                                    p.labelled("Expression:", |p| p.expression(expression));
                                }
                                None => p.line("(default)"),
                            }
                            p.block("Block:", &case.block);
                        });
                    }
                });
            }
            Conditional::While(cond) => {
                self.labelled("WhileConditional", |p| {
                    p.labelled("Condition:", |p| p.expression(&cond.condition));
                    p.block("Body:", &cond.body);
                });
            }
            Conditional::For(cond) => {
                self.labelled("ForConditional", |p| {
                    if let Some(initializer) = &cond.initializer {
                        p.labelled("Initializer:", |p| p.variable(initializer));
                    }
                    if let Some(condition) = &cond.condition {
                        p.labelled("Condition:", |p| p.expression(condition));
                    }
                    if let Some(increment) = &cond.increment {
                        p.labelled("Increment:", |p| p.expression(increment));
                    }
                    p.block("Body:", &cond.body);
                });
            }
        }
    }

    fn expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Binary {
                left, op, right, ..
            } => {
                self.labelled("BinaryExpression", |p| {
                    p.labelled("Left:", |p| p.expression(left));
                    p.line(&format!("Operator: {op}"));
                    p.labelled("Right:", |p| p.expression(right));
                });
            }
            Expression::Unary {
                op,
                operand,
                prefix,
                ..
            } => {
                self.labelled("UnaryExpression", |p| {
                    let position = if *prefix { "prefix" } else { "postfix" };
                    p.line(&format!("Operator: {op} ({position})"));
                    p.labelled("Operand:", |p| p.expression(operand));
                });
            }
            Expression::Literal { value, .. } => self.line(&format!("Literal: \"{value}\"")),
            Expression::Identifier(identifier) => {
                self.line(&format!("Identifier: {}", identifier.name));
            }
            Expression::ArrayIdentifier { name, size, .. } => {
                self.labelled("ArrayIdentifierExpression", |p| {
                    p.line(&format!("Name: {name}"));
                    p.labelled("Size:", |p| p.expression(size));
                });
            }
            Expression::Index { array, index, .. } => {
                self.labelled("IndexExpression", |p| {
                    p.labelled("Array:", |p| p.expression(array));
                    p.labelled("Index:", |p| p.expression(index));
                });
            }
            Expression::Array { elements, .. } => {
                self.labelled("ArrayExpression", |p| {
                    if elements.is_empty() {
                        p.line("(empty)");
                    } else {
                        for element in elements {
                            p.expression(element);
                        }
                    }
                });
            }
            Expression::Call {
                callee, arguments, ..
            } => {
                self.labelled("CallExpression", |p| {
                    p.labelled("Callee:", |p| p.expression(callee));
                    p.labelled("Arguments:", |p| {
                        if arguments.is_empty() {
                            p.line("(empty)");
                        } else {
                            for argument in arguments {
                                p.expression(argument);
                            }
                        }
                    });
                });
            }
            Expression::Attribute {
                object, attribute, ..
            } => {
                self.labelled("AttributeExpression", |p| {
                    p.labelled("Object:", |p| p.expression(object));
                    p.labelled("Attribute:", |p| p.expression(attribute));
                });
            }
        }
    }
}
