// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract syntax tree definitions.
//!
//! The AST is four sum types — [`Expression`], [`Statement`], [`Declaration`],
//! and [`Conditional`] — plus the [`Program`] root. Nodes are plain variant
//! carriers: every node owns its children exclusively and carries a [`Span`]
//! covering the earliest through latest token consumed for it.
//!
//! Consumers traverse with exhaustive `match`es; the free-function walkers
//! ([`walk_expression`], [`walk_statement`]) cover the common
//! pre-order-visitor pattern so passes don't hand-roll the recursion.

use ecow::EcoString;

use crate::modifier::{Accessor, Modifiers};
use crate::source_analysis::Span;

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
    /// Span covering the whole file's statements.
    pub span: Span,
}

/// A name with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// The identifier text.
    pub name: EcoString,
    /// Source location of the identifier.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// The kind of a literal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// `42`
    Integer,
    /// `3.14`
    Float,
    /// `"text"`
    String,
    /// `'c'`
    Character,
    /// `true` / `false`
    Boolean,
    /// `null`
    Null,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A binary operation, including assignment (`=` is right-associative).
    Binary {
        /// Left operand.
        left: Box<Expression>,
        /// Operator lexeme, e.g. `+`, `==`, `..`.
        op: EcoString,
        /// Right operand.
        right: Box<Expression>,
        /// Source location.
        span: Span,
    },
    /// A unary operation, prefix (`!x`, `-x`) or postfix (`x++`, `x--`).
    Unary {
        /// Operator lexeme.
        op: EcoString,
        /// The operand.
        operand: Box<Expression>,
        /// True for prefix operators, false for postfix.
        prefix: bool,
        /// Source location.
        span: Span,
    },
    /// A literal, stored as its raw lexeme.
    Literal {
        /// The lexeme text (quotes included for strings and characters).
        value: EcoString,
        /// What kind of literal this is.
        kind: LiteralKind,
        /// Source location.
        span: Span,
    },
    /// A name reference (`this` parses as an identifier named `this`).
    Identifier(Identifier),
    /// An array type annotation: `i32[10]`, or `i32[]` with size `-1`.
    ArrayIdentifier {
        /// The element type name.
        name: EcoString,
        /// The size expression; the literal `-1` means "unsized".
        size: Box<Expression>,
        /// Source location.
        span: Span,
    },
    /// An indexing operation: `xs[i]`.
    Index {
        /// The array being indexed.
        array: Box<Expression>,
        /// The index expression.
        index: Box<Expression>,
        /// Source location.
        span: Span,
    },
    /// An array literal: `[1, 2, 3]`.
    Array {
        /// Element expressions in source order.
        elements: Vec<Expression>,
        /// Source location.
        span: Span,
    },
    /// A call: `f(a, b)`.
    Call {
        /// The callee expression.
        callee: Box<Expression>,
        /// Argument expressions in source order.
        arguments: Vec<Expression>,
        /// Source location.
        span: Span,
    },
    /// Member access: `obj.attr`, where `attr` is itself an expression
    /// (an identifier or a call).
    Attribute {
        /// The object being accessed.
        object: Box<Expression>,
        /// The attribute expression.
        attribute: Box<Expression>,
        /// Source location.
        span: Span,
    },
}

impl Expression {
    /// Returns the source span of this expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Literal { span, .. }
            | Self::ArrayIdentifier { span, .. }
            | Self::Index { span, .. }
            | Self::Array { span, .. }
            | Self::Call { span, .. }
            | Self::Attribute { span, .. } => *span,
            Self::Identifier(identifier) => identifier.span,
        }
    }
}

/// A brace-delimited list of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements in source order.
    pub statements: Vec<Statement>,
    /// Source location, from `{` through `}`.
    pub span: Span,
}

/// A parsed accessor/modifier prefix.
///
/// This is the syntactic carrier attached to declarations; the semantic side
/// resolves it into `Variable`/`Function` entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierStatement {
    /// The declared accessor; defaults to private when absent.
    pub accessor: Accessor,
    /// The declared modifier flags.
    pub modifiers: Modifiers,
    /// Source location of the prefix.
    pub span: Span,
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `return;` or `return expr;`
    Return {
        /// The returned expression, if any.
        expression: Option<Expression>,
        /// Source location.
        span: Span,
    },
    /// `break;`
    Break {
        /// Source location.
        span: Span,
    },
    /// `continue;`
    Continue {
        /// Source location.
        span: Span,
    },
    /// An expression in statement position: `expr;`
    Expression {
        /// The expression.
        expression: Expression,
        /// Source location, including the terminator.
        span: Span,
    },
    /// A `{ ... }` block.
    Block(Block),
    /// A bare accessor/modifier statement.
    Modifier(ModifierStatement),
    /// A declaration.
    Declaration(Declaration),
    /// A conditional.
    Conditional(Conditional),
}

impl Statement {
    /// Returns the source span of this statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Return { span, .. }
            | Self::Break { span }
            | Self::Continue { span }
            | Self::Expression { span, .. } => *span,
            Self::Block(block) => block.span,
            Self::Modifier(modifier) => modifier.span,
            Self::Declaration(declaration) => declaration.span(),
            Self::Conditional(conditional) => conditional.span(),
        }
    }
}

/// A variable declaration (or parameter, or field).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// The declared name.
    pub identifier: Identifier,
    /// The type expression: an identifier or array identifier.
    pub ty: Expression,
    /// Accessor and modifier prefix.
    pub modifier: ModifierStatement,
    /// The initializer, if any.
    pub initializer: Option<Expression>,
    /// Source location.
    pub span: Span,
}

/// A function (or method) declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// The declared name; `init` for constructors.
    pub identifier: Identifier,
    /// The return type expression; defaults to `void`.
    pub ty: Expression,
    /// Accessor and modifier prefix.
    pub modifier: ModifierStatement,
    /// Parameters, parsed as variables without `let` or `;`.
    pub parameters: Vec<VariableDeclaration>,
    /// The function body.
    pub body: Block,
    /// Source location.
    pub span: Span,
}

/// A record declaration: named fields, no methods.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDeclaration {
    /// The declared name.
    pub identifier: Identifier,
    /// The type expression naming the record itself.
    pub ty: Expression,
    /// Accessor and modifier prefix.
    pub modifier: ModifierStatement,
    /// Field declarations in source order.
    pub fields: Vec<VariableDeclaration>,
    /// Source location.
    pub span: Span,
}

/// A class declaration: fields and methods.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    /// The declared name.
    pub identifier: Identifier,
    /// The type expression naming the class itself.
    pub ty: Expression,
    /// Accessor and modifier prefix.
    pub modifier: ModifierStatement,
    /// Field declarations in source order.
    pub fields: Vec<VariableDeclaration>,
    /// Method declarations in source order.
    pub methods: Vec<FunctionDeclaration>,
    /// Source location.
    pub span: Span,
}

/// A declaration node.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `let x: T = ...;`
    Variable(VariableDeclaration),
    /// `fn f(...) : T { ... }`
    Function(FunctionDeclaration),
    /// `rec R { ... }`
    Record(RecordDeclaration),
    /// `cls C { ... }`
    Class(ClassDeclaration),
}

impl Declaration {
    /// Returns the source span of this declaration.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Variable(decl) => decl.span,
            Self::Function(decl) => decl.span,
            Self::Record(decl) => decl.span,
            Self::Class(decl) => decl.span,
        }
    }

    /// Returns the declared identifier.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        match self {
            Self::Variable(decl) => &decl.identifier,
            Self::Function(decl) => &decl.identifier,
            Self::Record(decl) => &decl.identifier,
            Self::Class(decl) => &decl.identifier,
        }
    }
}

/// An `if` conditional, including each `elif` arm (which is itself an `If`
/// with no arms of its own).
#[derive(Debug, Clone, PartialEq)]
pub struct IfConditional {
    /// The condition expression.
    pub condition: Expression,
    /// The block taken when the condition holds.
    pub then_branch: Block,
    /// `elif` arms, collected only before `else`.
    pub elif_branches: Vec<IfConditional>,
    /// The `else` block, if any.
    pub else_branch: Option<Block>,
    /// Source location.
    pub span: Span,
}

/// One arm of a `switch`; `expression` is `None` for `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// The case expression, or `None` for the default arm.
    pub expression: Option<Expression>,
    /// The arm's block.
    pub block: Block,
    /// Source location.
    pub span: Span,
}

/// A `switch` conditional.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchConditional {
    /// The scrutinee expression.
    pub scrutinee: Expression,
    /// Case arms in source order.
    pub cases: Vec<SwitchCase>,
    /// Source location; ends at the last case.
    pub span: Span,
}

/// A `while` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileConditional {
    /// The loop condition.
    pub condition: Expression,
    /// The loop body.
    pub body: Block,
    /// Source location.
    pub span: Span,
}

/// A `for` loop in one of three shapes:
///
/// - C-style: initializer, condition, and increment all present.
/// - For-each: initializer present, condition `None`, and the iterable
///   stored in the increment slot.
/// - Range: only the condition present, holding the range expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ForConditional {
    /// The loop variable declaration, if any.
    pub initializer: Option<VariableDeclaration>,
    /// The condition (or range expression), if any.
    pub condition: Option<Expression>,
    /// The increment expression (or for-each iterable), if any.
    pub increment: Option<Expression>,
    /// The loop body.
    pub body: Block,
    /// Source location.
    pub span: Span,
}

/// A conditional node.
#[derive(Debug, Clone, PartialEq)]
pub enum Conditional {
    /// `if ... elif ... else ...`
    If(IfConditional),
    /// `switch expr { case ... default ... }`
    Switch(SwitchConditional),
    /// `while cond { ... }`
    While(WhileConditional),
    /// `for (...) { ... }`
    For(ForConditional),
}

impl Conditional {
    /// Returns the source span of this conditional.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::If(cond) => cond.span,
            Self::Switch(cond) => cond.span,
            Self::While(cond) => cond.span,
            Self::For(cond) => cond.span,
        }
    }
}

// ── Walkers ──────────────────────────────────────────────────────────────────

/// Recursively walks an expression tree in pre-order, calling `f` on every
/// expression node.
pub fn walk_expression<F>(expr: &Expression, f: &mut F)
where
    F: FnMut(&Expression),
{
    f(expr);
    match expr {
        Expression::Binary { left, right, .. } => {
            walk_expression(left, f);
            walk_expression(right, f);
        }
        Expression::Unary { operand, .. } => walk_expression(operand, f),
        Expression::ArrayIdentifier { size, .. } => walk_expression(size, f),
        Expression::Index { array, index, .. } => {
            walk_expression(array, f);
            walk_expression(index, f);
        }
        Expression::Array { elements, .. } => {
            for element in elements {
                walk_expression(element, f);
            }
        }
        Expression::Call {
            callee, arguments, ..
        } => {
            walk_expression(callee, f);
            for argument in arguments {
                walk_expression(argument, f);
            }
        }
        Expression::Attribute {
            object, attribute, ..
        } => {
            walk_expression(object, f);
            walk_expression(attribute, f);
        }
        Expression::Literal { .. } | Expression::Identifier(_) => {}
    }
}

/// Recursively walks a statement tree in pre-order, calling `s` on every
/// statement and `e` on every expression encountered along the way.
pub fn walk_statement<S, E>(stmt: &Statement, s: &mut S, e: &mut E)
where
    S: FnMut(&Statement),
    E: FnMut(&Expression),
{
    s(stmt);
    match stmt {
        Statement::Return { expression, .. } => {
            if let Some(expression) = expression {
                walk_expression(expression, e);
            }
        }
        Statement::Expression { expression, .. } => walk_expression(expression, e),
        Statement::Block(block) => walk_block(block, s, e),
        Statement::Declaration(declaration) => walk_declaration(declaration, s, e),
        Statement::Conditional(conditional) => walk_conditional(conditional, s, e),
        Statement::Break { .. } | Statement::Continue { .. } | Statement::Modifier(_) => {}
    }
}

fn walk_block<S, E>(block: &Block, s: &mut S, e: &mut E)
where
    S: FnMut(&Statement),
    E: FnMut(&Expression),
{
    for stmt in &block.statements {
        walk_statement(stmt, s, e);
    }
}

fn walk_variable<S, E>(decl: &VariableDeclaration, _s: &mut S, e: &mut E)
where
    S: FnMut(&Statement),
    E: FnMut(&Expression),
{
    walk_expression(&decl.ty, e);
    if let Some(initializer) = &decl.initializer {
        walk_expression(initializer, e);
    }
}

fn walk_function<S, E>(decl: &FunctionDeclaration, s: &mut S, e: &mut E)
where
    S: FnMut(&Statement),
    E: FnMut(&Expression),
{
    walk_expression(&decl.ty, e);
    for parameter in &decl.parameters {
        walk_variable(parameter, s, e);
    }
    walk_block(&decl.body, s, e);
}

fn walk_declaration<S, E>(declaration: &Declaration, s: &mut S, e: &mut E)
where
    S: FnMut(&Statement),
    E: FnMut(&Expression),
{
    match declaration {
        Declaration::Variable(decl) => walk_variable(decl, s, e),
        Declaration::Function(decl) => walk_function(decl, s, e),
        Declaration::Record(decl) => {
            for field in &decl.fields {
                walk_variable(field, s, e);
            }
        }
        Declaration::Class(decl) => {
            for field in &decl.fields {
                walk_variable(field, s, e);
            }
            for method in &decl.methods {
                walk_function(method, s, e);
            }
        }
    }
}

fn walk_if<S, E>(cond: &IfConditional, s: &mut S, e: &mut E)
where
    S: FnMut(&Statement),
    E: FnMut(&Expression),
{
    walk_expression(&cond.condition, e);
    walk_block(&cond.then_branch, s, e);
    for elif in &cond.elif_branches {
        walk_if(elif, s, e);
    }
    if let Some(else_branch) = &cond.else_branch {
        walk_block(else_branch, s, e);
    }
}

fn walk_conditional<S, E>(conditional: &Conditional, s: &mut S, e: &mut E)
where
    S: FnMut(&Statement),
    E: FnMut(&Expression),
{
    match conditional {
        Conditional::If(cond) => walk_if(cond, s, e),
        Conditional::Switch(cond) => {
            walk_expression(&cond.scrutinee, e);
            for case in &cond.cases {
                if let Some(expression) = &case.expression {
                    walk_expression(expression, e);
                }
                walk_block(&case.block, s, e);
            }
        }
        Conditional::While(cond) => {
            walk_expression(&cond.condition, e);
            walk_block(&cond.body, s, e);
        }
        Conditional::For(cond) => {
            if let Some(initializer) = &cond.initializer {
                walk_variable(initializer, s, e);
            }
            if let Some(condition) = &cond.condition {
                walk_expression(condition, e);
            }
            if let Some(increment) = &cond.increment {
                walk_expression(increment, e);
            }
            walk_block(&cond.body, s, e);
        }
    }
}

/// Walks every statement and expression of a program in pre-order.
pub fn walk_program<S, E>(program: &Program, s: &mut S, e: &mut E)
where
    S: FnMut(&Statement),
    E: FnMut(&Expression),
{
    for statement in &program.statements {
        walk_statement(statement, s, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::Position;

    fn span(start: u32, end: u32) -> Span {
        Span::new(
            Position::new(1, start + 1, start),
            Position::new(1, end + 1, end),
        )
    }

    fn ident(name: &str, at: u32) -> Expression {
        Expression::Identifier(Identifier::new(
            name,
            span(at, at + u32::try_from(name.len()).unwrap()),
        ))
    }

    #[test]
    fn expression_spans() {
        let expr = Expression::Binary {
            left: Box::new(ident("a", 0)),
            op: "+".into(),
            right: Box::new(ident("b", 4)),
            span: span(0, 5),
        };
        assert_eq!(expr.span(), span(0, 5));
        assert_eq!(ident("a", 0).span(), span(0, 1));
    }

    #[test]
    fn binary_span_covers_children() {
        let left = ident("a", 0);
        let right = ident("b", 4);
        let expr = Expression::Binary {
            span: left.span().merge(right.span()),
            left: Box::new(left),
            op: "+".into(),
            right: Box::new(right),
        };
        let parent = expr.span();
        walk_expression(&expr, &mut |child| {
            assert!(parent.contains(child.span()));
        });
    }

    #[test]
    fn walk_expression_visits_all_nodes() {
        let expr = Expression::Call {
            callee: Box::new(ident("f", 0)),
            arguments: vec![ident("x", 2), ident("y", 5)],
            span: span(0, 7),
        };
        let mut count = 0;
        walk_expression(&expr, &mut |_| count += 1);
        assert_eq!(count, 4);
    }

    #[test]
    fn walk_statement_reaches_nested_expressions() {
        let body = Block {
            statements: vec![Statement::Return {
                expression: Some(ident("x", 10)),
                span: span(5, 12),
            }],
            span: span(4, 13),
        };
        let stmt = Statement::Conditional(Conditional::While(WhileConditional {
            condition: ident("go", 1),
            body,
            span: span(0, 13),
        }));

        let mut statements = 0;
        let mut expressions = 0;
        walk_statement(&stmt, &mut |_| statements += 1, &mut |_| expressions += 1);
        assert_eq!(statements, 2);
        assert_eq!(expressions, 2);
    }

    #[test]
    fn declaration_accessors() {
        let decl = Declaration::Variable(VariableDeclaration {
            identifier: Identifier::new("x", span(4, 5)),
            ty: ident("i32", 7),
            modifier: ModifierStatement {
                accessor: Accessor::Private,
                modifiers: Modifiers::NONE,
                span: span(4, 4),
            },
            initializer: None,
            span: span(4, 10),
        });
        assert_eq!(decl.identifier().name, "x");
        assert_eq!(decl.span(), span(4, 10));
    }
}
