// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis.
//!
//! The [`Analyzer`] walks a parsed [`Program`], building the scope chain,
//! registering declarations, inferring expression types, and verifying
//! control-flow context (`return` inside a function, `break`/`continue`
//! inside a loop). It never mutates the AST and never aborts: diagnostics
//! accumulate and the whole program is analyzed before
//! [`Analyzer::has_errors`] is consulted.
//!
//! Every scope entered is exited on every path, including paths taken after
//! emitting errors, so the chain is balanced when `analyze` returns.

use ecow::{eco_format, EcoString};
use tracing::debug;

use crate::ast::{
    Block, ClassDeclaration, Conditional, Declaration, Expression, ForConditional,
    FunctionDeclaration, Identifier, IfConditional, LiteralKind, ModifierStatement, Program,
    RecordDeclaration, Statement, SwitchConditional, VariableDeclaration, WhileConditional,
};
use crate::diagnostic::{Diagnostic, Level};
use crate::modifier::{Accessor, Modifiers};
use crate::source_analysis::Span;

pub mod scope;
pub mod types;

pub use scope::{Scope, ScopeKind, ScopeStack};
pub use types::{can_assign, promote, Class, Function, Record, Type, TypeKind, Variable};

/// Walks the AST, resolving names and types and checking declarations.
#[derive(Debug)]
pub struct Analyzer {
    scopes: ScopeStack,
    diagnostics: Vec<Diagnostic>,
    file: EcoString,
    source: EcoString,
}

impl Analyzer {
    /// Creates an analyzer. `file` and `source` are captured into each
    /// diagnostic so semantic errors render with carets like every other
    /// stage's.
    #[must_use]
    pub fn new(file: impl Into<EcoString>, source: impl Into<EcoString>) -> Self {
        Self {
            scopes: ScopeStack::new(),
            diagnostics: Vec::new(),
            file: file.into(),
            source: source.into(),
        }
    }

    /// Analyzes a whole program inside a fresh global scope.
    pub fn analyze(&mut self, program: &Program) {
        debug!(statements = program.statements.len(), "analyzing program");
        self.scopes.enter("global", ScopeKind::GLOBAL);
        for statement in &program.statements {
            self.analyze_statement(statement);
        }
        self.scopes.exit();
        debug!(
            diagnostics = self.diagnostics.len(),
            "semantic analysis finished"
        );
    }

    /// Returns true iff any accumulated diagnostic is Error or worse.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Returns the accumulated diagnostics, in discovery order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the analyzer, yielding its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn error(&mut self, message: impl Into<EcoString>, help: &str, span: Span) {
        self.diagnostics.push(Diagnostic::new(
            Level::Error,
            message,
            help,
            span,
            self.file.clone(),
            self.source.clone(),
        ));
    }

    // ── Statements ───────────────────────────────────────────────────────

    fn analyze_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Declaration(declaration) => self.analyze_declaration(declaration),
            Statement::Modifier(modifier) => self.analyze_modifier_statement(modifier),
            Statement::Block(block) => self.analyze_block(block),
            Statement::Expression { expression, span } => {
                self.analyze_expression_statement(expression, *span);
            }
            Statement::Conditional(conditional) => self.analyze_conditional(conditional),
            Statement::Return { expression, span } => {
                self.analyze_return(expression.as_ref(), *span);
            }
            Statement::Break { span } => self.analyze_break(*span),
            Statement::Continue { span } => self.analyze_continue(*span),
        }
    }

    fn analyze_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Variable(decl) => self.analyze_variable_declaration(decl),
            Declaration::Function(decl) => self.analyze_function_declaration(decl),
            Declaration::Class(decl) => self.analyze_class_declaration(decl),
            Declaration::Record(decl) => self.analyze_record_declaration(decl),
        }
    }

    fn analyze_variable_declaration(&mut self, decl: &VariableDeclaration) {
        let variable = self.declare_variable(decl);
        if !variable.is_valid() {
            self.error(
                eco_format!("Unable to declare variable: {}", decl.identifier.name),
                "Ensure the variable is not already declared.",
                decl.span,
            );
        }
        if let Some(initializer) = &decl.initializer {
            let initializer_type = self.infer_expression(initializer);
            if !initializer_type.is_valid() {
                self.error(
                    eco_format!(
                        "Invalid type for variable initializer: {}",
                        decl.identifier.name
                    ),
                    "Ensure the initializer expression is valid.",
                    initializer.span(),
                );
            } else if !can_assign(&initializer_type, &variable.ty) {
                // The declared type must fit within the initializer's:
                // integer literals infer i64, so `let x: i32 = 5;` is legal
                // only under this orientation of the check.
                self.error(
                    eco_format!(
                        "Type mismatch in variable initializer: {}",
                        decl.identifier.name
                    ),
                    "Ensure the initializer type matches the variable type.",
                    initializer.span(),
                );
            }
        }
    }

    fn analyze_function_declaration(&mut self, decl: &FunctionDeclaration) {
        let function = self.declare_function(decl);
        if !function.is_valid() {
            self.error(
                eco_format!("Unable to declare function: {}", decl.identifier.name),
                "Ensure the function is declared correctly.",
                decl.span,
            );
            return;
        }

        self.scopes
            .enter(decl.identifier.name.clone(), ScopeKind::FUNCTION);
        for parameter in &decl.parameters {
            let declared = self.declare_variable(parameter);
            if !declared.is_valid() {
                self.error(
                    eco_format!(
                        "Unable to declare function parameter: {}",
                        parameter.identifier.name
                    ),
                    "Ensure the parameter is declared correctly.",
                    parameter.span,
                );
            }
        }
        self.analyze_block(&decl.body);
        self.scopes.exit();
    }

    fn analyze_class_declaration(&mut self, decl: &ClassDeclaration) {
        let class = self.declare_class(decl);
        if !class.is_valid() {
            self.error(
                eco_format!("Unable to declare class: {}", decl.identifier.name),
                "Ensure the class is not already declared.",
                decl.span,
            );
            return;
        }

        self.scopes
            .enter(decl.identifier.name.clone(), ScopeKind::CLASS);
        for method in &decl.methods {
            self.analyze_function_declaration(method);
        }
        self.scopes.exit();
    }

    fn analyze_record_declaration(&mut self, decl: &RecordDeclaration) {
        let record = self.declare_record(decl);
        if !record.is_valid() {
            self.error(
                eco_format!("Unable to declare record: {}", decl.identifier.name),
                "Ensure the record is not already declared.",
                decl.span,
            );
        }
    }

    fn analyze_block(&mut self, block: &Block) {
        self.scopes.enter("block", ScopeKind::BLOCK);
        for statement in &block.statements {
            self.analyze_statement(statement);
        }
        self.scopes.exit();
    }

    fn analyze_expression_statement(&mut self, expression: &Expression, span: Span) {
        let ty = self.infer_expression(expression);
        if !ty.is_valid() {
            self.error(
                "Invalid expression in expression statement.",
                "Ensure the expression is valid.",
                span,
            );
        }
    }

    /// A bare modifier statement is only legal inside a class scope.
    fn analyze_modifier_statement(&mut self, modifier: &ModifierStatement) {
        if !self.scopes.current_kind().contains(ScopeKind::CLASS)
            && (modifier.accessor != Accessor::Public || modifier.modifiers != Modifiers::NONE)
        {
            self.error(
                "Modifiers can only be used within class scopes.",
                "Ensure modifiers are used inside classes.",
                modifier.span,
            );
        }
    }

    // ── Conditionals ─────────────────────────────────────────────────────

    fn analyze_conditional(&mut self, conditional: &Conditional) {
        match conditional {
            Conditional::If(cond) => self.analyze_if(cond),
            Conditional::Switch(cond) => self.analyze_switch(cond),
            Conditional::While(cond) => self.analyze_while(cond),
            Conditional::For(cond) => self.analyze_for(cond),
        }
    }

    /// Checks that a condition expression is valid and truthy.
    fn check_condition(&mut self, condition: &Expression) {
        let ty = self.infer_expression(condition);
        if !ty.is_valid() {
            self.error(
                "Invalid type for condition expression.",
                "Ensure the condition expression is valid.",
                condition.span(),
            );
        } else if !ty.is_truthy() {
            self.error(
                "Condition expression must be of a truthy type.",
                "Ensure the condition evaluates to a boolean value.",
                condition.span(),
            );
        }
    }

    fn analyze_if(&mut self, cond: &IfConditional) {
        self.check_condition(&cond.condition);
        self.analyze_block(&cond.then_branch);
        for elif in &cond.elif_branches {
            self.analyze_if(elif);
        }
        if let Some(else_branch) = &cond.else_branch {
            self.analyze_block(else_branch);
        }
    }

    /// Case expressions are not matched against the scrutinee type.
    fn analyze_switch(&mut self, cond: &SwitchConditional) {
        let scrutinee_type = self.infer_expression(&cond.scrutinee);
        if !scrutinee_type.is_valid() {
            self.error(
                "Invalid type for switch expression.",
                "Ensure the switch expression is valid.",
                cond.scrutinee.span(),
            );
        }
        for case in &cond.cases {
            self.analyze_block(&case.block);
        }
    }

    fn analyze_while(&mut self, cond: &WhileConditional) {
        self.scopes.enter("while", ScopeKind::LOOP);
        self.check_condition(&cond.condition);
        self.analyze_block(&cond.body);
        self.scopes.exit();
    }

    /// The initializer is analyzed inside the loop scope so the loop
    /// variable is visible to the condition, increment, and body.
    fn analyze_for(&mut self, cond: &ForConditional) {
        self.scopes.enter("for", ScopeKind::LOOP);
        if let Some(initializer) = &cond.initializer {
            self.analyze_variable_declaration(initializer);
        }
        if let Some(condition) = &cond.condition {
            self.check_condition(condition);
        }
        if let Some(increment) = &cond.increment {
            let increment_type = self.infer_expression(increment);
            if !increment_type.is_valid() {
                self.error(
                    "Increment expression must be of a valid type.",
                    "Ensure the increment expression is valid.",
                    increment.span(),
                );
            }
        }
        self.analyze_block(&cond.body);
        self.scopes.exit();
    }

    // ── Control-flow context ─────────────────────────────────────────────

    fn analyze_return(&mut self, expression: Option<&Expression>, span: Span) {
        if let Some(expression) = expression {
            self.infer_expression(expression);
        }
        if !self.scopes.current_kind().contains(ScopeKind::FUNCTION) {
            self.error(
                "Return statement not within a function scope.",
                "Ensure return statements are inside functions.",
                span,
            );
        }
    }

    fn analyze_break(&mut self, span: Span) {
        if !self.scopes.current_kind().contains(ScopeKind::LOOP) {
            self.error(
                "Break statement not within a loop scope.",
                "Ensure break statements are inside loops.",
                span,
            );
        }
    }

    fn analyze_continue(&mut self, span: Span) {
        if !self.scopes.current_kind().contains(ScopeKind::LOOP) {
            self.error(
                "Continue statement not within a loop scope.",
                "Ensure continue statements are inside loops.",
                span,
            );
        }
    }

    // ── Declaration registration ─────────────────────────────────────────

    /// Resolves a declaration's type expression and registers the variable
    /// in the current scope.
    fn declare_variable(&mut self, decl: &VariableDeclaration) -> Variable {
        let ty = self.infer_expression(&decl.ty);
        if !ty.is_valid() {
            self.error(
                eco_format!(
                    "Invalid type for variable declaration: {}",
                    decl.identifier.name
                ),
                "Ensure the type is defined before use.",
                decl.span,
            );
        }
        let variable = Variable::new(
            decl.identifier.name.clone(),
            ty,
            decl.modifier.accessor,
            decl.modifier.modifiers,
        );
        self.scopes.add_variable(variable.clone());
        variable
    }

    /// Resolves the signature and registers the function in the current
    /// scope. The body is analyzed separately.
    fn declare_function(&mut self, decl: &FunctionDeclaration) -> Function {
        let return_type = self.infer_expression(&decl.ty);
        if !return_type.is_valid() {
            self.error(
                eco_format!(
                    "Invalid return type for function declaration: {}",
                    decl.identifier.name
                ),
                "Ensure the return type is defined before use.",
                decl.span,
            );
        }
        let mut parameters = Vec::with_capacity(decl.parameters.len());
        for parameter in &decl.parameters {
            let parameter_type = self.infer_expression(&parameter.ty);
            if !parameter_type.is_valid() {
                self.error(
                    eco_format!(
                        "Invalid type for function parameter: {}",
                        parameter.identifier.name
                    ),
                    "Ensure the parameter type is defined before use.",
                    parameter.span,
                );
            }
            parameters.push(Variable::new(
                parameter.identifier.name.clone(),
                parameter_type,
                parameter.modifier.accessor,
                parameter.modifier.modifiers,
            ));
        }
        let function = Function::new(
            decl.identifier.name.clone(),
            return_type,
            parameters,
            decl.modifier.accessor,
            decl.modifier.modifiers,
        );
        self.scopes.add_function(function.clone());
        function
    }

    /// Builds the class entity (fields and method signatures) and registers
    /// it in the current scope.
    fn declare_class(&mut self, decl: &ClassDeclaration) -> Class {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            let field_type = self.infer_expression(&field.ty);
            if !field_type.is_valid() {
                self.error(
                    eco_format!("Invalid type for class field: {}", field.identifier.name),
                    "Ensure the field type is defined before use.",
                    field.span,
                );
            }
            fields.push(Variable::new(
                field.identifier.name.clone(),
                field_type,
                field.modifier.accessor,
                field.modifier.modifiers,
            ));
        }

        let mut methods = Vec::with_capacity(decl.methods.len());
        for method in &decl.methods {
            let return_type = self.infer_expression(&method.ty);
            if !return_type.is_valid() {
                self.error(
                    eco_format!(
                        "Invalid return type for class method: {}",
                        method.identifier.name
                    ),
                    "Ensure the return type is defined before use.",
                    method.span,
                );
            }
            let mut parameters = Vec::with_capacity(method.parameters.len());
            for parameter in &method.parameters {
                let parameter_type = self.infer_expression(&parameter.ty);
                if !parameter_type.is_valid() {
                    self.error(
                        eco_format!(
                            "Invalid type for method parameter: {}",
                            parameter.identifier.name
                        ),
                        "Ensure the parameter type is defined before use.",
                        parameter.span,
                    );
                }
                parameters.push(Variable::new(
                    parameter.identifier.name.clone(),
                    parameter_type,
                    parameter.modifier.accessor,
                    parameter.modifier.modifiers,
                ));
            }
            methods.push(Function::new(
                method.identifier.name.clone(),
                return_type,
                parameters,
                method.modifier.accessor,
                method.modifier.modifiers,
            ));
        }

        let class = Class::new(decl.identifier.name.clone(), fields, methods);
        self.scopes.add_class(class.clone());
        class
    }

    /// Builds the record entity and registers it in the current scope.
    fn declare_record(&mut self, decl: &RecordDeclaration) -> Record {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            let field_type = self.infer_expression(&field.ty);
            if !field_type.is_valid() {
                self.error(
                    eco_format!("Invalid type for record field: {}", field.identifier.name),
                    "Ensure the field type is defined before use.",
                    field.span,
                );
            }
            fields.push(Variable::new(
                field.identifier.name.clone(),
                field_type,
                field.modifier.accessor,
                field.modifier.modifiers,
            ));
        }
        let record = Record::new(decl.identifier.name.clone(), fields);
        self.scopes.add_record(record.clone());
        record
    }

    // ── Expression inference ─────────────────────────────────────────────

    /// Infers the type of an expression, emitting diagnostics for
    /// unresolvable names and invalid operations.
    fn infer_expression(&mut self, expression: &Expression) -> Type {
        match expression {
            Expression::Binary { left, right, .. } => {
                let left_type = self.infer_expression(left);
                let right_type = self.infer_expression(right);
                promote(&left_type, &right_type)
            }
            Expression::Unary { operand, .. } => self.infer_expression(operand),
            Expression::Literal { kind, .. } => Type::primitive(match kind {
                LiteralKind::Integer => TypeKind::I64,
                LiteralKind::Float => TypeKind::F64,
                LiteralKind::String => TypeKind::String,
                LiteralKind::Character => TypeKind::Character,
                LiteralKind::Boolean => TypeKind::Boolean,
                LiteralKind::Null => TypeKind::Null,
            }),
            Expression::Identifier(identifier) => self.infer_identifier(identifier),
            Expression::ArrayIdentifier { name, .. } => self
                .scopes
                .variable(name)
                .map_or_else(Type::none, |variable| variable.ty.clone()),
            Expression::Index { array, index, .. } => {
                let array_type = self.infer_expression(array);
                let index_type = self.infer_expression(index);
                // Conservatively the whole array type, not the element type.
                if array_type.kind == TypeKind::Array && index_type.is_integer() {
                    array_type
                } else {
                    Type::none()
                }
            }
            Expression::Array { elements, .. } => {
                let Some(first) = elements.first() else {
                    return Type::none();
                };
                let element_type = self.infer_expression(first);
                Type::new(TypeKind::Array, eco_format!("array{}", element_type.name))
            }
            Expression::Call {
                callee,
                arguments,
                span,
            } => self.infer_call(callee, arguments, *span),
            Expression::Attribute {
                object,
                attribute,
                span,
            } => self.infer_attribute(object, attribute, *span),
        }
    }

    /// Resolves an identifier: variable, then function, then class, then
    /// record, then primitive type.
    fn infer_identifier(&mut self, identifier: &Identifier) -> Type {
        if let Some(variable) = self.scopes.variable(&identifier.name) {
            return variable.ty.clone();
        }
        if let Some(function) = self.scopes.function(&identifier.name) {
            return function.as_type();
        }
        if let Some(class) = self.scopes.class(&identifier.name) {
            return class.as_type();
        }
        if let Some(record) = self.scopes.record(&identifier.name) {
            return record.as_type();
        }
        if let Some(ty) = self.scopes.lookup_type(&identifier.name) {
            return ty;
        }

        self.error(
            eco_format!("Undeclared identifier: {}", identifier.name),
            "Ensure the identifier is declared before use.",
            identifier.span,
        );
        Type::none()
    }

    /// Infers a call: plain function calls, and class constructor calls
    /// through a public `init` method.
    fn infer_call(&mut self, callee: &Expression, arguments: &[Expression], span: Span) -> Type {
        let callee_type = self.infer_expression(callee);

        if callee_type.kind == TypeKind::Function {
            let argument_types: Vec<Type> = arguments
                .iter()
                .map(|argument| self.infer_expression(argument))
                .collect();
            if let Some(function) = self.scopes.function(&callee_type.name) {
                if function.is_valid_arguments(&argument_types) {
                    return function.return_type.clone();
                }
            }
            self.error(
                "Function called with invalid arguments.",
                "Ensure the arguments match the function parameters.",
                span,
            );
            return Type::none();
        }

        if callee_type.kind == TypeKind::Class {
            let argument_types: Vec<Type> = arguments
                .iter()
                .map(|argument| self.infer_expression(argument))
                .collect();
            let Some(class) = self.scopes.class(&callee_type.name).cloned() else {
                return Type::none();
            };
            return match class.method("init", Accessor::Public) {
                None => {
                    self.error(
                        eco_format!("Class has no accessible constructor: {}", class.name),
                        "Ensure the class has a public constructor defined.",
                        span,
                    );
                    Type::none()
                }
                Some(constructor) if constructor.is_valid_arguments(&argument_types) => {
                    class.as_type()
                }
                Some(_) => {
                    self.error(
                        eco_format!("Invalid constructor arguments for class: {}", class.name),
                        "Ensure the arguments match the constructor parameters.",
                        span,
                    );
                    Type::none()
                }
            };
        }

        self.error(
            "Called function does not exist.",
            "Ensure the function is declared before use.",
            span,
        );
        Type::none()
    }

    /// Infers `object.attribute`: field access on classes and records, and
    /// method calls on classes. Only public members resolve at this layer.
    fn infer_attribute(&mut self, object: &Expression, attribute: &Expression, span: Span) -> Type {
        let object_type = self.infer_expression(object);

        if object_type.kind == TypeKind::Class {
            let Some(class) = self.scopes.class(&object_type.name).cloned() else {
                return Type::none();
            };
            return match attribute {
                Expression::Identifier(identifier) => {
                    if let Some(field) = class.field(&identifier.name, Accessor::Public) {
                        return field.ty.clone();
                    }
                    self.error(
                        eco_format!("Unknown attribute: {}", identifier.name),
                        "Ensure the attribute is valid.",
                        span,
                    );
                    Type::none()
                }
                Expression::Call {
                    callee, arguments, ..
                } => self.infer_method_call(&class, callee, arguments, span),
                _ => {
                    self.error("Unknown attribute type", "Ensure the attribute is valid.", span);
                    Type::none()
                }
            };
        }

        if object_type.kind == TypeKind::Record {
            let Some(record) = self.scopes.record(&object_type.name).cloned() else {
                return Type::none();
            };
            return match attribute {
                Expression::Identifier(identifier) => {
                    if let Some(field) = record.field(&identifier.name, Accessor::Public) {
                        return field.ty.clone();
                    }
                    self.error(
                        eco_format!("Unknown attribute: {}", identifier.name),
                        "Ensure the attribute is valid.",
                        span,
                    );
                    Type::none()
                }
                _ => {
                    self.error(
                        "Record has no accessible attribute.",
                        "Ensure the attribute exists and is accessible.",
                        span,
                    );
                    Type::none()
                }
            };
        }

        Type::none()
    }

    /// Infers `object.method(args)` against the class's public methods.
    fn infer_method_call(
        &mut self,
        class: &Class,
        callee: &Expression,
        arguments: &[Expression],
        span: Span,
    ) -> Type {
        let Expression::Identifier(method_name) = callee else {
            self.error(
                "Unknown method attribute expression.",
                "Ensure the attribute expression is valid.",
                span,
            );
            return Type::none();
        };

        let Some(method) = class.method(&method_name.name, Accessor::Public).cloned() else {
            self.error(
                eco_format!("Unknown method: {}", method_name.name),
                "Ensure the method exists and is accessible.",
                span,
            );
            return Type::none();
        };

        let argument_types: Vec<Type> = arguments
            .iter()
            .map(|argument| self.infer_expression(argument))
            .collect();
        if method.is_valid_arguments(&argument_types) {
            method.return_type
        } else {
            self.error(
                "Method called with invalid arguments.",
                "Ensure the arguments match the method parameters.",
                span,
            );
            Type::none()
        }
    }
}
