// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The scope chain.
//!
//! Scopes form a strict LIFO tree over the analysis: entering a syntactic
//! scope pushes onto the [`ScopeStack`], exiting pops. Each scope owns the
//! variables, functions, classes, and records declared in it; lookups walk
//! from the innermost scope outwards. The primitive types are defined once
//! (see [`PRIMITIVE_KINDS`](super::types::PRIMITIVE_KINDS)) and resolve in
//! every scope.
//!
//! # `ScopeKind` is a set
//!
//! A scope's kind is the bitwise OR of its own kind with its parent's, so
//! `current_kind().contains(ScopeKind::LOOP)` answers "am I anywhere inside
//! a loop?" in O(1), crossing intervening blocks. The OR-composition is
//! intended, not an accident of representation.

use ecow::EcoString;

use super::types::{Class, Function, Record, Type, TypeKind, Variable, PRIMITIVE_KINDS};

/// Bitset of scope kinds. See the module docs: a scope's kind accumulates
/// its ancestors' kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScopeKind(u8);

impl ScopeKind {
    /// The file-level scope.
    pub const GLOBAL: Self = Self(1);
    /// A `{ ... }` block.
    pub const BLOCK: Self = Self(1 << 1);
    /// A function body.
    pub const FUNCTION: Self = Self(1 << 2);
    /// A loop body (`while`, `for`).
    pub const LOOP: Self = Self(1 << 3);
    /// A class body.
    pub const CLASS: Self = Self(1 << 4);
    /// A record body.
    pub const RECORD: Self = Self(1 << 5);

    /// Returns true if every flag in `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the combination of `self` and `other`.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// A single lexical scope and the entities declared in it.
///
/// Insertion is append-only; redeclaration detection is the analyzer's
/// concern, not the scope's.
#[derive(Debug, Clone)]
pub struct Scope {
    /// The scope's name (function name, `block`, `while`, ...).
    pub name: EcoString,
    /// The accumulated kind set.
    pub kind: ScopeKind,
    variables: Vec<Variable>,
    functions: Vec<Function>,
    classes: Vec<Class>,
    records: Vec<Record>,
}

impl Scope {
    fn new(name: impl Into<EcoString>, kind: ScopeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            variables: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            records: Vec::new(),
        }
    }
}

/// The stack of live scopes, innermost last.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Creates an empty stack; callers open the global scope explicitly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a new scope. Its kind is ORed with the parent's so ancestor
    /// kinds remain queryable.
    pub fn enter(&mut self, name: impl Into<EcoString>, kind: ScopeKind) {
        let kind = self
            .scopes
            .last()
            .map_or(kind, |parent| parent.kind.union(kind));
        self.scopes.push(Scope::new(name, kind));
    }

    /// Exits the innermost scope. Returns false if no scope was open.
    pub fn exit(&mut self) -> bool {
        self.scopes.pop().is_some()
    }

    /// Returns the number of open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Returns the innermost scope's accumulated kind set.
    #[must_use]
    pub fn current_kind(&self) -> ScopeKind {
        self.scopes.last().map_or(ScopeKind::default(), |s| s.kind)
    }

    /// Registers a variable in the innermost scope.
    pub fn add_variable(&mut self, variable: Variable) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.variables.push(variable);
        }
    }

    /// Registers a function in the innermost scope.
    pub fn add_function(&mut self, function: Function) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.functions.push(function);
        }
    }

    /// Registers a class in the innermost scope.
    pub fn add_class(&mut self, class: Class) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.classes.push(class);
        }
    }

    /// Registers a record in the innermost scope.
    pub fn add_record(&mut self, record: Record) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.records.push(record);
        }
    }

    /// Looks up a variable, innermost scope first.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.variables.iter().find(|v| v.name == name))
    }

    /// Looks up a function, innermost scope first.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.functions.iter().find(|f| f.name == name))
    }

    /// Looks up a class, innermost scope first.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&Class> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.classes.iter().find(|c| c.name == name))
    }

    /// Looks up a record, innermost scope first.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&Record> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.records.iter().find(|r| r.name == name))
    }

    /// Returns true if `name` names a variable in any live scope.
    #[must_use]
    pub fn has_variable(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    /// Resolves a type name: primitives first, then user classes, then user
    /// records, walking outwards.
    #[must_use]
    pub fn lookup_type(&self, name: &str) -> Option<Type> {
        if let Some(kind) = PRIMITIVE_KINDS.iter().find(|kind| kind.name() == name) {
            return Some(Type::primitive(*kind));
        }
        if let Some(class) = self.class(name) {
            return Some(class.as_type());
        }
        if let Some(record) = self.record(name) {
            return Some(record.as_type());
        }
        None
    }

    /// A type annotation is valid when it names a primitive, `void`, `null`,
    /// or a class/record that resolves in the current chain.
    #[must_use]
    pub fn is_valid_type(&self, ty: &Type) -> bool {
        if ty.is_primitive() || ty.is_void() || ty.is_null() {
            return true;
        }
        match ty.kind {
            TypeKind::Class => self.class(&ty.name).is_some(),
            TypeKind::Record => self.record(&ty.name).is_some(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{Accessor, Modifiers};

    fn var(name: &str, kind: TypeKind) -> Variable {
        Variable::new(
            name,
            Type::primitive(kind),
            Accessor::Public,
            Modifiers::NONE,
        )
    }

    #[test]
    fn enter_and_exit_are_balanced() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.depth(), 0);

        scopes.enter("global", ScopeKind::GLOBAL);
        scopes.enter("block", ScopeKind::BLOCK);
        assert_eq!(scopes.depth(), 2);

        assert!(scopes.exit());
        assert!(scopes.exit());
        assert_eq!(scopes.depth(), 0);
        assert!(!scopes.exit());
    }

    #[test]
    fn kinds_accumulate_from_parents() {
        let mut scopes = ScopeStack::new();
        scopes.enter("global", ScopeKind::GLOBAL);
        scopes.enter("C", ScopeKind::CLASS);
        scopes.enter("m", ScopeKind::FUNCTION);
        scopes.enter("block", ScopeKind::BLOCK);

        let kind = scopes.current_kind();
        assert!(kind.contains(ScopeKind::GLOBAL));
        assert!(kind.contains(ScopeKind::CLASS));
        assert!(kind.contains(ScopeKind::FUNCTION));
        assert!(kind.contains(ScopeKind::BLOCK));
        assert!(!kind.contains(ScopeKind::LOOP));
    }

    #[test]
    fn loop_kind_survives_intervening_blocks() {
        let mut scopes = ScopeStack::new();
        scopes.enter("global", ScopeKind::GLOBAL);
        scopes.enter("while", ScopeKind::LOOP);
        scopes.enter("block", ScopeKind::BLOCK);
        scopes.enter("block", ScopeKind::BLOCK);

        assert!(scopes.current_kind().contains(ScopeKind::LOOP));

        scopes.exit();
        scopes.exit();
        scopes.exit();
        assert!(!scopes.current_kind().contains(ScopeKind::LOOP));
    }

    #[test]
    fn lookup_walks_outer_scopes() {
        let mut scopes = ScopeStack::new();
        scopes.enter("global", ScopeKind::GLOBAL);
        scopes.add_variable(var("outer", TypeKind::I32));

        scopes.enter("block", ScopeKind::BLOCK);
        scopes.add_variable(var("inner", TypeKind::F64));

        assert!(scopes.has_variable("outer"));
        assert!(scopes.has_variable("inner"));
        assert!(!scopes.has_variable("missing"));

        scopes.exit();
        assert!(!scopes.has_variable("inner"));
    }

    #[test]
    fn innermost_declaration_wins() {
        let mut scopes = ScopeStack::new();
        scopes.enter("global", ScopeKind::GLOBAL);
        scopes.add_variable(var("x", TypeKind::I32));

        scopes.enter("block", ScopeKind::BLOCK);
        scopes.add_variable(var("x", TypeKind::F64));

        assert_eq!(scopes.variable("x").unwrap().ty.kind, TypeKind::F64);
        scopes.exit();
        assert_eq!(scopes.variable("x").unwrap().ty.kind, TypeKind::I32);
    }

    #[test]
    fn primitives_resolve_in_every_scope() {
        let mut scopes = ScopeStack::new();
        scopes.enter("global", ScopeKind::GLOBAL);
        scopes.enter("f", ScopeKind::FUNCTION);
        scopes.enter("block", ScopeKind::BLOCK);

        for kind in PRIMITIVE_KINDS {
            let resolved = scopes.lookup_type(kind.name()).unwrap();
            assert_eq!(resolved.kind, kind);
            assert_eq!(resolved.name, kind.name());
        }
        assert!(scopes.lookup_type("none").is_none());
    }

    #[test]
    fn user_types_resolve_through_parents() {
        let mut scopes = ScopeStack::new();
        scopes.enter("global", ScopeKind::GLOBAL);
        scopes.add_class(Class::new("Counter", Vec::new(), Vec::new()));
        scopes.add_record(Record::new("Point", Vec::new()));

        scopes.enter("f", ScopeKind::FUNCTION);
        assert_eq!(
            scopes.lookup_type("Counter").unwrap().kind,
            TypeKind::Class
        );
        assert_eq!(scopes.lookup_type("Point").unwrap().kind, TypeKind::Record);
        assert!(scopes.lookup_type("Missing").is_none());
    }

    #[test]
    fn valid_types() {
        let mut scopes = ScopeStack::new();
        scopes.enter("global", ScopeKind::GLOBAL);
        scopes.add_record(Record::new("Point", Vec::new()));

        assert!(scopes.is_valid_type(&Type::primitive(TypeKind::I32)));
        assert!(scopes.is_valid_type(&Type::primitive(TypeKind::Void)));
        assert!(scopes.is_valid_type(&Type::primitive(TypeKind::Null)));
        assert!(scopes.is_valid_type(&Type::new(TypeKind::Record, "Point")));
        assert!(!scopes.is_valid_type(&Type::new(TypeKind::Record, "Missing")));
        assert!(!scopes.is_valid_type(&Type::none()));
    }

    #[test]
    fn functions_and_records_are_scoped() {
        let mut scopes = ScopeStack::new();
        scopes.enter("global", ScopeKind::GLOBAL);
        scopes.add_function(Function::new(
            "main",
            Type::primitive(TypeKind::Void),
            Vec::new(),
            Accessor::Public,
            Modifiers::NONE,
        ));

        scopes.enter("main", ScopeKind::FUNCTION);
        assert!(scopes.function("main").is_some());
        assert!(scopes.record("main").is_none());
    }
}
