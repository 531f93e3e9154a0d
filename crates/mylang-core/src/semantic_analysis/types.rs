// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The type model: primitive and composite types, promotion, assignability.
//!
//! A [`Type`] is a kind plus a name. Primitive types have fixed names
//! (`i64`, `str`, ...); composite types (classes, records, functions) are
//! identified by their declared name. Equality compares names;
//! [`Type::is_similar_to`] compares kinds.
//!
//! The semantic entities [`Variable`], [`Function`], [`Record`], and
//! [`Class`] are what the scope chain stores; each can be viewed as a
//! [`Type`] via `as_type`.

use ecow::EcoString;

use crate::modifier::{can_access, Accessor, Modifiers};

/// The kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The error type; not a valid type.
    None,
    /// The unit type of value-less functions.
    Void,
    /// The type of the `null` literal.
    Null,
    /// `bool`
    Boolean,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `f16`
    F16,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `f128`
    F128,
    /// `str`
    String,
    /// `char`
    Character,
    /// An array type.
    Array,
    /// A user-declared class.
    Class,
    /// A user-declared record.
    Record,
    /// A variable entity.
    Variable,
    /// A function entity.
    Function,
}

impl TypeKind {
    /// Returns the canonical name of this kind. For primitives this is the
    /// name programs use in annotations.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Void => "void",
            Self::Null => "null",
            Self::Boolean => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::F128 => "f128",
            Self::String => "str",
            Self::Character => "char",
            Self::Array => "array",
            Self::Class => "class",
            Self::Record => "record",
            Self::Variable => "variable",
            Self::Function => "function",
        }
    }
}

/// The primitive type kinds registered in every scope, in declaration order.
pub const PRIMITIVE_KINDS: [TypeKind; 19] = [
    TypeKind::I8,
    TypeKind::I16,
    TypeKind::I32,
    TypeKind::I64,
    TypeKind::I128,
    TypeKind::U8,
    TypeKind::U16,
    TypeKind::U32,
    TypeKind::U64,
    TypeKind::U128,
    TypeKind::F16,
    TypeKind::F32,
    TypeKind::F64,
    TypeKind::F128,
    TypeKind::Boolean,
    TypeKind::Character,
    TypeKind::String,
    TypeKind::Void,
    TypeKind::Null,
];

/// A type: a kind and a name.
#[derive(Debug, Clone, Eq)]
pub struct Type {
    /// The kind of the type.
    pub kind: TypeKind,
    /// The textual name; composite types are identified by it.
    pub name: EcoString,
}

/// Type equality is by name: two composite types are the same type exactly
/// when they were declared under the same name.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Type {
    /// Creates a type with an explicit name.
    #[must_use]
    pub fn new(kind: TypeKind, name: impl Into<EcoString>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Returns the singleton primitive type for `kind`.
    #[must_use]
    pub fn primitive(kind: TypeKind) -> Self {
        Self::new(kind, kind.name())
    }

    /// Returns the error type.
    #[must_use]
    pub fn none() -> Self {
        Self::primitive(TypeKind::None)
    }

    /// A type is valid when it has a name and is not the error type.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.kind != TypeKind::None
    }

    /// Returns the storage width in bytes; `0` for non-primitive types
    /// (no layout is computed for them).
    #[must_use]
    pub const fn byte_size(&self) -> u64 {
        match self.kind {
            TypeKind::I8 | TypeKind::U8 | TypeKind::Boolean | TypeKind::Character => 1,
            TypeKind::I16 | TypeKind::U16 | TypeKind::F16 => 2,
            TypeKind::I32 | TypeKind::U32 | TypeKind::F32 => 4,
            TypeKind::I64 | TypeKind::U64 | TypeKind::F64 => 8,
            TypeKind::I128 | TypeKind::U128 | TypeKind::F128 => 16,
            _ => 0,
        }
    }

    /// Returns true if the two types have the same kind.
    #[must_use]
    pub fn is_similar_to(&self, other: &Self) -> bool {
        self.kind == other.kind
    }

    /// Returns true for signed integer kinds.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::I8 | TypeKind::I16 | TypeKind::I32 | TypeKind::I64 | TypeKind::I128
        )
    }

    /// Returns true for unsigned integer kinds.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::U8 | TypeKind::U16 | TypeKind::U32 | TypeKind::U64 | TypeKind::U128
        )
    }

    /// Returns true for any integer kind.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    /// Returns true for any floating-point kind.
    #[must_use]
    pub const fn is_floating_point(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::F16 | TypeKind::F32 | TypeKind::F64 | TypeKind::F128
        )
    }

    /// Returns true for any integer or floating-point kind.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating_point()
    }

    /// Returns true for indirectly held types: arrays, classes, records,
    /// and strings.
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Array | TypeKind::Class | TypeKind::Record | TypeKind::String
        )
    }

    /// Returns true if a value of this type may be used as a condition:
    /// every kind except `None`, `Void`, and `Null`.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self.kind, TypeKind::None | TypeKind::Void | TypeKind::Null)
    }

    /// Returns true for numeric, boolean, and character kinds.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        self.is_numeric() || matches!(self.kind, TypeKind::Boolean | TypeKind::Character)
    }

    /// Returns true for the error type.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self.kind, TypeKind::None)
    }

    /// Returns true for `void`.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    /// Returns true for `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self.kind, TypeKind::Null)
    }
}

/// Chooses the common arithmetic type for a binary operation.
///
/// Matching kinds keep the left type; two floats or two integers widen to
/// the larger width (the unsigned side wins a width tie, keeping the result
/// independent of operand order); a float/integer mix takes the float;
/// anything else is the error type.
#[must_use]
pub fn promote(a: &Type, b: &Type) -> Type {
    if a.is_similar_to(b) {
        return a.clone();
    }

    if (a.is_floating_point() && b.is_floating_point()) || (a.is_integer() && b.is_integer()) {
        if a.byte_size() > b.byte_size() {
            return a.clone();
        }
        if b.byte_size() > a.byte_size() {
            return b.clone();
        }
        // Same width, mixed signedness.
        return if a.is_unsigned() { a.clone() } else { b.clone() };
    }

    if a.is_floating_point() && b.is_integer() {
        return a.clone();
    }
    if a.is_integer() && b.is_floating_point() {
        return b.clone();
    }

    Type::none()
}

/// Whether a value of type `from` may flow into a binding of type `to`:
/// identical kinds, integer-to-float widening, or integer widening where
/// the source is no wider than the destination. No implicit narrowing, no
/// integer-from-float.
#[must_use]
pub fn can_assign(to: &Type, from: &Type) -> bool {
    if to.is_similar_to(from) {
        return true;
    }
    if to.is_floating_point() && from.is_integer() {
        return true;
    }
    to.is_integer() && from.is_integer() && from.byte_size() <= to.byte_size()
}

/// A resolved variable: a name bound to a type, with visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The variable name.
    pub name: EcoString,
    /// The variable's type.
    pub ty: Type,
    /// Declared visibility.
    pub accessor: Accessor,
    /// Declared modifier flags.
    pub modifiers: Modifiers,
}

impl Variable {
    /// Creates a new variable entity.
    #[must_use]
    pub fn new(
        name: impl Into<EcoString>,
        ty: Type,
        accessor: Accessor,
        modifiers: Modifiers,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            accessor,
            modifiers,
        }
    }

    /// A variable entity is valid when it has a name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// Views this variable as a [`Type`].
    #[must_use]
    pub fn as_type(&self) -> Type {
        Type::new(TypeKind::Variable, self.name.clone())
    }
}

/// A resolved function: a signature with visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// The function name.
    pub name: EcoString,
    /// The return type.
    pub return_type: Type,
    /// Ordered parameters.
    pub parameters: Vec<Variable>,
    /// Declared visibility.
    pub accessor: Accessor,
    /// Declared modifier flags.
    pub modifiers: Modifiers,
}

impl Function {
    /// Creates a new function entity.
    #[must_use]
    pub fn new(
        name: impl Into<EcoString>,
        return_type: Type,
        parameters: Vec<Variable>,
        accessor: Accessor,
        modifiers: Modifiers,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters,
            accessor,
            modifiers,
        }
    }

    /// A function entity is valid when it has a name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// Views this function as a [`Type`].
    #[must_use]
    pub fn as_type(&self) -> Type {
        Type::new(TypeKind::Function, self.name.clone())
    }

    /// Checks call arguments against the parameter list: the arity must
    /// match, and each argument must share its parameter's kind or both be
    /// numeric (numeric conversions are allowed at call sites).
    #[must_use]
    pub fn is_valid_arguments(&self, argument_types: &[Type]) -> bool {
        if argument_types.len() != self.parameters.len() {
            return false;
        }
        argument_types
            .iter()
            .zip(&self.parameters)
            .all(|(argument, parameter)| {
                argument.is_similar_to(&parameter.ty)
                    || (argument.is_numeric() && parameter.ty.is_numeric())
            })
    }
}

/// A resolved record: an ordered list of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The record name.
    pub name: EcoString,
    /// Ordered fields.
    pub fields: Vec<Variable>,
}

impl Record {
    /// Creates a new record entity.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, fields: Vec<Variable>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// A record entity is valid when it has a name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// Views this record as a [`Type`].
    #[must_use]
    pub fn as_type(&self) -> Type {
        Type::new(TypeKind::Record, self.name.clone())
    }

    /// Looks up a field by name, visible to `requester`.
    #[must_use]
    pub fn field(&self, name: &str, requester: Accessor) -> Option<&Variable> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .filter(|field| can_access(field.accessor, requester))
    }

    /// Returns true if a field with the given name exists and is visible.
    #[must_use]
    pub fn has_field(&self, name: &str, requester: Accessor) -> bool {
        self.field(name, requester).is_some()
    }
}

/// A resolved class: fields plus methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// The class name.
    pub name: EcoString,
    /// Ordered fields.
    pub fields: Vec<Variable>,
    /// Ordered methods.
    pub methods: Vec<Function>,
}

impl Class {
    /// Creates a new class entity.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, fields: Vec<Variable>, methods: Vec<Function>) -> Self {
        Self {
            name: name.into(),
            fields,
            methods,
        }
    }

    /// A class entity is valid when it has a name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// Views this class as a [`Type`].
    #[must_use]
    pub fn as_type(&self) -> Type {
        Type::new(TypeKind::Class, self.name.clone())
    }

    /// Looks up a field by name, visible to `requester`.
    #[must_use]
    pub fn field(&self, name: &str, requester: Accessor) -> Option<&Variable> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .filter(|field| can_access(field.accessor, requester))
    }

    /// Returns true if a field with the given name exists and is visible.
    #[must_use]
    pub fn has_field(&self, name: &str, requester: Accessor) -> bool {
        self.field(name, requester).is_some()
    }

    /// Looks up a method by name, visible to `requester`.
    #[must_use]
    pub fn method(&self, name: &str, requester: Accessor) -> Option<&Function> {
        self.methods
            .iter()
            .find(|method| method.name == name)
            .filter(|method| can_access(method.accessor, requester))
    }

    /// Returns true if a method with the given name exists and is visible.
    #[must_use]
    pub fn has_method(&self, name: &str, requester: Accessor) -> bool {
        self.method(name, requester).is_some()
    }
}
