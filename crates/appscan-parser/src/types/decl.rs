use super::{Expr, Location, TypeExpr};

/// A top-level declaration.
#[derive(Debug, Clone)]
pub enum Declaration {
    Type(TypeDecl),
    Var(VarDecl),
    Func(FuncDecl),
}

impl Declaration {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Type(t) => &t.name,
            Self::Var(v) => &v.name,
            Self::Func(f) => &f.name,
        }
    }

    #[must_use]
    pub const fn location(&self) -> &Location {
        match self {
            Self::Type(t) => &t.location,
            Self::Var(v) => &v.location,
            Self::Func(f) => &f.location,
        }
    }
}

/// `type Name[T any] <body>`.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub body: TypeBody,
    pub location: Location,
}

impl TypeDecl {
    #[must_use]
    pub fn fields(&self) -> &[FieldDecl] {
        match &self.body {
            TypeBody::Struct(fields) => fields,
            _ => &[],
        }
    }

    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self.body, TypeBody::Struct(_))
    }
}

#[derive(Debug, Clone)]
pub enum TypeBody {
    Struct(Vec<FieldDecl>),
    Interface(InterfaceBody),
    /// `type A = B`: shares B's method set.
    Alias(TypeExpr),
    /// `type A B`: a new type, B's methods are not inherited.
    Defined(TypeExpr),
}

/// Method elements and embedded interfaces of an `interface { ... }`.
/// Constraint elements (`~int`, unions) are not kept.
#[derive(Debug, Clone, Default)]
pub struct InterfaceBody {
    pub methods: Vec<InterfaceMethod>,
    pub embeds: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMethod {
    pub name: String,
    pub param_arity: usize,
    pub result_arity: usize,
}

/// One struct field line. `A, B T` has two names; an embedded field has none.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// The type as written.
    pub type_text: String,
    pub location: Location,
}

impl FieldDecl {
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// One name bound by a `var` or `const` spec.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub value: Option<Expr>,
    pub is_const: bool,
    pub location: Location,
}

/// A function or method declaration.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub receiver: Option<Receiver>,
    pub type_params: Vec<String>,
    /// One entry per declared parameter name (`a, b int` yields two).
    pub params: Vec<Param>,
    pub result_arity: usize,
    pub body: Option<FuncBody>,
    pub location: Location,
}

impl FuncDecl {
    #[must_use]
    pub fn param_arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    /// Base type name, pointer and type arguments stripped.
    pub type_name: String,
    pub pointer: bool,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeExpr,
    pub variadic: bool,
}

/// The parts of a function body the resolver can evaluate.
#[derive(Debug, Clone, Default)]
pub struct FuncBody {
    /// Every `return` outside nested function literals.
    pub returns: Vec<ReturnStmt>,
    /// `x := v` and `var x = v` bindings, in source order.
    pub locals: Vec<LocalBinding>,
    /// Names assigned after their declaration, or declared twice.
    pub reassigned: Vec<String>,
}

impl FuncBody {
    #[must_use]
    pub fn local(&self, name: &str) -> Option<&LocalBinding> {
        self.locals.iter().find(|l| l.name == name)
    }

    #[must_use]
    pub fn is_reassigned(&self, name: &str) -> bool {
        self.reassigned.iter().any(|r| r == name)
    }
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub values: Vec<Expr>,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub struct LocalBinding {
    pub name: String,
    pub value: Expr,
    pub location: Location,
}
