use std::fmt;

use super::Location;

/// A lowered expression, keeping its source text for diagnostics.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub text: String,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Ident(String),
    /// `pkg.Name`, where the operand is a plain identifier.
    Selector { qualifier: String, name: String },
    Call { callee: Box<Expr>, args: Vec<Argument> },
    /// `T{...}`; keyed and elided elements are kept as [`ExprKind::Opaque`].
    Composite { ty: TypeExpr, elements: Vec<Expr> },
    /// `&operand`
    AddressOf(Box<Expr>),
    Nil,
    /// Anything the resolver does not evaluate, tagged with its node kind.
    Opaque(String),
}

/// A call argument; `spread` marks `xs...`.
#[derive(Debug, Clone)]
pub struct Argument {
    pub value: Expr,
    pub spread: bool,
}

/// A lowered type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Named {
        qualifier: Option<String>,
        name: String,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array(Box<TypeExpr>),
    Other(String),
}

impl TypeExpr {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::Named {
            qualifier: None,
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn qualified(qualifier: &str, name: &str) -> Self {
        Self::Named {
            qualifier: Some(qualifier.to_string()),
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// The named type behind any number of pointers.
    #[must_use]
    pub fn strip_pointers(&self) -> &Self {
        match self {
            Self::Pointer(inner) => inner.strip_pointers(),
            other => other,
        }
    }

    /// `(qualifier, name)` of a possibly-pointer named type.
    #[must_use]
    pub fn named_parts(&self) -> Option<(Option<&str>, &str)> {
        match self.strip_pointers() {
            Self::Named {
                qualifier, name, ..
            } => Some((qualifier.as_deref(), name.as_str())),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::Slice(_) | Self::Array(_))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named {
                qualifier,
                name,
                args,
            } => {
                if let Some(q) = qualifier {
                    write!(f, "{q}.")?;
                }
                write!(f, "{name}")?;
                if !args.is_empty() {
                    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                    write!(f, "[{}]", args.join(", "))?;
                }
                Ok(())
            }
            Self::Pointer(inner) => write!(f, "*{inner}"),
            Self::Slice(inner) => write!(f, "[]{inner}"),
            Self::Array(inner) => write!(f, "[...]{inner}"),
            Self::Other(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strip_pointers_reaches_named() {
        let ty = TypeExpr::Pointer(Box::new(TypeExpr::qualified("baseapp", "BaseApp")));
        assert_eq!(ty.named_parts(), Some((Some("baseapp"), "BaseApp")));
    }

    #[test]
    fn display_renders_generics() {
        let ty = TypeExpr::Named {
            qualifier: None,
            name: "Base".to_string(),
            args: vec![TypeExpr::named("App")],
        };
        assert_eq!(ty.to_string(), "Base[App]");
        assert_eq!(
            TypeExpr::Slice(Box::new(TypeExpr::qualified("module", "AppModuleBasic"))).to_string(),
            "[]module.AppModuleBasic"
        );
    }

    #[test]
    fn slices_are_lists() {
        assert!(TypeExpr::Slice(Box::new(TypeExpr::named("T"))).is_list());
        assert!(!TypeExpr::named("T").is_list());
    }
}
