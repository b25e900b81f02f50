use std::collections::HashMap;
use std::rc::Rc;

use appscan_parser::{Argument, Expr, ExprKind, FuncDecl, SourceFile, TypeExpr, VarDecl};

use super::{Qualified, SymbolIndex};
use crate::error::ResolutionError;
use crate::types::TypeRef;

/// Where an expression is evaluated: its unit and file, the function whose
/// body holds it, and that function's parameter bindings.
#[derive(Debug, Clone)]
pub struct Frame<'t> {
    unit: &'t str,
    file: &'t SourceFile,
    function: Option<&'t FuncDecl>,
    bindings: Rc<HashMap<&'t str, Binding<'t>>>,
}

impl<'t> Frame<'t> {
    /// Package scope of `file`.
    #[must_use]
    pub fn package(file: &'t SourceFile) -> Self {
        Self::in_function(file, None)
    }

    /// The body of `function` in `file`, with no parameters bound.
    #[must_use]
    pub fn in_function(file: &'t SourceFile, function: Option<&'t FuncDecl>) -> Self {
        Self {
            unit: file.unit.as_str(),
            file,
            function,
            bindings: Rc::default(),
        }
    }

    fn bind(&self, expr: &'t Expr) -> Bound<'t> {
        Bound {
            expr,
            frame: self.clone(),
        }
    }
}

/// An expression paired with the frame it must be evaluated in.
#[derive(Debug, Clone)]
struct Bound<'t> {
    expr: &'t Expr,
    frame: Frame<'t>,
}

#[derive(Debug, Clone)]
enum Binding<'t> {
    Expr(Bound<'t>),
    /// Arguments collected by a variadic parameter.
    List(Vec<Bound<'t>>),
}

/// Static evaluation of module list expressions.
///
/// Lists resolve to their element expressions, each element to the module
/// type it instantiates. Every reference hop counts toward `max_depth`,
/// which is what stops cyclic declarations.
pub struct Evaluator<'t> {
    index: &'t SymbolIndex<'t>,
    max_depth: usize,
}

impl<'t> Evaluator<'t> {
    #[must_use]
    pub const fn new(index: &'t SymbolIndex<'t>, max_depth: usize) -> Self {
        Self { index, max_depth }
    }

    /// Modules contributed by the arguments of a registry constructor call.
    ///
    /// A spread argument contributes every element of its list; a plain
    /// argument contributes itself, unless it is a list literal.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] for the first argument or element that
    /// cannot be evaluated statically.
    pub fn module_list(
        &self,
        args: &'t [Argument],
        frame: &Frame<'t>,
    ) -> Result<Vec<TypeRef>, ResolutionError> {
        let mut elements = Vec::new();
        for arg in args {
            let bound = frame.bind(&arg.value);
            let literal_list =
                matches!(&arg.value.kind, ExprKind::Composite { ty, .. } if ty.is_list());
            if arg.spread || literal_list {
                elements.extend(self.list(&bound, 0)?);
            } else {
                elements.push(bound);
            }
        }
        elements.iter().map(|e| self.element(e, 0)).collect()
    }

    // ── lists ─────────────────────────────────────────────────────

    fn list(&self, bound: &Bound<'t>, depth: usize) -> Result<Vec<Bound<'t>>, ResolutionError> {
        self.check_depth(bound, depth)?;
        let (expr, frame) = (bound.expr, &bound.frame);
        match &expr.kind {
            ExprKind::Nil => Ok(Vec::new()),
            ExprKind::Composite { ty, elements } if ty.is_list() => {
                Ok(elements.iter().map(|e| frame.bind(e)).collect())
            }
            ExprKind::Composite { ty, .. } => {
                Err(unresolved(expr, format!("`{ty}` literal is not a list")))
            }
            ExprKind::Ident(name) => match self.ident(frame, name, expr)? {
                Target::List(items) => Ok(items),
                Target::Expr(next) => self.list(&next, depth + 1),
            },
            ExprKind::Selector { qualifier, name } => {
                let next = self.qualified_var(frame, qualifier, name, expr)?;
                self.list(&next, depth + 1)
            }
            ExprKind::Call { callee, args } => {
                if self.is_builtin_append(frame, callee) {
                    return self.append(frame, args, expr, depth);
                }
                let returned = self.call(frame, callee, args, expr)?;
                self.list(&returned, depth + 1)
            }
            ExprKind::AddressOf(_) => Err(unresolved(expr, "a pointer is not a list")),
            ExprKind::Opaque(kind) => Err(unresolved(
                expr,
                format!("unsupported `{kind}` expression in a module list"),
            )),
        }
    }

    /// `append(base, a, b)` or `append(base, more...)`, base elements first.
    fn append(
        &self,
        frame: &Frame<'t>,
        args: &'t [Argument],
        expr: &'t Expr,
        depth: usize,
    ) -> Result<Vec<Bound<'t>>, ResolutionError> {
        let Some((base, rest)) = args.split_first() else {
            return Err(unresolved(expr, "append without arguments"));
        };
        if base.spread {
            return Err(unresolved(expr, "append with a spread first argument"));
        }
        let mut items = self.list(&frame.bind(&base.value), depth + 1)?;
        for arg in rest {
            if arg.spread {
                items.extend(self.list(&frame.bind(&arg.value), depth + 1)?);
            } else {
                items.push(frame.bind(&arg.value));
            }
        }
        Ok(items)
    }

    fn is_builtin_append(&self, frame: &Frame<'t>, callee: &Expr) -> bool {
        let ExprKind::Ident(name) = &callee.kind else {
            return false;
        };
        name == "append"
            && !frame.bindings.contains_key("append")
            && frame
                .function
                .and_then(|f| f.body.as_ref())
                .is_none_or(|body| body.local("append").is_none())
            && self.index.lookup(frame.unit, "append").is_none()
    }

    // ── elements ──────────────────────────────────────────────────

    fn element(&self, bound: &Bound<'t>, depth: usize) -> Result<TypeRef, ResolutionError> {
        self.check_depth(bound, depth)?;
        let (expr, frame) = (bound.expr, &bound.frame);
        match &expr.kind {
            ExprKind::Composite { ty, .. } => self.literal_type(frame, ty, expr),
            ExprKind::AddressOf(inner) => self.element(&frame.bind(inner), depth + 1),
            ExprKind::Ident(name) => match self.ident(frame, name, expr)? {
                Target::Expr(next) => self.element(&next, depth + 1),
                Target::List(_) => Err(unresolved(
                    expr,
                    format!("`{name}` is a list, expected a single module"),
                )),
            },
            ExprKind::Selector { qualifier, name } => {
                let next = self.qualified_var(frame, qualifier, name, expr)?;
                self.element(&next, depth + 1)
            }
            ExprKind::Call { callee, args } => {
                if let ExprKind::Selector { qualifier, name } = &callee.kind
                    && let Qualified::External { path } =
                        self.index.lookup_qualified(frame.file, qualifier, name)
                {
                    return constructed_type(path, name).ok_or_else(|| {
                        unresolved(
                            expr,
                            format!("`{qualifier}.{name}` is not a New<Type> constructor"),
                        )
                    });
                }
                let returned = self.call(frame, callee, args, expr)?;
                self.element(&returned, depth + 1)
            }
            ExprKind::Nil => Err(unresolved(expr, "nil is not a module")),
            ExprKind::Opaque(kind) => Err(unresolved(
                expr,
                format!("unsupported `{kind}` expression as a module"),
            )),
        }
    }

    fn literal_type(
        &self,
        frame: &Frame<'t>,
        ty: &TypeExpr,
        expr: &Expr,
    ) -> Result<TypeRef, ResolutionError> {
        if ty.is_list() {
            return Err(unresolved(expr, "nested list literal"));
        }
        match ty.named_parts() {
            Some((None, name)) => Ok(TypeRef::new(frame.unit, name)),
            Some((Some(qualifier), name)) => self
                .index
                .import_path(frame.file, qualifier)
                .map(|path| TypeRef::new(path, name))
                .ok_or_else(|| {
                    unresolved(expr, format!("`{qualifier}` is not an imported package"))
                }),
            None => Err(unresolved(expr, format!("literal of unnamed type `{ty}`"))),
        }
    }

    // ── references ────────────────────────────────────────────────

    /// Parameters, then locals of the enclosing function, then package scope.
    fn ident(
        &self,
        frame: &Frame<'t>,
        name: &str,
        expr: &Expr,
    ) -> Result<Target<'t>, ResolutionError> {
        match frame.bindings.get(name) {
            Some(Binding::Expr(bound)) => return Ok(Target::Expr(bound.clone())),
            Some(Binding::List(items)) => return Ok(Target::List(items.clone())),
            None => {}
        }

        if let Some(function) = frame.function {
            if function
                .params
                .iter()
                .any(|p| p.name.as_deref() == Some(name))
            {
                return Err(unresolved(
                    expr,
                    format!("parameter `{name}` has no statically known argument"),
                ));
            }
            if let Some(body) = &function.body {
                if body.is_reassigned(name) {
                    return Err(unresolved(
                        expr,
                        format!("local `{name}` is assigned more than once"),
                    ));
                }
                if let Some(local) = body.local(name) {
                    return Ok(Target::Expr(frame.bind(&local.value)));
                }
            }
        }

        let Some(symbol) = self.index.lookup(frame.unit, name) else {
            return Err(unresolved(expr, format!("unknown identifier `{name}`")));
        };
        match symbol.as_var() {
            Some(var) => var_value(var, symbol.file, expr).map(Target::Expr),
            None => Err(unresolved(expr, format!("`{name}` is not a variable"))),
        }
    }

    fn qualified_var(
        &self,
        frame: &Frame<'t>,
        qualifier: &str,
        name: &str,
        expr: &Expr,
    ) -> Result<Bound<'t>, ResolutionError> {
        match self.index.lookup_qualified(frame.file, qualifier, name) {
            Qualified::InTree { symbol, .. } => match symbol.as_var() {
                Some(var) => var_value(var, symbol.file, expr),
                None => Err(unresolved(
                    expr,
                    format!("`{qualifier}.{name}` is not a variable"),
                )),
            },
            Qualified::External { path } => Err(unresolved(
                expr,
                format!("`{qualifier}.{name}` is declared outside the loaded tree ({path})"),
            )),
            Qualified::Missing { path } => {
                Err(unresolved(expr, format!("{path} declares no `{name}`")))
            }
            Qualified::UnknownQualifier => Err(unresolved(
                expr,
                format!("`{qualifier}` is not an imported package"),
            )),
        }
    }

    // ── calls ─────────────────────────────────────────────────────

    /// Evaluate a call to an in-tree function down to its returned expression.
    fn call(
        &self,
        frame: &Frame<'t>,
        callee: &'t Expr,
        args: &'t [Argument],
        expr: &'t Expr,
    ) -> Result<Bound<'t>, ResolutionError> {
        let symbol = match &callee.kind {
            ExprKind::Ident(name) => {
                let shadowed = frame.bindings.contains_key(name.as_str())
                    || frame
                        .function
                        .and_then(|f| f.body.as_ref())
                        .is_some_and(|body| body.local(name).is_some());
                if shadowed {
                    None
                } else {
                    self.index.lookup(frame.unit, name)
                }
            }
            ExprKind::Selector { qualifier, name } => {
                match self.index.lookup_qualified(frame.file, qualifier, name) {
                    Qualified::InTree { symbol, .. } => Some(symbol),
                    _ => None,
                }
            }
            _ => None,
        };
        let Some((function, file)) = symbol.and_then(|s| s.as_func().map(|f| (f, s.file))) else {
            return Err(unresolved(
                expr,
                format!("call to `{}` cannot be evaluated statically", callee.text),
            ));
        };

        let Some(body) = &function.body else {
            return Err(unresolved(
                expr,
                format!("function `{}` has no body", function.name),
            ));
        };
        let [returned] = body.returns.as_slice() else {
            return Err(unresolved(
                expr,
                format!(
                    "function `{}` has {} return statements, expected exactly one",
                    function.name,
                    body.returns.len()
                ),
            ));
        };
        let [value] = returned.values.as_slice() else {
            return Err(unresolved(
                expr,
                format!("function `{}` does not return exactly one value", function.name),
            ));
        };

        let bindings = bind_params(function, args, frame, expr)?;
        Ok(Bound {
            expr: value,
            frame: Frame {
                unit: file.unit.as_str(),
                file,
                function: Some(function),
                bindings: Rc::new(bindings),
            },
        })
    }

    fn check_depth(&self, bound: &Bound<'t>, depth: usize) -> Result<(), ResolutionError> {
        if depth > self.max_depth {
            return Err(unresolved(
                bound.expr,
                format!(
                    "reference chain deeper than {} (cyclic declaration?)",
                    self.max_depth
                ),
            ));
        }
        Ok(())
    }
}

enum Target<'t> {
    Expr(Bound<'t>),
    List(Vec<Bound<'t>>),
}

/// Bind call arguments to parameters. A variadic parameter takes the
/// remaining arguments as a list, or the single spread argument as is.
fn bind_params<'t>(
    function: &'t FuncDecl,
    args: &'t [Argument],
    caller: &Frame<'t>,
    expr: &Expr,
) -> Result<HashMap<&'t str, Binding<'t>>, ResolutionError> {
    let mut bindings = HashMap::new();
    for (i, param) in function.params.iter().enumerate() {
        let binding = if param.variadic {
            match &args[i.min(args.len())..] {
                [only] if only.spread => Binding::Expr(caller.bind(&only.value)),
                rest if rest.iter().any(|a| a.spread) => {
                    return Err(unresolved(expr, "spread argument mixed with plain arguments"));
                }
                rest => Binding::List(rest.iter().map(|a| caller.bind(&a.value)).collect()),
            }
        } else {
            match args.get(i) {
                Some(arg) if !arg.spread => Binding::Expr(caller.bind(&arg.value)),
                Some(_) => {
                    return Err(unresolved(expr, "spread argument for a plain parameter"));
                }
                None => {
                    return Err(unresolved(
                        expr,
                        format!("missing argument {} of `{}`", i + 1, function.name),
                    ));
                }
            }
        };
        if let Some(name) = param.name.as_deref()
            && name != "_"
        {
            bindings.insert(name, binding);
        }
    }
    Ok(bindings)
}

fn var_value<'t>(
    var: &'t VarDecl,
    file: &'t SourceFile,
    expr: &Expr,
) -> Result<Bound<'t>, ResolutionError> {
    match &var.value {
        Some(value) => Ok(Bound {
            expr: value,
            frame: Frame::package(file),
        }),
        None => Err(unresolved(
            expr,
            format!("variable `{}` is declared without a value", var.name),
        )),
    }
}

/// `NewFoo` builds a `Foo`.
fn constructed_type(path: &str, function: &str) -> Option<TypeRef> {
    function
        .strip_prefix("New")
        .filter(|name| name.starts_with(|c: char| c.is_ascii_uppercase()))
        .map(|name| TypeRef::new(path, name))
}

fn unresolved(expr: &Expr, reason: impl Into<String>) -> ResolutionError {
    ResolutionError {
        expression: expr.text.clone(),
        location: expr.location.clone(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_names_map_to_types() {
        assert_eq!(
            constructed_type("github.com/acme/x/gov", "NewAppModuleBasic"),
            Some(TypeRef::new("github.com/acme/x/gov", "AppModuleBasic"))
        );
        assert_eq!(constructed_type("p", "New"), None);
        assert_eq!(constructed_type("p", "Newsletter"), None);
        assert_eq!(constructed_type("p", "MakeThing"), None);
    }
}
