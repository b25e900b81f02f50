use ast_grep_core::Node;
use ast_grep_core::matcher::KindMatcher;
use ast_grep_language::SupportLang;

use super::Lowering;
use super::helpers::{self, named_children};
use crate::types::{Argument, CallSite, Enclosing, Expr, ExprKind, Location, TypeExpr};

impl Lowering<'_> {
    pub(super) fn location<D: ast_grep_core::Doc>(&self, node: &Node<D>) -> Location {
        Location::new(self.path, helpers::line(node))
    }

    // ── expressions ───────────────────────────────────────────────

    pub(super) fn expr<D: ast_grep_core::Doc>(&self, node: &Node<D>) -> Expr {
        let kind = self.expr_kind(node);
        Expr {
            kind,
            text: node.text().to_string(),
            location: self.location(node),
        }
    }

    fn expr_kind<D: ast_grep_core::Doc>(&self, node: &Node<D>) -> ExprKind {
        let kind = node.kind();
        match kind.as_ref() {
            "identifier" => ExprKind::Ident(node.text().to_string()),
            "nil" => ExprKind::Nil,
            "parenthesized_expression" => named_children(node)
                .first()
                .map_or_else(|| ExprKind::Opaque(kind.to_string()), |inner| self.expr_kind(inner)),
            "selector_expression" => {
                let operand = node.field("operand");
                let field = node.field("field");
                match (operand, field) {
                    (Some(operand), Some(field)) if operand.kind().as_ref() == "identifier" => {
                        ExprKind::Selector {
                            qualifier: operand.text().to_string(),
                            name: field.text().to_string(),
                        }
                    }
                    _ => ExprKind::Opaque(kind.to_string()),
                }
            }
            "call_expression" => match (node.field("function"), node.field("arguments")) {
                (Some(function), Some(arguments)) => ExprKind::Call {
                    callee: Box::new(self.expr(&function)),
                    args: self.arguments(&arguments),
                },
                _ => ExprKind::Opaque(kind.to_string()),
            },
            "composite_literal" => match (node.field("type"), node.field("body")) {
                (Some(ty), Some(body)) => ExprKind::Composite {
                    ty: self.type_expr(&ty),
                    elements: self.literal_elements(&body),
                },
                _ => ExprKind::Opaque(kind.to_string()),
            },
            "unary_expression" => {
                let operator = node.field("operator").map(|o| o.text().to_string());
                match (operator.as_deref(), node.field("operand")) {
                    (Some("&"), Some(operand)) => ExprKind::AddressOf(Box::new(self.expr(&operand))),
                    _ => ExprKind::Opaque(kind.to_string()),
                }
            }
            other => ExprKind::Opaque(other.to_string()),
        }
    }

    /// Arguments of an `argument_list`, marking `xs...` as spread.
    ///
    /// Newer grammars wrap the spread in `variadic_argument`; older ones leave
    /// a bare `...` token after the expression.
    fn arguments<D: ast_grep_core::Doc>(&self, node: &Node<D>) -> Vec<Argument> {
        let mut args: Vec<Argument> = Vec::new();
        for child in node.children() {
            let kind = child.kind();
            match kind.as_ref() {
                "variadic_argument" => {
                    if let Some(inner) = named_children(&child).first() {
                        args.push(Argument {
                            value: self.expr(inner),
                            spread: true,
                        });
                    }
                }
                "..." => {
                    if let Some(last) = args.last_mut() {
                        last.spread = true;
                    }
                }
                "comment" => {}
                _ if child.is_named() => args.push(Argument {
                    value: self.expr(&child),
                    spread: false,
                }),
                _ => {}
            }
        }
        args
    }

    fn literal_elements<D: ast_grep_core::Doc>(&self, body: &Node<D>) -> Vec<Expr> {
        named_children(body)
            .iter()
            .map(|element| {
                let kind = element.kind();
                match kind.as_ref() {
                    "literal_element" => match named_children(element).first() {
                        Some(inner) if inner.kind().as_ref() != "literal_value" => self.expr(inner),
                        _ => Expr {
                            kind: ExprKind::Opaque("literal_value".to_string()),
                            text: element.text().to_string(),
                            location: self.location(element),
                        },
                    },
                    "keyed_element" | "literal_value" => Expr {
                        kind: ExprKind::Opaque(kind.to_string()),
                        text: element.text().to_string(),
                        location: self.location(element),
                    },
                    _ => self.expr(element),
                }
            })
            .collect()
    }

    // ── types ─────────────────────────────────────────────────────

    pub(super) fn type_expr<D: ast_grep_core::Doc>(&self, node: &Node<D>) -> TypeExpr {
        let kind = node.kind();
        match kind.as_ref() {
            "type_identifier" => TypeExpr::named(&node.text()),
            "qualified_type" => match (node.field("package"), node.field("name")) {
                (Some(package), Some(name)) => TypeExpr::qualified(&package.text(), &name.text()),
                _ => TypeExpr::Other(node.text().to_string()),
            },
            "generic_type" => {
                let base = node.field("type").map(|t| self.type_expr(&t));
                let args = node
                    .field("type_arguments")
                    .map(|list| {
                        named_children(&list)
                            .iter()
                            .map(|arg| self.type_expr(arg))
                            .collect()
                    })
                    .unwrap_or_default();
                match base {
                    Some(TypeExpr::Named {
                        qualifier, name, ..
                    }) => TypeExpr::Named {
                        qualifier,
                        name,
                        args,
                    },
                    _ => TypeExpr::Other(node.text().to_string()),
                }
            }
            "pointer_type" => named_children(node).first().map_or_else(
                || TypeExpr::Other(node.text().to_string()),
                |inner| TypeExpr::Pointer(Box::new(self.type_expr(inner))),
            ),
            "slice_type" => node.field("element").map_or_else(
                || TypeExpr::Other(node.text().to_string()),
                |element| TypeExpr::Slice(Box::new(self.type_expr(&element))),
            ),
            "array_type" | "implicit_length_array_type" => node.field("element").map_or_else(
                || TypeExpr::Other(node.text().to_string()),
                |element| TypeExpr::Array(Box::new(self.type_expr(&element))),
            ),
            "parenthesized_type" | "type_elem" => named_children(node).first().map_or_else(
                || TypeExpr::Other(node.text().to_string()),
                |inner| self.type_expr(inner),
            ),
            _ => TypeExpr::Other(node.text().to_string()),
        }
    }

    // ── tracked call sites ────────────────────────────────────────

    /// Every call whose callee's final name is in `tracked`, in source order.
    pub(super) fn call_sites<D: ast_grep_core::Doc<Lang = SupportLang>>(
        &self,
        source: &Node<D>,
        tracked: &[String],
    ) -> Vec<CallSite> {
        if tracked.is_empty() {
            return Vec::new();
        }
        let matcher = KindMatcher::new("call_expression", SupportLang::Go);
        let mut sites = Vec::new();
        for node in source.find_all(&matcher) {
            let Some(callee) = node.field("function") else {
                continue;
            };
            let name = match callee.kind().as_ref() {
                "identifier" => callee.text().to_string(),
                "selector_expression" => match callee.field("field") {
                    Some(field) => field.text().to_string(),
                    None => continue,
                },
                _ => continue,
            };
            if !tracked.iter().any(|t| *t == name) {
                continue;
            }
            sites.push(CallSite {
                call: self.expr(&node),
                enclosing: enclosing_function(&node),
            });
        }
        sites
    }
}

fn enclosing_function<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<Enclosing> {
    let function = node.ancestors().find(|a| {
        let kind = a.kind();
        kind.as_ref() == "function_declaration" || kind.as_ref() == "method_declaration"
    })?;
    let name = function.field("name")?.text().to_string();
    let receiver = function
        .field("receiver")
        .and_then(|list| helpers::child_of_kind(&list, "parameter_declaration"))
        .and_then(|param| param.field("type"))
        .and_then(|ty| helpers::base_type_name(&ty))
        .map(|(name, _)| name);
    Some(Enclosing { receiver, name })
}
