use ast_grep_core::Node;

use super::Lowering;
use super::helpers::{self, child_of_kind, children_of_kind, named_children};
use crate::types::{
    Declaration, FieldDecl, FuncBody, FuncDecl, InterfaceBody, InterfaceMethod, LocalBinding,
    Param, Receiver, ReturnStmt, TypeBody, TypeDecl, TypeExpr, VarDecl,
};

impl Lowering<'_> {
    // ── functions and methods ─────────────────────────────────────

    pub(super) fn function<D: ast_grep_core::Doc>(&self, node: &Node<D>) -> Option<Declaration> {
        let name = node.field("name")?.text().to_string();
        let receiver = node.field("receiver").and_then(|list| receiver(&list));
        let type_params = node
            .field("type_parameters")
            .map(|list| type_parameter_names(&list))
            .unwrap_or_default();
        let params = node
            .field("parameters")
            .map(|list| self.parameters(&list))
            .unwrap_or_default();
        let result_arity = self.result_arity(node);
        let body = node.field("body").map(|block| self.body(&block));

        Some(Declaration::Func(FuncDecl {
            name,
            receiver,
            type_params,
            params,
            result_arity,
            body,
            location: self.location(node),
        }))
    }

    /// One [`Param`] per declared name; an unnamed parameter yields one entry.
    fn parameters<D: ast_grep_core::Doc>(&self, list: &Node<D>) -> Vec<Param> {
        let mut params = Vec::new();
        for decl in list.children() {
            let kind = decl.kind();
            let variadic = match kind.as_ref() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };
            let ty = decl
                .field("type")
                .map_or_else(|| TypeExpr::Other(String::new()), |t| self.type_expr(&t));
            let names = children_of_kind(&decl, "identifier");
            if names.is_empty() {
                params.push(Param {
                    name: None,
                    ty,
                    variadic,
                });
            } else {
                params.extend(names.into_iter().map(|name| Param {
                    name: Some(name),
                    ty: ty.clone(),
                    variadic,
                }));
            }
        }
        params
    }

    /// `(int, error)` counts its entries, a bare type counts one.
    fn result_arity<D: ast_grep_core::Doc>(&self, node: &Node<D>) -> usize {
        node.field("result").map_or(0, |result| {
            if result.kind().as_ref() == "parameter_list" {
                self.parameters(&result).len()
            } else {
                1
            }
        })
    }

    // ── bodies ────────────────────────────────────────────────────

    fn body<D: ast_grep_core::Doc>(&self, block: &Node<D>) -> FuncBody {
        let mut body = FuncBody::default();
        self.collect_statements(block, &mut body);
        body
    }

    /// Walk statements depth first. Nested function literals have their own
    /// scope and returns, so they are not entered.
    fn collect_statements<D: ast_grep_core::Doc>(&self, node: &Node<D>, body: &mut FuncBody) {
        for child in node.children() {
            let kind = child.kind();
            match kind.as_ref() {
                "func_literal" => {}
                "return_statement" => {
                    let values = child_of_kind(&child, "expression_list")
                        .map(|list| named_children(&list).iter().map(|e| self.expr(e)).collect())
                        .unwrap_or_default();
                    body.returns.push(ReturnStmt {
                        values,
                        location: self.location(&child),
                    });
                }
                "short_var_declaration" => {
                    let left = child.field("left").map(|l| named_children(&l)).unwrap_or_default();
                    let right = child.field("right").map(|r| named_children(&r)).unwrap_or_default();
                    self.bind_locals(body, &left, &right);
                    self.collect_statements(&child, body);
                }
                "var_declaration" => {
                    for spec in var_specs(&child) {
                        let names: Vec<Node<D>> = spec
                            .children()
                            .filter(|c| c.kind().as_ref() == "identifier")
                            .collect();
                        let values = spec
                            .field("value")
                            .map(|v| named_children(&v))
                            .unwrap_or_default();
                        self.bind_locals(body, &names, &values);
                    }
                    self.collect_statements(&child, body);
                }
                "assignment_statement" => {
                    if let Some(left) = child.field("left") {
                        for target in named_children(&left) {
                            if target.kind().as_ref() == "identifier" {
                                mark_reassigned(body, &target.text());
                            }
                        }
                    }
                    self.collect_statements(&child, body);
                }
                _ => self.collect_statements(&child, body),
            }
        }
    }

    fn bind_locals<D: ast_grep_core::Doc>(
        &self,
        body: &mut FuncBody,
        names: &[Node<D>],
        values: &[Node<D>],
    ) {
        // `a, b := f()` binds names to parts of one value; neither is tracked.
        let paired = names.len() == values.len();
        for (i, name) in names.iter().enumerate() {
            let name = name.text().to_string();
            if name == "_" {
                continue;
            }
            if body.local(&name).is_some() {
                mark_reassigned(body, &name);
                continue;
            }
            if !paired {
                mark_reassigned(body, &name);
                continue;
            }
            body.locals.push(LocalBinding {
                value: self.expr(&values[i]),
                location: self.location(&values[i]),
                name,
            });
        }
    }

    // ── types ─────────────────────────────────────────────────────

    pub(super) fn type_declaration<D: ast_grep_core::Doc>(&self, node: &Node<D>) -> Vec<Declaration> {
        node.children()
            .filter_map(|spec| {
                let alias = match spec.kind().as_ref() {
                    "type_spec" => false,
                    "type_alias" => true,
                    _ => return None,
                };
                let name = spec.field("name")?.text().to_string();
                let type_params = spec
                    .field("type_parameters")
                    .map(|list| type_parameter_names(&list))
                    .unwrap_or_default();
                let ty = spec.field("type")?;
                let body = match ty.kind().as_ref() {
                    "struct_type" => TypeBody::Struct(self.fields(&ty)),
                    "interface_type" => TypeBody::Interface(self.interface_body(&ty)),
                    _ if alias => TypeBody::Alias(self.type_expr(&ty)),
                    _ => TypeBody::Defined(self.type_expr(&ty)),
                };
                Some(Declaration::Type(TypeDecl {
                    name,
                    type_params,
                    body,
                    location: self.location(&spec),
                }))
            })
            .collect()
    }

    fn fields<D: ast_grep_core::Doc>(&self, struct_type: &Node<D>) -> Vec<FieldDecl> {
        let Some(list) = child_of_kind(struct_type, "field_declaration_list") else {
            return Vec::new();
        };
        list.children()
            .filter(|f| f.kind().as_ref() == "field_declaration")
            .filter_map(|field| {
                let ty_node = field.field("type")?;
                let names = children_of_kind(&field, "field_identifier");
                let pointer = names.is_empty() && child_of_kind(&field, "*").is_some();
                let mut ty = self.type_expr(&ty_node);
                let mut type_text = ty_node.text().to_string();
                if pointer {
                    ty = TypeExpr::Pointer(Box::new(ty));
                    type_text.insert(0, '*');
                }
                Some(FieldDecl {
                    names,
                    ty,
                    type_text,
                    location: self.location(&field),
                })
            })
            .collect()
    }

    fn interface_body<D: ast_grep_core::Doc>(&self, interface_type: &Node<D>) -> InterfaceBody {
        let mut body = InterfaceBody::default();
        for elem in interface_type.children() {
            match elem.kind().as_ref() {
                "method_elem" | "method_spec" => {
                    let Some(name) = elem.field("name") else {
                        continue;
                    };
                    let param_arity = elem
                        .field("parameters")
                        .map_or(0, |list| self.parameters(&list).len());
                    body.methods.push(InterfaceMethod {
                        name: name.text().to_string(),
                        param_arity,
                        result_arity: self.result_arity(&elem),
                    });
                }
                "type_elem" | "constraint_elem" | "interface_type_name" => {
                    // `A | B` and `~T` are type sets, not embeds.
                    let terms = named_children(&elem);
                    if let [term] = terms.as_slice()
                        && matches!(
                            term.kind().as_ref(),
                            "type_identifier" | "qualified_type" | "generic_type"
                        )
                    {
                        body.embeds.push(self.type_expr(term));
                    }
                }
                _ => {}
            }
        }
        body
    }

    // ── package-level vars and consts ─────────────────────────────

    pub(super) fn value_declaration<D: ast_grep_core::Doc>(
        &self,
        node: &Node<D>,
        is_const: bool,
    ) -> Vec<Declaration> {
        let mut decls = Vec::new();
        for spec in var_specs(node) {
            let ty = spec.field("type").map(|t| self.type_expr(&t));
            let names = children_of_kind(&spec, "identifier");
            let values = spec
                .field("value")
                .map(|v| named_children(&v))
                .unwrap_or_default();
            let paired = names.len() == values.len();
            for (i, name) in names.into_iter().enumerate() {
                let value = if paired {
                    Some(self.expr(&values[i]))
                } else {
                    None
                };
                decls.push(Declaration::Var(VarDecl {
                    name,
                    ty: ty.clone(),
                    value,
                    is_const,
                    location: self.location(&spec),
                }));
            }
        }
        decls
    }
}

/// `var_spec`/`const_spec` nodes of a declaration, flattening grouped forms.
fn var_specs<'r, D: ast_grep_core::Doc>(node: &Node<'r, D>) -> Vec<Node<'r, D>> {
    let mut specs = Vec::new();
    for child in node.children() {
        match child.kind().as_ref() {
            "var_spec" | "const_spec" => specs.push(child),
            "var_spec_list" | "const_spec_list" => specs.extend(
                child
                    .children()
                    .filter(|c| matches!(c.kind().as_ref(), "var_spec" | "const_spec")),
            ),
            _ => {}
        }
    }
    specs
}

fn receiver<D: ast_grep_core::Doc>(list: &Node<D>) -> Option<Receiver> {
    let param = child_of_kind(list, "parameter_declaration")?;
    let ty = param.field("type")?;
    let (type_name, pointer) = helpers::base_type_name(&ty)?;
    Some(Receiver { type_name, pointer })
}

fn type_parameter_names<D: ast_grep_core::Doc>(list: &Node<D>) -> Vec<String> {
    list.children()
        .filter(|c| c.kind().as_ref() == "type_parameter_declaration")
        .flat_map(|decl| children_of_kind(&decl, "identifier"))
        .collect()
}

fn mark_reassigned(body: &mut FuncBody, name: &str) {
    if !body.is_reassigned(name) {
        body.reassigned.push(name.to_string());
    }
}
