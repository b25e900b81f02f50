use ast_grep_core::Node;

use crate::types::ImportSpec;

/// 1-based line of a node.
pub(super) fn line<D: ast_grep_core::Doc>(node: &Node<D>) -> u32 {
    node.start_pos().line() as u32 + 1
}

/// Named children, comments excluded.
pub(super) fn named_children<'r, D: ast_grep_core::Doc>(node: &Node<'r, D>) -> Vec<Node<'r, D>> {
    node.children()
        .filter(|c| c.is_named() && c.kind().as_ref() != "comment")
        .collect()
}

pub(super) fn child_of_kind<'r, D: ast_grep_core::Doc>(
    node: &Node<'r, D>,
    kind: &str,
) -> Option<Node<'r, D>> {
    node.children().find(|c| c.kind().as_ref() == kind)
}

pub(super) fn children_of_kind<D: ast_grep_core::Doc>(node: &Node<D>, kind: &str) -> Vec<String> {
    node.children()
        .filter(|c| c.kind().as_ref() == kind)
        .map(|c| c.text().to_string())
        .collect()
}

/// Line of the first `ERROR` or zero-width `MISSING` node, depth first.
pub(super) fn first_error_line<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<u32> {
    if node.is_error() || node.is_missing() {
        return Some(line(node));
    }
    node.children().find_map(|child| first_error_line(&child))
}

/// Strip Go string quotes (interpreted or raw).
pub(super) fn unquote(text: &str) -> String {
    text.trim_matches('"').trim_matches('`').to_string()
}

// ── imports ───────────────────────────────────────────────────────

/// Extract specs from an `import_declaration`, single or grouped.
pub(super) fn import_specs<D: ast_grep_core::Doc>(node: &Node<D>) -> Vec<ImportSpec> {
    let mut specs = Vec::new();
    for child in node.children() {
        let kind = child.kind();
        match kind.as_ref() {
            "import_spec" => specs.extend(import_spec(&child)),
            "import_spec_list" => {
                for spec in child.children() {
                    if spec.kind().as_ref() == "import_spec" {
                        specs.extend(import_spec(&spec));
                    }
                }
            }
            _ => {}
        }
    }
    specs
}

fn import_spec<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<ImportSpec> {
    let path = node.field("path").map(|p| unquote(&p.text()))?;
    let alias = node.field("name").map(|n| n.text().to_string());
    Some(ImportSpec { alias, path })
}

// ── receivers ─────────────────────────────────────────────────────

/// Base type name of a receiver or embedded type node: `*Base[T]` → `Base`.
pub(super) fn base_type_name<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<(String, bool)> {
    let kind = node.kind();
    match kind.as_ref() {
        "type_identifier" => Some((node.text().to_string(), false)),
        "pointer_type" => {
            let inner = named_children(node).into_iter().next()?;
            base_type_name(&inner).map(|(name, _)| (name, true))
        }
        "generic_type" => {
            let inner = node.field("type")?;
            base_type_name(&inner)
        }
        "parenthesized_type" => {
            let inner = named_children(node).into_iter().next()?;
            base_type_name(&inner)
        }
        _ => None,
    }
}
