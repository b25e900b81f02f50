//! Go lowering: turns an ast-grep tree into a [`SourceFile`].
//!
//! The tree-sitter Go grammar is walked directly. Only the shapes the
//! discovery pipeline evaluates get structured variants; everything else is
//! kept as opaque text so diagnostics can still quote it.

mod declarations;
mod expressions;
mod helpers;

use std::path::Path;

use ast_grep_core::AstGrep;
use ast_grep_language::SupportLang;

use crate::error::ParseError;
use crate::types::SourceFile;

pub(super) struct Lowering<'p> {
    path: &'p Path,
}

/// Lower a parsed Go file.
///
/// `path` is recorded in every [`Location`](crate::types::Location) and should
/// be relative to the walk root. `tracked_calls` lists the function names
/// whose call sites are collected.
///
/// # Errors
///
/// Returns a [`ParseError`] when the tree contains syntax errors or the file
/// has no `package` clause.
pub fn lower<D: ast_grep_core::Doc<Lang = SupportLang>>(
    root: &AstGrep<D>,
    path: &Path,
    tracked_calls: &[String],
) -> Result<SourceFile, ParseError> {
    let source = root.root();
    if let Some(line) = helpers::first_error_line(&source) {
        return Err(ParseError::new(path, Some(line), "syntax error"));
    }

    let lowering = Lowering { path };
    let mut package = None;
    let mut imports = Vec::new();
    let mut declarations = Vec::new();

    for child in source.children() {
        let kind = child.kind();
        match kind.as_ref() {
            "package_clause" => {
                package = helpers::child_of_kind(&child, "package_identifier")
                    .map(|p| p.text().to_string());
            }
            "import_declaration" => imports.extend(helpers::import_specs(&child)),
            "function_declaration" | "method_declaration" => {
                declarations.extend(lowering.function(&child));
            }
            "type_declaration" => declarations.extend(lowering.type_declaration(&child)),
            "var_declaration" => declarations.extend(lowering.value_declaration(&child, false)),
            "const_declaration" => declarations.extend(lowering.value_declaration(&child, true)),
            _ => {}
        }
    }

    let Some(package) = package else {
        return Err(ParseError::new(path, None, "missing package clause"));
    };
    let call_sites = lowering.call_sites(&source, tracked_calls);

    Ok(SourceFile {
        path: path.to_path_buf(),
        unit: String::new(),
        package,
        imports,
        declarations,
        call_sites,
    })
}

#[cfg(test)]
mod tests;
