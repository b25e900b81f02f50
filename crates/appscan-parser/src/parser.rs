//! ast-grep wrapper for Go sources.

use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::SupportLang;

/// The concrete AST tree type returned by `parse_source`.
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

/// Parse Go source code into an ast-grep tree.
///
/// Tree-sitter is error tolerant: a malformed file still yields a tree, with
/// `ERROR` nodes where recovery happened. Lowering rejects such trees.
#[must_use]
pub fn parse_source(source: &str) -> AstTree {
    use ast_grep_language::LanguageExt;
    SupportLang::Go.ast_grep(source)
}
