use std::path::Path;

use ast_grep_language::LanguageExt;
use pretty_assertions::assert_eq;

use super::*;
pub(super) use crate::types::{
    Declaration, ExprKind, FieldDecl, FuncDecl, SourceFile, TypeBody, TypeDecl, TypeExpr, VarDecl,
};

mod call_sites;
mod expressions;

const FIXTURE: &str = include_str!("../../../../tests/fixtures/app.go");

fn lower_source(source: &str) -> SourceFile {
    lower_tracking(source, &[])
}

fn lower_tracking(source: &str, tracked: &[&str]) -> SourceFile {
    let root = SupportLang::Go.ast_grep(source);
    let tracked: Vec<String> = tracked.iter().map(ToString::to_string).collect();
    lower(&root, Path::new("app/app.go"), &tracked).expect("lowering should succeed")
}

fn find_type<'a>(file: &'a SourceFile, name: &str) -> &'a TypeDecl {
    file.types()
        .find(|t| t.name == name)
        .unwrap_or_else(|| panic!("should find type named '{name}'"))
}

fn find_func<'a>(file: &'a SourceFile, name: &str) -> &'a FuncDecl {
    file.functions()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("should find function named '{name}'"))
}

fn find_var<'a>(file: &'a SourceFile, name: &str) -> &'a VarDecl {
    file.declarations
        .iter()
        .find_map(|d| match d {
            Declaration::Var(v) if v.name == name => Some(v),
            _ => None,
        })
        .unwrap_or_else(|| panic!("should find var named '{name}'"))
}

// ── Package clause and imports ─────────────────────────────────────

#[test]
fn package_name_recorded() {
    let file = lower_source(FIXTURE);
    assert_eq!(file.package, "app");
    assert_eq!(file.path, Path::new("app/app.go"));
    assert!(file.unit.is_empty(), "unit is filled in by the loader");
}

#[test]
fn grouped_imports_with_aliases() {
    let file = lower_source(FIXTURE);
    assert_eq!(file.imports.len(), 8);
    let bank = file
        .imports
        .iter()
        .find(|i| i.path == "github.com/cosmos/cosmos-sdk/x/bank/keeper")
        .expect("bank keeper import");
    assert_eq!(bank.alias.as_deref(), Some("bankkeeper"));
    let module = file
        .imports
        .iter()
        .find(|i| i.path == "github.com/cosmos/cosmos-sdk/types/module")
        .expect("module import");
    assert_eq!(module.alias, None);
}

#[test]
fn single_import_and_blank_alias() {
    let file = lower_source("package x\n\nimport _ \"embed\"\nimport . \"fmt\"\n");
    assert_eq!(file.imports.len(), 2);
    assert_eq!(file.imports[0].alias.as_deref(), Some("_"));
    assert_eq!(file.imports[0].path, "embed");
    assert_eq!(file.imports[1].alias.as_deref(), Some("."));
}

#[test]
fn raw_string_import_path() {
    let file = lower_source("package x\n\nimport `example.com/m/v2`\n");
    assert_eq!(file.imports[0].path, "example.com/m/v2");
}
