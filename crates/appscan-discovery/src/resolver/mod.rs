//! Per-unit symbol tables and reference resolution.
//!
//! Indexing is two-pass: every unit's declarations are collected first, and
//! references are only resolved on demand afterwards, so declaration order
//! across files and units never matters.

mod eval;
mod imports;
mod symbols;

use std::collections::HashMap;

use appscan_parser::{SourceFile, SourceTree, Unit};

pub use eval::{Evaluator, Frame};
pub use imports::conventional_name;
pub use symbols::{Duplicate, Method, Symbol, UnitSymbols};

/// Where a qualified reference `q.Name` points.
#[derive(Debug, Clone, Copy)]
pub enum Qualified<'t> {
    /// Declared in a loaded unit.
    InTree { unit: &'t str, symbol: Symbol<'t> },
    /// The qualifier names a package outside the loaded tree.
    External { path: &'t str },
    /// The qualifier names a loaded unit that has no such symbol.
    Missing { path: &'t str },
    /// The qualifier is not an import of the referencing file.
    UnknownQualifier,
}

/// Symbol tables for every unit of a [`SourceTree`].
#[derive(Debug)]
pub struct SymbolIndex<'t> {
    tree: &'t SourceTree,
    units: HashMap<&'t str, UnitSymbols<'t>>,
    packages: HashMap<&'t str, &'t str>,
    duplicates: Vec<Duplicate>,
}

impl<'t> SymbolIndex<'t> {
    #[must_use]
    pub fn build(tree: &'t SourceTree) -> Self {
        let mut duplicates = Vec::new();
        let mut units = HashMap::with_capacity(tree.units.len());
        let mut packages = HashMap::with_capacity(tree.units.len());

        for (name, unit) in &tree.units {
            units.insert(name.as_str(), UnitSymbols::collect(unit, &mut duplicates));
            packages.insert(name.as_str(), unit.package.as_str());
        }
        for dup in &duplicates {
            tracing::warn!(
                unit = %dup.unit,
                name = %dup.name,
                kept = %dup.kept,
                ignored = %dup.ignored,
                "duplicate declaration"
            );
        }

        Self {
            tree,
            units,
            packages,
            duplicates,
        }
    }

    #[must_use]
    pub fn unit(&self, name: &str) -> Option<&UnitSymbols<'t>> {
        self.units.get(name)
    }

    /// Duplicate package-scope declarations found while indexing.
    #[must_use]
    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }

    /// Package-scope lookup within one unit.
    #[must_use]
    pub fn lookup(&self, unit: &str, name: &str) -> Option<Symbol<'t>> {
        self.units.get(unit)?.get(name)
    }

    #[must_use]
    pub fn methods_of(&self, unit: &str, type_name: &str) -> &[Method<'t>] {
        self.units
            .get(unit)
            .map_or(&[], |symbols| symbols.methods_of(type_name))
    }

    /// The import path a qualifier names inside `file`.
    #[must_use]
    pub fn import_path(&self, file: &'t SourceFile, qualifier: &str) -> Option<&'t str> {
        imports::import_path(file, qualifier, &self.packages)
    }

    /// Resolve `qualifier.name` as written in `file`.
    #[must_use]
    pub fn lookup_qualified(&self, file: &'t SourceFile, qualifier: &str, name: &str) -> Qualified<'t> {
        let Some(path) = self.import_path(file, qualifier) else {
            return Qualified::UnknownQualifier;
        };
        match self.units.get(path) {
            Some(symbols) => match symbols.get(name) {
                Some(symbol) => Qualified::InTree {
                    unit: symbols.unit.name.as_str(),
                    symbol,
                },
                None => Qualified::Missing { path },
            },
            None => Qualified::External { path },
        }
    }

    /// The loaded unit named `name`.
    #[must_use]
    pub fn loaded_unit(&self, name: &str) -> Option<&'t Unit> {
        self.tree.unit(name)
    }
}
