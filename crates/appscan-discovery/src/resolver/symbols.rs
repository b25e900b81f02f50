use std::collections::HashMap;

use appscan_parser::{Declaration, FuncDecl, Location, SourceFile, TypeDecl, Unit, VarDecl};

/// A package-scope declaration and the file declaring it.
#[derive(Debug, Clone, Copy)]
pub struct Symbol<'t> {
    pub decl: &'t Declaration,
    pub file: &'t SourceFile,
}

impl<'t> Symbol<'t> {
    #[must_use]
    pub const fn as_type(&self) -> Option<&'t TypeDecl> {
        match self.decl {
            Declaration::Type(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_var(&self) -> Option<&'t VarDecl> {
        match self.decl {
            Declaration::Var(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_func(&self) -> Option<&'t FuncDecl> {
        match self.decl {
            Declaration::Func(f) => Some(f),
            _ => None,
        }
    }
}

/// A method and the file declaring it.
#[derive(Debug, Clone, Copy)]
pub struct Method<'t> {
    pub decl: &'t FuncDecl,
    pub file: &'t SourceFile,
}

/// Two package-scope declarations sharing a name; the first one is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub unit: String,
    pub name: String,
    pub kept: Location,
    pub ignored: Location,
}

/// The package scope of one unit, plus its methods keyed by receiver.
#[derive(Debug)]
pub struct UnitSymbols<'t> {
    pub unit: &'t Unit,
    symbols: HashMap<&'t str, Symbol<'t>>,
    methods: HashMap<&'t str, Vec<Method<'t>>>,
}

impl<'t> UnitSymbols<'t> {
    /// Collect every declaration of `unit`. Files are visited in path order,
    /// so the first duplicate in path order wins.
    pub(super) fn collect(unit: &'t Unit, duplicates: &mut Vec<Duplicate>) -> Self {
        let mut symbols: HashMap<&'t str, Symbol<'t>> = HashMap::new();
        let mut methods: HashMap<&'t str, Vec<Method<'t>>> = HashMap::new();

        for file in &unit.files {
            for decl in &file.declarations {
                if let Declaration::Func(func) = decl
                    && let Some(receiver) = &func.receiver
                {
                    methods
                        .entry(receiver.type_name.as_str())
                        .or_default()
                        .push(Method { decl: func, file });
                    continue;
                }
                let name = decl.name();
                // `_` and `init` never enter package scope.
                if name == "_" || (name == "init" && matches!(decl, Declaration::Func(_))) {
                    continue;
                }
                if let Some(existing) = symbols.get(name) {
                    duplicates.push(Duplicate {
                        unit: unit.name.clone(),
                        name: name.to_string(),
                        kept: existing.decl.location().clone(),
                        ignored: decl.location().clone(),
                    });
                    continue;
                }
                symbols.insert(name, Symbol { decl, file });
            }
        }

        Self {
            unit,
            symbols,
            methods,
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Symbol<'t>> {
        self.symbols.get(name).copied()
    }

    /// Methods whose receiver base type is `type_name`, pointer or value.
    #[must_use]
    pub fn methods_of(&self, type_name: &str) -> &[Method<'t>] {
        self.methods.get(type_name).map_or(&[], Vec::as_slice)
    }
}
