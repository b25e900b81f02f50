//! Owned data model produced by lowering Go sources.
//!
//! Nothing here borrows from the syntax tree, so lowered files can cross
//! rayon worker boundaries and outlive the parser.

mod decl;
mod expr;

pub use decl::*;
pub use expr::*;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A position in the loaded tree: path relative to the root, 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub path: PathBuf,
    pub line: u32,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// One parsed `.go` file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the walk root.
    pub path: PathBuf,
    /// Compilation unit (import path) the file belongs to. Filled in when
    /// the file is grouped into its unit.
    pub unit: String,
    /// Name from the `package` clause.
    pub package: String,
    pub imports: Vec<ImportSpec>,
    /// Top-level declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Calls to tracked constructor functions, in source order.
    pub call_sites: Vec<CallSite>,
}

impl SourceFile {
    pub fn types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Type(t) => Some(t),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Func(f) => Some(f),
            _ => None,
        })
    }

    /// Find the function or method a call site is nested in.
    #[must_use]
    pub fn enclosing_function(&self, enclosing: &Enclosing) -> Option<&FuncDecl> {
        self.functions().find(|f| {
            f.name == enclosing.name
                && f.receiver.as_ref().map(|r| r.type_name.as_str()) == enclosing.receiver.as_deref()
        })
    }
}

/// `import alias "path"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit alias, including `_` and `.`.
    pub alias: Option<String>,
    pub path: String,
}

/// A call to a tracked constructor function.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub call: Expr,
    /// Function or method whose body holds the call; `None` at package level.
    pub enclosing: Option<Enclosing>,
}

/// Identifies a function (or method, via its receiver type) by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosing {
    pub receiver: Option<String>,
    pub name: String,
}
