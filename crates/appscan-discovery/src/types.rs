//! Discovery results.

use std::fmt;

use appscan_parser::ParseError;
use serde::Serialize;

/// A type named by its compilation unit and declared name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TypeRef {
    pub unit: String,
    pub name: String,
}

impl TypeRef {
    pub fn new(unit: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.unit, self.name)
    }
}

/// A keeper field on the entry type: `BankKeeper bankkeeper.Keeper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeeperField {
    pub name: String,
    /// Declared type as written, leading `*` removed.
    pub type_name: String,
}

/// The outcome of a successful discovery run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    pub entry_type: TypeRef,
    /// Registry modules in declaration order, duplicates kept.
    pub modules: Vec<TypeRef>,
    pub keeper_fields: Vec<KeeperField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<ParseError>,
}

/// Which type supplied a capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provided {
    pub capability: String,
    pub provider: TypeRef,
}

/// Capability check of one candidate type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityReport {
    pub candidate: TypeRef,
    /// In capability-set order.
    pub satisfied: Vec<Provided>,
    /// In capability-set order.
    pub missing: Vec<String>,
    /// In-tree types reached through embedding, excluding the candidate.
    #[serde(skip)]
    pub bases: Vec<TypeRef>,
}

impl CapabilityReport {
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}
