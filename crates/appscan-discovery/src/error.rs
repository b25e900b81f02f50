//! Discovery error types.

use std::path::PathBuf;

use appscan_parser::{Location, ParserError};

use crate::types::{CapabilityReport, TypeRef};

/// An expression the resolver could not evaluate statically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot resolve `{expression}` at {location}: {reason}")]
pub struct ResolutionError {
    /// Source text of the offending expression.
    pub expression: String,
    pub location: Location,
    pub reason: String,
}

/// The single terminal failure of a discovery run.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// No struct in the tree satisfies the capability set.
    #[error(
        "no application entry type found in {searched_units} units ({parse_errors} files failed to parse){}",
        closest_hint(.closest.as_ref())
    )]
    NotFound {
        searched_units: usize,
        parse_errors: usize,
        closest: Option<CapabilityReport>,
    },

    #[error("ambiguous entry type, candidates: {}", join(.candidates))]
    Ambiguous { candidates: Vec<TypeRef> },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("{candidate} does not satisfy the capability set, missing: {}", .missing.join(", "))]
    Capability {
        candidate: TypeRef,
        missing: Vec<String>,
    },

    #[error("discovery cancelled")]
    Cancelled,

    #[error("invalid path {}: {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("load failed: {0}")]
    Load(ParserError),
}

impl From<ParserError> for DiscoveryError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::Cancelled => Self::Cancelled,
            ParserError::InvalidRoot { path, reason } => Self::InvalidPath { path, reason },
            other => Self::Load(other),
        }
    }
}

fn join(candidates: &[TypeRef]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn closest_hint(closest: Option<&CapabilityReport>) -> String {
    closest.map_or_else(String::new, |report| {
        format!(
            "; closest candidate {} is missing: {}",
            report.candidate,
            report.missing.join(", ")
        )
    })
}
