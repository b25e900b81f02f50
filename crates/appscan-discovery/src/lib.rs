//! # appscan-discovery
//!
//! Finds the application entry type of a Go project without compiling it.
//!
//! A [`SourceTree`](appscan_parser::SourceTree) is indexed into per-unit
//! symbol tables ([`resolver`]). Every struct declaration is checked against
//! the configured capability set, following embedding chains
//! ([`capability`]). The unique qualifying type then has its module registry
//! call evaluated ([`modules`]) and its keeper fields listed ([`fields`]).
//!
//! [`discover`] sequences the whole run.

pub mod capability;
pub mod discovery;
pub mod error;
pub mod fields;
pub mod modules;
pub mod options;
pub mod resolver;
pub mod types;

pub use discovery::discover;
pub use error::{DiscoveryError, ResolutionError};
pub use options::{DiscoveryOptions, ExternalType, MethodSignature};
pub use types::{CapabilityReport, Discovery, KeeperField, Provided, TypeRef};
