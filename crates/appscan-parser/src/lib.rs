//! # appscan-parser
//!
//! ast-grep-based loading of a Go source tree into owned declarations.
//!
//! The loader walks a project, skips test, vendored and generated files,
//! parses every remaining `.go` file on a rayon worker and lowers it into a
//! [`SourceFile`]: imports, top-level declarations, and the call sites of
//! tracked constructor functions. Files are grouped into compilation units
//! (Go packages) named by import path.
//!
//! Malformed files never abort a load; they are recorded as [`ParseError`]s
//! and skipped.

pub mod cancel;
pub mod error;
pub mod extractors;
pub mod gomod;
pub mod loader;
pub mod parser;
pub mod test_files;
pub mod types;
pub mod walk;

pub use cancel::Cancellation;
pub use error::{ParseError, ParserError};
pub use loader::{LoadOptions, SourceTree, Unit};
pub use test_files::{has_generated_header, is_skipped_dir, is_test_file};
pub use types::*;
pub use walk::WalkOptions;
