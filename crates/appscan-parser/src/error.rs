//! Parser error types for appscan-parser.

use std::fmt;
use std::path::PathBuf;

/// A file-level problem. Non-fatal: the file is skipped and the load goes on.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ParseError {
    /// Path relative to the walk root.
    pub path: PathBuf,
    /// 1-based line of the first problem, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub message: String,
}

impl ParseError {
    pub fn new(path: impl Into<PathBuf>, line: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}: {}", self.path.display(), self.message),
            None => write!(f, "{}: {}", self.path.display(), self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors that abort loading a source tree.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Invalid root {}: {reason}", .path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    #[error("Invalid glob '{glob}': {message}")]
    InvalidGlob { glob: String, message: String },

    #[error("Walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Load cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
