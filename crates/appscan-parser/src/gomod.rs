//! `go.mod` module path lookup.
//!
//! Only the `module` directive matters here: it turns a directory into a
//! module root so packages below it can be named by import path.

use std::path::{Path, PathBuf};

/// A directory holding a `go.mod`, relative to the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRoot {
    pub dir: PathBuf,
    pub path: String,
}

/// Extract the module path from `go.mod` contents.
#[must_use]
pub fn module_path(contents: &str) -> Option<String> {
    for line in contents.lines() {
        let line = line.split("//").next().unwrap_or_default().trim();
        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }
        let path = rest.trim().trim_matches('"').trim_matches('`');
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }
    None
}

/// Name the package living in `dir` (relative to the walk root).
///
/// The nearest enclosing module root wins. Without one, the slash-separated
/// relative directory is used, `.` for the root itself.
#[must_use]
pub fn unit_name(dir: &Path, roots: &[ModuleRoot]) -> String {
    let nearest = roots
        .iter()
        .filter(|root| dir.starts_with(&root.dir))
        .max_by_key(|root| root.dir.components().count());

    match nearest {
        Some(root) => {
            let suffix = dir.strip_prefix(&root.dir).unwrap_or(dir);
            let suffix = slash_path(suffix);
            if suffix.is_empty() {
                root.path.clone()
            } else {
                format!("{}/{suffix}", root.path)
            }
        }
        None => {
            let rel = slash_path(dir);
            if rel.is_empty() { ".".to_string() } else { rel }
        }
    }
}

/// Join path components with `/` regardless of platform.
#[must_use]
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
