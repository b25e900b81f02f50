//! Test, vendored and generated file detection for filtering during loading.
//!
//! Used by the walker (`walk.rs`) to skip directories and files that never
//! contribute declarations to a package build, following the `go` tool's
//! own conventions.

/// Directory names the `go` tool never treats as part of a package.
const SKIPPED_DIRS: &[&str] = &["testdata", "vendor", "node_modules", "third_party"];

/// Returns `true` if `dir_name` should not be descended into.
///
/// Besides [`SKIPPED_DIRS`], directories starting with `.` or `_` are ignored
/// by the `go` tool.
///
/// # Examples
///
/// ```
/// use appscan_parser::is_skipped_dir;
/// assert!(is_skipped_dir("vendor"));
/// assert!(is_skipped_dir(".git"));
/// assert!(!is_skipped_dir("app"));
/// ```
#[must_use]
pub fn is_skipped_dir(dir_name: &str) -> bool {
    SKIPPED_DIRS.contains(&dir_name) || dir_name.starts_with('.') || dir_name.starts_with('_')
}

/// Returns `true` if `file_name` is a Go test file (`*_test.go`).
///
/// # Examples
///
/// ```
/// use appscan_parser::is_test_file;
/// assert!(is_test_file("app_test.go"));
/// assert!(!is_test_file("app.go"));
/// ```
#[must_use]
pub fn is_test_file(file_name: &str) -> bool {
    file_name.ends_with("_test.go")
}

/// Returns `true` for `.go` files.
#[must_use]
pub fn is_go_source(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext == "go")
}

/// Returns `true` if the source carries the standard generated-code header.
///
/// The header is a line comment of the form
/// `// Code generated <tool>. DO NOT EDIT.` appearing before the package
/// clause.
#[must_use]
pub fn has_generated_header(source: &str) -> bool {
    for line in source.lines() {
        let line = line.trim();
        if line.starts_with("package ") {
            return false;
        }
        if line.starts_with("// Code generated ") && line.ends_with(" DO NOT EDIT.") {
            return true;
        }
    }
    false
}
