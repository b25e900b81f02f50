//! File walker for loading a Go project.
//!
//! Uses the `ignore` crate for gitignore-aware directory walking with support
//! for a custom `.appscanignore` file and exclude globs. Test files, vendored
//! and hidden directories are always skipped (see [`crate::test_files`]);
//! generated files are skipped by file-name glob here and by header later,
//! once the contents are read.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use serde::{Deserialize, Serialize};

use crate::error::ParserError;
use crate::test_files::{is_go_source, is_skipped_dir, is_test_file};

fn default_generated() -> Vec<String> {
    ["*.pb.go", "*.pb.gw.go", "*.pulsar.go", "*_mock.go"]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_true() -> bool {
    true
}

/// Walk configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WalkOptions {
    /// Honour `.gitignore`, `.ignore` and `.appscanignore` files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Extra globs (relative to the root) whose matches are never loaded.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// File-name globs identifying generated sources.
    #[serde(default = "default_generated")]
    pub generated: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            exclude: Vec::new(),
            generated: default_generated(),
        }
    }
}

impl WalkOptions {
    /// Check that every glob compiles.
    ///
    /// # Errors
    /// Returns `ParserError::InvalidGlob` naming the first bad pattern.
    pub fn validate(&self) -> Result<(), ParserError> {
        self.generated_set()?;
        for glob in &self.exclude {
            compile_glob(glob)?;
        }
        Ok(())
    }

    fn generated_set(&self) -> Result<GlobSet, ParserError> {
        let mut builder = GlobSetBuilder::new();
        for glob in &self.generated {
            builder.add(compile_glob(glob)?);
        }
        builder.build().map_err(|e| ParserError::InvalidGlob {
            glob: self.generated.join(", "),
            message: e.to_string(),
        })
    }
}

fn compile_glob(glob: &str) -> Result<Glob, ParserError> {
    Glob::new(glob).map_err(|e| ParserError::InvalidGlob {
        glob: glob.to_string(),
        message: e.to_string(),
    })
}

/// Files of interest found under a root.
#[derive(Debug, Default)]
pub struct WalkedFiles {
    /// `.go` sources, absolute, sorted.
    pub sources: Vec<PathBuf>,
    /// `go.mod` manifests, absolute, sorted.
    pub manifests: Vec<PathBuf>,
}

/// Build a file walker over `root` with the given options.
///
/// # Errors
/// Returns `ParserError::InvalidGlob` if an exclude glob does not compile.
pub fn build_walker(root: &Path, options: &WalkOptions) -> Result<ignore::Walk, ParserError> {
    let mut builder = WalkBuilder::new(root);

    builder
        .hidden(true)
        .require_git(false)
        .git_ignore(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .ignore(options.respect_gitignore);
    if options.respect_gitignore {
        builder.add_custom_ignore_filename(".appscanignore");
    }

    if !options.exclude.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for glob in &options.exclude {
            // Caller passes raw pattern, we negate it to exclude
            overrides
                .add(&format!("!{glob}"))
                .map_err(|e| ParserError::InvalidGlob {
                    glob: glob.clone(),
                    message: e.to_string(),
                })?;
        }
        let overrides = overrides.build().map_err(|e| ParserError::InvalidGlob {
            glob: options.exclude.join(", "),
            message: e.to_string(),
        })?;
        builder.overrides(overrides);
    }

    builder.filter_entry(|entry| {
        if entry.depth() == 0 {
            return true;
        }
        let file_name = entry.file_name().to_string_lossy();
        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            !is_skipped_dir(&file_name)
        } else {
            !is_test_file(&file_name)
        }
    });

    Ok(builder.build())
}

/// Collect Go sources and `go.mod` manifests under `root`.
///
/// Files matching a generated-name glob are dropped here.
///
/// # Errors
/// Returns `ParserError` on invalid globs or walk failures.
pub fn collect_files(root: &Path, options: &WalkOptions) -> Result<WalkedFiles, ParserError> {
    let generated = options.generated_set()?;
    let mut files = WalkedFiles::default();

    for entry in build_walker(root, options)? {
        let entry = entry?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name == "go.mod" {
            files.manifests.push(entry.into_path());
        } else if is_go_source(&name) {
            if generated.is_match(name.as_ref()) {
                tracing::trace!(path = %entry.path().display(), "skipping generated file");
                continue;
            }
            files.sources.push(entry.into_path());
        }
    }

    files.sources.sort();
    files.manifests.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // Helper: create a fixture directory with various files and subdirs
    fn create_fixture(dir: &Path) {
        let dirs = [
            "app",
            "x/bank/types",
            "testdata",
            "vendor/github.com/dep",
            ".git",
            "ignored",
        ];
        for d in &dirs {
            fs::create_dir_all(dir.join(d)).expect("mkdir should succeed");
        }

        let files = [
            ("go.mod", "module example.com/chain\n"),
            ("app/app.go", "package app\n"),
            ("app/app_test.go", "package app\n"),
            ("x/bank/types/tx.pb.go", "package types\n"),
            ("x/bank/types/keys.go", "package types\n"),
            ("testdata/fixture.go", "package testdata\n"),
            ("vendor/github.com/dep/dep.go", "package dep\n"),
            (".git/hook.go", "package git\n"),
            ("ignored/skip.go", "package ignored\n"),
            (".gitignore", "ignored/\n"),
            ("README.md", "# chain\n"),
        ];
        for (path, content) in &files {
            fs::write(dir.join(path), content).expect("write should succeed");
        }
    }

    fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn default_walk_keeps_only_package_sources() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());

        let files = collect_files(tmp.path(), &WalkOptions::default()).unwrap();
        assert_eq!(
            relative(tmp.path(), &files.sources),
            vec!["app/app.go".to_string(), "x/bank/types/keys.go".to_string()]
        );
        assert_eq!(relative(tmp.path(), &files.manifests), vec!["go.mod"]);
    }

    #[test]
    fn gitignore_can_be_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());

        let options = WalkOptions {
            respect_gitignore: false,
            ..WalkOptions::default()
        };
        let files = collect_files(tmp.path(), &options).unwrap();
        let sources = relative(tmp.path(), &files.sources);
        assert!(sources.contains(&"ignored/skip.go".to_string()));
        assert!(!sources.iter().any(|s| s.starts_with("vendor/")));
    }

    #[test]
    fn exclude_glob_drops_matches() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());

        let options = WalkOptions {
            exclude: vec!["x/**".to_string()],
            ..WalkOptions::default()
        };
        let files = collect_files(tmp.path(), &options).unwrap();
        assert_eq!(relative(tmp.path(), &files.sources), vec!["app/app.go"]);
    }

    #[test]
    fn invalid_glob_is_reported() {
        let options = WalkOptions {
            generated: vec!["[".to_string()],
            ..WalkOptions::default()
        };
        let err = options.validate().unwrap_err();
        assert!(matches!(err, ParserError::InvalidGlob { .. }), "{err}");
    }
}
